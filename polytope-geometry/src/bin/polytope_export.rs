/// Offline export of every catalog geometry as JSON meshes
use indicatif::{ProgressBar, ProgressStyle};
use polytope_geometry::{GeometryIndex, PolytopeCatalog, Representation, StructuralParams};
use rayon::prelude::*;
use serde::Serialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Serialize)]
struct ManifestEntry {
    index: u32,
    base: String,
    core: String,
    file: String,
    vertices: usize,
    edges: usize,
}

#[derive(Serialize)]
struct Manifest {
    base_count: u32,
    core_count: u32,
    resolution: u16,
    geometries: Vec<ManifestEntry>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args.len() > 3 {
        eprintln!("Usage: {} <output-dir> [resolution]", args[0]);
        std::process::exit(1);
    }

    let output_dir = PathBuf::from(&args[1]);
    let structural = match args.get(2) {
        Some(raw) => StructuralParams::default().with_resolution(raw.parse()?),
        None => StructuralParams::default(),
    }
    .clamped();
    fs::create_dir_all(&output_dir)?;

    let catalog = PolytopeCatalog::new();
    let codec = *catalog.codec();
    println!(
        "Exporting {} geometries ({} bases x {} cores) at resolution {}",
        codec.total(),
        codec.base_count(),
        codec.core_count(),
        structural.resolution
    );

    let pb = ProgressBar::new(codec.total() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{bar:40.green/blue}] {pos}/{len} geometries ({percent}%) {msg}")?
            .progress_chars("▉▊▋▌▍▎▏ "),
    );
    pb.set_message("Generating meshes");

    let results: Vec<Result<ManifestEntry, String>> = (0..codec.total() as i64)
        .into_par_iter()
        .map(|raw| {
            let entry = export_one(&catalog, codec.normalize(raw), structural, &output_dir);
            pb.inc(1);
            entry.map_err(|e| format!("geometry {raw}: {e}"))
        })
        .collect();
    pb.finish_with_message("Meshes generated");

    let mut geometries = Vec::with_capacity(results.len());
    for result in results {
        geometries.push(result?);
    }

    let manifest = Manifest {
        base_count: codec.base_count(),
        core_count: codec.core_count(),
        resolution: structural.resolution,
        geometries,
    };
    let manifest_path = output_dir.join("manifest.json");
    fs::write(&manifest_path, serde_json::to_string_pretty(&manifest)?)?;
    println!("Saved {}", manifest_path.display());

    let stats = catalog.cache_stats();
    println!("Export complete: {} primitives generated", stats.misses);
    Ok(())
}

fn export_one(
    catalog: &PolytopeCatalog,
    index: GeometryIndex,
    structural: StructuralParams,
    output_dir: &Path,
) -> Result<ManifestEntry, Box<dyn std::error::Error>> {
    let decoded = catalog.codec().decode_index(index)?;
    let primitive = catalog.generate_index(index, structural, Representation::Mesh)?;
    let mesh = primitive
        .as_mesh()
        .ok_or("catalog returned a field for a mesh request")?;

    let file = format!("geometry_{:02}.json", index.value());
    fs::write(output_dir.join(&file), serde_json::to_string(mesh)?)?;

    Ok(ManifestEntry {
        index: index.value(),
        base: catalog.describe_base(decoded.base_index)?.name.to_string(),
        core: constants::geometry::CORE_NAMES[decoded.core_index as usize].to_string(),
        file,
        vertices: mesh.vertex_count(),
        edges: mesh.edge_count(),
    })
}
