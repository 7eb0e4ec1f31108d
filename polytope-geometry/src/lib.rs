//! Geometry generation and 6D rotation pipeline for 4D polytopes.
//!
//! The catalog describes nine base families, each combinable with one of three
//! core warps. A single geometry index addresses every combination; the codec
//! is the only place that knows how.
//!
//! ```text
//! GeometryIndex ──decode──> (core, base)
//!                             │
//!        PolytopeCatalog::generate ──> PolytopeMesh | DistanceField
//!                             │
//!                    apply_core_warp
//!                             │
//!   RotationPipeline::project (XY, XZ, YZ, XW, YW, ZW, then W divide)
//! ```

/// Memoizing catalog of base geometry descriptors and generated primitives.
pub mod catalog;

/// Geometry index encoding shared by every consumer.
pub mod codec;

/// Structural deformations applied on top of a base family.
pub mod core_warp;

/// Closed-form 4D signed distance functions.
pub mod distance_field;

pub mod error;

/// Regular polytope vertex sets and edge detection.
pub mod polytopes;

/// Mesh and field primitives plus the parameters that key the cache.
pub mod primitive;

/// Six-plane rotation and 4D to 3D projection.
pub mod rotation;

/// Parametric surface and fractal families.
pub mod surfaces;

pub use catalog::{BaseGeometryDescriptor, PolytopeCatalog, VisualBias};
pub use codec::{DecodedGeometry, GeometryIndex, GeometryIndexCodec};
pub use core_warp::{CoreWarpKind, apply_core_warp};
pub use distance_field::DistanceField;
pub use error::GeometryError;
pub use primitive::{GeometryPrimitive, PolytopeMesh, Representation, StructuralParams, WarpParams};
pub use rotation::{PreparedProjection, ProjectionParams, RotationAngles, RotationPlane};
