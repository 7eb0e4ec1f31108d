use polytope_geometry::GeometryError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParameterError {
    #[error("unknown parameter channel '{0}'")]
    UnknownChannel(String),
}

/// Failures surfaced by the engine coordinator and its adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("unknown engine '{0}'")]
    UnknownEngine(String),
    #[error("engine {engine} could not acquire its surfaces: {reason}")]
    ResourceUnavailable { engine: &'static str, reason: String },
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InteractionError {
    #[error("unknown input category '{0}'")]
    UnknownCategory(String),
    #[error("unknown {category} mode '{mode}'")]
    UnknownMode { category: &'static str, mode: String },
}

/// Reasons a persisted, shared or imported document is rejected as a whole.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ImportValidationError {
    #[error("malformed document: {0}")]
    Malformed(String),
    #[error("share code is not valid base64: {0}")]
    InvalidEncoding(String),
    #[error("unsupported document type '{found}'")]
    UnsupportedType { found: String },
    #[error("unsupported {document} version {found}")]
    UnsupportedVersion { document: &'static str, found: u32 },
    #[error("{location}: geometry {value} is not an index in 0..{total}")]
    InvalidGeometry {
        location: String,
        value: f64,
        total: u32,
    },
    #[error("{location}: {channel} = {value} is outside ±{limit}")]
    RotationOutOfRange {
        location: String,
        channel: String,
        value: f64,
        limit: f32,
    },
    #[error("{location}: unknown channel '{channel}'")]
    UnknownChannel { location: String, channel: String },
    #[error("{location}: {channel} is not a finite number")]
    NonFinite { location: String, channel: String },
    #[error("{location}: unknown engine '{system}'")]
    UnknownSystem { location: String, system: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("storage write failed: {0}")]
    Write(String),
}
