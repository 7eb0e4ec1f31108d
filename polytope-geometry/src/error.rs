use thiserror::Error;

/// Failures raised by the geometry layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("{what} {value} is outside 0..{bound}")]
    OutOfRange {
        what: &'static str,
        value: i64,
        bound: u32,
    },
    #[error("no base geometry at index {index} (catalog holds {count})")]
    InvalidIndex { index: u32, count: u32 },
}
