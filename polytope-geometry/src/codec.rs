use crate::error::GeometryError;
use constants::geometry::{BASE_COUNT, CORE_COUNT};
use serde::{Deserialize, Serialize};

/// Flat index addressing one `(core, base)` combination.
///
/// Deserialized values go through the standard codec, so an index read from
/// disk or the wire is always in range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u32", try_from = "u32")]
pub struct GeometryIndex(u32);

impl GeometryIndex {
    pub fn value(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for GeometryIndex {
    type Error = GeometryError;

    fn try_from(raw: u32) -> Result<Self, Self::Error> {
        GeometryIndexCodec::STANDARD.index(raw as i64)
    }
}

impl From<GeometryIndex> for u32 {
    fn from(index: GeometryIndex) -> Self {
        index.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DecodedGeometry {
    pub core_index: u32,
    pub base_index: u32,
}

/// Sole authority on `index = core * base_count + base`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeometryIndexCodec {
    base_count: u32,
    core_count: u32,
}

impl Default for GeometryIndexCodec {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl GeometryIndexCodec {
    /// Codec sized for the full catalog.
    pub const STANDARD: Self = Self {
        base_count: BASE_COUNT,
        core_count: CORE_COUNT,
    };

    pub const fn new(base_count: u32, core_count: u32) -> Self {
        assert!(base_count > 0 && core_count > 0);
        Self {
            base_count,
            core_count,
        }
    }

    pub fn base_count(&self) -> u32 {
        self.base_count
    }

    pub fn core_count(&self) -> u32 {
        self.core_count
    }

    pub fn total(&self) -> u32 {
        self.base_count * self.core_count
    }

    pub fn encode(&self, core_index: u32, base_index: u32) -> Result<GeometryIndex, GeometryError> {
        if core_index >= self.core_count {
            return Err(GeometryError::OutOfRange {
                what: "core index",
                value: core_index as i64,
                bound: self.core_count,
            });
        }
        if base_index >= self.base_count {
            return Err(GeometryError::OutOfRange {
                what: "base index",
                value: base_index as i64,
                bound: self.base_count,
            });
        }
        Ok(GeometryIndex(core_index * self.base_count + base_index))
    }

    pub fn decode(&self, index: i64) -> Result<DecodedGeometry, GeometryError> {
        if index < 0 || index >= self.total() as i64 {
            return Err(GeometryError::OutOfRange {
                what: "geometry index",
                value: index,
                bound: self.total(),
            });
        }
        let index = index as u32;
        Ok(DecodedGeometry {
            core_index: index / self.base_count,
            base_index: index % self.base_count,
        })
    }

    /// Wrap any integer into range, so stepping past either end cycles around.
    pub fn normalize(&self, raw: i64) -> GeometryIndex {
        let total = self.total() as i64;
        GeometryIndex((((raw % total) + total) % total) as u32)
    }

    /// Validate an already-flat index.
    pub fn index(&self, raw: i64) -> Result<GeometryIndex, GeometryError> {
        let decoded = self.decode(raw)?;
        self.encode(decoded.core_index, decoded.base_index)
    }

    pub fn decode_index(&self, index: GeometryIndex) -> Result<DecodedGeometry, GeometryError> {
        self.decode(index.0 as i64)
    }
}
