//! Vertex provenance tags
//!
//! Every discretized vertex carries a tag naming the path it was sampled
//! from, the element within that path, and which half of a curved element's
//! subdivision it lies in. Tags ride through the clipping engine untouched.

use serde::{Deserialize, Serialize};

/// Packed provenance tag as carried by the clipping engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VertexTag(i64);

impl VertexTag {
    /// Marks vertices synthesized by the clipping engine
    pub const INVALID: VertexTag = VertexTag(-1);

    /// Wrap a raw engine value
    pub fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw value for the engine
    pub fn raw(self) -> i64 {
        self.0
    }

    /// Whether this is not the invalid sentinel
    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }
}

/// Unpacked provenance of a discretized vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VertexInfo {
    /// Index of the source path among the eligible paths
    pub path_index: u32,
    /// Position of the (node, edge) element within the path
    pub vertex_index: u32,
    /// Sample lies in the second half of its element's subdivision
    pub sub: bool,
}

impl VertexInfo {
    /// Largest representable index (31 bits)
    pub const MASK: u32 = (1 << 31) - 1;

    /// Create vertex info
    pub fn new(path_index: u32, vertex_index: u32, sub: bool) -> Self {
        Self {
            path_index,
            vertex_index,
            sub,
        }
    }

    /// Info for sample `i` of `segments` on element `vertex_index`
    pub fn for_sample(path_index: u32, vertex_index: u32, i: u32, segments: u32) -> Self {
        Self::new(path_index, vertex_index, i > segments / 2)
    }

    /// Pack into a tag.
    ///
    /// # Panics
    /// If either index does not fit in 31 bits.
    pub fn pack(&self) -> VertexTag {
        assert!(
            self.vertex_index <= Self::MASK,
            "vertex index {} exceeds 31 bits",
            self.vertex_index
        );
        assert!(
            self.path_index <= Self::MASK,
            "path index {} exceeds 31 bits",
            self.path_index
        );
        VertexTag(
            self.sub as i64 | ((self.vertex_index as i64) << 1) | ((self.path_index as i64) << 32),
        )
    }

    /// Exact inverse of [`VertexInfo::pack`]
    pub fn unpack(tag: VertexTag) -> Self {
        let z = tag.0;
        Self {
            sub: z & 1 != 0,
            vertex_index: ((z >> 1) & Self::MASK as i64) as u32,
            path_index: ((z >> 32) & Self::MASK as i64) as u32,
        }
    }

    /// Position along the path including the sub-segment bit, for ordering
    /// consecutive samples without looking at the path index
    pub fn ordered_index(&self) -> i64 {
        self.sub as i64 | ((self.vertex_index as i64) << 1)
    }
}
