//! Contour attribution and direction
//!
//! A union contour is only usable if every vertex traces back to the same
//! source path. Which way it runs along that path is recovered from the
//! vertex tags.

use serde::{Deserialize, Serialize};

use super::tag::{VertexInfo, VertexTag};
use crate::clip::TaggedPoint;

/// Number of non-zero index steps the direction vote looks at
const DIRECTION_SIGNALS: usize = 3;

/// Traversal direction of a contour relative to its source path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Same order as the path's elements
    Forward,
    /// Opposite order
    Reverse,
}

impl Direction {
    /// Whether the path must be walked backwards
    pub fn is_reverse(self) -> bool {
        self == Direction::Reverse
    }
}

/// Index of the single path every vertex of `contour` came from, if any.
///
/// Returns `None` for empty contours, contours containing vertices created by
/// the clipping engine and contours mixing several paths.
pub fn source_path(contour: &[TaggedPoint]) -> Option<u32> {
    let first = VertexTag::from_raw(contour.first()?.z);
    if !first.is_valid() {
        return None;
    }
    let path_index = VertexInfo::unpack(first).path_index;

    contour
        .iter()
        .map(|p| VertexTag::from_raw(p.z))
        .all(|tag| tag.is_valid() && VertexInfo::unpack(tag).path_index == path_index)
        .then_some(path_index)
}

/// Whether `contour` can be attributed to exactly one source path
pub fn is_attributable(contour: &[TaggedPoint]) -> bool {
    source_path(contour).is_some()
}

/// Majority vote over the first few non-zero steps of the ordered index.
///
/// Steps wrap around from the last vertex to the first. Ties resolve to
/// [`Direction::Forward`]. Only meaningful for attributable contours.
pub fn resolve_direction(contour: &[TaggedPoint]) -> Direction {
    let ordered: Vec<i64> = contour
        .iter()
        .map(|p| VertexInfo::unpack(VertexTag::from_raw(p.z)).ordered_index())
        .collect();

    let n = ordered.len();
    let (mut forward, mut backward) = (0usize, 0usize);
    for i in 0..n {
        let delta = ordered[(i + 1) % n] - ordered[i];
        if delta > 0 {
            forward += 1;
        } else if delta < 0 {
            backward += 1;
        }
        if forward + backward >= DIRECTION_SIGNALS {
            break;
        }
    }

    if backward > forward {
        Direction::Reverse
    } else {
        Direction::Forward
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;

    fn contour(infos: &[(u32, u32, bool)]) -> Vec<TaggedPoint> {
        infos
            .iter()
            .enumerate()
            .map(|(i, &(path, vertex, sub))| {
                TaggedPoint::new(
                    DVec2::new(i as f64, 0.0),
                    VertexInfo::new(path, vertex, sub).pack().raw(),
                )
            })
            .collect()
    }

    #[test]
    fn test_single_path_is_attributable() {
        let c = contour(&[(2, 0, false), (2, 1, false), (2, 2, false)]);
        assert!(is_attributable(&c));
        assert_eq!(source_path(&c), Some(2));
    }

    #[test]
    fn test_rejects_empty() {
        assert!(!is_attributable(&[]));
    }

    #[test]
    fn test_rejects_mixed_paths() {
        let c = contour(&[(0, 0, false), (0, 1, false), (1, 0, false)]);
        assert!(!is_attributable(&c));
    }

    #[test]
    fn test_rejects_sentinel_anywhere() {
        let mut c = contour(&[(0, 0, false), (0, 1, false), (0, 2, false)]);
        c[1].z = VertexTag::INVALID.raw();
        assert!(!is_attributable(&c));

        let mut c = contour(&[(0, 0, false), (0, 1, false), (0, 2, false)]);
        c[0].z = VertexTag::INVALID.raw();
        assert!(!is_attributable(&c));
    }

    #[test]
    fn test_forward_triangle() {
        let c = contour(&[(0, 0, false), (0, 1, false), (0, 2, false)]);
        assert_eq!(resolve_direction(&c), Direction::Forward);
    }

    #[test]
    fn test_rotated_start_still_forward() {
        // The wrap-around step is the single backward signal
        let c = contour(&[(0, 2, false), (0, 3, false), (0, 0, false), (0, 1, false)]);
        assert_eq!(resolve_direction(&c), Direction::Forward);
    }

    #[test]
    fn test_reversal_flips_direction() {
        let mut c = contour(&[(0, 0, false), (0, 1, false), (0, 2, false), (0, 3, false)]);
        assert_eq!(resolve_direction(&c), Direction::Forward);
        c.reverse();
        assert_eq!(resolve_direction(&c), Direction::Reverse);
        assert!(resolve_direction(&c).is_reverse());
    }

    #[test]
    fn test_zero_steps_are_skipped() {
        // Samples of one curved element share ordered indices
        let c = contour(&[
            (0, 1, true),
            (0, 1, true),
            (0, 1, false),
            (0, 1, false),
            (0, 0, false),
            (0, 0, false),
        ]);
        assert_eq!(resolve_direction(&c), Direction::Reverse);
    }
}
