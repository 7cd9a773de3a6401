//! Line / point / circle primitives used by aim prediction.
//!
//! All functions are total over finite inputs. A degenerate segment
//! (`p1 == p2`) has angle 0 and projects every point onto `p1`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Squared length below which a segment is treated as a single point.
const DEGENERATE_LEN_SQ: f32 = 1e-12;

/// A directed segment from `p1` to `p2`.
/// Used for the aim ray and for drag gestures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub p1: Vec2,
    pub p2: Vec2,
}

impl Segment {
    pub fn new(p1: Vec2, p2: Vec2) -> Self {
        Self { p1, p2 }
    }

    /// `p2 - p1`.
    pub fn delta(&self) -> Vec2 {
        self.p2 - self.p1
    }

    pub fn is_degenerate(&self) -> bool {
        self.delta().length_squared() < DEGENERATE_LEN_SQ
    }

    pub fn length(&self) -> f32 {
        length(self)
    }

    pub fn angle(&self) -> f32 {
        angle_of(self)
    }
}

/// Projection parameter of `p` along `seg`: 0 at `p1`, 1 at `p2`.
/// Returns 0 for a degenerate segment.
pub fn projection_param(seg: &Segment, p: Vec2) -> f32 {
    let d = seg.delta();
    let len_sq = d.length_squared();
    if len_sq < DEGENERATE_LEN_SQ {
        return 0.0;
    }
    (p - seg.p1).dot(d) / len_sq
}

/// Orthogonal projection of `p` onto the infinite line through `seg`.
///
/// The result is NOT clamped to the segment; use [`is_point_on_segment`]
/// for membership.
pub fn nearest_point_on_segment(seg: &Segment, p: Vec2) -> Vec2 {
    seg.p1 + seg.delta() * projection_param(seg, p)
}

/// True iff the projection parameter of `p` lies in `[0, 1]` (inclusive).
///
/// For a degenerate segment only `p1` itself is a member.
pub fn is_point_on_segment(p: Vec2, seg: &Segment) -> bool {
    if seg.is_degenerate() {
        return (p - seg.p1).length_squared() < DEGENERATE_LEN_SQ;
    }
    let t = projection_param(seg, p);
    (0.0..=1.0).contains(&t)
}

/// Euclidean distance.
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// `atan2(dy, dx)` of the segment, in `(-π, π]`. 0 for a degenerate segment.
pub fn angle_of(seg: &Segment) -> f32 {
    if seg.is_degenerate() {
        return 0.0;
    }
    let d = seg.delta();
    d.y.atan2(d.x)
}

pub fn length(seg: &Segment) -> f32 {
    seg.delta().length()
}
