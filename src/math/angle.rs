use std::f64::consts::{PI, TAU};

use super::Point2;

/// Direction angle of the vector from `tail` to `tip`, in `(-π, π]`.
#[must_use]
pub fn direction(tail: &Point2, tip: &Point2) -> f64 {
    (tip.y - tail.y).atan2(tip.x - tail.x)
}

/// Signed angle from the ray `tail -> tip1` to the ray `tail -> tip2`.
///
/// Counter-clockwise rotation is positive. The result lies in `(-π, π]`.
#[must_use]
pub fn angle_between_oriented(tip1: &Point2, tail: &Point2, tip2: &Point2) -> f64 {
    let delta = direction(tail, tip2) - direction(tail, tip1);
    if delta <= -PI {
        delta + TAU
    } else if delta > PI {
        delta - TAU
    } else {
        delta
    }
}

/// How deeply the direction `tail -> target` sits inside the wedge swept
/// counter-clockwise from `tail -> from` to `tail -> to`.
///
/// Returns the smaller angular distance from the target direction to either
/// wedge side. Negative values mean the direction is outside the wedge. A
/// wedge whose sides coincide is treated as a full turn.
#[must_use]
pub fn wedge_margin(from: &Point2, tail: &Point2, to: &Point2, target: &Point2) -> f64 {
    let start = direction(tail, from);
    let mut span = (direction(tail, to) - start).rem_euclid(TAU);
    if span <= 0.0 {
        span = TAU;
    }
    let offset = (direction(tail, target) - start).rem_euclid(TAU);
    offset.min(span - offset)
}
