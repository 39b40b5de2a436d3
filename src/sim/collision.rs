//! Collision classification and reflection
//!
//! The arcade core of mBreak: given a moving box that overlaps a stationary
//! one, decide which face it struck by comparing how far the moving box
//! sticks out past each edge. The same rule serves paddles, balls and blocks.

use std::f32::consts::{FRAC_PI_2, PI};

use serde::{Deserialize, Serialize};

use super::rect::Rect;

/// A face of a stationary rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

/// Determine which face of `stationary` the `moving` box struck.
///
/// A top or bottom candidate loses to the left or right face when the box
/// sticks out sideways strictly further than it does vertically. Returns
/// `None` when no face condition holds, e.g. when `moving` sits entirely
/// inside `stationary` or the boxes are identical.
pub fn classify_side(moving: &Rect, stationary: &Rect) -> Option<Side> {
    let m = moving;
    let s = stationary;

    let left_depth = s.left() - m.left();
    let right_depth = m.right() - s.right();

    if m.bottom() >= s.top() && m.top() < s.top() {
        let depth = s.top() - m.top();
        Some(horizontal_or(left_depth, right_depth, depth, Side::Top))
    } else if m.top() <= s.bottom() && m.bottom() > s.bottom() {
        let depth = m.bottom() - s.bottom();
        Some(horizontal_or(left_depth, right_depth, depth, Side::Bottom))
    } else if m.right() >= s.left() && m.left() < s.left() {
        Some(Side::Left)
    } else if m.left() <= s.right() && m.right() > s.right() {
        Some(Side::Right)
    } else {
        None
    }
}

#[inline]
fn horizontal_or(left_depth: i32, right_depth: i32, vertical_depth: i32, face: Side) -> Side {
    if left_depth > vertical_depth {
        Side::Left
    } else if right_depth > vertical_depth {
        Side::Right
    } else {
        face
    }
}

/// Face of `stationary` with the shortest way out for a `moving` box that
/// sits inside it. Ties keep the first of Top, Bottom, Left, Right.
pub fn nearest_exit(moving: &Rect, stationary: &Rect) -> Side {
    let exits = [
        (Side::Top, moving.bottom() - stationary.top()),
        (Side::Bottom, stationary.bottom() - moving.top()),
        (Side::Left, moving.right() - stationary.left()),
        (Side::Right, stationary.right() - moving.left()),
    ];
    exits
        .into_iter()
        .min_by_key(|&(_, distance)| distance)
        .map_or(Side::Top, |(side, _)| side)
}

/// Outgoing angles for two touching balls: each flies directly away from the
/// other's center. Returns `(angle_of_a, angle_of_b)` in `(-π, π]`.
pub fn radial_angles(a: &Rect, b: &Rect) -> (f32, f32) {
    let dx = (a.center_x() - b.center_x()) as f32;
    let dy = (a.center_y() - b.center_y()) as f32;
    (dy.atan2(dx), (-dy).atan2(-dx))
}

/// Mirror across a vertical surface (left/right faces, x-edges)
#[inline]
pub fn mirror_x(angle: f32) -> f32 {
    PI - angle
}

/// Mirror across a horizontal surface (top/bottom faces, y-edges)
#[inline]
pub fn mirror_y(angle: f32) -> f32 {
    -angle
}

/// Whether a ball heading along `angle` (normalized) is moving into `side`
pub fn approaches(side: Side, angle: f32) -> bool {
    match side {
        // y grows downward, so angles in (0, π) move down onto a top face
        Side::Top => angle < PI,
        Side::Bottom => angle > PI,
        Side::Left => angle < FRAC_PI_2 || angle > 3.0 * FRAC_PI_2,
        Side::Right => angle > FRAC_PI_2 && angle < 3.0 * FRAC_PI_2,
    }
}
