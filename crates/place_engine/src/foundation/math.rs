//! Math utilities and types
//!
//! World coordinates are screen-space: x grows to the right, y grows
//! downwards. Angles are in degrees and counter-clockwise on screen, so a
//! direction of 90 points up (negative y) and a positive rotation turns a
//! shape counter-clockwise as seen by the player.

pub use nalgebra::Vector2;

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// Tolerance used when comparing derived geometry
pub const EPSILON: f32 = 1e-5;

/// Horizontal component of a vector of `length` pointing at `direction` degrees
pub fn ldx(length: f32, direction: f32) -> f32 {
    length * (-direction).to_radians().cos()
}

/// Vertical component of a vector of `length` pointing at `direction` degrees
pub fn ldy(length: f32, direction: f32) -> f32 {
    length * (-direction).to_radians().sin()
}

/// Vector of `length` pointing at `direction` degrees
pub fn from_direction(length: f32, direction: f32) -> Vec2 {
    Vec2::new(ldx(length, direction), ldy(length, direction))
}

/// Bearing from `from` to `to`, in degrees within `[0, 360)`
pub fn point_direction(from: Vec2, to: Vec2) -> f32 {
    let delta = to - from;
    let degrees = -delta.y.atan2(delta.x).to_degrees();
    degrees.rem_euclid(360.0)
}

/// Euclidean distance between two points
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (b - a).magnitude()
}

/// Number of counter-clockwise quarter turns in `degrees`, if it is a whole number
pub fn quarter_turns(degrees: f32) -> Option<u8> {
    let turns = degrees.rem_euclid(360.0) / 90.0;
    (turns.fract() == 0.0).then_some(turns as u8)
}

/// Rotate a vector around the origin by `degrees`
///
/// Quarter turns are exact.
pub fn rotate(v: Vec2, degrees: f32) -> Vec2 {
    match quarter_turns(degrees) {
        Some(0) => return v,
        Some(1) => return Vec2::new(v.y, -v.x),
        Some(2) => return -v,
        Some(3) => return Vec2::new(-v.y, v.x),
        _ => {}
    }
    let (sin, cos) = (-degrees).to_radians().sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Sign of a float as used for grid bias: `-1`, `0` or `1`
pub fn sign(value: f32) -> i32 {
    if value > 0.0 {
        1
    } else if value < 0.0 {
        -1
    } else {
        0
    }
}

/// 2D cross product (z component of the 3D cross product)
pub fn cross(a: Vec2, b: Vec2) -> f32 {
    a.x * b.y - a.y * b.x
}
