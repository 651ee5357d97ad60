//! Geometric transforms applied to decoded bitmaps.
//!
//! # Coordinate System
//!
//! - Rotation angles are in degrees, positive = clockwise on screen
//! - Origin is top-left corner, y grows downward

mod rotation;

pub use rotation::{compute_rotated_bounds, rotate, rotate_bitmap};
