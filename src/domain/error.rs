//! Resolver faults.
//!
//! Obstruction is a normal outcome, not an error. These cover invalid
//! input and the hard safety caps on scanning and iteration.

use std::fmt;

use super::entity::Direction;

#[derive(Clone, Debug, PartialEq)]
pub enum MoveError {
    /// Hitbox smaller than one pixel, or not finite.
    InvalidHitbox { w: f32, h: f32 },
    /// Requested displacement is NaN or infinite.
    InvalidDisplacement { dx: f32, dy: f32 },
    /// The resolver loop hit its cap. The actor keeps `achieved`.
    IterationCap { iterations: usize, achieved: (f32, f32) },
    /// A directional scan ran past its cursor budget.
    ScanExhausted { direction: Direction, iterations: usize },
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveError::InvalidHitbox { w, h } => write!(f, "invalid hitbox size {w}x{h}"),
            MoveError::InvalidDisplacement { dx, dy } => {
                write!(f, "invalid displacement ({dx}, {dy})")
            }
            MoveError::IterationCap { iterations, achieved } => write!(
                f,
                "movement resolver gave up after {iterations} iterations, achieved ({}, {})",
                achieved.0, achieved.1
            ),
            MoveError::ScanExhausted { direction, iterations } => {
                write!(f, "{direction:?} scan exceeded {iterations} iterations")
            }
        }
    }
}

impl std::error::Error for MoveError {}
