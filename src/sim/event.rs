//! Events emitted during a simulation step.
//! The presentation layer consumes these for the status line and log.

use crate::domain::entity::{Direction, ObjectId};

#[derive(Clone, Debug, PartialEq)]
pub enum MoveEvent {
    /// The hero ran into something this frame after moving freely.
    Bumped { direction: Direction },
    /// The hero was nudged sideways around a corner.
    Wiggled { direction: Direction },
    PushStarted { direction: Direction },
    BlockSlid { id: ObjectId, direction: Direction },
    JumpStarted { direction: Direction },
    JumpAborted,
    Landed { x: f32, y: f32 },
    Damaged { amount: u32 },
    /// The resolver rejected the move or hit a safety cap.
    ResolverFault { reason: String },
}
