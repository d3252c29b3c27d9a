//! Pixel-precise movement for actors on a 16×16 tile grid: one-way
//! ledges, diagonal ledges, hazards, pushing, jump-downs, and wiggle
//! correction around corners.

pub mod config;
pub mod domain;
pub mod sim;

pub use config::{Config, MotionConfig};
pub use domain::entity::{Action, Actor, Direction, MovementProperties, ObjectId, ObjectQuery, SolidObject};
pub use domain::error::MoveError;
pub use domain::geometry::Rect;
pub use domain::physics::MapView;
pub use domain::resolver::{resolve_movement, MoveOutcome};
pub use domain::rules::{can_move_down, can_move_left, can_move_right, can_move_up, StepCheck};
pub use domain::tile::{TileBehaviors, TileGrid};
