//! Entities: directions, solid objects, movement capabilities, and the
//! moving actor with its push/jump state machine.

use super::action::JumpArc;
use super::geometry::Rect;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    /// Unit pixel step (screen coordinates, y grows downward).
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    /// The two perpendicular directions as (toward smaller, toward larger)
    /// lateral coordinate.
    pub fn laterals(self) -> (Direction, Direction) {
        if self.is_horizontal() {
            (Direction::Up, Direction::Down)
        } else {
            (Direction::Left, Direction::Right)
        }
    }

    /// Direction of a single-axis request. Diagonal or zero requests give `None`.
    pub fn of_request(dx: f32, dy: f32) -> Option<Direction> {
        match (dx != 0.0, dy != 0.0) {
            (true, false) => Some(if dx < 0.0 { Direction::Left } else { Direction::Right }),
            (false, true) => Some(if dy < 0.0 { Direction::Up } else { Direction::Down }),
            _ => None,
        }
    }

    pub fn horizontal(dx: f32) -> Direction {
        if dx < 0.0 { Direction::Left } else { Direction::Right }
    }

    pub fn vertical(dy: f32) -> Direction {
        if dy < 0.0 { Direction::Up } else { Direction::Down }
    }
}

// ══════════════════════════════════════════════════════════════
// Solid objects
// ══════════════════════════════════════════════════════════════

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct ObjectId(pub u32);

/// A non-tile collider: another actor, a block, a door.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct SolidObject {
    pub id: ObjectId,
    pub hitbox: Rect,
    pub solid: bool,
    pub pushable: bool,
}

/// A solid object found covering a queried pixel.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct ObjectHit {
    pub id: ObjectId,
    pub hitbox: Rect,
    pub pushable: bool,
}

/// Read-only view of the objects sharing the area with a moving actor.
pub trait ObjectQuery {
    /// First solid object covering pixel `(x, y)`, skipping `excluded`.
    fn solid_object_at(&self, x: i32, y: i32, excluded: &[ObjectId]) -> Option<ObjectHit>;
}

impl ObjectQuery for Vec<SolidObject> {
    fn solid_object_at(&self, x: i32, y: i32, excluded: &[ObjectId]) -> Option<ObjectHit> {
        self.iter()
            .filter(|o| o.solid && !excluded.contains(&o.id))
            .find(|o| o.hitbox.contains_pixel(x, y))
            .map(|o| ObjectHit { id: o.id, hitbox: o.hitbox, pushable: o.pushable })
    }
}

/// An area with no objects in it.
pub struct NoObjects;

impl ObjectQuery for NoObjects {
    fn solid_object_at(&self, _x: i32, _y: i32, _excluded: &[ObjectId]) -> Option<ObjectHit> {
        None
    }
}

// ══════════════════════════════════════════════════════════════
// Movement capabilities
// ══════════════════════════════════════════════════════════════

/// Per-actor capability flags. Supplied by the caller on every move.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MovementProperties {
    pub can_push: bool,
    pub can_fall: bool,
    pub can_swim: bool,
    pub can_climb: bool,
    pub can_wiggle: bool,
    pub can_jump: bool,
    pub can_cross_ledges: bool,
    /// Pixels outside this rectangle (grown by the padding) are blocked.
    pub bound_to_section: Option<Rect>,
    pub bound_to_section_padding: f32,
    /// Objects never treated as obstacles, normally the actor itself.
    pub excluded_objects: Vec<ObjectId>,
}

impl MovementProperties {
    /// Walks, wiggles around corners, pushes, and jumps ledges.
    pub fn walker() -> Self {
        MovementProperties {
            can_push: true,
            can_wiggle: true,
            can_jump: true,
            ..Default::default()
        }
    }

    /// Rigid: no correction, no pushing, no jumping.
    pub fn rigid() -> Self {
        MovementProperties::default()
    }

    pub fn excluding(mut self, id: ObjectId) -> Self {
        if !self.excluded_objects.contains(&id) {
            self.excluded_objects.push(id);
        }
        self
    }

    /// Is pixel `(x, y)` outside the section rectangle shrunk by the padding?
    pub fn outside_section(&self, x: i32, y: i32) -> bool {
        let Some(section) = self.bound_to_section else { return false };
        let pad = self.bound_to_section_padding;
        let (px, py) = (x as f32, y as f32);
        px < section.x + pad
            || py < section.y + pad
            || px >= section.x + section.w - pad
            || py >= section.y + section.h - pad
    }
}

// ══════════════════════════════════════════════════════════════
// Actor
// ══════════════════════════════════════════════════════════════

/// Exclusive actor action. `Pushing` and `JumpingDown` never overlap.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Action {
    Idle,
    Pushing(Direction),
    JumpingDown(JumpArc),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Actor {
    pub id: ObjectId,
    pub hitbox: Rect,
    /// Displacement achieved on the last frame.
    pub velocity: (f32, f32),
    pub facing: Direction,
    pub action: Action,
    /// Milliseconds spent in the current action.
    pub action_ms: u32,
    /// Milliseconds spent continuously blocked against a ledge drop.
    pub jump_charge_ms: u32,
    pub damage_taken: u32,
}

impl Actor {
    pub fn new(id: ObjectId, hitbox: Rect) -> Self {
        Actor {
            id,
            hitbox,
            velocity: (0.0, 0.0),
            facing: Direction::Down,
            action: Action::Idle,
            action_ms: 0,
            jump_charge_ms: 0,
            damage_taken: 0,
        }
    }

    /// Switch action; the action timer restarts only on an actual change.
    pub fn set_action(&mut self, action: Action) {
        if self.action != action {
            self.action = action;
            self.action_ms = 0;
        }
    }

    pub fn is_airborne(&self) -> bool {
        matches!(self.action, Action::JumpingDown(_))
    }

    pub fn is_pushing(&self) -> bool {
        matches!(self.action, Action::Pushing(_))
    }

    /// Collider view of this actor for other movers.
    pub fn as_object(&self) -> SolidObject {
        SolidObject { id: self.id, hitbox: self.hitbox, solid: true, pushable: false }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_direction() {
        assert_eq!(Direction::of_request(-1.5, 0.0), Some(Direction::Left));
        assert_eq!(Direction::of_request(0.0, 2.0), Some(Direction::Down));
        assert_eq!(Direction::of_request(1.0, 1.0), None);
        assert_eq!(Direction::of_request(0.0, 0.0), None);
    }

    #[test]
    fn laterals_order_small_then_large() {
        assert_eq!(Direction::Down.laterals(), (Direction::Left, Direction::Right));
        assert_eq!(Direction::Left.laterals(), (Direction::Up, Direction::Down));
    }

    #[test]
    fn object_query_skips_excluded_and_non_solid() {
        let objects = vec![
            SolidObject { id: ObjectId(1), hitbox: Rect::new(0.0, 0.0, 16.0, 16.0), solid: true, pushable: false },
            SolidObject { id: ObjectId(2), hitbox: Rect::new(0.0, 0.0, 16.0, 16.0), solid: false, pushable: true },
        ];
        assert_eq!(objects.solid_object_at(4, 4, &[]).map(|h| h.id), Some(ObjectId(1)));
        assert!(objects.solid_object_at(4, 4, &[ObjectId(1)]).is_none());
        assert!(objects.solid_object_at(16, 4, &[]).is_none());
    }

    #[test]
    fn section_padding_shrinks_bounds() {
        let mut props = MovementProperties::rigid();
        props.bound_to_section = Some(Rect::new(0.0, 0.0, 32.0, 32.0));
        assert!(!props.outside_section(31, 31));
        assert!(!props.outside_section(0, 0));
        assert!(props.outside_section(32, 0));
        assert!(props.outside_section(-1, 0));
        props.bound_to_section_padding = 4.0;
        assert!(!props.outside_section(4, 4));
        assert!(!props.outside_section(27, 27));
        assert!(props.outside_section(28, 10));
        assert!(props.outside_section(30, 10));
        assert!(props.outside_section(34, 10));
        assert!(props.outside_section(3, 10));
        assert!(props.outside_section(10, 3));
    }

    #[test]
    fn action_timer_resets_only_on_change() {
        let mut a = Actor::new(ObjectId(0), Rect::new(0.0, 0.0, 16.0, 16.0));
        a.set_action(Action::Pushing(Direction::Left));
        a.action_ms = 120;
        a.set_action(Action::Pushing(Direction::Left));
        assert_eq!(a.action_ms, 120);
        a.set_action(Action::Pushing(Direction::Up));
        assert_eq!(a.action_ms, 0);
    }
}
