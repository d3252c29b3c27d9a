//! Keyboard state for the sandbox.
//!
//! Movement keys are level-triggered (held keys keep moving, two held
//! axes move diagonally). Commands are edge-triggered on the press.
//!
//! Terminals that do not report key releases fall back to a hold
//! timeout: a key counts as held until `HOLD_TIMEOUT` passes without a
//! press or repeat. Explicit releases end the hold at once.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{self, poll, Event, KeyCode, KeyEventKind, KeyModifiers};

use ledgewalk::sim::step::FrameInput;

const HOLD_TIMEOUT: Duration = Duration::from_millis(160);

const UP_KEYS: [KeyCode; 3] = [KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const DOWN_KEYS: [KeyCode; 3] = [KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const LEFT_KEYS: [KeyCode; 3] = [KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const RIGHT_KEYS: [KeyCode; 3] = [KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    Quit,
    Restart,
}

pub struct InputState {
    last_active: HashMap<KeyCode, Instant>,
    commands: Vec<Command>,
}

impl InputState {
    pub fn new() -> Self {
        InputState { last_active: HashMap::with_capacity(8), commands: Vec::with_capacity(2) }
    }

    /// Drain pending terminal events. Call once per frame before stepping.
    pub fn drain_events(&mut self) {
        self.commands.clear();

        while poll(Duration::ZERO).unwrap_or(false) {
            let Ok(Event::Key(key)) = event::read() else { continue };
            match key.kind {
                KeyEventKind::Release => {
                    self.last_active.remove(&key.code);
                }
                KeyEventKind::Press => {
                    self.last_active.insert(key.code, Instant::now());
                    let ctrl_c = key.modifiers.contains(KeyModifiers::CONTROL)
                        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'));
                    match key.code {
                        _ if ctrl_c => self.commands.push(Command::Quit),
                        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => self.commands.push(Command::Quit),
                        KeyCode::Char('r') | KeyCode::Char('R') => self.commands.push(Command::Restart),
                        _ => {}
                    }
                }
                KeyEventKind::Repeat => {
                    self.last_active.insert(key.code, Instant::now());
                }
            }
        }

        let now = Instant::now();
        self.last_active.retain(|_, t| now.duration_since(*t) < HOLD_TIMEOUT);
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    fn any_held(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.last_active.contains_key(c))
    }

    /// Held movement keys as a per-axis direction. Opposite keys cancel.
    pub fn frame_input(&self) -> FrameInput {
        let axis = |neg: &[KeyCode], pos: &[KeyCode]| -> i8 {
            self.any_held(pos) as i8 - self.any_held(neg) as i8
        };
        FrameInput { x: axis(&LEFT_KEYS, &RIGHT_KEYS), y: axis(&UP_KEYS, &DOWN_KEYS) }
    }
}
