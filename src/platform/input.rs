//! Keyboard state
//!
//! Keys are tracked by physical code (`KeyboardEvent.code`) so WASD works on
//! any layout. Directions and jump are level-triggered; start, pause and
//! restart are one-shots that survive until the next tick consumes them.

use std::collections::HashSet;

use crate::sim::TickInput;

/// Held keys plus pending one-shot actions
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: HashSet<String>,
    start: bool,
    pause: bool,
    restart: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Any key dismisses the menu; Escape pauses; R restarts after game over
    pub fn key_down(&mut self, code: &str) {
        self.start = true;
        match code {
            "Escape" => self.pause = true,
            "KeyR" => self.restart = true,
            _ => {}
        }
        self.held.insert(code.to_owned());
    }

    pub fn key_up(&mut self, code: &str) {
        self.held.remove(code);
    }

    /// Queue a pause toggle from outside the keyboard (tab hidden, blur)
    pub fn request_pause(&mut self) {
        self.pause = true;
    }

    /// Drop held keys, e.g. when focus is lost and key-ups will never arrive
    pub fn release_all(&mut self) {
        self.held.clear();
    }

    fn any(&self, codes: &[&str]) -> bool {
        codes.iter().any(|c| self.held.contains(*c))
    }

    /// Snapshot for this frame's tick
    pub fn tick_input(&self) -> TickInput {
        TickInput {
            left: self.any(&["ArrowLeft", "KeyA"]),
            right: self.any(&["ArrowRight", "KeyD"]),
            up: self.any(&["ArrowUp", "KeyW"]),
            down: self.any(&["ArrowDown", "KeyS"]),
            jump: self.any(&["Space"]),
            start: self.start,
            pause: self.pause,
            restart: self.restart,
        }
    }

    /// Clear one-shot inputs after processing
    pub fn clear_actions(&mut self) {
        self.start = false;
        self.pause = false;
        self.restart = false;
    }
}
