//! Translation of raw frame input into world commands.

use labyrinth_core::{Command, Event, Heading, MovementIntent};
use labyrinth_rendering::{FrameInput, Key, KeyEvent};

/// Maps keyboard transitions and pointer travel onto world commands.
///
/// Movement keys become edge-triggered [`Command::SetIntent`] updates in the
/// order they arrived. Space or a click latches a single [`Command::Start`]
/// that is emitted at most once per session. Horizontal pointer travel
/// accumulates into the look yaw, which snaps back to the default heading
/// whenever a new level is loaded.
#[derive(Debug)]
pub struct InputAdapter {
    mouse_sensitivity: f32,
    yaw: f32,
    start_pending: bool,
    start_sent: bool,
}

impl InputAdapter {
    /// Creates an adapter that turns `mouse_sensitivity` radians per pixel.
    #[must_use]
    pub fn new(mouse_sensitivity: f32) -> Self {
        Self {
            mouse_sensitivity,
            yaw: Heading::default().yaw(),
            start_pending: false,
            start_sent: false,
        }
    }

    /// Current accumulated look yaw in radians.
    #[must_use]
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Translates one frame of input, appending commands to `out`.
    pub fn translate(&mut self, input: &FrameInput, out: &mut Vec<Command>) {
        for event in &input.keys {
            self.register_key(*event, out);
        }
        if input.start_requested {
            self.register_start_request();
        }
        if let Some(command) = self.take_start_request() {
            out.push(command);
        }

        if input.pointer_yaw_delta != 0.0 {
            self.yaw -= input.pointer_yaw_delta * self.mouse_sensitivity;
            out.push(Command::SetHeading {
                heading: Heading::from_yaw(self.yaw),
            });
        }
    }

    /// Observes world events so the look yaw follows level resets.
    pub fn handle(&mut self, events: &[Event]) {
        for event in events {
            if let Event::LevelLoaded { .. } = event {
                self.yaw = Heading::default().yaw();
            }
        }
    }

    fn register_key(&mut self, event: KeyEvent, out: &mut Vec<Command>) {
        if event.key == Key::Space {
            if event.pressed {
                self.register_start_request();
            }
            return;
        }

        if let Some(intent) = intent_for(event.key) {
            out.push(Command::SetIntent {
                intent,
                held: event.pressed,
            });
        }
    }

    fn register_start_request(&mut self) {
        if !self.start_sent {
            self.start_pending = true;
        }
    }

    fn take_start_request(&mut self) -> Option<Command> {
        if !self.start_pending {
            return None;
        }
        self.start_pending = false;
        self.start_sent = true;
        Some(Command::Start)
    }
}

fn intent_for(key: Key) -> Option<MovementIntent> {
    match key {
        Key::W => Some(MovementIntent::Forward),
        Key::S => Some(MovementIntent::Backward),
        Key::A => Some(MovementIntent::Left),
        Key::D => Some(MovementIntent::Right),
        Key::Space | Key::Other => None,
    }
}
