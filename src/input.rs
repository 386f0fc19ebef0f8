use winit::keyboard::KeyCode;

use crate::frame::FrameInput;
use crate::geometry::Vec2;

/// Discrete request decoded from a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    TurnLeft,
    TurnRight,
    Quit,
}

pub fn key_action(code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::ArrowLeft => Some(Action::TurnLeft),
        KeyCode::ArrowRight => Some(Action::TurnRight),
        KeyCode::Escape => Some(Action::Quit),
        _ => None,
    }
}

/// Collects input events between ticks.
#[derive(Debug, Default)]
pub struct InputState {
    pointer: Option<Vec2>,
    turn_steps: i32,
    quit: bool,
}

impl InputState {
    pub fn pointer_moved(&mut self, p: Vec2) {
        self.pointer = Some(p);
    }

    pub fn apply(&mut self, action: Action) {
        match action {
            Action::TurnLeft => self.turn_steps -= 1,
            Action::TurnRight => self.turn_steps += 1,
            Action::Quit => self.quit = true,
        }
    }

    pub fn request_quit(&mut self) {
        self.quit = true;
    }

    /// Drain what happened since the last tick. Quit stays latched.
    pub fn take(&mut self) -> FrameInput {
        FrameInput {
            pointer: self.pointer.take(),
            turn_steps: std::mem::take(&mut self.turn_steps),
            quit: self.quit,
        }
    }
}

/// Map a window pixel to top-down view coordinates.
///
/// The window shows the internal framebuffer stretched to fit, with the
/// top-down view in its left `view` sized part. Points outside that view are
/// clamped onto its edge.
pub fn window_to_view(
    px: f64,
    py: f64,
    window: (u32, u32),
    fb: (usize, usize),
    view: (u32, u32),
) -> Vec2 {
    let (ww, wh) = (window.0.max(1) as f64, window.1.max(1) as f64);
    let fx = px * fb.0 as f64 / ww;
    let fy = py * fb.1 as f64 / wh;

    let max_x = view.0.saturating_sub(1) as f64;
    let max_y = view.1.saturating_sub(1) as f64;
    Vec2::new(fx.clamp(0.0, max_x) as f32, fy.clamp(0.0, max_y) as f32)
}
