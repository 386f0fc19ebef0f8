use std::time::{Duration, Instant};

use crate::caster::{Hit, HitPolicy, cast_fan};
use crate::geometry::Vec2;
use crate::projection::{Column, DistanceProfile, FishEye, Projection, distance_profile};
use crate::scene::Scene;
use crate::settings::Settings;
use crate::viewpoint::Viewpoint;

/// Everything the input side asks for during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    /// New viewpoint position in top-down view coordinates.
    pub pointer: Option<Vec2>,
    /// Net heading adjustment in turn steps, positive turns clockwise on screen.
    pub turn_steps: i32,
    pub quit: bool,
}

/// Per-session knobs for [`advance`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameConfig {
    pub policy: HitPolicy,
    pub fish_eye: FishEye,
    /// Radians per turn step.
    pub turn_step: f32,
    pub projection: Projection,
}

impl From<&Settings> for FrameConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            policy: settings.fan.hit_policy,
            fish_eye: settings.projection.fish_eye,
            turn_step: settings.fan.turn_step_deg.to_radians(),
            projection: Projection::new(
                settings.window.view_width,
                settings.window.view_height,
                settings.projection.depth_clamp,
            ),
        }
    }
}

/// What one tick hands to the renderer. Rebuilt from scratch every tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub hits: Vec<Option<Hit>>,
    pub profile: DistanceProfile,
    pub columns: Vec<Column>,
    pub running: bool,
}

/// Run one tick: apply input, recast the fan, project.
pub fn advance(
    scene: &Scene,
    viewpoint: &mut Viewpoint,
    input: &FrameInput,
    config: &FrameConfig,
) -> Frame {
    if let Some(p) = input.pointer {
        viewpoint.move_to(p.x, p.y);
    }
    // Directions are recomputed every tick, not only when turning
    viewpoint.rotate(input.turn_steps as f32 * config.turn_step);

    let hits = cast_fan(viewpoint.rays(), scene, config.policy);
    let profile = distance_profile(viewpoint, &hits, config.fish_eye);
    let columns = config.projection.columns(&profile);

    Frame {
        hits,
        profile,
        columns,
        running: !input.quit,
    }
}

/// Fixed-period scheduler. One update-and-render pass per tick; if the loop
/// falls behind, missed ticks are dropped rather than replayed.
#[derive(Debug, Clone, Copy)]
pub struct Ticker {
    period: Duration,
    next: Instant,
}

impl Ticker {
    pub fn new(frame_rate: u32, now: Instant) -> Self {
        let period = Duration::from_secs(1) / frame_rate.max(1);
        Self { period, next: now }
    }

    #[inline]
    pub fn period(&self) -> Duration {
        self.period
    }

    /// When the next tick is due.
    #[inline]
    pub fn deadline(&self) -> Instant {
        self.next
    }

    /// Returns true when a tick is due at `now` and schedules the next one.
    pub fn poll(&mut self, now: Instant) -> bool {
        if now < self.next {
            return false;
        }
        self.next += self.period;
        if self.next <= now {
            self.next = now + self.period;
        }
        true
    }
}
