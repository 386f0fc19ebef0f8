//! 2D raycasting visualizer: a viewpoint casts a fan of rays into a set of
//! wall segments and the per-ray hit distances drive a pseudo-3D strip view.

pub mod caster;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod input;
pub mod projection;
pub mod ray;
pub mod renderer;
pub mod scaler;
pub mod scene;
pub mod settings;
pub mod viewpoint;

pub use caster::{Hit, HitPolicy, cast, cast_all, cast_fan};
pub use error::{BackendError, GeometryError, RunError, SettingsError};
pub use frame::{Frame, FrameConfig, FrameInput, Ticker, advance};
pub use geometry::{Vec2, distance};
pub use projection::{Column, DistanceProfile, FishEye, Projection};
pub use ray::Ray;
pub use scene::{Scene, Segment};
pub use settings::Settings;
pub use viewpoint::Viewpoint;
