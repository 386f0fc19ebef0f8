use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::caster::HitPolicy;
use crate::error::SettingsError;
use crate::projection::FishEye;

pub const SETTINGS_FILE: &str = "raycaster.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub window: WindowSettings,
    pub fan: FanSettings,
    pub projection: ProjectionSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub title: String,
    /// Size of each of the two views; the window holds both side by side.
    pub view_width: u32,
    pub view_height: u32,
    pub frame_rate: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FanSettings {
    pub ray_count: usize,
    pub fov_deg: f32,
    pub reach: f32,
    pub turn_step_deg: f32,
    pub start_x: f32,
    pub start_y: f32,
    pub start_heading_deg: f32,
    pub hit_policy: HitPolicy,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProjectionSettings {
    pub fish_eye: FishEye,
    pub depth_clamp: f32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "Raycasting".to_string(),
            view_width: 800,
            view_height: 600,
            frame_rate: 60,
        }
    }
}

impl Default for FanSettings {
    fn default() -> Self {
        Self {
            ray_count: 60,
            fov_deg: 60.0,
            reach: 300.0,
            turn_step_deg: 2.0,
            start_x: 100.0,
            start_y: 200.0,
            start_heading_deg: 0.0,
            hit_policy: HitPolicy::Nearest,
        }
    }
}

impl Default for ProjectionSettings {
    fn default() -> Self {
        Self {
            fish_eye: FishEye::Cosine,
            depth_clamp: 255.0,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window: WindowSettings::default(),
            fan: FanSettings::default(),
            projection: ProjectionSettings::default(),
        }
    }
}

impl Settings {
    /// Load `raycaster.toml` from the working directory, falling back to
    /// defaults when it is missing or broken.
    pub fn load() -> Self {
        let path = Path::new(SETTINGS_FILE);
        if !path.exists() {
            tracing::info!("No {SETTINGS_FILE} found, using default settings");
            return Settings::default();
        }
        match Self::from_file(path) {
            Ok(settings) => {
                tracing::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                tracing::warn!("Failed to load {}: {e}; using default settings", path.display());
                Settings::default()
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, SettingsError> {
        let settings: Settings = toml::from_str(contents)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let w = &self.window;
        if w.view_width == 0 || w.view_height == 0 {
            return Err(SettingsError::Invalid(format!(
                "view size must be non-zero, got {}x{}",
                w.view_width, w.view_height
            )));
        }
        if w.frame_rate == 0 {
            return Err(SettingsError::Invalid("frame_rate must be positive".into()));
        }
        if self.fan.ray_count == 0 {
            return Err(SettingsError::Invalid("ray_count must be positive".into()));
        }
        if !(self.fan.reach.is_finite() && self.fan.reach > 0.0) {
            return Err(SettingsError::Invalid(format!(
                "reach must be positive, got {}",
                self.fan.reach
            )));
        }
        if !(self.fan.fov_deg.is_finite() && (0.0..=360.0).contains(&self.fan.fov_deg)) {
            return Err(SettingsError::Invalid(format!(
                "fov_deg must be within 0..=360, got {}",
                self.fan.fov_deg
            )));
        }
        if !(self.projection.depth_clamp.is_finite() && self.projection.depth_clamp > 0.0) {
            return Err(SettingsError::Invalid(format!(
                "depth_clamp must be positive, got {}",
                self.projection.depth_clamp
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_layout() {
        let s = Settings::default();
        assert_eq!((s.window.view_width, s.window.view_height), (800, 600));
        assert_eq!(s.window.frame_rate, 60);
        assert_eq!(s.fan.ray_count, 60);
        assert_eq!(s.fan.reach, 300.0);
        assert_eq!(s.fan.hit_policy, HitPolicy::Nearest);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let s = Settings::from_toml(
            r#"
            [fan]
            ray_count = 120
            hit_policy = "first_in_order"

            [projection]
            fish_eye = "off"
            "#,
        )
        .unwrap();
        assert_eq!(s.fan.ray_count, 120);
        assert_eq!(s.fan.hit_policy, HitPolicy::FirstInOrder);
        assert_eq!(s.projection.fish_eye, FishEye::Off);
        assert_eq!(s.fan.reach, 300.0);
        assert_eq!(s.window.title, "Raycasting");
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            Settings::from_toml("[fan]\nray_count = 0\n"),
            Err(SettingsError::Invalid(_))
        ));
        assert!(matches!(
            Settings::from_toml("[window]\nframe_rate = 0\n"),
            Err(SettingsError::Invalid(_))
        ));
        assert!(matches!(
            Settings::from_toml("[fan]\nhit_policy = \"farthest\"\n"),
            Err(SettingsError::Toml(_))
        ));
    }
}
