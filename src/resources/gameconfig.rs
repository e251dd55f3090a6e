//! Game configuration resource.
//!
//! Manages settings loaded from an INI configuration file. Provides defaults
//! for safe startup and methods to load/save configuration.
//!
//! # Configuration File Format
//!
//! ```ini
//! [window]
//! width = 1280
//! height = 720
//! fullscreen = false
//! vsync = true
//! target_fps = 60
//!
//! [physics]
//! gravity_x = 0.0
//! gravity_y = -9.8
//! time_step = 0.016666668
//! velocity_iterations = 8
//! position_iterations = 2
//!
//! [car]
//! speed = 30.0
//! max_torque = 1500.0
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

use crate::resources::physicsworld::PhysicsSettings;

/// Default safe values for startup
const DEFAULT_WINDOW_WIDTH: u32 = 1280;
const DEFAULT_WINDOW_HEIGHT: u32 = 720;
const DEFAULT_TARGET_FPS: u32 = 60;
const DEFAULT_VSYNC: bool = true;
const DEFAULT_FULLSCREEN: bool = false;
const DEFAULT_CAR_SPEED: f32 = 30.0;
const DEFAULT_CAR_MAX_TORQUE: f32 = 1500.0;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

/// Game configuration resource.
///
/// Stores window settings, physics world parameters and car tuning.
#[derive(Resource, Debug, Clone)]
pub struct GameConfig {
    /// Window width in pixels.
    pub window_width: u32,
    /// Window height in pixels.
    pub window_height: u32,
    /// Target frames per second.
    pub target_fps: u32,
    /// Enable vertical sync.
    pub vsync: bool,
    /// Start in (windowed) fullscreen mode.
    pub fullscreen: bool,
    /// Parameters the physics world is built with.
    pub physics: PhysicsSettings,
    /// Wheel motor speed applied by the drive inputs, radians per second.
    pub car_speed: f32,
    /// Maximum torque of each wheel motor.
    pub car_max_torque: f32,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GameConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
            target_fps: DEFAULT_TARGET_FPS,
            vsync: DEFAULT_VSYNC,
            fullscreen: DEFAULT_FULLSCREEN,
            physics: PhysicsSettings::default(),
            car_speed: DEFAULT_CAR_SPEED,
            car_max_torque: DEFAULT_CAR_MAX_TORQUE,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;
        self.apply(&config);
        Ok(())
    }

    /// Load configuration from INI text.
    pub fn load_from_str(&mut self, text: &str) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .read(text.to_string())
            .map_err(|e| format!("Failed to parse config: {}", e))?;
        self.apply(&config);
        Ok(())
    }

    fn apply(&mut self, config: &Ini) {
        // [window] section
        if let Some(width) = config.getuint("window", "width").ok().flatten() {
            self.window_width = width as u32;
        }
        if let Some(height) = config.getuint("window", "height").ok().flatten() {
            self.window_height = height as u32;
        }
        if let Some(fps) = config.getuint("window", "target_fps").ok().flatten() {
            self.target_fps = fps as u32;
        }
        if let Some(vsync) = config.getbool("window", "vsync").ok().flatten() {
            self.vsync = vsync;
        }
        if let Some(fullscreen) = config.getbool("window", "fullscreen").ok().flatten() {
            self.fullscreen = fullscreen;
        }

        // [physics] section
        if let Some(gx) = config.getfloat("physics", "gravity_x").ok().flatten() {
            self.physics.gravity.x = gx as f32;
        }
        if let Some(gy) = config.getfloat("physics", "gravity_y").ok().flatten() {
            self.physics.gravity.y = gy as f32;
        }
        if let Some(step) = config.getfloat("physics", "time_step").ok().flatten() {
            if step > 0.0 {
                self.physics.time_step = step as f32;
            }
        }
        if let Some(it) = config
            .getuint("physics", "velocity_iterations")
            .ok()
            .flatten()
        {
            self.physics.velocity_iterations = it as usize;
        }
        if let Some(it) = config
            .getuint("physics", "position_iterations")
            .ok()
            .flatten()
        {
            self.physics.position_iterations = it as usize;
        }

        // [car] section
        if let Some(speed) = config.getfloat("car", "speed").ok().flatten() {
            self.car_speed = speed as f32;
        }
        if let Some(torque) = config.getfloat("car", "max_torque").ok().flatten() {
            self.car_max_torque = torque as f32;
        }

        info!(
            "Loaded config: {}x{} window, fps={}, vsync={}, fullscreen={}, gravity=({}, {}), step={:.4}",
            self.window_width,
            self.window_height,
            self.target_fps,
            self.vsync,
            self.fullscreen,
            self.physics.gravity.x,
            self.physics.gravity.y,
            self.physics.time_step
        );
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        // [window] section
        config.set("window", "width", Some(self.window_width.to_string()));
        config.set("window", "height", Some(self.window_height.to_string()));
        config.set("window", "target_fps", Some(self.target_fps.to_string()));
        config.set("window", "vsync", Some(self.vsync.to_string()));
        config.set("window", "fullscreen", Some(self.fullscreen.to_string()));

        // [physics] section
        config.set("physics", "gravity_x", Some(self.physics.gravity.x.to_string()));
        config.set("physics", "gravity_y", Some(self.physics.gravity.y.to_string()));
        config.set("physics", "time_step", Some(self.physics.time_step.to_string()));
        config.set(
            "physics",
            "velocity_iterations",
            Some(self.physics.velocity_iterations.to_string()),
        );
        config.set(
            "physics",
            "position_iterations",
            Some(self.physics.position_iterations.to_string()),
        );

        // [car] section
        config.set("car", "speed", Some(self.car_speed.to_string()));
        config.set("car", "max_torque", Some(self.car_max_torque.to_string()));

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }

    /// Get the window size.
    pub fn window_size(&self) -> (u32, u32) {
        (self.window_width, self.window_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_physics_defaults() {
        let config = GameConfig::new();
        assert_eq!(config.physics, PhysicsSettings::default());
        assert_eq!(config.car_speed, 30.0);
        assert_eq!(config.car_max_torque, 1500.0);
        assert_eq!(config.window_size(), (1280, 720));
    }

    #[test]
    fn test_load_from_str_overrides_present_keys() {
        let mut config = GameConfig::new();
        config
            .load_from_str(
                "[window]\nwidth = 800\nvsync = false\n\n[physics]\ngravity_y = -20\nvelocity_iterations = 6\n\n[car]\nspeed = 12.5\n",
            )
            .unwrap();
        assert_eq!(config.window_width, 800);
        assert_eq!(config.window_height, 720);
        assert!(!config.vsync);
        assert_eq!(config.physics.gravity.y, -20.0);
        assert_eq!(config.physics.gravity.x, 0.0);
        assert_eq!(config.physics.velocity_iterations, 6);
        assert_eq!(config.physics.position_iterations, 2);
        assert_eq!(config.car_speed, 12.5);
        assert_eq!(config.car_max_torque, 1500.0);
    }

    #[test]
    fn test_non_positive_time_step_is_ignored() {
        let mut config = GameConfig::new();
        config
            .load_from_str("[physics]\ntime_step = 0\n")
            .unwrap();
        assert_eq!(config.physics.time_step, 1.0 / 60.0);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let mut config = GameConfig::with_path("./does/not/exist.ini");
        assert!(config.load_from_file().is_err());
        assert_eq!(config.car_speed, 30.0);
    }
}
