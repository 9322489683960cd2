//! Table settings
//!
//! Persisted in LocalStorage on the web; read from the JSON file named by
//! `BILLIARDS_SETTINGS` on native. Missing fields take their defaults.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::{Arena, Response, SimParams};

/// Ball-ball collision response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CollisionModel {
    /// Exchange velocities and push apart immediately
    #[default]
    VelocitySwap,
    /// Soft push spread over several ticks
    SpringImpulse,
}

impl CollisionModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollisionModel::VelocitySwap => "velocity_swap",
            CollisionModel::SpringImpulse => "spring_impulse",
        }
    }
}

impl fmt::Display for CollisionModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CollisionModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "velocity_swap" | "swap" => Ok(CollisionModel::VelocitySwap),
            "spring_impulse" | "spring" => Ok(CollisionModel::SpringImpulse),
            other => Err(format!("unknown collision model '{}'", other)),
        }
    }
}

/// Failure to read settings
#[derive(Debug)]
pub enum SettingsError {
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Io(e) => write!(f, "cannot read settings: {}", e),
            SettingsError::Parse(e) => write!(f, "invalid settings JSON: {}", e),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Io(e) => Some(e),
            SettingsError::Parse(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for SettingsError {
    fn from(e: std::io::Error) -> Self {
        SettingsError::Io(e)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(e: serde_json::Error) -> Self {
        SettingsError::Parse(e)
    }
}

/// Table settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Arena ===
    pub arena_width: f32,
    pub arena_height: f32,

    // === Timing ===
    /// Simulation ticks per second
    pub tick_rate_hz: f32,
    /// Catch-up ticks allowed per frame
    pub max_substeps: u32,

    // === Physics ===
    /// Wall bounce restitution (0.0 - 1.0)
    pub wall_restitution: f32,
    pub collision_model: CollisionModel,
    /// Only used by the spring model
    pub spring_stiffness: f32,

    // === Interaction ===
    /// Throw velocity is pull-back divided by this
    pub throw_time_constant: f32,
    /// Colors offered by the swatch menu and used for racking
    pub palette: Vec<String>,

    // === Rack ===
    pub rack_layers: u32,
    pub rack_radii: Vec<f32>,
    /// Fixed seed for rack colors (random per start when absent)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,

            tick_rate_hz: TICK_RATE_HZ,
            max_substeps: MAX_SUBSTEPS,

            wall_restitution: WALL_RESTITUTION,
            collision_model: CollisionModel::VelocitySwap,
            spring_stiffness: SPRING_STIFFNESS,

            throw_time_constant: THROW_TIME_CONSTANT,
            palette: PALETTE.iter().map(|c| c.to_string()).collect(),

            rack_layers: RACK_LAYERS,
            rack_radii: RACK_RADII.to_vec(),
            seed: None,
        }
    }
}

impl Settings {
    /// Env var naming the native settings file
    pub const ENV_VAR: &'static str = "BILLIARDS_SETTINGS";

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "billiards_settings";

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Problems with the current values, one line each
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if !(self.arena_width.is_finite() && self.arena_width > 0.0)
            || !(self.arena_height.is_finite() && self.arena_height > 0.0)
        {
            warnings.push(format!(
                "arena must be positive, got {}x{}",
                self.arena_width, self.arena_height
            ));
        }
        if !(self.tick_rate_hz.is_finite() && self.tick_rate_hz > 0.0) {
            warnings.push(format!("tick_rate_hz must be positive, got {}", self.tick_rate_hz));
        }
        if self.max_substeps == 0 {
            warnings.push("max_substeps must be at least 1".to_string());
        }
        if !(0.0..=1.0).contains(&self.wall_restitution) {
            warnings.push(format!("wall_restitution {} outside [0, 1]", self.wall_restitution));
        }
        if !(self.spring_stiffness.is_finite() && self.spring_stiffness >= 0.0) {
            warnings.push(format!("spring_stiffness must be >= 0, got {}", self.spring_stiffness));
        }
        if !(self.throw_time_constant.is_finite() && self.throw_time_constant > 0.0) {
            warnings.push(format!(
                "throw_time_constant must be positive, got {}",
                self.throw_time_constant
            ));
        }
        if self.palette.is_empty() {
            warnings.push("palette is empty".to_string());
        }
        if self.rack_radii.iter().any(|r| !(r.is_finite() && *r > 0.0)) {
            warnings.push("rack_radii must all be positive".to_string());
        }
        warnings
    }

    /// Replace every invalid value with its default
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        for warning in self.validate() {
            log::warn!("Settings: {}", warning);
        }

        if !(self.arena_width.is_finite() && self.arena_width > 0.0)
            || !(self.arena_height.is_finite() && self.arena_height > 0.0)
        {
            self.arena_width = defaults.arena_width;
            self.arena_height = defaults.arena_height;
        }
        if !(self.tick_rate_hz.is_finite() && self.tick_rate_hz > 0.0) {
            self.tick_rate_hz = defaults.tick_rate_hz;
        }
        self.max_substeps = self.max_substeps.max(1);
        self.wall_restitution = if self.wall_restitution.is_nan() {
            defaults.wall_restitution
        } else {
            self.wall_restitution.clamp(0.0, 1.0)
        };
        if !(self.spring_stiffness.is_finite() && self.spring_stiffness >= 0.0) {
            self.spring_stiffness = defaults.spring_stiffness;
        }
        if !(self.throw_time_constant.is_finite() && self.throw_time_constant > 0.0) {
            self.throw_time_constant = defaults.throw_time_constant;
        }
        if self.palette.is_empty() {
            self.palette = defaults.palette;
        }
        self.rack_radii.retain(|r| r.is_finite() && *r > 0.0);
        if self.rack_radii.is_empty() {
            self.rack_radii = defaults.rack_radii;
        }
        self
    }

    pub fn arena(&self) -> Arena {
        Arena::new(self.arena_width, self.arena_height)
    }

    pub fn sim_params(&self) -> SimParams {
        let response = match self.collision_model {
            CollisionModel::VelocitySwap => Response::VelocitySwap,
            CollisionModel::SpringImpulse => Response::SpringImpulse {
                stiffness: self.spring_stiffness,
            },
        };
        SimParams {
            restitution: self.wall_restitution,
            response,
        }
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings.sanitized();
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            match self.to_json() {
                Ok(json) => match storage.set_item(Self::STORAGE_KEY, &json) {
                    Ok(()) => log::info!("Settings saved"),
                    Err(e) => log::warn!("Cannot save settings: {:?}", e),
                },
                Err(e) => log::warn!("Cannot encode settings: {}", e),
            }
        }
    }

    /// Load settings from the file named by `BILLIARDS_SETTINGS`
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let Ok(path) = std::env::var(Self::ENV_VAR) else {
            log::info!("Using default settings");
            return Self::default();
        };

        match Self::load_from_file(&path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path);
                settings.sanitized()
            }
            Err(e) => {
                log::warn!("{} ({}), using defaults", e, path);
                Self::default()
            }
        }
    }
}
