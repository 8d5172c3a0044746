//! # Application Configuration
//!
//! Everything the boot sequencer needs from the application lives in a single
//! [`ApplicationConfig`]. Each boot step derives its subsystem's record from it
//! (see [`crate::systems::config`]).
//!
//! ## Configuration Categories
//!
//! - **Window**: initial position and size of the main window
//! - **Limits**: per-system capacity limits (shaders, textures, cameras, ...)
//! - **Fonts**: fonts loaded by the font system at boot
//! - **Render Views**: views materialized once the renderer is live
//! - **Engine**: log level, arena size, job lane cap

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub use crate::config::{Config, ConfigError};
use crate::foundation::memory::DEFAULT_ARENA_BYTES;
use crate::systems::config::{FontSystemConfig, RenderViewConfig};
use crate::systems::jobs::MAX_JOB_LANES;

/// # Window Configuration
///
/// Initial geometry of the main window created by the platform system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Initial x position
    pub x: i32,
    /// Initial y position
    pub y: i32,
    /// Initial width
    pub width: u32,
    /// Initial height
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            x: 100,
            y: 100,
            width: 1280,
            height: 720,
        }
    }
}

/// # System Limits
///
/// Capacity limits for the subsystems that pre-size their state blocks.
/// Each limit directly drives the footprint the owning system reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemLimits {
    /// Resource loaders
    pub max_loader_count: u32,
    /// Shaders
    pub max_shader_count: u32,
    /// Uniforms per shader
    pub max_uniform_count: u32,
    /// Global textures per shader
    pub max_global_textures: u32,
    /// Instance textures per shader
    pub max_instance_textures: u32,
    /// Textures
    pub max_texture_count: u32,
    /// Cameras
    pub max_camera_count: u32,
    /// Render views
    pub max_view_count: u32,
    /// Materials
    pub max_material_count: u32,
    /// Geometries
    pub max_geometry_count: u32,
}

impl Default for SystemLimits {
    fn default() -> Self {
        Self {
            max_loader_count: 32,
            max_shader_count: 1024,
            max_uniform_count: 128,
            max_global_textures: 31,
            max_instance_textures: 31,
            max_texture_count: 65536,
            max_camera_count: 61,
            max_view_count: 251,
            max_material_count: 4096,
            max_geometry_count: 4096,
        }
    }
}

/// # Engine Settings
///
/// Knobs for the systems manager itself rather than any one subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Default log level (overridden by `RUST_LOG`)
    pub log_level: String,
    /// Size of the arena shared by all subsystem state blocks
    pub systems_arena_bytes: usize,
    /// Upper bound on job scheduler worker lanes
    pub max_job_lanes: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            systems_arena_bytes: DEFAULT_ARENA_BYTES,
            max_job_lanes: MAX_JOB_LANES,
        }
    }
}

/// # Complete Application Configuration
///
/// Top-level configuration consumed by both boot phases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    /// Application name
    pub name: String,
    /// Main window geometry
    pub window: WindowConfig,
    /// Base path for asset lookups
    pub asset_base_path: String,
    /// Per-system capacity limits
    pub limits: SystemLimits,
    /// Font system configuration
    pub fonts: FontSystemConfig,
    /// Views created during post-boot, in order
    pub render_views: Vec<RenderViewConfig>,
    /// Systems manager settings
    pub engine: EngineSettings,
}

impl ApplicationConfig {
    /// Create a new application configuration with defaults
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            window: WindowConfig::default(),
            asset_base_path: "../assets".to_string(),
            limits: SystemLimits::default(),
            fonts: FontSystemConfig::default(),
            render_views: Vec::new(),
            engine: EngineSettings::default(),
        }
    }

    /// Set the initial window geometry
    pub fn with_window(mut self, x: i32, y: i32, width: u32, height: u32) -> Self {
        self.window = WindowConfig { x, y, width, height };
        self
    }

    /// Set the asset base path
    pub fn with_asset_base_path(mut self, path: impl Into<String>) -> Self {
        self.asset_base_path = path.into();
        self
    }

    /// Append a render view descriptor
    pub fn with_render_view(mut self, view: RenderViewConfig) -> Self {
        self.render_views.push(view);
        self
    }

    /// Set the size of the systems arena
    pub fn with_arena_bytes(mut self, bytes: usize) -> Self {
        self.engine.systems_arena_bytes = bytes;
        self
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.is_empty() {
            return Err(ConfigError::Invalid("Application name cannot be empty".to_string()));
        }

        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "Window size must be non-zero, got {}x{}",
                self.window.width, self.window.height
            )));
        }

        if self.engine.systems_arena_bytes == 0 {
            return Err(ConfigError::Invalid("Systems arena size must be non-zero".to_string()));
        }

        if self.engine.max_job_lanes == 0 || self.engine.max_job_lanes > MAX_JOB_LANES {
            return Err(ConfigError::Invalid(format!(
                "Job lane cap must be within 1..={}, got {}",
                MAX_JOB_LANES, self.engine.max_job_lanes
            )));
        }

        let mut names = HashSet::new();
        for view in &self.render_views {
            if !names.insert(view.name.as_str()) {
                return Err(ConfigError::Invalid(format!("Duplicate render view name '{}'", view.name)));
            }
        }

        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self::new("Engine Application")
    }
}

impl Config for ApplicationConfig {}
