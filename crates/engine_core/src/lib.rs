//! # Engine Core
//!
//! Subsystem lifecycle management for a real-time game engine.
//!
//! ## Features
//!
//! - **Two-Phase Boot**: foundational systems first, renderer-dependent systems
//!   once the graphics context exists
//! - **Arena-Backed State**: every system's private state lives in one
//!   bump-allocated region, sized by the system itself
//! - **Job Lane Partitioning**: worker lanes derived from the host's threads and
//!   the renderer's capabilities
//! - **Ordered Shutdown**: a fixed teardown order that tolerates partial boots
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use engine_core::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ApplicationConfig::load_from_file("app.toml")?;
//!     engine_core::foundation::logging::init_from_settings(&config.engine);
//!
//!     let mut catalog = MyCatalog::new();
//!     let mut systems = SystemsManager::from_config(&config);
//!     systems.initialize(&config, &mut catalog)?;
//!
//!     // ... create the window and graphics context ...
//!
//!     systems.post_boot_initialize(&config, &mut catalog)?;
//!     loop {
//!         systems.update(1.0 / 60.0)?;
//!     }
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod core;
pub mod foundation;
pub mod systems;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        core::config::{ApplicationConfig, Config, ConfigError, EngineSettings, SystemLimits, WindowConfig},
        foundation::memory::{ArenaBlock, SystemArena},
        systems::{
            config::{FontSystemConfig, RenderPassConfig, RenderViewConfig, RenderViewType},
            BootStage, InitializeSystem, JobSystemConfig, JobType, PlatformSystem, RenderViewSystem,
            RendererSystem, Subsystem, SystemCatalog, SystemError, SystemType, SystemsManager,
        },
    };
}
