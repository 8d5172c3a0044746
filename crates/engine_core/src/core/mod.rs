//! # Core Engine Module
//!
//! Application-level configuration shared by every boot step.
//!
//! ## Organization
//!
//! - **Config**: the [`ApplicationConfig`] record and its nested sections

pub mod config;

pub use config::{
    ApplicationConfig,
    EngineSettings,
    SystemLimits,
    WindowConfig,
    Config,
    ConfigError,
};
