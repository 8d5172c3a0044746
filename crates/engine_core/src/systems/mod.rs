//! # Engine Systems
//!
//! The engine is built from a fixed set of subsystems, each identified by a
//! [`SystemType`]. The [`SystemsManager`] boots them in two ordered phases,
//! carves their private state out of one shared arena, ticks the ones that
//! ask for updates, and tears everything down in a fixed order.
//!
//! ## Subsystem contract
//!
//! A subsystem is anything implementing [`Subsystem`]. Every system except
//! memory also implements [`InitializeSystem`], which splits registration
//! into two steps:
//!
//! 1. [`InitializeSystem::required_size`] reports the state footprint. It
//!    takes `&self`, so it cannot change the system.
//! 2. [`InitializeSystem::initialize`] receives a zeroed block of exactly that
//!    many bytes from the arena and performs the real setup.
//!
//! The block stays owned by the registry for the rest of the process and is
//! handed back on every [`Subsystem::update`] and on [`Subsystem::shutdown`].

use std::any::Any;
use std::fmt;

pub mod catalog;
pub mod config;
pub mod error;
pub mod jobs;
pub mod manager;
pub mod registry;

#[cfg(test)]
pub(crate) mod test_support;

pub use catalog::SystemCatalog;
pub use error::SystemError;
pub use jobs::{JobSystemConfig, JobType};
pub use manager::{BootStage, MemoryReport, SystemsManager};
pub use registry::{SystemEntry, SystemRegistry};

use config::{PlatformConfig, RenderViewConfig, RenderViewSystemConfig, RendererConfig};

/// Identifier of a known engine subsystem
///
/// The discriminant doubles as the system's slot index in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum SystemType {
    /// Memory tracking
    Memory = 0,
    /// Developer console
    Console,
    /// Console variables
    Variables,
    /// Event dispatch
    Events,
    /// Log output
    Logging,
    /// Input state
    Input,
    /// Platform layer (window, clock, processor info)
    Platform,
    /// Resource loading
    Resource,
    /// Shader registry
    Shader,
    /// Renderer frontend
    Renderer,
    /// Job scheduler
    Job,
    /// Textures
    Texture,
    /// Fonts
    Font,
    /// Cameras
    Camera,
    /// Render views
    RenderView,
    /// Materials
    Material,
    /// Geometry
    Geometry,
}

impl SystemType {
    /// Number of known system types (size of the registry table)
    pub const COUNT: usize = 17;

    /// Every system type in slot order
    pub const ALL: [Self; Self::COUNT] = [
        Self::Memory,
        Self::Console,
        Self::Variables,
        Self::Events,
        Self::Logging,
        Self::Input,
        Self::Platform,
        Self::Resource,
        Self::Shader,
        Self::Renderer,
        Self::Job,
        Self::Texture,
        Self::Font,
        Self::Camera,
        Self::RenderView,
        Self::Material,
        Self::Geometry,
    ];

    /// Slot index of this type
    pub const fn index(self) -> usize {
        self as usize
    }

    /// System type stored at the given slot index
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Human-readable name
    pub const fn name(self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Console => "console",
            Self::Variables => "variables",
            Self::Events => "events",
            Self::Logging => "logging",
            Self::Input => "input",
            Self::Platform => "platform",
            Self::Resource => "resource",
            Self::Shader => "shader",
            Self::Renderer => "renderer",
            Self::Job => "job",
            Self::Texture => "texture",
            Self::Font => "font",
            Self::Camera => "camera",
            Self::RenderView => "render view",
            Self::Material => "material",
            Self::Geometry => "geometry",
        }
    }
}

impl fmt::Display for SystemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Upcast helper so registered systems can be recovered as their concrete type
pub trait AsAny: Any {
    /// Shared access as `dyn Any`
    fn as_any(&self) -> &dyn Any;
    /// Mutable access as `dyn Any`
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A registered engine subsystem
pub trait Subsystem: AsAny {
    /// Release everything the system owns inside `state`
    ///
    /// Called exactly once. Must not fail.
    fn shutdown(&mut self, state: &mut [u8]);

    /// Whether the system is polled every tick
    fn wants_update(&self) -> bool {
        false
    }

    /// Advance the system by one tick
    ///
    /// Only called when [`Subsystem::wants_update`] returned true at
    /// registration. Failures are logged and do not stop the tick.
    fn update(&mut self, _state: &mut [u8], _delta_time: f32) -> Result<(), SystemError> {
        Ok(())
    }
}

/// A subsystem that negotiates its state size before being initialized
pub trait InitializeSystem: Subsystem {
    /// Configuration handed to both registration steps
    type Config;

    /// Number of bytes of arena state the system needs for `config`
    fn required_size(&self, config: &Self::Config) -> Result<usize, SystemError>;

    /// Set the system up inside its freshly carved state block
    ///
    /// `state` is zero-filled and exactly [`InitializeSystem::required_size`]
    /// bytes long.
    fn initialize(&mut self, state: &mut [u8], config: &Self::Config) -> Result<(), SystemError>;
}

/// Platform layer capabilities queried during pre-boot
pub trait PlatformSystem: InitializeSystem<Config = PlatformConfig> {
    /// Logical processor count of the host
    fn processor_count(&self) -> usize;
}

/// Renderer capabilities queried during pre-boot
pub trait RendererSystem: InitializeSystem<Config = RendererConfig> {
    /// Whether the renderer backend accepts submissions from multiple threads
    fn is_multithreaded(&self) -> bool;
}

/// Render view system operations used during post-boot
pub trait RenderViewSystem: InitializeSystem<Config = RenderViewSystemConfig> {
    /// Create and register a view described by the application
    fn create_view(&mut self, state: &mut [u8], view: &RenderViewConfig) -> Result<(), SystemError>;
}
