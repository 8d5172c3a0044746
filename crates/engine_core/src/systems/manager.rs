//! Systems manager: boot sequencing, per-tick updates and shutdown
//!
//! Boot happens in two phases. Pre-boot brings up the foundational systems up
//! to and including the renderer and the job scheduler. Post-boot runs once the
//! application has a live graphics context and brings up everything that
//! needs the renderer. Both phases are fail-fast: the first failing step
//! aborts the phase and nothing after it runs.
//!
//! The order of each phase, and of shutdown, is fixed. Shutdown is not a
//! mirror of boot (shaders, for instance, boot before the renderer but are
//! torn down before it too), so the three orders are spelled out below.

use std::fmt;

use super::catalog::SystemCatalog;
use super::config::{
    CameraSystemConfig, GeometrySystemConfig, MaterialSystemConfig, PlatformConfig, RenderViewSystemConfig,
    RendererConfig, ResourceConfig, ShaderSystemConfig, TextureSystemConfig,
};
use super::jobs::{partition_job_lanes, JobSystemConfig};
use super::registry::SystemRegistry;
use super::{PlatformSystem, RenderViewSystem, RendererSystem, SystemError, SystemType};
use crate::core::config::ApplicationConfig;

/// Registration order of the pre-boot phase
pub const PRE_BOOT_ORDER: [SystemType; 11] = [
    SystemType::Memory,
    SystemType::Console,
    SystemType::Variables,
    SystemType::Events,
    SystemType::Logging,
    SystemType::Input,
    SystemType::Platform,
    SystemType::Resource,
    SystemType::Shader,
    SystemType::Renderer,
    SystemType::Job,
];

/// Registration order of the post-boot phase
pub const POST_BOOT_ORDER: [SystemType; 6] = [
    SystemType::Texture,
    SystemType::Font,
    SystemType::Camera,
    SystemType::RenderView,
    SystemType::Material,
    SystemType::Geometry,
];

/// Order in which systems are shut down
pub const SHUTDOWN_ORDER: [SystemType; SystemType::COUNT] = [
    SystemType::Camera,
    SystemType::Font,
    SystemType::RenderView,
    SystemType::Geometry,
    SystemType::Material,
    SystemType::Texture,
    SystemType::Job,
    SystemType::Shader,
    SystemType::Renderer,
    SystemType::Resource,
    SystemType::Platform,
    SystemType::Input,
    SystemType::Logging,
    SystemType::Events,
    SystemType::Variables,
    SystemType::Console,
    SystemType::Memory,
];

/// Lifecycle stage of the systems manager
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootStage {
    /// Nothing registered yet
    Uninitialized,
    /// Pre-boot phase completed
    PreBooted,
    /// Both phases completed
    Booted,
    /// A boot phase failed; only shutdown is allowed
    Failed,
    /// Every system has been shut down
    ShutDown,
}

impl fmt::Display for BootStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Uninitialized => "uninitialized",
            Self::PreBooted => "pre-booted",
            Self::Booted => "booted",
            Self::Failed => "failed",
            Self::ShutDown => "shut down",
        })
    }
}

/// Snapshot of how the systems arena is used
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryReport {
    /// Arena capacity in bytes
    pub capacity: usize,
    /// Bytes handed out
    pub used: usize,
    /// Reported state size of each registered system, in type-id order
    pub systems: Vec<(SystemType, usize)>,
}

impl MemoryReport {
    /// Bytes still available
    pub const fn remaining(&self) -> usize {
        self.capacity - self.used
    }
}

impl fmt::Display for MemoryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Systems arena: {} used of {} ({} free)",
            format_bytes(self.used),
            format_bytes(self.capacity),
            format_bytes(self.remaining())
        )?;
        for (system, size) in &self.systems {
            writeln!(f, "  {:<12} {:>12}", system.name(), format_bytes(*size))?;
        }
        Ok(())
    }
}

#[allow(clippy::cast_precision_loss)]
fn format_bytes(bytes: usize) -> String {
    const KIB: f64 = 1024.0;
    const MIB: f64 = KIB * 1024.0;
    const GIB: f64 = MIB * 1024.0;

    let value = bytes as f64;
    if value >= GIB {
        format!("{:.2} GiB", value / GIB)
    } else if value >= MIB {
        format!("{:.2} MiB", value / MIB)
    } else if value >= KIB {
        format!("{:.2} KiB", value / KIB)
    } else {
        format!("{bytes} B")
    }
}

/// Owns every engine subsystem for the lifetime of the process
///
/// Not thread-safe by design: boot, update and shutdown all run on the main
/// thread.
pub struct SystemsManager {
    registry: SystemRegistry,
    stage: BootStage,
    job_config: Option<JobSystemConfig>,
}

impl SystemsManager {
    /// Create a manager sized by the application's engine settings
    ///
    /// The arena is sized from `app.engine.systems_arena_bytes`, the same
    /// field pre-boot validates, so boot must be driven with this `app`.
    pub fn from_config(app: &ApplicationConfig) -> Self {
        Self {
            registry: SystemRegistry::new(app.engine.systems_arena_bytes),
            stage: BootStage::Uninitialized,
            job_config: None,
        }
    }

    /// Run the pre-boot phase
    ///
    /// Registers memory, console, variables, events, logging, input,
    /// platform, resource, shader, renderer and job systems, in that order.
    pub fn initialize<C: SystemCatalog>(
        &mut self,
        app: &ApplicationConfig,
        catalog: &mut C,
    ) -> Result<(), SystemError> {
        self.expect_stage("run pre-boot", &[BootStage::Uninitialized])?;
        log::info!("Pre-boot: registering foundational systems...");

        let result = self.register_known_systems_pre_boot(app, catalog);
        self.finish_phase(result, BootStage::PreBooted, "Pre-boot")
    }

    /// Run the post-boot phase
    ///
    /// Only valid after a successful pre-boot, once the application's
    /// graphics context is ready. Registers texture, font, camera, render
    /// view, material and geometry systems, creating every configured render
    /// view right after the render view system comes up.
    pub fn post_boot_initialize<C: SystemCatalog>(
        &mut self,
        app: &ApplicationConfig,
        catalog: &mut C,
    ) -> Result<(), SystemError> {
        self.expect_stage("run post-boot", &[BootStage::PreBooted])?;
        log::info!("Post-boot: registering renderer-dependent systems...");

        let result = self.register_known_systems_post_boot(app, catalog);
        self.finish_phase(result, BootStage::Booted, "Post-boot")
    }

    fn finish_phase(
        &mut self,
        result: Result<(), SystemError>,
        next: BootStage,
        phase: &str,
    ) -> Result<(), SystemError> {
        match result {
            Ok(()) => {
                self.stage = next;
                log::info!("{} complete ({} systems registered)", phase, self.registry.registered_count());
                Ok(())
            }
            Err(e) => {
                self.stage = BootStage::Failed;
                log::error!("{} failed: {}", phase, e);
                Err(e)
            }
        }
    }

    fn register_known_systems_pre_boot<C: SystemCatalog>(
        &mut self,
        app: &ApplicationConfig,
        catalog: &mut C,
    ) -> Result<(), SystemError> {
        app.validate()?;
        let registry = &mut self.registry;

        registry.register_without_initialize(SystemType::Memory, catalog.memory())?;
        registry.register(SystemType::Console, catalog.console(), &())?;
        registry.register(SystemType::Variables, catalog.variables(), &())?;
        registry.register(SystemType::Events, catalog.events(), &())?;
        registry.register(SystemType::Logging, catalog.logging(), &())?;
        registry.register(SystemType::Input, catalog.input(), &())?;
        registry.register(SystemType::Platform, catalog.platform(), &PlatformConfig::from(app))?;
        registry.register(SystemType::Resource, catalog.resource(), &ResourceConfig::from(app))?;
        registry.register(SystemType::Shader, catalog.shader(), &ShaderSystemConfig::from(app))?;
        registry.register(SystemType::Renderer, catalog.renderer(), &RendererConfig::from(app))?;

        // Lane layout depends on both the host and the live renderer
        let renderer_multithreaded = registry
            .system::<C::Renderer>(SystemType::Renderer)
            .map(RendererSystem::is_multithreaded)
            .ok_or(SystemError::NotRegistered(SystemType::Renderer))?;
        let hardware_threads = registry
            .system::<C::Platform>(SystemType::Platform)
            .map(PlatformSystem::processor_count)
            .ok_or(SystemError::NotRegistered(SystemType::Platform))?;

        let job_config = partition_job_lanes(hardware_threads, renderer_multithreaded, app.engine.max_job_lanes)?;
        registry.register(SystemType::Job, catalog.job(), &job_config)?;
        self.job_config = Some(job_config);

        Ok(())
    }

    fn register_known_systems_post_boot<C: SystemCatalog>(
        &mut self,
        app: &ApplicationConfig,
        catalog: &mut C,
    ) -> Result<(), SystemError> {
        let registry = &mut self.registry;

        registry.register(SystemType::Texture, catalog.texture(), &TextureSystemConfig::from(app))?;
        registry.register(SystemType::Font, catalog.font(), &app.fonts)?;
        registry.register(SystemType::Camera, catalog.camera(), &CameraSystemConfig::from(app))?;
        registry.register(SystemType::RenderView, catalog.render_view(), &RenderViewSystemConfig::from(app))?;

        for view in &app.render_views {
            registry
                .with_system_mut::<C::RenderView, _>(SystemType::RenderView, |system, state| {
                    system.create_view(state, view)
                })
                .ok_or(SystemError::NotRegistered(SystemType::RenderView))?
                .map_err(|e| {
                    log::error!("Failed to create view '{}'. Aborting application.", view.name);
                    SystemError::ViewCreationFailed {
                        view: view.name.clone(),
                        reason: e.to_string(),
                    }
                })?;
            log::debug!("Created render view '{}'", view.name);
        }

        registry.register(SystemType::Material, catalog.material(), &MaterialSystemConfig::from(app))?;
        registry.register(SystemType::Geometry, catalog.geometry(), &GeometrySystemConfig::from(app))?;

        Ok(())
    }

    /// Tick every system that asked for updates
    ///
    /// Individual failures are logged and never fail the tick.
    pub fn update(&mut self, delta_time: f32) -> Result<(), SystemError> {
        self.expect_stage("update systems", &[BootStage::PreBooted, BootStage::Booted])?;

        let failures = self.registry.update_all(delta_time);
        if !failures.is_empty() {
            log::trace!("{} system update(s) failed this tick", failures.len());
        }
        Ok(())
    }

    /// Shut every registered system down in the fixed shutdown order
    ///
    /// Slots that were never populated (for example after a failed boot) are
    /// skipped. The arena is released after the memory system has shut down.
    /// Calling this more than once is a no-op.
    pub fn shutdown(&mut self) {
        if self.stage == BootStage::ShutDown {
            return;
        }
        log::info!("Shutting down systems...");

        for system_type in SHUTDOWN_ORDER {
            if !self.registry.shutdown_system(system_type) {
                log::debug!("{} system was never registered, skipping shutdown", system_type);
            }
        }

        self.registry.reset_arena();
        self.job_config = None;
        self.stage = BootStage::ShutDown;
        log::info!("Systems shutdown complete");
    }

    fn expect_stage(&self, operation: &'static str, allowed: &[BootStage]) -> Result<(), SystemError> {
        if allowed.contains(&self.stage) {
            Ok(())
        } else {
            Err(SystemError::InvalidBootStage {
                operation,
                stage: self.stage,
            })
        }
    }

    /// Current lifecycle stage
    pub const fn stage(&self) -> BootStage {
        self.stage
    }

    /// The system registry
    pub const fn registry(&self) -> &SystemRegistry {
        &self.registry
    }

    /// Mutable access to the system registry
    pub fn registry_mut(&mut self) -> &mut SystemRegistry {
        &mut self.registry
    }

    /// Lane layout handed to the job system during pre-boot
    pub const fn job_config(&self) -> Option<&JobSystemConfig> {
        self.job_config.as_ref()
    }

    /// Current arena usage, broken down per system
    pub fn memory_report(&self) -> MemoryReport {
        let arena = self.registry.arena();
        MemoryReport {
            capacity: arena.capacity(),
            used: arena.used(),
            systems: self
                .registry
                .registered_types()
                .filter_map(|ty| self.registry.entry(ty).map(|entry| (ty, entry.state_size())))
                .collect(),
        }
    }
}

impl Drop for SystemsManager {
    fn drop(&mut self) {
        if self.stage != BootStage::ShutDown && self.registry.registered_count() > 0 {
            log::warn!("Systems manager dropped without shutdown, shutting down now");
            self.shutdown();
        }
    }
}
