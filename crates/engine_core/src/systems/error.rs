//! Systems manager errors

use thiserror::Error;

use super::manager::BootStage;
use super::SystemType;
use crate::config::ConfigError;
use crate::foundation::memory::ArenaError;

/// Errors raised while registering, booting, or ticking subsystems
///
/// Everything except [`SystemError::UpdateFailed`] is fatal to the boot phase
/// that produced it.
#[derive(Error, Debug)]
pub enum SystemError {
    /// The system could not report its state size
    #[error("{system} system failed to report its state size: {reason}")]
    SizeQueryFailed {
        /// System being registered
        system: SystemType,
        /// Failure reported by the system
        reason: String,
    },

    /// The system failed to initialize inside its state block
    #[error("{system} system failed to initialize: {reason}")]
    InitializeFailed {
        /// System being registered
        system: SystemType,
        /// Failure reported by the system
        reason: String,
    },

    /// Only the memory system may be registered without an initialize step
    #[error("Initialize is required for every system except memory, missing for {0}")]
    MissingInitialize(SystemType),

    /// The slot for this system type is already occupied
    #[error("{0} system is already registered")]
    AlreadyRegistered(SystemType),

    /// A system that a later step depends on is not registered
    #[error("{0} system is not registered")]
    NotRegistered(SystemType),

    /// The systems arena cannot hold the reported state size
    #[error("Not enough arena memory for {system} system: {source}")]
    ArenaExhausted {
        /// System being registered
        system: SystemType,
        /// Underlying arena failure
        #[source]
        source: ArenaError,
    },

    /// No thread left for the job system after reserving the main thread
    #[error("Platform reported {hardware_threads} hardware thread(s); at least one thread besides the main thread is required for the job system")]
    InsufficientThreads {
        /// Logical processor count reported by the platform
        hardware_threads: usize,
    },

    /// A render view from the application configuration could not be created
    #[error("Failed to create render view '{view}': {reason}")]
    ViewCreationFailed {
        /// View name
        view: String,
        /// Failure reported by the render view system
        reason: String,
    },

    /// A per-tick update failed (recoverable)
    #[error("{system} system update failed: {reason}")]
    UpdateFailed {
        /// System being updated
        system: SystemType,
        /// Failure reported by the system
        reason: String,
    },

    /// The operation is not valid in the manager's current boot stage
    #[error("Cannot {operation} while the systems manager is {stage}")]
    InvalidBootStage {
        /// Operation that was attempted
        operation: &'static str,
        /// Stage the manager was in
        stage: BootStage,
    },

    /// Failure reported by a subsystem callback
    #[error("{0}")]
    Subsystem(String),

    /// Invalid application configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl SystemError {
    /// Failure raised from inside a subsystem callback
    pub fn subsystem(reason: impl Into<String>) -> Self {
        Self::Subsystem(reason.into())
    }
}
