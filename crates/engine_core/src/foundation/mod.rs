//! Low-level building blocks shared by the systems layer
//!
//! - [`memory`]: the bump arena every subsystem's state is carved from
//! - [`logging`]: `env_logger` bootstrap for the `log` facade

pub mod logging;
pub mod memory;
