//! System registry and the two-step registration protocol
//!
//! The registry is a fixed table with one slot per [`SystemType`]. Each
//! occupied slot owns its subsystem and a block of the shared
//! [`SystemArena`] sized to what the subsystem asked for.

use super::{InitializeSystem, Subsystem, SystemError, SystemType};
use crate::foundation::memory::{ArenaBlock, SystemArena};

/// One occupied registry slot
pub struct SystemEntry {
    system: Box<dyn Subsystem>,
    /// `None` for systems registered without an initialize step
    block: Option<ArenaBlock>,
    state_size: usize,
    updates: bool,
}

impl SystemEntry {
    /// Bytes of arena state the system reported
    pub const fn state_size(&self) -> usize {
        self.state_size
    }

    /// Arena block backing the system's state
    pub const fn block(&self) -> Option<ArenaBlock> {
        self.block
    }

    /// Whether the system is polled every tick
    pub const fn updates(&self) -> bool {
        self.updates
    }

    /// The registered subsystem
    pub fn system(&self) -> &dyn Subsystem {
        self.system.as_ref()
    }
}

impl std::fmt::Debug for SystemEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemEntry")
            .field("block", &self.block)
            .field("state_size", &self.state_size)
            .field("updates", &self.updates)
            .finish_non_exhaustive()
    }
}

/// Fixed-size table of registered subsystems plus the arena backing them
pub struct SystemRegistry {
    arena: SystemArena,
    slots: [Option<SystemEntry>; SystemType::COUNT],
}

impl SystemRegistry {
    /// Create an empty registry over an arena of `arena_bytes`
    pub fn new(arena_bytes: usize) -> Self {
        Self {
            arena: SystemArena::new(arena_bytes),
            slots: std::array::from_fn(|_| None),
        }
    }

    /// Register a system through its two-step initialize protocol
    ///
    /// The size query runs first with no storage; the reported number of
    /// bytes is then carved from the arena and handed to
    /// [`InitializeSystem::initialize`]. Any failure leaves the slot empty.
    /// A block carved before a failing initialize is not reclaimed.
    pub fn register<S: InitializeSystem>(
        &mut self,
        system_type: SystemType,
        mut system: S,
        config: &S::Config,
    ) -> Result<(), SystemError> {
        self.ensure_vacant(system_type)?;

        let state_size = system.required_size(config).map_err(|e| {
            log::error!("Failed to register {} system - size query failed: {}", system_type, e);
            SystemError::SizeQueryFailed {
                system: system_type,
                reason: e.to_string(),
            }
        })?;

        let block = self.arena.allocate(state_size).map_err(|source| {
            log::error!("Failed to register {} system - {}", system_type, source);
            SystemError::ArenaExhausted {
                system: system_type,
                source,
            }
        })?;

        system
            .initialize(self.arena.block_mut(block), config)
            .map_err(|e| {
                log::error!("Failed to register {} system - initialize call failed: {}", system_type, e);
                SystemError::InitializeFailed {
                    system: system_type,
                    reason: e.to_string(),
                }
            })?;

        log::debug!("Registered {} system ({} bytes of state)", system_type, state_size);
        self.store(system_type, Box::new(system), Some(block), state_size);
        Ok(())
    }

    /// Register a system that has no initialize step
    ///
    /// Only the memory system may do this; it receives no arena state.
    pub fn register_without_initialize<S: Subsystem>(
        &mut self,
        system_type: SystemType,
        system: S,
    ) -> Result<(), SystemError> {
        if system_type != SystemType::Memory {
            log::error!("Initialize is required for types except the memory system ({} given).", system_type);
            return Err(SystemError::MissingInitialize(system_type));
        }
        self.ensure_vacant(system_type)?;

        log::debug!("Registered {} system (no state)", system_type);
        self.store(system_type, Box::new(system), None, 0);
        Ok(())
    }

    fn ensure_vacant(&self, system_type: SystemType) -> Result<(), SystemError> {
        if self.is_registered(system_type) {
            log::error!("Failed to register {} system - already registered", system_type);
            return Err(SystemError::AlreadyRegistered(system_type));
        }
        Ok(())
    }

    fn store(&mut self, system_type: SystemType, system: Box<dyn Subsystem>, block: Option<ArenaBlock>, state_size: usize) {
        let updates = system.wants_update();
        self.slots[system_type.index()] = Some(SystemEntry {
            system,
            block,
            state_size,
            updates,
        });
    }

    /// Whether the slot for `system_type` is occupied
    pub fn is_registered(&self, system_type: SystemType) -> bool {
        self.slots[system_type.index()].is_some()
    }

    /// Registry entry for `system_type`
    pub fn entry(&self, system_type: SystemType) -> Option<&SystemEntry> {
        self.slots[system_type.index()].as_ref()
    }

    /// Registered system recovered as its concrete type
    ///
    /// Returns `None` if the slot is empty or holds a different type.
    pub fn system<S: Subsystem>(&self, system_type: SystemType) -> Option<&S> {
        let entry = self.entry(system_type)?;
        entry.system.as_ref().as_any().downcast_ref::<S>()
    }

    /// Mutable access to a registered system as its concrete type
    pub fn system_mut<S: Subsystem>(&mut self, system_type: SystemType) -> Option<&mut S> {
        let entry = self.slots[system_type.index()].as_mut()?;
        entry.system.as_mut().as_any_mut().downcast_mut::<S>()
    }

    /// Run `f` with a registered system and its state block
    pub fn with_system_mut<S: Subsystem, R>(
        &mut self,
        system_type: SystemType,
        f: impl FnOnce(&mut S, &mut [u8]) -> R,
    ) -> Option<R> {
        let entry = self.slots[system_type.index()].as_mut()?;
        let system = entry.system.as_mut().as_any_mut().downcast_mut::<S>()?;
        let state = match entry.block {
            Some(block) => self.arena.block_mut(block),
            None => Default::default(),
        };
        Some(f(system, state))
    }

    /// Read-only view of a system's state block
    pub fn state(&self, system_type: SystemType) -> Option<&[u8]> {
        let block = self.entry(system_type)?.block?;
        Some(self.arena.block(block))
    }

    /// Number of occupied slots
    pub fn registered_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Occupied slots in type-id order
    pub fn registered_types(&self) -> impl Iterator<Item = SystemType> + '_ {
        SystemType::ALL.into_iter().filter(|ty| self.is_registered(*ty))
    }

    /// Tick every system that asked for updates, in type-id order
    ///
    /// A failing system is logged and skipped; the remaining systems still
    /// run. Returns one [`SystemError::UpdateFailed`] per failing system.
    pub fn update_all(&mut self, delta_time: f32) -> Vec<SystemError> {
        let mut failures = Vec::new();

        for (index, slot) in self.slots.iter_mut().enumerate() {
            let Some(entry) = slot else { continue };
            if !entry.updates {
                continue;
            }

            let state = match entry.block {
                Some(block) => self.arena.block_mut(block),
                None => Default::default(),
            };

            if let Err(e) = entry.system.update(state, delta_time) {
                let system = SystemType::ALL[index];
                log::error!("System update failed for type {} ({}): {}", index, system, e);
                failures.push(SystemError::UpdateFailed {
                    system,
                    reason: e.to_string(),
                });
            }
        }

        failures
    }

    /// Shut a single system down and empty its slot
    ///
    /// Returns `false` if the slot was already empty.
    pub fn shutdown_system(&mut self, system_type: SystemType) -> bool {
        let Some(mut entry) = self.slots[system_type.index()].take() else {
            return false;
        };

        let state = match entry.block {
            Some(block) => self.arena.block_mut(block),
            None => Default::default(),
        };
        entry.system.shutdown(state);
        log::debug!("Shut down {} system", system_type);
        true
    }

    /// Release the whole arena
    ///
    /// Any blocks still referenced by occupied slots would dangle, so this
    /// only succeeds once every slot is empty.
    pub fn reset_arena(&mut self) -> bool {
        if self.registered_count() > 0 {
            log::warn!(
                "Refusing to reset systems arena with {} systems still registered",
                self.registered_count()
            );
            return false;
        }
        self.arena.reset();
        true
    }

    /// The arena backing all state blocks
    pub const fn arena(&self) -> &SystemArena {
        &self.arena
    }
}
