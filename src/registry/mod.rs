// src/registry/mod.rs

//! Merges dynamically discovered sensors into the controller's state arrays.
//!
//! Each category's states live in one host module as a dense array: first the
//! `hardcoded_count` sensors configured in firmware, then the virtual sensors
//! registered from bus modules. A virtual sensor with relative index `r`
//! always sits at absolute index `hardcoded_count + r`, so module packets stay
//! valid whatever the firmware's hardcoded configuration is.
//!
//! Only the per-category counters survive a reboot (see [`persist`]); the
//! state objects are rebuilt by [`IndexRegistry::replay_on_boot`].
//!
//! Relative indices only ever grow. A configurator that lowers an index a
//! module was already given leaves the old states orphaned; the counters
//! cannot shrink.
//!
//! pH sensors are not tracked: the controller never registers them from bus
//! modules, so there is no entry (and no hardcoded count) for a `PH` module.

mod persist;

use crate::common::{
    config::INDICES_STORAGE_OFFSET,
    host::HostFramework,
    types::{SensorCategory, StateKind, UNASSIGNED},
};
use arrayvec::ArrayVec;
use log::{debug, info};

/// Host states backing one registered sensor, tagged with their kind.
pub type RegisteredStates<S> = ArrayVec<(StateKind, S), 2>;

/// Why a reservation did not grow the index space.
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
pub enum ReserveError {
    /// The slot never had an index assigned.
    #[error("relative index is unassigned")]
    SentinelIndex,

    /// This firmware has no module for the category.
    #[error("no host module for {0} sensors")]
    CategoryUnavailable(SensorCategory),

    /// Already allocated earlier; nothing to do.
    #[error(
        "relative index {relative_index} already covered ({current_count} allocated)"
    )]
    AlreadyCovered {
        relative_index: u8,
        current_count: u8,
    },

    /// `hardcoded_count + relative_index` does not fit the host's index range,
    /// or the resulting counter would read back as erased storage.
    #[error("relative index {0} exceeds the host index range")]
    IndexOverflow(u8),
}

#[derive(Debug, Copy, Clone)]
struct CategoryEntry<M> {
    module: Option<M>,
    hardcoded_count: u8,
    current_count: u8,
}

impl<M> CategoryEntry<M> {
    const fn unbound() -> Self {
        CategoryEntry {
            module: None,
            hardcoded_count: 0,
            current_count: 0,
        }
    }
}

/// Per-category index bookkeeping, generic over the host's module handle.
#[derive(Debug, Clone)]
pub struct IndexRegistry<M> {
    entries: [CategoryEntry<M>; 4],
    storage_offset: u16,
}

impl<M: Copy> Default for IndexRegistry<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Copy> IndexRegistry<M> {
    /// A registry with no modules bound; every operation is a no-op.
    pub fn new() -> Self {
        IndexRegistry {
            entries: [CategoryEntry::unbound(); 4],
            storage_offset: INDICES_STORAGE_OFFSET,
        }
    }

    /// Resolves each category's host module by name and records how many
    /// sensors the firmware already configured for it.
    pub fn bind<H>(host: &H) -> Self
    where
        H: HostFramework<Module = M>,
    {
        let mut registry = Self::new();
        for category in SensorCategory::ALL {
            let entry = &mut registry.entries[category.slot()];
            match host.module_by_name(category.host_module_name()) {
                Some(module) => {
                    entry.module = Some(module);
                    entry.hardcoded_count = host.count_states(module, category.primary_kind());
                    debug!(
                        "{} sensors: module {} bound, {} hardcoded",
                        category,
                        category.host_module_name(),
                        entry.hardcoded_count
                    );
                }
                None => debug!(
                    "{} sensors: no {} module",
                    category,
                    category.host_module_name()
                ),
            }
        }
        registry
    }

    pub fn with_storage_offset(mut self, offset: u16) -> Self {
        self.storage_offset = offset;
        self
    }

    #[inline]
    pub fn storage_offset(&self) -> u16 {
        self.storage_offset
    }

    #[inline]
    pub fn is_bound(&self, category: SensorCategory) -> bool {
        self.entries[category.slot()].module.is_some()
    }

    /// Sensors configured in firmware for `category`.
    #[inline]
    pub fn hardcoded_count(&self, category: SensorCategory) -> u8 {
        self.entries[category.slot()].hardcoded_count
    }

    /// Virtual sensors allocated so far for `category`.
    #[inline]
    pub fn current_count(&self, category: SensorCategory) -> u8 {
        self.entries[category.slot()].current_count
    }

    /// Makes sure relative index `relative_index` of `category` has host states.
    ///
    /// Allocates every missing index from the current count up to and
    /// including `relative_index`, and returns how many were added.
    pub fn reserve<H>(
        &mut self,
        host: &mut H,
        category: SensorCategory,
        relative_index: u8,
    ) -> Result<u8, ReserveError>
    where
        H: HostFramework<Module = M>,
    {
        if relative_index == UNASSIGNED {
            return Err(ReserveError::SentinelIndex);
        }

        let entry = &mut self.entries[category.slot()];
        let Some(module) = entry.module else {
            return Err(ReserveError::CategoryUnavailable(category));
        };

        if relative_index < entry.current_count {
            return Err(ReserveError::AlreadyCovered {
                relative_index,
                current_count: entry.current_count,
            });
        }

        // The counter becomes `relative_index + 1` and is persisted as one
        // byte, where `UNASSIGNED` means "never written".
        if relative_index >= UNASSIGNED - 1
            || entry.hardcoded_count as u16 + relative_index as u16 >= UNASSIGNED as u16
        {
            return Err(ReserveError::IndexOverflow(relative_index));
        }

        let span = relative_index - entry.current_count + 1;
        let first = entry.hardcoded_count + entry.current_count;
        for k in 0..span {
            allocate_sensor(host, module, category, first + k);
        }
        entry.current_count += span;

        info!(
            "{} sensors: reserved relative index {} ({} added, {} virtual total)",
            category, relative_index, span, entry.current_count
        );
        Ok(span)
    }

    /// Re-creates the host states of every virtual sensor after the counters
    /// were loaded. Must run after the firmware's own states exist and before
    /// any bus polling.
    pub fn replay_on_boot<H>(&self, host: &mut H)
    where
        H: HostFramework<Module = M>,
    {
        for category in SensorCategory::ALL {
            let entry = &self.entries[category.slot()];
            let Some(module) = entry.module else { continue };

            for relative in 0..entry.current_count {
                let Some(absolute) = entry.hardcoded_count.checked_add(relative) else {
                    break;
                };
                allocate_sensor(host, module, category, absolute);
            }

            if entry.current_count > 0 {
                info!(
                    "{} sensors: restored {} virtual",
                    category, entry.current_count
                );
            }
        }
    }

    /// Host states for `relative_index` of `category`.
    ///
    /// For humidity sensors whichever of the temperature and humidity states
    /// exists is returned. `None` when the module is absent or no state exists.
    pub fn lookup<H>(
        &self,
        host: &H,
        category: SensorCategory,
        relative_index: u8,
    ) -> Option<RegisteredStates<H::State>>
    where
        H: HostFramework<Module = M>,
    {
        if relative_index == UNASSIGNED {
            return None;
        }
        let entry = &self.entries[category.slot()];
        let module = entry.module?;
        let absolute = entry.hardcoded_count.checked_add(relative_index)?;

        let states: RegisteredStates<H::State> = category
            .state_kinds()
            .iter()
            .filter_map(|&kind| {
                let state = host.get_state(module, kind, absolute)?;
                Some((kind, state))
            })
            .collect();

        (!states.is_empty()).then_some(states)
    }
}

fn allocate_sensor<H: HostFramework>(
    host: &mut H,
    module: H::Module,
    category: SensorCategory,
    absolute: u8,
) {
    for &kind in category.state_kinds() {
        host.allocate_state(module, kind, absolute);
    }
}
