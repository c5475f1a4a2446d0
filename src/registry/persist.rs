// src/registry/persist.rs

//! Persisted counters: one byte per category at `storage_offset + slot`,
//! in [`SensorCategory::ALL`] order. An erased byte (`0xFF`) keeps the
//! in-memory default of zero.

use super::IndexRegistry;
use crate::common::{
    hal_traits::NonVolatileStorage,
    types::{SensorCategory, UNASSIGNED},
};
use log::debug;

impl<M: Copy> IndexRegistry<M> {
    /// Loads the per-category counters from controller storage.
    ///
    /// Stops at the first read error; counters read before it are kept.
    pub fn load<S: NonVolatileStorage>(&mut self, storage: &mut S) -> Result<(), S::Error> {
        for category in SensorCategory::ALL {
            let address = self.storage_offset.wrapping_add(category.slot() as u16);
            let value = storage.read_byte(address)?;
            if value != UNASSIGNED {
                self.entries[category.slot()].current_count = value;
            }
        }
        debug!("loaded counters {:?}", self.counters());
        Ok(())
    }

    /// Writes all four counters back to controller storage.
    pub fn save<S: NonVolatileStorage>(&self, storage: &mut S) -> Result<(), S::Error> {
        for category in SensorCategory::ALL {
            let address = self.storage_offset.wrapping_add(category.slot() as u16);
            storage.write_byte(address, self.entries[category.slot()].current_count)?;
        }
        debug!("saved counters {:?}", self.counters());
        Ok(())
    }

    /// The persisted record, in [`SensorCategory::ALL`] order.
    pub fn counters(&self) -> [u8; 4] {
        let mut record = [0u8; 4];
        for (out, entry) in record.iter_mut().zip(self.entries.iter()) {
            *out = entry.current_count;
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{config::INDICES_STORAGE_OFFSET, types::StateKind};
    use crate::mock::{MockHost, MockStorage, MockStorageError};

    #[test]
    fn test_load_blank_storage_keeps_zero() {
        let host = MockHost::full(1);
        let mut registry = IndexRegistry::bind(&host);
        let mut storage = MockStorage::blank();

        registry.load(&mut storage).unwrap();
        assert_eq!(registry.counters(), [0, 0, 0, 0]);
    }

    #[test]
    fn test_load_reads_layout() {
        let host = MockHost::full(1);
        let mut registry = IndexRegistry::bind(&host);
        let mut storage = MockStorage::blank();
        let base = INDICES_STORAGE_OFFSET as usize;
        let record = &mut storage.bytes[base..base + 4];
        record.copy_from_slice(&[2, 0xFF, 0, 7]);

        registry.load(&mut storage).unwrap();
        assert_eq!(registry.counters(), [2, 0, 0, 7]);
        assert_eq!(registry.current_count(SensorCategory::SoilMoisture), 7);
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let mut host = MockHost::full(1);
        let mut registry = IndexRegistry::bind(&host);
        let (humidity, light) = (SensorCategory::Humidity, SensorCategory::Luminosity);
        registry.reserve(&mut host, humidity, 1).unwrap();
        registry.reserve(&mut host, light, 0).unwrap();

        let mut storage = MockStorage::blank();
        registry.save(&mut storage).unwrap();
        assert_eq!(storage.writes, 4);

        let mut reloaded = IndexRegistry::bind(&MockHost::full(1));
        reloaded.load(&mut storage).unwrap();
        assert_eq!(reloaded.counters(), [0, 2, 1, 0]);
    }

    #[test]
    fn test_custom_offset() {
        let host = MockHost::full(1);
        let registry = IndexRegistry::bind(&host).with_storage_offset(16);
        let mut storage = MockStorage::blank();
        registry.save(&mut storage).unwrap();
        assert_eq!(&storage.bytes[16..20], &[0, 0, 0, 0]);
        assert_eq!(storage.bytes[INDICES_STORAGE_OFFSET as usize], 0xFF);
    }

    #[test]
    fn test_storage_errors_propagate() {
        let host = MockHost::full(1);
        let mut registry = IndexRegistry::bind(&host);
        let mut storage = MockStorage::blank();
        storage.fail = true;

        assert_eq!(registry.load(&mut storage), Err(MockStorageError));
        assert_eq!(registry.save(&mut storage), Err(MockStorageError));
        assert_eq!(registry.counters(), [0, 0, 0, 0]);
    }

    #[test]
    fn test_largest_index_survives_reboot() {
        let light = SensorCategory::Luminosity;
        let mut host = MockHost::new(1).with_module("LIGHT", &[]);
        let mut registry = IndexRegistry::bind(&host);
        assert_eq!(registry.reserve(&mut host, light, 253), Ok(254));
        let mut storage = MockStorage::blank();
        registry.save(&mut storage).unwrap();

        let mut booted = MockHost::new(1).with_module("LIGHT", &[]);
        let mut restored = IndexRegistry::bind(&booted);
        restored.load(&mut storage).unwrap();
        restored.replay_on_boot(&mut booted);

        assert_eq!(restored.current_count(light), 254);
        assert_eq!(booted.module("LIGHT").states.len(), 254);
        assert!(restored.lookup(&booted, light, 253).is_some());
    }

    #[test]
    fn test_reboot_restores_states() {
        let hardcoded = [(StateKind::Humidity, 2), (StateKind::Temperature, 2)];
        let mut host = MockHost::new(1).with_module("HUMIDITY", &hardcoded);
        let mut registry = IndexRegistry::bind(&host);
        let humidity = SensorCategory::Humidity;
        assert_eq!(registry.reserve(&mut host, humidity, 2), Ok(3));
        let mut storage = MockStorage::blank();
        registry.save(&mut storage).unwrap();

        // Fresh boot: only the hardcoded states exist again.
        let mut booted = MockHost::new(1).with_module("HUMIDITY", &hardcoded);
        let mut restored = IndexRegistry::bind(&booted);
        restored.load(&mut storage).unwrap();
        restored.replay_on_boot(&mut booted);

        let humidities = booted.states_of("HUMIDITY", StateKind::Humidity);
        assert_eq!(humidities, vec![0, 1, 2, 3, 4]);
        for r in 0..3 {
            let states = restored.lookup(&booted, humidity, r);
            assert_eq!(states.map(|s| s.len()), Some(2));
        }
    }
}
