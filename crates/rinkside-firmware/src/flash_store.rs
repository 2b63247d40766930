//! Flash-backed key-value store.
//!
//! Persists the panel's settings (currently just the touch calibration
//! namespace) in the last sector of the main flash. The whole store is one
//! framed record (see [`rinkside_core::store::encode_record`]); entries are
//! cached in RAM and every write re-encodes and rewrites the record. The
//! framing itself is host-tested in the core crate.
//!
//! An unreadable or corrupt record is treated as an empty store, which the
//! calibration loader then turns into compiled defaults.

use embedded_storage::{ReadStorage, Storage};
use esp_storage::FlashStorage;
use log::warn;
use thiserror_no_std::Error;

use rinkside_core::store::{
    KvStore, RecordEntries, RecordKey, StoreValue, decode_record, encode_record,
};

const RECORD_BUF_LEN: usize = 1024;

#[derive(Debug, Error)]
pub enum FlashStoreError {
    #[error("flash write failed")]
    Flash,
    #[error("record did not fit the buffer")]
    Encode,
    #[error("store is full")]
    Full,
}

/// [`KvStore`] over the last sector of the main flash.
pub struct FlashKvStore<'d> {
    flash: FlashStorage<'d>,
    offset: u32,
    entries: RecordEntries,
}

impl<'d> FlashKvStore<'d> {
    pub fn new(flash_peripheral: esp_hal::peripherals::FLASH<'d>) -> Self {
        let flash = FlashStorage::new(flash_peripheral).multicore_auto_park();
        let capacity = flash.capacity() as u32;
        let offset = capacity.saturating_sub(FlashStorage::SECTOR_SIZE);
        let mut store = Self {
            flash,
            offset,
            entries: RecordEntries::new(),
        };
        store.entries = store.load_record().unwrap_or_default();
        store
    }

    fn full_key(namespace: &str, key: &str) -> RecordKey {
        let mut k = RecordKey::new();
        k.push_str(namespace).ok();
        k.push('/').ok();
        k.push_str(key).ok();
        k
    }

    fn get(&self, namespace: &str, key: &str) -> Option<StoreValue> {
        let wanted = Self::full_key(namespace, key);
        self.entries
            .iter()
            .find(|(k, _)| *k == wanted)
            .map(|(_, v)| *v)
    }

    fn put(
        &mut self,
        namespace: &str,
        key: &str,
        value: StoreValue,
    ) -> Result<(), FlashStoreError> {
        let full = Self::full_key(namespace, key);
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| *k == full) {
            entry.1 = value;
        } else {
            self.entries
                .push((full, value))
                .map_err(|_| FlashStoreError::Full)?;
        }
        self.persist()
    }

    fn persist(&mut self) -> Result<(), FlashStoreError> {
        let mut record = [0xFFu8; RECORD_BUF_LEN];
        let len =
            encode_record(&self.entries, &mut record).map_err(|_| FlashStoreError::Encode)?;
        self.flash
            .write(self.offset, &record[..len])
            .map_err(|_| FlashStoreError::Flash)
    }

    fn load_record(&mut self) -> Option<RecordEntries> {
        let mut record = [0u8; RECORD_BUF_LEN];
        self.flash.read(self.offset, &mut record).ok()?;
        decode_record(&record).or_else(|| {
            // Blank (erased) flash legitimately decodes to nothing; anything
            // else here means the record went bad.
            if record[..8].iter().any(|&b| b != 0xFF) {
                warn!("settings record corrupt, starting empty");
            }
            None
        })
    }
}

impl KvStore for FlashKvStore<'_> {
    type Error = FlashStoreError;

    fn get_i16(&mut self, namespace: &str, key: &str, default: i16) -> i16 {
        match self.get(namespace, key) {
            Some(StoreValue::I16(v)) => v,
            _ => default,
        }
    }

    fn put_i16(&mut self, namespace: &str, key: &str, value: i16) -> Result<(), Self::Error> {
        self.put(namespace, key, StoreValue::I16(value))
    }

    fn get_bool(&mut self, namespace: &str, key: &str, default: bool) -> bool {
        match self.get(namespace, key) {
            Some(StoreValue::Bool(v)) => v,
            _ => default,
        }
    }

    fn put_bool(&mut self, namespace: &str, key: &str, value: bool) -> Result<(), Self::Error> {
        self.put(namespace, key, StoreValue::Bool(value))
    }

    fn clear(&mut self, namespace: &str) -> Result<(), Self::Error> {
        let mut kept = RecordEntries::new();
        for (k, v) in self.entries.iter() {
            if !k.starts_with(namespace) {
                kept.push((k.clone(), *v)).ok();
            }
        }
        self.entries = kept;
        self.persist()
    }
}
