//! Key-value persistence abstraction.
//!
//! Calibration is the only thing the panel persists. The store is modeled as
//! a small string-keyed namespace of scalar values, which maps directly onto
//! ESP NVS-style storage on the device and onto a plain map in tests and the
//! simulator. The store is only ever touched from the single UI loop, so a
//! `save` implemented as sequential key writes is atomic from the caller's
//! perspective.
//!
//! The framed record format the device's flash store writes lives here too
//! ([`encode_record`] / [`decode_record`]), so the framing and its
//! corruption detection run in host tests without any flash behind them.

use heapless::index_map::FnvIndexMap;
use heapless::{String, Vec};
use serde::{Deserialize, Serialize};
use thiserror_no_std::Error;

/// A value the store can hold. Serializable so flash-backed stores can
/// persist entries as one encoded record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreValue {
    I16(i16),
    Bool(bool),
}

/// String-keyed scalar storage scoped by namespace.
///
/// Reads never fail: an absent or type-mismatched key yields the caller's
/// default. Writes may fail; callers decide whether that matters (for
/// calibration it is logged and the session continues on in-memory state).
pub trait KvStore {
    type Error: core::fmt::Debug;

    fn get_i16(&mut self, namespace: &str, key: &str, default: i16) -> i16;
    fn put_i16(&mut self, namespace: &str, key: &str, value: i16) -> Result<(), Self::Error>;

    fn get_bool(&mut self, namespace: &str, key: &str, default: bool) -> bool;
    fn put_bool(&mut self, namespace: &str, key: &str, value: bool) -> Result<(), Self::Error>;

    /// Remove every key under the namespace.
    fn clear(&mut self, namespace: &str) -> Result<(), Self::Error>;
}

/// Error type for [`MemStore`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MemStoreError {
    #[error("store is full")]
    Full,
    #[error("write rejected")]
    WriteRejected,
}

const MEM_STORE_CAPACITY: usize = 16;
type MemKey = String<48>;

/// In-memory [`KvStore`] used by the simulator and unit tests.
#[derive(Debug, Default)]
pub struct MemStore {
    entries: FnvIndexMap<MemKey, StoreValue, MEM_STORE_CAPACITY>,
    /// When set, every write fails. Lets tests exercise the
    /// save-failed-session-continues path.
    pub fail_writes: bool,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn full_key(namespace: &str, key: &str) -> MemKey {
        let mut k = MemKey::new();
        k.push_str(namespace).ok();
        k.push('/').ok();
        k.push_str(key).ok();
        k
    }

    fn get(&self, namespace: &str, key: &str) -> Option<StoreValue> {
        self.entries.get(&Self::full_key(namespace, key)).copied()
    }

    fn put(&mut self, namespace: &str, key: &str, value: StoreValue) -> Result<(), MemStoreError> {
        if self.fail_writes {
            return Err(MemStoreError::WriteRejected);
        }
        self.entries
            .insert(Self::full_key(namespace, key), value)
            .map_err(|_| MemStoreError::Full)?;
        Ok(())
    }
}

impl KvStore for MemStore {
    type Error = MemStoreError;

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
        if self.fail_writes {
            return Err(MemStoreError::WriteRejected);
        }
        // FnvIndexMap has no retain; rebuild without the namespace.
        let mut kept = FnvIndexMap::new();
        for (k, v) in self.entries.iter() {
            if !k.starts_with(namespace) {
                kept.insert(k.clone(), *v).ok();
            }
        }
        self.entries = kept;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Record framing for flash-backed stores
// ---------------------------------------------------------------------------

const RECORD_MAGIC: u32 = 0x524B_5631; // "RKV1"
const RECORD_VERSION: u8 = 1;

/// Magic (4, LE) + version (1) + payload length (2, LE).
const RECORD_HEADER_LEN: usize = 7;

/// Entry capacity of one record.
pub const MAX_RECORD_ENTRIES: usize = 16;

/// Full namespaced key, `namespace/key`.
pub type RecordKey = String<48>;

/// The entry list a framed record carries.
pub type RecordEntries = Vec<(RecordKey, StoreValue), MAX_RECORD_ENTRIES>;

/// Failure to frame a record.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("record did not fit the buffer")]
    Overflow,
}

/// Encode the entry list as one framed record: header, postcard payload,
/// and a trailing checksum byte. Returns the encoded length.
///
/// The final buffer byte is reserved for the checksum before the payload is
/// encoded, so a payload that would fill the buffer fails with
/// [`RecordError::Overflow`] instead of writing past the end.
pub fn encode_record(entries: &RecordEntries, buf: &mut [u8]) -> Result<usize, RecordError> {
    if buf.len() <= RECORD_HEADER_LEN + 1 {
        return Err(RecordError::Overflow);
    }
    buf[0..4].copy_from_slice(&RECORD_MAGIC.to_le_bytes());
    buf[4] = RECORD_VERSION;

    let limit = buf.len() - 1;
    let payload_len = postcard::to_slice(entries, &mut buf[RECORD_HEADER_LEN..limit])
        .map_err(|_| RecordError::Overflow)?
        .len();
    buf[5..7].copy_from_slice(&(payload_len as u16).to_le_bytes());

    let total = RECORD_HEADER_LEN + payload_len;
    buf[total] = checksum8(&buf[..total]);
    Ok(total + 1)
}

/// Decode a framed record. Bad magic, an unknown version, a length pointing
/// past the buffer, a checksum mismatch, or a malformed payload all yield
/// `None`; callers treat that as an empty store.
pub fn decode_record(buf: &[u8]) -> Option<RecordEntries> {
    if buf.len() <= RECORD_HEADER_LEN {
        return None;
    }
    if u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]) != RECORD_MAGIC {
        return None;
    }
    if buf[4] != RECORD_VERSION {
        return None;
    }
    let payload_len = usize::from(u16::from_le_bytes([buf[5], buf[6]]));
    let total = RECORD_HEADER_LEN + payload_len;
    if total >= buf.len() {
        return None;
    }
    if buf[total] != checksum8(&buf[..total]) {
        return None;
    }
    postcard::from_bytes(&buf[RECORD_HEADER_LEN..total]).ok()
}

fn checksum8(bytes: &[u8]) -> u8 {
    let mut acc = 0x5Au8;
    for &byte in bytes {
        acc ^= byte.rotate_left(1);
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_for_absent_keys() {
        let mut store = MemStore::new();
        assert_eq!(store.get_i16("ns", "missing", 42), 42);
        assert!(store.get_bool("ns", "missing", true));
    }

    #[test]
    fn namespaces_do_not_collide() {
        let mut store = MemStore::new();
        store.put_i16("a", "k", 1).unwrap();
        store.put_i16("b", "k", 2).unwrap();
        assert_eq!(store.get_i16("a", "k", 0), 1);
        assert_eq!(store.get_i16("b", "k", 0), 2);
    }

    #[test]
    fn clear_only_touches_one_namespace() {
        let mut store = MemStore::new();
        store.put_i16("a", "k", 1).unwrap();
        store.put_bool("b", "k", true).unwrap();
        store.clear("a").unwrap();
        assert_eq!(store.get_i16("a", "k", 0), 0);
        assert!(store.get_bool("b", "k", false));
    }

    #[test]
    fn rejected_writes_leave_existing_values() {
        let mut store = MemStore::new();
        store.put_i16("ns", "k", 7).unwrap();
        store.fail_writes = true;
        assert_eq!(store.put_i16("ns", "k", 9), Err(MemStoreError::WriteRejected));
        store.fail_writes = false;
        assert_eq!(store.get_i16("ns", "k", 0), 7);
    }

    fn sample_entries() -> RecordEntries {
        let mut entries = RecordEntries::new();
        let mut key = RecordKey::new();
        key.push_str("touch-calibration/xMin").unwrap();
        entries.push((key, StoreValue::I16(-171))).unwrap();
        let mut key = RecordKey::new();
        key.push_str("touch-calibration/valid").unwrap();
        entries.push((key, StoreValue::Bool(true))).unwrap();
        entries
    }

    #[test]
    fn record_round_trips_through_the_framing() {
        let mut buf = [0xFFu8; 1024];
        let len = encode_record(&sample_entries(), &mut buf).unwrap();
        assert!(len > RECORD_HEADER_LEN + 1);

        let decoded = decode_record(&buf).unwrap();
        assert_eq!(decoded, sample_entries());
    }

    #[test]
    fn corrupt_payload_fails_the_checksum() {
        let mut buf = [0xFFu8; 1024];
        encode_record(&sample_entries(), &mut buf).unwrap();
        buf[RECORD_HEADER_LEN + 3] ^= 0x01;
        assert!(decode_record(&buf).is_none());
    }

    #[test]
    fn bad_magic_and_version_are_rejected() {
        let mut buf = [0xFFu8; 1024];
        encode_record(&sample_entries(), &mut buf).unwrap();

        let mut wrong_magic = buf;
        wrong_magic[0] ^= 0xFF;
        assert!(decode_record(&wrong_magic).is_none());

        let mut wrong_version = buf;
        wrong_version[4] = RECORD_VERSION + 1;
        // Version bump invalidates the whole record, checksum included.
        assert!(decode_record(&wrong_version).is_none());
    }

    #[test]
    fn length_past_the_buffer_is_rejected() {
        let mut buf = [0xFFu8; 64];
        encode_record(&sample_entries(), &mut buf).unwrap();
        buf[5..7].copy_from_slice(&1000u16.to_le_bytes());
        assert!(decode_record(&buf).is_none());
    }

    #[test]
    fn blank_flash_reads_as_no_record() {
        // Erased NOR flash is all ones.
        assert!(decode_record(&[0xFFu8; 1024]).is_none());
        assert!(decode_record(&[]).is_none());
    }

    #[test]
    fn full_capacity_record_fits_one_flash_page() {
        let mut entries = RecordEntries::new();
        for _ in 0..MAX_RECORD_ENTRIES {
            let mut key = RecordKey::new();
            // Worst case: every key at full length.
            while key.push('k').is_ok() {}
            entries.push((key, StoreValue::I16(i16::MIN))).unwrap();
        }

        let mut buf = [0xFFu8; 1024];
        let len = encode_record(&entries, &mut buf).unwrap();
        assert!(len <= buf.len());
        assert_eq!(decode_record(&buf).unwrap(), entries);
    }

    #[test]
    fn oversized_payload_is_refused_not_truncated() {
        let mut tiny = [0xFFu8; 16];
        assert_eq!(
            encode_record(&sample_entries(), &mut tiny),
            Err(RecordError::Overflow)
        );
    }
}
