//! Hardware glue for the rinkside panel on the ESP32-2432S028 board: the
//! XPT2046 touch controller driver, the flash-backed key-value store, and the
//! Wi-Fi data fetch task. Everything hardware-independent lives in
//! `rinkside-core`.

#![no_std]

pub mod flash_store;
pub mod net;
pub mod xpt2046;
