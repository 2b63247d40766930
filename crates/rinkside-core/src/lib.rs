//! Hardware-independent core library for the rinkside standings panel
//!
//! This crate contains all platform-agnostic logic for the panel firmware:
//! the resistive-touch input pipeline (calibration transform, calibration
//! wizard, debounced tap/long-press dispatcher), the navigation controller,
//! the backend data model, the key-value store abstraction used to persist
//! calibration, and the screen rendering routines.
//!
//! It is `#![no_std]` so it compiles both on the embedded target (ESP32) and
//! on desktop hosts (for the simulator and for `cargo test`). Nothing in here
//! touches hardware: time arrives as millisecond timestamps, touch input as
//! already-sampled raw points, and drawing goes to any
//! [`embedded_graphics::draw_target::DrawTarget`].

#![no_std]

pub mod config;
pub mod model;
pub mod nav;
pub mod pages;
pub mod store;
pub mod theme;
pub mod touch;
