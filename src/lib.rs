//! Flick watchface for the PineTime
//!
//! Board-agnostic watchface logic:
//!
//! - View-state controller (clock / status views, reverting timer)
//! - Time keeping and formatting
//! - Text layers and the watchface composition
//! - Wrist-flick detection from raw accelerometer samples
//! - Peripheral drivers written against `embedded-hal`
//!
//! The nRF52832 specific parts (display, battery ADC, system clocks) are
//! only built with the `pinetime` feature.

#![cfg_attr(not(test), no_std)]

pub mod controller;
pub mod event;
pub mod gesture;
pub mod peripherals;
pub mod system;
pub mod ui;

pub use controller::ViewController;
pub use event::{Axis, TapEvent, TimerHandle, WatchEvent};
pub use system::config::WatchfaceConfig;
pub use ui::DisplayMode;
