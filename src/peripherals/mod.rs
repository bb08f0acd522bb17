pub mod accelerometer;
pub mod backlight;
pub mod battery;

#[cfg(feature = "pinetime")]
pub mod display;
