//! Channel helpers shared by terminal transports.
//!
//! Handles ANSI stripping and tail-only prompt detection on the raw byte
//! stream coming back from the device.

mod buffer;

pub use buffer::PatternBuffer;
