//! Built-in vendor profiles.

pub mod brocade;
pub mod cisco;
