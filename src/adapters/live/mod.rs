//! Live adapters for real external interactions.

pub mod figma;
pub mod filesystem;
