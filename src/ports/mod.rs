//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the export pipeline and an
//! external system (the Figma REST API, the filesystem). Implementations
//! live in `src/adapters/`.

pub mod figma;
pub mod filesystem;

pub use figma::{FigmaApi, FigmaFuture};
pub use filesystem::FileSystem;

/// Error type shared by all ports.
pub type PortError = Box<dyn std::error::Error + Send + Sync>;
