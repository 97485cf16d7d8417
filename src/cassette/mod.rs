//! Cassette format for recording and replaying port interactions.
//!
//! A recording session captures every Figma fetch of a run; replaying a
//! session re-runs the export offline against the same data and writes the
//! token files again.

pub mod config;
pub mod format;
pub mod recorder;
pub mod replayer;
pub mod session;
