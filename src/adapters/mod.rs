//! Adapter implementations of the port traits.
//!
//! - `live`: real network and disk access
//! - `recording`: wraps another adapter and captures each call to a cassette
//! - `replaying`: serves calls from a previously recorded cassette

pub mod live;
pub mod recording;
pub mod replaying;
