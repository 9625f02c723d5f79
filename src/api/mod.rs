//! Network helpers for stream playback
//!
//! - `resolver`: follows stream URL redirects before a pipeline is built

pub mod resolver;

pub use resolver::{ResolveError, StreamResolver};
