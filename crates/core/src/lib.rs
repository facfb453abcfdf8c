//! Domain helpers shared by the data layer and the HTTP surface.
//!
//! Nothing in this crate performs I/O; every function is deterministic given
//! its inputs (the optimistic helper only drives a caller-supplied future).

pub mod content;
pub mod error;
pub mod image_url;
pub mod optimistic;
pub mod slug;
pub mod types;
