//! Port definitions (trait abstractions) for external resources.
//!
//! The writer and registry only see these traits, so the file system and the
//! signal source can be swapped for in-memory fakes in tests.
//!
//! # Design Rules
//!
//! - No `std::fs::File` or signal types in any signature
//! - Openers own the create+append contract; writers never pick flags

pub mod output_handle;
pub mod rotation_source;

pub use output_handle::{HandleOpener, OutputHandle};
pub use rotation_source::{
    ChannelSource, RotationEvent, RotationSource, RotationTrigger, rotation_channel,
};

#[cfg(test)]
pub use output_handle::MockHandleOpener;
