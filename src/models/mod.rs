//! Core data models for the stats overlay

pub mod job;
pub mod message;

pub use job::*;
pub use message::*;
