//! Ports - Trait definitions for outbound dependencies.

pub mod media;
