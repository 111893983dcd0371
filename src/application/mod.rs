//! Application services - orchestration over the ports.

pub mod tagger;

pub use tagger::TagService;
