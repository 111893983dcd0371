//! Laminator - Virtual Event Tag Service
//!
//! Composites two user photos and a name onto a fixed badge frame via a
//! hosted image-processing service and hands back a shareable URL.
//!
//! Hexagonal Architecture:
//! - domain/: Pure business logic (badge layout, transformation descriptors)
//! - ports/: Trait definitions
//! - adapters/: Concrete implementations (cloudinary outbound, http inbound)
//! - application/: Orchestration services
//! - config: Environment configuration

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports for convenience
pub use adapters::http::{router, AppState};
pub use adapters::CloudinaryStore;
pub use application::TagService;
pub use config::AppConfig;
