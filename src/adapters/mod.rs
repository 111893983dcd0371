//! Adapters - Concrete implementations of ports.

pub mod cloudinary;
pub mod http;

pub use cloudinary::CloudinaryStore;
