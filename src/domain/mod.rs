//! Pure business logic: badge layout and transformation descriptors.

pub mod badge;
pub mod transformation;
