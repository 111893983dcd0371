//! HTTP inbound adapter.
//!
//! Exposes the tag API consumed by the browser client: multipart tag
//! creation, badge-frame lookup, and badge-frame seeding.

mod images;
mod test_page;

pub use images::{router, AppState};
