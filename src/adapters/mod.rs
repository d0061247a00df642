// Adapters layer: concrete implementations for external systems.
// Storage backends live next to their configs (config::cli, config::lambda).

pub mod http;

pub use http::{PageFetcher, DEFAULT_BASE_URL};
