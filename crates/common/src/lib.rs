//! Shared types and configuration used by every glcourse crate.
//!
//! # Invariants
//! - Every configuration field has a default; partial files are valid.
//! - Types here carry no GPU state.

pub mod config;
mod types;

pub use config::{AppConfig, AssetConfig, CameraConfig, ConfigError, WindowConfig};
pub use types::Transform;

pub fn crate_info() -> &'static str {
    "glcourse-common v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("common"));
    }
}
