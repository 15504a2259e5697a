//! Soil analysis
//!
//! - `profile.rs` - SoilType categories and the normalized SoilProfile
//! - `normalizer.rs` - Manual-parameter and image-reference normalization

pub mod profile;
pub mod normalizer;

pub use profile::{SoilProfile, SoilType};
pub use normalizer::{normalize_soil, SoilInput, SoilParams};
