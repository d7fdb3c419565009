#![deny(missing_docs)]
//! Image types used across the imgmorph crates

/// image representation for morphology purposes.
pub mod image;

/// Error types for the image module.
pub mod error;

pub use crate::error::ImageError;
pub use crate::image::{Image, ImageSize};
