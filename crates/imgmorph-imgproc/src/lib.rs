#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// morphological operations module.
pub mod morphology;

/// border handling for neighbourhood operations.
pub mod padding;
