/// Error types for structuring element construction.
pub mod error;
pub use error::MorphologyError;

/// Structuring elements (kernels) and their shapes.
pub mod kernels;
pub use kernels::{Anchor, Kernel, KernelShape};

/// Dilation, erosion and the compound operators built on them.
pub mod ops;
pub use ops::{close, dilate, erode, morphology_ex, open, BorderMode, MorphOperation};
