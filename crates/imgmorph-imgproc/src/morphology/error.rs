/// Errors related to structuring elements and morphological parameters.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MorphologyError {
    /// The kernel has a zero width or height.
    #[error("Kernel size must be non-zero, got {0}x{1}")]
    EmptyKernel(usize, usize),

    /// The kernel half-size is negative.
    #[error("Kernel size must be non-negative, got {0}")]
    InvalidKernelSize(i32),

    /// The kernel is too large to be allocated.
    #[error("Kernel of {0}x{1} elements is too large")]
    KernelTooLarge(usize, usize),

    /// The shape code or name does not match a known shape.
    #[error("Unknown kernel shape: {0}")]
    InvalidKernelShape(String),

    /// The operation name does not match a known operation.
    #[error("Unknown morphological operation: {0}")]
    InvalidOperation(String),

    /// The anchor lies outside the kernel.
    #[error("Anchor ({0}, {1}) is outside the {2}x{3} kernel")]
    InvalidAnchor(usize, usize, usize, usize),

    /// The mask length does not match the kernel size.
    #[error("Kernel data length ({0}) does not match the kernel size ({1})")]
    InvalidKernelData(usize, usize),

    /// All elements in the kernel are inactive.
    #[error("All kernel elements are inactive")]
    AllKernelElementsInactive,
}
