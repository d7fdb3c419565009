/// How a coordinate outside the image is resolved to a pixel.
///
/// The diagrams show the last pixels of a row `a b c d` followed by what a
/// neighbourhood sees past the edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaddingMode {
    /// A fixed value stands in for every outside pixel.
    ///
    /// `a b c d | v v v`
    Constant,

    /// The edge pixel repeats.
    ///
    /// `a b c d | d d d`
    Replicate,

    /// Mirror around the edge pixel, which is not repeated.
    ///
    /// `a b c d | c b a`
    Reflect101,

    /// Mirror around the border line, so the edge pixel appears twice.
    ///
    /// `a b c d | d c b`
    Reflect,

    /// The row continues from its other end.
    ///
    /// `a b c d | a b c`
    Wrap,
}

impl PaddingMode {
    /// Resolve coordinate `i` of a row or column of `len` pixels to an index in
    /// `[0, len)`.
    ///
    /// `len` must be non-zero. [`PaddingMode::Constant`] has no source index and
    /// maps everything to 0; callers substitute the constant value instead.
    ///
    /// # Examples
    ///
    /// ```
    /// use imgmorph_imgproc::padding::PaddingMode;
    ///
    /// assert_eq!(PaddingMode::Replicate.map_index(-2, 4), 0);
    /// assert_eq!(PaddingMode::Reflect.map_index(-1, 4), 0);
    /// assert_eq!(PaddingMode::Reflect101.map_index(-1, 4), 1);
    /// assert_eq!(PaddingMode::Wrap.map_index(4, 4), 0);
    /// ```
    #[inline]
    pub fn map_index(&self, i: isize, len: usize) -> usize {
        match self {
            PaddingMode::Replicate => i.clamp(0, len as isize - 1) as usize,
            PaddingMode::Reflect => mirror(i, len, true),
            PaddingMode::Reflect101 if len == 1 => 0,
            PaddingMode::Reflect101 => mirror(i, len, false),
            PaddingMode::Wrap => i.rem_euclid(len as isize) as usize,
            PaddingMode::Constant => 0,
        }
    }
}

/// Fold `i` into one mirror period and reflect the upper half back.
///
/// The period is `2 * len` when the edge pixel is repeated and `2 * len - 2`
/// when it is not, which needs `len > 1`.
#[inline]
fn mirror(i: isize, len: usize, repeat_edge: bool) -> usize {
    let len = len as isize;
    let period = if repeat_edge { 2 * len } else { 2 * len - 2 };
    let folded = i.rem_euclid(period);
    if folded < len {
        folded as usize
    } else {
        (period - folded - isize::from(repeat_edge)) as usize
    }
}
