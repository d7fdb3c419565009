use std::str::FromStr;

use super::MorphologyError;

/// Shapes of morphological [`Kernel`]s.
///
/// The integer codes follow the usual rect/cross/ellipse numbering:
/// `0` is a rectangle, `1` a cross and `2` an ellipse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelShape {
    /// A rectangular structuring element, every element is active.
    Rect,

    /// A cross (plus) shaped structuring element.
    ///
    /// Only the row and the column going through the anchor are active.
    Cross,

    /// An ellipse (or circle) inscribed in the kernel rectangle.
    Ellipse,
}

impl TryFrom<i32> for KernelShape {
    type Error = MorphologyError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(KernelShape::Rect),
            1 => Ok(KernelShape::Cross),
            2 => Ok(KernelShape::Ellipse),
            _ => Err(MorphologyError::InvalidKernelShape(code.to_string())),
        }
    }
}

impl FromStr for KernelShape {
    type Err = MorphologyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rect" | "box" => Ok(KernelShape::Rect),
            "cross" => Ok(KernelShape::Cross),
            "ellipse" => Ok(KernelShape::Ellipse),
            _ => Err(MorphologyError::InvalidKernelShape(s.to_string())),
        }
    }
}

/// Position of the kernel element aligned with the processed pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    /// Column of the anchor inside the kernel.
    pub x: usize,
    /// Row of the anchor inside the kernel.
    pub y: usize,
}

/// A morphological structuring element.
///
/// Stores a binary mask where 1 marks the pixels included in the neighbourhood
/// and 0 the excluded ones, together with its anchor.
///
/// # Example
///
/// ```rust
/// use imgmorph_imgproc::morphology::{Kernel, KernelShape};
///
/// // half-size 1 gives a 3x3 kernel anchored at its centre
/// let kernel = Kernel::from_radius(KernelShape::Rect, 1).unwrap();
/// assert_eq!(kernel.width(), 3);
/// assert_eq!(kernel.height(), 3);
/// assert_eq!(kernel.anchor().x, 1);
/// assert_eq!(kernel.count(), 9);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Kernel {
    data: Vec<u8>,
    offsets: Vec<(isize, isize)>,
    width: usize,
    height: usize,
    anchor: Anchor,
}

impl Kernel {
    /// Create a structuring element of the given shape and size.
    ///
    /// # Arguments
    ///
    /// * `shape` - The shape of the kernel.
    /// * `width` - The number of columns.
    /// * `height` - The number of rows.
    /// * `anchor` - The anchor position, `None` for the kernel centre.
    ///
    /// # Errors
    ///
    /// Fails if a dimension is zero, the anchor lies outside the kernel or the
    /// mask cannot be allocated.
    pub fn new(
        shape: KernelShape,
        width: usize,
        height: usize,
        anchor: Option<Anchor>,
    ) -> Result<Self, MorphologyError> {
        if width == 0 || height == 0 {
            return Err(MorphologyError::EmptyKernel(width, height));
        }

        let anchor = anchor.unwrap_or(Anchor {
            x: width / 2,
            y: height / 2,
        });
        if anchor.x >= width || anchor.y >= height {
            return Err(MorphologyError::InvalidAnchor(
                anchor.x, anchor.y, width, height,
            ));
        }

        let mut data = alloc_mask(width, height)?;

        // a single element is the same for every shape
        let shape = if width == 1 && height == 1 {
            KernelShape::Rect
        } else {
            shape
        };

        let r = (height / 2) as isize;
        let c = (width / 2) as isize;
        let inv_r2 = if r > 0 { 1.0 / (r * r) as f64 } else { 0.0 };

        for (i, row) in data.chunks_exact_mut(width).enumerate() {
            let (j1, j2) = match shape {
                KernelShape::Rect => (0, width),
                KernelShape::Cross if i == anchor.y => (0, width),
                KernelShape::Cross => (anchor.x, anchor.x + 1),
                KernelShape::Ellipse => {
                    let dy = i as isize - r;
                    if dy.abs() > r {
                        continue;
                    }
                    let dx = (c as f64 * (((r * r - dy * dy) as f64) * inv_r2).sqrt()).round()
                        as isize;
                    let j1 = (c - dx).max(0) as usize;
                    let j2 = ((c + dx + 1) as usize).min(width);
                    (j1, j2)
                }
            };
            row[j1..j2].fill(1);
        }

        let offsets = active_offsets(&data, width, height, anchor)?;

        log::debug!(
            "built {shape:?} kernel {width}x{height} anchored at {anchor:?}, {} active",
            offsets.len()
        );

        Ok(Self {
            data,
            offsets,
            width,
            height,
            anchor,
        })
    }

    /// Create a square structuring element from its half-size.
    ///
    /// The kernel is `(2 * size + 1) x (2 * size + 1)` and anchored at
    /// `(size, size)`. A size of 0 yields the 1x1 identity kernel.
    ///
    /// # Errors
    ///
    /// Returns [`MorphologyError::InvalidKernelSize`] for negative sizes.
    pub fn from_radius(shape: KernelShape, size: i32) -> Result<Self, MorphologyError> {
        if size < 0 {
            return Err(MorphologyError::InvalidKernelSize(size));
        }

        let size = size as usize;
        let side = 2 * size + 1;
        Kernel::new(shape, side, side, Some(Anchor { x: size, y: size }))
    }

    /// Create a structuring element from an explicit mask.
    ///
    /// Non-zero mask values are treated as active elements.
    ///
    /// # Errors
    ///
    /// Fails if the mask length does not match `width * height`, if the mask has
    /// no active element or if the anchor lies outside the kernel.
    pub fn from_mask(
        mask: Vec<u8>,
        width: usize,
        height: usize,
        anchor: Option<Anchor>,
    ) -> Result<Self, MorphologyError> {
        if width == 0 || height == 0 {
            return Err(MorphologyError::EmptyKernel(width, height));
        }

        if mask.len() != width * height {
            return Err(MorphologyError::InvalidKernelData(
                mask.len(),
                width * height,
            ));
        }

        if mask.iter().all(|&v| v == 0) {
            return Err(MorphologyError::AllKernelElementsInactive);
        }

        let anchor = anchor.unwrap_or(Anchor {
            x: width / 2,
            y: height / 2,
        });
        if anchor.x >= width || anchor.y >= height {
            return Err(MorphologyError::InvalidAnchor(
                anchor.x, anchor.y, width, height,
            ));
        }

        let data: Vec<u8> = mask.into_iter().map(|v| u8::from(v != 0)).collect();
        let offsets = active_offsets(&data, width, height, anchor)?;

        Ok(Self {
            data,
            offsets,
            width,
            height,
            anchor,
        })
    }

    /// Get a reference to the kernel mask (row-major, 0 or 1).
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Get the width of the kernel.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Get the height of the kernel.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Get the anchor of the kernel.
    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    /// Get the padding needed around an image as `(top, bottom, left, right)`.
    pub fn pad(&self) -> (usize, usize, usize, usize) {
        (
            self.anchor.y,
            self.height - 1 - self.anchor.y,
            self.anchor.x,
            self.width - 1 - self.anchor.x,
        )
    }

    /// Number of active elements.
    pub fn count(&self) -> usize {
        self.offsets.len()
    }

    /// Offsets `(dx, dy)` of the active elements relative to the anchor, in
    /// row-major order.
    ///
    /// Filtering visits every offset for every pixel, so the cost grows with
    /// `width * height * count()`.
    pub fn offsets(&self) -> &[(isize, isize)] {
        &self.offsets
    }
}

/// Collect the anchor-relative positions of the active mask elements.
fn active_offsets(
    data: &[u8],
    width: usize,
    height: usize,
    anchor: Anchor,
) -> Result<Vec<(isize, isize)>, MorphologyError> {
    let active = data.iter().filter(|&&v| v == 1).count();

    let mut offsets = Vec::new();
    offsets
        .try_reserve_exact(active)
        .map_err(|_| MorphologyError::KernelTooLarge(width, height))?;

    offsets.extend(data.iter().enumerate().filter(|(_, &v)| v == 1).map(|(idx, _)| {
        let (ky, kx) = (idx / width, idx % width);
        (
            kx as isize - anchor.x as isize,
            ky as isize - anchor.y as isize,
        )
    }));

    Ok(offsets)
}

fn alloc_mask(width: usize, height: usize) -> Result<Vec<u8>, MorphologyError> {
    let len = width
        .checked_mul(height)
        .ok_or(MorphologyError::KernelTooLarge(width, height))?;

    let mut data = Vec::new();
    data.try_reserve_exact(len)
        .map_err(|_| MorphologyError::KernelTooLarge(width, height))?;
    data.resize(len, 0u8);

    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[rustfmt::skip]
    const ELLIPSE_5X5: [u8; 25] = [
        0, 0, 1, 0, 0,
        1, 1, 1, 1, 1,
        1, 1, 1, 1, 1,
        1, 1, 1, 1, 1,
        0, 0, 1, 0, 0,
    ];

    #[rustfmt::skip]
    const ELLIPSE_7X7: [u8; 49] = [
        0, 0, 0, 1, 0, 0, 0,
        0, 1, 1, 1, 1, 1, 0,
        1, 1, 1, 1, 1, 1, 1,
        1, 1, 1, 1, 1, 1, 1,
        1, 1, 1, 1, 1, 1, 1,
        0, 1, 1, 1, 1, 1, 0,
        0, 0, 0, 1, 0, 0, 0,
    ];

    #[test]
    fn rect_kernel() -> Result<(), MorphologyError> {
        let kernel = Kernel::from_radius(KernelShape::Rect, 1)?;
        assert_eq!(kernel.width(), 3);
        assert_eq!(kernel.height(), 3);
        assert!(kernel.data().iter().all(|&x| x == 1));
        Ok(())
    }

    #[test]
    fn cross_kernel() -> Result<(), MorphologyError> {
        let kernel = Kernel::from_radius(KernelShape::Cross, 1)?;
        let data = kernel.data();
        // center row
        assert_eq!(&data[3..6], &[1, 1, 1]);
        // center column
        assert_eq!(data[1], 1);
        assert_eq!(data[7], 1);
        // corners
        assert_eq!(data[0], 0);
        assert_eq!(data[2], 0);
        assert_eq!(data[6], 0);
        assert_eq!(data[8], 0);
        Ok(())
    }

    #[test]
    fn cross_kernel_follows_anchor() -> Result<(), MorphologyError> {
        let kernel = Kernel::new(KernelShape::Cross, 3, 3, Some(Anchor { x: 0, y: 2 }))?;
        #[rustfmt::skip]
        let expected = [
            1, 0, 0,
            1, 0, 0,
            1, 1, 1,
        ];
        assert_eq!(kernel.data(), &expected);
        Ok(())
    }

    #[test]
    fn ellipse_3x3_is_a_cross() -> Result<(), MorphologyError> {
        let ellipse = Kernel::from_radius(KernelShape::Ellipse, 1)?;
        let cross = Kernel::from_radius(KernelShape::Cross, 1)?;
        assert_eq!(ellipse.data(), cross.data());
        Ok(())
    }

    #[test]
    fn ellipse_kernels() -> Result<(), MorphologyError> {
        let kernel = Kernel::from_radius(KernelShape::Ellipse, 2)?;
        assert_eq!(kernel.data(), &ELLIPSE_5X5);

        let kernel = Kernel::from_radius(KernelShape::Ellipse, 3)?;
        assert_eq!(kernel.data(), &ELLIPSE_7X7);
        Ok(())
    }

    #[test]
    fn ellipse_single_row() -> Result<(), MorphologyError> {
        let kernel = Kernel::new(KernelShape::Ellipse, 5, 1, None)?;
        assert_eq!(kernel.data(), &[0, 0, 1, 0, 0]);
        Ok(())
    }

    #[test]
    fn zero_radius_is_identity() -> Result<(), MorphologyError> {
        for shape in [KernelShape::Rect, KernelShape::Cross, KernelShape::Ellipse] {
            let kernel = Kernel::from_radius(shape, 0)?;
            assert_eq!(kernel.data(), &[1]);
            assert_eq!(kernel.offsets(), vec![(0, 0)]);
        }
        Ok(())
    }

    #[test]
    fn negative_radius() {
        assert_eq!(
            Kernel::from_radius(KernelShape::Rect, -1),
            Err(MorphologyError::InvalidKernelSize(-1))
        );
    }

    #[test]
    fn invalid_dimensions_and_anchor() {
        assert_eq!(
            Kernel::new(KernelShape::Rect, 0, 3, None),
            Err(MorphologyError::EmptyKernel(0, 3))
        );
        assert_eq!(
            Kernel::new(KernelShape::Rect, 3, 3, Some(Anchor { x: 3, y: 0 })),
            Err(MorphologyError::InvalidAnchor(3, 0, 3, 3))
        );
    }

    #[test]
    fn kernel_padding() -> Result<(), MorphologyError> {
        let kernel = Kernel::from_radius(KernelShape::Rect, 2)?;
        assert_eq!(kernel.pad(), (2, 2, 2, 2));

        let kernel = Kernel::new(KernelShape::Rect, 3, 1, Some(Anchor { x: 0, y: 0 }))?;
        assert_eq!(kernel.pad(), (0, 0, 0, 2));
        assert_eq!(kernel.offsets(), vec![(0, 0), (1, 0), (2, 0)]);
        Ok(())
    }

    #[test]
    fn from_mask() -> Result<(), MorphologyError> {
        let kernel = Kernel::from_mask(vec![0, 7, 0, 1, 1, 1, 0, 1, 0], 3, 3, None)?;
        assert_eq!(kernel, Kernel::from_radius(KernelShape::Cross, 1)?);

        assert_eq!(
            Kernel::from_mask(vec![0; 9], 3, 3, None),
            Err(MorphologyError::AllKernelElementsInactive)
        );
        assert_eq!(
            Kernel::from_mask(vec![1; 8], 3, 3, None),
            Err(MorphologyError::InvalidKernelData(8, 9))
        );
        Ok(())
    }

    #[test]
    fn offsets_follow_the_mask() -> Result<(), MorphologyError> {
        let kernel = Kernel::from_radius(KernelShape::Ellipse, 2)?;
        assert_eq!(kernel.count(), 21);
        assert_eq!(kernel.offsets().len(), kernel.count());
        assert_eq!(kernel.offsets()[0], (0, -2));
        assert_eq!(kernel.offsets()[20], (0, 2));

        let anchor = Some(Anchor { x: 1, y: 0 });
        let kernel = Kernel::from_mask(vec![1, 0, 0, 0, 0, 5], 3, 2, anchor)?;
        assert_eq!(kernel.offsets(), vec![(-1, 0), (1, 1)]);
        Ok(())
    }

    #[test]
    fn oversized_kernel_is_an_error() {
        assert!(matches!(
            Kernel::from_radius(KernelShape::Rect, i32::MAX),
            Err(MorphologyError::KernelTooLarge(..))
        ));
    }

    #[test]
    fn shape_codes() {
        assert_eq!(KernelShape::try_from(0), Ok(KernelShape::Rect));
        assert_eq!(KernelShape::try_from(1), Ok(KernelShape::Cross));
        assert_eq!(KernelShape::try_from(2), Ok(KernelShape::Ellipse));
        assert_eq!(
            KernelShape::try_from(3),
            Err(MorphologyError::InvalidKernelShape("3".to_string()))
        );
        assert_eq!("box".parse(), Ok(KernelShape::Rect));
        assert_eq!("Ellipse".parse(), Ok(KernelShape::Ellipse));
        assert!("star".parse::<KernelShape>().is_err());
    }
}
