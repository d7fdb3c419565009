use std::str::FromStr;

use imgmorph_image::{Image, ImageError};
use num_traits::Bounded;
use rayon::prelude::*;

use super::{Kernel, MorphologyError};
use crate::padding::PaddingMode;

/// Border handling for morphological operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderMode<T, const C: usize> {
    /// Out-of-bounds neighbours never affect the result.
    ///
    /// Equivalent to a constant border holding the neutral element of the
    /// operation: the type minimum for dilation and the type maximum for erosion.
    Default,

    /// Out-of-bounds neighbours are taken from the given padding scheme.
    ///
    /// The value is only used by [`PaddingMode::Constant`].
    Padding(PaddingMode, [T; C]),
}

/// Morphological operation selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MorphOperation {
    /// Grow bright regions, see [`dilate`].
    Dilate,
    /// Shrink bright regions, see [`erode`].
    Erode,
    /// Erosion followed by dilation, see [`open`].
    Open,
    /// Dilation followed by erosion, see [`close`].
    Close,
}

/// `0` selects dilation, every other code selects erosion.
impl From<i32> for MorphOperation {
    fn from(code: i32) -> Self {
        if code == 0 {
            MorphOperation::Dilate
        } else {
            MorphOperation::Erode
        }
    }
}

impl FromStr for MorphOperation {
    type Err = MorphologyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dilate" => Ok(MorphOperation::Dilate),
            "erode" => Ok(MorphOperation::Erode),
            "open" => Ok(MorphOperation::Open),
            "close" => Ok(MorphOperation::Close),
            _ => Err(MorphologyError::InvalidOperation(s.to_string())),
        }
    }
}

/// Replace every pixel with the fold of its kernel neighbourhood, channel by channel.
fn reduce_neighborhood<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    kernel: &Kernel,
    border: BorderMode<T, C>,
    neutral: T,
    reduce: fn(T, T) -> T,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync,
{
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            dst.width(),
            dst.height(),
            src.width(),
            src.height(),
        ));
    }

    if src.is_empty() {
        return Ok(());
    }

    let (mode, constant_value) = match border {
        BorderMode::Default => (PaddingMode::Constant, [neutral; C]),
        BorderMode::Padding(mode, value) => (mode, value),
    };

    let width = src.width();
    let height = src.height();
    let offsets = kernel.offsets();
    let src_data = src.as_slice();

    dst.as_slice_mut()
        .par_chunks_exact_mut(width * C)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, out) in row.chunks_exact_mut(C).enumerate() {
                out.fill(neutral);

                for &(dx, dy) in offsets.iter() {
                    let sx = x as isize + dx;
                    let sy = y as isize + dy;

                    let inside =
                        sx >= 0 && sy >= 0 && (sx as usize) < width && (sy as usize) < height;

                    let pixel: &[T] = if inside {
                        let idx = (sy as usize * width + sx as usize) * C;
                        &src_data[idx..idx + C]
                    } else if mode == PaddingMode::Constant {
                        &constant_value
                    } else {
                        let row_idx = mode.map_index(sy, height);
                        let col_idx = mode.map_index(sx, width);
                        let idx = (row_idx * width + col_idx) * C;
                        &src_data[idx..idx + C]
                    };

                    for (o, &p) in out.iter_mut().zip(pixel) {
                        *o = reduce(*o, p);
                    }
                }
            }
        });

    Ok(())
}

/// Dilate an image using a [`Kernel`].
///
/// Dilation expands bright regions in the image. Each pixel is replaced
/// by the maximum value in the neighborhood defined by the kernel.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `dst` - The destination image (will be overwritten).
/// * `kernel` - The morphological structuring element ([`Kernel`]).
/// * `border` - The border handling mode ([`BorderMode`]).
///
/// # Returns
///
/// Ok(()) on success, or [`ImageError`] if the sizes don't match.
///
/// # Example
///
/// ```
/// use imgmorph_image::Image;
/// use imgmorph_imgproc::morphology::{dilate, BorderMode, Kernel, KernelShape};
///
/// let src = Image::<u8, 1>::new([3, 1].into(), vec![0, 255, 0]).unwrap();
/// let mut dst = Image::<u8, 1>::from_size_val(src.size(), 0).unwrap();
/// let kernel = Kernel::from_radius(KernelShape::Rect, 1).unwrap();
///
/// dilate(&src, &mut dst, &kernel, BorderMode::Default).unwrap();
/// assert_eq!(dst.as_slice(), &[255, 255, 255]);
/// ```
pub fn dilate<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    kernel: &Kernel,
    border: BorderMode<T, C>,
) -> Result<(), ImageError>
where
    T: Copy + Ord + Bounded + Send + Sync,
{
    reduce_neighborhood(src, dst, kernel, border, T::min_value(), Ord::max)
}

/// Erode an image using a [`Kernel`].
///
/// Erosion shrinks bright regions in the image. Each pixel is replaced
/// by the minimum value in the neighborhood defined by the kernel.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `dst` - The destination image (will be overwritten).
/// * `kernel` - The morphological structuring element ([`Kernel`]).
/// * `border` - The border handling mode ([`BorderMode`]).
///
/// # Returns
///
/// Ok(()) on success, or [`ImageError`] if the sizes don't match.
pub fn erode<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    kernel: &Kernel,
    border: BorderMode<T, C>,
) -> Result<(), ImageError>
where
    T: Copy + Ord + Bounded + Send + Sync,
{
    reduce_neighborhood(src, dst, kernel, border, T::max_value(), Ord::min)
}

/// Opening: erosion followed by dilation.
///
/// Removes small bright objects and smooths object boundaries.
pub fn open<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    kernel: &Kernel,
    border: BorderMode<T, C>,
) -> Result<(), ImageError>
where
    T: Copy + Ord + Bounded + Send + Sync,
{
    let mut temp_img = src.clone();
    erode(src, &mut temp_img, kernel, border)?;
    dilate(&temp_img, dst, kernel, border)
}

/// Closing: dilation followed by erosion.
///
/// Fills small dark holes and smooths object boundaries.
pub fn close<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    kernel: &Kernel,
    border: BorderMode<T, C>,
) -> Result<(), ImageError>
where
    T: Copy + Ord + Bounded + Send + Sync,
{
    let mut temp_img = src.clone();
    dilate(src, &mut temp_img, kernel, border)?;
    erode(&temp_img, dst, kernel, border)
}

/// Apply the morphological operation selected by `op`.
pub fn morphology_ex<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    op: MorphOperation,
    kernel: &Kernel,
    border: BorderMode<T, C>,
) -> Result<(), ImageError>
where
    T: Copy + Ord + Bounded + Send + Sync,
{
    log::debug!(
        "{op:?} {}x{} image with {}x{} kernel",
        src.width(),
        src.height(),
        kernel.width(),
        kernel.height()
    );

    match op {
        MorphOperation::Dilate => dilate(src, dst, kernel, border),
        MorphOperation::Erode => erode(src, dst, kernel, border),
        MorphOperation::Open => open(src, dst, kernel, border),
        MorphOperation::Close => close(src, dst, kernel, border),
    }
}
