use std::path::Path;

use imgmorph_image::{Image, ImageSize};

use crate::error::IoError;

/// Reads an image from the given file path as 8-bit RGB.
///
/// The format is guessed from the file content and any supported colour type
/// (grayscale, alpha, 16-bit, ...) is converted to three 8-bit channels.
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
///
/// # Returns
///
/// An RGB image containing the image data.
///
/// # Errors
///
/// Returns [`IoError::FileDoesNotExist`] if the path does not exist and
/// [`IoError::ImageDecodeError`] if the content cannot be decoded.
pub fn read_image_any_rgb8(file_path: impl AsRef<Path>) -> Result<Image<u8, 3>, IoError> {
    let file_path = file_path.as_ref().to_owned();

    // verify the file exists
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path));
    }

    let img = image::ImageReader::open(&file_path)?
        .with_guessed_format()?
        .decode()?;

    log::debug!(
        "decoded {} as {:?} ({}x{})",
        file_path.display(),
        img.color(),
        img.width(),
        img.height()
    );

    let size = ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    };

    Ok(Image::new(size, img.into_rgb8().into_raw())?)
}

/// Writes an RGB image to the given file path.
///
/// The encoder is selected from the file extension, e.g. `.png` or `.jpg`.
///
/// # Arguments
///
/// * `file_path` - The destination path.
/// * `image` - The image to encode.
///
/// # Errors
///
/// Returns [`IoError::InvalidFileExtension`] when the extension does not map to
/// a known format, and [`IoError::ImageEncodeError`] when encoding or writing fails.
pub fn write_image_any_rgb8(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 3>,
) -> Result<(), IoError> {
    let file_path = file_path.as_ref();

    let format = image::ImageFormat::from_path(file_path)
        .map_err(|_| IoError::InvalidFileExtension(file_path.to_path_buf()))?;

    image::save_buffer_with_format(
        file_path,
        image.as_slice(),
        image.width() as u32,
        image.height() as u32,
        image::ExtendedColorType::Rgb8,
        format,
    )
    .map_err(IoError::ImageEncodeError)?;

    log::debug!("encoded {} as {:?}", file_path.display(), format);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{read_image_any_rgb8, write_image_any_rgb8};
    use crate::error::IoError;
    use imgmorph_image::{Image, ImageSize};

    fn gradient(width: usize, height: usize) -> Result<Image<u8, 3>, IoError> {
        let data = (0..width * height * 3).map(|i| (i % 256) as u8).collect();
        Ok(Image::new(ImageSize { width, height }, data)?)
    }

    #[test]
    fn read_write_png() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("gradient.png");

        let image = gradient(7, 5)?;
        write_image_any_rgb8(&file_path, &image)?;
        assert!(file_path.exists(), "File does not exist: {:?}", file_path);

        let image_back = read_image_any_rgb8(&file_path)?;
        assert_eq!(image_back.size(), image.size());
        assert_eq!(image_back.as_slice(), image.as_slice());

        Ok(())
    }

    #[test]
    fn read_gray_png_as_rgb() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("gray.png");

        let gray = image::GrayImage::from_raw(2, 1, vec![10, 200]).ok_or_else(|| {
            IoError::FileError(std::io::Error::other("invalid gray buffer"))
        })?;
        gray.save(&file_path)?;

        let image = read_image_any_rgb8(&file_path)?;
        assert_eq!(image.num_channels(), 3);
        assert_eq!(image.as_slice(), &[10, 10, 10, 200, 200, 200]);

        Ok(())
    }

    #[test]
    fn read_missing_file() {
        let res = read_image_any_rgb8("/definitely/not/here.png");
        assert!(matches!(res, Err(IoError::FileDoesNotExist(_))));
    }

    #[test]
    fn read_not_an_image() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("notes.png");
        std::fs::write(&file_path, b"this is not an image")?;

        let res = read_image_any_rgb8(&file_path);
        assert!(matches!(res, Err(IoError::ImageDecodeError(_))));

        Ok(())
    }

    #[test]
    fn write_unknown_extension() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("out.unknown");

        let res = write_image_any_rgb8(&file_path, &gradient(2, 2)?);
        assert!(matches!(res, Err(IoError::InvalidFileExtension(_))));
        assert!(!file_path.exists());

        Ok(())
    }
}
