use imgmorph::image::{Image, ImageError};
use imgmorph::imgproc::morphology::{
    morphology_ex, BorderMode, Kernel, KernelShape, MorphologyError,
};
use imgmorph::io::{functional as F, IoError};

use crate::request::MorphologyRequest;

/// Failures after the command line was accepted.
///
/// Each variant maps to a process exit code through [`ProcessingError::exit_code`].
#[derive(thiserror::Error, Debug)]
pub enum ProcessingError {
    /// The input could not be decoded: missing, corrupt or unsupported file.
    #[error("Could not open or find the image")]
    EmptyImage(#[source] IoError),

    /// The input decoded to an image without pixels.
    #[error("Could not read the image")]
    NoImageData,

    /// The structuring element could not be built.
    #[error(transparent)]
    Morphology(#[from] MorphologyError),

    /// The transform rejected the image buffers.
    #[error(transparent)]
    Image(#[from] ImageError),

    /// The output could not be encoded or written.
    #[error(transparent)]
    Write(IoError),
}

impl ProcessingError {
    /// Exit code of the process for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            ProcessingError::EmptyImage(_) => 2,
            ProcessingError::NoImageData => 3,
            ProcessingError::Morphology(_)
            | ProcessingError::Image(_)
            | ProcessingError::Write(_) => 1,
        }
    }
}

/// Apply the requested transform to an already decoded image.
///
/// The output has the same size as the input. Out-of-bounds neighbours do not
/// contribute to the result.
///
/// # Errors
///
/// Fails with [`ProcessingError::Morphology`] for an unknown shape code or a
/// negative size.
pub fn apply_morphology(
    image: &Image<u8, 3>,
    request: &MorphologyRequest,
) -> Result<Image<u8, 3>, ProcessingError> {
    let shape = KernelShape::try_from(request.shape)?;
    let kernel = Kernel::from_radius(shape, request.size)?;

    let mut output = Image::from_size_val(image.size(), 0u8)?;
    morphology_ex(
        image,
        &mut output,
        request.operation,
        &kernel,
        BorderMode::Default,
    )?;

    Ok(output)
}

/// Read the input, transform it and write the output.
///
/// Nothing is written unless the transform succeeds.
pub fn run(request: &MorphologyRequest) -> Result<(), ProcessingError> {
    let image = F::read_image_any_rgb8(&request.input).map_err(ProcessingError::EmptyImage)?;

    if image.is_empty() {
        return Err(ProcessingError::NoImageData);
    }

    let output = apply_morphology(&image, request)?;

    F::write_image_any_rgb8(&request.output, &output).map_err(ProcessingError::Write)?;

    log::info!("wrote {} ({})", request.output.display(), output.size());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use imgmorph::image::ImageSize;
    use imgmorph::imgproc::morphology::MorphOperation;

    fn request(size: i32, shape: i32, operation: MorphOperation) -> MorphologyRequest {
        MorphologyRequest {
            size,
            shape,
            operation,
            input: "in.png".into(),
            output: "out.png".into(),
        }
    }

    /// A black rgb image with the given pixels set to white.
    fn fixture(width: usize, height: usize, white: &[(usize, usize)]) -> Image<u8, 3> {
        let mut data = vec![0u8; width * height * 3];
        for &(x, y) in white {
            let idx = (y * width + x) * 3;
            data[idx..idx + 3].fill(255);
        }
        Image::new(ImageSize { width, height }, data).unwrap()
    }

    fn white_pixels(image: &Image<u8, 3>) -> Vec<(usize, usize)> {
        image
            .as_slice()
            .chunks_exact(3)
            .enumerate()
            .filter(|(_, px)| px.iter().all(|&v| v == 255))
            .map(|(i, _)| (i % image.width(), i / image.width()))
            .collect()
    }

    #[test]
    fn fixed_dilation_grows_a_plus() -> Result<(), ProcessingError> {
        let image = fixture(7, 5, &[(3, 2)]);
        let output = apply_morphology(&image, &request(1, 2, MorphOperation::Dilate))?;

        assert_eq!(output.size(), image.size());
        assert_eq!(
            white_pixels(&output),
            vec![(3, 1), (2, 2), (3, 2), (4, 2), (3, 3)]
        );
        Ok(())
    }

    #[test]
    fn erosion_removes_small_regions() -> Result<(), ProcessingError> {
        let image = fixture(6, 6, &[(2, 2), (3, 2), (2, 3)]);
        let output = apply_morphology(&image, &request(1, 2, MorphOperation::Erode))?;

        assert!(output.as_slice().iter().all(|&v| v == 0));
        Ok(())
    }

    #[test]
    fn zero_size_is_identity() -> Result<(), ProcessingError> {
        let image = fixture(4, 4, &[(1, 1), (2, 3)]);
        for operation in [MorphOperation::Dilate, MorphOperation::Erode] {
            let output = apply_morphology(&image, &request(0, 0, operation))?;
            assert_eq!(output, image);
        }
        Ok(())
    }

    #[test]
    fn invalid_shape_and_size() {
        let image = fixture(4, 4, &[]);

        let err = apply_morphology(&image, &request(1, 3, MorphOperation::Dilate)).unwrap_err();
        assert!(matches!(
            err,
            ProcessingError::Morphology(MorphologyError::InvalidKernelShape(_))
        ));
        assert_eq!(err.exit_code(), 1);

        let err = apply_morphology(&image, &request(-1, 0, MorphOperation::Dilate)).unwrap_err();
        assert!(matches!(
            err,
            ProcessingError::Morphology(MorphologyError::InvalidKernelSize(-1))
        ));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn missing_input_is_empty_image() {
        let mut req = request(1, 2, MorphOperation::Dilate);
        req.input = "/definitely/not/here.png".into();

        let err = run(&req).unwrap_err();
        assert!(matches!(err, ProcessingError::EmptyImage(_)));
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.to_string(), "Could not open or find the image");
    }

    #[test]
    fn exit_codes() {
        assert_eq!(ProcessingError::NoImageData.exit_code(), 3);
        assert_eq!(
            ProcessingError::NoImageData.to_string(),
            "Could not read the image"
        );
        assert_eq!(
            ProcessingError::Image(ImageError::InvalidImageSize(1, 1, 2, 2)).exit_code(),
            1
        );
    }
}
