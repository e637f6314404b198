use ndarray::prelude::*;
use ndarray::CowArray;

use crate::errors::{ImageUtilsError, Result};
use crate::imageops::{IntoF32Image, Layout};
use crate::traits::BlurBackend;

#[cfg(feature = "blur")]
static SEPARABLE_BOX_BLUR: SeparableBoxBlur = SeparableBoxBlur;

/// Returns the blur backend compiled into this build, if any.
pub fn blur_backend() -> Option<&'static dyn BlurBackend> {
    #[cfg(feature = "blur")]
    let backend: Option<&'static dyn BlurBackend> = Some(&SEPARABLE_BOX_BLUR);
    #[cfg(not(feature = "blur"))]
    let backend: Option<&'static dyn BlurBackend> = None;
    backend
}

/// Returns the blur backend or fails with [`ImageUtilsError::UnavailableDependency`].
pub fn require_blur_backend() -> Result<&'static dyn BlurBackend> {
    blur_backend().ok_or_else(blur_unavailable)
}

fn blur_unavailable() -> ImageUtilsError {
    ImageUtilsError::UnavailableDependency {
        feature: "blur".to_string(),
    }
}

/// Applies a `blur_size x blur_size` box blur with the built-in backend.
///
/// See [`box_blur_image_with`].
pub fn box_blur_image<'a, I: IntoF32Image<'a>>(
    image: I,
    blur_size: usize,
) -> Result<CowArray<'a, f32, IxDyn>> {
    box_blur_image_with(image, blur_size, blur_backend())
}

/// Applies a `blur_size x blur_size` box blur using `backend`.
///
/// A `blur_size` of 0 returns the input unchanged (an `f32` view is not copied, other
/// element types are only cast). A leading batch axis of one image is dropped before
/// blurring and is not restored, and single channel results always keep a trailing
/// channel axis, so a blurred image is `(H, W, C)` of `f32`.
pub fn box_blur_image_with<'a, I: IntoF32Image<'a>>(
    image: I,
    blur_size: usize,
    backend: Option<&dyn BlurBackend>,
) -> Result<CowArray<'a, f32, IxDyn>> {
    if blur_size == 0 {
        return Ok(image.into_f32_image().into_dyn());
    }
    let backend = backend.ok_or_else(blur_unavailable)?;

    let image = image.into_f32_image().into_dyn();
    let image = match Layout::of(image.shape())? {
        Layout::Batched => {
            log::debug!("dropping batch axis before blur: {:?}", image.shape());
            image.index_axis_move(Axis(0), 0)
        }
        Layout::Gray | Layout::Channels => image,
    };

    log::trace!(
        "box blur {}x{} with {}",
        blur_size,
        blur_size,
        backend.name()
    );
    let blurred = backend.box_blur(image.view(), blur_size)?;
    let blurred = if blurred.ndim() == 2 {
        blurred.insert_axis(Axis(2))
    } else {
        blurred
    };

    Ok(CowArray::from(blurred))
}

/// Normalized box filter applied as a horizontal pass followed by a vertical pass.
///
/// The kernel anchor is `kernel_size / 2` and borders are reflected without repeating
/// the edge pixel (`cba|abcd|dcb`), so even kernel sizes are accepted. Rank is preserved.
#[cfg(feature = "blur")]
#[derive(Debug, Clone, Copy, Default)]
pub struct SeparableBoxBlur;

#[cfg(feature = "blur")]
impl BlurBackend for SeparableBoxBlur {
    fn box_blur(&self, image: ArrayViewD<f32>, kernel_size: usize) -> Result<ArrayD<f32>> {
        if kernel_size == 0 {
            return Ok(image.to_owned());
        }
        let kernel = isize::try_from(kernel_size).map_err(|e| ImageUtilsError::ImageProcessing {
            operation: format!("kernel size conversion ({})", kernel_size),
            source: Box::new(e),
        })?;

        match image.ndim() {
            2 => Ok(blur_plane(image.into_dimensionality::<Ix2>()?, kernel).into_dyn()),
            3 => {
                let image = image.into_dimensionality::<Ix3>()?;
                let mut blurred = Array3::<f32>::zeros(image.raw_dim());
                for (plane, mut target) in image
                    .axis_iter(Axis(2))
                    .zip(blurred.axis_iter_mut(Axis(2)))
                {
                    target.assign(&blur_plane(plane, kernel));
                }
                Ok(blurred.into_dyn())
            }
            _ => Err(ImageUtilsError::invalid_shape(
                image.shape(),
                "box blur expects 2 or 3 dimensions",
            )),
        }
    }

    fn name(&self) -> &'static str {
        "separable-box-blur"
    }
}

#[cfg(feature = "blur")]
fn blur_plane(plane: ArrayView2<f32>, kernel: isize) -> Array2<f32> {
    let mut horizontal = Array2::<f32>::zeros(plane.raw_dim());
    for (src, dst) in plane.rows().into_iter().zip(horizontal.rows_mut()) {
        blur_line(src, dst, kernel);
    }

    let mut blurred = Array2::<f32>::zeros(plane.raw_dim());
    for (src, dst) in horizontal.columns().into_iter().zip(blurred.columns_mut()) {
        blur_line(src, dst, kernel);
    }
    blurred
}

/// Running-sum box filter over one line, accumulated in `f64`.
#[cfg(feature = "blur")]
fn blur_line(src: ArrayView1<f32>, mut dst: ArrayViewMut1<f32>, kernel: isize) {
    let len = src.len();
    if len == 0 {
        return;
    }

    let sample = |i: isize| f64::from(src[reflect_101(i, len)]);
    let start = -(kernel / 2);
    let scale = 1.0 / kernel as f64;
    let mut sum: f64 = (start..start + kernel).map(sample).sum();

    for (x, out) in dst.iter_mut().enumerate() {
        *out = (sum * scale) as f32;
        let leaving = start + x as isize;
        sum += sample(leaving + kernel) - sample(leaving);
    }
}

/// Maps an out-of-range index back into `0..len` by mirroring around the edge pixels.
#[cfg(feature = "blur")]
fn reflect_101(index: isize, len: usize) -> usize {
    if len == 1 {
        return 0;
    }

    let period = 2 * (len as isize - 1);
    let folded = index.rem_euclid(period);
    if folded >= len as isize {
        (period - folded) as usize
    } else {
        folded as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::MockBlurBackend;

    #[test]
    fn test_zero_blur_is_identity() -> Result<()> {
        let image = Array3::<f32>::from_elem((4, 4, 3), 7.0);
        let blurred = box_blur_image(image.view(), 0)?;

        assert!(blurred.is_view());
        assert_eq!(blurred.as_ptr(), image.as_ptr());
        assert_eq!(blurred.shape(), image.shape());
        Ok(())
    }

    #[test]
    fn test_zero_blur_without_backend_is_identity() -> Result<()> {
        let image = Array2::<f32>::zeros((3, 3));
        let blurred = box_blur_image_with(image.view(), 0, None)?;

        assert!(blurred.is_view());
        Ok(())
    }

    #[test]
    fn test_missing_backend_is_reported() {
        let image = Array3::<f32>::zeros((4, 4, 3));
        let err = box_blur_image_with(image.view(), 3, None).unwrap_err();

        assert!(matches!(
            err,
            ImageUtilsError::UnavailableDependency { ref feature } if feature == "blur"
        ));
    }

    #[test]
    fn test_collapsed_single_channel_gets_channel_axis() -> Result<()> {
        let backend = MockBlurBackend::new();
        let image = Array4::<f32>::from_elem((1, 5, 6, 1), 0.5);
        let blurred = box_blur_image_with(image.view(), 1, Some(&backend))?;

        assert_eq!(blurred.shape(), &[5, 6, 1]);
        assert_eq!(backend.calls(), 1);
        Ok(())
    }

    #[test]
    fn test_u8_image_is_cast_before_backend() -> Result<()> {
        let backend = MockBlurBackend::new();
        let image = Array3::<u8>::from_elem((3, 4, 3), 250);
        let blurred = box_blur_image_with(image.view(), 3, Some(&backend))?;

        assert_eq!(blurred.shape(), &[3, 4, 3]);
        assert!(blurred.iter().all(|&v| v == 250.0));
        Ok(())
    }

    #[test]
    fn test_larger_batches_are_rejected() {
        let backend = MockBlurBackend::new();
        let image = Array4::<f32>::zeros((2, 5, 6, 1));

        assert!(matches!(
            box_blur_image_with(image.view(), 3, Some(&backend)),
            Err(ImageUtilsError::InvalidShape { .. })
        ));
        assert_eq!(backend.calls(), 0);
    }

    #[cfg(feature = "blur")]
    mod separable {
        use super::*;
        use ndarray::array;

        fn assert_close(actual: ArrayViewD<f32>, expected: ArrayViewD<f32>) {
            assert_eq!(actual.shape(), expected.shape());
            for (a, e) in actual.iter().zip(expected.iter()) {
                assert!(
                    (a - e).abs() <= 1e-5 * e.abs().max(1.0),
                    "{} != {}\n{:?}",
                    a,
                    e,
                    actual
                );
            }
        }

        /// Per-window average with every index reflected independently.
        fn windowed_average(line: &[f64], kernel: usize) -> Vec<f64> {
            let start = -((kernel / 2) as isize);
            (0..line.len())
                .map(|x| {
                    let sum: f64 = (0..kernel as isize)
                        .map(|k| line[reflect_101(start + x as isize + k, line.len())])
                        .sum();
                    sum / kernel as f64
                })
                .collect()
        }

        #[test]
        fn test_reflect_101() {
            let mapped: Vec<usize> = (-3..8).map(|i| reflect_101(i, 5)).collect();
            assert_eq!(mapped, vec![3, 2, 1, 0, 1, 2, 3, 4, 3, 2, 1]);
            assert_eq!(reflect_101(-4, 1), 0);
            assert_eq!(reflect_101(9, 2), 1);
            assert_eq!(reflect_101(8, 5), 0);
            assert_eq!(reflect_101(-1_000_000_001, 5), 1);
            assert_eq!(reflect_101(isize::MAX, 3), 1);
        }

        #[test]
        fn test_high_dynamic_range_row() -> Result<()> {
            let image = array![[1e8f32, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0]];
            let blurred = box_blur_image(image.view(), 3)?;

            let head = ((1e8f64 + 2.0) / 3.0) as f32;
            let expected = array![[head, head, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0]]
                .insert_axis(Axis(2))
                .into_dyn();
            assert_close(blurred.view(), expected.view());
            Ok(())
        }

        #[test]
        fn test_kernel_larger_than_image() -> Result<()> {
            let row = [3.0f32, -1.0, 8.0];
            let image = Array2::from_shape_vec((1, 3), row.to_vec())?;
            let line: Vec<f64> = row.iter().map(|&v| f64::from(v)).collect();

            for kernel_size in [4, 5, 7, 10, 1001] {
                let blurred = box_blur_image(image.view(), kernel_size)?;
                let expected: Vec<f32> = windowed_average(&line, kernel_size)
                    .into_iter()
                    .map(|v| v as f32)
                    .collect();
                let expected = Array3::from_shape_vec((1, 3, 1), expected)?.into_dyn();
                assert_close(blurred.view(), expected.view());
            }
            Ok(())
        }

        #[test]
        fn test_huge_kernel_on_tiny_image() -> Result<()> {
            let image = Array2::<f32>::ones((2, 2));
            let blurred = box_blur_image(image.view(), 200_000)?;

            assert_eq!(blurred.shape(), &[2, 2, 1]);
            assert_close(blurred.view(), Array3::<f32>::ones((2, 2, 1)).view().into_dyn());
            Ok(())
        }

        #[test]
        fn test_u8_blur_matches_f32_blur() -> Result<()> {
            let image = Array3::from_shape_fn((5, 6, 3), |(y, x, c)| ((y * 40 + x * 7 + c) % 256) as u8);
            let as_f32 = image.mapv(f32::from);

            let from_u8 = box_blur_image(image.view(), 3)?;
            let from_f32 = box_blur_image(as_f32.view(), 3)?;
            assert_close(from_u8.view(), from_f32.view());
            Ok(())
        }

        #[test]
        fn test_constant_image_is_unchanged() -> Result<()> {
            let image = Array3::<f32>::from_elem((6, 7, 2), 42.0);
            for kernel_size in [1, 2, 3, 4, 9] {
                let blurred = box_blur_image(image.view(), kernel_size)?;
                assert_close(blurred.view(), image.view().into_dyn());
            }
            Ok(())
        }

        #[test]
        fn test_impulse_spreads_over_kernel() -> Result<()> {
            let mut image = Array2::<f32>::zeros((5, 5));
            image[[2, 2]] = 9.0;
            let blurred = box_blur_image(image.view(), 3)?;

            let mut expected = Array3::<f32>::zeros((5, 5, 1));
            expected.slice_mut(s![1..4, 1..4, ..]).fill(1.0);
            assert_close(blurred.view(), expected.view().into_dyn());
            Ok(())
        }

        #[test]
        fn test_even_kernel_anchor() -> Result<()> {
            // anchor at k / 2: window for x is [x - 1, x]
            let image = array![[0.0f32, 2.0, 4.0, 6.0]];
            let blurred = SeparableBoxBlur.box_blur(image.view().into_dyn(), 2)?;

            // vertical pass over a single row only reflects onto itself
            let expected = array![[1.0f32, 1.0, 3.0, 5.0]].into_dyn();
            assert_close(blurred.view(), expected.view());
            Ok(())
        }

        #[test]
        fn test_batched_single_channel_blur() -> Result<()> {
            let image = Array4::<f32>::from_shape_fn((1, 4, 4, 1), |(_, y, x, _)| (y + x) as f32);
            let blurred = box_blur_image(image.view(), 1)?;

            assert_eq!(blurred.shape(), &[4, 4, 1]);
            assert_close(
                blurred.view(),
                image.index_axis(Axis(0), 0).into_dyn(),
            );
            Ok(())
        }

        #[test]
        fn test_require_backend() -> Result<()> {
            let backend = require_blur_backend()?;
            assert_eq!(backend.name(), "separable-box-blur");
            Ok(())
        }
    }

    #[cfg(not(feature = "blur"))]
    #[test]
    fn test_blur_without_feature_fails() {
        let image = Array3::<f32>::zeros((4, 4, 3));
        assert!(matches!(
            box_blur_image(image.view(), 3),
            Err(ImageUtilsError::UnavailableDependency { .. })
        ));
        assert!(require_blur_backend().is_err());
    }
}
