use crate::errors::Result;
use ndarray::{ArrayD, ArrayViewD};

/// Box blur provider used by [`crate::box_blur_image_with`].
///
/// Blurring depends on this seam rather than on a concrete filter, so builds without
/// a backend fail with an explicit error instead of deep inside a filter call.
pub trait BlurBackend: Send + Sync {
    /// Applies a normalized `kernel_size x kernel_size` box filter to an `(H, W)` or
    /// `(H, W, C)` image.
    ///
    /// A single channel image may come back as rank 2.
    fn box_blur(&self, image: ArrayViewD<f32>, kernel_size: usize) -> Result<ArrayD<f32>>;

    /// Backend name, for logging.
    fn name(&self) -> &'static str;
}
