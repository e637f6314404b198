use ndarray::{ArrayView, Axis, Dimension};

/// Reverses the channel (last) axis, turning BGR into RGB.
///
/// The result is a view over the caller's data; nothing is copied. Any number of
/// channels is accepted, so a BGRA image becomes ARGB rather than RGBA.
pub fn bgr_to_rgb<A, D: Dimension>(mut image: ArrayView<'_, A, D>) -> ArrayView<'_, A, D> {
    if let Some(last) = image.ndim().checked_sub(1) {
        image.invert_axis(Axis(last));
    }
    image
}

/// Reverses the channel (last) axis, turning RGB into BGR.
///
/// Same operation as [`bgr_to_rgb`].
pub fn rgb_to_bgr<A, D: Dimension>(image: ArrayView<'_, A, D>) -> ArrayView<'_, A, D> {
    bgr_to_rgb(image)
}
