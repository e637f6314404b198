pub mod bounding_box;
pub mod box_blur;
pub mod convert_color;
pub mod resize;
pub mod size;

pub use bounding_box::{bounding_box, BoundingBox, Foreground};
pub use box_blur::{blur_backend, box_blur_image, box_blur_image_with, require_blur_backend};
pub use convert_color::{bgr_to_rgb, rgb_to_bgr};
pub use resize::resize_image_to;
pub use size::{get_image_size, ImageSize};

#[cfg(feature = "blur")]
pub use box_blur::SeparableBoxBlur;

use ndarray::{ArrayView, CowArray, Dimension};
use num_traits::AsPrimitive;

use crate::errors::{ImageUtilsError, Result};

/// Image view that resize and blur can read as `f32`.
///
/// `f32` views are borrowed as is; other element types are cast (not rescaled), so a
/// `u8` frame keeps its `0..=255` range.
pub trait IntoF32Image<'a> {
    type Dim: Dimension;

    fn into_f32_image(self) -> CowArray<'a, f32, Self::Dim>;
}

impl<'a, D: Dimension> IntoF32Image<'a> for ArrayView<'a, f32, D> {
    type Dim = D;

    fn into_f32_image(self) -> CowArray<'a, f32, D> {
        CowArray::from(self)
    }
}

macro_rules! impl_into_f32_image_by_cast {
    ($($t:ty),*) => {
        $(
            impl<'a, D: Dimension> IntoF32Image<'a> for ArrayView<'a, $t, D> {
                type Dim = D;

                fn into_f32_image(self) -> CowArray<'a, f32, D> {
                    CowArray::from(self.mapv(|v| AsPrimitive::<f32>::as_(v)))
                }
            }
        )*
    };
}

impl_into_f32_image_by_cast!(u8, u16, u32, i8, i16, i32, f64);

/// Axis layout of an image array accepted by resize and blur.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Layout {
    /// `(H, W)`
    Gray,
    /// `(H, W, C)`
    Channels,
    /// `(1, H, W, C)`
    Batched,
}

impl Layout {
    pub(crate) fn of(shape: &[usize]) -> Result<Self> {
        match shape.len() {
            2 => Ok(Self::Gray),
            3 => Ok(Self::Channels),
            4 if shape[0] == 1 => Ok(Self::Batched),
            4 => Err(ImageUtilsError::invalid_shape(
                shape,
                "only a batch of one image is supported",
            )),
            n if n < 2 => Err(ImageUtilsError::invalid_shape(
                shape,
                "expected at least 2 dimensions",
            )),
            _ => Err(ImageUtilsError::invalid_shape(
                shape,
                "expected at most 4 dimensions",
            )),
        }
    }

    /// Height and width, skipping the batch axis.
    pub(crate) fn spatial_size(self, shape: &[usize]) -> ImageSize {
        match self {
            Self::Batched => ImageSize::new(shape[1], shape[2]),
            Self::Gray | Self::Channels => ImageSize::new(shape[0], shape[1]),
        }
    }
}
