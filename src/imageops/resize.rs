use image::{imageops, imageops::FilterType, ImageBuffer, Luma};
use ndarray::prelude::*;
use ndarray::CowArray;
use nshare::AsNdarray3;

use crate::errors::{ImageUtilsError, Result};
use crate::imageops::{ImageSize, IntoF32Image, Layout};

/// Resizes `image` to `size` with a bilinear filter, keeping channels and rank.
///
/// Accepts `(H, W)`, `(H, W, C)` and `(1, H, W, C)`; a batch axis is carried through
/// untouched. The result is `f32`. If an `f32` image already has the requested size
/// the input view is returned as is, without copying.
pub fn resize_image_to<'a, I: IntoF32Image<'a>>(
    image: I,
    size: ImageSize,
) -> Result<CowArray<'a, f32, I::Dim>> {
    let image = image.into_f32_image();
    let layout = Layout::of(image.shape())?;
    let current = layout.spatial_size(image.shape());
    if current == size {
        log::debug!("image has already desired size: {}", size);
        return Ok(image);
    }
    if current.is_empty() || size.is_empty() {
        return Err(ImageUtilsError::invalid_shape(
            image.shape(),
            format!("cannot resize between {} and {}", current, size),
        ));
    }

    log::trace!("resizing image from {} to {}", current, size);
    let resized = match layout {
        Layout::Gray => resize_plane(image.view().into_dimensionality::<Ix2>()?, size)?.into_dyn(),
        Layout::Channels => {
            resize_channels(image.view().into_dimensionality::<Ix3>()?, size)?.into_dyn()
        }
        Layout::Batched => {
            let single = image
                .view()
                .into_dimensionality::<Ix4>()?
                .index_axis_move(Axis(0), 0);
            resize_channels(single, size)?
                .insert_axis(Axis(0))
                .into_dyn()
        }
    };

    Ok(CowArray::from(resized.into_dimensionality::<I::Dim>()?))
}

fn resize_channels(image: ArrayView3<f32>, size: ImageSize) -> Result<Array3<f32>> {
    let channels = image.len_of(Axis(2));
    let mut resized = Array3::<f32>::zeros((size.height, size.width, channels));
    for (plane, mut target) in image.axis_iter(Axis(2)).zip(resized.axis_iter_mut(Axis(2))) {
        target.assign(&resize_plane(plane, size)?);
    }
    Ok(resized)
}

fn resize_plane(plane: ArrayView2<f32>, size: ImageSize) -> Result<Array2<f32>> {
    let (height, width) = plane.dim();
    let (min, max) = plane
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    if max <= min {
        return Ok(Array2::from_elem((size.height, size.width), plane[[0, 0]]));
    }

    // image clamps float samples to [0, 1]; the triangle filter never leaves [min, max]
    let range = max - min;
    let normalized = plane.iter().map(|&v| (v - min) / range).collect::<Vec<f32>>();
    let buffer: ImageBuffer<Luma<f32>, Vec<f32>> =
        ImageBuffer::from_raw(to_u32(width)?, to_u32(height)?, normalized).ok_or_else(|| {
            ImageUtilsError::ImageProcessing {
                operation: "plane buffer creation".to_string(),
                source: "buffer length does not match plane dimensions".into(),
            }
        })?;

    let resized = imageops::resize(
        &buffer,
        to_u32(size.width)?,
        to_u32(size.height)?,
        FilterType::Triangle,
    );
    Ok(resized
        .as_ndarray3()
        .index_axis_move(Axis(0), 0)
        .mapv(|v| v * range + min))
}

fn to_u32(dim: usize) -> Result<u32> {
    u32::try_from(dim).map_err(|e| ImageUtilsError::ImageProcessing {
        operation: format!("dimension conversion ({})", dim),
        source: Box::new(e),
    })
}
