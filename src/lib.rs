//! Image array helpers for a body segmentation pipeline.
//!
//! Every helper works on [`ndarray`] views shaped `(H, W)`, `(H, W, C)` or, where
//! noted, `(1, H, W, C)`:
//!
//! - [`get_image_size`]: height and width of an image
//! - [`resize_image_to`]: bilinear resize that skips work when the size already matches
//! - [`box_blur_image`]: box blur through an optional [`BlurBackend`]
//! - [`bgr_to_rgb`] / [`rgb_to_bgr`]: channel order reversal as a view
//! - [`bounding_box`]: bounding box of the foreground of a mask
//!
//! ```
//! use bodypix_image_rs::{bounding_box, resize_image_to, ImageSize};
//! use ndarray::Array3;
//!
//! # fn main() -> bodypix_image_rs::Result<()> {
//! let image = Array3::<f32>::zeros((480, 640, 3));
//! let small = resize_image_to(image.view(), ImageSize::new(240, 320))?;
//! assert_eq!(small.shape(), &[240, 320, 3]);
//!
//! let mut mask = Array3::<u8>::zeros((480, 640, 1));
//! mask[[100, 200, 0]] = 1;
//! let bbox = bounding_box(&mask)?;
//! assert_eq!((bbox.rmin, bbox.cmin), (100, 200));
//! # Ok(())
//! # }
//! ```
//!
//! The crate holds no state and does no I/O. [`Config`] is an optional convenience for a
//! host CLI that wants to expose these steps as flags; nothing in [`imageops`] needs it.
//!
//! ## Features
//!
//! - `blur` (default): built-in box blur backend. Without it, non-zero blur sizes fail
//!   with [`ImageUtilsError::UnavailableDependency`].

pub mod config;
pub mod errors;
pub mod imageops;
pub mod traits;

pub mod mocks;

pub use config::Config;
pub use errors::{ImageUtilsError, Result};
pub use imageops::{
    bgr_to_rgb, blur_backend, bounding_box, box_blur_image, box_blur_image_with,
    get_image_size, require_blur_backend, resize_image_to, rgb_to_bgr, BoundingBox,
    Foreground, ImageSize, IntoF32Image,
};
pub use traits::*;

#[cfg(feature = "blur")]
pub use imageops::SeparableBoxBlur;
