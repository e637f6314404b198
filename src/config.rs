use clap::Args;
use ndarray::ArrayD;

use crate::errors::Result;
use crate::imageops::{bgr_to_rgb, box_blur_image, resize_image_to, ImageSize, IntoF32Image};

/// Optional preprocessing settings for a host CLI.
///
/// Meant to be pulled into the host's own clap parser with `#[command(flatten)]`;
/// the helpers in [`crate::imageops`] do not depend on it.
#[derive(Args, Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    /// Resize to HEIGHTxWIDTH
    #[arg(long, value_parser = parse_image_size)]
    pub resize: Option<ImageSize>,

    /// Box blur kernel size (0 disables blurring)
    #[arg(long, default_value_t = 0)]
    pub blur_size: usize,

    /// Input channels are in BGR order
    #[arg(long)]
    pub bgr_input: bool,
}

impl Config {
    /// Applies channel reversal, resize and blur, in that order.
    pub fn prepare<'a, I: IntoF32Image<'a>>(&self, image: I) -> Result<ArrayD<f32>> {
        let image = image.into_f32_image();
        let image = if self.bgr_input {
            bgr_to_rgb(image.view())
        } else {
            image.view()
        };

        let resized = match self.resize {
            Some(size) => resize_image_to(image, size)?,
            None => image.into(),
        };

        let blurred = box_blur_image(resized.view(), self.blur_size)?;
        Ok(blurred.into_owned())
    }
}

fn parse_image_size(s: &str) -> std::result::Result<ImageSize, String> {
    let size: ImageSize = s.parse()?;
    if size.is_empty() {
        return Err(format!("{} is not supported. Both sides must be non-zero", s));
    }
    Ok(size)
}
