use std::{fmt, str::FromStr};

use ndarray::{ArrayBase, Dimension, RawData};

use crate::errors::{ImageUtilsError, Result};

/// Spatial size of an image, height first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageSize {
    pub height: usize,
    pub width: usize,
}

impl ImageSize {
    pub const fn new(height: usize, width: usize) -> Self {
        Self { height, width }
    }

    pub const fn is_empty(&self) -> bool {
        self.height == 0 || self.width == 0
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.height, self.width)
    }
}

/// Parses `HEIGHTxWIDTH`, e.g. `480x640`.
impl FromStr for ImageSize {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (height, width) = s
            .split_once(|c: char| c == 'x' || c == 'X')
            .ok_or(format!("{} is not a size. Expected HEIGHTxWIDTH", s))?;
        let parse = |v: &str| {
            v.trim()
                .parse::<usize>()
                .map_err(|e| format!("{} is not a size: {}", s, e))
        };
        Ok(Self::new(parse(height)?, parse(width)?))
    }
}

/// Returns the first two axes of `image` as `(height, width)`.
///
/// Any further axes (channels) are ignored. A batch axis is not stripped here.
pub fn get_image_size<S, D>(image: &ArrayBase<S, D>) -> Result<ImageSize>
where
    S: RawData,
    D: Dimension,
{
    match image.shape() {
        [height, width, ..] => Ok(ImageSize::new(*height, *width)),
        shape => Err(ImageUtilsError::invalid_shape(
            shape,
            "expected at least 2 dimensions",
        )),
    }
}
