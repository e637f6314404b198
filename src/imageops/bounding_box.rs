use ndarray::{ArrayBase, Data, Dimension};
use num_traits::Zero;

use crate::errors::{ImageUtilsError, Result};

/// Smallest axis-aligned box containing every foreground pixel of a mask.
///
/// All bounds are inclusive pixel indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoundingBox {
    pub rmin: usize,
    pub rmax: usize,
    pub cmin: usize,
    pub cmax: usize,
}

impl BoundingBox {
    pub const fn height(&self) -> usize {
        self.rmax - self.rmin + 1
    }

    pub const fn width(&self) -> usize {
        self.cmax - self.cmin + 1
    }
}

/// Mask element that is either foreground or background.
pub trait Foreground {
    fn is_foreground(&self) -> bool;
}

impl Foreground for bool {
    fn is_foreground(&self) -> bool {
        *self
    }
}

macro_rules! impl_foreground_for_numbers {
    ($($t:ty),*) => {
        $(
            impl Foreground for $t {
                fn is_foreground(&self) -> bool {
                    !self.is_zero()
                }
            }
        )*
    };
}

impl_foreground_for_numbers!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize, f32, f64);

/// Computes the bounding box of the non-zero entries of `mask`.
///
/// Axis 0 is rows and axis 1 is columns; any further axes (channels) are reduced with
/// "any". Fails with [`ImageUtilsError::EmptyMask`] if the mask has no foreground.
pub fn bounding_box<S, D>(mask: &ArrayBase<S, D>) -> Result<BoundingBox>
where
    S: Data,
    S::Elem: Foreground,
    D: Dimension,
{
    let shape = mask.shape();
    if shape.len() < 2 {
        return Err(ImageUtilsError::invalid_shape(
            shape,
            "expected at least 2 dimensions",
        ));
    }

    let mut rows = vec![false; shape[0]];
    let mut cols = vec![false; shape[1]];
    for (index, value) in mask.view().into_dyn().indexed_iter() {
        if value.is_foreground() {
            rows[index[0]] = true;
            cols[index[1]] = true;
        }
    }

    let (rmin, rmax) = first_and_last(&rows).ok_or(ImageUtilsError::EmptyMask)?;
    let (cmin, cmax) = first_and_last(&cols).ok_or(ImageUtilsError::EmptyMask)?;

    Ok(BoundingBox {
        rmin,
        rmax,
        cmin,
        cmax,
    })
}

fn first_and_last(flags: &[bool]) -> Option<(usize, usize)> {
    let first = flags.iter().position(|&flag| flag)?;
    let last = flags.iter().rposition(|&flag| flag)?;
    Some((first, last))
}
