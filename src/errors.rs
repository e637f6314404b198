use thiserror::Error;

/// Structured error types for the image array helpers.
///
/// # Why structured errors
///
/// Callers react differently to each failure: an empty mask means "skip this frame",
/// a missing blur backend means "install the feature or stop asking for blur", and a
/// bad shape is a programming error upstream. Separate variants let callers match on
/// the case instead of parsing error strings.
#[derive(Error, Debug)]
pub enum ImageUtilsError {
    #[error("Unavailable dependency: {feature} support is required but not present")]
    UnavailableDependency { feature: String },

    #[error("Empty mask: no foreground pixels")]
    EmptyMask,

    #[error("Invalid shape {shape:?}: {reason}")]
    InvalidShape { shape: Vec<usize>, reason: String },

    #[error("Image processing error: {operation} failed")]
    ImageProcessing {
        operation: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ImageUtilsError {
    pub(crate) fn invalid_shape(shape: &[usize], reason: impl Into<String>) -> Self {
        Self::InvalidShape {
            shape: shape.to_vec(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ImageUtilsError>;

/// Convert ndarray shape errors to image processing errors.
///
/// # Why image processing category
///
/// Shape errors from ndarray only surface while rebuilding arrays inside an operation
/// (never from caller input, which is validated up front), so they are reported as a
/// failed processing step rather than as `InvalidShape`.
impl From<ndarray::ShapeError> for ImageUtilsError {
    fn from(err: ndarray::ShapeError) -> Self {
        Self::ImageProcessing {
            operation: "array shape conversion".to_string(),
            source: Box::new(err),
        }
    }
}
