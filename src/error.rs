use thiserror::Error;

/// Errors raised by the segmentation and labeling pipeline. All of these
/// abort processing of the current slice; none are retried.
#[derive(Debug, Error)]
pub enum SegError {
    #[error("input image is empty, no bounding box to crop to")]
    EmptyImage,

    #[error("contour point set is empty, nearest-neighbor lookup is undefined")]
    NoReferenceContour,

    #[error("pixel color {color:?} does not match any entry in the color table")]
    UnknownColor { color: [u8; 4] },

    #[error("spatial extent mismatch: expected {expected:?}, got {actual:?}")]
    DimensionMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("image i/o error: {0}")]
    Image(#[from] image::ImageError),
}
