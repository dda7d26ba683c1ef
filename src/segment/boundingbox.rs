use crate::error::SegError;
use ndarray::Array2;

/// Tight bounding box over the non-zero pixels of an image. Bounds are
/// inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BBox {
    pub rmin: usize,
    pub rmax: usize,
    pub cmin: usize,
    pub cmax: usize,
}

pub fn bbox(image: &Array2<u8>) -> Result<BBox, SegError> {
    let (nrows, ncols) = image.dim();
    let mut rmin = nrows;
    let mut rmax = 0;
    let mut cmin = ncols;
    let mut cmax = 0;

    for ((r, c), &v) in image.indexed_iter() {
        if v != 0 {
            rmin = rmin.min(r);
            rmax = rmax.max(r);
            cmin = cmin.min(c);
            cmax = cmax.max(c);
        }
    }

    if rmin == nrows {
        return Err(SegError::EmptyImage);
    }

    return Ok(BBox {
        rmin,
        rmax,
        cmin,
        cmax,
    });
}

/// Crop to the bounding box, expanded by `margin` pixels on every side and
/// clamped to the image extent.
pub fn crop(image: &Array2<u8>, bb: &BBox, margin: usize) -> Array2<u8> {
    let (nrows, ncols) = image.dim();
    let r0 = bb.rmin.saturating_sub(margin);
    let c0 = bb.cmin.saturating_sub(margin);
    let r1 = (bb.rmax + margin + 1).min(nrows);
    let c1 = (bb.cmax + margin + 1).min(ncols);
    return image.slice(ndarray::s![r0..r1, c0..c1]).to_owned();
}

/// Pad a cropped mask back out to the original extent, zero-filled. Inverse
/// of `crop` for the same bounding box and margin.
pub fn uncrop(
    mask: &Array2<bool>,
    original_shape: (usize, usize),
    bb: &BBox,
    margin: usize,
) -> Array2<bool> {
    let r0 = bb.rmin.saturating_sub(margin);
    let c0 = bb.cmin.saturating_sub(margin);
    let mut out = Array2::from_elem(original_shape, false);
    for ((r, c), &v) in mask.indexed_iter() {
        if v {
            out[[r0 + r, c0 + c]] = true;
        }
    }
    return out;
}
