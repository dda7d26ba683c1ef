pub mod boundingbox;
pub mod cells;
pub mod components;
pub mod gapfill;
pub mod morphology;
pub mod threshold;
pub mod wall;

use crate::error::SegError;
use ndarray::Array2;
use self::cells::label_cells;
use self::gapfill::{fill_gaps, mask_points};
use self::wall::extract_wall;

/// Full single-slice segmentation: wall extraction, component labeling,
/// then nearest-neighbor gap filling over the wall skeleton. Every pixel of
/// the result is either 0 (pruned background) or a cell id in 1..=n.
pub fn segment_cells(
    image: &Array2<u8>,
    block_size: usize,
    offset: f32,
) -> Result<Array2<u32>, SegError> {
    let wall = extract_wall(image, block_size, offset)?;
    let labeling = label_cells(&wall);
    return fill_gaps(
        &labeling.labels,
        &mask_points(&wall),
        &mask_points(&labeling.contour),
    );
}
