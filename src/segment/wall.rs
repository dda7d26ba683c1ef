use crate::error::SegError;
use crate::segment::boundingbox::{bbox, crop, uncrop};
use crate::segment::components::{component_areas, connected_components};
use crate::segment::morphology::binary_closing;
use crate::segment::threshold::local_gaussian_threshold;
use ndarray::Array2;

/// Thresholded components smaller than this are treated as noise.
pub const MIN_WALL_AREA: usize = 500;

/// Binary wall mask from a grayscale slice: adaptive local threshold inside
/// the tight bounding box of the non-zero pixels, small-component and
/// background removal, then a 3x3 closing to bridge thin breaks. The result
/// is padded back out to the input extent.
pub fn extract_wall(
    image: &Array2<u8>,
    block_size: usize,
    offset: f32,
) -> Result<Array2<bool>, SegError> {
    return extract_wall_with(image, block_size, offset, MIN_WALL_AREA);
}

pub fn extract_wall_with(
    image: &Array2<u8>,
    block_size: usize,
    offset: f32,
    min_area: usize,
) -> Result<Array2<bool>, SegError> {
    let bb = bbox(image)?;
    let cropped = crop(image, &bb, 1);

    let wall = local_gaussian_threshold(&cropped, block_size, offset);
    let wall = remove_small_components(&wall, min_area);
    let wall = binary_closing(&wall);

    return Ok(uncrop(&wall, image.dim(), &bb, 1));
}

// Drops every component below `min_area`, and the single most populous
// label outright. The latter is usually the empty background; when a huge
// connected blob of foreground beats it, that blob is the artifact to drop.
fn remove_small_components(mask: &Array2<bool>, min_area: usize) -> Array2<bool> {
    let (labels, n_labels) = connected_components(mask);
    let areas = component_areas(&labels, n_labels);

    // first argmax, so ties go to the lowest label
    let mut largest: u32 = 0;
    for (label, &area) in areas.iter().enumerate() {
        if area > areas[largest as usize] {
            largest = label as u32;
        }
    }

    let mut out = Array2::from_elem(mask.dim(), false);
    for ((r, c), &label) in labels.indexed_iter() {
        if label != 0 && label != largest && areas[label as usize] >= min_area {
            out[[r, c]] = true;
        }
    }
    return out;
}
