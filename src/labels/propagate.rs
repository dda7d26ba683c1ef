use crate::error::SegError;
use indicatif::{ProgressBar, ProgressStyle};
use ndarray::{Array2, Array3};
use std::collections::HashMap;

/// Re-map arena-local region ids of a freshly segmented slice onto the
/// stable vocabulary of an aligned reference volume, by majority vote over
/// the reference values under each region.
///
/// Regions with no non-zero reference overlap stay 0; they are never
/// invented a label. Vote ties go to the lowest numeric reference label.
pub fn assign_labels(
    cells: &Array2<u32>,
    reference: &Array3<u32>,
) -> Result<Array2<u32>, SegError> {
    let (nslices, nrows, ncols) = reference.dim();
    if cells.dim() != (nrows, ncols) {
        return Err(SegError::DimensionMismatch {
            expected: (nrows, ncols),
            actual: cells.dim(),
        });
    }

    // one pass to gather each region's pixels; regions are then voted on in
    // ascending id order
    let n_regions = cells.iter().copied().max().unwrap_or(0) as usize;
    let mut region_pixels: Vec<Vec<(usize, usize)>> = vec![Vec::new(); n_regions + 1];
    for ((r, c), &v) in cells.indexed_iter() {
        if v != 0 {
            region_pixels[v as usize].push((r, c));
        }
    }

    let progress = ProgressBar::new(n_regions as u64);
    progress.set_style(ProgressStyle::with_template("Labeling {bar:40} {pos}/{len}").unwrap());

    let mut out = Array2::<u32>::zeros((nrows, ncols));
    for pixels in region_pixels.iter().skip(1) {
        progress.inc(1);

        let mut votes: HashMap<u32, usize> = HashMap::new();
        for &(r, c) in pixels {
            for s in 0..nslices {
                let value = reference[[s, r, c]];
                if value != 0 {
                    *votes.entry(value).or_insert(0) += 1;
                }
            }
        }

        let winner = majority(&votes);
        if winner == 0 {
            continue;
        }
        for &(r, c) in pixels {
            out[[r, c]] = winner;
        }
    }
    progress.finish_and_clear();

    return Ok(out);
}

// Argmax over the vote histogram; ties break toward the lowest label so the
// result does not depend on hash iteration order. Empty histogram yields 0.
fn majority(votes: &HashMap<u32, usize>) -> u32 {
    let mut winner: u32 = 0;
    let mut best: usize = 0;
    for (&label, &count) in votes {
        if count > best || (count == best && label < winner) {
            winner = label;
            best = count;
        }
    }
    return winner;
}
