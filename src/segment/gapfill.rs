use crate::error::SegError;
use indicatif::{ProgressBar, ProgressStyle};
use kiddo::float::kdtree::KdTree;
use kiddo::SquaredEuclidean;
use ndarray::Array2;
use rayon::current_num_threads;
use rayon::prelude::*;

/// Coordinates of the set pixels of a mask, in row-major scan order.
pub fn mask_points(mask: &Array2<bool>) -> Vec<[usize; 2]> {
    let mut points = Vec::new();
    for ((r, c), &v) in mask.indexed_iter() {
        if v {
            points.push([r, c]);
        }
    }
    return points;
}

/// Read-only nearest-neighbor index over a fixed set of pixel coordinates.
/// Built once, then shared by reference across workers.
pub struct ContourIndex {
    tree: KdTree<f32, u32, 2, 32, u32>,
}

impl ContourIndex {
    pub fn build(points: &[[usize; 2]]) -> Self {
        let mut tree: KdTree<f32, u32, 2, 32, u32> = KdTree::with_capacity(points.len());
        for (i, p) in points.iter().enumerate() {
            tree.add(&[p[0] as f32, p[1] as f32], i as u32);
        }
        return ContourIndex { tree };
    }

    /// Index of the nearest indexed point. Among equidistant points the
    /// winner depends on the tree's internal traversal order; it is stable
    /// for a fixed point set but otherwise unspecified.
    pub fn nearest(&self, point: &[usize; 2]) -> u32 {
        return self
            .tree
            .nearest_one::<SquaredEuclidean>(&[point[0] as f32, point[1] as f32])
            .item;
    }
}

// Batch count per worker. Small enough to keep per-batch overhead low,
// large enough that uneven batches still balance across the pool.
const BATCHES_PER_WORKER: usize = 3;

/// Assigns every wall pixel the label of its nearest contour pixel,
/// closing the unlabeled seams between regions. Pixels whose nearest
/// contour pixel is itself unlabeled stay 0.
pub fn fill_gaps(
    labels: &Array2<u32>,
    wall_points: &[[usize; 2]],
    contour_points: &[[usize; 2]],
) -> Result<Array2<u32>, SegError> {
    if wall_points.is_empty() {
        return Ok(labels.clone());
    }
    if contour_points.is_empty() {
        return Err(SegError::NoReferenceContour);
    }

    let index = ContourIndex::build(contour_points);

    let nbatches = BATCHES_PER_WORKER * current_num_threads();
    let batch_size = wall_points.len().div_ceil(nbatches).max(1);

    let progress = ProgressBar::new(wall_points.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("Filling gaps {bar:40} {pos}/{len}").unwrap(),
    );

    // workers only read the index; the ordered collect re-joins the batch
    // results in submission order regardless of completion order
    let batches: Vec<Vec<u32>> = wall_points
        .par_chunks(batch_size)
        .map(|batch| {
            let ids: Vec<u32> = batch.iter().map(|p| index.nearest(p)).collect();
            progress.inc(batch.len() as u64);
            ids
        })
        .collect();
    progress.finish_and_clear();

    let nearest_ids: Vec<u32> = batches.into_iter().flatten().collect();

    let mut out = labels.clone();
    for (wall_point, &id) in wall_points.iter().zip(nearest_ids.iter()) {
        let contour_point = contour_points[id as usize];
        let label = labels[[contour_point[0], contour_point[1]]];
        if label != 0 {
            out[[wall_point[0], wall_point[1]]] = label;
        }
    }

    return Ok(out);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::cells::{label_cells_with, LabelOptions};

    fn permissive() -> LabelOptions {
        LabelOptions {
            background_fraction: 1.0,
            min_contour_area: 1,
        }
    }

    #[test]
    fn test_empty_contour_is_an_error() {
        let labels = Array2::<u32>::zeros((4, 4));
        let wall_points = vec![[0, 0]];
        assert!(matches!(
            fill_gaps(&labels, &wall_points, &[]),
            Err(SegError::NoReferenceContour)
        ));
    }

    #[test]
    fn test_no_wall_pixels_is_a_noop() {
        let mut labels = Array2::<u32>::zeros((4, 4));
        labels[[1, 1]] = 3;
        let filled = fill_gaps(&labels, &[], &[[1, 1]]).unwrap();
        assert_eq!(filled, labels);
    }

    #[test]
    fn test_nearest_index_prefers_closer_point() {
        let index = ContourIndex::build(&[[0, 0], [10, 10]]);
        assert_eq!(index.nearest(&[1, 1]), 0);
        assert_eq!(index.nearest(&[9, 9]), 1);
    }

    #[test]
    fn test_two_islands_expand_to_cover_the_wall() {
        // wall everywhere except two 3x3 islands in opposite corners
        let mut wall = Array2::from_elem((10, 10), true);
        for r in 1..4 {
            for c in 1..4 {
                wall[[r, c]] = false;
            }
        }
        for r in 6..9 {
            for c in 6..9 {
                wall[[r, c]] = false;
            }
        }

        let labeling = label_cells_with(&wall, &permissive());
        let filled = fill_gaps(
            &labeling.labels,
            &mask_points(&wall),
            &mask_points(&labeling.contour),
        )
        .unwrap();

        // total coverage: no pixel is left unlabeled
        assert!(filled.iter().all(|&v| v != 0));
        // each island keeps its own identity and claims its near corner
        assert_eq!(filled[[2, 2]], 1);
        assert_eq!(filled[[7, 7]], 2);
        assert_eq!(filled[[0, 0]], 1);
        assert_eq!(filled[[9, 9]], 2);
    }

    #[test]
    fn test_unlabeled_contour_leaves_wall_pixel_untouched() {
        // the only contour pixel carries label 0, so nothing is recovered
        let labels = Array2::<u32>::zeros((3, 3));
        let filled = fill_gaps(&labels, &[[0, 0]], &[[2, 2]]).unwrap();
        assert_eq!(filled, labels);
    }
}
