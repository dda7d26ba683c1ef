use crate::segment::components::{component_areas, connected_components};
use crate::segment::morphology::binary_dilation;
use ndarray::Array2;

/// Components covering more than this fraction of the frame are assumed to
/// be surrounding medium rather than cells. Heuristic cutoff.
pub const BACKGROUND_FRACTION: f64 = 0.01;

/// Contour pixels of components smaller than this are dropped from the
/// gap-filling reference band.
pub const MIN_CONTOUR_AREA: usize = 20;

#[derive(Debug, Clone, Copy)]
pub struct LabelOptions {
    pub background_fraction: f64,
    pub min_contour_area: usize,
}

impl Default for LabelOptions {
    fn default() -> Self {
        return LabelOptions {
            background_fraction: BACKGROUND_FRACTION,
            min_contour_area: MIN_CONTOUR_AREA,
        };
    }
}

/// An initial per-pixel labeling of the regions enclosed by the wall, plus
/// the contour band used as the gap-filling reference.
pub struct CellLabeling {
    /// Interior regions numbered 1..=n; wall and pruned background are 0.
    pub labels: Array2<u32>,
    /// Wall-adjacent interior pixels, excluding those of tiny components.
    pub contour: Array2<bool>,
}

pub fn label_cells(wall: &Array2<bool>) -> CellLabeling {
    return label_cells_with(wall, &LabelOptions::default());
}

pub fn label_cells_with(wall: &Array2<bool>, opts: &LabelOptions) -> CellLabeling {
    let background = wall.mapv(|v| !v);
    let (mut labels, n_labels) = connected_components(&background);
    let areas = component_areas(&labels, n_labels);

    // contour band: one dilation step of the wall, minus the wall itself.
    // component areas are taken before background pruning below.
    let dilated = binary_dilation(wall);
    let mut contour = Array2::from_elem(wall.dim(), false);
    for ((r, c), &d) in dilated.indexed_iter() {
        if d && !wall[[r, c]] {
            contour[[r, c]] = areas[labels[[r, c]] as usize] >= opts.min_contour_area;
        }
    }

    // anything bigger than a fraction of the frame is surrounding medium
    let background_area = (labels.len() as f64 * opts.background_fraction) as usize;
    for label in labels.iter_mut() {
        if *label != 0 && areas[*label as usize] > background_area {
            *label = 0;
        }
    }

    return CellLabeling { labels, contour };
}
