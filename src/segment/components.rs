use ndarray::Array2;
use petgraph::unionfind::UnionFind;
use std::collections::HashMap;

/// Two-pass 4-connected component labeling. Returns a map with components
/// numbered 1..=n in raster order of their first pixel (0 = not in mask),
/// and the component count n.
pub fn connected_components(mask: &Array2<bool>) -> (Array2<u32>, u32) {
    let (nrows, ncols) = mask.dim();
    let mut labels = Array2::<u32>::zeros((nrows, ncols));
    let mut merges: Vec<(u32, u32)> = Vec::new();
    let mut next_provisional: u32 = 0;

    // first pass: provisional labels from the up/left neighbors
    for r in 0..nrows {
        for c in 0..ncols {
            if !mask[[r, c]] {
                continue;
            }
            let up = if r > 0 && mask[[r - 1, c]] {
                Some(labels[[r - 1, c]])
            } else {
                None
            };
            let left = if c > 0 && mask[[r, c - 1]] {
                Some(labels[[r, c - 1]])
            } else {
                None
            };
            labels[[r, c]] = match (up, left) {
                (None, None) => {
                    next_provisional += 1;
                    next_provisional
                }
                (Some(a), None) | (None, Some(a)) => a,
                (Some(a), Some(b)) => {
                    if a != b {
                        merges.push((a, b));
                    }
                    a.min(b)
                }
            };
        }
    }

    let mut uf = UnionFind::<u32>::new(next_provisional as usize + 1);
    for (a, b) in merges {
        uf.union(a, b);
    }

    // second pass: collapse equivalence classes to dense ids, assigned in
    // raster order of first occurrence
    let mut dense: HashMap<u32, u32> = HashMap::new();
    let mut n: u32 = 0;
    for label in labels.iter_mut() {
        if *label == 0 {
            continue;
        }
        let root = uf.find_mut(*label);
        *label = *dense.entry(root).or_insert_with(|| {
            n += 1;
            n
        });
    }

    return (labels, n);
}

/// Pixel count per label, including label 0.
pub fn component_areas(labels: &Array2<u32>, n_labels: u32) -> Vec<usize> {
    let mut areas = vec![0usize; n_labels as usize + 1];
    for &label in labels.iter() {
        areas[label as usize] += 1;
    }
    return areas;
}
