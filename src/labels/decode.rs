use crate::error::SegError;
use crate::labels::palette::{ColorTable, Rgba};
use itertools::Itertools;
use ndarray::{Array2, Array3};
use std::collections::{BTreeSet, HashMap};

/// Decode a stack of manually color-annotated slices into integer label
/// maps and the color table shared by all of them.
///
/// Colors are collected at full resolution, ordered lexicographically and
/// then stably sorted by alpha ascending, so the fully transparent
/// background color always lands at index 0.
pub fn decode_labels(slices: &[Array3<u8>]) -> Result<(Vec<Array2<u32>>, ColorTable), SegError> {
    let extent = plane_extent(&slices[0])?;
    for slice in &slices[1..] {
        let actual = plane_extent(slice)?;
        if actual != extent {
            return Err(SegError::DimensionMismatch {
                expected: extent,
                actual,
            });
        }
    }

    let mut distinct: BTreeSet<Rgba> = BTreeSet::new();
    for slice in slices {
        for_each_pixel(slice, |color| {
            distinct.insert(color);
        });
    }

    // stable sort, so ordering stays lexicographic within equal alpha
    let colors: Vec<Rgba> = distinct.into_iter().sorted_by_key(|c| c[3]).collect_vec();

    let table = ColorTable::new(colors);
    let mut maps = Vec::with_capacity(slices.len());
    for slice in slices {
        maps.push(decode_with_table(slice, &table)?);
    }
    return Ok((maps, table));
}

/// Decode one RGBA plane against an existing color table. A pixel color
/// absent from the table is an error, never silently background.
pub fn decode_with_table(slice: &Array3<u8>, table: &ColorTable) -> Result<Array2<u32>, SegError> {
    let (nrows, ncols) = plane_extent(slice)?;

    let index: HashMap<Rgba, u32> = table
        .colors()
        .iter()
        .enumerate()
        .map(|(i, &c)| (c, i as u32))
        .collect();

    let mut labels = Array2::<u32>::zeros((nrows, ncols));
    for r in 0..nrows {
        for c in 0..ncols {
            let color = pixel(slice, r, c);
            match index.get(&color) {
                Some(&label) => labels[[r, c]] = label,
                None => return Err(SegError::UnknownColor { color }),
            }
        }
    }
    return Ok(labels);
}

fn plane_extent(slice: &Array3<u8>) -> Result<(usize, usize), SegError> {
    let (nrows, ncols, nchannels) = slice.dim();
    if nchannels != 4 {
        return Err(SegError::DimensionMismatch {
            expected: (nrows, 4),
            actual: (nrows, nchannels),
        });
    }
    return Ok((nrows, ncols));
}

fn pixel(slice: &Array3<u8>, r: usize, c: usize) -> Rgba {
    return [
        slice[[r, c, 0]],
        slice[[r, c, 1]],
        slice[[r, c, 2]],
        slice[[r, c, 3]],
    ];
}

fn for_each_pixel(slice: &Array3<u8>, mut f: impl FnMut(Rgba)) {
    let (nrows, ncols, _) = slice.dim();
    for r in 0..nrows {
        for c in 0..ncols {
            f(pixel(slice, r, c));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLEAR: Rgba = [0, 0, 0, 0];
    const RED: Rgba = [255, 0, 0, 255];
    const BLUE: Rgba = [0, 0, 255, 255];

    fn plane(nrows: usize, ncols: usize, f: impl Fn(usize, usize) -> Rgba) -> Array3<u8> {
        Array3::from_shape_fn((nrows, ncols, 4), |(r, c, ch)| f(r, c)[ch])
    }

    #[test]
    fn test_transparent_color_gets_index_zero() {
        let slice = plane(2, 2, |r, _| if r == 0 { RED } else { CLEAR });
        let (maps, table) = decode_labels(&[slice]).unwrap();
        assert_eq!(table.color(0), CLEAR);
        assert_eq!(table.color(1), RED);
        assert_eq!(maps[0][[0, 0]], 1);
        assert_eq!(maps[0][[1, 0]], 0);
    }

    #[test]
    fn test_equal_alpha_orders_lexicographically() {
        let slice = plane(1, 3, |_, c| [CLEAR, BLUE, RED][c]);
        let (_, table) = decode_labels(&[slice]).unwrap();
        // BLUE sorts before RED on the leading channel
        assert_eq!(table.colors(), &[CLEAR, BLUE, RED]);
    }

    #[test]
    fn test_roundtrip_through_recolor() {
        let slice = plane(4, 4, |r, c| {
            if (r + c) % 3 == 0 {
                CLEAR
            } else if r < 2 {
                RED
            } else {
                BLUE
            }
        });
        let (maps, table) = decode_labels(&[slice.clone()]).unwrap();
        assert_eq!(table.recolor(&maps[0]), slice);
    }

    #[test]
    fn test_unknown_color_is_an_error() {
        let reference = plane(2, 2, |_, _| RED);
        let (_, table) = decode_labels(&[reference]).unwrap();
        let other = plane(2, 2, |_, _| BLUE);
        assert!(matches!(
            decode_with_table(&other, &table),
            Err(SegError::UnknownColor { color: BLUE })
        ));
    }

    #[test]
    fn test_stack_extent_mismatch() {
        let a = plane(2, 2, |_, _| RED);
        let b = plane(3, 2, |_, _| RED);
        assert!(matches!(
            decode_labels(&[a, b]),
            Err(SegError::DimensionMismatch { .. })
        ));
    }
}
