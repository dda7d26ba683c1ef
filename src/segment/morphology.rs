use ndarray::Array2;

// All operators use the full 3x3 neighborhood. Pixels outside the image are
// treated as empty, so erosion strips the outermost layer at the borders.

pub fn binary_dilation(mask: &Array2<bool>) -> Array2<bool> {
    let (nrows, ncols) = mask.dim();
    let mut out = Array2::from_elem((nrows, ncols), false);
    for ((r, c), &v) in mask.indexed_iter() {
        if !v {
            continue;
        }
        for dr in -1i64..=1 {
            for dc in -1i64..=1 {
                let rr = r as i64 + dr;
                let cc = c as i64 + dc;
                if rr >= 0 && rr < nrows as i64 && cc >= 0 && cc < ncols as i64 {
                    out[[rr as usize, cc as usize]] = true;
                }
            }
        }
    }
    return out;
}

pub fn binary_erosion(mask: &Array2<bool>) -> Array2<bool> {
    let (nrows, ncols) = mask.dim();
    let mut out = Array2::from_elem((nrows, ncols), false);
    for r in 0..nrows {
        for c in 0..ncols {
            let mut all_set = true;
            'window: for dr in -1i64..=1 {
                for dc in -1i64..=1 {
                    let rr = r as i64 + dr;
                    let cc = c as i64 + dc;
                    if rr < 0
                        || rr >= nrows as i64
                        || cc < 0
                        || cc >= ncols as i64
                        || !mask[[rr as usize, cc as usize]]
                    {
                        all_set = false;
                        break 'window;
                    }
                }
            }
            out[[r, c]] = all_set;
        }
    }
    return out;
}

/// Dilation followed by erosion; bridges gaps up to two pixels wide in thin
/// structures without thickening them.
pub fn binary_closing(mask: &Array2<bool>) -> Array2<bool> {
    return binary_erosion(&binary_dilation(mask));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask_from(rows: &[&[u8]]) -> Array2<bool> {
        let nrows = rows.len();
        let ncols = rows[0].len();
        Array2::from_shape_fn((nrows, ncols), |(r, c)| rows[r][c] != 0)
    }

    #[test]
    fn test_dilation_of_single_pixel() {
        let mut mask = Array2::from_elem((5, 5), false);
        mask[[2, 2]] = true;
        let dilated = binary_dilation(&mask);
        let expected = mask_from(&[
            &[0, 0, 0, 0, 0],
            &[0, 1, 1, 1, 0],
            &[0, 1, 1, 1, 0],
            &[0, 1, 1, 1, 0],
            &[0, 0, 0, 0, 0],
        ]);
        assert_eq!(dilated, expected);
    }

    #[test]
    fn test_erosion_inverts_dilation_of_block() {
        let mut mask = Array2::from_elem((7, 7), false);
        for r in 2..5 {
            for c in 2..5 {
                mask[[r, c]] = true;
            }
        }
        let eroded = binary_erosion(&binary_dilation(&mask));
        assert_eq!(eroded, mask);
    }

    #[test]
    fn test_closing_bridges_single_pixel_gap() {
        // horizontal wall with a one-pixel hole in the middle
        let mut mask = Array2::from_elem((5, 7), false);
        for c in 0..7 {
            mask[[2, c]] = true;
        }
        mask[[2, 3]] = false;
        let closed = binary_closing(&mask);
        assert!(closed[[2, 3]]);
    }

    #[test]
    fn test_erosion_removes_border_pixels() {
        let mask = Array2::from_elem((4, 4), true);
        let eroded = binary_erosion(&mask);
        for ((r, c), &v) in eroded.indexed_iter() {
            let interior = r >= 1 && r < 3 && c >= 1 && c < 3;
            assert_eq!(v, interior);
        }
    }
}
