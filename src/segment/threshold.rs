use ndarray::Array2;

// Mirror index for out-of-range taps, reflecting about the edges of the
// array ("reflect" boundary mode: d c b a | a b c d | d c b a).
fn reflect(mut i: isize, n: isize) -> usize {
    loop {
        if i < 0 {
            i = -i - 1;
        } else if i >= n {
            i = 2 * n - 1 - i;
        } else {
            return i as usize;
        }
    }
}

fn gaussian_kernel(sigma: f32) -> Vec<f32> {
    let radius = (4.0 * sigma + 0.5) as usize;
    let mut kernel = Vec::with_capacity(2 * radius + 1);
    for i in -(radius as isize)..=(radius as isize) {
        let x = i as f32 / sigma;
        kernel.push((-0.5 * x * x).exp());
    }
    let total: f32 = kernel.iter().sum();
    for w in kernel.iter_mut() {
        *w /= total;
    }
    return kernel;
}

// Separable Gaussian blur with reflected borders.
fn gaussian_blur(image: &Array2<f32>, sigma: f32) -> Array2<f32> {
    if sigma <= 0.0 {
        return image.clone();
    }

    let kernel = gaussian_kernel(sigma);
    let radius = (kernel.len() / 2) as isize;
    let (nrows, ncols) = image.dim();

    // horizontal pass
    let mut horiz = Array2::<f32>::zeros((nrows, ncols));
    for r in 0..nrows {
        for c in 0..ncols {
            let mut acc = 0.0;
            for (k, &w) in kernel.iter().enumerate() {
                let cc = reflect(c as isize + k as isize - radius, ncols as isize);
                acc += w * image[[r, cc]];
            }
            horiz[[r, c]] = acc;
        }
    }

    // vertical pass
    let mut out = Array2::<f32>::zeros((nrows, ncols));
    for r in 0..nrows {
        for c in 0..ncols {
            let mut acc = 0.0;
            for (k, &w) in kernel.iter().enumerate() {
                let rr = reflect(r as isize + k as isize - radius, nrows as isize);
                acc += w * horiz[[rr, c]];
            }
            out[[r, c]] = acc;
        }
    }

    return out;
}

/// Spatially adaptive threshold: a pixel is foreground iff its intensity is
/// strictly below a Gaussian-weighted local mean minus `offset`. The window
/// is parameterized by `block_size` through `sigma = (block_size - 1) / 6`,
/// so the kernel covers >99% of the Gaussian mass within the block.
pub fn local_gaussian_threshold(image: &Array2<u8>, block_size: usize, offset: f32) -> Array2<bool> {
    assert!(
        block_size % 2 == 1 && block_size >= 3,
        "block_size must be odd and >= 3"
    );

    let gray = image.mapv(|v| v as f32);
    let sigma = (block_size - 1) as f32 / 6.0;
    let thresh = gaussian_blur(&gray, sigma);

    let mut mask = Array2::from_elem(image.dim(), false);
    for ((r, c), &v) in gray.indexed_iter() {
        mask[[r, c]] = v < thresh[[r, c]] - offset;
    }
    return mask;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reflect_indices() {
        assert_eq!(reflect(-1, 5), 0);
        assert_eq!(reflect(-2, 5), 1);
        assert_eq!(reflect(0, 5), 0);
        assert_eq!(reflect(4, 5), 4);
        assert_eq!(reflect(5, 5), 4);
        assert_eq!(reflect(6, 5), 3);
    }

    #[test]
    fn test_kernel_is_normalized() {
        let kernel = gaussian_kernel(10.0 / 3.0);
        let total: f32 = kernel.iter().sum();
        assert!((total - 1.0).abs() < 1e-5);
        // block_size 21 -> sigma 10/3 -> radius 13
        assert_eq!(kernel.len(), 27);
    }

    #[test]
    fn test_blur_preserves_constant_image() {
        let image = Array2::<f32>::from_elem((16, 16), 42.0);
        let blurred = gaussian_blur(&image, 2.0);
        for &v in blurred.iter() {
            assert!((v - 42.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_uniform_image_has_no_foreground() {
        // local mean equals the pixel everywhere, so with a positive offset
        // nothing falls strictly below it
        let image = Array2::<u8>::from_elem((20, 20), 128);
        let mask = local_gaussian_threshold(&image, 5, 1.0);
        assert!(mask.iter().all(|&v| !v));
    }

    #[test]
    fn test_dark_line_in_bright_field_is_detected() {
        let mut image = Array2::<u8>::from_elem((21, 21), 200);
        for c in 0..21 {
            image[[10, c]] = 20;
        }
        let mask = local_gaussian_threshold(&image, 9, 1.0);
        // the dark line is below its local mean, its bright surroundings are not
        assert!((0..21).all(|c| mask[[10, c]]));
        assert!((0..21).all(|c| !mask[[0, c]]));
    }
}
