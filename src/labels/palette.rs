use ndarray::{Array2, Array3};
use rand::seq::SliceRandom;

pub type Rgba = [u8; 4];

/// Ordered label-to-color mapping. Entry i is the color of label i; entry 0
/// is the background/transparent color by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorTable {
    colors: Vec<Rgba>,
}

impl ColorTable {
    pub fn new(colors: Vec<Rgba>) -> Self {
        return ColorTable { colors };
    }

    pub fn len(&self) -> usize {
        return self.colors.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.colors.is_empty();
    }

    pub fn color(&self, label: u32) -> Rgba {
        return self.colors[label as usize];
    }

    pub fn colors(&self) -> &[Rgba] {
        return &self.colors;
    }

    /// Position of an exact color match, if any.
    pub fn index_of(&self, color: &Rgba) -> Option<u32> {
        return self.colors.iter().position(|c| c == color).map(|i| i as u32);
    }

    /// Render a label map back to an RGBA plane (rows, cols, 4).
    pub fn recolor(&self, labels: &Array2<u32>) -> Array3<u8> {
        let (nrows, ncols) = labels.dim();
        let mut rgba = Array3::<u8>::zeros((nrows, ncols, 4));
        for ((r, c), &label) in labels.indexed_iter() {
            let color = self.color(label);
            for ch in 0..4 {
                rgba[[r, c, ch]] = color[ch];
            }
        }
        return rgba;
    }
}

/// A table of `n_labels` visually scattered opaque colors (plus the
/// transparent background at index 0) for rendering segmentations for
/// inspection. Hues are evenly spaced and shuffled so neighboring labels
/// don't blend together.
pub fn random_color_table(n_labels: u32) -> ColorTable {
    let mut hues: Vec<f32> = (0..n_labels)
        .map(|i| i as f32 / n_labels.max(1) as f32)
        .collect();
    hues.shuffle(&mut rand::rng());

    let mut colors = Vec::with_capacity(n_labels as usize + 1);
    colors.push([0, 0, 0, 0]);
    for hue in hues {
        let [r, g, b] = hsv_to_rgb(hue, 0.85, 0.95);
        colors.push([r, g, b, 255]);
    }
    return ColorTable::new(colors);
}

fn hsv_to_rgb(h: f32, s: f32, v: f32) -> [u8; 3] {
    let h = (h.fract() + 1.0).fract() * 6.0;
    let i = h.floor() as u32 % 6;
    let f = h - h.floor();
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    let (r, g, b) = match i {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    return [
        (r * 255.0).round() as u8,
        (g * 255.0).round() as u8,
        (b * 255.0).round() as u8,
    ];
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_recolor_paints_labels() {
        let table = ColorTable::new(vec![[0, 0, 0, 0], [255, 0, 0, 255]]);
        let labels = array![[0u32, 1], [1, 0]];
        let rgba = table.recolor(&labels);
        assert_eq!(rgba[[0, 0, 3]], 0);
        assert_eq!(rgba[[0, 1, 0]], 255);
        assert_eq!(rgba[[0, 1, 3]], 255);
    }

    #[test]
    fn test_index_of() {
        let table = ColorTable::new(vec![[0, 0, 0, 0], [1, 2, 3, 255]]);
        assert_eq!(table.index_of(&[1, 2, 3, 255]), Some(1));
        assert_eq!(table.index_of(&[9, 9, 9, 255]), None);
    }

    #[test]
    fn test_random_table_layout() {
        let table = random_color_table(12);
        assert_eq!(table.len(), 13);
        assert_eq!(table.color(0), [0, 0, 0, 0]);
        for label in 1..13 {
            assert_eq!(table.color(label)[3], 255);
        }
    }

    #[test]
    fn test_hsv_primaries() {
        assert_eq!(hsv_to_rgb(0.0, 1.0, 1.0), [255, 0, 0]);
        assert_eq!(hsv_to_rgb(1.0 / 3.0, 1.0, 1.0), [0, 255, 0]);
        assert_eq!(hsv_to_rgb(2.0 / 3.0, 1.0, 1.0), [0, 0, 255]);
    }
}
