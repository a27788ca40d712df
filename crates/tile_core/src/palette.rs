//! Palettes and color quantization.
//!
//! Generators produce continuous values; palettes turn them into discrete
//! sprite colors. Two mappings are provided:
//!
//! - scalar binning (`continuous_to_palette_index`), used when a generator
//!   emits one value per pixel in a known range
//! - nearest color plus nudge (`nearest_palette_index`, `nudge_toward`), used
//!   when a generator emits an RGB triple per pixel

use serde::{Deserialize, Serialize};

use crate::error::{TileError, TileResult};

/// RGBA color with 8-bit channels.
pub type Rgba = [u8; 4];

/// RGB color with 8-bit channels.
pub type Rgb = [u8; 3];

/// An ordered, non-empty list of RGBA colors.
///
/// Serialized as a list of hex strings (`"RRGGBB"` or `"RRGGBBAA"`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Palette {
    colors: Vec<Rgba>,
}

impl Palette {
    /// Create a palette. Fails if `colors` is empty.
    pub fn new(colors: Vec<Rgba>) -> TileResult<Self> {
        if colors.is_empty() {
            return Err(TileError::EmptyPalette);
        }
        Ok(Self { colors })
    }

    /// Create a palette from a fixed, non-empty list of colors.
    pub fn from_array<const N: usize>(colors: [Rgba; N]) -> Self {
        const { assert!(N > 0, "a palette needs at least one color") };
        Self {
            colors: colors.to_vec(),
        }
    }

    /// Create a palette from hex strings, e.g. `["393224", "#74695B"]`.
    ///
    /// Six-digit colors are fully opaque.
    pub fn from_hex<S: AsRef<str>>(hex: &[S]) -> TileResult<Self> {
        let colors = hex
            .iter()
            .map(|h| hex_to_rgba(h.as_ref()))
            .collect::<TileResult<Vec<_>>>()?;
        Self::new(colors)
    }

    pub fn colors(&self) -> &[Rgba] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Color at `index`. Out-of-range indices clamp to the last color.
    pub fn get(&self, index: usize) -> Rgba {
        self.colors[index.min(self.colors.len() - 1)]
    }

    /// RGB channels of the color at `index`.
    pub fn rgb(&self, index: usize) -> Rgb {
        let [r, g, b, _] = self.get(index);
        [r, g, b]
    }

    /// Alpha channel of the color at `index`.
    pub fn alpha(&self, index: usize) -> u8 {
        self.get(index)[3]
    }
}

impl TryFrom<Vec<String>> for Palette {
    type Error = TileError;

    fn try_from(hex: Vec<String>) -> Result<Self, Self::Error> {
        Palette::from_hex(&hex)
    }
}

impl From<Palette> for Vec<String> {
    fn from(palette: Palette) -> Self {
        palette.colors.iter().map(|&c| rgba_to_hex(c)).collect()
    }
}

/// Parse `"RRGGBB"` or `"RRGGBBAA"`, with an optional leading `#`.
pub fn hex_to_rgba(hex: &str) -> TileResult<Rgba> {
    let digits = hex.trim().trim_start_matches('#');
    if !(digits.len() == 6 || digits.len() == 8) || !digits.is_ascii() {
        return Err(TileError::InvalidHexColor(hex.to_string()));
    }
    let channel = |i: usize| {
        u8::from_str_radix(&digits[i..i + 2], 16)
            .map_err(|_| TileError::InvalidHexColor(hex.to_string()))
    };
    let alpha = if digits.len() == 8 { channel(6)? } else { 255 };
    Ok([channel(0)?, channel(2)?, channel(4)?, alpha])
}

/// Format as `"RRGGBB"` for opaque colors, `"RRGGBBAA"` otherwise.
pub fn rgba_to_hex(rgba: Rgba) -> String {
    let [r, g, b, a] = rgba;
    if a == 255 {
        format!("{:02X}{:02X}{:02X}", r, g, b)
    } else {
        format!("{:02X}{:02X}{:02X}{:02X}", r, g, b, a)
    }
}

/// Half-open range `[low, high)` of generator output values.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub low: f64,
    pub high: f64,
}

impl ValueRange {
    pub const UNIT: ValueRange = ValueRange {
        low: 0.0,
        high: 1.0,
    };

    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }
}

impl Default for ValueRange {
    fn default() -> Self {
        Self::UNIT
    }
}

/// Select one of `palette_size` equal-width bins for `value`.
///
/// Bin k covers `[low + k * width, low + (k + 1) * width)`, so a value lying
/// exactly on an edge belongs to the upper bin. Values below `low` map to 0
/// and values at or above `high` map to the last bin.
pub fn continuous_to_palette_index(value: f64, palette_size: usize, range: ValueRange) -> usize {
    if palette_size == 0 {
        return 0;
    }
    let bin_width = (range.high - range.low) / palette_size as f64;
    // Count the left edges at or below the value, as a digitize would.
    let edges_passed = (0..palette_size)
        .take_while(|&k| range.low + k as f64 * bin_width <= value)
        .count();
    edges_passed.saturating_sub(1)
}

/// Palette entry for a continuous value.
pub fn continuous_to_palette_entry(value: f64, palette: &Palette, range: ValueRange) -> Rgba {
    palette.get(continuous_to_palette_index(value, palette.len(), range))
}

/// Quantize a row-major `height x width` matrix into RGB and alpha buffers.
///
/// Each cell picks one palette entry; RGB comes from its first three channels
/// and alpha from the fourth.
pub fn matrix_to_rgb_and_alpha(
    matrix: &[f64],
    width: usize,
    height: usize,
    palette: &Palette,
    range: ValueRange,
) -> TileResult<(Vec<Rgb>, Vec<u8>)> {
    let expected = width * height;
    if matrix.len() < expected {
        return Err(TileError::GeneratorOutput {
            expected,
            actual: matrix.len(),
        });
    }
    let mut rgb = Vec::with_capacity(expected);
    let mut alpha = Vec::with_capacity(expected);
    for &value in &matrix[..expected] {
        let index = continuous_to_palette_index(value, palette.len(), range);
        rgb.push(palette.rgb(index));
        alpha.push(palette.alpha(index));
    }
    Ok((rgb, alpha))
}

fn distance(a: [f64; 3], b: [f64; 3]) -> f64 {
    let dr = a[0] - b[0];
    let dg = a[1] - b[1];
    let db = a[2] - b[2];
    (dr * dr + dg * dg + db * db).sqrt()
}

fn rgb_to_f64(rgb: Rgb) -> [f64; 3] {
    [rgb[0] as f64, rgb[1] as f64, rgb[2] as f64]
}

/// Index of the palette color nearest to `candidate` in RGB space.
///
/// Ties go to the earliest entry.
pub fn nearest_palette_index(candidate: [f64; 3], palette: &Palette) -> usize {
    let mut best = 0;
    let mut best_distance = f64::INFINITY;
    for i in 0..palette.len() {
        let d = distance(candidate, rgb_to_f64(palette.rgb(i)));
        if d < best_distance {
            best = i;
            best_distance = d;
        }
    }
    best
}

/// RGB channels of the palette color nearest to `candidate`.
pub fn nearest_palette_rgb(candidate: [f64; 3], palette: &Palette) -> Rgb {
    palette.rgb(nearest_palette_index(candidate, palette))
}

/// Move `origin` toward `destination` by `factor` of the distance between them.
///
/// Coincident colors have no direction; `origin` is returned unchanged.
pub fn nudge_toward(origin: [f64; 3], destination: [f64; 3], factor: f64) -> [f64; 3] {
    let direction = [
        destination[0] - origin[0],
        destination[1] - origin[1],
        destination[2] - origin[2],
    ];
    let length = distance(origin, destination);
    if length == 0.0 {
        return origin;
    }
    let step = length * factor;
    [
        origin[0] + direction[0] / length * step,
        origin[1] + direction[1] / length * step,
        origin[2] + direction[2] / length * step,
    ]
}

/// Round and clamp a continuous color to 8-bit channels.
pub fn to_rgb8(color: [f64; 3]) -> Rgb {
    color.map(|c| c.round().clamp(0.0, 255.0) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp() -> Palette {
        Palette::new(vec![[0, 0, 0, 0], [1, 1, 1, 1], [2, 2, 2, 2], [3, 3, 3, 3]]).unwrap()
    }

    #[test]
    fn test_quantize_bin_edges() {
        let cases = [
            (0.0, 0),
            (0.249, 0),
            (0.25, 1),
            (0.2501, 1),
            (0.5, 2),
            (0.6, 2),
            (0.999, 3),
        ];
        for (value, expected) in cases {
            assert_eq!(
                continuous_to_palette_index(value, 4, ValueRange::UNIT),
                expected,
                "value {}",
                value
            );
        }
    }

    #[test]
    fn test_quantize_clamps_outside_range() {
        assert_eq!(continuous_to_palette_index(-0.5, 4, ValueRange::UNIT), 0);
        assert_eq!(continuous_to_palette_index(1.0, 4, ValueRange::UNIT), 3);
        assert_eq!(continuous_to_palette_index(7.0, 4, ValueRange::UNIT), 3);
    }

    #[test]
    fn test_quantize_signed_range() {
        let range = ValueRange::new(-1.0, 1.0);
        assert_eq!(continuous_to_palette_index(-1.0, 4, range), 0);
        assert_eq!(continuous_to_palette_index(-0.5, 4, range), 1);
        assert_eq!(continuous_to_palette_index(0.0, 4, range), 2);
        assert_eq!(continuous_to_palette_index(0.99, 4, range), 3);
    }

    #[test]
    fn test_quantize_edge_matches_digitize() {
        // 3 * 0.1 is slightly above 0.3; the edge comparison must agree with it.
        let range = ValueRange::new(0.0, 1.0);
        assert_eq!(continuous_to_palette_index(0.3, 10, range), 2);
        assert_eq!(continuous_to_palette_index(0.2, 10, range), 2);
    }

    #[test]
    fn test_matrix_to_rgb_and_alpha() {
        let matrix = [0.0, 0.2, 0.9, 0.9, 0.49, 0.6, 0.1, 0.7, 0.8];
        let (rgb, alpha) = matrix_to_rgb_and_alpha(&matrix, 3, 3, &ramp(), ValueRange::UNIT)
            .unwrap();
        assert_eq!(alpha, vec![0, 0, 3, 3, 1, 2, 0, 2, 3]);
        let expected_rgb: Vec<Rgb> = alpha.iter().map(|&a| [a, a, a]).collect();
        assert_eq!(rgb, expected_rgb);
    }

    #[test]
    fn test_matrix_too_short() {
        let err = matrix_to_rgb_and_alpha(&[0.0; 3], 2, 2, &ramp(), ValueRange::UNIT).unwrap_err();
        assert!(matches!(
            err,
            TileError::GeneratorOutput {
                expected: 4,
                actual: 3
            }
        ));
    }

    #[test]
    fn test_nearest_is_idempotent_on_palette_colors() {
        let palette = Palette::from_hex(&["393224", "74695B", "869894", "818B8D"]).unwrap();
        for i in 0..palette.len() {
            let color = rgb_to_f64(palette.rgb(i));
            assert_eq!(nearest_palette_rgb(color, &palette), palette.rgb(i));
        }
    }

    #[test]
    fn test_nearest_tie_prefers_first() {
        let palette = Palette::new(vec![[0, 0, 0, 255], [20, 0, 0, 255]]).unwrap();
        assert_eq!(nearest_palette_index([10.0, 0.0, 0.0], &palette), 0);
        assert_eq!(nearest_palette_index([11.0, 0.0, 0.0], &palette), 1);
    }

    #[test]
    fn test_nudge_toward() {
        let nudged = nudge_toward([0.0, 0.0, 0.0], [100.0, 50.0, 0.0], 0.2);
        assert!((nudged[0] - 20.0).abs() < 1e-9);
        assert!((nudged[1] - 10.0).abs() < 1e-9);
        assert!(nudged[2].abs() < 1e-9);
    }

    #[test]
    fn test_nudge_degenerate_returns_origin() {
        let origin = [12.0, 34.0, 56.0];
        let nudged = nudge_toward(origin, origin, 0.2);
        assert_eq!(nudged, origin);
        assert!(nudged.iter().all(|c| c.is_finite()));
    }

    #[test]
    fn test_hex_parsing() {
        assert_eq!(hex_to_rgba("393224").unwrap(), [0x39, 0x32, 0x24, 255]);
        assert_eq!(hex_to_rgba("#ff000080").unwrap(), [255, 0, 0, 128]);
        assert!(hex_to_rgba("12345").is_err());
        assert!(hex_to_rgba("zz0000").is_err());
    }

    #[test]
    fn test_empty_palette_rejected() {
        assert!(matches!(Palette::new(vec![]), Err(TileError::EmptyPalette)));
    }

    #[test]
    fn test_palette_serde_hex() {
        let palette = Palette::new(vec![[0x39, 0x32, 0x24, 255], [1, 2, 3, 4]]).unwrap();
        let json = serde_json::to_string(&palette).unwrap();
        assert_eq!(json, "[\"393224\",\"01020304\"]");
        let back: Palette = serde_json::from_str(&json).unwrap();
        assert_eq!(back, palette);
        assert!(serde_json::from_str::<Palette>("[]").is_err());
    }
}
