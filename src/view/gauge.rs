use serde::Serialize;

use crate::sim::GpuSample;

/// A coloured range drawn behind the gauge needle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GaugeBand {
    pub from: f64,
    pub to: f64,
    pub color: &'static str,
}

/// Fixed bands: [0,50), [50,80), [80,100].
pub const GAUGE_BANDS: [GaugeBand; 3] = [
    GaugeBand { from: 0.0, to: 50.0, color: "#1f1f3a" },
    GaugeBand { from: 50.0, to: 80.0, color: "#1a1a3d" },
    GaugeBand { from: 80.0, to: 100.0, color: "#3a3aff" },
];

/// The value shown on the GPU gauge. Passed through unchanged.
pub fn to_gauge_value(sample: GpuSample) -> f64 {
    sample.value
}

/// Index into [`GAUGE_BANDS`] of the band containing `value`.
///
/// Values below the gauge fall in the first band, values at or above 100 in the last.
pub fn band_index(value: f64) -> usize {
    GAUGE_BANDS
        .iter()
        .position(|b| value < b.to)
        .unwrap_or(GAUGE_BANDS.len() - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gauge_value_passes_through() {
        assert_eq!(to_gauge_value(GpuSample { value: 73.25 }), 73.25);
    }

    #[test]
    fn test_band_edges() {
        assert_eq!(band_index(0.0), 0);
        assert_eq!(band_index(49.99), 0);
        assert_eq!(band_index(50.0), 1);
        assert_eq!(band_index(79.9), 1);
        assert_eq!(band_index(80.0), 2);
        assert_eq!(band_index(100.0), 2);
    }
}
