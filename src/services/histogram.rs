use plotters::prelude::*;
use serde::Serialize;
use thiserror::Error;

use crate::services::statistics::{max, min};

pub const DEFAULT_BIN_COUNT: usize = 25;

#[derive(Error, Debug)]
pub enum HistogramError {
    #[error("no histogram bins to draw")]
    Empty,
    #[error("histogram range {min}..{max} is not finite")]
    NonFiniteRange { min: f64, max: f64 },
    #[error("failed to render histogram: {0}")]
    Render(String),
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub min: f64,
    pub max: f64,
    pub count: usize,
    pub label: String,
}

/// Splits `[min, max]` of `samples` into `bin_count` equal-width bins. The
/// last bin is closed on the right so the maximum is counted.
pub fn create_histogram_bins(samples: &[f64], bin_count: usize) -> Vec<HistogramBin> {
    if samples.is_empty() || bin_count == 0 {
        return Vec::new();
    }

    let min_value = min(samples);
    let max_value = max(samples);
    let bin_width = (max_value - min_value) / bin_count as f64;

    let mut bins: Vec<HistogramBin> = (0..bin_count)
        .map(|index| {
            let bin_min = min_value + index as f64 * bin_width;
            let bin_max = min_value + (index + 1) as f64 * bin_width;
            HistogramBin {
                min: bin_min,
                max: bin_max,
                count: 0,
                label: format!("{bin_min:.0}-{bin_max:.0}"),
            }
        })
        .collect();

    for sample in samples {
        let index = bin_index(*sample, min_value, bin_width, bin_count);
        bins[index].count += 1;
    }
    bins
}

fn bin_index(sample: f64, min_value: f64, bin_width: f64, bin_count: usize) -> usize {
    if bin_width <= 0.0 {
        return 0;
    }
    let raw = ((sample - min_value) / bin_width).floor();
    // NaN and negative values saturate to 0 in the cast.
    (raw as usize).min(bin_count - 1)
}

pub fn write_histogram_png(
    output_path: &str,
    bins: &[HistogramBin],
    x_label: &str,
) -> Result<(), HistogramError> {
    let (Some(first), Some(last)) = (bins.first(), bins.last()) else {
        return Err(HistogramError::Empty);
    };

    let x_min = first.min;
    let mut x_max = last.max;
    if !x_min.is_finite() || !x_max.is_finite() {
        return Err(HistogramError::NonFiniteRange {
            min: x_min,
            max: x_max,
        });
    }
    if x_max - x_min < f64::EPSILON {
        x_max = x_min + 1.0;
    }
    let max_count = bins.iter().map(|bin| bin.count).max().unwrap_or(1);

    let root = BitMapBackend::new(output_path, (800, 600)).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| HistogramError::Render(e.to_string()))?;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .caption("Simulation Results", ("sans-serif", 30))
        .x_label_area_size(55)
        .y_label_area_size(65)
        .build_cartesian_2d(x_min..x_max, 0..(max_count + 1))
        .map_err(|e| HistogramError::Render(e.to_string()))?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc(x_label)
        .y_desc("Frequency")
        .label_style(("sans-serif", 18))
        .axis_desc_style(("sans-serif", 22))
        .x_label_formatter(&|value| format!("{value:.0}"))
        .draw()
        .map_err(|e| HistogramError::Render(e.to_string()))?;

    let bar_color = RGBColor(30, 122, 204);
    let bar_style = ShapeStyle::from(&bar_color).filled();
    let single_value = bins[0].max - bins[0].min < f64::EPSILON;
    chart
        .draw_series(bins.iter().map(|bin| {
            let right = if single_value { x_max } else { bin.max };
            Rectangle::new([(bin.min, 0), (right, bin.count)], bar_style)
        }))
        .map_err(|e| HistogramError::Render(e.to_string()))?;

    root.present()
        .map_err(|e| HistogramError::Render(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::sampler::{RngSampler, Sampler};

    #[test]
    fn empty_samples_give_no_bins() {
        assert!(create_histogram_bins(&[], 10).is_empty());
        assert!(create_histogram_bins(&[1.0, 2.0], 0).is_empty());
    }

    #[test]
    fn bins_cover_min_to_max_in_equal_widths() {
        let samples = [0.0, 1.0, 2.5, 4.0, 10.0];
        let bins = create_histogram_bins(&samples, 5);

        assert_eq!(bins.len(), 5);
        assert_eq!(bins[0].min, 0.0);
        assert_eq!(bins[4].max, 10.0);
        for bin in &bins {
            assert!((bin.max - bin.min - 2.0).abs() < 1e-12);
        }
        let counts: Vec<usize> = bins.iter().map(|bin| bin.count).collect();
        assert_eq!(counts, vec![2, 1, 1, 0, 1]);
    }

    #[test]
    fn maximum_lands_in_last_bin() {
        let bins = create_histogram_bins(&[0.0, 3.0], 3);
        assert_eq!(bins[2].count, 1);
        assert_eq!(bins[0].count, 1);
    }

    #[test]
    fn counts_sum_to_sample_count() {
        let mut sampler = RngSampler::seeded(3);
        let samples = sampler.sample_normal(10_000, 70.0, 22.0);
        for bin_count in [1, 7, 25, 100] {
            let bins = create_histogram_bins(&samples, bin_count);
            let total: usize = bins.iter().map(|bin| bin.count).sum();
            assert_eq!(total, samples.len());
        }
    }

    #[test]
    fn identical_samples_fall_in_first_bin() {
        let bins = create_histogram_bins(&[5.0, 5.0, 5.0], 4);
        assert_eq!(bins.len(), 4);
        assert_eq!(bins[0].count, 3);
        assert_eq!(bins[0].label, "5-5");
    }

    #[test]
    fn labels_round_bounds_to_whole_numbers() {
        let bins = create_histogram_bins(&[1400.2, 1599.7], 2);
        assert_eq!(bins[0].label, "1400-1500");
        assert_eq!(bins[1].label, "1500-1600");
    }

    #[test]
    fn nan_samples_share_bounds_with_stats() {
        let samples = [1.0, f64::NAN, 3.0];
        let bins = create_histogram_bins(&samples, 2);
        let stats = crate::services::statistics::calculate_stats(&samples);
        assert_eq!(min(&samples), stats.min);
        assert!(max(&samples).is_nan() && stats.max.is_nan());
        assert!(bins[1].max.is_nan());
        assert_eq!(bins.iter().map(|bin| bin.count).sum::<usize>(), samples.len());
    }

    #[test]
    fn writing_nan_bins_is_an_error() {
        let bins = create_histogram_bins(&[f64::NAN, f64::NAN], 4);
        let dir = assert_fs::TempDir::new().unwrap();
        let path = dir.path().join("nan.png");
        let result = write_histogram_png(path.to_str().unwrap(), &bins, "Value");
        assert!(matches!(result, Err(HistogramError::NonFiniteRange { .. })));
        assert!(!path.exists());
    }

    #[test]
    fn writing_without_bins_is_an_error() {
        let result = write_histogram_png("unused.png", &[], "Value");
        assert!(matches!(result, Err(HistogramError::Empty)));
    }

    #[test]
    fn writes_png_for_finite_bins() {
        let bins = create_histogram_bins(&[1.0, 2.0, 2.5, 4.0], 3);
        let dir = assert_fs::TempDir::new().unwrap();
        let path = dir.path().join("hist.png");
        write_histogram_png(path.to_str().unwrap(), &bins, "Value").unwrap();
        assert!(path.is_file());
    }
}
