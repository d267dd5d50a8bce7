//! Small numeric helpers behind the distribution and correlation charts.

use ndarray::{Array1, Array2, Axis};
use ndarray_stats::interpolate::Linear;
use ndarray_stats::{CorrelationExt, QuantileExt};
use noisy_float::types::n64;

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    Array1::from(values.to_vec()).mean()
}

/// Sample standard deviation (n - 1 denominator).
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    Some(Array1::from(values.to_vec()).std(1.0))
}

/// Pearson correlation matrix of equally long columns.
///
/// Entry `(i, j)` is `NaN` when either column has zero variance or there are
/// fewer than two observations. Returns `None` for mismatched lengths.
pub fn pearson_matrix(columns: &[Vec<f64>]) -> Option<Array2<f64>> {
    let observations = columns.first().map_or(0, Vec::len);
    if columns.iter().any(|column| column.len() != observations) {
        return None;
    }

    let variables = columns.len();
    if variables == 0 || observations < 2 {
        return Some(Array2::from_elem((variables, variables), f64::NAN));
    }

    // Rows are variables, columns are observations.
    let data = Array2::from_shape_vec((variables, observations), columns.concat()).ok()?;
    let matrix = data.pearson_correlation().ok()?;
    Some(matrix.mapv(|r| r.clamp(-1.0, 1.0)))
}

/// Linearly interpolated quantile, `q` in `[0, 1]`; `NaN` for empty input.
pub fn quantile(values: &[f64], q: f64) -> f64 {
    let mut data = Array1::from(values.to_vec());
    data.quantile_axis_skipnan_mut(Axis(0), n64(q.clamp(0.0, 1.0)), &Linear)
        .map(|value| value[()])
        .unwrap_or(f64::NAN)
}

pub(crate) fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Gaussian kernel density estimate evaluated at `points`.
pub fn gaussian_kde(values: &[f64], bandwidth: f64, points: &[f64]) -> Vec<f64> {
    let n = values.len() as f64;
    let norm = 1.0 / (n * bandwidth * (2.0 * std::f64::consts::PI).sqrt());
    points
        .iter()
        .map(|&x| {
            values
                .iter()
                .map(|&v| {
                    let z = (x - v) / bandwidth;
                    (-0.5 * z * z).exp()
                })
                .sum::<f64>()
                * norm
        })
        .collect()
}

/// Scott's rule of thumb bandwidth, `None` for degenerate samples.
pub fn scott_bandwidth(values: &[f64]) -> Option<f64> {
    let std = sample_std(values)?;
    if std == 0.0 {
        return None;
    }
    Some(std * (values.len() as f64).powf(-0.2))
}
