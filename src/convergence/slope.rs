//! Local derivative of an entropy trace.

/// Sliding-window derivative of a series.
///
/// The output starts at offset `window`: element `j` describes the
/// evaluations `j..j + window`.
pub trait AngularCoefficients {
    fn angular_coefficients(&self, series: &[f64], window: usize) -> Vec<f64>;
}

impl<F> AngularCoefficients for F
where
    F: Fn(&[f64], usize) -> Vec<f64>,
{
    fn angular_coefficients(&self, series: &[f64], window: usize) -> Vec<f64> {
        self(series, window)
    }
}

/// Ordinary least-squares slope over each window of `window` evaluations.
///
/// For a series of length `n` this yields `n - window` slopes, so the last
/// evaluation is only ever the right edge of the final window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LeastSquaresSlope;

impl AngularCoefficients for LeastSquaresSlope {
    fn angular_coefficients(&self, series: &[f64], window: usize) -> Vec<f64> {
        if window < 2 || series.len() <= window {
            return Vec::new();
        }
        let w = window as f64;
        // Local abscissae 0..window; the slope is shift invariant.
        let x_mean = (w - 1.0) / 2.0;
        let sxx = w * (w * w - 1.0) / 12.0;

        (0..series.len() - window)
            .map(|start| {
                let ys = &series[start..start + window];
                let y_mean = ys.iter().sum::<f64>() / w;
                let sxy: f64 = ys
                    .iter()
                    .enumerate()
                    .map(|(i, &y)| (i as f64 - x_mean) * (y - y_mean))
                    .sum();
                sxy / sxx
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_series() {
        let series: Vec<f64> = (0..50).map(|i| 3.0 - 0.5 * i as f64).collect();
        let slopes = LeastSquaresSlope.angular_coefficients(&series, 10);
        assert_eq!(slopes.len(), 40);
        assert!(slopes.iter().all(|s| (s + 0.5).abs() < 1e-12));
    }

    #[test]
    fn test_short_series() {
        assert!(LeastSquaresSlope.angular_coefficients(&[1.0, 2.0], 2).is_empty());
        assert!(LeastSquaresSlope.angular_coefficients(&[1.0, 2.0, 3.0], 1).is_empty());
        assert_eq!(LeastSquaresSlope.angular_coefficients(&[1.0, 2.0, 4.0], 2), vec![1.0]);
    }

    #[test]
    fn test_closure_primitive() {
        let diff = |s: &[f64], w: usize| -> Vec<f64> {
            s.windows(w + 1).map(|p| p[w] - p[0]).collect()
        };
        assert_eq!(diff.angular_coefficients(&[0.0, 1.0, 4.0, 9.0], 2), vec![4.0, 8.0]);
    }
}
