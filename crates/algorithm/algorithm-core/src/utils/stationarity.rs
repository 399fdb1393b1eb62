//! Stationarity testing used to choose the differencing order.

/// 5% critical value of the KPSS level-stationarity statistic.
pub const KPSS_CRITICAL_5PCT: f64 = 0.463;

/// KPSS statistic for level stationarity.
///
/// Uses a Bartlett-weighted long-run variance with the short lag rule
/// `trunc(4 * (n / 100)^0.25)`. A series with (numerically) zero variance is
/// reported as perfectly stationary (statistic 0).
pub fn kpss_statistic(data: &[f64]) -> f64 {
    let n = data.len();
    if n < 2 {
        return 0.0;
    }

    let mean = data.iter().sum::<f64>() / n as f64;
    let resid: Vec<f64> = data.iter().map(|x| x - mean).collect();

    let lags = (4.0 * (n as f64 / 100.0).powf(0.25)).trunc() as usize;
    let mut long_run = resid.iter().map(|e| e * e).sum::<f64>() / n as f64;
    for k in 1..=lags.min(n - 1) {
        let weight = 1.0 - k as f64 / (lags as f64 + 1.0);
        let autocov: f64 = (k..n).map(|t| resid[t] * resid[t - k]).sum::<f64>() / n as f64;
        long_run += 2.0 * weight * autocov;
    }

    if long_run <= 1e-12 {
        return 0.0;
    }

    let mut partial = 0.0;
    let mut sum_sq = 0.0;
    for e in &resid {
        partial += e;
        sum_sq += partial * partial;
    }

    sum_sq / (n as f64 * n as f64 * long_run)
}

/// Whether the KPSS test rejects level stationarity at 5%.
pub fn is_nonstationary(data: &[f64]) -> bool {
    kpss_statistic(data) > KPSS_CRITICAL_5PCT
}

/// Differencing order (at most `max_d`) needed to reach stationarity.
pub fn ndiffs(data: &[f64], max_d: usize) -> usize {
    let mut current = data.to_vec();
    let mut d = 0;
    while d < max_d && current.len() > 2 && is_nonstationary(&current) {
        current = difference(&current, 1);
        d += 1;
    }
    d
}

/// Apply `order` rounds of first differencing.
pub fn difference(data: &[f64], order: usize) -> Vec<f64> {
    let mut result = data.to_vec();
    for _ in 0..order {
        result = result.windows(2).map(|w| w[1] - w[0]).collect();
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_series_is_stationary() {
        assert_eq!(kpss_statistic(&[5.0; 30]), 0.0);
        assert!(!is_nonstationary(&[5.0; 30]));
    }

    #[test]
    fn test_linear_trend_needs_one_difference() {
        let data: Vec<f64> = (0..24).map(|i| 100.0 + 2.0 * i as f64).collect();
        assert!(is_nonstationary(&data));
        assert_eq!(ndiffs(&data, 2), 1);
    }

    #[test]
    fn test_oscillating_series_is_stationary() {
        let data: Vec<f64> = (0..60).map(|i| (i as f64 * 1.3).sin()).collect();
        assert_eq!(ndiffs(&data, 2), 0);
    }

    #[test]
    fn test_ndiffs_respects_max() {
        let data: Vec<f64> = (0..50).map(|i| (i * i) as f64).collect();
        assert!(ndiffs(&data, 1) <= 1);
        assert_eq!(ndiffs(&data, 0), 0);
    }

    #[test]
    fn test_difference() {
        let data = vec![1.0, 4.0, 9.0, 16.0];
        assert_eq!(difference(&data, 1), vec![3.0, 5.0, 7.0]);
        assert_eq!(difference(&data, 2), vec![2.0, 2.0]);
        assert_eq!(difference(&data, 0), data);
    }
}
