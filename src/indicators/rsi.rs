/// Default RSI lookback window
pub const DEFAULT_RSI_PERIOD: usize = 14;

/// Calculate Relative Strength Index (RSI)
///
/// RSI measures the magnitude of recent price changes to evaluate
/// overbought or oversold conditions. Uses Wilder smoothing: the first
/// `period` changes seed simple averages, every later change is folded in
/// with weight `1 / period`. Only the most recent value is returned.
///
/// Values:
/// - RSI > 70: Overbought
/// - RSI < 30: Oversold
///
/// Returns `None` with fewer than `period + 1` prices or non-finite input.
pub fn calculate_rsi(prices: &[f64], period: usize) -> Option<f64> {
    if period == 0 || prices.len() < period + 1 {
        return None;
    }
    if prices.iter().any(|p| !p.is_finite()) {
        return None;
    }

    let changes: Vec<f64> = prices.windows(2).map(|w| w[1] - w[0]).collect();
    let (seed, rest) = changes.split_at(period);

    let mut avg_gain = seed.iter().map(|c| c.max(0.0)).sum::<f64>() / period as f64;
    let mut avg_loss = seed.iter().map(|c| (-c).max(0.0)).sum::<f64>() / period as f64;

    let weight = (period - 1) as f64;
    for change in rest {
        avg_gain = (avg_gain * weight + change.max(0.0)) / period as f64;
        avg_loss = (avg_loss * weight + (-change).max(0.0)) / period as f64;
    }

    if avg_loss == 0.0 {
        return Some(100.0);
    }

    let rs = avg_gain / avg_loss;
    let rsi = 100.0 - (100.0 / (1.0 + rs));

    Some(rsi)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rsi_seed_is_simple_average() {
        // Changes +2 -1 +3 -1 +2: avg gain 7/5, avg loss 2/5, RS 3.5
        let prices = [100.0, 102.0, 101.0, 104.0, 103.0, 105.0];
        let rsi = calculate_rsi(&prices, 5).unwrap();
        assert!((rsi - 700.0 / 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_rsi_needs_period_plus_one_closes() {
        assert_eq!(calculate_rsi(&[], 14), None);
        assert_eq!(calculate_rsi(&[42.0], 1), None);
        assert!(calculate_rsi(&[42.0, 43.0], 1).is_some());

        let prices: Vec<f64> = (0..14).map(|i| 100.0 + i as f64).collect();
        assert_eq!(calculate_rsi(&prices, 14), None);
    }

    #[test]
    fn test_rsi_constant_increase_long_series() {
        let prices: Vec<f64> = (0..100).map(|i| 20000.0 + 50.0 * i as f64).collect();
        assert_eq!(calculate_rsi(&prices, DEFAULT_RSI_PERIOD), Some(100.0));
    }

    #[test]
    fn test_rsi_constant_decrease() {
        let prices: Vec<f64> = (0..15).map(|i| 100.0 - i as f64).collect();
        assert_eq!(calculate_rsi(&prices, DEFAULT_RSI_PERIOD), Some(0.0));

        let prices: Vec<f64> = (0..100).map(|i| 60000.0 - 100.0 * i as f64).collect();
        assert_eq!(calculate_rsi(&prices, DEFAULT_RSI_PERIOD), Some(0.0));
    }

    #[test]
    fn test_rsi_wilder_smoothing() {
        // 14 alternating +1/-1 changes seed avg gain = avg loss = 0.5,
        // then one +1 change: gain = (0.5*13 + 1)/14, loss = 0.5*13/14
        let mut prices = vec![100.0];
        for i in 0..14 {
            let last = *prices.last().unwrap();
            prices.push(if i % 2 == 0 { last + 1.0 } else { last - 1.0 });
        }
        prices.push(prices.last().unwrap() + 1.0);

        let avg_gain = (0.5 * 13.0 + 1.0) / 14.0;
        let avg_loss = 0.5 * 13.0 / 14.0;
        let expected = 100.0 - 100.0 / (1.0 + avg_gain / avg_loss);

        let rsi = calculate_rsi(&prices, 14).unwrap();
        assert!((rsi - expected).abs() < 1e-9);
        assert!(rsi > 50.0);
    }

    #[test]
    fn test_rsi_rejects_nan_and_zero_period() {
        let mut prices: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        assert!(calculate_rsi(&prices, 0).is_none());

        prices[5] = f64::NAN;
        assert!(calculate_rsi(&prices, 14).is_none());
    }
}
