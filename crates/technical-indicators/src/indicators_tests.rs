#[cfg(test)]
mod tests {
    use super::super::indicators::*;

    // Helper function to create sample price data
    fn sample_prices() -> Vec<f64> {
        vec![
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08,
            45.89, 46.03, 45.61, 46.28, 46.28, 46.00, 46.03, 46.41, 46.22, 45.64,
        ]
    }

    #[test]
    fn test_sma_basic() {
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let result = sma(&data, 3);

        assert_eq!(result.len(), 3);
        assert!((result[0] - 2.0).abs() < 0.001); // (1+2+3)/3 = 2
        assert!((result[1] - 3.0).abs() < 0.001); // (2+3+4)/3 = 3
        assert!((result[2] - 4.0).abs() < 0.001); // (3+4+5)/3 = 4
    }

    #[test]
    fn test_sma_defined_from_window_minus_one() {
        let prices = sample_prices();
        let result = sma(&prices, 5);

        // One value per index from window-1 onward
        assert_eq!(result.len(), prices.len() - 4);
        let expected_first = (44.34 + 44.09 + 44.15 + 43.61 + 44.33) / 5.0;
        assert!((result[0] - expected_first).abs() < 0.01);
    }

    #[test]
    fn test_sma_window_of_one_is_identity() {
        let data = vec![3.0, 1.0, 4.0];
        assert_eq!(sma(&data, 1), data);
    }

    #[test]
    fn test_sma_window_larger_than_series() {
        let data = vec![1.0, 2.0];
        let result = sma(&data, 5);

        assert_eq!(result.len(), 0);
    }

    #[test]
    fn test_bollinger_bands_alignment() {
        let prices = sample_prices();
        let result = bollinger_bands(&prices, 20, 2.0);

        assert_eq!(result.upper.len(), result.middle.len());
        assert_eq!(result.middle.len(), result.lower.len());
        assert_eq!(result.middle.len(), 1);
    }

    #[test]
    fn test_bollinger_bands_ordering() {
        let prices = sample_prices();
        let result = bollinger_bands(&prices, 10, 2.0);

        for i in 0..result.upper.len() {
            assert!(result.upper[i] >= result.middle[i]);
            assert!(result.middle[i] >= result.lower[i]);
        }
    }

    #[test]
    fn test_bollinger_bands_symmetric_spread() {
        let prices = sample_prices();
        let result = bollinger_bands(&prices, 10, 2.0);

        for i in 0..result.upper.len() {
            let above = result.upper[i] - result.middle[i];
            let below = result.middle[i] - result.lower[i];
            assert!((above - below).abs() < 1e-9);
        }
    }

    #[test]
    fn test_bollinger_bands_sample_std() {
        // Window of 3 over [1, 2, 3]: mean 2, sample variance 1, σ = 1
        let data = vec![1.0, 2.0, 3.0];
        let result = bollinger_bands(&data, 3, 2.0);

        assert_eq!(result.middle.len(), 1);
        assert!((result.middle[0] - 2.0).abs() < 1e-9);
        assert!((result.upper[0] - 4.0).abs() < 1e-9);
        assert!((result.lower[0] - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_bollinger_bands_constant_prices_collapse() {
        let prices = vec![100.0; 20];
        let result = bollinger_bands(&prices, 10, 2.0);

        for i in 0..result.upper.len() {
            assert!((result.upper[i] - result.lower[i]).abs() < 1e-9);
        }
    }

    #[test]
    fn test_bollinger_bands_window_larger_than_series() {
        let data = vec![1.0, 2.0, 3.0];
        let result = bollinger_bands(&data, 10, 2.0);

        assert!(result.upper.is_empty());
        assert!(result.middle.is_empty());
        assert!(result.lower.is_empty());
    }
}
