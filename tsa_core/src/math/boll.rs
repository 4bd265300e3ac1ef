use crate::math::rolling::{RollingStat, RollingWindow};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollMetric {
    pub up: f64,
    pub mid: f64,
    pub down: f64,
    pub std: f64,
}

/// Streaming Bollinger model over a trailing window
#[derive(Debug)]
pub struct BollModel {
    k: f64,
    window: RollingWindow,
}

impl BollModel {
    pub fn new(period: usize, k: f64) -> Self {
        Self {
            k,
            window: RollingWindow::new(period),
        }
    }

    pub fn add(&mut self, price: f64) -> Option<BollMetric> {
        self.window
            .add(price)
            .map(|RollingStat { mean, std }| BollMetric {
                up: mean + self.k * std,
                mid: mean,
                down: mean - self.k * std,
                std,
            })
    }
}

/// Aligned band series, undefined where the window is not yet full
#[derive(Debug, Clone, Default)]
pub struct BollBands {
    pub mean: Vec<f64>,
    pub std: Vec<f64>,
    pub upper: Vec<f64>,
    pub lower: Vec<f64>,
}

pub fn bollinger_bands(prices: &[f64], period: usize, k: f64) -> BollBands {
    let mut model = BollModel::new(period, k);
    let mut bands = BollBands {
        mean: Vec::with_capacity(prices.len()),
        std: Vec::with_capacity(prices.len()),
        upper: Vec::with_capacity(prices.len()),
        lower: Vec::with_capacity(prices.len()),
    };

    for &price in prices {
        let metric = model.add(price);
        bands.mean.push(metric.map_or(f64::NAN, |m| m.mid));
        bands.std.push(metric.map_or(f64::NAN, |m| m.std));
        bands.upper.push(metric.map_or(f64::NAN, |m| m.up));
        bands.lower.push(metric.map_or(f64::NAN, |m| m.down));
    }
    bands
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_width_is_four_std() {
        let prices: Vec<f64> = (0..60).map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0).collect();
        let bands = bollinger_bands(&prices, 30, 2.0);
        for i in 29..60 {
            let width = bands.upper[i] - bands.lower[i];
            assert!((width - 4.0 * bands.std[i]).abs() < 1e-9);
        }
        assert!(bands.upper[28].is_nan());
    }

    #[test]
    fn test_constant_price_collapses_bands() {
        let bands = bollinger_bands(&[100.0; 35], 30, 2.0);
        for i in 29..35 {
            assert_eq!(bands.std[i], 0.0);
            assert_eq!(bands.upper[i], 100.0);
            assert_eq!(bands.lower[i], 100.0);
        }
    }

    #[test]
    fn test_model_streaming() {
        let mut model = BollModel::new(2, 1.0);
        assert!(model.add(1.0).is_none());
        let m = model.add(3.0).unwrap();
        assert_eq!(m.mid, 2.0);
        assert!((m.std - 2f64.sqrt()).abs() < 1e-12);
        assert!((m.up - (2.0 + 2f64.sqrt())).abs() < 1e-12);
    }
}
