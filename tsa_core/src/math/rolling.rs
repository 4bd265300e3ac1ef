use std::collections::VecDeque;

use crate::math::returns::daily_return;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RollingStat {
    pub mean: f64,
    /// Bessel-corrected; NaN when the window holds a single value
    pub std: f64,
}

/// Trailing, right-aligned window over a price stream
#[derive(Debug)]
pub struct RollingWindow {
    window: usize,
    values: VecDeque<f64>,
    nan_cnt: usize,
}

impl RollingWindow {
    pub fn new(window: usize) -> Self {
        Self {
            window,
            values: VecDeque::with_capacity(window + 1),
            nan_cnt: 0,
        }
    }

    /// Push the next value; Some once the window is full and fully defined.
    pub fn add(&mut self, value: f64) -> Option<RollingStat> {
        if self.window == 0 {
            return None;
        }
        self.values.push_back(value);
        if value.is_nan() {
            self.nan_cnt += 1;
        }
        if self.values.len() > self.window {
            if let Some(old) = self.values.pop_front() {
                if old.is_nan() {
                    self.nan_cnt -= 1;
                }
            }
        }

        if self.values.len() < self.window || self.nan_cnt > 0 {
            return None;
        }

        let n = self.values.len() as f64;
        let mean = self.values.iter().sum::<f64>() / n;
        let std = if self.values.len() < 2 {
            f64::NAN
        } else {
            let var = self.values.iter().map(|&x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
            var.sqrt()
        };

        Some(RollingStat { mean, std })
    }
}

/// Rolling mean and sample std; indices before `window - 1` are undefined.
pub fn rolling_mean_std(series: &[f64], window: usize) -> (Vec<f64>, Vec<f64>) {
    let mut model = RollingWindow::new(window);
    series
        .iter()
        .map(|&v| match model.add(v) {
            Some(stat) => (stat.mean, stat.std),
            None => (f64::NAN, f64::NAN),
        })
        .unzip()
}

/// Rolling std of the daily return series
pub fn volatility(prices: &[f64], window: usize) -> Vec<f64> {
    rolling_mean_std(&daily_return(prices), window).1
}
