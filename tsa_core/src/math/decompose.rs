//! Classical additive seasonal decomposition.
//!
//! `series = trend + seasonal + residual`. The trend is a centred moving
//! average (a 2×m filter when the period is even), so the first and last
//! `period / 2` points of trend and residual are undefined.

use thiserror::Error;

use crate::common::utils::mean;

#[derive(Debug, Clone, PartialEq)]
pub struct Decomposition {
    pub trend: Vec<f64>,
    pub seasonal: Vec<f64>,
    pub residual: Vec<f64>,
    pub period: usize,
}

/// Why a series cannot be decomposed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecomposeError {
    #[error("period must be at least 2, got {0}")]
    PeriodTooSmall(usize),
    #[error("series has {len} observations, two complete cycles require {required}")]
    TooShort { len: usize, required: usize },
    #[error("series contains {0} missing values")]
    MissingValues(usize),
}

fn centred_filter(period: usize) -> Vec<f64> {
    let p = period as f64;
    if period % 2 == 0 {
        let mut filt = vec![1.0 / p; period + 1];
        filt[0] = 0.5 / p;
        filt[period] = 0.5 / p;
        filt
    } else {
        vec![1.0 / p; period]
    }
}

fn moving_trend(data: &[f64], period: usize) -> Vec<f64> {
    let filt = centred_filter(period);
    let n = data.len();
    let half = (filt.len() - 1) / 2;
    let mut trend = vec![f64::NAN; n];

    for (i, slot) in trend.iter_mut().enumerate().take(n - half).skip(half) {
        *slot = filt
            .iter()
            .zip(&data[i - half..=i + half])
            .map(|(w, x)| w * x)
            .sum();
    }
    trend
}

pub fn seasonal_decompose(data: &[f64], period: usize) -> Result<Decomposition, DecomposeError> {
    if period < 2 {
        return Err(DecomposeError::PeriodTooSmall(period));
    }
    let required = period * 2;
    if data.len() < required {
        return Err(DecomposeError::TooShort {
            len: data.len(),
            required,
        });
    }
    let missing = data.iter().filter(|v| v.is_nan()).count();
    if missing > 0 {
        return Err(DecomposeError::MissingValues(missing));
    }

    let n = data.len();
    let trend = moving_trend(data, period);
    let detrended: Vec<f64> = data.iter().zip(&trend).map(|(y, t)| y - t).collect();

    // mean of the detrended values sharing each phase of the cycle
    let mut phase_avg: Vec<f64> = (0..period)
        .map(|phase| {
            let vals: Vec<f64> = detrended
                .iter()
                .skip(phase)
                .step_by(period)
                .copied()
                .filter(|v| !v.is_nan())
                .collect();
            mean(&vals).unwrap_or(f64::NAN)
        })
        .collect();

    let avg = mean(&phase_avg).unwrap_or(0.0);
    for s in &mut phase_avg {
        *s -= avg;
    }

    let seasonal: Vec<f64> = (0..n).map(|i| phase_avg[i % period]).collect();
    let residual: Vec<f64> = detrended.iter().zip(&seasonal).map(|(d, s)| d - s).collect();

    Ok(Decomposition {
        trend,
        seasonal,
        residual,
        period,
    })
}
