//! Technical indicator computation over daily candles.
//!
//! Computes RSI(14), MACD(12/26/9), SMA(50/200), ADX(14), and a 20-day
//! volume trend from a chronological candle series. Each indicator fills
//! its slot in [`TechnicalSnapshot`] only when the series is long enough
//! for it; a short series degrades to `None` per indicator rather than
//! failing the whole snapshot.

use statrs::statistics::Statistics;
use thiserror::Error;

use crate::data::Candle;
use crate::rating::{TechnicalSnapshot, VolumeTrend};

/// Fewest candles worth attempting any indicator on.
pub const MIN_BARS: usize = 30;

const RSI_PERIOD: usize = 14;
const MACD_FAST: usize = 12;
const MACD_SLOW: usize = 26;
const MACD_SIGNAL: usize = 9;
const ADX_PERIOD: usize = 14;
const VOLUME_WINDOW: usize = 20;

#[derive(Debug, Error)]
pub enum IndicatorError {
    #[error("历史K线不足: 需要 {required} 根，仅有 {available} 根")]
    InsufficientHistory { required: usize, available: usize },
}

/// Compute all indicators for a chronological (oldest first) candle series.
pub fn compute_snapshot(candles: &[Candle]) -> Result<TechnicalSnapshot, IndicatorError> {
    if candles.len() < MIN_BARS {
        return Err(IndicatorError::InsufficientHistory {
            required: MIN_BARS,
            available: candles.len(),
        });
    }

    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    let volumes: Vec<f64> = candles.iter().map(|c| c.volume).collect();

    let (macd, macd_signal) = match macd(&closes) {
        Some((line, signal)) => (Some(line), Some(signal)),
        None => (None, None),
    };

    Ok(TechnicalSnapshot {
        rsi: rsi(&closes, RSI_PERIOD),
        macd,
        macd_signal,
        sma50: sma(&closes, 50),
        sma200: sma(&closes, 200),
        adx: adx(candles, ADX_PERIOD),
        volume_trend: volume_trend(&volumes),
    })
}

/// Simple moving average of the last `period` values.
pub fn sma(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }
    Some(values[values.len() - period..].iter().mean())
}

/// Wilder-smoothed RSI. An all-gain window saturates at 100.
pub fn rsi(closes: &[f64], period: usize) -> Option<f64> {
    if period == 0 || closes.len() < period + 1 {
        return None;
    }

    let deltas: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();

    let mut avg_gain = deltas[..period].iter().filter(|d| **d > 0.0).sum::<f64>() / period as f64;
    let mut avg_loss = deltas[..period].iter().filter(|d| **d < 0.0).sum::<f64>().abs() / period as f64;

    for delta in &deltas[period..] {
        let gain = delta.max(0.0);
        let loss = (-delta).max(0.0);
        avg_gain = (avg_gain * (period as f64 - 1.0) + gain) / period as f64;
        avg_loss = (avg_loss * (period as f64 - 1.0) + loss) / period as f64;
    }

    if avg_loss == 0.0 {
        return Some(100.0);
    }

    let rs = avg_gain / avg_loss;
    Some(100.0 - 100.0 / (1.0 + rs))
}

/// Exponential moving average series, seeded with the SMA of the first
/// `period` values. Output index 0 corresponds to input index `period - 1`.
fn ema_series(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || values.len() < period {
        return Vec::new();
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len() - period + 1);
    let mut prev = values[..period].iter().mean();
    out.push(prev);

    for &value in &values[period..] {
        prev = value * k + prev * (1.0 - k);
        out.push(prev);
    }

    out
}

/// Latest MACD line and signal line. Needs enough closes for the slow EMA
/// plus the signal EMA over the MACD series.
pub fn macd(closes: &[f64]) -> Option<(f64, f64)> {
    if closes.len() < MACD_SLOW + MACD_SIGNAL - 1 {
        return None;
    }

    let fast = ema_series(closes, MACD_FAST);
    let slow = ema_series(closes, MACD_SLOW);

    // Both series end at the last close; align the fast series to the slow one
    let offset = fast.len() - slow.len();
    let line: Vec<f64> = slow
        .iter()
        .enumerate()
        .map(|(i, s)| fast[i + offset] - s)
        .collect();

    let signal = ema_series(&line, MACD_SIGNAL);
    match (line.last(), signal.last()) {
        (Some(&l), Some(&s)) => Some((l, s)),
        _ => None,
    }
}

/// Wilder ADX. Needs `2 * period + 1` candles for the initial DX average.
pub fn adx(candles: &[Candle], period: usize) -> Option<f64> {
    if period == 0 || candles.len() < 2 * period + 1 {
        return None;
    }

    let mut trs = Vec::with_capacity(candles.len() - 1);
    let mut plus_dms = Vec::with_capacity(candles.len() - 1);
    let mut minus_dms = Vec::with_capacity(candles.len() - 1);

    for pair in candles.windows(2) {
        let (prev, cur) = (&pair[0], &pair[1]);
        let tr = (cur.high - cur.low)
            .max((cur.high - prev.close).abs())
            .max((cur.low - prev.close).abs());
        trs.push(tr);

        let up = cur.high - prev.high;
        let down = prev.low - cur.low;
        plus_dms.push(if up > down && up > 0.0 { up } else { 0.0 });
        minus_dms.push(if down > up && down > 0.0 { down } else { 0.0 });
    }

    let p = period as f64;
    let mut smoothed_tr: f64 = trs[..period].iter().sum();
    let mut smoothed_plus: f64 = plus_dms[..period].iter().sum();
    let mut smoothed_minus: f64 = minus_dms[..period].iter().sum();

    let dx_at = |tr: f64, plus: f64, minus: f64| -> f64 {
        if tr == 0.0 {
            return 0.0;
        }
        let plus_di = 100.0 * plus / tr;
        let minus_di = 100.0 * minus / tr;
        let di_sum = plus_di + minus_di;
        if di_sum == 0.0 {
            0.0
        } else {
            100.0 * (plus_di - minus_di).abs() / di_sum
        }
    };

    let mut dx_values = vec![dx_at(smoothed_tr, smoothed_plus, smoothed_minus)];
    for i in period..trs.len() {
        smoothed_tr = smoothed_tr - smoothed_tr / p + trs[i];
        smoothed_plus = smoothed_plus - smoothed_plus / p + plus_dms[i];
        smoothed_minus = smoothed_minus - smoothed_minus / p + minus_dms[i];
        dx_values.push(dx_at(smoothed_tr, smoothed_plus, smoothed_minus));
    }

    if dx_values.len() < period {
        return None;
    }

    let mut adx = dx_values[..period].iter().mean();
    for dx in &dx_values[period..] {
        adx = (adx * (p - 1.0) + dx) / p;
    }

    Some(adx)
}

/// Compare the most recent 20-day average volume against the 20 days before
/// it. A ratio above 1.1 reads as increasing, below 0.9 as decreasing.
pub fn volume_trend(volumes: &[f64]) -> Option<VolumeTrend> {
    if volumes.len() < 2 * VOLUME_WINDOW {
        return None;
    }

    let recent = volumes[volumes.len() - VOLUME_WINDOW..].iter().mean();
    let prior_slice =
        &volumes[volumes.len() - 2 * VOLUME_WINDOW..volumes.len() - VOLUME_WINDOW];
    let prior = prior_slice.iter().mean();

    if prior <= 0.0 {
        return None;
    }

    let ratio = recent / prior;
    if ratio > 1.1 {
        Some(VolumeTrend::Increasing)
    } else if ratio < 0.9 {
        Some(VolumeTrend::Decreasing)
    } else {
        Some(VolumeTrend::Stable)
    }
}

// ============================================================================
// Tests
// ============================================================================
