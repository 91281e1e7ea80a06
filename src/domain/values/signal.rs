use serde::{Deserialize, Serialize};

/// Minimum fractional moves (0.2 = 20%) required before a spike is considered.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpikeThresholds {
    pub pct_24h: f64,
    pub pct_7d: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SignalResult {
    pub pct_24h: f64,
    pub pct_7d: f64,
    pub breakout: bool,
    pub alert: bool,
}

impl SignalResult {
    /// Fixed signal used when a test alert is forced.
    pub fn forced_test() -> Self {
        Self {
            pct_24h: 0.25,
            pct_7d: 0.40,
            breakout: true,
            alert: true,
        }
    }
}

/// `(current - reference) / reference`, or `0.0` when the reference is zero.
pub fn pct_delta(current: f64, reference: f64) -> f64 {
    if reference == 0.0 {
        return 0.0;
    }
    (current - reference) / reference
}

/// True only when `current` is strictly above every price in the lookback.
pub fn is_breakout(current: f64, lookback: &[f64]) -> bool {
    lookback
        .iter()
        .copied()
        .reduce(f64::max)
        .is_some_and(|max| current > max)
}

/// Evaluate against explicit reference prices.
pub fn evaluate_with_refs(
    current: f64,
    ref_24h: f64,
    ref_7d: f64,
    lookback: &[f64],
    thresholds: &SpikeThresholds,
) -> SignalResult {
    let pct_24h = pct_delta(current, ref_24h);
    let pct_7d = pct_delta(current, ref_7d);
    let breakout = is_breakout(current, lookback);
    SignalResult {
        pct_24h,
        pct_7d,
        breakout,
        alert: pct_24h >= thresholds.pct_24h && pct_7d >= thresholds.pct_7d && breakout,
    }
}

/// Evaluate against a lookback series (oldest first). The newest stored price is
/// the 24h reference and the oldest is the 7d reference; both fall back to the
/// current price when there is no history, which yields zero deltas.
pub fn evaluate(current: f64, lookback: &[f64], thresholds: &SpikeThresholds) -> SignalResult {
    let ref_24h = lookback.last().copied().unwrap_or(current);
    let ref_7d = lookback.first().copied().unwrap_or(current);
    evaluate_with_refs(current, ref_24h, ref_7d, lookback, thresholds)
}
