use crate::domain::entities::price_entry::{PriceEntry, PriceWindow};

/// Secondary gate over the secondary-market averages of the search results.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendGate {
    pub require_uptrend: bool,
    /// Minimum 7-day average; values <= 0 disable the floor.
    pub min_avg7: Option<f64>,
}

impl TrendGate {
    pub fn new(require_uptrend: bool, min_avg7: Option<f64>) -> Self {
        Self {
            require_uptrend,
            min_avg7: min_avg7.filter(|f| *f > 0.0),
        }
    }

    pub fn is_active(&self) -> bool {
        self.require_uptrend || self.min_avg7.is_some()
    }

    /// Missing averages read as zero.
    pub fn window_passes(&self, w: &PriceWindow) -> bool {
        let avg1 = w.avg1.unwrap_or(0.0);
        let avg7 = w.avg7.unwrap_or(0.0);
        let avg30 = w.avg30.unwrap_or(0.0);

        let trend_ok = !self.require_uptrend || (avg1 >= avg7 && avg7 >= avg30);
        let floor_ok = self.min_avg7.map_or(true, |floor| avg7 >= floor);
        trend_ok && floor_ok
    }

    /// Passes when the gate is off, when there are no results, or when any single
    /// result carrying secondary-market data satisfies trend and floor together.
    pub fn passes(&self, entries: &[PriceEntry]) -> bool {
        if !self.is_active() || entries.is_empty() {
            return true;
        }
        entries
            .iter()
            .filter_map(PriceEntry::secondary_window)
            .any(|w| self.window_passes(w))
    }
}
