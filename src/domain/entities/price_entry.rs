use serde::{Deserialize, Serialize};

/// Secondary-market rolling averages attached to a search result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceWindow {
    pub avg1: Option<f64>,
    pub avg7: Option<f64>,
    pub avg30: Option<f64>,
}

impl PriceWindow {
    /// Averages in window order (1-day, 7-day, 30-day), absent ones skipped.
    pub fn values(&self) -> impl Iterator<Item = f64> {
        [self.avg1, self.avg7, self.avg30].into_iter().flatten()
    }

    /// First present average, shortest window first.
    pub fn first_available(&self) -> Option<f64> {
        self.values().next()
    }
}

/// One normalized search result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceEntry {
    pub name: Option<String>,
    pub set_name: Option<String>,
    /// `None` means no price field was found, which is not the same as a zero price.
    pub price: Option<f64>,
    /// Present whenever the record carried a non-empty secondary-market map,
    /// even if none of the three averages was in it.
    pub secondary: Option<PriceWindow>,
    pub image_small: Option<String>,
    pub image_large: Option<String>,
}

impl PriceEntry {
    pub fn secondary_window(&self) -> Option<&PriceWindow> {
        self.secondary.as_ref()
    }
}
