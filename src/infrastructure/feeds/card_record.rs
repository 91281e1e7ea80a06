//! Wire shapes of the card search API and their mapping onto [`PriceEntry`].
//!
//! Everything here is lenient: unknown fields are ignored and missing or
//! malformed price fields become `None`, so schema drift in the API cannot
//! leak past this module.

use crate::domain::entities::price_entry::{PriceEntry, PriceWindow};
use serde::Deserialize;
use std::collections::HashMap;

/// Primary-market price variants, in order of preference.
pub const PRIMARY_VARIANTS: &[&str] = &[
    "holofoil",
    "reverseHolofoil",
    "normal",
    "ultraRare",
    "1stEditionHolofoil",
];

#[derive(Debug, Default, Deserialize)]
pub struct CardsResponse {
    #[serde(default)]
    pub data: Vec<ApiCard>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ApiCard {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub set: Option<ApiSet>,
    #[serde(default)]
    pub tcgplayer: Option<ApiPriceBlock>,
    #[serde(default)]
    pub cardmarket: Option<ApiPriceBlock>,
    #[serde(default)]
    pub images: Option<ApiImages>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ApiSet {
    #[serde(default)]
    pub name: Option<String>,
}

/// Both marketplaces nest their numbers under `prices`; the shapes differ
/// (`tcgplayer` maps variant -> object, `cardmarket` maps key -> number), so
/// values are kept as raw JSON and read on demand.
#[derive(Debug, Default, Deserialize)]
pub struct ApiPriceBlock {
    #[serde(default)]
    pub prices: Option<HashMap<String, serde_json::Value>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ApiImages {
    #[serde(default)]
    pub small: Option<String>,
    #[serde(default)]
    pub large: Option<String>,
}

fn usable(v: &serde_json::Value) -> Option<f64> {
    v.as_f64().filter(|p| p.is_finite() && *p >= 0.0)
}

impl ApiCard {
    fn primary_prices(&self) -> Option<&HashMap<String, serde_json::Value>> {
        self.tcgplayer.as_ref().and_then(|b| b.prices.as_ref())
    }

    fn secondary_prices(&self) -> Option<&HashMap<String, serde_json::Value>> {
        self.cardmarket.as_ref().and_then(|b| b.prices.as_ref())
    }

    /// `market` value of the first preferred variant that has one.
    pub fn primary_price(&self) -> Option<f64> {
        let prices = self.primary_prices()?;
        PRIMARY_VARIANTS
            .iter()
            .filter_map(|k| prices.get(*k))
            .find_map(|variant| variant.get("market").and_then(usable))
    }

    /// Rolling averages of a non-empty secondary-market map. Keys other than
    /// the three averages still make the window present, with its averages unset.
    pub fn secondary_window(&self) -> Option<PriceWindow> {
        let prices = self.secondary_prices().filter(|p| !p.is_empty())?;
        let read = |key: &str| prices.get(key).and_then(usable);
        Some(PriceWindow {
            avg1: read("avg1"),
            avg7: read("avg7"),
            avg30: read("avg30"),
        })
    }

    pub fn into_price_entry(self) -> PriceEntry {
        let window = self.secondary_window();
        let price = self
            .primary_price()
            .or_else(|| window.and_then(|w| w.first_available()));
        let (image_small, image_large) = match self.images {
            Some(images) => (images.small, images.large),
            None => (None, None),
        };
        PriceEntry {
            name: self.name,
            set_name: self.set.and_then(|s| s.name),
            price,
            secondary: window,
            image_small,
            image_large,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn card(value: serde_json::Value) -> ApiCard {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_primary_preferred_over_secondary() {
        let entry = card(json!({
            "name": "Umbreon VMAX",
            "set": {"name": "Evolving Skies"},
            "tcgplayer": {"prices": {
                "normal": {"market": 3.5},
                "holofoil": {"low": 1.0, "market": 410.25}
            }},
            "cardmarket": {"prices": {"avg1": 380.0, "avg7": 390.0, "avg30": 370.0}}
        }))
        .into_price_entry();

        assert_eq!(entry.price, Some(410.25));
        assert_eq!(entry.name.as_deref(), Some("Umbreon VMAX"));
        assert_eq!(entry.set_name.as_deref(), Some("Evolving Skies"));
        let w = entry.secondary.unwrap();
        assert_eq!((w.avg1, w.avg7, w.avg30), (Some(380.0), Some(390.0), Some(370.0)));
    }

    #[test]
    fn test_variant_priority_skips_missing_market() {
        let entry = card(json!({
            "tcgplayer": {"prices": {
                "holofoil": {"low": 2.0, "market": null},
                "reverseHolofoil": {"market": 4.0},
                "normal": {"market": 1.0}
            }}
        }))
        .into_price_entry();
        assert_eq!(entry.price, Some(4.0));
    }

    #[test]
    fn test_secondary_fallback_order() {
        let entry = card(json!({
            "cardmarket": {"prices": {"avg7": 6.0, "avg30": 7.0, "trendPrice": 9.0}}
        }))
        .into_price_entry();
        assert_eq!(entry.price, Some(6.0));
    }

    #[test]
    fn test_no_price_is_none_not_zero() {
        let entry = card(json!({"name": "Mystery", "tcgplayer": {"prices": {}}})).into_price_entry();
        assert_eq!(entry.price, None);
        assert!(entry.secondary.is_none());
    }

    #[test]
    fn test_zero_price_is_kept() {
        let entry = card(json!({"tcgplayer": {"prices": {"normal": {"market": 0.0}}}})).into_price_entry();
        assert_eq!(entry.price, Some(0.0));
    }

    #[test]
    fn test_negative_and_non_numeric_ignored() {
        let entry = card(json!({
            "tcgplayer": {"prices": {"holofoil": {"market": -1.0}, "normal": {"market": "n/a"}}},
            "cardmarket": {"prices": {"avg1": "x", "avg7": 2.5}}
        }))
        .into_price_entry();
        assert_eq!(entry.price, Some(2.5));
    }

    #[test]
    fn test_secondary_map_without_averages_is_kept() {
        let entry = card(json!({
            "tcgplayer": {"prices": {"holofoil": {"market": 10.0}}},
            "cardmarket": {"prices": {"trendPrice": 9.0, "averageSellPrice": 8.0}}
        }))
        .into_price_entry();
        assert_eq!(entry.price, Some(10.0));
        assert_eq!(entry.secondary, Some(PriceWindow::default()));

        let empty = card(json!({"cardmarket": {"prices": {}}})).into_price_entry();
        assert!(empty.secondary.is_none());
    }

    #[test]
    fn test_images() {
        let entry = card(json!({"images": {"small": "s.png", "large": "l.png"}})).into_price_entry();
        assert_eq!(entry.image_small.as_deref(), Some("s.png"));
        assert_eq!(entry.image_large.as_deref(), Some("l.png"));

        let bare = card(json!({})).into_price_entry();
        assert!(bare.image_small.is_none() && bare.image_large.is_none());
    }

    #[test]
    fn test_response_without_data() {
        let resp: CardsResponse = serde_json::from_value(json!({"page": 1})).unwrap();
        assert!(resp.data.is_empty());
    }
}
