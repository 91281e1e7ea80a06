use crate::domain::entities::price_entry::PriceEntry;

/// Median of the finite values; `None` for an empty input.
pub fn median(values: &[f64]) -> Option<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Median of every positive secondary-market average across the results.
pub fn secondary_median(entries: &[PriceEntry]) -> Option<f64> {
    let values: Vec<f64> = entries
        .iter()
        .filter_map(PriceEntry::secondary_window)
        .flat_map(|w| w.values())
        .filter(|v| *v > 0.0)
        .collect();
    median(&values)
}

/// Representative current price: median of extracted prices, falling back to the
/// secondary-market median. `None` when nothing usable was found.
pub fn representative_price(entries: &[PriceEntry]) -> Option<f64> {
    let prices: Vec<f64> = entries.iter().filter_map(|e| e.price).collect();
    median(&prices).or_else(|| secondary_median(entries))
}

pub fn first_large_image(entries: &[PriceEntry]) -> Option<&str> {
    entries.iter().find_map(|e| e.image_large.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::price_entry::PriceWindow;

    fn priced(price: Option<f64>, window: Option<PriceWindow>) -> PriceEntry {
        PriceEntry {
            price,
            secondary: window,
            ..Default::default()
        }
    }

    #[test]
    fn test_median() {
        assert_eq!(median(&[]), None);
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 2.0, 3.0]), Some(2.5));
        assert_eq!(median(&[f64::NAN, 5.0]), Some(5.0));
    }

    #[test]
    fn test_primary_prices_win() {
        let entries = vec![
            priced(Some(10.0), None),
            priced(None, Some(PriceWindow { avg1: Some(99.0), avg7: None, avg30: None })),
            priced(Some(20.0), None),
        ];
        assert_eq!(representative_price(&entries), Some(15.0));
    }

    #[test]
    fn test_secondary_fallback_skips_zero() {
        let entries = vec![priced(
            None,
            Some(PriceWindow {
                avg1: Some(0.0),
                avg7: Some(4.0),
                avg30: Some(6.0),
            }),
        )];
        assert_eq!(representative_price(&entries), Some(5.0));
    }

    #[test]
    fn test_no_price_is_none() {
        assert_eq!(representative_price(&[]), None);
        assert_eq!(representative_price(&[priced(None, None)]), None);
    }

    #[test]
    fn test_first_large_image() {
        let mut a = PriceEntry::default();
        let mut b = PriceEntry::default();
        a.image_small = Some("small.png".into());
        b.image_large = Some("large.png".into());
        assert_eq!(first_large_image(&[a, b]), Some("large.png"));
    }
}
