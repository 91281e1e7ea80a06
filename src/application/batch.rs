use std::ops::Range;

/// Rotating slice of the watchlist processed by one run.
///
/// With `batch_size` set, the list is cut into `ceil(total / batch_size)`
/// consecutive batches and the run takes batch `slot % batches`. Callers pass
/// the UTC hour as the slot, which covers the whole list once per `batches`
/// hours when runs are hourly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchPlan {
    pub range: Range<usize>,
    pub batch_index: usize,
    pub batches: usize,
}

impl BatchPlan {
    pub fn new(total: usize, batch_size: Option<usize>, slot: u32) -> Self {
        let size = match batch_size {
            Some(size) if size > 0 && size < total => size,
            _ => {
                return Self {
                    range: 0..total,
                    batch_index: 0,
                    batches: 1,
                }
            }
        };
        let batches = total.div_ceil(size);
        let batch_index = slot as usize % batches;
        let start = batch_index * size;
        Self {
            range: start..(start + size).min(total),
            batch_index,
            batches,
        }
    }

    pub fn len(&self) -> usize {
        self.range.len()
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }
}
