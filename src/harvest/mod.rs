//! Multi-phrase suggestion harvesting
//!
//! Runs a suggestion source over a list of seed phrases, one at a time, and
//! ranks every suggestion seen by its accumulated position weight.

mod executor;
mod models;

pub use executor::{CancelSignal, SuggestionAggregator};
pub use models::HarvestQuery;

/// Weight of the entry at `index` in a ranked list of `len` entries:
/// `(len - index) / len`. The first entry weighs 1.0, the last `1 / len`.
pub fn position_weight(index: usize, len: usize) -> f64 {
    debug_assert!(index < len);
    (len - index) as f64 / len as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_weight_bounds() {
        for len in 1..=12 {
            assert_eq!(position_weight(0, len), 1.0);
            assert_eq!(position_weight(len - 1, len), 1.0 / len as f64);
            for i in 1..len {
                let w = position_weight(i, len);
                assert!(w > 0.0 && w < position_weight(i - 1, len));
            }
        }
    }

    #[test]
    fn test_position_weight_values() {
        assert_eq!(position_weight(1, 2), 0.5);
        assert_eq!(position_weight(1, 5), 0.8);
        assert_eq!(position_weight(3, 4), 0.25);
    }
}
