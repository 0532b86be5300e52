//! Pure dip detection over a trailing price window.
//!
//! No I/O and no clock access: the scan loop hands in the 30-day window
//! (already containing the just-written point) and the resolved threshold,
//! and gets a decision back. That is what keeps this independently testable.

/// Outcome of evaluating the latest price against the window median.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DipDecision {
    /// No usable reference: empty window, or a median that is not positive.
    /// A normal terminal outcome, not an error.
    InsufficientData,
    NoDip {
        reference_price: f64,
        discount_pct: f64,
    },
    Dip {
        reference_price: f64,
        discount_pct: f64,
    },
}

/// Standard statistical median: ascending sort, middle value, mean of the
/// two middle values for an even-sized input. None for an empty input.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let n = sorted.len();
    Some((sorted[n / 2] + sorted[(n - 1) / 2]) / 2.0)
}

/// `history` is the trailing window including the latest point, ordered by
/// timestamp. Dip iff the discount against the window median reaches
/// `threshold_pct` (inclusive).
pub fn detect(history: &[f64], latest_price: f64, threshold_pct: f64) -> DipDecision {
    let reference_price = match median(history) {
        Some(m) if m > 0.0 => m,
        _ => return DipDecision::InsufficientData,
    };

    let discount_pct = (reference_price - latest_price) / reference_price * 100.0;

    if discount_pct >= threshold_pct {
        DipDecision::Dip {
            reference_price,
            discount_pct,
        }
    } else {
        DipDecision::NoDip {
            reference_price,
            discount_pct,
        }
    }
}
