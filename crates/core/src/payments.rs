//! Payment acceptance rules for contracts.
//!
//! A payment is applied only when `0 < amount <= remaining`; anything else
//! leaves the contract untouched. Note that full settlement does NOT imply
//! the `is_paid` flag: the flag is set independently by the update path.

/// Apply a payment to a remaining amount.
///
/// Returns the new remaining amount, or `None` when the payment is refused
/// (`amount <= 0` or `amount > remaining`).
pub fn apply_payment(remaining: f64, amount: f64) -> Option<f64> {
    if amount <= 0.0 || amount > remaining {
        return None;
    }
    Some(remaining - amount)
}

/// A contract is fully paid when nothing remains.
pub fn is_fully_paid(remaining: f64) -> bool {
    remaining <= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_payment_decrements_exactly() {
        assert_eq!(apply_payment(10_000.0, 2_000.0), Some(8_000.0));
        assert_eq!(apply_payment(8_000.0, 8_000.0), Some(0.0));
    }

    #[test]
    fn test_non_positive_amount_refused() {
        assert_eq!(apply_payment(100.0, 0.0), None);
        assert_eq!(apply_payment(100.0, -5.0), None);
    }

    #[test]
    fn test_overpayment_refused() {
        assert_eq!(apply_payment(100.0, 100.01), None);
        assert_eq!(apply_payment(0.0, 1.0), None);
    }

    #[test]
    fn test_fully_paid_at_zero() {
        assert!(is_fully_paid(0.0));
        assert!(!is_fully_paid(0.01));
    }

    #[test]
    fn test_sequence_to_settlement() {
        // 10000 -> pay 2000 -> 8000 -> pay 8000 -> 0 -> further payment refused.
        let remaining = apply_payment(10_000.0, 2_000.0).unwrap();
        assert_eq!(remaining, 8_000.0);
        assert!(!is_fully_paid(remaining));

        let remaining = apply_payment(remaining, 8_000.0).unwrap();
        assert_eq!(remaining, 0.0);
        assert!(is_fully_paid(remaining));

        assert_eq!(apply_payment(remaining, 1.0), None);
    }
}
