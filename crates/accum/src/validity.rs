//! Message validity predicate.
//!
//! Every sub-check is evaluated unconditionally and combined as
//! [`subtle::Choice`] values, the same way the predicate is laid out as
//! constraints: no branch depends on an intermediate result.

use primitives::MessageDetails;
use subtle::{Choice, ConstantTimeEq, ConstantTimeGreater};

/// Inclusive bounds for `agent_id`.
pub const AGENT_ID_BOUNDS: (u64, u64) = (0, 3000);
/// Inclusive bounds for `agent_x`.
pub const AGENT_X_BOUNDS: (u64, u64) = (0, 15000);
/// Inclusive bounds for `agent_y`.
pub const AGENT_Y_BOUNDS: (u64, u64) = (5000, 20000);

/// `lower <= value <= upper`.
pub fn in_range(value: u64, lower: u64, upper: u64) -> Choice {
    !lower.ct_gt(&value) & !value.ct_gt(&upper)
}

/// `agent_id + agent_x + agent_y == checksum`, summed in 128 bits.
pub fn check_checksum(d: &MessageDetails) -> Choice {
    let sum = u128::from(d.agent_id) + u128::from(d.agent_x) + u128::from(d.agent_y);
    let lo = sum as u64;
    let hi = (sum >> 64) as u64;
    lo.ct_eq(&d.checksum) & hi.ct_eq(&0)
}

pub fn check_ranges(d: &MessageDetails) -> Choice {
    let id = in_range(d.agent_id, AGENT_ID_BOUNDS.0, AGENT_ID_BOUNDS.1);
    let x = in_range(d.agent_x, AGENT_X_BOUNDS.0, AGENT_X_BOUNDS.1);
    let y = in_range(d.agent_y, AGENT_Y_BOUNDS.0, AGENT_Y_BOUNDS.1);
    id & x & y
}

/// Strict: equal coordinates are rejected.
pub fn check_coordinates(d: &MessageDetails) -> Choice {
    d.agent_y.ct_gt(&d.agent_x)
}

/// Full predicate. A zero `agent_id` bypasses every other check.
pub fn check_conditions(d: &MessageDetails) -> Choice {
    let checksum = check_checksum(d);
    let ranges = check_ranges(d);
    let coordinates = check_coordinates(d);
    let sentinel = d.agent_id.ct_eq(&0);
    (checksum & ranges & coordinates) | sentinel
}

pub fn is_valid(d: &MessageDetails) -> bool {
    check_conditions(d).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details(id: u64, x: u64, y: u64) -> MessageDetails {
        MessageDetails::with_checksum(id, x, y).unwrap()
    }

    #[test]
    fn sentinel_bypasses_everything() {
        assert!(is_valid(&MessageDetails::sentinel()));
        assert!(is_valid(&MessageDetails::new(0, 99_999, 1, 12345)));
        assert!(is_valid(&MessageDetails::new(0, u64::MAX, u64::MAX, 0)));
    }

    #[test]
    fn valid_message_passes() {
        assert!(is_valid(&details(10, 100, 6000)));
        assert!(is_valid(&MessageDetails::new(10, 100, 6000, 6110)));
    }

    #[test]
    fn bounds_are_inclusive() {
        assert!(is_valid(&details(3000, 0, 5000)));
        assert!(is_valid(&details(1, 14_999, 15_000)));
        assert!(is_valid(&details(1, 0, 20_000)));
        assert!(is_valid(&details(1, 15_000, 20_000)));
    }

    #[test]
    fn out_of_range_fields_fail() {
        assert!(!is_valid(&details(3001, 100, 6000)));
        assert!(!is_valid(&details(1, 15_001, 20_000)));
        assert!(!is_valid(&details(1, 100, 20_001)));
        assert!(!is_valid(&details(1, 100, 4999)));
    }

    #[test]
    fn checksum_mismatch_fails() {
        assert!(!is_valid(&MessageDetails::new(10, 100, 6000, 9999)));
        assert!(!is_valid(&MessageDetails::new(10, 100, 6000, 6109)));
    }

    #[test]
    fn checksum_does_not_wrap() {
        // 2^64 + 6110 would wrap to 6110 in 64-bit arithmetic.
        let d = MessageDetails::new(10, u64::MAX - 99, 6000 + 200, 6110);
        assert!(!bool::from(check_checksum(&d)));
    }

    #[test]
    fn coordinates_must_be_strictly_ordered() {
        assert!(!is_valid(&MessageDetails::new(10, 6000, 6000, 6010)));
        assert!(!is_valid(&details(10, 7000, 6000)));
        assert!(is_valid(&details(10, 5999, 6000)));
    }

    #[test]
    fn in_range_edges() {
        assert!(bool::from(in_range(5, 5, 5)));
        assert!(!bool::from(in_range(4, 5, 5)));
        assert!(!bool::from(in_range(6, 5, 5)));
        assert!(bool::from(in_range(0, 0, u64::MAX)));
        assert!(bool::from(in_range(u64::MAX, 0, u64::MAX)));
    }

    #[test]
    fn predicate_matches_reference_over_grid() {
        let ids = [0u64, 1, 2999, 3000, 3001];
        let xs = [0u64, 4999, 5000, 15_000, 15_001];
        let ys = [0u64, 4999, 5000, 15_000, 20_000, 20_001];
        for &id in &ids {
            for &x in &xs {
                for &y in &ys {
                    for delta in [0u64, 1] {
                        let d = MessageDetails::new(id, x, y, id + x + y + delta);
                        let expected = id == 0
                            || (delta == 0
                                && id <= 3000
                                && x <= 15_000
                                && (5000..=20_000).contains(&y)
                                && y > x);
                        assert_eq!(is_valid(&d), expected, "{d:?}");
                    }
                }
            }
        }
    }
}
