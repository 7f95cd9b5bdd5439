// programs/tempest_core/src/lib.rs
//
// Tempest Core - Shared Math and Types
// ====================================
//
// This crate provides:
// - Proportional share math used by the collateral pool (deposit / withdraw
//   previews, redeemable value of a reservation)
// - Basis-point fee math
// - Policy lifecycle state machine (Active -> Settled | ExpiredReleased)
// - Trigger comparison direction for hazard categories
// - Protocol-wide limits shared by the pool and the policy ledger

/// Proportional share accounting (pool value / total shares)
pub mod shares;

/// Policy lifecycle state machine
pub mod lifecycle;

/// Trigger comparison direction per hazard category
pub mod trigger;

pub use lifecycle::PolicyStatus;
pub use trigger::TriggerDirection;

// =============================================================================
// PROTOCOL LIMITS
// =============================================================================

pub mod limits {
    /// Basis point denominator (10000 = 100%)
    pub const BPS_DENOMINATOR: u64 = 10_000;

    /// Maximum deposit fee the pool admin may configure (10%)
    pub const MAX_DEPOSIT_FEE_BPS: u16 = 1_000;

    /// Longest coverage window a single policy may request (~10 years)
    pub const MAX_COVERAGE_DAYS: u16 = 3_650;

    /// Max policies per batch issuance (5 remaining accounts each)
    pub const MAX_ISSUE_BATCH: usize = 8;

    /// Max policies per expiry sweep
    pub const MAX_RELEASE_BATCH: usize = 24;

    /// Max hazard display name length in bytes
    pub const MAX_HAZARD_NAME_LEN: usize = 32;
}

// =============================================================================
// TIME
// =============================================================================

pub mod time {
    pub const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

    /// Coverage end timestamp for a window starting at `start`.
    /// Returns None on overflow.
    pub fn coverage_end(start: i64, duration_days: u16) -> Option<i64> {
        (duration_days as i64)
            .checked_mul(SECONDS_PER_DAY)
            .and_then(|secs| start.checked_add(secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coverage_end() {
        assert_eq!(time::coverage_end(1_000, 1), Some(1_000 + 86_400));
        assert_eq!(time::coverage_end(0, 365), Some(365 * 86_400));
        assert_eq!(time::coverage_end(i64::MAX, 1), None);
    }

    #[test]
    fn test_limits_relationships() {
        assert!((limits::MAX_DEPOSIT_FEE_BPS as u64) < limits::BPS_DENOMINATOR);
        assert!(limits::MAX_ISSUE_BATCH < limits::MAX_RELEASE_BATCH);
        assert_eq!(limits::MAX_HAZARD_NAME_LEN, 32);
    }
}
