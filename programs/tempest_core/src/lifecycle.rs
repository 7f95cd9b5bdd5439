// programs/tempest_core/src/lifecycle.rs
//
// Policy Lifecycle State Machine
// ==============================
//
// Every policy starts Active and ends in exactly one terminal state:
// - Settled: a valid trigger paid out (possibly less than requested)
// - ExpiredReleased: the window elapsed and the reservation went back to the pool
//
// Terminal states never transition again. Active is additionally bounded by
// the policy's end time even before any instruction observes the expiry.

use anchor_lang::prelude::*;

/// Policy lifecycle status
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug, InitSpace)]
#[repr(u8)]
pub enum PolicyStatus {
    /// Issued, reservation held, claimable until end time
    Active = 0,

    /// Paid out through a trigger settlement
    Settled = 1,

    /// Expired untriggered, reservation returned to the pool
    ExpiredReleased = 2,
}

impl Default for PolicyStatus {
    fn default() -> Self {
        PolicyStatus::Active
    }
}

impl PolicyStatus {
    /// Get human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            PolicyStatus::Active => "Active",
            PolicyStatus::Settled => "Settled",
            PolicyStatus::ExpiredReleased => "Expired (released)",
        }
    }

    /// Terminal policies are "paid": no further settlement or release
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PolicyStatus::Active)
    }

    /// Only Active -> terminal moves are allowed
    pub fn can_transition_to(&self, next: PolicyStatus) -> bool {
        matches!(
            (self, next),
            (PolicyStatus::Active, PolicyStatus::Settled)
                | (PolicyStatus::Active, PolicyStatus::ExpiredReleased)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_default() {
        assert_eq!(PolicyStatus::default(), PolicyStatus::Active);
    }

    #[test]
    fn test_terminal_states() {
        assert!(!PolicyStatus::Active.is_terminal());
        assert!(PolicyStatus::Settled.is_terminal());
        assert!(PolicyStatus::ExpiredReleased.is_terminal());
    }

    #[test]
    fn test_valid_transitions() {
        let active = PolicyStatus::Active;
        assert!(active.can_transition_to(PolicyStatus::Settled));
        assert!(active.can_transition_to(PolicyStatus::ExpiredReleased));

        // Invalid: Active -> Active
        assert!(!active.can_transition_to(PolicyStatus::Active));
    }

    #[test]
    fn test_terminal_states_are_irreversible() {
        for terminal in [PolicyStatus::Settled, PolicyStatus::ExpiredReleased] {
            assert!(!terminal.can_transition_to(PolicyStatus::Active));
            assert!(!terminal.can_transition_to(PolicyStatus::Settled));
            assert!(!terminal.can_transition_to(PolicyStatus::ExpiredReleased));
        }
    }

    #[test]
    fn test_status_names() {
        assert_eq!(PolicyStatus::Settled.name(), "Settled");
        assert_eq!(PolicyStatus::ExpiredReleased.name(), "Expired (released)");
    }
}
