// programs/tempest_core/src/trigger.rs
//
// Trigger comparison direction. Each hazard category declares whether a high
// reading is bad (flood discharge, heat) or a low reading is bad (drought
// index, water stress). Comparisons are strict: a reading equal to the
// threshold does not trigger.
//
// Observed values and thresholds are signed fixed-point integers in whatever
// scale the hazard's oracle feed uses; the engine only compares them.

use anchor_lang::prelude::*;

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug, InitSpace)]
#[repr(u8)]
pub enum TriggerDirection {
    /// Triggers when observed > threshold
    Above = 0,
    /// Triggers when observed < threshold
    Below = 1,
}

impl TriggerDirection {
    pub fn name(&self) -> &'static str {
        match self {
            TriggerDirection::Above => "high_is_bad",
            TriggerDirection::Below => "low_is_bad",
        }
    }

    pub fn is_triggered(&self, observed: i64, threshold: i64) -> bool {
        match self {
            TriggerDirection::Above => observed > threshold,
            TriggerDirection::Below => observed < threshold,
        }
    }

    /// Distance past the threshold in the bad direction (negative if not met)
    pub fn margin(&self, observed: i64, threshold: i64) -> i128 {
        match self {
            TriggerDirection::Above => observed as i128 - threshold as i128,
            TriggerDirection::Below => threshold as i128 - observed as i128,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_above_is_strict() {
        let dir = TriggerDirection::Above;
        assert!(dir.is_triggered(500_001, 500_000));
        assert!(!dir.is_triggered(500_000, 500_000));
        assert!(!dir.is_triggered(-1, 0));
    }

    #[test]
    fn test_below_is_strict() {
        // Drought index threshold of -50.0 at 4 decimals
        let dir = TriggerDirection::Below;
        assert!(dir.is_triggered(-500_001, -500_000));
        assert!(!dir.is_triggered(-500_000, -500_000));
        assert!(!dir.is_triggered(0, -500_000));
    }

    #[test]
    fn test_margin_sign_matches_trigger() {
        assert_eq!(TriggerDirection::Above.margin(60, 50), 10);
        assert_eq!(TriggerDirection::Below.margin(60, 50), -10);
        assert_eq!(TriggerDirection::Below.margin(i64::MIN, i64::MAX), u64::MAX as i128);
    }
}
