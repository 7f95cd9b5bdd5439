// programs/tempest_policy/src/state.rs

use anchor_lang::prelude::*;
use tempest_core::limits::{MAX_COVERAGE_DAYS, MAX_HAZARD_NAME_LEN};
use tempest_core::time::coverage_end;
use tempest_core::{PolicyStatus, TriggerDirection};
use tempest_pool::state::PoolState;

use crate::errors::PolicyError;

// =============================================================================
// LEDGER CONFIGURATION
// =============================================================================

/// Policy ledger configuration and global counters
/// PDA seeds: ["ledger_config"]
#[account]
#[derive(InitSpace)]
pub struct LedgerConfig {
    /// Admin (hazard registry, oracle rotation, issuance pause, premium surplus)
    pub authority: Pubkey,

    /// The single trigger evaluator allowed to settle payouts
    pub oracle: Pubkey,

    /// Backing asset mint of the collateral pool
    pub asset_mint: Pubkey,

    /// Id assigned to the next issued policy (never reused)
    pub next_policy_id: u64,

    /// Sum of reserved shares over all active policies.
    /// Must equal the pool's reservation counter after every instruction.
    pub total_reserved_shares: u64,

    /// Policies currently Active
    pub active_policies: u64,

    pub total_policies_issued: u64,
    pub total_premiums: u64,
    pub total_payouts: u64,
    pub total_released_policies: u64,

    /// New issuance halted by admin (settlement and release unaffected)
    pub issuance_paused: bool,

    /// Bump of the ledger authority PDA
    pub authority_bump: u8,

    /// Bump seed
    pub bump: u8,
}

impl LedgerConfig {
    pub const SEED_PREFIX: &'static [u8] = b"ledger_config";

    /// Signs pool CPIs and owns policy unit mints
    pub const AUTHORITY_SEED: &'static [u8] = b"ledger_authority";

    pub const FIRST_POLICY_ID: u64 = 1;

    pub fn is_oracle(&self, key: &Pubkey) -> bool {
        self.oracle == *key
    }

    /// Take the next policy id
    pub fn allocate_policy_id(&mut self) -> Result<u64> {
        let id = self.next_policy_id;
        self.next_policy_id = id.checked_add(1).ok_or(PolicyError::MathOverflow)?;
        Ok(id)
    }

    pub fn record_issue(&mut self, premium: u64, reserved_shares: u64) -> Result<()> {
        self.total_reserved_shares = self
            .total_reserved_shares
            .checked_add(reserved_shares)
            .ok_or(PolicyError::MathOverflow)?;
        self.active_policies = self.active_policies.saturating_add(1);
        self.total_policies_issued = self.total_policies_issued.saturating_add(1);
        self.total_premiums = self.total_premiums.saturating_add(premium);
        Ok(())
    }

    pub fn record_settlement(&mut self, released_shares: u64, payout: u64) -> Result<()> {
        self.close_reservation(released_shares)?;
        self.total_payouts = self.total_payouts.saturating_add(payout);
        Ok(())
    }

    pub fn record_release(&mut self, released_shares: u64) -> Result<()> {
        self.close_reservation(released_shares)?;
        self.total_released_policies = self.total_released_policies.saturating_add(1);
        Ok(())
    }

    fn close_reservation(&mut self, released_shares: u64) -> Result<()> {
        self.total_reserved_shares = self
            .total_reserved_shares
            .checked_sub(released_shares)
            .ok_or(PolicyError::ReservationMismatch)?;
        self.active_policies = self
            .active_policies
            .checked_sub(1)
            .ok_or(PolicyError::ReservationMismatch)?;
        Ok(())
    }

    /// Compare the ledger's per-policy sum with the pool's counter
    pub fn check_reservation_sync(&self, pool_reserved_shares: u64) -> Result<()> {
        if self.total_reserved_shares != pool_reserved_shares {
            msg!(
                "Reservation drift: ledger {} pool {}",
                self.total_reserved_shares,
                pool_reserved_shares
            );
            return err!(PolicyError::ReservationMismatch);
        }
        Ok(())
    }
}

// =============================================================================
// HAZARD REGISTRY
// =============================================================================

/// Runtime registry entry for a class of insurable event
/// PDA seeds: ["hazard", hazard_id]
#[account]
#[derive(InitSpace)]
pub struct HazardCategory {
    pub hazard_id: u16,

    /// Display name (e.g. "river_discharge")
    #[max_len(32)]
    pub name: String,

    /// Which side of the threshold is bad
    pub direction: TriggerDirection,

    /// False once removed; existing policies keep their snapshotted terms
    pub valid: bool,

    /// Policies issued under this id all-time
    pub policies_issued: u64,

    pub updated_at: i64,

    /// Bump seed
    pub bump: u8,
}

impl HazardCategory {
    pub const SEED_PREFIX: &'static [u8] = b"hazard";

    pub fn validate_name(name: &str) -> Result<()> {
        require!(name.len() <= MAX_HAZARD_NAME_LEN, PolicyError::NameTooLong);
        Ok(())
    }

    /// Add (or re-add after removal) this category
    pub fn register(
        &mut self,
        hazard_id: u16,
        name: String,
        direction: TriggerDirection,
        now: i64,
        bump: u8,
    ) -> Result<()> {
        require!(!self.valid, PolicyError::HazardAlreadyExists);
        Self::validate_name(&name)?;

        self.hazard_id = hazard_id;
        self.name = name;
        self.direction = direction;
        self.valid = true;
        self.updated_at = now;
        self.bump = bump;
        Ok(())
    }

    pub fn retire(&mut self, now: i64) -> Result<()> {
        require!(self.valid, PolicyError::HazardNotFound);
        self.valid = false;
        self.updated_at = now;
        Ok(())
    }

    pub fn ensure_valid(&self) -> Result<()> {
        require!(self.valid, PolicyError::InvalidHazard);
        Ok(())
    }

    /// Load a hazard account supplied for issuance. Accounts that were never
    /// created, belong to another id, or were removed are all `InvalidHazard`.
    pub fn load_valid(info: &AccountInfo, hazard_id: u16) -> Result<HazardCategory> {
        let hazard: HazardCategory = load_ledger_account(info, PolicyError::InvalidHazard)?;
        require!(hazard.hazard_id == hazard_id, PolicyError::InvalidHazard);
        hazard.ensure_valid()?;
        Ok(hazard)
    }
}

/// Deserialize a ledger-owned account that is not part of the typed account
/// list (hazards and batch items). Foreign or empty accounts fail with `error`.
pub fn load_ledger_account<T: AccountDeserialize>(
    info: &AccountInfo,
    error: PolicyError,
) -> Result<T> {
    if info.owner != &crate::ID || info.data_is_empty() {
        return Err(error.into());
    }
    let data = info.try_borrow_data()?;
    T::try_deserialize(&mut &data[..]).map_err(|_| error.into())
}

/// Write a ledger-owned account back (discriminator included)
pub fn store_ledger_account<T: AccountSerialize>(info: &AccountInfo, value: &T) -> Result<()> {
    let mut data = info.try_borrow_mut_data()?;
    let mut writer: &mut [u8] = &mut data;
    value.try_serialize(&mut writer)
}

// =============================================================================
// POLICIES
// =============================================================================

/// Purchase terms for one policy (single and batch issuance)
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct PolicyTerms {
    pub hazard_id: u16,
    pub duration_days: u16,
    /// Max payout in asset units
    pub max_coverage: u64,
    /// Premium in asset units, deposited into the pool
    pub premium: u64,
    /// Observed value the reading must pass (see the hazard's direction)
    pub trigger_threshold: i64,
}

impl PolicyTerms {
    pub fn validate(&self) -> Result<()> {
        require!(
            self.duration_days > 0 && self.duration_days <= MAX_COVERAGE_DAYS,
            PolicyError::InvalidDuration
        );
        require!(self.max_coverage > 0, PolicyError::InvalidAmount);
        require!(self.premium > 0, PolicyError::InvalidAmount);
        Ok(())
    }
}

/// Batch instructions take between one and `max` items
pub fn check_batch_len(len: usize, max: usize) -> Result<()> {
    require!(len > 0, PolicyError::EmptyBatch);
    require!(len <= max, PolicyError::BatchTooLarge);
    Ok(())
}

/// Parties recorded on a new policy
#[derive(Clone, Copy, Debug)]
pub struct PolicyParties {
    pub holder: Pubkey,
    pub purchaser: Pubkey,
    pub unit_mint: Pubkey,
}

/// Individual policy
/// PDA seeds: ["policy", policy_id]
#[account]
#[derive(InitSpace)]
pub struct Policy {
    pub policy_id: u64,
    pub hazard_id: u16,

    /// Hazard direction at issuance
    pub trigger_direction: TriggerDirection,
    pub trigger_threshold: i64,

    /// Coverage window (inclusive of end_time)
    pub start_time: i64,
    pub end_time: i64,

    pub max_coverage: u64,
    pub premium: u64,

    /// Pool shares earmarked for this policy; zero once terminal
    pub reserved_shares: u64,

    pub status: PolicyStatus,

    /// Current unit holder, kept in sync by transfer_policy
    pub holder: Pubkey,

    /// Wallet that paid the premium
    pub purchaser: Pubkey,

    /// One-of-one policy unit mint
    pub unit_mint: Pubkey,

    /// Asset amount actually paid (0 unless settled)
    pub payout_amount: u64,

    /// When the policy went terminal
    pub closed_at: i64,

    /// Bump seed
    pub bump: u8,
}

impl Policy {
    pub const SEED_PREFIX: &'static [u8] = b"policy";
    pub const UNIT_SEED: &'static [u8] = b"policy_unit";

    /// Build a freshly issued Active policy
    pub fn issue(
        policy_id: u64,
        terms: &PolicyTerms,
        direction: TriggerDirection,
        reserved_shares: u64,
        parties: PolicyParties,
        now: i64,
        bump: u8,
    ) -> Result<Policy> {
        let end_time =
            coverage_end(now, terms.duration_days).ok_or(PolicyError::MathOverflow)?;

        Ok(Policy {
            policy_id,
            hazard_id: terms.hazard_id,
            trigger_direction: direction,
            trigger_threshold: terms.trigger_threshold,
            start_time: now,
            end_time,
            max_coverage: terms.max_coverage,
            premium: terms.premium,
            reserved_shares,
            status: PolicyStatus::Active,
            holder: parties.holder,
            purchaser: parties.purchaser,
            unit_mint: parties.unit_mint,
            payout_amount: 0,
            closed_at: 0,
            bump,
        })
    }

    /// Shares to reserve for `max_coverage` at live pool totals, given
    /// `pending` shares already promised earlier in the same instruction.
    pub fn reservation_for(pool: &PoolState, max_coverage: u64, pending: u64) -> Result<u64> {
        let shares = pool
            .preview_withdraw(max_coverage)
            .map_err(|_| error!(PolicyError::ReservationFailed))?;
        require!(shares > 0, PolicyError::ZeroShares);

        let reserved_after = pool
            .total_reserved_shares
            .checked_add(pending)
            .and_then(|r| r.checked_add(shares))
            .ok_or(PolicyError::ReservationFailed)?;
        require!(
            reserved_after <= pool.total_shares,
            PolicyError::ReservationFailed
        );

        Ok(shares)
    }

    pub fn is_paid(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn is_expired(&self, now: i64) -> bool {
        now > self.end_time
    }

    pub fn validate_settlement(&self, now: i64, observed: i64, requested: u64) -> Result<()> {
        require!(!self.is_paid(), PolicyError::AlreadyPaid);
        require!(!self.is_expired(now), PolicyError::Expired);
        require!(
            self.trigger_direction.is_triggered(observed, self.trigger_threshold),
            PolicyError::ThresholdNotMet
        );
        require!(
            requested <= self.max_coverage,
            PolicyError::ExceedsMaxCoverage
        );
        require!(requested > 0, PolicyError::InvalidAmount);
        Ok(())
    }

    /// Lesser of the request and the reservation's redeemable value
    pub fn payout_for(&self, requested: u64, pool: &PoolState) -> Result<u64> {
        let redeemable = pool
            .convert_to_assets(self.reserved_shares)
            .map_err(|_| error!(PolicyError::MathOverflow))?;
        Ok(requested.min(redeemable))
    }

    /// Settle with `payout`; returns the full reservation to release
    pub fn mark_settled(&mut self, payout: u64, now: i64) -> Result<u64> {
        require!(
            self.status.can_transition_to(PolicyStatus::Settled),
            PolicyError::AlreadyPaid
        );
        let released = self.reserved_shares;
        self.reserved_shares = 0;
        self.status = PolicyStatus::Settled;
        self.payout_amount = payout;
        self.closed_at = now;
        Ok(released)
    }

    pub fn validate_release(&self, now: i64) -> Result<()> {
        require!(self.is_expired(now), PolicyError::NotExpired);
        require!(!self.is_paid(), PolicyError::AlreadyPaid);
        Ok(())
    }

    pub fn is_releasable(&self, now: i64) -> bool {
        self.validate_release(now).is_ok()
    }

    /// Close an expired policy; returns the reservation to release
    pub fn mark_released(&mut self, now: i64) -> Result<u64> {
        require!(
            self.status.can_transition_to(PolicyStatus::ExpiredReleased),
            PolicyError::AlreadyPaid
        );
        let released = self.reserved_shares;
        self.reserved_shares = 0;
        self.status = PolicyStatus::ExpiredReleased;
        self.closed_at = now;
        Ok(released)
    }

    /// Record a unit transfer from `from` to `to`
    pub fn transfer_to(&mut self, from: &Pubkey, to: &Pubkey) -> Result<()> {
        require!(*from == self.holder, PolicyError::NotPolicyHolder);
        require!(to != from, PolicyError::InvalidHolderAccount);
        self.holder = *to;
        Ok(())
    }
}

// =============================================================================
// UNIT TESTS
// =============================================================================
