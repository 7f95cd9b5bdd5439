// programs/tempest_policy/src/instructions/release.rs
//
// Expiry cleanup. Anyone may call these; the single form fails on a policy
// that is not releasable, the batch form skips it.

use anchor_lang::prelude::*;
use tempest_core::limits::MAX_RELEASE_BATCH;
use tempest_pool::cpi::accounts::AdjustReservation;
use tempest_pool::program::TempestPool;
use tempest_pool::state::{PoolConfig, PoolState};

use crate::errors::PolicyError;
use crate::events::{BatchReleaseCompleted, PolicyReleased};
use crate::state::{
    check_batch_len, load_ledger_account, store_ledger_account, LedgerConfig, Policy,
};

/// Ledger and pool accounts shared by both release forms
#[derive(Accounts)]
pub struct ReleaseAccounts<'info> {
    #[account(
        mut,
        seeds = [LedgerConfig::SEED_PREFIX],
        bump = ledger_config.bump,
    )]
    pub ledger_config: Box<Account<'info, LedgerConfig>>,

    /// CHECK: PDA signer, no data
    #[account(
        seeds = [LedgerConfig::AUTHORITY_SEED],
        bump = ledger_config.authority_bump
    )]
    pub ledger_authority: UncheckedAccount<'info>,

    #[account(
        seeds = [PoolConfig::SEED_PREFIX],
        bump = pool_config.bump,
        seeds::program = tempest_pool::ID
    )]
    pub pool_config: Box<Account<'info, PoolConfig>>,

    #[account(
        mut,
        seeds = [PoolState::SEED_PREFIX],
        bump = pool_state.bump,
        seeds::program = tempest_pool::ID
    )]
    pub pool_state: Box<Account<'info, PoolState>>,

    pub caller: Signer<'info>,

    pub pool_program: Program<'info, TempestPool>,
}

impl<'info> ReleaseAccounts<'info> {
    /// Return `amount` shares to the pool and verify the ledger mirror
    fn unreserve(&mut self, amount: u64) -> Result<()> {
        let bump = [self.ledger_config.authority_bump];
        let seeds = &[LedgerConfig::AUTHORITY_SEED, &bump[..]];
        let signer_seeds = &[&seeds[..]];

        tempest_pool::cpi::unreserve_shares(
            CpiContext::new_with_signer(
                self.pool_program.to_account_info(),
                AdjustReservation {
                    pool_config: self.pool_config.to_account_info(),
                    pool_state: self.pool_state.to_account_info(),
                    policy_ledger: self.ledger_authority.to_account_info(),
                },
                signer_seeds,
            ),
            amount,
        )?;
        self.pool_state.reload()?;

        self.ledger_config
            .check_reservation_sync(self.pool_state.total_reserved_shares)
    }
}

// ============================================================================
// SINGLE RELEASE
// ============================================================================

#[derive(Accounts)]
#[instruction(policy_id: u64)]
pub struct ReleaseExpiredPolicy<'info> {
    pub release: ReleaseAccounts<'info>,

    #[account(
        mut,
        seeds = [Policy::SEED_PREFIX, &policy_id.to_le_bytes()],
        bump = policy.bump,
    )]
    pub policy: Box<Account<'info, Policy>>,
}

pub fn release_expired_policy(ctx: Context<ReleaseExpiredPolicy>, policy_id: u64) -> Result<()> {
    let clock = Clock::get()?;
    let now = clock.unix_timestamp;
    let accounts = &mut *ctx.accounts;

    let policy = &mut accounts.policy;
    policy.validate_release(now)?;
    let released = policy.mark_released(now)?;

    let release = &mut accounts.release;
    release.ledger_config.record_release(released)?;
    release.unreserve(released)?;

    emit!(PolicyReleased {
        policy_id,
        shares_released: released,
        caller: release.caller.key(),
        timestamp: now,
    });

    msg!("Policy {} expired: released {} shares", policy_id, released);

    Ok(())
}

// ============================================================================
// BATCH RELEASE
// ============================================================================

/// Policy accounts are passed as remaining accounts, one per id, in order
#[derive(Accounts)]
pub struct ReleaseExpiredPoliciesBatch<'info> {
    pub release: ReleaseAccounts<'info>,
}

/// Release every expired, unsettled policy in `policy_ids`.
///
/// Ids that are still inside their window or already terminal are skipped
/// without error so an off-chain sweeper can pass a mixed list. An account
/// that is not the policy PDA for its id fails the whole call.
pub fn release_expired_policies_batch<'info>(
    ctx: Context<'_, '_, 'info, 'info, ReleaseExpiredPoliciesBatch<'info>>,
    policy_ids: Vec<u64>,
) -> Result<()> {
    check_batch_len(policy_ids.len(), MAX_RELEASE_BATCH)?;
    require!(
        ctx.remaining_accounts.len() == policy_ids.len(),
        PolicyError::InvalidPolicyAccount
    );

    let clock = Clock::get()?;
    let now = clock.unix_timestamp;
    let release = &mut ctx.accounts.release;

    let mut released_count: u32 = 0;
    let mut total_released: u64 = 0;

    for (policy_id, info) in policy_ids.iter().zip(ctx.remaining_accounts.iter()) {
        let mut policy: Policy = load_ledger_account(info, PolicyError::InvalidPolicyAccount)?;
        require!(
            policy.policy_id == *policy_id,
            PolicyError::InvalidPolicyAccount
        );
        let expected = Pubkey::create_program_address(
            &[Policy::SEED_PREFIX, &policy_id.to_le_bytes(), &[policy.bump]],
            &crate::ID,
        )
        .map_err(|_| error!(PolicyError::InvalidPolicyAccount))?;
        require_keys_eq!(expected, info.key(), PolicyError::InvalidPolicyAccount);

        if !policy.is_releasable(now) {
            msg!("Policy {} skipped ({})", policy_id, policy.status.name());
            continue;
        }
        require!(info.is_writable, PolicyError::InvalidPolicyAccount);

        let released = policy.mark_released(now)?;
        store_ledger_account(info, &policy)?;
        release.ledger_config.record_release(released)?;

        total_released = total_released
            .checked_add(released)
            .ok_or(PolicyError::MathOverflow)?;
        released_count += 1;

        emit!(PolicyReleased {
            policy_id: *policy_id,
            shares_released: released,
            caller: release.caller.key(),
            timestamp: now,
        });
    }

    if total_released > 0 {
        release.unreserve(total_released)?;
    }

    let requested = policy_ids.len() as u32;
    emit!(BatchReleaseCompleted {
        requested,
        released: released_count,
        skipped: requested - released_count,
        shares_released: total_released,
        caller: release.caller.key(),
        timestamp: now,
    });

    msg!(
        "Expiry sweep: released {} of {} ({} shares)",
        released_count,
        requested,
        total_released
    );

    Ok(())
}
