// programs/tempest_policy/src/instructions/settlement.rs

use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};
use tempest_pool::cpi::accounts::WithdrawForPayout;
use tempest_pool::program::TempestPool;
use tempest_pool::state::{PoolConfig, PoolState};

use crate::errors::PolicyError;
use crate::events::PolicySettled;
use crate::state::{LedgerConfig, Policy};

/// Settle a triggered policy (trigger oracle only)
#[derive(Accounts)]
#[instruction(policy_id: u64)]
pub struct SettlePayout<'info> {
    #[account(
        mut,
        seeds = [LedgerConfig::SEED_PREFIX],
        bump = ledger_config.bump,
        constraint = ledger_config.is_oracle(&oracle.key()) @ PolicyError::NotOracle
    )]
    pub ledger_config: Box<Account<'info, LedgerConfig>>,

    /// CHECK: PDA signer, no data
    #[account(
        seeds = [LedgerConfig::AUTHORITY_SEED],
        bump = ledger_config.authority_bump
    )]
    pub ledger_authority: UncheckedAccount<'info>,

    #[account(
        mut,
        seeds = [Policy::SEED_PREFIX, &policy_id.to_le_bytes()],
        bump = policy.bump,
    )]
    pub policy: Box<Account<'info, Policy>>,

    /// Payout goes to whoever holds the unit now
    #[account(
        mut,
        constraint = holder_token_account.owner == policy.holder @ PolicyError::InvalidHolderAccount,
        constraint = holder_token_account.mint == ledger_config.asset_mint @ PolicyError::InvalidHolderAccount
    )]
    pub holder_token_account: Box<Account<'info, TokenAccount>>,

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

    /// CHECK: Verified by the pool program
    pub pool_vault_authority: UncheckedAccount<'info>,

    /// CHECK: Verified by the pool program
    #[account(mut)]
    pub pool_asset_vault: UncheckedAccount<'info>,

    pub oracle: Signer<'info>,

    pub pool_program: Program<'info, TempestPool>,
    pub token_program: Program<'info, Token>,
}

pub fn settle_payout(
    ctx: Context<SettlePayout>,
    policy_id: u64,
    observed_value: i64,
    requested_payout: u64,
) -> Result<()> {
    let clock = Clock::get()?;
    let now = clock.unix_timestamp;
    let accounts = &mut *ctx.accounts;

    let policy = &mut accounts.policy;
    policy.validate_settlement(now, observed_value, requested_payout)?;
    msg!(
        "Trigger met by {}",
        policy
            .trigger_direction
            .margin(observed_value, policy.trigger_threshold)
    );

    // Price read from live pool totals, never cached
    let actual_payout = policy.payout_for(requested_payout, &accounts.pool_state)?;
    if actual_payout < requested_payout {
        msg!(
            "Pool shortfall: paying {} of {} requested",
            actual_payout,
            requested_payout
        );
    }

    let released = policy.mark_settled(actual_payout, now)?;
    let holder = policy.holder;
    accounts
        .ledger_config
        .record_settlement(released, actual_payout)?;

    let bump = [accounts.ledger_config.authority_bump];
    let seeds = &[LedgerConfig::AUTHORITY_SEED, &bump[..]];
    let signer_seeds = &[&seeds[..]];

    tempest_pool::cpi::withdraw_for_payout(
        CpiContext::new_with_signer(
            accounts.pool_program.to_account_info(),
            WithdrawForPayout {
                pool_config: accounts.pool_config.to_account_info(),
                pool_state: accounts.pool_state.to_account_info(),
                vault_authority: accounts.pool_vault_authority.to_account_info(),
                asset_vault: accounts.pool_asset_vault.to_account_info(),
                receiver_token_account: accounts.holder_token_account.to_account_info(),
                policy_ledger: accounts.ledger_authority.to_account_info(),
                token_program: accounts.token_program.to_account_info(),
            },
            signer_seeds,
        ),
        actual_payout,
        released,
    )?;
    accounts.pool_state.reload()?;

    accounts
        .ledger_config
        .check_reservation_sync(accounts.pool_state.total_reserved_shares)?;

    emit!(PolicySettled {
        policy_id,
        holder,
        observed_value,
        requested_payout,
        actual_payout,
        shares_released: released,
        timestamp: now,
    });

    msg!("Policy {} settled: paid {}", policy_id, actual_payout);

    Ok(())
}
