// programs/tempest_policy/src/instructions/initialize.rs

use anchor_lang::prelude::*;
use anchor_spl::token::Mint;

use crate::errors::PolicyError;
use crate::events::{LedgerConfigUpdated, LedgerInitialized};
use crate::state::LedgerConfig;

#[derive(Accounts)]
pub struct InitializeLedger<'info> {
    #[account(
        init,
        payer = authority,
        space = 8 + LedgerConfig::INIT_SPACE,
        seeds = [LedgerConfig::SEED_PREFIX],
        bump
    )]
    pub ledger_config: Account<'info, LedgerConfig>,

    /// CHECK: Data-less PDA; signs pool CPIs and owns policy unit mints
    #[account(
        seeds = [LedgerConfig::AUTHORITY_SEED],
        bump
    )]
    pub ledger_authority: UncheckedAccount<'info>,

    /// Pool backing asset
    pub asset_mint: Account<'info, Mint>,

    #[account(mut)]
    pub authority: Signer<'info>,

    pub system_program: Program<'info, System>,
}

#[derive(AnchorSerialize, AnchorDeserialize)]
pub struct InitializeLedgerParams {
    /// Trigger evaluator allowed to settle
    pub oracle: Pubkey,
    pub issuance_paused: Option<bool>,
}

pub fn handler(ctx: Context<InitializeLedger>, params: InitializeLedgerParams) -> Result<()> {
    let clock = Clock::get()?;

    let config = &mut ctx.accounts.ledger_config;
    config.authority = ctx.accounts.authority.key();
    config.oracle = params.oracle;
    config.asset_mint = ctx.accounts.asset_mint.key();
    config.next_policy_id = LedgerConfig::FIRST_POLICY_ID;
    config.total_reserved_shares = 0;
    config.active_policies = 0;
    config.total_policies_issued = 0;
    config.total_premiums = 0;
    config.total_payouts = 0;
    config.total_released_policies = 0;
    config.issuance_paused = params.issuance_paused.unwrap_or(false);
    config.authority_bump = ctx.bumps.ledger_authority;
    config.bump = ctx.bumps.ledger_config;

    emit!(LedgerInitialized {
        authority: ctx.accounts.authority.key(),
        oracle: params.oracle,
        asset_mint: ctx.accounts.asset_mint.key(),
        ledger_authority: ctx.accounts.ledger_authority.key(),
        timestamp: clock.unix_timestamp,
    });

    msg!("Policy ledger initialized");
    msg!("Ledger authority: {}", ctx.accounts.ledger_authority.key());

    Ok(())
}

/// Rotate oracle/admin or toggle issuance
#[derive(Accounts)]
pub struct UpdateLedgerConfig<'info> {
    #[account(
        mut,
        seeds = [LedgerConfig::SEED_PREFIX],
        bump = ledger_config.bump,
        has_one = authority @ PolicyError::NotAuthorized
    )]
    pub ledger_config: Account<'info, LedgerConfig>,

    pub authority: Signer<'info>,
}

#[derive(AnchorSerialize, AnchorDeserialize)]
pub struct UpdateLedgerConfigParams {
    pub oracle: Option<Pubkey>,
    pub issuance_paused: Option<bool>,
    pub new_authority: Option<Pubkey>,
}

pub fn update_ledger_config(
    ctx: Context<UpdateLedgerConfig>,
    params: UpdateLedgerConfigParams,
) -> Result<()> {
    let clock = Clock::get()?;
    let config = &mut ctx.accounts.ledger_config;
    let old_oracle = config.oracle;

    if let Some(oracle) = params.oracle {
        config.oracle = oracle;
    }
    if let Some(paused) = params.issuance_paused {
        config.issuance_paused = paused;
    }
    if let Some(new_authority) = params.new_authority {
        config.authority = new_authority;
    }

    emit!(LedgerConfigUpdated {
        old_oracle,
        new_oracle: config.oracle,
        issuance_paused: config.issuance_paused,
        authority: config.authority,
        updater: ctx.accounts.authority.key(),
        timestamp: clock.unix_timestamp,
    });

    if old_oracle != config.oracle {
        msg!("Oracle rotated to {}", config.oracle);
    }

    Ok(())
}
