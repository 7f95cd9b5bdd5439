// programs/tempest_policy/src/instructions/transfer.rs
//
// The only path a policy unit can move along. Unit accounts stay frozen
// between transfers, so the holder recorded on the policy always matches the
// account holding the unit.

use anchor_lang::prelude::*;
use anchor_spl::associated_token::AssociatedToken;
use anchor_spl::token::{self, Mint, Token, TokenAccount};

use crate::errors::PolicyError;
use crate::events::PolicyTransferred;
use crate::state::{LedgerConfig, Policy};

#[derive(Accounts)]
#[instruction(policy_id: u64)]
pub struct TransferPolicy<'info> {
    #[account(
        seeds = [LedgerConfig::SEED_PREFIX],
        bump = ledger_config.bump,
    )]
    pub ledger_config: Box<Account<'info, LedgerConfig>>,

    /// CHECK: PDA freeze authority, no data
    #[account(
        seeds = [LedgerConfig::AUTHORITY_SEED],
        bump = ledger_config.authority_bump
    )]
    pub ledger_authority: UncheckedAccount<'info>,

    #[account(
        mut,
        seeds = [Policy::SEED_PREFIX, &policy_id.to_le_bytes()],
        bump = policy.bump,
        constraint = policy.holder == current_holder.key() @ PolicyError::NotPolicyHolder
    )]
    pub policy: Box<Account<'info, Policy>>,

    #[account(
        constraint = unit_mint.key() == policy.unit_mint @ PolicyError::InvalidPolicyAccount
    )]
    pub unit_mint: Box<Account<'info, Mint>>,

    #[account(
        mut,
        associated_token::mint = unit_mint,
        associated_token::authority = current_holder
    )]
    pub source_unit_account: Box<Account<'info, TokenAccount>>,

    /// CHECK: Any wallet; becomes the policy holder
    pub new_holder: UncheckedAccount<'info>,

    #[account(
        init_if_needed,
        payer = current_holder,
        associated_token::mint = unit_mint,
        associated_token::authority = new_holder
    )]
    pub destination_unit_account: Box<Account<'info, TokenAccount>>,

    #[account(mut)]
    pub current_holder: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

pub fn transfer_policy(ctx: Context<TransferPolicy>, policy_id: u64) -> Result<()> {
    let clock = Clock::get()?;
    let accounts = &mut *ctx.accounts;

    let from = accounts.current_holder.key();
    let to = accounts.new_holder.key();
    accounts.policy.transfer_to(&from, &to)?;

    let bump = [accounts.ledger_config.authority_bump];
    let seeds = &[LedgerConfig::AUTHORITY_SEED, &bump[..]];
    let signer_seeds = &[&seeds[..]];

    let token_program = accounts.token_program.to_account_info();
    let mint = accounts.unit_mint.to_account_info();
    let authority = accounts.ledger_authority.to_account_info();
    let source = accounts.source_unit_account.to_account_info();
    let destination = accounts.destination_unit_account.to_account_info();

    if accounts.source_unit_account.is_frozen() {
        thaw_unit_account(
            token_program.clone(),
            source.clone(),
            mint.clone(),
            authority.clone(),
            signer_seeds,
        )?;
    }
    // Re-used account of a previous holder
    if accounts.destination_unit_account.is_frozen() {
        thaw_unit_account(
            token_program.clone(),
            destination.clone(),
            mint.clone(),
            authority.clone(),
            signer_seeds,
        )?;
    }

    token::transfer(
        CpiContext::new(
            token_program.clone(),
            token::Transfer {
                from: source,
                to: destination.clone(),
                authority: accounts.current_holder.to_account_info(),
            },
        ),
        1,
    )?;

    token::freeze_account(CpiContext::new_with_signer(
        token_program,
        token::FreezeAccount {
            account: destination,
            mint,
            authority,
        },
        signer_seeds,
    ))?;

    emit!(PolicyTransferred {
        policy_id,
        from,
        to,
        timestamp: clock.unix_timestamp,
    });

    msg!("Policy {} transferred to {}", policy_id, to);

    Ok(())
}

fn thaw_unit_account<'info>(
    token_program: AccountInfo<'info>,
    account: AccountInfo<'info>,
    mint: AccountInfo<'info>,
    authority: AccountInfo<'info>,
    signer_seeds: &[&[&[u8]]],
) -> Result<()> {
    token::thaw_account(CpiContext::new_with_signer(
        token_program,
        token::ThawAccount {
            account,
            mint,
            authority,
        },
        signer_seeds,
    ))
}
