// programs/tempest_policy/src/instructions/issuance.rs

use anchor_lang::prelude::*;
use anchor_lang::solana_program::program_pack::Pack;
use anchor_lang::system_program;
use anchor_spl::associated_token::{self, AssociatedToken};
use anchor_spl::token::{self, spl_token, Mint, Token, TokenAccount};
use tempest_core::limits::MAX_ISSUE_BATCH;

use super::collateral::*;
use crate::errors::PolicyError;
use crate::events::PolicyIssued;
use crate::state::{
    check_batch_len, store_ledger_account, HazardCategory, LedgerConfig, Policy, PolicyParties,
    PolicyTerms,
};

/// Remaining accounts per batch item:
/// hazard, policy, unit mint, holder, holder unit account
pub const ACCOUNTS_PER_ITEM: usize = 5;

// ============================================================================
// SINGLE ISSUANCE
// ============================================================================

#[derive(Accounts)]
pub struct IssuePolicy<'info> {
    #[account(
        mut,
        seeds = [LedgerConfig::SEED_PREFIX],
        bump = ledger_config.bump,
        constraint = !ledger_config.issuance_paused @ PolicyError::IssuancePaused
    )]
    pub ledger_config: Box<Account<'info, LedgerConfig>>,

    /// CHECK: PDA signer, no data
    #[account(
        seeds = [LedgerConfig::AUTHORITY_SEED],
        bump = ledger_config.authority_bump
    )]
    pub ledger_authority: UncheckedAccount<'info>,

    /// CHECK: Loaded in the handler; missing and removed categories are both InvalidHazard
    #[account(mut)]
    pub hazard: UncheckedAccount<'info>,

    #[account(
        init,
        payer = payer,
        space = 8 + Policy::INIT_SPACE,
        seeds = [Policy::SEED_PREFIX, &ledger_config.next_policy_id.to_le_bytes()],
        bump
    )]
    pub policy: Box<Account<'info, Policy>>,

    #[account(
        init,
        payer = payer,
        seeds = [Policy::UNIT_SEED, &ledger_config.next_policy_id.to_le_bytes()],
        bump,
        mint::decimals = 0,
        mint::authority = ledger_authority,
        mint::freeze_authority = ledger_authority
    )]
    pub unit_mint: Box<Account<'info, Mint>>,

    /// CHECK: Any wallet; receives the policy unit
    pub holder: UncheckedAccount<'info>,

    #[account(
        init,
        payer = payer,
        associated_token::mint = unit_mint,
        associated_token::authority = holder
    )]
    pub holder_unit_account: Box<Account<'info, TokenAccount>>,

    /// Premium source (checked by the pool)
    #[account(mut)]
    pub payer_token_account: Box<Account<'info, TokenAccount>>,

    pub pool: PoolPremiumAccounts<'info>,

    #[account(mut)]
    pub payer: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
    pub rent: Sysvar<'info, Rent>,
}

pub fn issue_policy(ctx: Context<IssuePolicy>, terms: PolicyTerms) -> Result<()> {
    let clock = Clock::get()?;

    let hazard_info = ctx.accounts.hazard.to_account_info();
    let mut hazard = HazardCategory::load_valid(&hazard_info, terms.hazard_id)?;
    terms.validate()?;

    let accounts = &mut *ctx.accounts;
    let ledger_authority = accounts.ledger_authority.to_account_info();
    let authority_bump = accounts.ledger_config.authority_bump;

    // Premium lands in the pool under the ledger's own share account
    accounts.pool.deposit_premium(
        accounts.payer.to_account_info(),
        accounts.payer_token_account.to_account_info(),
        ledger_authority.clone(),
        accounts.token_program.to_account_info(),
        accounts.system_program.to_account_info(),
        terms.premium,
    )?;
    accounts.pool.pool_state.reload()?;

    let shares = Policy::reservation_for(&accounts.pool.pool_state, terms.max_coverage, 0)?;
    accounts
        .pool
        .reserve_shares(ledger_authority.clone(), authority_bump, shares)?;
    accounts.pool.pool_state.reload()?;

    let bump = [authority_bump];
    let seeds = &[LedgerConfig::AUTHORITY_SEED, &bump[..]];
    let signer_seeds = &[&seeds[..]];
    mint_policy_unit(
        accounts.token_program.to_account_info(),
        accounts.unit_mint.to_account_info(),
        accounts.holder_unit_account.to_account_info(),
        ledger_authority,
        signer_seeds,
    )?;

    let policy_id = accounts.ledger_config.allocate_policy_id()?;
    let parties = PolicyParties {
        holder: accounts.holder.key(),
        purchaser: accounts.payer.key(),
        unit_mint: accounts.unit_mint.key(),
    };
    let policy = Policy::issue(
        policy_id,
        &terms,
        hazard.direction,
        shares,
        parties,
        clock.unix_timestamp,
        ctx.bumps.policy,
    )?;
    emit_policy_issued(&policy);
    accounts.policy.set_inner(policy);

    hazard.policies_issued = hazard.policies_issued.saturating_add(1);
    store_ledger_account(&hazard_info, &hazard)?;

    let config = &mut accounts.ledger_config;
    config.record_issue(terms.premium, shares)?;
    config.check_reservation_sync(accounts.pool.pool_state.total_reserved_shares)?;

    msg!(
        "Policy {} issued: coverage {} reserved {} shares",
        policy_id,
        terms.max_coverage,
        shares
    );

    Ok(())
}

// ============================================================================
// BATCH ISSUANCE
// ============================================================================

#[derive(Accounts)]
pub struct IssuePoliciesBatch<'info> {
    #[account(
        mut,
        seeds = [LedgerConfig::SEED_PREFIX],
        bump = ledger_config.bump,
        constraint = !ledger_config.issuance_paused @ PolicyError::IssuancePaused
    )]
    pub ledger_config: Box<Account<'info, LedgerConfig>>,

    /// CHECK: PDA signer, no data
    #[account(
        seeds = [LedgerConfig::AUTHORITY_SEED],
        bump = ledger_config.authority_bump
    )]
    pub ledger_authority: UncheckedAccount<'info>,

    #[account(mut)]
    pub payer_token_account: Box<Account<'info, TokenAccount>>,

    pub pool: PoolPremiumAccounts<'info>,

    #[account(mut)]
    pub payer: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

/// Issue up to MAX_ISSUE_BATCH policies with one premium deposit and one
/// reservation. Any failing item fails the whole batch.
pub fn issue_policies_batch<'info>(
    ctx: Context<'_, '_, 'info, 'info, IssuePoliciesBatch<'info>>,
    items: Vec<PolicyTerms>,
) -> Result<()> {
    check_batch_len(items.len(), MAX_ISSUE_BATCH)?;
    require!(
        ctx.remaining_accounts.len() == items.len() * ACCOUNTS_PER_ITEM,
        PolicyError::InvalidPolicyAccount
    );

    let clock = Clock::get()?;
    let rent = Rent::get()?;

    let mut total_premium: u64 = 0;
    for (terms, item) in items
        .iter()
        .zip(ctx.remaining_accounts.chunks(ACCOUNTS_PER_ITEM))
    {
        HazardCategory::load_valid(&item[0], terms.hazard_id)?;
        terms.validate()?;
        total_premium = total_premium
            .checked_add(terms.premium)
            .ok_or(PolicyError::MathOverflow)?;
    }

    let accounts = &mut *ctx.accounts;
    let ledger_authority = accounts.ledger_authority.to_account_info();
    let authority_bump = accounts.ledger_config.authority_bump;
    let payer = accounts.payer.to_account_info();
    let token_program = accounts.token_program.to_account_info();
    let system = accounts.system_program.to_account_info();

    accounts.pool.deposit_premium(
        payer.clone(),
        accounts.payer_token_account.to_account_info(),
        ledger_authority.clone(),
        token_program.clone(),
        system.clone(),
        total_premium,
    )?;
    accounts.pool.pool_state.reload()?;

    let bump = [authority_bump];
    let authority_seeds = &[LedgerConfig::AUTHORITY_SEED, &bump[..]];
    let authority_signer = &[&authority_seeds[..]];

    let mut pending: u64 = 0;
    for (terms, item) in items
        .iter()
        .zip(ctx.remaining_accounts.chunks(ACCOUNTS_PER_ITEM))
    {
        let [hazard_info, policy_info, mint_info, holder_info, unit_account_info] = item else {
            return err!(PolicyError::InvalidPolicyAccount);
        };

        let mut hazard = HazardCategory::load_valid(hazard_info, terms.hazard_id)?;

        let shares =
            Policy::reservation_for(&accounts.pool.pool_state, terms.max_coverage, pending)?;
        pending = pending
            .checked_add(shares)
            .ok_or(PolicyError::MathOverflow)?;

        let policy_id = accounts.ledger_config.allocate_policy_id()?;
        let id_bytes = policy_id.to_le_bytes();

        // Policy account
        let (policy_key, policy_bump) =
            Pubkey::find_program_address(&[Policy::SEED_PREFIX, &id_bytes], &crate::ID);
        require_keys_eq!(policy_key, policy_info.key(), PolicyError::InvalidPolicyAccount);
        create_pda(
            payer.clone(),
            policy_info.clone(),
            system.clone(),
            &crate::ID,
            8 + Policy::INIT_SPACE,
            &rent,
            &[Policy::SEED_PREFIX, &id_bytes, &[policy_bump]],
        )?;

        // Unit mint
        let (mint_key, mint_bump) =
            Pubkey::find_program_address(&[Policy::UNIT_SEED, &id_bytes], &crate::ID);
        require_keys_eq!(mint_key, mint_info.key(), PolicyError::InvalidPolicyAccount);
        create_pda(
            payer.clone(),
            mint_info.clone(),
            system.clone(),
            &token::ID,
            spl_token::state::Mint::LEN,
            &rent,
            &[Policy::UNIT_SEED, &id_bytes, &[mint_bump]],
        )?;
        token::initialize_mint2(
            CpiContext::new(
                token_program.clone(),
                token::InitializeMint2 {
                    mint: mint_info.clone(),
                },
            ),
            0,
            &ledger_authority.key(),
            Some(&ledger_authority.key()),
        )?;

        // Holder unit account (address checked by the ATA program)
        associated_token::create(CpiContext::new(
            accounts.associated_token_program.to_account_info(),
            associated_token::Create {
                payer: payer.clone(),
                associated_token: unit_account_info.clone(),
                authority: holder_info.clone(),
                mint: mint_info.clone(),
                system_program: system.clone(),
                token_program: token_program.clone(),
            },
        ))?;

        mint_policy_unit(
            token_program.clone(),
            mint_info.clone(),
            unit_account_info.clone(),
            ledger_authority.clone(),
            authority_signer,
        )?;

        let parties = PolicyParties {
            holder: holder_info.key(),
            purchaser: payer.key(),
            unit_mint: mint_info.key(),
        };
        let policy = Policy::issue(
            policy_id,
            terms,
            hazard.direction,
            shares,
            parties,
            clock.unix_timestamp,
            policy_bump,
        )?;
        store_ledger_account(policy_info, &policy)?;
        emit_policy_issued(&policy);

        hazard.policies_issued = hazard.policies_issued.saturating_add(1);
        store_ledger_account(hazard_info, &hazard)?;

        accounts.ledger_config.record_issue(terms.premium, shares)?;
    }

    accounts
        .pool
        .reserve_shares(ledger_authority, authority_bump, pending)?;
    accounts.pool.pool_state.reload()?;
    accounts
        .ledger_config
        .check_reservation_sync(accounts.pool.pool_state.total_reserved_shares)?;

    msg!(
        "Issued {} policies: premium {} reserved {} shares",
        items.len(),
        total_premium,
        pending
    );

    Ok(())
}

fn create_pda<'info>(
    payer: AccountInfo<'info>,
    target: AccountInfo<'info>,
    system: AccountInfo<'info>,
    owner: &Pubkey,
    space: usize,
    rent: &Rent,
    seeds: &[&[u8]],
) -> Result<()> {
    system_program::create_account(
        CpiContext::new_with_signer(
            system,
            system_program::CreateAccount {
                from: payer,
                to: target,
            },
            &[seeds],
        ),
        rent.minimum_balance(space),
        space as u64,
        owner,
    )
}

fn emit_policy_issued(policy: &Policy) {
    emit!(PolicyIssued {
        policy_id: policy.policy_id,
        holder: policy.holder,
        purchaser: policy.purchaser,
        hazard_id: policy.hazard_id,
        start_time: policy.start_time,
        end_time: policy.end_time,
        max_coverage: policy.max_coverage,
        premium: policy.premium,
        trigger_threshold: policy.trigger_threshold,
        reserved_shares: policy.reserved_shares,
        unit_mint: policy.unit_mint,
    });
}
