// programs/tempest_policy/src/instructions/collateral.rs
//
// Pool-side accounts and CPI helpers shared by the issuance instructions.
// Vault, fee and share accounts are verified by the pool program itself.

use anchor_lang::prelude::*;
use anchor_spl::token::{self, spl_token::instruction::AuthorityType};
use tempest_pool::cpi::accounts::{AdjustReservation, Deposit};
use tempest_pool::program::TempestPool;
use tempest_pool::state::{PoolConfig, PoolState};

use crate::state::LedgerConfig;

/// Pool accounts needed to deposit premiums and reserve shares
#[derive(Accounts)]
pub struct PoolPremiumAccounts<'info> {
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
    pub vault_authority: UncheckedAccount<'info>,

    /// CHECK: Verified by the pool program
    #[account(mut)]
    pub asset_vault: UncheckedAccount<'info>,

    /// CHECK: Verified by the pool program
    #[account(mut)]
    pub fee_recipient: UncheckedAccount<'info>,

    /// CHECK: Ledger authority's share account; the pool creates it on the first premium
    #[account(mut)]
    pub ledger_share_account: UncheckedAccount<'info>,

    pub pool_program: Program<'info, TempestPool>,
}

impl<'info> PoolPremiumAccounts<'info> {
    /// Deposit `amount` from the payer, crediting shares to the ledger authority
    pub fn deposit_premium(
        &self,
        payer: AccountInfo<'info>,
        payer_token_account: AccountInfo<'info>,
        ledger_authority: AccountInfo<'info>,
        token_program: AccountInfo<'info>,
        system_program: AccountInfo<'info>,
        amount: u64,
    ) -> Result<()> {
        tempest_pool::cpi::deposit(
            CpiContext::new(
                self.pool_program.to_account_info(),
                Deposit {
                    pool_config: self.pool_config.to_account_info(),
                    pool_state: self.pool_state.to_account_info(),
                    vault_authority: self.vault_authority.to_account_info(),
                    asset_vault: self.asset_vault.to_account_info(),
                    fee_recipient: self.fee_recipient.to_account_info(),
                    depositor_token_account: payer_token_account,
                    receiver: ledger_authority,
                    receiver_share_account: self.ledger_share_account.to_account_info(),
                    depositor: payer,
                    token_program,
                    system_program,
                },
            ),
            amount,
        )?;
        Ok(())
    }

    pub fn reserve_shares(
        &self,
        ledger_authority: AccountInfo<'info>,
        authority_bump: u8,
        amount: u64,
    ) -> Result<()> {
        let bump = [authority_bump];
        let seeds = &[LedgerConfig::AUTHORITY_SEED, &bump[..]];
        let signer_seeds = &[&seeds[..]];

        tempest_pool::cpi::reserve_shares(
            CpiContext::new_with_signer(
                self.pool_program.to_account_info(),
                AdjustReservation {
                    pool_config: self.pool_config.to_account_info(),
                    pool_state: self.pool_state.to_account_info(),
                    policy_ledger: ledger_authority,
                },
                signer_seeds,
            ),
            amount,
        )?;
        Ok(())
    }
}

/// Mint the single policy unit, fix supply at one and freeze the holder's
/// account so the unit only moves through `transfer_policy`.
pub fn mint_policy_unit<'info>(
    token_program: AccountInfo<'info>,
    unit_mint: AccountInfo<'info>,
    holder_unit_account: AccountInfo<'info>,
    ledger_authority: AccountInfo<'info>,
    signer_seeds: &[&[&[u8]]],
) -> Result<()> {
    token::mint_to(
        CpiContext::new_with_signer(
            token_program.clone(),
            token::MintTo {
                mint: unit_mint.clone(),
                to: holder_unit_account.clone(),
                authority: ledger_authority.clone(),
            },
            signer_seeds,
        ),
        1,
    )?;

    token::set_authority(
        CpiContext::new_with_signer(
            token_program.clone(),
            token::SetAuthority {
                current_authority: ledger_authority.clone(),
                account_or_mint: unit_mint.clone(),
            },
            signer_seeds,
        ),
        AuthorityType::MintTokens,
        None,
    )?;

    token::freeze_account(CpiContext::new_with_signer(
        token_program,
        token::FreezeAccount {
            account: holder_unit_account,
            mint: unit_mint,
            authority: ledger_authority,
        },
        signer_seeds,
    ))
}
