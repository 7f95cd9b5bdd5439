// programs/tempest_policy/src/instructions/hazards.rs

use anchor_lang::prelude::*;
use tempest_core::TriggerDirection;

use crate::errors::PolicyError;
use crate::events::{HazardCategoryAdded, HazardCategoryRemoved};
use crate::state::{HazardCategory, LedgerConfig};

/// Add a hazard category, or re-enable a removed one
#[derive(Accounts)]
#[instruction(hazard_id: u16)]
pub struct AddHazardCategory<'info> {
    #[account(
        seeds = [LedgerConfig::SEED_PREFIX],
        bump = ledger_config.bump,
        has_one = authority @ PolicyError::NotAuthorized
    )]
    pub ledger_config: Account<'info, LedgerConfig>,

    #[account(
        init_if_needed,
        payer = authority,
        space = 8 + HazardCategory::INIT_SPACE,
        seeds = [HazardCategory::SEED_PREFIX, &hazard_id.to_le_bytes()],
        bump
    )]
    pub hazard: Account<'info, HazardCategory>,

    #[account(mut)]
    pub authority: Signer<'info>,

    pub system_program: Program<'info, System>,
}

pub fn add_hazard_category(
    ctx: Context<AddHazardCategory>,
    hazard_id: u16,
    name: String,
    direction: TriggerDirection,
) -> Result<()> {
    let clock = Clock::get()?;
    let hazard = &mut ctx.accounts.hazard;

    hazard.register(
        hazard_id,
        name.clone(),
        direction,
        clock.unix_timestamp,
        ctx.bumps.hazard,
    )?;

    emit!(HazardCategoryAdded {
        hazard_id,
        name,
        direction,
        timestamp: clock.unix_timestamp,
    });

    msg!("Hazard {} added ({})", hazard_id, direction.name());

    Ok(())
}

/// Remove a hazard category; existing policies keep their terms
#[derive(Accounts)]
#[instruction(hazard_id: u16)]
pub struct RemoveHazardCategory<'info> {
    #[account(
        seeds = [LedgerConfig::SEED_PREFIX],
        bump = ledger_config.bump,
        has_one = authority @ PolicyError::NotAuthorized
    )]
    pub ledger_config: Account<'info, LedgerConfig>,

    #[account(
        mut,
        seeds = [HazardCategory::SEED_PREFIX, &hazard_id.to_le_bytes()],
        bump = hazard.bump,
    )]
    pub hazard: Account<'info, HazardCategory>,

    pub authority: Signer<'info>,
}

pub fn remove_hazard_category(ctx: Context<RemoveHazardCategory>, hazard_id: u16) -> Result<()> {
    let clock = Clock::get()?;
    let hazard = &mut ctx.accounts.hazard;

    hazard.retire(clock.unix_timestamp)?;

    emit!(HazardCategoryRemoved {
        hazard_id,
        policies_issued: hazard.policies_issued,
        timestamp: clock.unix_timestamp,
    });

    msg!("Hazard {} removed", hazard_id);

    Ok(())
}
