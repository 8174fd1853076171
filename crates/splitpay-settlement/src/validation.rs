//! Creation-time validation of split names and terms.
//!
//! Every check runs before anything is written, so a rejected
//! `create_split` leaves no trace.

use std::collections::HashSet;

use splitpay_types::{
    AccountId, Amount, EngineConfig, Result, SplitError, SplitTerms, constants,
};

use crate::distribution::sum_bps;

/// Name must be non-empty (after trimming) and within the configured length.
pub fn validate_name(name: &str, config: &EngineConfig) -> Result<()> {
    if name.trim().is_empty() {
        return Err(SplitError::InvalidName {
            reason: "name is empty".into(),
        });
    }
    let len = name.chars().count();
    if len > config.max_name_len {
        return Err(SplitError::InvalidName {
            reason: format!("{len} chars exceeds limit of {}", config.max_name_len),
        });
    }
    Ok(())
}

/// Check participant bounds, uniqueness, and the mode-specific totals.
///
/// # Errors
/// - `InvalidRecipient`: empty, over the limit, or duplicate accounts
/// - `InvalidShares`: shares totalling anything other than 10,000 bp
/// - `InvalidAmount`: a zero obligation, or obligations that overflow
pub fn validate_terms(terms: &SplitTerms, config: &EngineConfig) -> Result<()> {
    let count = terms.len();
    if count < constants::MIN_PARTICIPANTS {
        return Err(SplitError::InvalidRecipient {
            reason: "participant list is empty".into(),
        });
    }
    if count > config.max_participants {
        return Err(SplitError::InvalidRecipient {
            reason: format!(
                "{count} participants exceeds limit of {}",
                config.max_participants
            ),
        });
    }
    check_unique(&terms.accounts())?;

    match terms {
        SplitTerms::SharePercent { recipients, .. } => {
            let shares: Vec<_> = recipients.iter().map(|r| r.bps).collect();
            let total = sum_bps(&shares);
            if total != u32::from(constants::BPS_DENOMINATOR) {
                return Err(SplitError::InvalidShares { total });
            }
        }
        SplitTerms::FixedAmount { payers } => {
            if let Some(p) = payers.iter().find(|p| p.amount == 0) {
                return Err(SplitError::InvalidAmount {
                    reason: format!("obligation for {} is zero", p.account),
                });
            }
            payers
                .iter()
                .try_fold(0 as Amount, |acc, p| acc.checked_add(p.amount))
                .ok_or_else(|| SplitError::InvalidAmount {
                    reason: "obligations overflow the split total".into(),
                })?;
        }
    }
    Ok(())
}

fn check_unique(accounts: &[&AccountId]) -> Result<()> {
    let mut seen = HashSet::with_capacity(accounts.len());
    for account in accounts {
        if !seen.insert(*account) {
            return Err(SplitError::InvalidRecipient {
                reason: format!("duplicate participant {account}"),
            });
        }
    }
    Ok(())
}
