//! The settlement engine.
//!
//! Every mutating operation follows the same shape:
//! 1. Look up the split and check every precondition
//! 2. Apply the change to a staged copy of the record
//! 3. Verify supply conservation on the staged copy
//! 4. Commit the copy, queue outgoing transfers, append a receipt
//!
//! A failure at any step returns before the commit, so no operation leaves a
//! split partially updated. Mutating methods take `&mut self`, which gives
//! single-writer semantics; hosts that want cross-split parallelism shard
//! engines or put one behind a lock.

use serde_json::json;
use splitpay_ledger::{SplitRegistry, UserIndex};
use splitpay_types::{
    AccountId, Amount, Contribution, ContributionId, EngineConfig, Participant, ReceiptType,
    Result, SplitError, SplitId, SplitMode, SplitRecord, SplitStatus, SplitTerms, Transfer,
    TransferKind,
};

use crate::conservation::SupplyConservation;
use crate::distribution::allocate;
use crate::journal::ReceiptJournal;
use crate::outbox::TransferOutbox;
use crate::validation::{validate_name, validate_terms};

/// Creates splits, records payments, pays out, cancels, and answers queries.
pub struct SettlementEngine {
    config: EngineConfig,
    registry: SplitRegistry,
    users: UserIndex,
    supply: SupplyConservation,
    outbox: TransferOutbox,
    journal: ReceiptJournal,
}

impl SettlementEngine {
    /// Create an engine with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::from_parts(EngineConfig::default())
    }

    /// Create an engine with a custom configuration.
    ///
    /// # Errors
    /// Returns `Configuration` if the limits are out of range.
    pub fn with_config(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_parts(config))
    }

    fn from_parts(config: EngineConfig) -> Self {
        Self {
            config,
            registry: SplitRegistry::new(),
            users: UserIndex::new(),
            supply: SupplyConservation::new(),
            outbox: TransferOutbox::new(),
            journal: ReceiptJournal::new(),
        }
    }

    // =================================================================
    // Mutating operations
    // =================================================================

    /// Create a split owned by `caller`.
    ///
    /// # Errors
    /// - `InvalidName` if the name is empty or too long
    /// - `InvalidRecipient` if the participant list is empty, too long, or
    ///   has duplicates
    /// - `InvalidShares` if SharePercent shares do not total 10,000 bp
    /// - `InvalidAmount` if a FixedAmount obligation is zero or the total
    ///   overflows
    pub fn create_split(
        &mut self,
        caller: &AccountId,
        name: &str,
        terms: SplitTerms,
    ) -> Result<SplitId> {
        validate_name(name, &self.config)?;
        validate_terms(&terms, &self.config)?;

        let id = self.registry.next_id();
        let record = SplitRecord::new(id, name.to_string(), caller.clone(), terms);
        let payload = json!({
            "name": record.name,
            "mode": record.mode,
            "participants": record.participants,
            "auto_distribute": record.auto_distribute,
            "target_total": record.target_total,
        });

        tracing::info!(
            split = %id,
            creator = %caller,
            mode = %record.mode,
            participants = record.participant_count(),
            "Split created"
        );

        self.registry.insert(record)?;
        self.users.record(caller, id);
        self.write_receipt(ReceiptType::SplitCreated, id, caller, &payload);
        Ok(id)
    }

    /// Pay `amount` into a split.
    ///
    /// SharePercent splits accept payments from anyone and either credit
    /// participants immediately (auto-distribute) or pool the funds.
    /// FixedAmount splits only accept the exact obligation of an unpaid payer.
    ///
    /// # Errors
    /// - `SplitNotFound`, `AlreadyFinalized`, `SplitInactive`
    /// - `InvalidAmount` for zero or an overflowing total
    /// - `NotAPayer`, `AlreadyPaid`, `AmountMismatch` (FixedAmount)
    pub fn record_payment(
        &mut self,
        caller: &AccountId,
        split_id: SplitId,
        amount: Amount,
    ) -> Result<()> {
        let record = self.lookup(split_id)?;
        if record.status().is_terminal() {
            return Err(SplitError::AlreadyFinalized(split_id));
        }
        if !record.accepts_payments() {
            return Err(SplitError::SplitInactive(split_id));
        }
        if amount == 0 {
            return Err(SplitError::InvalidAmount {
                reason: "payment must be positive".into(),
            });
        }

        let mut staged = record.clone();
        staged.received_amount = staged.received_amount.checked_add(amount).ok_or_else(|| {
            SplitError::InvalidAmount {
                reason: format!("{split_id} received total would overflow"),
            }
        })?;

        match staged.mode {
            SplitMode::SharePercent if staged.auto_distribute => {
                Self::credit_participants(&mut staged, amount)?;
            }
            SplitMode::SharePercent => {
                staged.pending_pool += amount;
            }
            SplitMode::FixedAmount => {
                Self::settle_obligation(&mut staged, caller, amount)?;
            }
        }
        staged.contributions.push(Contribution {
            id: ContributionId::new(),
            payer: caller.clone(),
            amount,
            recorded_at: chrono::Utc::now(),
        });

        let completed = staged.is_complete;
        let received = staged.received_amount;
        self.commit(staged, amount, 0)?;

        tracing::info!(
            split = %split_id,
            payer = %caller,
            amount,
            received,
            "Payment recorded"
        );
        self.write_receipt(
            ReceiptType::PaymentRecorded,
            split_id,
            caller,
            &json!({ "amount": amount, "received": received }),
        );
        if completed {
            tracing::info!(split = %split_id, total = received, "Split fully paid");
            self.write_receipt(
                ReceiptType::SplitCompleted,
                split_id,
                caller,
                &json!({ "paid_amount": received }),
            );
        }
        Ok(())
    }

    /// Pay out everything `caller` has accrued on a split.
    ///
    /// SharePercent: the caller's credited balance, after any pooled funds
    /// are allocated. FixedAmount: the collected total, to the creator, once
    /// every payer has paid.
    ///
    /// # Errors
    /// - `SplitNotFound`
    /// - `SplitInactive` if the split was cancelled
    /// - `SplitNotComplete` for a FixedAmount split that is not fully paid
    /// - `NothingToWithdraw` if the caller has no accrued balance
    pub fn withdraw(&mut self, caller: &AccountId, split_id: SplitId) -> Result<Amount> {
        let record = self.lookup(split_id)?;
        if record.is_cancelled {
            return Err(SplitError::SplitInactive(split_id));
        }

        let nothing = || SplitError::NothingToWithdraw {
            caller: caller.clone(),
            split_id,
        };
        let mut staged = record.clone();
        let amount = match staged.mode {
            SplitMode::FixedAmount => {
                if !staged.is_complete {
                    return Err(SplitError::SplitNotComplete(split_id));
                }
                if !staged.is_creator(caller) {
                    return Err(nothing());
                }
                staged.collected_unwithdrawn()
            }
            SplitMode::SharePercent => {
                Self::materialize_pool(&mut staged)?;
                let pos = staged.position(caller).ok_or_else(nothing)?;
                std::mem::take(&mut staged.participants[pos].withdrawable)
            }
        };
        if amount == 0 {
            return Err(nothing());
        }
        staged.withdrawn_amount += amount;
        self.commit(staged, 0, amount)?;

        self.outbox.push(Transfer {
            split_id,
            recipient: caller.clone(),
            amount,
            kind: TransferKind::Withdrawal,
        });
        tracing::info!(split = %split_id, recipient = %caller, amount, "Withdrawal queued");
        self.write_receipt(
            ReceiptType::Withdrawal,
            split_id,
            caller,
            &json!({ "amount": amount }),
        );
        Ok(amount)
    }

    /// Cancel a split and refund every contribution to its payer.
    ///
    /// Refunds are aggregated per payer, in order of each payer's first
    /// payment, and queued in the outbox. Returns the queued refunds.
    ///
    /// # Errors
    /// - `SplitNotFound`
    /// - `Unauthorized` if the caller is not the creator
    /// - `AlreadyFinalized` if the split is complete or already cancelled
    /// - `SplitInactive` if the split is paused
    /// - `FundsAlreadyReleased` if anything has been withdrawn
    pub fn cancel_split(&mut self, caller: &AccountId, split_id: SplitId) -> Result<Vec<Transfer>> {
        let record = self.lookup(split_id)?;
        Self::require_creator(record, caller)?;
        match record.status() {
            SplitStatus::Cancelled | SplitStatus::Complete => {
                return Err(SplitError::AlreadyFinalized(split_id));
            }
            SplitStatus::Paused => return Err(SplitError::SplitInactive(split_id)),
            SplitStatus::Active => {}
        }
        if record.withdrawn_amount > 0 {
            return Err(SplitError::FundsAlreadyReleased {
                split_id,
                withdrawn: record.withdrawn_amount,
            });
        }

        let refunds: Vec<Transfer> = record
            .contributions_by_payer()
            .into_iter()
            .map(|(payer, amount)| Transfer {
                split_id,
                recipient: payer,
                amount,
                kind: TransferKind::Refund,
            })
            .collect();
        let refunded: Amount = refunds.iter().map(|t| t.amount).sum();

        let mut staged = record.clone();
        for p in &mut staged.participants {
            p.withdrawable = 0;
        }
        staged.pending_pool = 0;
        staged.refunded_amount = refunded;
        staged.is_cancelled = true;
        staged.is_active = false;
        self.commit(staged, 0, refunded)?;

        self.outbox.extend(refunds.iter().cloned());
        tracing::info!(
            split = %split_id,
            refunds = refunds.len(),
            refunded,
            "Split cancelled"
        );
        self.write_receipt(
            ReceiptType::SplitCancelled,
            split_id,
            caller,
            &json!({ "refunded": refunded, "refunds": refunds }),
        );
        Ok(refunds)
    }

    /// Pause or resume a split. Returns the new `is_active` value.
    ///
    /// # Errors
    /// - `SplitNotFound`, `Unauthorized`
    /// - `AlreadyFinalized` if the split was cancelled
    pub fn toggle_status(&mut self, caller: &AccountId, split_id: SplitId) -> Result<bool> {
        let record = self.lookup(split_id)?;
        Self::require_creator(record, caller)?;
        if record.is_cancelled {
            return Err(SplitError::AlreadyFinalized(split_id));
        }

        let mut staged = record.clone();
        staged.is_active = !staged.is_active;
        let now_active = staged.is_active;
        self.commit(staged, 0, 0)?;

        tracing::info!(split = %split_id, active = now_active, "Split status toggled");
        self.write_receipt(
            ReceiptType::StatusToggled,
            split_id,
            caller,
            &json!({ "is_active": now_active }),
        );
        Ok(now_active)
    }

    /// Switch a SharePercent split between auto-distribute and accumulate.
    /// Returns the new `auto_distribute` value.
    ///
    /// Turning auto-distribute on allocates the pending pool first, so
    /// pooled payments keep their pro-rata split.
    ///
    /// # Errors
    /// - `SplitNotFound`, `Unauthorized`
    /// - `AlreadyFinalized` if the split was cancelled
    /// - `InvalidMode` for FixedAmount splits
    pub fn toggle_auto_distribute(&mut self, caller: &AccountId, split_id: SplitId) -> Result<bool> {
        let record = self.lookup(split_id)?;
        Self::require_creator(record, caller)?;
        if record.is_cancelled {
            return Err(SplitError::AlreadyFinalized(split_id));
        }
        if record.mode != SplitMode::SharePercent {
            return Err(SplitError::InvalidMode {
                split_id,
                reason: "auto-distribute only applies to SharePercent splits".into(),
            });
        }

        let mut staged = record.clone();
        staged.auto_distribute = !staged.auto_distribute;
        if staged.auto_distribute {
            Self::materialize_pool(&mut staged)?;
        }
        let now_auto = staged.auto_distribute;
        self.commit(staged, 0, 0)?;

        tracing::info!(split = %split_id, auto_distribute = now_auto, "Auto-distribute toggled");
        self.write_receipt(
            ReceiptType::AutoDistributeToggled,
            split_id,
            caller,
            &json!({ "auto_distribute": now_auto }),
        );
        Ok(now_auto)
    }

    // =================================================================
    // Read-only queries (never error)
    // =================================================================

    #[must_use]
    pub fn get_split_info(&self, split_id: SplitId) -> Option<&SplitRecord> {
        self.registry.get(split_id)
    }

    #[must_use]
    pub fn get_split_recipient(&self, split_id: SplitId, index: usize) -> Option<&Participant> {
        self.registry.get(split_id)?.participant(index)
    }

    #[must_use]
    pub fn get_split_recipient_count(&self, split_id: SplitId) -> Option<usize> {
        self.registry.get(split_id).map(SplitRecord::participant_count)
    }

    /// Whole participant ledger of a split.
    #[must_use]
    pub fn get_split_participants(&self, split_id: SplitId) -> Option<&[Participant]> {
        self.registry.get(split_id).map(|r| r.participants.as_slice())
    }

    /// What `account` could withdraw right now, including its share of any
    /// pooled funds. `None` only if the split does not exist.
    #[must_use]
    pub fn get_withdrawable(&self, split_id: SplitId, account: &AccountId) -> Option<Amount> {
        let record = self.registry.get(split_id)?;
        if record.is_cancelled {
            return Some(0);
        }
        let amount = match record.mode {
            SplitMode::FixedAmount if record.is_complete && record.is_creator(account) => {
                record.collected_unwithdrawn()
            }
            SplitMode::FixedAmount => 0,
            SplitMode::SharePercent => record.position(account).map_or(0, |pos| {
                let pooled = if record.pending_pool == 0 {
                    0
                } else {
                    allocate(record.pending_pool, &record.shares())
                        .map_or(0, |credits| credits[pos])
                };
                record.participants[pos].withdrawable + pooled
            }),
        };
        Some(amount)
    }

    #[must_use]
    pub fn get_user_splits(&self, creator: &AccountId) -> Vec<SplitId> {
        self.users.list_by_creator(creator).to_vec()
    }

    /// Identifier the next created split will receive.
    #[must_use]
    pub fn get_current_split_id(&self) -> SplitId {
        self.registry.next_id()
    }

    // =================================================================
    // Host plumbing
    // =================================================================

    /// Transfers queued but not yet handed to the host.
    #[must_use]
    pub fn pending_transfers(&self) -> &[Transfer] {
        self.outbox.pending()
    }

    /// Hand every queued transfer to the host for execution.
    pub fn drain_transfers(&mut self) -> Vec<Transfer> {
        self.outbox.drain()
    }

    #[must_use]
    pub fn journal(&self) -> &ReceiptJournal {
        &self.journal
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn supply(&self) -> &SupplyConservation {
        &self.supply
    }

    // =================================================================
    // Internals
    // =================================================================

    fn lookup(&self, split_id: SplitId) -> Result<&SplitRecord> {
        self.registry
            .get(split_id)
            .ok_or(SplitError::SplitNotFound(split_id))
    }

    fn require_creator(record: &SplitRecord, caller: &AccountId) -> Result<()> {
        if record.is_creator(caller) {
            return Ok(());
        }
        tracing::warn!(
            split = %record.id,
            caller = %caller,
            creator = %record.creator,
            "Rejected creator-only operation"
        );
        Err(SplitError::Unauthorized {
            caller: caller.clone(),
            split_id: record.id,
        })
    }

    /// Credit `amount` pro-rata to participant balances.
    fn credit_participants(record: &mut SplitRecord, amount: Amount) -> Result<()> {
        let credits = allocate(amount, &record.shares())?;
        for (participant, credit) in record.participants.iter_mut().zip(credits) {
            participant.withdrawable += credit;
            tracing::debug!(
                split = %record.id,
                recipient = %participant.account,
                credit,
                "Participant credited"
            );
        }
        record.paid_amount += amount;
        Ok(())
    }

    /// Allocate the accumulate-mode pool into participant balances.
    fn materialize_pool(record: &mut SplitRecord) -> Result<()> {
        let pool = std::mem::take(&mut record.pending_pool);
        if pool > 0 {
            Self::credit_participants(record, pool)?;
        }
        Ok(())
    }

    /// Apply a FixedAmount payment to the caller's obligation.
    fn settle_obligation(record: &mut SplitRecord, caller: &AccountId, amount: Amount) -> Result<()> {
        let split_id = record.id;
        let pos = record
            .position(caller)
            .ok_or_else(|| SplitError::NotAPayer {
                caller: caller.clone(),
                split_id,
            })?;
        let payer = &mut record.participants[pos];
        if payer.paid {
            return Err(SplitError::AlreadyPaid {
                caller: caller.clone(),
                split_id,
            });
        }
        let expected = payer.allotment.obligation().ok_or_else(|| {
            SplitError::Internal(format!("{split_id}: payer {caller} has no obligation"))
        })?;
        if amount != expected {
            return Err(SplitError::AmountMismatch {
                expected,
                actual: amount,
            });
        }
        payer.paid = true;
        record.paid_amount += amount;
        if record.all_paid() {
            record.is_complete = true;
        }
        Ok(())
    }

    /// Verify conservation on a staged record and make it the stored state.
    fn commit(&mut self, staged: SplitRecord, inflow: Amount, outflow: Amount) -> Result<()> {
        if let Err(err) = self.supply.verify(&staged, inflow, outflow) {
            tracing::error!(split = %staged.id, error = %err, "Conservation check failed, change discarded");
            return Err(err);
        }
        let split_id = staged.id;
        self.registry.commit(staged)?;
        if inflow > 0 {
            self.supply.record_inflow(split_id, inflow);
        }
        if outflow > 0 {
            self.supply.record_outflow(split_id, outflow);
        }
        Ok(())
    }

    fn write_receipt(
        &mut self,
        receipt_type: ReceiptType,
        split_id: SplitId,
        actor: &AccountId,
        payload: &serde_json::Value,
    ) {
        if self.config.journal_enabled {
            self.journal.append(receipt_type, split_id, actor, payload);
        }
    }
}

impl Default for SettlementEngine {
    fn default() -> Self {
        Self::new()
    }
}
