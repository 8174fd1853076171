//! End-to-end tests driving the public engine API.
//!
//! Covers the documented scenarios for both modes, cancellation refunds,
//! pool materialisation, the receipt chain, and a seeded random walk that
//! checks conservation and atomicity after every operation.

use rand::{Rng, SeedableRng, rngs::StdRng};
use splitpay_settlement::SettlementEngine;
use splitpay_types::{
    AccountId, Amount, SplitError, SplitId, SplitMode, SplitRecord, SplitTerms, TransferKind,
    constants,
};

fn acct(name: &str) -> AccountId {
    AccountId::new(name)
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Funds a record accounts for, excluding what already left the split.
fn accounted(record: &SplitRecord) -> Amount {
    let claim = match record.mode {
        SplitMode::FixedAmount if !record.is_cancelled => record.collected_unwithdrawn(),
        _ => 0,
    };
    record.credited_balances() + record.pending_pool + claim
}

fn assert_conserved(engine: &SettlementEngine, id: SplitId) {
    let r = engine.get_split_info(id).unwrap();
    assert_eq!(
        r.received_amount,
        accounted(r) + r.withdrawn_amount + r.refunded_amount,
        "{id} does not conserve funds"
    );
    assert!(r.paid_amount <= r.received_amount);
    assert_eq!(engine.supply().total_inflow(id), r.received_amount);
    assert_eq!(
        engine.supply().total_outflow(id),
        r.withdrawn_amount + r.refunded_amount
    );
}

/// Random shares of `n` participants totalling 10,000 bp.
fn random_shares(rng: &mut StdRng, n: usize) -> Vec<u16> {
    let mut cuts: Vec<u16> = (1..n)
        .map(|_| rng.gen_range(0..=constants::BPS_DENOMINATOR))
        .collect();
    cuts.push(0);
    cuts.push(constants::BPS_DENOMINATOR);
    cuts.sort_unstable();
    cuts.windows(2).map(|w| w[1] - w[0]).collect()
}

// =====================================================================
// Documented scenarios
// =====================================================================

#[test]
fn even_split_credits_each_recipient_half() {
    init_tracing();
    let mut engine = SettlementEngine::new();
    let id = engine
        .create_split(
            &acct("deployer"),
            "Band",
            SplitTerms::dummy_shares(&[("wallet_1", 5000), ("wallet_2", 5000)], true),
        )
        .unwrap();

    engine.record_payment(&acct("fan"), id, 1_000_000).unwrap();

    assert_eq!(engine.get_split_recipient(id, 0).unwrap().withdrawable, 500_000);
    assert_eq!(engine.get_split_recipient(id, 1).unwrap().withdrawable, 500_000);
    assert_conserved(&engine, id);
}

#[test]
fn single_payer_bill_requires_exact_amount() {
    let mut engine = SettlementEngine::new();
    let id = engine
        .create_split(
            &acct("deployer"),
            "Taxi",
            SplitTerms::dummy_bill(&[("wallet_1", 1_000_000)]),
        )
        .unwrap();

    assert_eq!(
        engine.record_payment(&acct("wallet_1"), id, 999_999).unwrap_err(),
        SplitError::AmountMismatch {
            expected: 1_000_000,
            actual: 999_999
        }
    );
    assert!(!engine.get_split_info(id).unwrap().is_complete);

    engine.record_payment(&acct("wallet_1"), id, 1_000_000).unwrap();
    assert!(engine.get_split_info(id).unwrap().is_complete);
    assert_conserved(&engine, id);
}

#[test]
fn recipient_count_matches_creation() {
    let mut engine = SettlementEngine::new();
    let id = engine
        .create_split(
            &acct("deployer"),
            "Trio",
            SplitTerms::dummy_shares(&[("a", 3000), ("b", 3000), ("c", 4000)], false),
        )
        .unwrap();
    assert_eq!(engine.get_split_recipient_count(id), Some(3));
}

#[test]
fn creator_without_splits_has_empty_list() {
    let engine = SettlementEngine::new();
    assert!(engine.get_user_splits(&acct("nobody")).is_empty());
}

#[test]
fn zero_participants_rejected() {
    let mut engine = SettlementEngine::new();
    assert!(matches!(
        engine.create_split(&acct("d"), "Empty", SplitTerms::dummy_shares(&[], true)),
        Err(SplitError::InvalidRecipient { .. })
    ));
    assert!(matches!(
        engine.create_split(&acct("d"), "Empty", SplitTerms::dummy_bill(&[])),
        Err(SplitError::InvalidRecipient { .. })
    ));
}

#[test]
fn unknown_split_and_zero_amount() {
    let mut engine = SettlementEngine::new();
    assert_eq!(
        engine.record_payment(&acct("p"), SplitId(42), 10).unwrap_err(),
        SplitError::SplitNotFound(SplitId(42))
    );
    let id = engine
        .create_split(&acct("d"), "Solo", SplitTerms::dummy_shares(&[("a", 10_000)], true))
        .unwrap();
    assert!(matches!(
        engine.record_payment(&acct("p"), id, 0),
        Err(SplitError::InvalidAmount { .. })
    ));
}

#[test]
fn toggle_status_creator_only() {
    let mut engine = SettlementEngine::new();
    let id = engine
        .create_split(&acct("d"), "Solo", SplitTerms::dummy_shares(&[("a", 10_000)], true))
        .unwrap();

    assert!(matches!(
        engine.toggle_status(&acct("a"), id),
        Err(SplitError::Unauthorized { .. })
    ));
    assert!(engine.get_split_info(id).unwrap().is_active);

    assert!(!engine.toggle_status(&acct("d"), id).unwrap());
    assert!(!engine.get_split_info(id).unwrap().is_active);
}

// =====================================================================
// Properties
// =====================================================================

#[test]
fn creation_succeeds_iff_shares_total_exactly() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut engine = SettlementEngine::new();
    for _ in 0..500 {
        let n = rng.gen_range(1..=constants::MAX_PARTICIPANTS);
        let shares: Vec<u16> = (0..n).map(|_| rng.gen_range(0..=4000)).collect();
        let names: Vec<String> = (0..n).map(|i| format!("wallet_{i}")).collect();
        let input: Vec<(&str, u16)> = names.iter().map(String::as_str).zip(shares.iter().copied()).collect();
        let total: u32 = shares.iter().map(|&s| u32::from(s)).sum();

        let result = engine.create_split(&acct("d"), "Random", SplitTerms::dummy_shares(&input, true));
        if total == 10_000 {
            assert!(result.is_ok());
        } else {
            assert_eq!(result.unwrap_err(), SplitError::InvalidShares { total });
        }
    }
}

#[test]
fn auto_distribution_credits_exactly_the_payment() {
    let mut rng = StdRng::seed_from_u64(11);
    let mut engine = SettlementEngine::new();
    for _ in 0..500 {
        let n = rng.gen_range(1..=constants::MAX_PARTICIPANTS);
        let shares = random_shares(&mut rng, n);
        let names: Vec<String> = (0..n).map(|i| format!("wallet_{i}")).collect();
        let input: Vec<(&str, u16)> = names.iter().map(String::as_str).zip(shares).collect();
        let id = engine
            .create_split(&acct("d"), "Prop", SplitTerms::dummy_shares(&input, true))
            .unwrap();

        let amount: Amount = rng.gen_range(1..=u64::MAX / 2);
        engine.record_payment(&acct("payer"), id, amount).unwrap();
        assert_eq!(engine.get_split_info(id).unwrap().credited_balances(), amount);
    }
}

#[test]
fn cancel_refunds_everything_received() {
    let mut engine = SettlementEngine::new();
    let id = engine
        .create_split(
            &acct("d"),
            "Pool",
            SplitTerms::dummy_shares(&[("a", 7000), ("b", 3000)], false),
        )
        .unwrap();
    engine.record_payment(&acct("alice"), id, 1_500).unwrap();
    engine.record_payment(&acct("bob"), id, 2_000).unwrap();
    engine.record_payment(&acct("alice"), id, 250).unwrap();
    engine.drain_transfers();

    let refunds = engine.cancel_split(&acct("d"), id).unwrap();
    let refunded: Amount = refunds.iter().map(|t| t.amount).sum();
    assert_eq!(refunded, engine.get_split_info(id).unwrap().received_amount);
    assert_eq!(refunds[0].recipient, acct("alice"));
    assert_eq!(refunds[0].amount, 1_750);
    assert_eq!(refunds[1].recipient, acct("bob"));
    assert_eq!(refunds[1].amount, 2_000);
    assert!(refunds.iter().all(|t| t.kind == TransferKind::Refund));
    assert_eq!(engine.drain_transfers(), refunds);

    assert!(engine.record_payment(&acct("alice"), id, 1).is_err());
    assert!(engine.withdraw(&acct("a"), id).is_err());
    assert_eq!(engine.get_withdrawable(id, &acct("a")), Some(0));
    assert_conserved(&engine, id);
}

#[test]
fn materialised_pool_matches_preview_and_conserves() {
    let mut engine = SettlementEngine::new();
    let id = engine
        .create_split(
            &acct("d"),
            "Later",
            SplitTerms::dummy_shares(&[("a", 1), ("b", 4999), ("c", 5000)], false),
        )
        .unwrap();
    for amount in [3, 999, 10_007] {
        engine.record_payment(&acct("payer"), id, amount).unwrap();
    }

    let preview: Vec<Amount> = ["a", "b", "c"]
        .iter()
        .map(|n| engine.get_withdrawable(id, &acct(n)).unwrap())
        .collect();
    assert_eq!(preview.iter().sum::<Amount>(), 11_009);

    let first = engine.withdraw(&acct("c"), id).unwrap();
    assert_eq!(first, preview[2]);
    assert_eq!(engine.get_withdrawable(id, &acct("a")), Some(preview[0]));
    assert_eq!(engine.get_withdrawable(id, &acct("b")), Some(preview[1]));
    assert_conserved(&engine, id);
}

#[test]
fn receipt_chain_covers_full_lifecycle() {
    let mut engine = SettlementEngine::new();
    let bill = engine
        .create_split(&acct("d"), "Bill", SplitTerms::dummy_bill(&[("a", 10), ("b", 20)]))
        .unwrap();
    let share = engine
        .create_split(&acct("d"), "Share", SplitTerms::dummy_shares(&[("x", 10_000)], false))
        .unwrap();

    engine.record_payment(&acct("a"), bill, 10).unwrap();
    engine.record_payment(&acct("p"), share, 77).unwrap();
    engine.toggle_auto_distribute(&acct("d"), share).unwrap();
    engine.withdraw(&acct("x"), share).unwrap();
    engine.toggle_status(&acct("d"), bill).unwrap();
    engine.toggle_status(&acct("d"), bill).unwrap();
    engine.cancel_split(&acct("d"), bill).unwrap();

    let journal = engine.journal();
    assert_eq!(journal.len(), 9);
    assert!(journal.verify_chain());
    assert_eq!(journal.for_split(bill).count(), 5);

    let cancel = journal.receipts().last().unwrap();
    assert_eq!(cancel.payload_json().unwrap()["refunded"], 10);
}

// =====================================================================
// Random walk
// =====================================================================

#[test]
fn random_operations_conserve_and_stay_atomic() {
    init_tracing();
    let mut rng = StdRng::seed_from_u64(2024);
    let mut engine = SettlementEngine::new();
    let creators = [acct("alice"), acct("bob")];
    let accounts: Vec<AccountId> = (0..6).map(|i| acct(&format!("wallet_{i}"))).collect();
    let mut ids = Vec::new();

    for round in 0..40 {
        let creator = &creators[round % 2];
        let n = rng.gen_range(1..=accounts.len());
        let names: Vec<&str> = accounts[..n].iter().map(AccountId::as_str).collect();
        let terms = if rng.gen_bool(0.5) {
            let shares = random_shares(&mut rng, n);
            let input: Vec<(&str, u16)> = names.iter().copied().zip(shares).collect();
            SplitTerms::dummy_shares(&input, rng.gen_bool(0.5))
        } else {
            let input: Vec<(&str, Amount)> = names
                .iter()
                .map(|name| (*name, rng.gen_range(1..=5_000)))
                .collect();
            SplitTerms::dummy_bill(&input)
        };
        ids.push(engine.create_split(creator, "Walk", terms).unwrap());
    }

    let mut paid_out = vec![0 as Amount; ids.len()];
    for _ in 0..4_000 {
        let slot = rng.gen_range(0..ids.len());
        let id = ids[slot];
        let before = engine.get_split_info(id).unwrap().clone();
        let actor = match rng.gen_range(0..10) {
            0 => before.creator.clone(),
            1 => acct("stranger"),
            _ => accounts[rng.gen_range(0..accounts.len())].clone(),
        };

        let result = match rng.gen_range(0..20) {
            0..=9 => {
                let amount = match before.mode {
                    SplitMode::FixedAmount => before
                        .position(&actor)
                        .and_then(|pos| before.participants[pos].allotment.obligation())
                        .map_or(1, |owed| if rng.gen_bool(0.9) { owed } else { owed + 1 }),
                    SplitMode::SharePercent => rng.gen_range(0..=1_000_000),
                };
                engine.record_payment(&actor, id, amount)
            }
            10..=14 => {
                let who = if rng.gen_bool(0.3) { before.creator.clone() } else { actor };
                engine.withdraw(&who, id).map(|_| ())
            }
            15 | 16 => engine.toggle_status(&before.creator, id).map(|_| ()),
            17 | 18 => engine.toggle_auto_distribute(&before.creator, id).map(|_| ()),
            _ => engine.cancel_split(&before.creator, id).map(|_| ()),
        };

        if result.is_err() {
            assert_eq!(engine.get_split_info(id).unwrap(), &before, "failed op mutated {id}");
        }
        assert_conserved(&engine, id);

        for transfer in engine.drain_transfers() {
            let pos = ids.iter().position(|i| *i == transfer.split_id).unwrap();
            paid_out[pos] += transfer.amount;
        }
    }

    for (slot, id) in ids.iter().enumerate() {
        let r = engine.get_split_info(*id).unwrap();
        assert_eq!(paid_out[slot], r.withdrawn_amount + r.refunded_amount);
        assert!(!(r.is_cancelled && r.is_complete));
        assert_conserved(&engine, *id);
    }
    assert!(engine.journal().verify_chain());
}
