//! End-to-end exercises of the ledger state machine: oracle decoding,
//! revaluation, borrow limits, interest accrual, and liquidation, chained
//! the way the on-chain handlers chain them.

use anchor_lang::prelude::Pubkey;

use lending_core::constants::*;
use lending_core::errors::LendingError;
use lending_core::oracle;
use lending_core::state::UserAccount;
use lending_core::utils::{
    calculate_max_borrowable, calculate_seize_value, calculate_seized_amount, check_confidence,
    is_within_safe_ratio, TokenPrice,
};

const INTEREST_RATE_BPS: u64 = 300;
const LIQUIDATION_THRESHOLD_BPS: u64 = 8_000;
const PRICE_STALE_THRESHOLD_SECONDS: u64 = 10_800;
const NOW: i64 = 1_700_000_000;

// Wire layout of a price record, as published by the oracle network.
fn encode_price_record(feed_id: [u8; 32], price: i64, conf: u64, expo: i32, publish_time: i64) -> Vec<u8> {
    let mut data = vec![0u8; PRICE_RECORD_FIXED_LEN];
    data[0..2].copy_from_slice(&1u16.to_le_bytes()); // write flag
    data[9..13].copy_from_slice(&PRICE_RECORD_MAGIC.to_le_bytes());
    data[13..17].copy_from_slice(&PRICE_RECORD_VERSION.to_le_bytes());
    data[17..21].copy_from_slice(&PRICE_ACCOUNT_TYPE.to_le_bytes());
    data[25..57].copy_from_slice(&feed_id);
    data[57..65].copy_from_slice(&price.to_le_bytes());
    data[65..73].copy_from_slice(&conf.to_le_bytes());
    data[73..77].copy_from_slice(&expo.to_le_bytes());
    data[81..89].copy_from_slice(&publish_time.to_le_bytes());
    data[89..97].copy_from_slice(&(publish_time - 5).to_le_bytes());
    data[193..197].copy_from_slice(&8u32.to_le_bytes());
    data.extend_from_slice(&[0u8; 8]); // proof blob
    data
}

fn fresh_account(now: i64) -> UserAccount {
    UserAccount {
        owner: Pubkey::new_unique(),
        token_balances: [0; MAX_COLLATERAL_TOKENS],
        total_collateral_usd: 0,
        total_debt_usd: 0,
        last_accrual_timestamp: now,
        liquidation_count: 0,
        has_active_loan: false,
        is_initialized: true,
        bump: 255,
    }
}

/// Read a feed the way the handlers do and slot it into a price table.
fn price_table_from_feed(
    feed_id: [u8; 32],
    record: &[u8],
    token_index: usize,
    decimals: u8,
    now: i64,
) -> [Option<TokenPrice>; MAX_COLLATERAL_TOKENS] {
    let (price_cents, conf_cents) =
        oracle::read_price(record, &feed_id, now, PRICE_STALE_THRESHOLD_SECONDS).unwrap();
    check_confidence(price_cents, conf_cents).unwrap();
    let mut table = [None; MAX_COLLATERAL_TOKENS];
    table[token_index] = Some(TokenPrice {
        price_cents,
        decimals,
    });
    table
}

#[test]
fn deposit_values_collateral_from_the_feed() {
    let feed_id = [3u8; 32];
    // $2000.00 per token
    let record = encode_price_record(feed_id, 200_000, 40, -2, NOW - 60);
    let prices = price_table_from_feed(feed_id, &record, 0, 9, NOW);

    let mut account = fresh_account(NOW);
    let mut vault_balance: u64 = 0;

    // deposit 0.1 token of a 9-decimal mint
    let amount = 100_000_000u64;
    vault_balance += amount;
    account.credit(0, amount).unwrap();
    let (collateral_usd, debt_usd) = account.revalue(&prices).unwrap();

    assert_eq!(vault_balance, 100_000_000);
    assert_eq!(collateral_usd, 20_000); // $200.00
    assert_eq!(debt_usd, 0);
    assert!(!account.has_active_loan);
}

#[test]
fn deposits_and_withdrawals_alone_never_create_debt() {
    let feed_id = [4u8; 32];
    let record = encode_price_record(feed_id, 200_000, 40, -2, NOW);
    let prices = price_table_from_feed(feed_id, &record, 2, 9, NOW);

    let mut account = fresh_account(NOW);
    for (credit, debit) in [(500_000u64, 200_000u64), (1_000, 1_000), (42, 0)] {
        account.credit(2, credit).unwrap();
        account.revalue(&prices).unwrap();
        account.debit(2, debit).unwrap();
        let (_, debt) = account.revalue(&prices).unwrap();
        assert_eq!(debt, 0);
        assert!(!account.has_active_loan);
    }
}

#[test]
fn borrow_just_above_the_limit_is_rejected() {
    let feed_id = [5u8; 32];
    let record = encode_price_record(feed_id, 200_000, 40, -2, NOW);
    let prices = price_table_from_feed(feed_id, &record, 0, 9, NOW);

    let mut account = fresh_account(NOW);
    account.credit(0, 100_000_000).unwrap();
    let (collateral_usd, debt_usd) = account.revalue(&prices).unwrap();

    let max_borrowable =
        calculate_max_borrowable(collateral_usd, debt_usd, LIQUIDATION_THRESHOLD_BPS).unwrap();
    assert_eq!(max_borrowable, 16_000); // 80% of $200.00

    // $161.00 is just above the cap
    assert!(16_100 > max_borrowable);
    // $160.00 is exactly the cap and goes through
    assert!(16_000 <= max_borrowable);
    account.set_debt(debt_usd + 16_000);
    assert!(account.has_active_loan);
    assert!(is_within_safe_ratio(
        collateral_usd,
        account.total_debt_usd,
        LIQUIDATION_THRESHOLD_BPS
    ));
}

#[test]
fn withdrawal_that_breaks_the_ratio_is_rejected() {
    let feed_id = [6u8; 32];
    let record = encode_price_record(feed_id, 200_000, 40, -2, NOW);
    let prices = price_table_from_feed(feed_id, &record, 0, 9, NOW);

    let mut account = fresh_account(NOW);
    account.credit(0, 100_000_000).unwrap();
    account.revalue(&prices).unwrap();
    account.set_debt(16_000);

    // withdrawing a tenth of the collateral would leave $180.00 backing
    // $160.00 of debt, past the 80% bound
    account.debit(0, 10_000_000).unwrap();
    let (collateral_usd, debt_usd) = account.revalue(&prices).unwrap();
    assert!(!is_within_safe_ratio(
        collateral_usd,
        debt_usd,
        LIQUIDATION_THRESHOLD_BPS
    ));

    // the handler reverts here; undo and confirm the position is sound again
    account.credit(0, 10_000_000).unwrap();
    let (collateral_usd, debt_usd) = account.revalue(&prices).unwrap();
    assert!(is_within_safe_ratio(
        collateral_usd,
        debt_usd,
        LIQUIDATION_THRESHOLD_BPS
    ));
}

#[test]
fn price_drop_makes_position_liquidatable_and_liquidation_clears_it() {
    let feed_id = [7u8; 32];
    let record = encode_price_record(feed_id, 200_000, 40, -2, NOW);
    let prices = price_table_from_feed(feed_id, &record, 0, 9, NOW);

    let mut account = fresh_account(NOW);
    account.credit(0, 100_000_000).unwrap();
    account.revalue(&prices).unwrap();
    account.set_debt(16_000); // borrow $160.00 at $2000.00

    // price halves to $1000.00
    let record = encode_price_record(feed_id, 100_000, 40, -2, NOW + 600);
    let prices = price_table_from_feed(feed_id, &record, 0, 9, NOW + 600);
    let (collateral_usd, debt_usd) = account.revalue(&prices).unwrap();
    assert_eq!(collateral_usd, 10_000); // $100.00
    assert!(!is_within_safe_ratio(
        collateral_usd,
        debt_usd,
        LIQUIDATION_THRESHOLD_BPS
    ));

    // liquidate: the whole collateral is worth less than debt plus bonus
    let seize_value = calculate_seize_value(debt_usd, collateral_usd).unwrap();
    assert_eq!(seize_value, 10_000);
    let seized = calculate_seized_amount(
        account.token_balances[0],
        seize_value,
        collateral_usd,
    )
    .unwrap();
    assert_eq!(seized, 100_000_000);

    account.debit(0, seized).unwrap();
    account.set_debt(0);
    let (collateral_usd, debt_usd) = account.revalue(&prices).unwrap();

    assert_eq!(debt_usd, 0);
    assert_eq!(collateral_usd, 0);
    assert!(!account.has_active_loan);
}

#[test]
fn partial_liquidation_leaves_a_proportional_remainder() {
    let feed_id = [8u8; 32];
    let record = encode_price_record(feed_id, 100_000, 40, -2, NOW);
    let prices = price_table_from_feed(feed_id, &record, 0, 9, NOW);

    // 1 token at $1000.00, debt $810.00: ratio 81% trips the 80% bound
    let mut account = fresh_account(NOW);
    account.credit(0, 1_000_000_000).unwrap();
    let (collateral_usd, _) = account.revalue(&prices).unwrap();
    assert_eq!(collateral_usd, 100_000);
    account.set_debt(81_000);

    assert!(!is_within_safe_ratio(
        collateral_usd,
        account.total_debt_usd,
        LIQUIDATION_THRESHOLD_BPS
    ));

    // seize debt plus the 6% bonus, leaving the rest with the borrower
    let seize_value = calculate_seize_value(account.total_debt_usd, collateral_usd).unwrap();
    assert_eq!(seize_value, 85_860); // $810.00 * 1.06
    let seized =
        calculate_seized_amount(account.token_balances[0], seize_value, collateral_usd).unwrap();
    assert_eq!(seized, 858_600_000);

    account.debit(0, seized).unwrap();
    account.set_debt(0);
    let (remaining, debt) = account.revalue(&prices).unwrap();
    assert_eq!(debt, 0);
    assert_eq!(remaining, 14_140); // $141.40 stays with the borrower
}

#[test]
fn interest_accrues_before_repayment_is_measured() {
    let mut account = fresh_account(NOW);
    account.set_debt(16_000);

    // a year later the 3% rate has added $4.80
    let later = NOW + SECONDS_PER_YEAR as i64;
    account.accrue_interest(later, INTEREST_RATE_BPS).unwrap();
    assert_eq!(account.total_debt_usd, 16_480);

    // paying a cent beyond the accrued debt is an over-repayment
    assert!(16_481 > account.total_debt_usd);
    account.set_debt(account.total_debt_usd - 16_480);
    assert_eq!(account.total_debt_usd, 0);
    assert!(!account.has_active_loan);
}

#[test]
fn stale_feed_aborts_the_operation_instead_of_pricing_at_zero() {
    let feed_id = [9u8; 32];
    let record = encode_price_record(
        feed_id,
        200_000,
        40,
        -2,
        NOW - PRICE_STALE_THRESHOLD_SECONDS as i64 - 1,
    );
    let err =
        oracle::read_price(&record, &feed_id, NOW, PRICE_STALE_THRESHOLD_SECONDS).unwrap_err();
    assert_eq!(err, LendingError::StalePrice.into());
}
