use anchor_lang::prelude::*;

use crate::constants::*;
use crate::errors::LendingError;

/// Decoded view of an oracle price record.
///
/// The on-chain record is an attested blob published by the oracle network.
/// Only the fields the lending math needs are surfaced; the attestation
/// signature, integrity root, and proof blob are length-checked but not
/// interpreted here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceRecord {
    pub feed_id: [u8; 32],
    pub price: i64,
    pub conf: u64,
    pub expo: i32,
    pub publish_time: i64,
    pub prev_publish_time: i64,
}

// Fixed record layout:
//   0..2    write flag (u16)
//   2..9    padding
//   9..13   magic (u32)
//   13..17  version (u32)
//   17..21  account type (u32)
//   21..25  padding
//   25..57  feed id
//   57..65  price mantissa (i64)
//   65..73  confidence (u64)
//   73..77  decimal exponent (i32)
//   77..81  padding
//   81..89  publish time (i64)
//   89..97  previous publish time (i64)
//   97..161 attestation signature
//   161..193 integrity root
//   193..197 proof length (u32), followed by the proof blob
const MAGIC_OFFSET: usize = 9;
const VERSION_OFFSET: usize = 13;
const ACCOUNT_TYPE_OFFSET: usize = 17;
const FEED_ID_OFFSET: usize = 25;
const PRICE_OFFSET: usize = 57;
const CONF_OFFSET: usize = 65;
const EXPO_OFFSET: usize = 73;
const PUBLISH_TIME_OFFSET: usize = 81;
const PREV_PUBLISH_TIME_OFFSET: usize = 89;
const PROOF_LEN_OFFSET: usize = 193;

fn read_u32(data: &[u8], offset: usize) -> Result<u32> {
    let bytes = data
        .get(offset..offset + 4)
        .ok_or(error!(LendingError::InvalidOracleFormat))?;
    Ok(u32::from_le_bytes(
        bytes
            .try_into()
            .map_err(|_| error!(LendingError::InvalidOracleFormat))?,
    ))
}

fn read_u64(data: &[u8], offset: usize) -> Result<u64> {
    let bytes = data
        .get(offset..offset + 8)
        .ok_or(error!(LendingError::InvalidOracleFormat))?;
    Ok(u64::from_le_bytes(
        bytes
            .try_into()
            .map_err(|_| error!(LendingError::InvalidOracleFormat))?,
    ))
}

/// Parse and validate a raw price record.
///
/// Any deviation from the expected layout (short buffer, wrong magic,
/// wrong version, wrong account type, proof blob shorter than its length
/// prefix) is a format error, never a silent default.
pub fn load_price_record(data: &[u8]) -> Result<PriceRecord> {
    require!(
        data.len() >= PRICE_RECORD_FIXED_LEN,
        LendingError::InvalidOracleFormat
    );

    let magic = read_u32(data, MAGIC_OFFSET)?;
    require!(magic == PRICE_RECORD_MAGIC, LendingError::InvalidOracleFormat);

    let version = read_u32(data, VERSION_OFFSET)?;
    require!(
        version == PRICE_RECORD_VERSION,
        LendingError::InvalidOracleFormat
    );

    let account_type = read_u32(data, ACCOUNT_TYPE_OFFSET)?;
    require!(
        account_type == PRICE_ACCOUNT_TYPE,
        LendingError::InvalidOracleFormat
    );

    let proof_len = read_u32(data, PROOF_LEN_OFFSET)? as usize;
    require!(
        data.len() >= PRICE_RECORD_FIXED_LEN + proof_len,
        LendingError::InvalidOracleFormat
    );

    let mut feed_id = [0u8; 32];
    feed_id.copy_from_slice(&data[FEED_ID_OFFSET..FEED_ID_OFFSET + 32]);

    Ok(PriceRecord {
        feed_id,
        price: read_u64(data, PRICE_OFFSET)? as i64,
        conf: read_u64(data, CONF_OFFSET)?,
        expo: read_u32(data, EXPO_OFFSET)? as i32,
        publish_time: read_u64(data, PUBLISH_TIME_OFFSET)? as i64,
        prev_publish_time: read_u64(data, PREV_PUBLISH_TIME_OFFSET)? as i64,
    })
}

/// Read a validated, fresh price from a raw record.
///
/// Returns `(price_cents, conf_cents)`. The price is floored into integer
/// USD cents; the confidence is rounded up so a coarse feed never looks
/// tighter than it is. Confidence policy is left to the caller.
pub fn read_price(
    data: &[u8],
    feed_id: &[u8; 32],
    now: i64,
    max_age_seconds: u64,
) -> Result<(u64, u64)> {
    let record = load_price_record(data)?;

    require!(&record.feed_id == feed_id, LendingError::FeedMismatch);
    require!(
        record.expo.unsigned_abs() <= MAX_PRICE_EXPONENT as u32,
        LendingError::InvalidOracleFormat
    );
    require!(record.price > 0, LendingError::InvalidOracleFormat);

    require!(
        record.publish_time <= now.saturating_add(PUBLISH_TIME_TOLERANCE_SECONDS),
        LendingError::StalePrice
    );
    let age = now.saturating_sub(record.publish_time);
    require!(age <= max_age_seconds as i64, LendingError::StalePrice);

    let price_cents = scale_to_cents(record.price as u64, record.expo, false)?;
    let conf_cents = scale_to_cents(record.conf, record.expo, true)?;
    require!(price_cents > 0, LendingError::InvalidOracleFormat);

    Ok((price_cents, conf_cents))
}

/// Scale `value * 10^expo` USD into integer cents.
fn scale_to_cents(value: u64, expo: i32, round_up: bool) -> Result<u64> {
    let shifted = expo + 2;
    let value = value as u128;
    let cents = if shifted >= 0 {
        let factor = 10u128
            .checked_pow(shifted as u32)
            .ok_or(error!(LendingError::MathOverflow))?;
        value
            .checked_mul(factor)
            .ok_or(error!(LendingError::MathOverflow))?
    } else {
        let factor = 10u128.pow(shifted.unsigned_abs());
        if round_up {
            value.div_ceil(factor)
        } else {
            value / factor
        }
    };
    u64::try_from(cents).map_err(|_| error!(LendingError::MathOverflow))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: [u8; 32] = [7u8; 32];
    const NOW: i64 = 1_700_000_000;
    const MAX_AGE: u64 = 10_800;

    fn make_record(feed_id: [u8; 32], price: i64, conf: u64, expo: i32, publish_time: i64) -> Vec<u8> {
        let proof = [0xABu8; 16];
        let mut data = vec![0u8; PRICE_RECORD_FIXED_LEN];
        data[0..2].copy_from_slice(&1u16.to_le_bytes());
        data[MAGIC_OFFSET..MAGIC_OFFSET + 4].copy_from_slice(&PRICE_RECORD_MAGIC.to_le_bytes());
        data[VERSION_OFFSET..VERSION_OFFSET + 4]
            .copy_from_slice(&PRICE_RECORD_VERSION.to_le_bytes());
        data[ACCOUNT_TYPE_OFFSET..ACCOUNT_TYPE_OFFSET + 4]
            .copy_from_slice(&PRICE_ACCOUNT_TYPE.to_le_bytes());
        data[FEED_ID_OFFSET..FEED_ID_OFFSET + 32].copy_from_slice(&feed_id);
        data[PRICE_OFFSET..PRICE_OFFSET + 8].copy_from_slice(&price.to_le_bytes());
        data[CONF_OFFSET..CONF_OFFSET + 8].copy_from_slice(&conf.to_le_bytes());
        data[EXPO_OFFSET..EXPO_OFFSET + 4].copy_from_slice(&expo.to_le_bytes());
        data[PUBLISH_TIME_OFFSET..PUBLISH_TIME_OFFSET + 8]
            .copy_from_slice(&publish_time.to_le_bytes());
        data[PREV_PUBLISH_TIME_OFFSET..PREV_PUBLISH_TIME_OFFSET + 8]
            .copy_from_slice(&(publish_time - 1).to_le_bytes());
        data[PROOF_LEN_OFFSET..PROOF_LEN_OFFSET + 4]
            .copy_from_slice(&(proof.len() as u32).to_le_bytes());
        data.extend_from_slice(&proof);
        data
    }

    #[test]
    fn decodes_and_normalizes_to_cents() {
        // $2000.00 expressed as 200000 * 10^-2
        let data = make_record(FEED, 200_000, 50, -2, NOW - 30);
        let (price, conf) = read_price(&data, &FEED, NOW, MAX_AGE).unwrap();
        assert_eq!(price, 200_000); // cents
        assert_eq!(conf, 50);
    }

    #[test]
    fn floors_price_and_rounds_conf_up() {
        // $123.456789 as 123456789 * 10^-6
        let data = make_record(FEED, 123_456_789, 1, -6, NOW);
        let (price, conf) = read_price(&data, &FEED, NOW, MAX_AGE).unwrap();
        assert_eq!(price, 12_345);
        assert_eq!(conf, 1); // ceil(1 / 10^4)
    }

    #[test]
    fn positive_exponent_scales_up() {
        let data = make_record(FEED, 3, 0, 1, NOW);
        let (price, _) = read_price(&data, &FEED, NOW, MAX_AGE).unwrap();
        assert_eq!(price, 3_000); // $30 in cents
    }

    #[test]
    fn rejects_wrong_magic() {
        let mut data = make_record(FEED, 200_000, 50, -2, NOW);
        data[MAGIC_OFFSET] ^= 0xFF;
        assert_eq!(
            read_price(&data, &FEED, NOW, MAX_AGE).unwrap_err(),
            LendingError::InvalidOracleFormat.into()
        );
    }

    #[test]
    fn rejects_wrong_version() {
        let mut data = make_record(FEED, 200_000, 50, -2, NOW);
        data[VERSION_OFFSET..VERSION_OFFSET + 4]
            .copy_from_slice(&(PRICE_RECORD_VERSION + 1).to_le_bytes());
        assert_eq!(
            read_price(&data, &FEED, NOW, MAX_AGE).unwrap_err(),
            LendingError::InvalidOracleFormat.into()
        );
    }

    #[test]
    fn rejects_wrong_account_type() {
        let mut data = make_record(FEED, 200_000, 50, -2, NOW);
        data[ACCOUNT_TYPE_OFFSET..ACCOUNT_TYPE_OFFSET + 4].copy_from_slice(&1u32.to_le_bytes());
        assert_eq!(
            read_price(&data, &FEED, NOW, MAX_AGE).unwrap_err(),
            LendingError::InvalidOracleFormat.into()
        );
    }

    #[test]
    fn rejects_truncated_record() {
        let data = make_record(FEED, 200_000, 50, -2, NOW);
        assert_eq!(
            load_price_record(&data[..PRICE_RECORD_FIXED_LEN - 10]).unwrap_err(),
            LendingError::InvalidOracleFormat.into()
        );
    }

    #[test]
    fn rejects_proof_shorter_than_its_length_prefix() {
        let mut data = make_record(FEED, 200_000, 50, -2, NOW);
        data[PROOF_LEN_OFFSET..PROOF_LEN_OFFSET + 4].copy_from_slice(&1024u32.to_le_bytes());
        assert_eq!(
            load_price_record(&data).unwrap_err(),
            LendingError::InvalidOracleFormat.into()
        );
    }

    #[test]
    fn rejects_feed_mismatch() {
        let data = make_record([9u8; 32], 200_000, 50, -2, NOW);
        assert_eq!(
            read_price(&data, &FEED, NOW, MAX_AGE).unwrap_err(),
            LendingError::FeedMismatch.into()
        );
    }

    #[test]
    fn rejects_stale_price() {
        let data = make_record(FEED, 200_000, 50, -2, NOW - MAX_AGE as i64 - 1);
        assert_eq!(
            read_price(&data, &FEED, NOW, MAX_AGE).unwrap_err(),
            LendingError::StalePrice.into()
        );
    }

    #[test]
    fn accepts_price_at_staleness_boundary() {
        let data = make_record(FEED, 200_000, 50, -2, NOW - MAX_AGE as i64);
        assert!(read_price(&data, &FEED, NOW, MAX_AGE).is_ok());
    }

    #[test]
    fn rejects_publish_time_too_far_in_future() {
        let data = make_record(FEED, 200_000, 50, -2, NOW + PUBLISH_TIME_TOLERANCE_SECONDS + 1);
        assert_eq!(
            read_price(&data, &FEED, NOW, MAX_AGE).unwrap_err(),
            LendingError::StalePrice.into()
        );
        // small skew is tolerated
        let data = make_record(FEED, 200_000, 50, -2, NOW + PUBLISH_TIME_TOLERANCE_SECONDS);
        assert!(read_price(&data, &FEED, NOW, MAX_AGE).is_ok());
    }

    #[test]
    fn rejects_non_positive_price() {
        let data = make_record(FEED, 0, 50, -2, NOW);
        assert_eq!(
            read_price(&data, &FEED, NOW, MAX_AGE).unwrap_err(),
            LendingError::InvalidOracleFormat.into()
        );
        let data = make_record(FEED, -5, 50, -2, NOW);
        assert_eq!(
            read_price(&data, &FEED, NOW, MAX_AGE).unwrap_err(),
            LendingError::InvalidOracleFormat.into()
        );
    }

    #[test]
    fn rejects_absurd_exponent() {
        let data = make_record(FEED, 200_000, 50, -13, NOW);
        assert_eq!(
            read_price(&data, &FEED, NOW, MAX_AGE).unwrap_err(),
            LendingError::InvalidOracleFormat.into()
        );
    }
}
