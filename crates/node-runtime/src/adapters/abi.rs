//! # Contract ABI
//!
//! Just enough of the Solidity ABI for the health-record contract: function
//! selectors, dynamic `bytes` arguments, the `userHealthRecords` tuple and
//! the `MetricsSubmitted` event.
//!
//! ## Layout
//!
//! ```text
//! selector(4) | head: one 32-byte word per argument | tail: dynamic data
//! bytes arg head = offset of its tail, relative to the start of the head
//! bytes tail     = length word | data right-padded to a 32-byte multiple
//! ```

use hs_01_ciphertext_encoder::{CiphertextHex, EncryptedRecord};
use hs_04_analysis_orchestrator::StoredHealthRecord;
use primitive_types::U256;
use sha3::{Digest, Keccak256};
use shared_types::Address;
use thiserror::Error;

/// `submitHealthMetrics(bytes heart_rate, bytes blood_pressure, bytes oxygen_level, bytes risk_level)`
pub const SUBMIT_HEALTH_METRICS: &str = "submitHealthMetrics(bytes,bytes,bytes,bytes)";

/// `userHealthRecords(address, uint256)`
pub const USER_HEALTH_RECORDS: &str = "userHealthRecords(address,uint256)";

/// `MetricsSubmitted(address indexed user, bytes, bytes, bytes, bytes, uint256 recordIndex)`
pub const METRICS_SUBMITTED: &str = "MetricsSubmitted(address,bytes,bytes,bytes,bytes,uint256)";

const WORD: usize = 32;

/// ABI decoding errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AbiError {
    #[error("ABI data truncated: need {need} bytes, have {have}")]
    Truncated { need: usize, have: usize },
    #[error("ABI value out of range: {0}")]
    Overflow(&'static str),
}

/// Keccak-256 of `data`.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// First four bytes of the signature hash.
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// Event topic 0.
pub fn event_topic(signature: &str) -> [u8; 32] {
    keccak256(signature.as_bytes())
}

fn uint_word(value: U256) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    value.to_big_endian(&mut word);
    word
}

fn address_word(address: &Address) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    word[12..].copy_from_slice(address.as_bytes());
    word
}

fn padded_len(len: usize) -> usize {
    len.div_ceil(WORD) * WORD
}

/// Encode a sequence of `bytes` arguments (head and tail, no selector).
fn encode_bytes_args(args: &[&[u8]]) -> Vec<u8> {
    let head_len = args.len() * WORD;
    let mut head = Vec::with_capacity(head_len);
    let mut tail = Vec::new();
    for arg in args {
        head.extend_from_slice(&uint_word(U256::from(head_len + tail.len())));
        tail.extend_from_slice(&uint_word(U256::from(arg.len())));
        tail.extend_from_slice(arg);
        tail.resize(tail.len() + padded_len(arg.len()) - arg.len(), 0);
    }
    head.extend_from_slice(&tail);
    head
}

/// Calldata for `submitHealthMetrics`, ciphertext bytes in contract order.
pub fn encode_submit_health_metrics(record: &EncryptedRecord) -> Vec<u8> {
    let fields = record.fields();
    let args: Vec<&[u8]> = fields.iter().map(|c| c.as_bytes()).collect();
    let mut data = selector(SUBMIT_HEALTH_METRICS).to_vec();
    data.extend_from_slice(&encode_bytes_args(&args));
    data
}

/// Calldata for `userHealthRecords(account, index)`.
pub fn encode_user_health_records(account: &Address, index: u64) -> Vec<u8> {
    let mut data = selector(USER_HEALTH_RECORDS).to_vec();
    data.extend_from_slice(&address_word(account));
    data.extend_from_slice(&uint_word(U256::from(index)));
    data
}

fn word_at(data: &[u8], offset: usize) -> Result<&[u8], AbiError> {
    let end = offset
        .checked_add(WORD)
        .ok_or(AbiError::Overflow("word offset"))?;
    data.get(offset..end).ok_or(AbiError::Truncated {
        need: end,
        have: data.len(),
    })
}

fn usize_at(data: &[u8], offset: usize, what: &'static str) -> Result<usize, AbiError> {
    let value = U256::from_big_endian(word_at(data, offset)?);
    if value > U256::from(usize::MAX) {
        return Err(AbiError::Overflow(what));
    }
    Ok(value.as_usize())
}

/// `uint256` at word `index`, narrowed to `u64`.
pub fn decode_u64_word(data: &[u8], index: usize) -> Result<u64, AbiError> {
    let value = U256::from_big_endian(word_at(data, index * WORD)?);
    if value > U256::from(u64::MAX) {
        return Err(AbiError::Overflow("uint256 exceeds u64"));
    }
    Ok(value.as_u64())
}

/// `bytes` whose head sits at word `index`.
fn decode_bytes_arg(data: &[u8], index: usize) -> Result<Vec<u8>, AbiError> {
    let offset = usize_at(data, index * WORD, "bytes offset")?;
    let len = usize_at(data, offset, "bytes length")?;
    let start = offset + WORD;
    let end = start.checked_add(len).ok_or(AbiError::Overflow("bytes length"))?;
    data.get(start..end)
        .map(<[u8]>::to_vec)
        .ok_or(AbiError::Truncated {
            need: end,
            have: data.len(),
        })
}

fn decode_address_word(data: &[u8], index: usize) -> Result<Address, AbiError> {
    let word = word_at(data, index * WORD)?;
    let mut out = [0u8; 20];
    out.copy_from_slice(&word[12..]);
    Ok(Address(out))
}

/// Return data of `userHealthRecords`: `(bytes, bytes, bytes, bytes, address)`.
pub fn decode_user_health_record(data: &[u8]) -> Result<StoredHealthRecord, AbiError> {
    let field = |i| decode_bytes_arg(data, i).map(|b| CiphertextHex::from_bytes(&b));
    Ok(StoredHealthRecord {
        heart_rate: field(0)?,
        blood_pressure: field(1)?,
        oxygen_level: field(2)?,
        risk_level: field(3)?,
        user: decode_address_word(data, 4)?,
    })
}

/// `recordIndex` from `MetricsSubmitted` log data. `user` is indexed, so the
/// data holds four `bytes` heads followed by the index.
pub fn decode_metrics_submitted_index(data: &[u8]) -> Result<u64, AbiError> {
    decode_u64_word(data, 4)
}

/// Encode `(bytes, bytes, bytes, bytes, address)` as the contract returns it.
#[cfg(test)]
pub(crate) fn encode_record_tuple(record: &EncryptedRecord, user: &Address) -> Vec<u8> {
    let fields = record.fields();
    let head_len = 5 * WORD;
    let mut head = Vec::new();
    let mut tail = Vec::new();
    for c in fields {
        let bytes = c.as_bytes();
        head.extend_from_slice(&uint_word(U256::from(head_len + tail.len())));
        tail.extend_from_slice(&uint_word(U256::from(bytes.len())));
        tail.extend_from_slice(bytes);
        tail.resize(tail.len() + padded_len(bytes.len()) - bytes.len(), 0);
    }
    head.extend_from_slice(&address_word(user));
    head.extend_from_slice(&tail);
    head
}
