//! Persisted record layout
//!
//! ```text
//! ┌──────────┬────────────────┬──────────────────────┐
//! │ kind: u8 │ version: u8    │ bincode body         │
//! └──────────┴────────────────┴──────────────────────┘
//! ```
//!
//! Kind 1 is a proposal, kind 2 a vote receipt. Only layout version 1 exists.

use bincode::Options;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{Proposal, VoteReceipt};
use crate::error::{VotingError, VotingResult};

/// Current layout version.
pub const LAYOUT_VERSION: u8 = 1;

const HEADER_LEN: usize = 2;

/// Fixed-width little-endian body; the body must fill the record exactly.
fn body_options() -> impl Options {
    bincode::options()
        .with_fixint_encoding()
        .reject_trailing_bytes()
}

/// Record discriminator stored in the first byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum RecordKind {
    Proposal = 1,
    VoteReceipt = 2,
}

impl RecordKind {
    fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            1 => Some(Self::Proposal),
            2 => Some(Self::VoteReceipt),
            _ => None,
        }
    }
}

/// A type persisted under a [`RecordKind`] tag.
pub trait Record: Serialize + DeserializeOwned {
    const KIND: RecordKind;
}

impl Record for Proposal {
    const KIND: RecordKind = RecordKind::Proposal;
}

impl Record for VoteReceipt {
    const KIND: RecordKind = RecordKind::VoteReceipt;
}

/// Encode a record with its header.
pub fn encode<R: Record>(record: &R) -> VotingResult<Vec<u8>> {
    let body = body_options().serialize(record)?;
    let mut bytes = Vec::with_capacity(HEADER_LEN + body.len());
    bytes.push(R::KIND as u8);
    bytes.push(LAYOUT_VERSION);
    bytes.extend_from_slice(&body);
    Ok(bytes)
}

/// Decode a record, checking kind and version first.
pub fn decode<R: Record>(bytes: &[u8]) -> VotingResult<R> {
    let [kind, version, body @ ..] = bytes else {
        return Err(codec_error(format!("record truncated to {} bytes", bytes.len())));
    };

    match RecordKind::from_byte(*kind) {
        Some(found) if found == R::KIND => {}
        Some(found) => {
            return Err(codec_error(format!(
                "expected {:?} record, found {:?}",
                R::KIND,
                found
            )))
        }
        None => return Err(codec_error(format!("unknown record kind {kind}"))),
    }

    if *version != LAYOUT_VERSION {
        return Err(codec_error(format!("unsupported layout version {version}")));
    }

    Ok(body_options().deserialize(body)?)
}

fn codec_error(reason: String) -> VotingError {
    VotingError::Codec { reason }
}
