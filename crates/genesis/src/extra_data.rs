//! Clique `extraData` layout.
//!
//! ```text
//! | vanity (32 bytes) | signer 1 (20 bytes) | ... | signer k (20 bytes) | seal (65 bytes) |
//! ```
//!
//! In the genesis block the vanity and seal sections are all zeros and the signers appear in the
//! order the authority accounts were generated.

use crate::GenesisError;
use alloy_primitives::{Address, Bytes};

/// Length of the vanity prefix.
pub const EXTRA_VANITY: usize = 32;

/// Length of the seal suffix, a secp256k1 recoverable signature.
pub const EXTRA_SEAL: usize = 65;

/// Length of a single signer entry.
pub const SIGNER_LEN: usize = 20;

/// Signer list encoded into the genesis `extraData`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliqueExtraData {
    signers: Vec<Address>,
}

impl CliqueExtraData {
    /// Creates the extra data for the given signers, keeping their order.
    pub fn new(signers: Vec<Address>) -> Result<Self, GenesisError> {
        if signers.is_empty() {
            return Err(GenesisError::EmptySigners)
        }
        Ok(Self { signers })
    }

    /// The signers, in encoding order.
    pub fn signers(&self) -> &[Address] {
        &self.signers
    }

    /// Length of the encoded field: `32 + 20 * k + 65`.
    pub fn encoded_len(&self) -> usize {
        EXTRA_VANITY + SIGNER_LEN * self.signers.len() + EXTRA_SEAL
    }

    /// Assembles the raw field.
    pub fn encode(&self) -> Bytes {
        let len = self.encoded_len();
        let mut buf = Vec::with_capacity(len);
        buf.extend_from_slice(&[0u8; EXTRA_VANITY]);
        for signer in &self.signers {
            buf.extend_from_slice(signer.as_slice());
        }
        buf.extend_from_slice(&[0u8; EXTRA_SEAL]);
        assert_eq!(buf.len(), len, "clique extra data length mismatch");
        buf.into()
    }

    /// Parses the signer list back out of a raw field.
    pub fn decode(raw: &[u8]) -> Result<Self, GenesisError> {
        let invalid = || GenesisError::InvalidExtraDataLength(raw.len());
        let signers_len =
            raw.len().checked_sub(EXTRA_VANITY + EXTRA_SEAL).ok_or_else(invalid)?;
        if signers_len % SIGNER_LEN != 0 {
            return Err(invalid())
        }

        let signers = raw[EXTRA_VANITY..EXTRA_VANITY + signers_len]
            .chunks_exact(SIGNER_LEN)
            .map(Address::from_slice)
            .collect();
        Self::new(signers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn signers(count: u8) -> Vec<Address> {
        (1..=count).map(Address::repeat_byte).collect()
    }

    #[test]
    fn empty_signer_list_is_rejected() {
        assert_matches!(CliqueExtraData::new(Vec::new()), Err(GenesisError::EmptySigners));
    }

    #[test]
    fn layout_matches_signer_count() {
        for count in 1..=8u8 {
            let extra = CliqueExtraData::new(signers(count)).unwrap();
            let raw = extra.encode();

            assert_eq!(raw.len(), 32 + 20 * count as usize + 65);
            assert!(raw[..EXTRA_VANITY].iter().all(|b| *b == 0));
            assert!(raw[raw.len() - EXTRA_SEAL..].iter().all(|b| *b == 0));
            for (i, signer) in extra.signers().iter().enumerate() {
                let start = EXTRA_VANITY + SIGNER_LEN * i;
                assert_eq!(&raw[start..start + SIGNER_LEN], signer.as_slice());
            }
        }
    }

    #[test]
    fn keeps_generation_order() {
        let unsorted = vec![Address::repeat_byte(0xcc), Address::repeat_byte(0x01)];
        let raw = CliqueExtraData::new(unsorted.clone()).unwrap().encode();

        assert_eq!(raw[EXTRA_VANITY], 0xcc);
        assert_eq!(CliqueExtraData::decode(&raw).unwrap().signers(), unsorted.as_slice());
    }

    #[test]
    fn decode_rejects_bad_lengths() {
        assert_matches!(
            CliqueExtraData::decode(&[0u8; 96]),
            Err(GenesisError::InvalidExtraDataLength(96))
        );
        assert_matches!(
            CliqueExtraData::decode(&[0u8; 32 + 19 + 65]),
            Err(GenesisError::InvalidExtraDataLength(_))
        );
        assert_matches!(CliqueExtraData::decode(&[0u8; 97]), Err(GenesisError::EmptySigners));
    }
}
