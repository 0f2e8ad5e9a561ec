//! Clique proof-of-authority genesis construction.
//!
//! The [`GenesisBuilder`] turns a block period, the ordered list of authority addresses and the
//! list of prefunded addresses into a [`CliqueGenesis`] document that geth accepts for
//! `geth init`.
//!
//! # Example
//!
//! ```
//! use alloy_primitives::Address;
//! use cliquenet_genesis::GenesisBuilder;
//!
//! let signer = Address::repeat_byte(0x11);
//! let genesis = GenesisBuilder::new(5).signers([signer]).prefund([signer]).build().unwrap();
//!
//! assert_eq!(genesis.config.clique.period, 5);
//! assert_eq!(genesis.extra_data.len(), 32 + 20 + 65);
//! ```

#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

mod extra_data;
mod genesis;

pub use extra_data::{CliqueExtraData, EXTRA_SEAL, EXTRA_VANITY, SIGNER_LEN};
pub use genesis::{ChainConfig, CliqueConfig, CliqueGenesis, GenesisAccount};

use alloy_primitives::{Address, U256};
use cliquenet_primitives::constants::CLIQUE_EPOCH;
use std::collections::BTreeMap;
use tracing::debug;

/// One ether in wei.
const ETHER: u128 = 1_000_000_000_000_000_000;

/// Balance every prefunded account starts with: 1000 ether.
pub const PREFUND_BALANCE: u128 = 1_000 * ETHER;

/// Errors raised while building or (de)serializing a genesis.
#[derive(Debug, thiserror::Error)]
pub enum GenesisError {
    /// Clique cannot seal without signers.
    #[error("at least one authority address is required")]
    EmptySigners,
    /// Clique requires a non zero block period.
    #[error("block period must be greater than zero")]
    ZeroPeriod,
    /// The raw extra data does not follow the `32 + 20 * k + 65` layout.
    #[error("invalid clique extra data length {0}")]
    InvalidExtraDataLength(usize),
    /// Failed to serialize or parse the document.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Builds a [`CliqueGenesis`].
///
/// Signers keep the order in which they are added. Prefunded addresses may overlap with signers;
/// duplicates are funded once.
#[derive(Debug, Clone)]
pub struct GenesisBuilder {
    period: u64,
    signers: Vec<Address>,
    prefund: Vec<Address>,
}

impl GenesisBuilder {
    /// Creates a builder for a chain sealing a block every `period` seconds.
    pub const fn new(period: u64) -> Self {
        Self { period, signers: Vec::new(), prefund: Vec::new() }
    }

    /// Appends authority addresses.
    pub fn signers(mut self, signers: impl IntoIterator<Item = Address>) -> Self {
        self.signers.extend(signers);
        self
    }

    /// Appends addresses that receive [`PREFUND_BALANCE`].
    pub fn prefund(mut self, accounts: impl IntoIterator<Item = Address>) -> Self {
        self.prefund.extend(accounts);
        self
    }

    /// Assembles the genesis document.
    pub fn build(self) -> Result<CliqueGenesis, GenesisError> {
        if self.period == 0 {
            return Err(GenesisError::ZeroPeriod)
        }
        let extra_data = CliqueExtraData::new(self.signers)?;

        let balance = U256::from(PREFUND_BALANCE);
        let alloc: BTreeMap<_, _> =
            self.prefund.into_iter().map(|address| (address, GenesisAccount { balance })).collect();

        debug!(
            target: "cliquenet::genesis",
            period = self.period,
            signers = extra_data.signers().len(),
            prefunded = alloc.len(),
            "Building clique genesis"
        );

        Ok(CliqueGenesis {
            config: ChainConfig::new(CliqueConfig { period: self.period, epoch: CLIQUE_EPOCH }),
            extra_data: extra_data.encode(),
            alloc,
            ..CliqueGenesis::empty()
        })
    }
}

/// Builds the genesis of a clique network.
///
/// Shorthand for [`GenesisBuilder`] with the given period, signers and prefunded accounts.
pub fn clique_genesis(
    period: u64,
    authorities: &[Address],
    prefund: &[Address],
) -> Result<CliqueGenesis, GenesisError> {
    GenesisBuilder::new(period)
        .signers(authorities.iter().copied())
        .prefund(prefund.iter().copied())
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use cliquenet_primitives::constants::CHAIN_ID;

    fn authorities() -> Vec<Address> {
        vec![Address::repeat_byte(0xbb), Address::repeat_byte(0xaa)]
    }

    #[test]
    fn rejects_invalid_input() {
        assert_matches!(clique_genesis(0, &authorities(), &[]), Err(GenesisError::ZeroPeriod));
        assert_matches!(clique_genesis(5, &[], &[]), Err(GenesisError::EmptySigners));
    }

    #[test]
    fn two_authority_genesis() {
        let signers = authorities();
        let genesis = clique_genesis(5, &signers, &signers).unwrap();

        assert_eq!(genesis.config.chain_id, CHAIN_ID);
        assert_eq!(genesis.config.clique.period, 5);
        assert_eq!(genesis.config.clique.epoch, 30_000);
        assert_eq!(genesis.extra_data.len(), 137);
        assert_eq!(genesis.signers().unwrap(), signers);
        assert_eq!(genesis.alloc.len(), 2);
        for address in &signers {
            assert_eq!(genesis.alloc[address].balance, U256::from(PREFUND_BALANCE));
        }
    }

    #[test]
    fn overlapping_prefund_is_funded_once() {
        let signers = authorities();
        let extra = Address::repeat_byte(0x01);
        let genesis = GenesisBuilder::new(3)
            .signers(signers.clone())
            .prefund(signers.clone())
            .prefund([extra, signers[0]])
            .build()
            .unwrap();

        assert_eq!(genesis.alloc.len(), 3);
        assert!(genesis.alloc.contains_key(&extra));
    }

    #[test]
    fn prefund_balance_is_one_thousand_ether() {
        assert_eq!(U256::from(PREFUND_BALANCE), "0x3635c9adc5dea00000".parse::<U256>().unwrap());
    }

    #[test]
    fn serialization_is_deterministic() {
        let signers = authorities();
        let first = clique_genesis(5, &signers, &signers).unwrap().to_json().unwrap();
        let second = clique_genesis(5, &signers, &signers).unwrap().to_json().unwrap();
        assert_eq!(first, second);
    }
}
