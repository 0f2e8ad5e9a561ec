use crate::{CliqueExtraData, GenesisError};
use alloy_primitives::{Address, Bytes, B256, U256, U64};
use cliquenet_primitives::constants::CHAIN_ID;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Genesis timestamp, fixed so that the genesis hash is reproducible.
const GENESIS_TIMESTAMP: u64 = 0x5d29_8ced;

/// Genesis block gas limit.
const GENESIS_GAS_LIMIT: u64 = 0x47_b760;

/// A geth genesis document for a clique network.
///
/// Field order is the serialization order and `alloc` is sorted by address, so the JSON output is
/// stable for a given input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CliqueGenesis {
    /// Chain configuration.
    pub config: ChainConfig,
    /// Block nonce.
    pub nonce: U64,
    /// Block timestamp.
    pub timestamp: U64,
    /// Vanity, signer list and seal.
    pub extra_data: Bytes,
    /// Block gas limit.
    pub gas_limit: U64,
    /// Block difficulty.
    pub difficulty: U256,
    /// Mix hash.
    pub mix_hash: B256,
    /// Beneficiary.
    pub coinbase: Address,
    /// Initial balances.
    pub alloc: BTreeMap<Address, GenesisAccount>,
    /// Block number.
    pub number: U64,
    /// Gas used.
    pub gas_used: U64,
    /// Parent hash.
    pub parent_hash: B256,
}

impl CliqueGenesis {
    /// Genesis without signers or balances.
    pub(crate) fn empty() -> Self {
        Self {
            config: ChainConfig::new(CliqueConfig::default()),
            nonce: U64::ZERO,
            timestamp: U64::from(GENESIS_TIMESTAMP),
            extra_data: Bytes::new(),
            gas_limit: U64::from(GENESIS_GAS_LIMIT),
            difficulty: U256::from(1),
            mix_hash: B256::ZERO,
            coinbase: Address::ZERO,
            alloc: BTreeMap::new(),
            number: U64::ZERO,
            gas_used: U64::ZERO,
            parent_hash: B256::ZERO,
        }
    }

    /// Decodes the signer list from the extra data.
    pub fn signers(&self) -> Result<Vec<Address>, GenesisError> {
        Ok(CliqueExtraData::decode(&self.extra_data)?.signers().to_vec())
    }

    /// Pretty printed JSON, as written to `genesis.json`.
    pub fn to_json(&self) -> Result<String, GenesisError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses a genesis from JSON.
    pub fn from_json(json: &str) -> Result<Self, GenesisError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// The `config` section of the genesis.
///
/// All forks up to petersburg are active from block 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainConfig {
    /// Chain id.
    pub chain_id: u64,
    /// Homestead activation block.
    pub homestead_block: u64,
    /// EIP-150 activation block.
    pub eip150_block: u64,
    /// EIP-150 fork hash.
    pub eip150_hash: B256,
    /// EIP-155 activation block.
    pub eip155_block: u64,
    /// EIP-158 activation block.
    pub eip158_block: u64,
    /// Byzantium activation block.
    pub byzantium_block: u64,
    /// Constantinople activation block.
    pub constantinople_block: u64,
    /// Petersburg activation block.
    pub petersburg_block: u64,
    /// Clique consensus parameters.
    pub clique: CliqueConfig,
}

impl ChainConfig {
    pub(crate) const fn new(clique: CliqueConfig) -> Self {
        Self {
            chain_id: CHAIN_ID,
            homestead_block: 0,
            eip150_block: 0,
            eip150_hash: B256::ZERO,
            eip155_block: 0,
            eip158_block: 0,
            byzantium_block: 0,
            constantinople_block: 0,
            petersburg_block: 0,
            clique,
        }
    }
}

/// Clique consensus parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliqueConfig {
    /// Seconds between blocks.
    pub period: u64,
    /// Blocks between checkpoints.
    pub epoch: u64,
}

/// A prefunded account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisAccount {
    /// Balance in wei.
    pub balance: U256,
}
