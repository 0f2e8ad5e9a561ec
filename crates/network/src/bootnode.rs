use crate::BootnodeKeyError;
use alloy_primitives::{hex, B512};
use secp256k1::{PublicKey, SecretKey, SECP256K1};
use std::path::Path;
use tracing::debug;

/// Secret key of the discovery bootnode.
///
/// Stored hex encoded, the format `bootnode -genkey` writes and `bootnode -nodekey` reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootnodeKey {
    secret: SecretKey,
}

impl BootnodeKey {
    /// Generates a new random key.
    pub fn random() -> Self {
        Self { secret: SecretKey::new(&mut secp256k1::rand::thread_rng()) }
    }

    /// Reads the key stored at `path`.
    pub fn load(path: &Path) -> Result<Self, BootnodeKeyError> {
        let contents = cliquenet_fs_util::read_to_string(path)?;
        let secret = contents
            .trim()
            .parse::<SecretKey>()
            .map_err(|source| BootnodeKeyError::Decode { path: path.to_path_buf(), source })?;
        Ok(Self { secret })
    }

    /// Reads the key stored at `path`, or generates and stores a new one if there is none.
    pub fn load_or_generate(path: &Path) -> Result<Self, BootnodeKeyError> {
        if path.exists() {
            return Self::load(path)
        }
        let key = Self::random();
        cliquenet_fs_util::write_private(path, hex::encode(key.secret.secret_bytes()))?;
        debug!(target: "cliquenet::orchestrator", ?path, "Generated bootnode key");
        Ok(key)
    }

    /// The node id: the uncompressed public key without the `0x04` tag.
    pub fn public_id(&self) -> B512 {
        let public = PublicKey::from_secret_key(SECP256K1, &self.secret);
        B512::from_slice(&public.serialize_uncompressed()[1..])
    }

    /// The `enode://` URL other nodes use to reach the bootnode.
    pub fn enode(&self, host: &str, port: u16) -> String {
        format!("enode://{}@{host}:{port}", hex::encode(self.public_id()))
    }
}
