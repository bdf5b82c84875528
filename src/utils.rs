//! Utilities for the contract management scripts.

use std::{fs, path::Path, str::FromStr, sync::Arc};

use alloy_primitives::Address as AlloyAddress;
use alloy_sol_types::SolCall;
use ethers::{
    abi::Abi,
    middleware::SignerMiddleware,
    providers::{Http, Middleware, Provider},
    signers::{LocalWallet, Signer},
    types::{Address, Bytes, H256},
};
use serde::Deserialize;

use crate::{
    constants::{IMPLEMENTATION_STORAGE_SLOT, NUM_BYTES_ADDRESS, NUM_BYTES_STORAGE_SLOT},
    errors::ScriptError,
    solidity::initializeCall,
};

/// A compiled contract artifact as emitted by the Solidity toolchain,
/// reduced to the fields the scripts use
#[derive(Deserialize)]
pub struct ContractArtifact {
    /// The contract ABI
    pub abi: Abi,
    /// The deployment bytecode as a 0x-prefixed hex string
    pub bytecode: String,
}

/// Sets up the client with which to deploy and call contracts, reading in
/// the private key and RPC url supplied on the command line.
pub async fn setup_client(
    priv_key: &str,
    rpc_url: &str,
) -> Result<Arc<impl Middleware>, ScriptError> {
    let provider = Provider::<Http>::try_from(rpc_url)
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;

    let wallet = LocalWallet::from_str(priv_key)
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
    let chain_id = provider
        .get_chainid()
        .await
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?
        .as_u64();
    let client = Arc::new(SignerMiddleware::new(
        provider,
        wallet.with_chain_id(chain_id),
    ));

    Ok(client)
}

/// The address of the deployer wallet attached to the client
pub fn deployer_address(client: &Arc<impl Middleware>) -> Result<Address, ScriptError> {
    client
        .default_sender()
        .ok_or(ScriptError::ClientInitialization(
            "client does not have sender attached".to_string(),
        ))
}

/// Load the ABI and deployment bytecode of the named contract from the
/// artifacts directory
pub fn load_artifact(artifacts_dir: &Path, name: &str) -> Result<(Abi, Bytes), ScriptError> {
    let path = artifacts_dir.join(format!("{name}.json"));
    let file_contents = fs::read_to_string(&path)
        .map_err(|e| ScriptError::ArtifactParsing(format!("{}: {}", path.display(), e)))?;

    let artifact: ContractArtifact = serde_json::from_str(&file_contents)
        .map_err(|e| ScriptError::ArtifactParsing(e.to_string()))?;

    let bytecode = artifact
        .bytecode
        .strip_prefix("0x")
        .unwrap_or(&artifact.bytecode);
    let bytecode =
        hex::decode(bytecode).map_err(|e| ScriptError::ArtifactParsing(e.to_string()))?;

    Ok((artifact.abi, Bytes::from(bytecode)))
}

/// Read the implementation contract address of an upgradeable proxy from its
/// implementation storage slot.
///
/// This is specified in EIP1967: https://eips.ethereum.org/EIPS/eip-1967#logic-contract-address
pub async fn implementation_address(
    client: &Arc<impl Middleware>,
    proxy_address: Address,
) -> Result<Address, ScriptError> {
    Ok(Address::from_slice(
        &client
            .get_storage_at(
                proxy_address,
                // Can `unwrap` here since we know the storage slot constitutes a valid H256
                H256::from_str(IMPLEMENTATION_STORAGE_SLOT).unwrap(),
                None, /* block */
            )
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?
            [NUM_BYTES_STORAGE_SLOT - NUM_BYTES_ADDRESS..NUM_BYTES_STORAGE_SLOT],
    ))
}

/// Prepare calldata for the RewardVault contract's `initialize` method
pub fn reward_vault_initialize_calldata(admin_address: Address) -> Vec<u8> {
    let admin = AlloyAddress::from_slice(admin_address.as_bytes());
    initializeCall { admin }.abi_encode()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use alloy_sol_types::SolCall;
    use ethers::types::Address;
    use tempfile::tempdir;

    use super::{load_artifact, reward_vault_initialize_calldata};
    use crate::{errors::ScriptError, solidity::initializeCall};

    /// A minimal hardhat-style artifact
    const TOKEN_ARTIFACT: &str = r#"{
        "contractName": "Token",
        "abi": [{ "inputs": [], "stateMutability": "nonpayable", "type": "constructor" }],
        "bytecode": "0x6001600101"
    }"#;

    #[test]
    fn load_artifact_parses_abi_and_bytecode() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("Token.json"), TOKEN_ARTIFACT).unwrap();

        let (abi, bytecode) = load_artifact(dir.path(), "Token").unwrap();
        assert!(abi.constructor.is_some());
        assert_eq!(bytecode.to_vec(), vec![0x60, 0x01, 0x60, 0x01, 0x01]);
    }

    #[test]
    fn load_artifact_rejects_malformed_bytecode() {
        let dir = tempdir().unwrap();
        let artifact = TOKEN_ARTIFACT.replace("0x6001600101", "0xnot-hex");
        fs::write(dir.path().join("Token.json"), artifact).unwrap();

        let err = load_artifact(dir.path(), "Token").unwrap_err();
        assert!(matches!(err, ScriptError::ArtifactParsing(_)));
    }

    #[test]
    fn load_artifact_missing_file_errors() {
        let dir = tempdir().unwrap();
        let err = load_artifact(dir.path(), "Token").unwrap_err();
        assert!(matches!(err, ScriptError::ArtifactParsing(_)));
    }

    #[test]
    fn initialize_calldata_has_selector_and_argument() {
        let admin = Address::repeat_byte(0x42);
        let calldata = reward_vault_initialize_calldata(admin);

        // Selector of `initialize(address)` followed by one 32-byte word
        assert_eq!(calldata.len(), 36);
        assert_eq!(calldata[..4], initializeCall::SELECTOR);
        assert_eq!(calldata[..4], [0xc4, 0xd6, 0x6d, 0xe8]);
        assert_eq!(&calldata[16..36], admin.as_bytes());
    }
}
