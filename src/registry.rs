//! The on-disk registry of deployed contract addresses, and contract
//! deployment through it.
//!
//! The registry maps a network name to the contracts recorded on it, with at
//! most one address per (network, contract name) pair. Records are created on
//! first successful deployment, overwritten on redeployment, and never
//! deleted.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use ethers::{abi::Tokenize, contract::ContractFactory, providers::Middleware, types::Address};
use json::JsonValue;
use tokio::time::sleep;

use crate::{
    constants::NUM_DEPLOY_CONFIRMATIONS, errors::ScriptError, utils::load_artifact,
};

/// Parse the JSON file at the given path
fn get_json_from_file(file_path: &Path) -> Result<JsonValue, ScriptError> {
    let file_contents =
        fs::read_to_string(file_path).map_err(|e| ScriptError::ReadDeployments(e.to_string()))?;

    json::parse(&file_contents).map_err(|e| ScriptError::ReadDeployments(e.to_string()))
}

/// The persisted address book mapping network + contract name to the
/// deployed contract address
pub struct DeploymentsDb {
    /// Path of the deployments file
    path: PathBuf,
}

impl DeploymentsDb {
    /// Construct a handle to the deployments file at the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Look up the recorded address of the given contract on the given
    /// network.
    ///
    /// An absent file, network, or contract yields `None`.
    pub fn read(&self, network: &str, name: &str) -> Result<Option<Address>, ScriptError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let parsed_json = get_json_from_file(&self.path)?;
        match parsed_json[network][name].as_str() {
            Some(address) => address
                .parse::<Address>()
                .map(Some)
                .map_err(|e| ScriptError::ReadDeployments(e.to_string())),
            None => Ok(None),
        }
    }

    /// Record the address of the given contract on the given network,
    /// overwriting any existing record
    pub fn write(&self, network: &str, name: &str, address: Address) -> Result<(), ScriptError> {
        // If the file doesn't exist, create it
        if !self.path.exists() {
            fs::write(&self.path, "{}")
                .map_err(|e| ScriptError::WriteDeployments(e.to_string()))?;
        }
        let mut parsed_json = get_json_from_file(&self.path)?;

        parsed_json[network][name] = JsonValue::String(format!("{address:#x}"));

        fs::write(&self.path, json::stringify_pretty(parsed_json, 4))
            .map_err(|e| ScriptError::WriteDeployments(e.to_string()))?;

        Ok(())
    }
}

/// Deploys contracts on a target network, recording their addresses in the
/// deployments file and reusing recorded addresses unless redeployment is
/// forced
pub struct ContractDeployer<M> {
    /// The RPC client with which transactions are signed and sent
    client: Arc<M>,
    /// The registry of recorded deployments
    db: DeploymentsDb,
    /// The name of the target network, used as the registry key
    network: String,
    /// Directory containing compiled contract artifacts
    artifacts_dir: PathBuf,
    /// Milliseconds to wait before each deployment transaction
    delay_step: u64,
    /// Whether to deploy fresh contracts even when an address is recorded
    redeploy: bool,
}

impl<M: Middleware> ContractDeployer<M> {
    /// Construct a deployer for the given network
    pub fn new(
        client: Arc<M>,
        db: DeploymentsDb,
        network: impl Into<String>,
        artifacts_dir: impl Into<PathBuf>,
        delay_step: u64,
        redeploy: bool,
    ) -> Self {
        Self {
            client,
            db,
            network: network.into(),
            artifacts_dir: artifacts_dir.into(),
            delay_step,
            redeploy,
        }
    }

    /// The RPC client the deployer was constructed with
    pub fn client(&self) -> Arc<M> {
        self.client.clone()
    }

    /// The name of the target network
    pub fn network(&self) -> &str {
        &self.network
    }

    /// The registry of recorded deployments
    pub fn db(&self) -> &DeploymentsDb {
        &self.db
    }

    /// The recorded address of the given contract on the target network,
    /// erroring if no deployment is recorded
    pub fn address_of(&self, name: &str) -> Result<Address, ScriptError> {
        self.db.read(&self.network, name)?.ok_or_else(|| {
            ScriptError::ContractNotFound(format!(
                "{} has no recorded address on {}",
                name, self.network
            ))
        })
    }

    /// The recorded address to reuse for the given contract, if any.
    ///
    /// Always empty when redeployment is forced.
    fn reusable_address(&self, name: &str) -> Result<Option<Address>, ScriptError> {
        if self.redeploy {
            return Ok(None);
        }
        self.db.read(&self.network, name)
    }

    /// Deploy the given artifact and record its address under `name`,
    /// reusing the recorded address if one exists and redeployment is not
    /// forced
    pub async fn deploy_contract<T: Tokenize>(
        &self,
        name: &str,
        artifact: &str,
        constructor_args: T,
    ) -> Result<Address, ScriptError> {
        if let Some(address) = self.reusable_address(name)? {
            println!("Reusing {} at {:#x} on {}", name, address, self.network);
            return Ok(address);
        }

        self.deploy_now(name, artifact, constructor_args).await
    }

    /// Deploy the given artifact unconditionally, wait for the deployment to
    /// confirm, and record the deployed address under `name`
    pub async fn deploy_now<T: Tokenize>(
        &self,
        name: &str,
        artifact: &str,
        constructor_args: T,
    ) -> Result<Address, ScriptError> {
        println!("Deploy {} on {}...", name, self.network);
        sleep(Duration::from_millis(self.delay_step)).await;

        let (abi, bytecode) = load_artifact(&self.artifacts_dir, artifact)?;
        let factory = ContractFactory::new(abi, bytecode, self.client.clone());

        let contract = factory
            .deploy(constructor_args)
            .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?
            .confirmations(NUM_DEPLOY_CONFIRMATIONS)
            .send()
            .await
            .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?;

        let address = contract.address();
        self.db.write(&self.network, name, address)?;
        println!("Deploy success {}, address: {:#x}", name, address);

        Ok(address)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ethers::{
        providers::{Http, Provider},
        types::Address,
    };
    use tempfile::{tempdir, TempDir};

    use super::{ContractDeployer, DeploymentsDb};
    use crate::errors::ScriptError;

    /// A provider that is never contacted by the paths under test
    fn dummy_client() -> Arc<Provider<Http>> {
        Arc::new(Provider::<Http>::try_from("http://localhost:8545").unwrap())
    }

    /// A deployer over a fresh deployments file in the given directory
    fn deployer_in(dir: &TempDir, redeploy: bool) -> ContractDeployer<Provider<Http>> {
        let db = DeploymentsDb::new(dir.path().join("deployments.json"));
        ContractDeployer::new(
            dummy_client(),
            db,
            "ganache",
            dir.path(),
            0, // delay_step
            redeploy,
        )
    }

    #[test]
    fn write_then_read_returns_written_address() {
        let dir = tempdir().unwrap();
        let db = DeploymentsDb::new(dir.path().join("deployments.json"));
        let address = Address::repeat_byte(0x11);

        db.write("ganache", "Token", address).unwrap();
        assert_eq!(db.read("ganache", "Token").unwrap(), Some(address));
    }

    #[test]
    fn read_without_write_returns_none() {
        let dir = tempdir().unwrap();
        let db = DeploymentsDb::new(dir.path().join("deployments.json"));

        // Absent file
        assert_eq!(db.read("ganache", "Token").unwrap(), None);

        // Present file, absent network and absent contract
        db.write("ganache", "Token", Address::repeat_byte(0x11)).unwrap();
        assert_eq!(db.read("somnia", "Token").unwrap(), None);
        assert_eq!(db.read("ganache", "RewardVault").unwrap(), None);
    }

    #[test]
    fn write_overwrites_existing_record() {
        let dir = tempdir().unwrap();
        let db = DeploymentsDb::new(dir.path().join("deployments.json"));
        let old = Address::repeat_byte(0x11);
        let new = Address::repeat_byte(0x22);

        db.write("ganache", "Token", old).unwrap();
        db.write("ganache", "Token", new).unwrap();
        assert_eq!(db.read("ganache", "Token").unwrap(), Some(new));
    }

    #[test]
    fn records_are_scoped_by_network() {
        let dir = tempdir().unwrap();
        let db = DeploymentsDb::new(dir.path().join("deployments.json"));
        let ganache_addr = Address::repeat_byte(0x11);
        let somnia_addr = Address::repeat_byte(0x22);

        db.write("ganache", "Token", ganache_addr).unwrap();
        db.write("somnia", "Token", somnia_addr).unwrap();

        assert_eq!(db.read("ganache", "Token").unwrap(), Some(ganache_addr));
        assert_eq!(db.read("somnia", "Token").unwrap(), Some(somnia_addr));
    }

    #[test]
    fn address_of_missing_contract_errors() {
        let dir = tempdir().unwrap();
        let deployer = deployer_in(&dir, false /* redeploy */);

        let err = deployer.address_of("Token").unwrap_err();
        assert!(matches!(err, ScriptError::ContractNotFound(_)));
    }

    #[tokio::test]
    async fn recorded_address_is_reused_without_deploying() {
        let dir = tempdir().unwrap();
        let deployer = deployer_in(&dir, false /* redeploy */);
        let address = Address::repeat_byte(0x11);
        deployer.db().write("ganache", "Token", address).unwrap();

        // No artifact exists and the provider is unreachable, so anything but
        // the reuse path would error
        let deployed = deployer.deploy_contract("Token", "Token", ()).await.unwrap();
        assert_eq!(deployed, address);
    }

    #[tokio::test]
    async fn redeploy_flag_takes_the_deployment_path() {
        let dir = tempdir().unwrap();
        let deployer = deployer_in(&dir, true /* redeploy */);
        let address = Address::repeat_byte(0x11);
        deployer.db().write("ganache", "Token", address).unwrap();

        // The deployment path is entered despite the record, and fails on the
        // absent artifact before any address is rewritten
        let err = deployer.deploy_contract("Token", "Token", ()).await.unwrap_err();
        assert!(matches!(err, ScriptError::ArtifactParsing(_)));
        assert_eq!(deployer.db().read("ganache", "Token").unwrap(), Some(address));
    }

    #[tokio::test]
    async fn missing_record_takes_the_deployment_path() {
        let dir = tempdir().unwrap();
        let deployer = deployer_in(&dir, false /* redeploy */);

        let err = deployer.deploy_contract("Token", "Token", ()).await.unwrap_err();
        assert!(matches!(err, ScriptError::ArtifactParsing(_)));
    }
}
