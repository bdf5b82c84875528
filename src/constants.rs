//! Constants used in the contract management scripts

/// The default path of the deployments file
pub const DEFAULT_DEPLOYMENTS_PATH: &str = "deployments.json";

/// The default directory containing compiled contract artifacts
pub const DEFAULT_ARTIFACTS_DIR: &str = "artifacts";

/// The default number of milliseconds to wait before each deployment
/// transaction
pub const DEFAULT_DELAY_STEP_MS: u64 = 1000;

/// The number of confirmations to wait for the contract deployment transaction
pub const NUM_DEPLOY_CONFIRMATIONS: usize = 1;

/// The storage slot containing the implementation contract address in the
/// upgradeable proxy.
///
/// This is specified in EIP1967: https://eips.ethereum.org/EIPS/eip-1967#logic-contract-address
pub const IMPLEMENTATION_STORAGE_SLOT: &str =
    "0x360894a13ba1a3210667c828492db98dca3e2076cc3735a920a3ca505d382bbc";

/// The number of bytes stored in a single storage slot
pub const NUM_BYTES_STORAGE_SLOT: usize = 32;

/// The number of bytes in an Ethereum address
pub const NUM_BYTES_ADDRESS: usize = 20;

/// The name of the environment variable holding the deployer's private key
pub const PRIVATE_KEY_ENV_VAR: &str = "PRIVATE_KEY";

/// The name of the environment variable holding the network RPC URL
pub const RPC_URL_ENV_VAR: &str = "RPC_URL";

/// The name of the environment variable holding the OrderNFT contract address
pub const ORDER_NFT_ADDRESS_ENV_VAR: &str = "ORDER_NFT_ADDRESS";

/// The name of the environment variable holding the RewardVault proxy address
pub const REWARD_VAULT_ADDRESS_ENV_VAR: &str = "REWARD_VAULT_ADDRESS";

/// The name of the environment variable holding the ClaimReward contract address
pub const CLAIM_REWARD_ADDRESS_ENV_VAR: &str = "CLAIM_REWARD_ADDRESS";

/// The name of the environment variable holding the reward token address
pub const TOKEN_ADDRESS_ENV_VAR: &str = "TOKEN_ADDRESS";

/// The OrderNFT contract key in the deployments file
pub const ORDER_NFT_CONTRACT_KEY: &str = "OrderNFT";

/// The RewardVault proxy contract key in the deployments file
pub const REWARD_VAULT_CONTRACT_KEY: &str = "RewardVault";

/// The RewardVault implementation contract key in the deployments file
pub const REWARD_VAULT_IMPL_CONTRACT_KEY: &str = "RewardVaultImpl";

/// The ClaimReward contract key in the deployments file
pub const CLAIM_REWARD_CONTRACT_KEY: &str = "ClaimReward";

/// The RewardManager contract key in the deployments file
pub const REWARD_MANAGER_CONTRACT_KEY: &str = "RewardManager";

/// The Vault contract key in the deployments file
pub const VAULT_CONTRACT_KEY: &str = "Vault";

/// The test ERC20 token contract key in the deployments file
pub const TOKEN_CONTRACT_KEY: &str = "Token";

/// The name of the ERC1967 proxy artifact, with which the RewardVault proxy
/// is deployed
pub const ERC1967_PROXY_ARTIFACT: &str = "ERC1967Proxy";

/// The name of the upgraded RewardVault implementation artifact
pub const REWARD_VAULT_V1_ARTIFACT: &str = "RewardVaultV1";

/// The default name of the order NFT collection
pub const DEFAULT_ORDER_NFT_NAME: &str = "DPay Order NFT";

/// The default symbol of the order NFT collection
pub const DEFAULT_ORDER_NFT_SYMBOL: &str = "DPAY-ORDER";

/// The default name of the test ERC20 token
pub const DEFAULT_TOKEN_NAME: &str = "USD Test token";

/// The default symbol of the test ERC20 token
pub const DEFAULT_TOKEN_SYMBOL: &str = "USDT";

/// The default initial supply of the test ERC20 token, in whole tokens
pub const DEFAULT_TOKEN_SUPPLY: &str = "1000000000";

/// The default amount of tokens moved by the transfer-funds command, in
/// whole tokens
pub const DEFAULT_TRANSFER_AMOUNT: &str = "10";
