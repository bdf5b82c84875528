//! Definitions of CLI arguments and commands for the contract management
//! scripts

use clap::{Args, Parser, Subcommand};
use ethers::providers::Middleware;

use crate::{
    commands::{
        deploy_all, deploy_reward_manager, deploy_reward_vault, deploy_token, deploy_vault,
        get_points, status, transfer_funds, upgrade, verify,
    },
    constants::{
        CLAIM_REWARD_ADDRESS_ENV_VAR, DEFAULT_ARTIFACTS_DIR, DEFAULT_DELAY_STEP_MS,
        DEFAULT_DEPLOYMENTS_PATH, DEFAULT_ORDER_NFT_NAME, DEFAULT_ORDER_NFT_SYMBOL,
        DEFAULT_TOKEN_NAME, DEFAULT_TOKEN_SUPPLY, DEFAULT_TOKEN_SYMBOL, DEFAULT_TRANSFER_AMOUNT,
        ORDER_NFT_ADDRESS_ENV_VAR, PRIVATE_KEY_ENV_VAR, REWARD_VAULT_ADDRESS_ENV_VAR,
        REWARD_VAULT_V1_ARTIFACT, RPC_URL_ENV_VAR, TOKEN_ADDRESS_ENV_VAR,
    },
    errors::ScriptError,
    registry::ContractDeployer,
};

/// Manage deployments of, and interactions with, the DPay contracts
#[derive(Parser)]
pub struct Cli {
    /// Private key of the deployer
    // TODO: Better key management
    #[arg(short, long, env = PRIVATE_KEY_ENV_VAR, hide_env_values = true)]
    pub priv_key: String,

    /// Network RPC URL
    #[arg(short, long, env = RPC_URL_ENV_VAR)]
    pub rpc_url: String,

    /// Name of the target network, used as the top-level key in the
    /// deployments file
    #[arg(short, long)]
    pub network: String,

    /// Path of the deployments file
    #[arg(short, long, default_value = DEFAULT_DEPLOYMENTS_PATH)]
    pub deployments_path: String,

    /// Directory containing compiled contract artifacts
    #[arg(short, long, default_value = DEFAULT_ARTIFACTS_DIR)]
    pub artifacts_path: String,

    /// Milliseconds to wait before each deployment transaction
    #[arg(long, default_value_t = DEFAULT_DELAY_STEP_MS)]
    pub delay_step: u64,

    /// Deploy fresh contracts even when an address is already recorded for
    /// the target network
    #[arg(long)]
    pub redeploy: bool,

    /// The script to run
    #[command(subcommand)]
    pub command: Command,
}

/// The contract management scripts
#[derive(Subcommand)]
pub enum Command {
    /// Deploy the full DPay contract suite and wire up its roles
    DeployAll(DeployAllArgs),
    /// Deploy the test ERC20 token
    DeployToken(DeployTokenArgs),
    /// Deploy the RewardVault implementation and its upgradeable proxy
    DeployRewardVault(DeployRewardVaultArgs),
    /// Deploy the RewardManager and grant it the vault's CLAIMER_ROLE
    DeployRewardManager,
    /// Deploy the Vault and grant it the manager's POINTS_MANAGER_ROLE
    DeployVault,
    /// Upgrade the RewardVault proxy to a new implementation
    Upgrade(UpgradeArgs),
    /// Approve and transfer tokens into the Vault
    TransferFunds(TransferFundsArgs),
    /// Print a user's reward points
    GetPoints(GetPointsArgs),
    /// Print a user's claim state and the vault's token balance
    Status(StatusArgs),
    /// Check the role wiring of a deployment
    Verify(VerifyArgs),
}

impl Command {
    /// Run the command against the given deployer
    pub async fn run(
        self,
        deployer: &ContractDeployer<impl Middleware>,
    ) -> Result<(), ScriptError> {
        match self {
            Command::DeployAll(args) => deploy_all(args, deployer).await,
            Command::DeployToken(args) => deploy_token(args, deployer).await,
            Command::DeployRewardVault(args) => deploy_reward_vault(args, deployer).await,
            Command::DeployRewardManager => deploy_reward_manager(deployer).await,
            Command::DeployVault => deploy_vault(deployer).await,
            Command::Upgrade(args) => upgrade(args, deployer).await,
            Command::TransferFunds(args) => transfer_funds(args, deployer).await,
            Command::GetPoints(args) => get_points(args, deployer).await,
            Command::Status(args) => status(args, deployer).await,
            Command::Verify(args) => verify(args, deployer).await,
        }
    }
}

/// Deploy the OrderNFT, the RewardVault behind its proxy, and the
/// ClaimReward distributor, then grant the roles each needs.
///
/// Mirrors a first-time deployment to a fresh network; contracts already
/// recorded for the network are reused unless `--redeploy` is set.
#[derive(Args)]
pub struct DeployAllArgs {
    /// Name of the order NFT collection
    #[arg(long, default_value = DEFAULT_ORDER_NFT_NAME)]
    pub nft_name: String,

    /// Symbol of the order NFT collection
    #[arg(long, default_value = DEFAULT_ORDER_NFT_SYMBOL)]
    pub nft_symbol: String,

    /// Address of the admin for all contracts, in hex, defaulting to the
    /// deployer
    #[arg(long)]
    pub admin: Option<String>,
}

/// Deploy the test ERC20 token used to fund the vault
#[derive(Args)]
pub struct DeployTokenArgs {
    /// Name of the token
    #[arg(long, default_value = DEFAULT_TOKEN_NAME)]
    pub name: String,

    /// Symbol of the token
    #[arg(long, default_value = DEFAULT_TOKEN_SYMBOL)]
    pub symbol: String,

    /// Initial supply of the token, in whole tokens
    #[arg(long, default_value = DEFAULT_TOKEN_SUPPLY)]
    pub supply: String,
}

/// Deploy the RewardVault implementation contract and an ERC1967 proxy
/// initialized against it.
///
/// The proxy address is recorded as the canonical RewardVault address.
#[derive(Args)]
pub struct DeployRewardVaultArgs {
    /// Address of the vault admin, in hex, defaulting to the deployer
    #[arg(long)]
    pub admin: Option<String>,
}

/// Upgrade the RewardVault proxy in place.
///
/// Deploys the named implementation artifact and points the proxy at it
/// through `upgradeToAndCall`.
#[derive(Args)]
pub struct UpgradeArgs {
    /// Name of the new implementation contract artifact
    #[arg(long, default_value = REWARD_VAULT_V1_ARTIFACT)]
    pub artifact: String,

    /// Optional calldata, in hex form, with which to call the new
    /// implementation when upgrading
    #[arg(short, long)]
    pub calldata: Option<String>,
}

/// Approve the Vault for an amount of the test token and transfer it in
#[derive(Args)]
pub struct TransferFundsArgs {
    /// The amount to transfer, in whole tokens
    #[arg(long, default_value = DEFAULT_TRANSFER_AMOUNT)]
    pub amount: String,
}

/// Print the reward points of a user
#[derive(Args)]
pub struct GetPointsArgs {
    /// Address of the user, in hex, defaulting to the deployer
    #[arg(short, long)]
    pub user: Option<String>,
}

/// Print a user's claimable state and the vault's balance of a token
#[derive(Args)]
pub struct StatusArgs {
    /// Address of the user, in hex, defaulting to the deployer
    #[arg(short, long)]
    pub user: Option<String>,

    /// Address of the RewardVault proxy, defaulting to the registry record
    #[arg(long, env = REWARD_VAULT_ADDRESS_ENV_VAR)]
    pub reward_vault: Option<String>,

    /// Address of the ClaimReward contract, defaulting to the registry
    /// record
    #[arg(long, env = CLAIM_REWARD_ADDRESS_ENV_VAR)]
    pub claim_reward: Option<String>,

    /// Address of a token to report the vault's balance of
    #[arg(long, env = TOKEN_ADDRESS_ENV_VAR)]
    pub token: Option<String>,
}

/// Check the role wiring of a deployed contract suite
#[derive(Args)]
pub struct VerifyArgs {
    /// Address of the OrderNFT contract, defaulting to the registry record
    #[arg(long, env = ORDER_NFT_ADDRESS_ENV_VAR)]
    pub order_nft: Option<String>,

    /// Address of the RewardVault proxy, defaulting to the registry record
    #[arg(long, env = REWARD_VAULT_ADDRESS_ENV_VAR)]
    pub reward_vault: Option<String>,

    /// Address of the ClaimReward contract, defaulting to the registry
    /// record
    #[arg(long, env = CLAIM_REWARD_ADDRESS_ENV_VAR)]
    pub claim_reward: Option<String>,
}
