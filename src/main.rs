use clap::Parser;
use dpay_scripts::{
    cli::Cli,
    errors::ScriptError,
    registry::{ContractDeployer, DeploymentsDb},
    utils::setup_client,
};

#[tokio::main]
async fn main() -> Result<(), ScriptError> {
    let Cli {
        priv_key,
        rpc_url,
        network,
        deployments_path,
        artifacts_path,
        delay_step,
        redeploy,
        command,
    } = Cli::parse();

    tracing_subscriber::fmt().pretty().init();

    let client = setup_client(&priv_key, &rpc_url).await?;
    let deployer = ContractDeployer::new(
        client,
        DeploymentsDb::new(deployments_path),
        network,
        artifacts_path,
        delay_step,
        redeploy,
    );

    command.run(&deployer).await
}
