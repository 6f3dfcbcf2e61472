use std::sync::Arc;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use kube::Client;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use syndesis_operator::config::OperatorConfig;
use syndesis_operator::context::Context;
use syndesis_operator::legacy::LegacyAdopter;
use syndesis_operator::{server, telemetry, versions};

#[derive(Parser)]
#[command(
    name = "syndesis-operator",
    about = "Migrates and adopts Syndesis installations on Kubernetes"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    config: OperatorConfig,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the Syndesis CRD YAML (both versions) to stdout.
    Crd,
}

fn print_crd() -> Result<()> {
    let crd = syndesis_crds::merged_crd()?;
    let yaml = serde_yaml::to_string(&crd)?;
    println!("{yaml}");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(Commands::Crd) = cli.command {
        return print_crd();
    }

    telemetry::init();

    let namespace = cli
        .config
        .namespace
        .clone()
        .context("no namespace configured, set --namespace or WATCH_NAMESPACE")?;
    let client = Client::try_default().await?;
    let ctx = Arc::new(Context::new(client, namespace, &cli.config));

    let shutdown = CancellationToken::new();
    let state = server::ServerState::new();
    let mut server_task = tokio::spawn(server::run(
        cli.config.metrics_port,
        state.clone(),
        shutdown.clone(),
    ));

    let adopter = LegacyAdopter::new(ctx.clone());
    let adopter_task = tokio::spawn(adopter.run(shutdown.child_token()));

    if let Err(e) = versions::run(&ctx).await {
        error!(namespace = %ctx.namespace, error = %e, "Syndesis API migration failed, exiting");
        shutdown.cancel();
        return Err(e.into());
    }
    state.set_ready();

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("received shutdown signal");
        }
        res = &mut server_task => {
            error!("metrics server exited: {res:?}");
        }
    }

    shutdown.cancel();
    if let Err(e) = adopter_task.await {
        warn!(error = %e, "legacy adopter task failed");
    }
    if !server_task.is_finished() {
        let _ = server_task.await;
    }
    Ok(())
}
