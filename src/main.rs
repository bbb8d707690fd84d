use std::process::ExitCode;

use anyhow::Context;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use counterwatch::config::{Config, USAGE};
use counterwatch::services::apic::ApicClient;
use counterwatch::services::phantom::PhantomClient;
use counterwatch::PollCycle;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("counterwatch: {e}\n\n{USAGE}");
            return ExitCode::from(2);
        }
    };

    let env_filter = format!("hyper=warn,reqwest=warn,{}", config.log_level);
    let filter = match EnvFilter::try_new(&env_filter) {
        Ok(filter) => filter,
        Err(e) => {
            eprintln!("counterwatch: invalid LOG_LEVEL {:?}: {e}\n\n{USAGE}", config.log_level);
            return ExitCode::from(2);
        }
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    tracing::debug!(?config, "configuration loaded");

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config) -> anyhow::Result<()> {
    let fabric = ApicClient::new(
        &config.apic_host,
        &config.apic_username,
        &config.apic_password,
        config.request_timeout,
        config.apic_verify_tls,
    )
    .context("building controller client")?;
    let phantom = PhantomClient::new(
        &config.phantom_host,
        &config.phantom_token,
        config.request_timeout,
        config.phantom_verify_tls,
    )
    .context("building Phantom client")?;

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        match wait_for_signal().await {
            Ok(name) => {
                tracing::info!("interrupt {name} caught, exiting");
                signal_token.cancel();
            }
            Err(e) => tracing::error!("cannot listen for signals: {e}"),
        }
    });

    tracing::info!("counterwatch starting, use CTRL+C to exit");
    let mut cycle = PollCycle::new(fabric, phantom, config.watch_list, config.poll);
    cycle.run(shutdown).await;
    Ok(())
}

#[cfg(unix)]
async fn wait_for_signal() -> std::io::Result<&'static str> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;
    Ok(tokio::select! {
        _ = interrupt.recv() => "SIGINT",
        _ = terminate.recv() => "SIGTERM",
    })
}

#[cfg(not(unix))]
async fn wait_for_signal() -> std::io::Result<&'static str> {
    tokio::signal::ctrl_c().await?;
    Ok("CTRL+C")
}
