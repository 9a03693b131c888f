//! Vigil CLI entry point

use std::process::ExitCode;

use clap::Parser;

use vigil::cli::{
    app::{build_store, load_merged_config, run_session, EvidenceBackend, EXIT_ERROR},
    args::{Cli, Commands},
    config_cmd::handle_config_command,
    evidence_cmd::{handle_delete, handle_download, handle_list},
    presenter::Presenter,
};
use vigil::domain::capture::CaptureKind;
use vigil::domain::config::AppConfig;
use vigil::infrastructure::XdgConfigStore;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    let presenter = Presenter::new();

    // Config management needs no merged config
    let command = match cli.command {
        Commands::Config { action } => {
            let store = XdgConfigStore::new();
            if let Err(e) = handle_config_command(action, &store, &presenter).await {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            return ExitCode::SUCCESS;
        }
        other => other,
    };

    // Build CLI config from args
    let cli_config = AppConfig {
        time_limit: cli.limit.clone(),
        notify: if cli.notify { Some(true) } else { None },
        backend: cli.backend.map(Into::into),
        ..Default::default()
    };
    let config = load_merged_config(cli_config).await;

    match command {
        Commands::Panic => run_session(CaptureKind::Panic, config).await,
        Commands::Record { kind } => run_session(kind.into(), config).await,
        Commands::List => {
            with_store(&config, &presenter, |store, presenter| async move {
                handle_list(&store, &presenter).await
            })
            .await
        }
        Commands::Download { id, output } => {
            with_store(&config, &presenter, |store, presenter| async move {
                handle_download(&store, &presenter, &id, output.as_deref()).await
            })
            .await
        }
        Commands::Delete { id } => {
            with_store(&config, &presenter, |store, presenter| async move {
                handle_delete(&store, &presenter, &id).await
            })
            .await
        }
        Commands::Config { .. } => ExitCode::SUCCESS,
    }
}

/// Run one store-backed command against the configured backend
async fn with_store<F, Fut>(config: &AppConfig, presenter: &Presenter, run: F) -> ExitCode
where
    F: FnOnce(EvidenceBackend, Presenter) -> Fut,
    Fut: std::future::Future<Output = Result<(), vigil::application::ports::StoreError>>,
{
    let backend = match build_store(config) {
        Ok(backend) => backend,
        Err(message) => {
            presenter.error(&message);
            return ExitCode::from(vigil::cli::EXIT_USAGE_ERROR);
        }
    };

    match run(backend, Presenter::new()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            presenter.error(&e.to_string());
            ExitCode::from(EXIT_ERROR)
        }
    }
}
