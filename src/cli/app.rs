//! Main app runner for capture sessions

use std::env;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::application::orchestrator::{SessionOrchestrator, SessionOutcome};
use crate::application::ports::{
    ConfigStore, EvidenceStore, Notifier, StoreError, WatchOptions,
};
use crate::domain::capture::{CaptureKind, CaptureRequest};
use crate::domain::config::{AppConfig, Backend};
use crate::domain::evidence::{Deliverable, Evidence, EvidenceContent, SavedEvidence};
use crate::infrastructure::{
    create_notifier, BigDataCloudGeocoder, CpalMediaSource, HttpEvidenceStore,
    LocalEvidenceStore, StaticLocationSource, XdgConfigStore,
};

use super::presenter::Presenter;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Load and merge configuration from file, env, and CLI
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = store.load().await.unwrap_or_else(|_| AppConfig::empty());

    // Build env config
    let env_config = AppConfig {
        api_token: env::var("VIGIL_API_TOKEN").ok().filter(|s| !s.is_empty()),
        remote_url: env::var("VIGIL_REMOTE_URL").ok().filter(|s| !s.is_empty()),
        ..Default::default()
    };

    // Merge: defaults < file < env < cli
    AppConfig::defaults()
        .merge(file_config)
        .merge(env_config)
        .merge(cli_config)
}

/// Build the evidence store selected by the config
pub fn build_store(config: &AppConfig) -> Result<EvidenceBackend, String> {
    match config.backend_or_default() {
        Backend::Local => Ok(EvidenceBackend::Local(LocalEvidenceStore::new())),
        Backend::Remote => {
            let url = config
                .remote_url
                .clone()
                .ok_or("Remote backend selected but remote_url is not configured")?;
            let token = config
                .api_token
                .clone()
                .ok_or("Remote backend selected but api_token is not configured")?;
            Ok(EvidenceBackend::Remote(HttpEvidenceStore::new(url, token)))
        }
    }
}

/// Concrete store behind the configured backend
pub enum EvidenceBackend {
    Local(LocalEvidenceStore),
    Remote(HttpEvidenceStore),
}

#[async_trait]
impl EvidenceStore for EvidenceBackend {
    async fn save(&self, deliverable: Deliverable) -> Result<SavedEvidence, StoreError> {
        match self {
            Self::Local(store) => store.save(deliverable).await,
            Self::Remote(store) => store.save(deliverable).await,
        }
    }

    async fn list(&self) -> Result<Vec<Evidence>, StoreError> {
        match self {
            Self::Local(store) => store.list().await,
            Self::Remote(store) => store.list().await,
        }
    }

    async fn download(&self, id: &str) -> Result<EvidenceContent, StoreError> {
        match self {
            Self::Local(store) => store.download(id).await,
            Self::Remote(store) => store.download(id).await,
        }
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        match self {
            Self::Local(store) => store.delete(id).await,
            Self::Remote(store) => store.delete(id).await,
        }
    }
}

/// Run one capture session to completion
pub async fn run_session(kind: CaptureKind, config: AppConfig) -> ExitCode {
    let backend = match build_store(&config) {
        Ok(backend) => backend,
        Err(message) => {
            Presenter::new().error(&message);
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };

    run_session_with(kind, config, backend).await
}

async fn run_session_with<S: EvidenceStore + 'static>(
    kind: CaptureKind,
    config: AppConfig,
    store: S,
) -> ExitCode {
    let mut presenter = Presenter::new();

    let time_limit = config.time_limit_or_default();
    let latitude = config.latitude.unwrap_or(0.0);
    let longitude = config.longitude.unwrap_or(0.0);
    if kind.capabilities().location && config.latitude.is_none() {
        presenter.warn("No coordinates configured; location trail will report 0, 0");
    }

    let notifier: Arc<Box<dyn Notifier>> = Arc::new(create_notifier(config.notify_or_default()));
    let watch_options = WatchOptions {
        high_accuracy: config.high_accuracy_or_default(),
        ..WatchOptions::default()
    };

    let orchestrator = Arc::new(SessionOrchestrator::new(
        Arc::new(CpalMediaSource::new()),
        Arc::new(StaticLocationSource::new(latitude, longitude)),
        Arc::new(BigDataCloudGeocoder::new()),
        Arc::new(store),
        notifier,
        config.device_id_or_default(),
        watch_options,
    ));

    let request = CaptureRequest { kind, time_limit };
    let handle = match orchestrator.trigger(request).await {
        Ok(handle) => handle,
        Err(err) => {
            presenter.error(&err.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    };
    if handle.camera_degraded {
        presenter.warn("Camera unavailable; recording audio only");
    }

    let initial = presenter.format_countdown(kind.as_str(), 0, time_limit.as_secs());
    presenter.start_spinner(&initial);
    let started = std::time::Instant::now();
    let total = time_limit.as_secs();
    let kind_label = kind.as_str();

    let outcome = tokio::select! {
        outcome = handle.done() => outcome,
        _ = countdown_and_signal(&presenter, started, total, kind_label) => {
            // ctrl-c: supervisory teardown still persists what it can
            orchestrator.force_stop().await
        }
    };

    report_outcome(&mut presenter, outcome)
}

/// Updates the spinner once a second until ctrl-c arrives
async fn countdown_and_signal(
    presenter: &Presenter,
    started: std::time::Instant,
    total_secs: u64,
    kind: &str,
) {
    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                presenter.warn("Interrupted; stopping the session");
                return;
            }
            _ = ticker.tick() => {
                let elapsed = started.elapsed().as_secs();
                presenter.update_spinner(
                    &presenter.format_countdown(kind, elapsed, total_secs),
                );
            }
        }
    }
}

fn report_outcome(presenter: &mut Presenter, outcome: Option<SessionOutcome>) -> ExitCode {
    let Some(outcome) = outcome else {
        presenter.spinner_fail("Session ended without an outcome");
        return ExitCode::from(EXIT_ERROR);
    };

    if outcome.store_errors.is_empty() {
        if outcome.saved.is_empty() {
            presenter.spinner_fail("Session finished but captured nothing");
        } else {
            presenter.spinner_success(&format!(
                "Saved {} evidence record(s) after {}s",
                outcome.saved.len(),
                outcome.duration_secs
            ));
            for evidence in &outcome.saved {
                presenter.info(&format!("Evidence id: {}", evidence.id));
            }
        }
        ExitCode::from(EXIT_SUCCESS)
    } else {
        presenter.spinner_fail(&format!(
            "{} deliverable(s) could not be persisted",
            outcome.store_errors.len()
        ));
        for err in &outcome.store_errors {
            presenter.error(&err.to_string());
        }
        ExitCode::from(EXIT_ERROR)
    }
}
