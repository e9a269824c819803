use crate::{
    adapters::{
        backend::{BackendInsightsClient, HttpAuthGateway, HttpVerificationClient},
        persistence::FileTokenStore,
    },
    application::ports::{AuthGateway, TokenStore, VerificationGateway},
    infra::{config::AppConfig, http_client},
    use_cases::session::SessionOrchestrator,
};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Everything the CLI needs, wired to the configured backend.
pub struct AppContext {
    pub config: Arc<AppConfig>,
    pub session: Arc<SessionOrchestrator>,
    pub insights: BackendInsightsClient,
}

pub fn init_session(config: AppConfig) -> anyhow::Result<AppContext> {
    let client = http_client::build_client(config.request_timeout())?;
    let upload_client = http_client::build_client(config.upload_timeout())?;

    let store = Arc::new(FileTokenStore::new(config.token_store_path.clone())) as Arc<dyn TokenStore>;
    let auth = Arc::new(HttpAuthGateway::new(client.clone(), &config.backend_base_url))
        as Arc<dyn AuthGateway>;
    let verifier = Arc::new(HttpVerificationClient::new(
        upload_client,
        &config.backend_base_url,
        store.clone(),
    )) as Arc<dyn VerificationGateway>;
    let insights = BackendInsightsClient::new(client, &config.backend_base_url, store.clone());

    let session = Arc::new(SessionOrchestrator::new(store, auth, verifier));

    Ok(AppContext {
        config: Arc::new(config),
        session,
        insights,
    })
}

/// Console logs on stderr, plus JSON lines in `log_file` when given.
pub fn init_tracing(log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "idcheck=info".into());

    let console_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr);

    let json_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(
                fmt::layer()
                    .json()
                    .with_writer(file)
                    .with_current_span(true)
                    .with_span_list(true)
                    .boxed(),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(json_layer)
        .try_init()
        .ok();

    Ok(())
}
