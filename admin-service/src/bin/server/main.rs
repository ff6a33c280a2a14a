use std::net::SocketAddr;
use std::sync::Arc;

use admin_service::config::Config;
use admin_service::config::LogFormat;
use admin_service::domain::admin::models::Username;
use admin_service::domain::admin::service::AdminService;
use admin_service::inbound::http::router::create_router;
use admin_service::outbound::InMemoryCredentialStore;
use admin_service::sweeper::spawn_sweeper;
use auth::AuditSink;
use auth::Authenticator;
use auth::LoginThrottle;
use auth::PasswordHasher;
use auth::RevocationList;
use auth::TracingAuditSink;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::load()?;

    let registry = tracing_subscriber::registry().with(
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "admin_service=debug,auth=info,tower_http=debug".into()),
    );
    match config.logging.format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }

    tracing::info!(
        service = "admin-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    // Refuse to start without a usable signing secret
    let secret = config.signing_secret()?;
    let token_settings = config.token_settings()?;

    tracing::info!(
        http_port = config.server.http_port,
        issuer = %token_settings.issuer,
        audience = %token_settings.audience,
        token_ttl_hours = token_settings.ttl.num_hours(),
        max_login_attempts = config.throttle.max_attempts,
        throttle_window_minutes = config.throttle.window_minutes,
        secure_cookies = config.cookie.secure,
        trust_proxy = config.server.trust_proxy,
        "Configuration loaded"
    );

    let authenticator = Arc::new(
        Authenticator::new(&secret, token_settings)
            .with_password_hasher(PasswordHasher::with_cost(config.password)?)
            .with_revocation_list(RevocationList::with_high_water_mark(
                config.revocation.high_water_mark,
            )),
    );
    let throttle = Arc::new(LoginThrottle::with_limits(
        config.throttle.max_attempts,
        config.throttle_window(),
    ));
    let credential_store = Arc::new(InMemoryCredentialStore::new(Username::new(
        config.admin.username.clone(),
    )?));
    let audit_sink: Arc<dyn AuditSink> = Arc::new(TracingAuditSink::new());

    let admin_service = Arc::new(AdminService::new(
        credential_store,
        authenticator,
        throttle,
        audit_sink,
    ));

    let sweeper = spawn_sweeper(Arc::clone(&admin_service), config.sweep_interval());
    tracing::info!(
        interval_minutes = config.server.sweep_interval_minutes,
        "Expiry sweeper started"
    );

    let http_address = format!("{}:{}", config.server.host, config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(
        Arc::clone(&admin_service),
        config.cookie.secure,
        config.server.trust_proxy,
    );
    axum::serve(
        http_listener,
        http_application.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    sweeper.abort();
    tracing::info!("Server exited successfully");

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => tracing::error!(error = %e, "Failed to listen for shutdown signal"),
    }
}
