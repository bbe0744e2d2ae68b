mod adapters;
mod application;
mod config;
mod domain;
mod ports;

use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use adapters::{CfgDirectorySource, NamePolicy, ZabbixClient};
use application::SyncService;
use config::Config;
use domain::{Credentials, ProxyRef, TemplateRef};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("hostsync={}", config.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("🚀 Starting hostsync v{}", env!("CARGO_PKG_VERSION"));
    info!("  → Endpoint: {}", config.api_url);
    info!("  → Source dir: {}", config.source_dir.display());
    info!("  → Host group: {}", config.group_name);
    info!("  → Template id: {}, proxy id: {}", config.template_id, config.proxy_id);

    let policy = if config.strict_names {
        NamePolicy::Strict
    } else {
        NamePolicy::Lenient
    };

    let inventory = Arc::new(ZabbixClient::new(config.api_url.clone()));
    let source = CfgDirectorySource::new(config.source_dir.clone(), policy);

    let service = SyncService::new(
        inventory,
        source,
        Credentials::new(config.api_user.clone(), config.api_password.clone()),
        config.group_name.clone(),
        TemplateRef::new(config.template_id.clone()),
        ProxyRef::new(config.proxy_id.clone()),
    );

    // Fatal errors (authentication, group resolution, unreadable source
    // directory) propagate and exit non-zero; per-host failures do not
    let summary = service.run().await?;

    info!(
        "✓ Run complete: {} created, {} already existed, {} skipped, {} failed",
        summary.created(),
        summary.already_exists(),
        summary.skipped(),
        summary.failed()
    );
    if !summary.unreadable_files.is_empty() {
        warn!("⚠ {} file(s) could not be read: {:?}", summary.unreadable_files.len(), summary.unreadable_files);
    }

    Ok(())
}
