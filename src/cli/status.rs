use anyhow::{Result, bail};
use console::style;
use tracing::info;

use super::{StatusFlags, load_config};
use crate::core::activity::ActivityLog;
use crate::core::api::ApiClient;
use crate::core::dashboard::gateway::GatewayView;
use crate::core::terminal::{GuideSection, print_success};
use crate::logging;
use crate::platform::{NativePlatform, Platform};

/// One-shot gateway probe. Fails (non-zero exit) when the API is unreachable.
pub async fn run_status(flags: StatusFlags) -> Result<()> {
    let data_dir = NativePlatform::data_dir();
    let config = load_config(&data_dir, flags.config.as_deref(), flags.api_url.as_deref()).await?;
    logging::init(&data_dir, &config.log_level, false)?;
    info!("Probing gateway at {}", config.api_url);

    let api = ApiClient::new(&config.api_url, config.request_timeout(), ActivityLog::new())?;
    let (health, tunnel) = tokio::join!(api.health(), api.tunnel_status());
    let health_error = health.as_ref().err().map(ToString::to_string);

    let mut gateway = GatewayView::new();
    gateway.apply(health, tunnel);

    let mut section = GuideSection::new("Gateway Status").status("Endpoint", &config.api_url);
    for line in gateway.view() {
        let value = if line.healthy {
            style(line.value).green().to_string()
        } else {
            style(line.value).red().bold().to_string()
        };
        section = section.status(line.label, &value);
    }
    section.print();

    if let Some(err) = health_error {
        bail!("gateway at {} is unreachable: {}", config.api_url, err);
    }
    print_success("Gateway is reachable.");
    Ok(())
}
