mod status;

use anyhow::Result;
use console::style;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use crate::core::activity::ActivityLog;
use crate::core::api::ApiClient;
use crate::core::config::DashboardConfig;
use crate::core::dashboard::Dashboard;
use crate::core::dashboard::chat::PlaceholderReply;
use crate::core::dashboard::controller::DashboardController;
use crate::core::tabs::Tab;
use crate::core::terminal::{self, GuideSection, print_error};
use crate::interfaces::tui::DashboardTui;
use crate::logging;
use crate::platform::{NativePlatform, Platform};

fn print_help() {
    terminal::print_banner();

    GuideSection::new("Commands")
        .command("tui", "Open the interactive dashboard (default)")
        .command("status", "Check gateway health and tunnel state")
        .command("help", "Show this help")
        .print();

    GuideSection::new("Options")
        .command("--api-url <url>", "Dashboard API base URL")
        .command("--tab <id>", "Start on gateway, bookmarks, tasks, schedule, chat or topology")
        .command("--config <path>", "Read config from <path> instead of the data dir")
        .print();

    GuideSection::new("Environment")
        .command("NANODASH_API_URL", "Overrides api_url from config.toml")
        .command("NANODASH_DATA_DIR", "Overrides the data directory (~/.nanodash)")
        .print();

    GuideSection::new("Keys")
        .command("1-6, Tab, Shift+Tab", "Switch tab (always refetches)")
        .command("r", "Refresh the active tab; rescan on Topology")
        .command("n / e / d / o / f / /", "Bookmarks: new, edit, delete, open, folder, search")
        .command("i, Enter", "Chat: start typing")
        .command("q, Ctrl+C", "Quit")
        .print();

    println!(
        "\n {} {} [command] [options]\n",
        style("Usage:").bold(),
        style("nanodash").green()
    );
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct TuiFlags {
    pub api_url: Option<String>,
    pub tab: Option<String>,
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct StatusFlags {
    pub api_url: Option<String>,
    pub config: Option<PathBuf>,
}

pub(crate) fn parse_tui_command_flags(args: &[String], start: usize) -> TuiFlags {
    let mut flags = TuiFlags::default();
    let mut i = start;
    while i < args.len() {
        match args[i].as_str() {
            "--api-url" => {
                if i + 1 < args.len() {
                    flags.api_url = Some(args[i + 1].clone());
                    i += 2;
                } else {
                    i += 1;
                }
            }
            "--tab" | "-t" => {
                if i + 1 < args.len() {
                    flags.tab = Some(args[i + 1].clone());
                    i += 2;
                } else {
                    i += 1;
                }
            }
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    flags.config = Some(PathBuf::from(&args[i + 1]));
                    i += 2;
                } else {
                    i += 1;
                }
            }
            _ => i += 1,
        }
    }
    flags
}

pub(crate) fn parse_status_command_flags(args: &[String], start: usize) -> StatusFlags {
    let mut flags = StatusFlags::default();
    let mut i = start;
    while i < args.len() {
        match args[i].as_str() {
            "--api-url" => {
                if i + 1 < args.len() {
                    flags.api_url = Some(args[i + 1].clone());
                    i += 2;
                } else {
                    i += 1;
                }
            }
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    flags.config = Some(PathBuf::from(&args[i + 1]));
                    i += 2;
                } else {
                    i += 1;
                }
            }
            _ => i += 1,
        }
    }
    flags
}

/// File, then `NANODASH_API_URL`, then the `--api-url` flag.
pub(crate) async fn load_config(
    data_dir: &Path,
    config_path: Option<&Path>,
    api_url: Option<&str>,
) -> Result<DashboardConfig> {
    let path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| DashboardConfig::default_path(data_dir));
    let mut config = DashboardConfig::load(&path).await?;
    config.override_api_url(api_url);
    config.validate()?;
    Ok(config)
}

async fn run_dashboard(flags: TuiFlags) -> Result<()> {
    let data_dir = NativePlatform::data_dir();
    let config = load_config(&data_dir, flags.config.as_deref(), flags.api_url.as_deref()).await?;
    let initial_tab = match flags.tab {
        Some(tab) => tab.parse::<Tab>().map_err(anyhow::Error::msg)?,
        None => config.initial_tab()?,
    };

    let log_path = logging::init(&data_dir, &config.log_level, false)?;
    info!(
        "nanodash {} starting against {}",
        env!("CARGO_PKG_VERSION"),
        config.api_url
    );

    let activity = ActivityLog::new();
    activity.info(format!("Connecting to {}", config.api_url));
    let api = ApiClient::new(&config.api_url, config.request_timeout(), activity.clone())?;
    let replies = Arc::new(PlaceholderReply::new(
        config.reply_delay(),
        config.placeholder_reply.clone(),
    ));
    let controller = DashboardController::new(Dashboard::new(initial_tab, activity), api, replies);

    let mut tui = DashboardTui::new(controller, config.refresh_interval());
    tui.run_tui().await?;

    terminal::print_goodbye();
    terminal::print_status("Log file", &log_path.display().to_string());
    Ok(())
}

pub async fn run_main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    let cmd = args.get(1).map(String::as_str).unwrap_or("tui");
    match cmd {
        "tui" => run_dashboard(parse_tui_command_flags(&args, 2)).await,
        // Bare flags open the dashboard.
        flag if flag.starts_with("--") && flag != "--help" => {
            run_dashboard(parse_tui_command_flags(&args, 1)).await
        }
        "status" => status::run_status(parse_status_command_flags(&args, 2)).await,
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        _ => {
            print_error(&format!("Unknown command: {}", cmd));
            print_help();
            Ok(())
        }
    }
}
