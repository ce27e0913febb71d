mod cli;
mod commands;
mod context;
mod render;

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use crate::context::AppContext;

/// Filter precedence: `RUST_LOG`, then `--log-level`, then the config file.
fn env_filter(flag: Option<&str>, configured: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    flag.and_then(|directive| EnvFilter::try_new(directive).ok())
        .unwrap_or_else(|| EnvFilter::new(configured))
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = cli::parse();

    // Config is needed for the log level, so a config error is reported
    // through a default subscriber.
    let loaded = if args.command.skips_config_load() {
        Ok(tripdesk_config::TripdeskConfig::default())
    } else {
        tripdesk_config::load_config_from(args.config.as_deref())
    };
    let configured = match &loaded {
        Ok(config) => config.logging.level.directive(),
        Err(_) => "tripdesk=info",
    };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(args.log_level.as_deref(), configured))
        .with_writer(std::io::stderr)
        .init();

    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Config load failed: {e}");
            return ExitCode::FAILURE;
        }
    };
    tracing::debug!(api = %config.api.base_url, realtime = %config.realtime.url, "Config loaded");

    let ctx = match AppContext::from_config(config) {
        Ok(ctx) => ctx.with_config_path(args.config),
        Err(e) => {
            tracing::error!("Startup failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    match commands::run(args.command, &ctx).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
