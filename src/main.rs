// SPDX-License-Identifier: PMPL-1.0-or-later
//! sonarbot server entry point

use clap::{CommandFactory, Parser};
use sonarbot::api::{self, AppState};
use sonarbot::{Config, Result};
use std::ffi::OsString;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "sonarbot")]
#[command(about = "Posts SonarQube analysis results to DingTalk robots")]
#[command(version)]
struct Cli {
    /// Listening address
    #[arg(long)]
    addr: Option<String>,

    /// SonarQube user token (required here or in the config file)
    #[arg(long)]
    token: Option<String>,

    /// Path to configuration file
    #[arg(short, long, default_value = "sonarbot.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Long flags that deployments pass with a single dash (`-token squ_x`)
const SINGLE_DASH_FLAGS: [&str; 2] = ["addr", "token"];

/// Rewrite `-addr`/`-token` (and their `=value` forms) to the double-dash
/// spelling clap expects. Short flags such as `-v` are left alone.
fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    args.into_iter()
        .map(|arg| {
            let arg = arg.into();
            let Some(text) = arg.to_str() else {
                return arg;
            };
            let Some(rest) = text.strip_prefix('-') else {
                return arg;
            };
            let name = rest.split('=').next().unwrap_or_default();
            if !rest.starts_with('-') && SINGLE_DASH_FLAGS.contains(&name) {
                OsString::from(format!("-{}", text))
            } else {
                arg
            }
        })
        .collect()
}

/// Merge file, environment and flags. `None` when no token was supplied,
/// in which case the server must not start.
fn resolve(cli: &Cli) -> Result<Option<Config>> {
    let config = Config::load(&cli.config)?.with_overrides(cli.addr.clone(), cli.token.clone());
    Ok(config.token().is_some().then_some(config))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_from(normalize_args(std::env::args_os()));

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let Some(config) = resolve(&cli)? else {
        println!("token参数是必须的");
        // Usage output is best effort; nothing has been started yet.
        let _ = Cli::command().print_help();
        return Ok(());
    };

    serve(&config).await
}

async fn serve(config: &Config) -> Result<()> {
    let state = AppState::from_config(config)?;
    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(config.server.addr.as_str()).await?;
    tracing::info!("Server started on {} (http)", config.server.addr);

    axum::serve(listener, app).await?;
    Ok(())
}
