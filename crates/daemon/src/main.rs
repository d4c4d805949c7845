use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use backup_health_daemon::check;
use backup_health_daemon::config::{self, Config};
use backup_health_daemon::{build_router, AppState};
use backup_health_monitor::HealthMonitor;
use backup_health_storage::FsObjectStore;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: backup-health-daemon [--config PATH] [check]";

enum Command {
    Serve,
    Check,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let (config_path, command) = parse_args(env::args().skip(1))?;
    let cfg = match config_path {
        Some(path) => {
            info!(path = %path.display(), "loading config file");
            config::load_config(&path)?
        }
        None => Config::default(),
    };
    let monitor = build_monitor(&cfg)?;

    match command {
        Command::Check => {
            let outcome = check::run_check(&monitor).await?;
            println!("{}", outcome.json);
            if outcome.exit_code != 0 {
                warn!(status = outcome.report.status.as_str(), "backup health check failed");
            }
            Ok(ExitCode::from(outcome.exit_code))
        }
        Command::Serve => {
            run_service(monitor, &cfg).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<(Option<PathBuf>, Command)> {
    let mut config_path = None;
    let mut command = Command::Serve;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let path = args.next().ok_or_else(|| anyhow!("--config needs a path\n{USAGE}"))?;
                config_path = Some(PathBuf::from(path));
            }
            "check" => command = Command::Check,
            other => bail!("unexpected argument {other:?}\n{USAGE}"),
        }
    }
    Ok((config_path, command))
}

fn build_monitor(cfg: &Config) -> Result<HealthMonitor> {
    let bucket_root = cfg.bucket_root();
    let prefix = cfg.prefix();
    let thresholds = cfg.thresholds()?;
    info!(
        %bucket_root,
        %prefix,
        warning_age_hours = thresholds.warning_age_hours,
        critical_age_hours = thresholds.critical_age_hours,
        min_expected_routes = thresholds.min_expected_routes,
        "backup health monitor configured"
    );

    let store = Arc::new(FsObjectStore::new(bucket_root));
    Ok(HealthMonitor::new(store)
        .with_root(prefix)
        .with_thresholds(thresholds))
}

async fn run_service(monitor: HealthMonitor, cfg: &Config) -> Result<()> {
    let state = AppState {
        monitor,
        api_token: cfg.api_token(),
    };

    let listen = cfg.listen();
    let addr: SocketAddr = listen
        .parse()
        .with_context(|| format!("invalid listen address: {listen}"))?;
    let app = build_router(state);

    info!(%addr, "starting backup health API");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("backup health API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn no_arguments_serve_with_defaults() {
        let (path, command) = parse_args(args(&[])).expect("parse");
        assert!(path.is_none());
        assert!(matches!(command, Command::Serve));
    }

    #[test]
    fn config_and_check_in_any_order() {
        let (path, command) = parse_args(args(&["check", "--config", "m.toml"])).expect("parse");
        assert_eq!(path, Some(PathBuf::from("m.toml")));
        assert!(matches!(command, Command::Check));
    }

    #[test]
    fn rejects_dangling_flag_and_unknown_words() {
        let err = parse_args(args(&["--config"])).err().expect("missing path");
        assert!(err.to_string().contains("usage:"));
        assert!(parse_args(args(&["status"])).is_err());
    }
}
