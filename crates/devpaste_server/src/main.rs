//! Headless API server entrypoint.

use devpaste_core::DEFAULT_PORT;
use devpaste_server::{config::Config, db::Database, serve_router, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct CliFlags {
    help: bool,
    purge_expired: bool,
}

fn parse_cli_flags(args: &[String]) -> anyhow::Result<CliFlags> {
    let mut flags = CliFlags::default();
    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "--help" | "-h" => flags.help = true,
            "--purge-expired" => flags.purge_expired = true,
            value if value.starts_with('-') => {
                anyhow::bail!(
                    "Unknown option: '{}'. Use --help to see supported options.",
                    value
                );
            }
            value => {
                anyhow::bail!(
                    "Unexpected positional argument: '{}'. Use --help to see supported options.",
                    value
                );
            }
        }
    }
    Ok(flags)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "devpaste=info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().collect();
    let cli_flags = parse_cli_flags(&args)?;

    if cli_flags.help {
        print_help();
        return Ok(());
    }

    let config = Config::from_env();

    if cli_flags.purge_expired {
        return run_purge(&config);
    }

    let database = Database::new(&config.db_path)?;
    let state = AppState::new(config.clone(), database)?;

    let allow_public = devpaste_server::config::env_flag_enabled("ALLOW_PUBLIC_ACCESS");
    if allow_public {
        tracing::warn!("Public access enabled - server will accept requests from any origin");
    }

    let bind_addr = devpaste_server::resolve_bind_address(&config, allow_public);
    if !bind_addr.ip().is_loopback() {
        tracing::warn!(
            "Binding to non-localhost address: {} - ensure proper security measures are in place",
            bind_addr
        );
    }

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    let actual_addr = listener.local_addr().unwrap_or(bind_addr);
    tracing::info!("DevPaste running at http://{}", actual_addr);

    serve_router(listener, state, allow_public, shutdown_signal()).await?;
    tracing::info!("DevPaste stopped");

    Ok(())
}

fn print_help() {
    println!("DevPaste Server\n");
    println!("Usage: devpaste-server [OPTIONS]\n");
    println!("Options:");
    println!("  --purge-expired   Delete expired pastes from the database and exit");
    println!("  --help            Show this help message");
    println!("\nEnvironment variables:");
    println!("  DB_PATH           Database directory (default: ~/.cache/devpaste/db)");
    println!(
        "  PORT              Server port (default: {})",
        DEFAULT_PORT
    );
    println!("  MAX_PASTE_SIZE    Maximum paste size in bytes (default: 10MB)");
    println!("  CACHE_TTL_SECS    Seconds a read paste stays cached (default: 300)");
    println!("  CACHE_CAPACITY    Maximum cached pastes (default: 10000)");
    println!("  HASH_MEMORY_KIB   Argon2 memory cost for new passwords");
    println!("  HASH_ITERATIONS   Argon2 iteration count for new passwords");
    println!("  HASH_PARALLELISM  Argon2 lanes for new passwords");
    println!("  ALLOW_PUBLIC_ACCESS  Allow CORS from any origin and non-loopback binds");
    println!(
        "  BIND              Override bind address (e.g. 0.0.0.0:{})",
        DEFAULT_PORT
    );
}

fn run_purge(config: &Config) -> anyhow::Result<()> {
    if !std::path::Path::new(&config.db_path).exists() {
        println!("No existing database at {}", config.db_path);
        return Ok(());
    }
    let database = Database::new(&config.db_path)?;
    let removed = database.pastes.purge_expired(chrono::Utc::now())?;
    tracing::info!(removed, "Expired paste sweep finished");
    println!("Removed {} expired paste(s)", removed);
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::{parse_cli_flags, CliFlags};

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn parse_cli_flags_rejects_unknown_and_positional_arguments() {
        let cases = [
            (args(&["devpaste-server", "--purge-expird"]), "Unknown option"),
            (
                args(&["devpaste-server", "purge"]),
                "Unexpected positional argument",
            ),
        ];

        for (args, expected_fragment) in cases {
            let err = parse_cli_flags(&args).expect_err("invalid args should be rejected");
            assert!(err.to_string().contains(expected_fragment));
        }
    }

    #[test]
    fn parse_cli_flags_accepts_supported_options() {
        let flags = parse_cli_flags(&args(&["devpaste-server", "--purge-expired", "--help"]))
            .expect("known options should parse");
        assert_eq!(
            flags,
            CliFlags {
                help: true,
                purge_expired: true,
            }
        );
        assert_eq!(
            parse_cli_flags(&args(&["devpaste-server"])).expect("no options"),
            CliFlags::default()
        );
    }
}
