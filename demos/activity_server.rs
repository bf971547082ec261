//! Activity server demo: publishes stdin lines to live viewers
//!
//! Run with: cargo run --example activity_server [BIND_ADDR]
//!
//! Examples:
//!   cargo run --example activity_server                   # binds to 127.0.0.1:18793
//!   cargo run --example activity_server 0.0.0.0:9000      # binds to 0.0.0.0:9000
//!
//! Each line typed on stdin is published as the new state. A line reading
//! `:reset` clears the state. Connect a viewer with e.g.
//!   websocat "ws://127.0.0.1:18793/a2ui/activity?activityToken=<token>"
//!
//! ## Environment
//!
//! - `A2UI_ACTIVITY_ENABLED` - set to `false` to start disabled (default enabled)
//! - `A2UI_ACTIVITY_TOKEN`   - shared token; one is generated when unset

use std::net::SocketAddr;

use a2ui_activity::{create_hub, ActivityConfig, ActivityServer, ServerConfig};
use tokio::io::{AsyncBufReadExt, BufReader};

/// Parse bind address from command line argument.
///
/// Accepts "IP:PORT", a bare IP (default port) or "localhost[:PORT]".
fn parse_bind_addr(arg: &str) -> Result<SocketAddr, String> {
    let normalized = arg.replace("localhost", "127.0.0.1");

    if let Ok(addr) = normalized.parse::<SocketAddr>() {
        return Ok(addr);
    }

    if let Ok(ip) = normalized.parse::<std::net::IpAddr>() {
        return Ok(SocketAddr::new(ip, a2ui_activity::server::config::DEFAULT_PORT));
    }

    Err(format!(
        "Invalid bind address: '{}'. Expected format: IP:PORT or IP or 'localhost'",
        arg
    ))
}

fn print_usage() {
    eprintln!("Usage: activity_server [BIND_ADDR]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  BIND_ADDR    Address to bind to (default: 127.0.0.1:18793)");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return Ok(());
    }

    let mut server_config = ServerConfig::default();
    if let Some(addr_str) = args.get(1) {
        match parse_bind_addr(addr_str) {
            Ok(addr) => server_config = server_config.bind(addr),
            Err(e) => {
                eprintln!("Error: {}", e);
                eprintln!();
                print_usage();
                std::process::exit(1);
            }
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("a2ui_activity=debug".parse()?)
                .add_directive("activity_server=debug".parse()?),
        )
        .init();

    // Enabled by default here; the environment may override either field
    let defaults = ActivityConfig {
        enabled: Some(true),
        token: None,
    };
    let merged = ActivityConfig::merge(Some(&defaults), Some(&ActivityConfig::from_env()));
    let reconciled = merged.ensure_access_token();
    let hub = create_hub(Some(&reconciled.config));

    println!(
        "Viewer URL: ws://{}{}{}",
        server_config.bind_addr,
        server_config.path,
        hub.access_token()
            .map(|t| format!("?activityToken={}", t))
            .unwrap_or_default()
    );
    println!("Type a line to publish it, ':reset' to clear, Ctrl+D to quit.");

    let server = ActivityServer::new(server_config, hub.clone());
    let server_task = tokio::spawn(async move {
        server
            .run_until(async {
                let _ = tokio::signal::ctrl_c().await;
            })
            .await
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim() == ":reset" {
            hub.reset_state().await;
        } else if !line.trim().is_empty() {
            hub.publish(line).await;
        }
    }

    println!("stdin closed, shutting down...");
    hub.shutdown().await;
    server_task.abort();

    let stats = hub.stats().await;
    println!(
        "Stats: accepted={} publishes={} resets={} frames_sent={} frames_dropped={}",
        stats.connections_accepted,
        stats.publishes,
        stats.resets,
        stats.frames_sent,
        stats.frames_dropped
    );

    Ok(())
}
