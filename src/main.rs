use auto_arrange::config::{ServerConfig, SolverConfig};
use auto_arrange::server;
use clap::Parser;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

/// HTTP front end for the timetable auto-arrange solver
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to bind the server to
    #[arg(long, default_value = "127.0.0.1")]
    host: IpAddr,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 8080)]
    port: u16,

    /// Solver time budget per request, in milliseconds
    #[arg(long, default_value_t = 10_000)]
    timeout_ms: u64,
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = ServerConfig {
        addr: SocketAddr::new(args.host, args.port),
        solver: SolverConfig::with_timeout(Duration::from_millis(args.timeout_ms)),
    };

    if let Err(e) = server::run_server(config).await {
        log::error!("Server stopped: {}", e);
        std::process::exit(1);
    }
}
