use clap::Parser;
use host::network::HostServer;
use log::info;
use shared::console::run_console;
use shared::{GameRules, SessionIdentity};
use std::error::Error;
use std::path::PathBuf;
use tokio::sync::mpsc;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to accept client links on
    #[arg(short = 'b', long, default_value = "127.0.0.1:8080")]
    bind: String,

    /// Display name of the host player
    #[arg(short = 'n', long, default_value = "Host")]
    name: String,

    /// Maximum number of connected clients
    #[arg(short = 'm', long, default_value = "8")]
    max_links: usize,

    /// JSON file overriding the default game rules
    #[arg(short = 'r', long)]
    rules: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();

    let rules = match &args.rules {
        Some(path) => {
            info!("Loading rules from {}", path.display());
            GameRules::from_file(path)?
        }
        None => GameRules::default(),
    };

    let server = HostServer::bind(args.bind.as_str(), &args.name, rules, args.max_links).await?;
    println!(
        "Hosting game {} on {}",
        server.game_id(),
        server.local_addr()?
    );

    let identity = SessionIdentity::host(server.game_id().clone());
    let (actions_tx, actions_rx) = mpsc::unbounded_channel();
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let console = tokio::spawn(run_console(identity, events_rx, actions_tx));

    tokio::select! {
        result = server.run(actions_rx, events_tx) => result?,
        _ = tokio::signal::ctrl_c() => info!("Interrupted, shutting down"),
    }

    console.abort();
    Ok(())
}
