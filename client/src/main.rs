use clap::Parser;
use client::network::Client;
use log::info;
use shared::console::run_console;
use shared::{GameRules, SessionIdentity};
use std::error::Error;
use std::path::PathBuf;
use tokio::sync::mpsc;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Host address to connect to
    #[arg(short = 's', long, default_value = "127.0.0.1:8080")]
    host: String,

    /// Display name of this player
    #[arg(short = 'n', long, default_value = "Player")]
    name: String,

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

    info!("Connecting to: {}", args.host);
    let client = Client::connect(args.host.as_str(), &args.name, &rules).await?;
    println!("Joined {} as {}", args.host, client.own_id());

    let identity = SessionIdentity::client(client.own_id().clone(), None);
    let (actions_tx, actions_rx) = mpsc::unbounded_channel();
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let console = tokio::spawn(run_console(identity, events_rx, actions_tx));

    tokio::select! {
        result = client.run(actions_rx, events_tx) => result?,
        _ = tokio::signal::ctrl_c() => info!("Interrupted, leaving"),
    }

    console.abort();
    Ok(())
}
