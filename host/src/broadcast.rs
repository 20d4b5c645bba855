//! Replication of authoritative snapshots to every client link.
//!
//! Each transition is pushed as a full `SYNC_STATE`, link by link in
//! registration order. Delivery is best effort: no acknowledgements, no
//! retries, a dead link is skipped with a warning.

use log::{debug, error, warn};
use shared::{encode_line, Snapshot};
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};

use crate::link_manager::LinkManager;

/// Work for the broadcaster task, queued by the session loop.
#[derive(Debug)]
pub enum GameMessage {
    /// Push to every link.
    Broadcast(Snapshot),
    /// Push to one link, used to bring a fresh link up to date.
    SendSnapshot { link_id: u32, snapshot: Snapshot },
}

fn encode_snapshot(snapshot: &Snapshot) -> Option<String> {
    match encode_line(&snapshot.to_sync_action()) {
        Ok(line) => Some(line),
        Err(e) => {
            error!("Failed to encode snapshot {}: {}", snapshot.version(), e);
            None
        }
    }
}

/// Sends `snapshot` to every link. Returns how many links accepted it.
pub fn broadcast(links: &LinkManager, snapshot: &Snapshot) -> usize {
    let line = match encode_snapshot(snapshot) {
        Some(line) => line,
        None => return 0,
    };

    let mut delivered = 0;
    for link in links.iter() {
        if link.send(line.clone()) {
            delivered += 1;
        } else {
            warn!(
                "Dropped snapshot {} for link {}: writer closed",
                snapshot.version(),
                link.id
            );
        }
    }

    debug!(
        "Snapshot {} sent to {}/{} links",
        snapshot.version(),
        delivered,
        links.len()
    );
    delivered
}

pub fn send_to_link(links: &LinkManager, link_id: u32, snapshot: &Snapshot) -> bool {
    let link = match links.get(link_id) {
        Some(link) => link,
        None => return false,
    };
    match encode_snapshot(snapshot) {
        Some(line) => link.send(line),
        None => false,
    }
}

/// Drains queued replication work until the session loop goes away.
pub async fn run_broadcaster(
    links: Arc<RwLock<LinkManager>>,
    mut game_rx: mpsc::UnboundedReceiver<GameMessage>,
) {
    while let Some(message) = game_rx.recv().await {
        let links = links.read().await;
        match message {
            GameMessage::Broadcast(snapshot) => {
                broadcast(&links, &snapshot);
            }
            GameMessage::SendSnapshot { link_id, snapshot } => {
                if !send_to_link(&links, link_id, &snapshot) {
                    warn!("Could not bring link {} up to date", link_id);
                }
            }
        }
    }
    debug!("Broadcaster stopped");
}
