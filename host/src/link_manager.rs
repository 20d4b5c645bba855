//! Connected client links on the host side.
//!
//! Tracks every open link in registration order together with its
//! outbound queue and, once it has joined, the peer identity behind it.
//! The manager enforces the session capacity but never reconnects or
//! retries anything: a closed link is simply forgotten.

use log::{info, warn};
use shared::PeerId;
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::time::Instant;
use tokio::sync::mpsc;

/// One client link and its queue of encoded outbound lines.
#[derive(Debug)]
pub struct Link {
    /// Assigned by the host, increasing in registration order
    pub id: u32,
    pub addr: SocketAddr,
    /// Set by the first JOIN_GAME received over this link
    pub peer_id: Option<PeerId>,
    /// When the host accepted the link, reported when it closes
    pub connected_at: Instant,
    sender: mpsc::UnboundedSender<String>,
}

impl Link {
    pub fn new(id: u32, addr: SocketAddr, sender: mpsc::UnboundedSender<String>) -> Self {
        Self {
            id,
            addr,
            peer_id: None,
            connected_at: Instant::now(),
            sender,
        }
    }

    /// Queues one line for the link's writer task.
    ///
    /// Fire-and-forget: `false` only means the writer is already gone.
    pub fn send(&self, line: String) -> bool {
        self.sender.send(line).is_ok()
    }
}

/// Registry of open links with a capacity limit.
#[derive(Debug)]
pub struct LinkManager {
    links: BTreeMap<u32, Link>,
    next_link_id: u32,
    pub max_links: usize,
}

impl LinkManager {
    /// Creates an empty registry that accepts at most `max_links` links.
    pub fn new(max_links: usize) -> Self {
        Self {
            links: BTreeMap::new(),
            next_link_id: 1,
            max_links,
        }
    }

    /// Registers a new link, or returns `None` when the session is full.
    pub fn add_link(
        &mut self,
        addr: SocketAddr,
        sender: mpsc::UnboundedSender<String>,
    ) -> Option<u32> {
        if self.links.len() >= self.max_links {
            return None;
        }

        let link_id = self.next_link_id;
        self.next_link_id += 1;

        self.links.insert(link_id, Link::new(link_id, addr, sender));
        info!("Link {} opened from {}", link_id, addr);
        Some(link_id)
    }

    /// Forgets a link after its reader saw EOF or an error.
    ///
    /// Returns `false` for an unknown id. The player stays in the game
    /// state; only the link goes away.
    pub fn remove_link(&mut self, link_id: &u32) -> bool {
        if let Some(link) = self.links.remove(link_id) {
            let lifetime = link.connected_at.elapsed();
            match &link.peer_id {
                Some(peer_id) => info!(
                    "Link {} to {} closed after {:.1}s",
                    link_id,
                    peer_id,
                    lifetime.as_secs_f32()
                ),
                None => info!(
                    "Link {} closed before joining after {:.1}s",
                    link_id,
                    lifetime.as_secs_f32()
                ),
            }
            true
        } else {
            false
        }
    }

    /// Records which peer speaks over `link_id`. The first join wins, and a
    /// peer already bound to another open link is not bound a second time.
    pub fn bind_peer(&mut self, link_id: u32, peer_id: PeerId) -> bool {
        if let Some(other) = self.find_link_by_peer(&peer_id) {
            if other != link_id {
                warn!("{} is already joined over link {}", peer_id, other);
            }
            return false;
        }
        match self.links.get_mut(&link_id) {
            Some(link) if link.peer_id.is_none() => {
                link.peer_id = Some(peer_id);
                true
            }
            _ => false,
        }
    }

    /// The link a peer joined over, if it is still open.
    pub fn find_link_by_peer(&self, peer_id: &PeerId) -> Option<u32> {
        self.links
            .values()
            .find(|link| link.peer_id.as_ref() == Some(peer_id))
            .map(|link| link.id)
    }

    /// Looks up an open link by id.
    pub fn get(&self, link_id: u32) -> Option<&Link> {
        self.links.get(&link_id)
    }

    /// Links in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Link> {
        self.links.values()
    }

    /// Number of open links, joined or not.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_addr() -> SocketAddr {
        "127.0.0.1:8080".parse().unwrap()
    }

    fn test_addr2() -> SocketAddr {
        "127.0.0.1:8081".parse().unwrap()
    }

    fn queue() -> (mpsc::UnboundedSender<String>, mpsc::UnboundedReceiver<String>) {
        mpsc::unbounded_channel()
    }

    #[test]
    fn test_link_manager_creation() {
        let manager = LinkManager::new(5);
        assert_eq!(manager.max_links, 5);
        assert!(manager.is_empty());
        assert_eq!(manager.len(), 0);
    }

    #[test]
    fn test_add_multiple_links() {
        let mut manager = LinkManager::new(3);
        let (tx1, _rx1) = queue();
        let (tx2, _rx2) = queue();

        let link_id1 = manager.add_link(test_addr(), tx1).unwrap();
        let link_id2 = manager.add_link(test_addr2(), tx2).unwrap();

        assert_eq!(link_id1, 1);
        assert_eq!(link_id2, 2);
        assert_eq!(manager.len(), 2);
        assert_eq!(manager.get(link_id2).unwrap().addr, test_addr2());
    }

    #[test]
    fn test_add_link_max_capacity() {
        let mut manager = LinkManager::new(1);
        let (tx1, _rx1) = queue();
        let (tx2, _rx2) = queue();

        assert!(manager.add_link(test_addr(), tx1).is_some());
        assert!(manager.add_link(test_addr2(), tx2).is_none());
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn test_ids_are_not_reused() {
        let mut manager = LinkManager::new(2);
        let (tx1, _rx1) = queue();
        let (tx2, _rx2) = queue();

        let first = manager.add_link(test_addr(), tx1).unwrap();
        assert!(manager.remove_link(&first));
        let second = manager.add_link(test_addr(), tx2).unwrap();
        assert!(second > first);
    }

    #[test]
    fn test_remove_nonexistent_link() {
        let mut manager = LinkManager::new(2);
        assert!(!manager.remove_link(&999));
    }

    #[test]
    fn test_iteration_follows_registration_order() {
        let mut manager = LinkManager::new(4);
        let mut receivers = Vec::new();
        for port in [9003, 9001, 9002] {
            let (tx, rx) = queue();
            receivers.push(rx);
            manager.add_link(format!("127.0.0.1:{}", port).parse().unwrap(), tx);
        }

        let ports: Vec<u16> = manager.iter().map(|l| l.addr.port()).collect();
        assert_eq!(ports, vec![9003, 9001, 9002]);
    }

    #[test]
    fn test_bind_peer_once() {
        let mut manager = LinkManager::new(2);
        let (tx, _rx) = queue();
        let link_id = manager.add_link(test_addr(), tx).unwrap();

        assert!(manager.bind_peer(link_id, "p1".into()));
        assert!(!manager.bind_peer(link_id, "p2".into()));
        assert!(!manager.bind_peer(42, "p3".into()));
        assert_eq!(manager.find_link_by_peer(&"p1".into()), Some(link_id));
        assert_eq!(manager.find_link_by_peer(&"p2".into()), None);
    }

    #[test]
    fn test_peer_binds_to_one_link_only() {
        let mut manager = LinkManager::new(3);
        let (tx1, _rx1) = queue();
        let (tx2, _rx2) = queue();
        let first = manager.add_link(test_addr(), tx1).unwrap();
        let second = manager.add_link(test_addr2(), tx2).unwrap();

        assert!(manager.bind_peer(first, "p1".into()));
        assert!(!manager.bind_peer(second, "p1".into()));
        assert_eq!(manager.get(second).unwrap().peer_id, None);

        // Once the first link is gone the peer may join over another one
        assert!(manager.remove_link(&first));
        assert_eq!(manager.find_link_by_peer(&"p1".into()), None);
        assert!(manager.bind_peer(second, "p1".into()));
        assert_eq!(manager.find_link_by_peer(&"p1".into()), Some(second));
    }

    #[test]
    fn test_connected_at_is_set_on_open() {
        let before = Instant::now();
        let (tx, _rx) = queue();
        let link = Link::new(1, test_addr(), tx);

        assert!(link.connected_at >= before);
        assert!(link.connected_at.elapsed() < std::time::Duration::from_secs(5));
    }

    #[test]
    fn test_send_reports_closed_writer() {
        let (tx, mut rx) = queue();
        let link = Link::new(1, test_addr(), tx);

        assert!(link.send("hello".to_string()));
        assert_eq!(rx.try_recv().unwrap(), "hello");

        drop(rx);
        assert!(!link.send("again".to_string()));
    }
}
