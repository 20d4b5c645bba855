//! The client's one link to its host.

use log::{debug, info};
use shared::{encode_line, pump_outbound, read_actions, Action, DispatchError};
use tokio::io::BufReader;
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio::sync::mpsc;

#[derive(Debug)]
pub enum LinkEvent {
    Received(Action),
    Closed,
}

/// Sending side of the host link. Cloning it shares the same queue.
#[derive(Debug, Clone)]
pub struct HostLink {
    outbound: mpsc::UnboundedSender<String>,
}

impl HostLink {
    /// Opens the link and spawns its reader and writer tasks.
    ///
    /// Everything the host sends arrives on the returned receiver, followed
    /// by a single [`LinkEvent::Closed`] when the link goes away.
    pub async fn connect<A: ToSocketAddrs>(
        addr: A,
    ) -> std::io::Result<(Self, mpsc::UnboundedReceiver<LinkEvent>)> {
        let stream = TcpStream::connect(addr).await?;
        info!("Connected to host at {}", stream.peer_addr()?);

        let (read_half, write_half) = stream.into_split();
        let (outbound, outbound_rx) = mpsc::unbounded_channel();
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        tokio::spawn(pump_outbound(write_half, outbound_rx));
        tokio::spawn(async move {
            let delivered = read_actions(BufReader::new(read_half), |action| {
                events_tx.send(LinkEvent::Received(action)).is_ok()
            })
            .await;
            debug!("Host link delivered {} actions", delivered);
            let _ = events_tx.send(LinkEvent::Closed);
        });

        Ok((Self { outbound }, events_rx))
    }

    /// Wraps an existing outbound queue, for callers that manage the
    /// transport themselves.
    pub fn from_sender(outbound: mpsc::UnboundedSender<String>) -> Self {
        Self { outbound }
    }

    /// Queues `action` for the host. Nothing is retried.
    pub fn send(&self, action: &Action) -> Result<(), DispatchError> {
        let line = encode_line(action)?;
        self.outbound
            .send(line)
            .map_err(|_| DispatchError::LinkClosed)
    }
}
