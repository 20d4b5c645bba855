//! Line-oriented plumbing for one peer link.
//!
//! Both ends of a link run the same two halves: a writer task that drains
//! an outbound queue of encoded lines, and a reader loop that decodes
//! inbound lines into actions.

use log::{debug, warn};
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::protocol::{decode_line, Action};

/// Writes queued lines until the queue closes or the peer goes away.
pub async fn pump_outbound<W: AsyncWrite + Unpin>(
    mut writer: W,
    mut outbound: mpsc::UnboundedReceiver<String>,
) {
    while let Some(mut line) = outbound.recv().await {
        line.push('\n');
        if let Err(e) = writer.write_all(line.as_bytes()).await {
            warn!("Link write failed: {}", e);
            return;
        }
    }
    if let Err(e) = writer.shutdown().await {
        debug!("Link shutdown failed: {}", e);
    }
}

/// Decodes inbound lines and hands each action to `deliver`.
///
/// Undecodable lines (unknown tags included) are dropped with a warning.
/// Stops at end of stream, on a read error, or when `deliver` returns
/// `false`. Returns the number of actions delivered.
pub async fn read_actions<R, F>(reader: R, mut deliver: F) -> usize
where
    R: AsyncBufRead + Unpin,
    F: FnMut(Action) -> bool,
{
    let mut lines = reader.lines();
    let mut delivered = 0;
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => match decode_line(&line) {
                Ok(action) => {
                    delivered += 1;
                    if !deliver(action) {
                        break;
                    }
                }
                Err(e) => warn!("Dropping inbound message: {}", e),
            },
            Ok(None) => break,
            Err(e) => {
                warn!("Link read failed: {}", e);
                break;
            }
        }
    }
    delivered
}

/// Feeds `action` back into a session after `delay`.
pub fn deliver_after(
    delay: Duration,
    action: Action,
    sink: mpsc::UnboundedSender<Action>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let tag = action.tag();
        if sink.send(action).is_err() {
            debug!("Session ended before delayed {} fired", tag);
        }
    })
}
