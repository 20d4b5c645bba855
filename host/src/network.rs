//! Host network layer: accepts client links over TCP and runs the session loop

use log::{debug, error, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use shared::{
    deliver_after, pump_outbound, read_actions, Action, GameRules, GameState, LandingEffect,
    PeerId, Player, SessionEvent, Snapshot,
};
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::BufReader;
use tokio::net::{TcpListener, ToSocketAddrs};
use tokio::sync::{mpsc, RwLock};

use crate::authority::HostAuthority;
use crate::broadcast::{run_broadcaster, GameMessage};
use crate::dice::{Dice, RandomDice};
use crate::link_manager::LinkManager;
use crate::session::HostSession;

/// Messages sent from link tasks to the session loop
#[derive(Debug)]
pub enum ServerMessage {
    LinkOpened { link_id: u32 },
    ActionReceived { link_id: u32, action: Action },
    LinkClosed { link_id: u32 },
}

/// Hosts one game: owns the authority and every client link
pub struct HostServer<D: Dice = RandomDice<StdRng>> {
    listener: TcpListener,
    links: Arc<RwLock<LinkManager>>,
    session: HostSession<D>,
    host_player: Player,

    // Communication channels
    server_tx: mpsc::UnboundedSender<ServerMessage>,
    server_rx: mpsc::UnboundedReceiver<ServerMessage>,
    game_tx: mpsc::UnboundedSender<GameMessage>,
    game_rx: mpsc::UnboundedReceiver<GameMessage>,
}

impl HostServer {
    pub async fn bind<A: ToSocketAddrs>(
        addr: A,
        name: &str,
        rules: GameRules,
        max_links: usize,
    ) -> Result<Self, Box<dyn Error + Send + Sync>> {
        Self::with_dice(addr, name, rules, max_links, RandomDice::from_entropy()).await
    }
}

impl<D: Dice> HostServer<D> {
    /// Same as [`HostServer::bind`] with an explicit dice source.
    pub async fn with_dice<A: ToSocketAddrs>(
        addr: A,
        name: &str,
        rules: GameRules,
        max_links: usize,
        dice: D,
    ) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let listener = TcpListener::bind(addr).await?;
        info!("Host listening on {}", listener.local_addr()?);

        let own_id = PeerId::generate();
        let host_player = Player::new(own_id.clone(), name, rules.starting_money);

        let (server_tx, server_rx) = mpsc::unbounded_channel();
        let (game_tx, game_rx) = mpsc::unbounded_channel();
        let authority = HostAuthority::with_dice(GameState::default(), rules, dice);
        let session =
            HostSession::with_authority(own_id, authority, StdRng::from_entropy(), game_tx.clone());

        Ok(HostServer {
            listener,
            links: Arc::new(RwLock::new(LinkManager::new(max_links))),
            session,
            host_player,
            server_tx,
            server_rx,
            game_tx,
            game_rx,
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// The host's peer id, which clients know the session by.
    pub fn game_id(&self) -> &PeerId {
        &self.host_player.peer_id
    }

    /// Runs the session until `local_actions` closes.
    ///
    /// `local_actions` carries the host player's own submissions; state
    /// changes and the host player's landings are reported on `events`.
    pub async fn run(
        self,
        mut local_actions: mpsc::UnboundedReceiver<Action>,
        events: mpsc::UnboundedSender<SessionEvent>,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        let HostServer {
            listener,
            links,
            mut session,
            host_player,
            server_tx,
            mut server_rx,
            game_tx,
            game_rx,
        } = self;

        tokio::spawn(run_broadcaster(Arc::clone(&links), game_rx));
        tokio::spawn(accept_links(listener, Arc::clone(&links), server_tx));

        let (delayed_tx, mut delayed_rx) = mpsc::unbounded_channel::<Action>();
        let outputs = Outputs { events, delayed_tx };

        let joined = session.apply(Action::JoinGame(host_player));
        outputs.publish(&mut session, joined);
        info!("Session {} ready", session.identity().own_id);

        loop {
            tokio::select! {
                message = server_rx.recv() => {
                    match message {
                        Some(ServerMessage::LinkOpened { link_id }) => {
                            let snapshot = session.snapshot();
                            if let Err(e) = game_tx.send(GameMessage::SendSnapshot { link_id, snapshot }) {
                                error!("Failed to queue snapshot for link {}: {}", link_id, e);
                            }
                        }
                        Some(ServerMessage::ActionReceived { link_id, action }) => {
                            if let Action::JoinGame(player) = &action {
                                let mut links = links.write().await;
                                if !links.bind_peer(link_id, player.peer_id.clone()) {
                                    debug!("Link {} not bound to {}", link_id, player.peer_id);
                                }
                            }
                            let changed = session.handle_link_action(link_id, action);
                            outputs.publish(&mut session, changed);
                        }
                        Some(ServerMessage::LinkClosed { link_id }) => {
                            links.write().await.remove_link(&link_id);
                        }
                        None => {
                            error!("Link acceptor stopped");
                            break;
                        }
                    }
                }
                action = local_actions.recv() => {
                    match action {
                        Some(action) if action.is_sync() => {
                            warn!("Ignoring local SYNC_STATE, the host only produces snapshots");
                        }
                        Some(action) => {
                            let changed = session.apply(action);
                            outputs.publish(&mut session, changed);
                        }
                        None => {
                            info!("Host input closed, shutting down session");
                            break;
                        }
                    }
                }
                Some(action) = delayed_rx.recv() => {
                    let changed = session.apply(action);
                    outputs.publish(&mut session, changed);
                }
            }
        }

        Ok(())
    }
}

/// Where the session loop reports what happened.
struct Outputs {
    events: mpsc::UnboundedSender<SessionEvent>,
    delayed_tx: mpsc::UnboundedSender<Action>,
}

impl Outputs {
    fn publish<D: Dice>(&self, session: &mut HostSession<D>, changed: Option<Snapshot>) {
        if let Some(snapshot) = changed {
            self.emit(SessionEvent::StateChanged(snapshot));
        }
        for effect in session.take_landing_effects() {
            if let Some(action) = effect.rent_action() {
                if let LandingEffect::Rent { delay, .. } = &effect {
                    deliver_after(*delay, action, self.delayed_tx.clone());
                }
            }
            self.emit(SessionEvent::Landing(effect));
        }
    }

    fn emit(&self, event: SessionEvent) {
        if self.events.send(event).is_err() {
            debug!("No listener for session events");
        }
    }
}

/// Accepts links until the session loop goes away
async fn accept_links(
    listener: TcpListener,
    links: Arc<RwLock<LinkManager>>,
    server_tx: mpsc::UnboundedSender<ServerMessage>,
) {
    loop {
        let (stream, addr) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                error!("Error accepting link: {}", e);
                tokio::time::sleep(std::time::Duration::from_millis(10)).await;
                continue;
            }
        };

        let (read_half, write_half) = stream.into_split();
        let (out_tx, out_rx) = mpsc::unbounded_channel();

        let link_id = {
            let mut links = links.write().await;
            links.add_link(addr, out_tx)
        };
        let link_id = match link_id {
            Some(link_id) => link_id,
            None => {
                warn!("Refused link from {}: session full", addr);
                continue;
            }
        };

        tokio::spawn(pump_outbound(write_half, out_rx));
        if server_tx.send(ServerMessage::LinkOpened { link_id }).is_err() {
            break;
        }

        let link_tx = server_tx.clone();
        tokio::spawn(async move {
            let delivered = read_actions(BufReader::new(read_half), |action| {
                link_tx
                    .send(ServerMessage::ActionReceived { link_id, action })
                    .is_ok()
            })
            .await;
            debug!("Link {} delivered {} actions", link_id, delivered);
            let _ = link_tx.send(ServerMessage::LinkClosed { link_id });
        });
    }
    debug!("Link acceptor stopped");
}
