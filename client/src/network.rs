use log::{debug, error, info, warn};
use shared::{
    deliver_after, Action, Dispatch, GameRules, LandingEffect, PeerId, Player, SessionEvent,
};
use std::error::Error;
use tokio::net::ToSocketAddrs;
use tokio::sync::mpsc;

use crate::link::{HostLink, LinkEvent};
use crate::router::ClientRouter;

pub struct Client {
    router: ClientRouter,
    link_events: mpsc::UnboundedReceiver<LinkEvent>,
    player: Player,
}

impl Client {
    pub async fn connect<A: ToSocketAddrs>(
        addr: A,
        name: &str,
        rules: &GameRules,
    ) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let (link, link_events) = HostLink::connect(addr).await?;

        let own_id = PeerId::generate();
        let player = Player::new(own_id.clone(), name, rules.starting_money);

        Ok(Client {
            router: ClientRouter::new(own_id, None, link, rules),
            link_events,
            player,
        })
    }

    pub fn own_id(&self) -> &PeerId {
        &self.player.peer_id
    }

    /// Joins the host's game and runs until the link or `local_actions`
    /// closes.
    pub async fn run(
        self,
        mut local_actions: mpsc::UnboundedReceiver<Action>,
        events: mpsc::UnboundedSender<SessionEvent>,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        let Client {
            mut router,
            mut link_events,
            player,
        } = self;

        info!("Joining as {} ({})", player.name, player.peer_id);
        router.dispatch(Action::JoinGame(player))?;

        let (delayed_tx, mut delayed_rx) = mpsc::unbounded_channel::<Action>();
        let emit = |event: SessionEvent| {
            if events.send(event).is_err() {
                debug!("No listener for session events");
            }
        };

        loop {
            tokio::select! {
                event = link_events.recv() => {
                    match event {
                        Some(LinkEvent::Received(action)) => {
                            if let Some(snapshot) = router.on_link_action(action) {
                                emit(SessionEvent::StateChanged(snapshot));
                            }
                            for effect in router.take_landing_effects() {
                                if let LandingEffect::Rent { delay, .. } = &effect {
                                    if let Some(action) = effect.rent_action() {
                                        deliver_after(*delay, action, delayed_tx.clone());
                                    }
                                }
                                emit(SessionEvent::Landing(effect));
                            }
                        }
                        Some(LinkEvent::Closed) | None => {
                            warn!("Host link closed");
                            emit(SessionEvent::Disconnected);
                            break;
                        }
                    }
                }
                action = local_actions.recv() => {
                    match action {
                        Some(action) => {
                            if let Err(e) = router.dispatch(action) {
                                error!("Failed to submit action: {}", e);
                            }
                        }
                        None => {
                            info!("Client input closed, leaving");
                            break;
                        }
                    }
                }
                Some(action) = delayed_rx.recv() => {
                    if let Err(e) = router.dispatch(action) {
                        error!("Failed to submit rent payment: {}", e);
                    }
                }
            }
        }

        Ok(())
    }
}
