//! Integration tests for a host and its clients
//!
//! These tests run real sessions over loopback TCP and check that every
//! participant ends up with the host's state.

use client::network::Client;
use host::dice::LoadedDice;
use host::network::HostServer;
use shared::{
    decode_line, encode_line, Action, GameRules, GameState, GameStatus, LandingEffect, Player,
    SessionEvent, Snapshot,
};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::time::timeout;

const WAIT: Duration = Duration::from_secs(3);

fn fast_rules() -> GameRules {
    GameRules {
        rent_delay_ms: 20,
        ..GameRules::default()
    }
}

struct Participant {
    actions: mpsc::UnboundedSender<Action>,
    events: mpsc::UnboundedReceiver<SessionEvent>,
}

impl Participant {
    fn submit(&self, action: Action) {
        self.actions.send(action).unwrap();
    }

    /// Waits for a snapshot matching `done` and returns it.
    async fn state_where(&mut self, done: impl Fn(&GameState) -> bool) -> Snapshot {
        loop {
            let event = timeout(WAIT, self.events.recv())
                .await
                .expect("timed out waiting for state")
                .expect("session ended");
            if let SessionEvent::StateChanged(snapshot) = event {
                if done(&*snapshot) {
                    return snapshot;
                }
            }
        }
    }

    async fn next_landing(&mut self) -> LandingEffect {
        loop {
            let event = timeout(WAIT, self.events.recv())
                .await
                .expect("timed out waiting for a landing")
                .expect("session ended");
            if let SessionEvent::Landing(effect) = event {
                return effect;
            }
        }
    }
}

async fn start_host(dice: LoadedDice) -> (Participant, SocketAddr, shared::PeerId) {
    let server = HostServer::with_dice("127.0.0.1:0", "Alice", fast_rules(), 4, dice)
        .await
        .unwrap();
    let addr = server.local_addr().unwrap();
    let game_id = server.game_id().clone();

    let (actions, actions_rx) = mpsc::unbounded_channel();
    let (events_tx, events) = mpsc::unbounded_channel();
    tokio::spawn(server.run(actions_rx, events_tx));

    (Participant { actions, events }, addr, game_id)
}

async fn start_client(addr: SocketAddr, name: &str) -> (Participant, shared::PeerId) {
    let client = Client::connect(addr, name, &fast_rules()).await.unwrap();
    let own_id = client.own_id().clone();

    let (actions, actions_rx) = mpsc::unbounded_channel();
    let (events_tx, events) = mpsc::unbounded_channel();
    tokio::spawn(client.run(actions_rx, events_tx));

    (Participant { actions, events }, own_id)
}

/// END-TO-END SESSION TESTS
mod session_tests {
    use super::*;

    /// Purchase on the host side, automatic rent on the client side
    #[tokio::test]
    async fn two_player_purchase_and_rent() {
        let (mut alice, addr, alice_id) = start_host(LoadedDice::new([(0, 1)])).await;
        let (mut bob, bob_id) = start_client(addr, "Bob").await;

        bob.state_where(|s| s.players.len() == 2).await;
        alice.state_where(|s| s.players.len() == 2).await;

        alice.submit(Action::ResetGame);
        alice.submit(Action::RollDice);

        let offer = match alice.next_landing().await {
            LandingEffect::Quiz(offer) => offer,
            other => panic!("Expected a quiz, got {:?}", other),
        };
        assert_eq!(offer.tile_id, 1);
        match offer.answer(offer.question.correct_index, true) {
            shared::QuizOutcome::Correct { buy: Some(buy) } => alice.submit(buy),
            other => panic!("Unexpected outcome {:?}", other),
        }
        let bought = alice
            .state_where(|s| s.tiles[1].owner_id.is_some())
            .await;
        assert_eq!(bought.player(&alice_id).unwrap().money, 1440);

        alice.submit(Action::EndTurn);
        bob.state_where(|s| s.is_turn_of(&bob_id)).await;
        bob.submit(Action::RollDice);

        match bob.next_landing().await {
            LandingEffect::Rent { amount, to, .. } => {
                assert_eq!(amount, 2);
                assert_eq!(to, alice_id);
            }
            other => panic!("Expected rent, got {:?}", other),
        }

        let paid = bob
            .state_where(|s| s.player(&bob_id).map(|p| p.money) == Some(1498))
            .await;
        assert_eq!(paid.player(&alice_id).unwrap().money, 1442);
        assert_eq!(paid.total_money(), 3000 - 60);
        assert_eq!(paid.logs[0], "Bob paid $2 rent to Alice.");

        let host_view = alice.state_where(|s| s.version == paid.version()).await;
        assert_eq!(*host_view, *paid);
    }

    /// Purchase on the client side, automatic rent on the host side
    #[tokio::test]
    async fn host_pays_rent_automatically() {
        let (mut alice, addr, alice_id) = start_host(LoadedDice::new([(0, 1)])).await;
        let (mut bob, bob_id) = start_client(addr, "Bob").await;

        alice.state_where(|s| s.players.len() == 2).await;
        alice.submit(Action::ResetGame);
        alice.submit(Action::EndTurn);
        bob.state_where(|s| s.is_turn_of(&bob_id)).await;
        bob.submit(Action::RollDice);

        let offer = match bob.next_landing().await {
            LandingEffect::Quiz(offer) => offer,
            other => panic!("Expected a quiz, got {:?}", other),
        };
        match offer.answer(offer.question.correct_index, true) {
            shared::QuizOutcome::Correct { buy: Some(buy) } => bob.submit(buy),
            other => panic!("Unexpected outcome {:?}", other),
        }
        bob.state_where(|s| s.tiles[1].owner_id.as_ref() == Some(&bob_id))
            .await;
        bob.submit(Action::EndTurn);

        let before = alice
            .state_where(|s| s.is_turn_of(&alice_id) && s.tiles[1].owner_id.is_some())
            .await;
        assert_eq!(before.player(&bob_id).unwrap().money, 1440);
        alice.submit(Action::RollDice);

        let rolled = alice
            .state_where(|s| s.player(&alice_id).map(|p| p.position) == Some(1))
            .await;
        assert_eq!(rolled.player(&alice_id).unwrap().money, 1500);

        match alice.next_landing().await {
            LandingEffect::Rent { amount, to, delay, .. } => {
                assert_eq!(amount, 2);
                assert_eq!(to, bob_id);
                assert_eq!(delay, Duration::from_millis(20));
            }
            other => panic!("Expected rent, got {:?}", other),
        }

        // Nobody submits PAY_RENT, the host session does it after the delay
        let paid = alice
            .state_where(|s| s.logs[0] == "Alice paid $2 rent to Bob.")
            .await;
        assert_eq!(paid.version(), rolled.version() + 1);
        assert_eq!(paid.player(&alice_id).unwrap().money, 1498);
        assert_eq!(paid.player(&bob_id).unwrap().money, 1442);

        let bob_view = bob.state_where(|s| s.version == paid.version()).await;
        assert_eq!(*bob_view, *paid);
    }

    /// Every client replica converges on the same snapshot
    #[tokio::test]
    async fn replicas_converge() {
        let (mut alice, addr, _) = start_host(LoadedDice::new([(2, 3)])).await;
        let (mut bob, _) = start_client(addr, "Bob").await;
        let (mut carol, _) = start_client(addr, "Carol").await;

        let host_view = alice.state_where(|s| s.players.len() == 3).await;
        alice.submit(Action::ResetGame);
        alice.submit(Action::RollDice);
        let host_view = alice
            .state_where(|s| s.version > host_view.version() && s.players[0].position == 5)
            .await;

        let bob_view = bob.state_where(|s| s.version == host_view.version()).await;
        let carol_view = carol.state_where(|s| s.version == host_view.version()).await;
        assert_eq!(*bob_view, *host_view);
        assert_eq!(*carol_view, *host_view);
        assert_eq!(host_view.game_status, GameStatus::Playing);
    }

    /// A client joining mid-game starts from the host's current state
    #[tokio::test]
    async fn late_joiner_catches_up() {
        let (mut alice, addr, alice_id) = start_host(LoadedDice::new([(1, 2)])).await;
        alice.submit(Action::ResetGame);
        alice.submit(Action::RollDice);
        let host_view = alice.state_where(|s| s.players[0].position == 3).await;

        let (mut dave, dave_id) = start_client(addr, "Dave").await;
        let first = dave.state_where(|_| true).await;
        assert_eq!(*first, *host_view);

        let joined = dave.state_where(|s| s.player(&dave_id).is_some()).await;
        assert_eq!(joined.players.len(), 2);
        assert_eq!(joined.player(&dave_id).unwrap().position, 0);
        assert_eq!(joined.player(&alice_id).unwrap().position, 3);
        assert_eq!(joined.game_status, GameStatus::Playing);
    }
}

/// RAW PROTOCOL TESTS
mod protocol_tests {
    use super::*;

    async fn raw_link(
        addr: SocketAddr,
    ) -> (
        tokio::io::Lines<BufReader<tokio::net::tcp::OwnedReadHalf>>,
        tokio::net::tcp::OwnedWriteHalf,
    ) {
        let stream = TcpStream::connect(addr).await.unwrap();
        let (read_half, write_half) = stream.into_split();
        (BufReader::new(read_half).lines(), write_half)
    }

    async fn next_state(
        lines: &mut tokio::io::Lines<BufReader<tokio::net::tcp::OwnedReadHalf>>,
    ) -> GameState {
        let line = timeout(WAIT, lines.next_line())
            .await
            .expect("timed out waiting for a line")
            .unwrap()
            .expect("link closed");
        match decode_line(&line).unwrap() {
            Action::SyncState(state) => *state,
            other => panic!("Host sent {:?}", other),
        }
    }

    /// Bad lines are dropped, the link stays usable
    #[tokio::test]
    async fn garbage_and_unknown_tags_are_dropped() {
        let (_alice, addr, _) = start_host(LoadedDice::default()).await;
        let (mut lines, mut writer) = raw_link(addr).await;
        let welcome = next_state(&mut lines).await;

        let mut join = encode_line(&Action::JoinGame(Player::new("raw".into(), "Raw", 0))).unwrap();
        join.push('\n');
        writer.write_all(b"hello\n").await.unwrap();
        writer
            .write_all(b"{\"type\":\"TELEPORT\",\"payload\":{\"to\":3}}\n")
            .await
            .unwrap();
        writer.write_all(join.as_bytes()).await.unwrap();

        let joined = next_state(&mut lines).await;
        assert_eq!(joined.version, welcome.version + 1);
        assert_eq!(joined.players[1].name, "Raw");
        assert_eq!(joined.players[1].money, 1500);
        assert_eq!(joined.logs[0], "Raw joined the game.");
    }

    /// A forged snapshot from a client is ignored by the host
    #[tokio::test]
    async fn client_snapshot_is_ignored() {
        let (_alice, addr, _) = start_host(LoadedDice::default()).await;
        let (mut lines, mut writer) = raw_link(addr).await;
        let welcome = next_state(&mut lines).await;

        let mut forged = welcome.clone();
        forged.version = 100;
        forged.players[0].money = 1_000_000;
        let mut line = encode_line(&Action::SyncState(Box::new(forged))).unwrap();
        line.push('\n');
        writer.write_all(line.as_bytes()).await.unwrap();

        let mut join = encode_line(&Action::JoinGame(Player::new("raw".into(), "Raw", 0))).unwrap();
        join.push('\n');
        writer.write_all(join.as_bytes()).await.unwrap();

        let next = next_state(&mut lines).await;
        assert_eq!(next.version, welcome.version + 1);
        assert_eq!(next.players[0].money, 1500);
    }
}
