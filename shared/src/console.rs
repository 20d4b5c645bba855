//! Minimal text front end for the host and client binaries.
//!
//! It only translates typed commands into actions and session events into
//! text; turn checks mirror what a graphical front end would do before
//! submitting.

use log::debug;
use std::str::FromStr;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::dispatch::{SessionEvent, SessionIdentity};
use crate::landing::{LandingEffect, QuizOffer, QuizOutcome};
use crate::model::{GameState, GameStatus, PeerId};
use crate::protocol::Action;
use crate::snapshot::Snapshot;

pub const HELP: &str = "commands: start | roll | end | answer <n> [buy] | state | help | quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Roll,
    End,
    /// `choice` is zero-based; the user types the one-based option number.
    Answer { choice: usize, buy: bool },
    State,
    Help,
    Quit,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command '{0}', type 'help'")]
    Unknown(String),
    #[error("usage: answer <option number> [buy]")]
    BadAnswer,
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let command = match words.next() {
            Some(word) => word.to_ascii_lowercase(),
            None => return Err(CommandError::Unknown(String::new())),
        };

        match command.as_str() {
            "start" => Ok(Command::Start),
            "roll" => Ok(Command::Roll),
            "end" => Ok(Command::End),
            "state" => Ok(Command::State),
            "help" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            "answer" => {
                let number: usize = words
                    .next()
                    .and_then(|w| w.parse().ok())
                    .ok_or(CommandError::BadAnswer)?;
                if number == 0 {
                    return Err(CommandError::BadAnswer);
                }
                let buy = matches!(words.next(), Some(w) if w.eq_ignore_ascii_case("buy"));
                Ok(Command::Answer {
                    choice: number - 1,
                    buy,
                })
            }
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Reply {
    pub action: Option<Action>,
    pub message: Option<String>,
    pub quit: bool,
}

impl Reply {
    fn send(action: Action) -> Self {
        Self {
            action: Some(action),
            ..Self::default()
        }
    }

    fn say(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }
}

pub struct Console {
    identity: SessionIdentity,
    state: Snapshot,
    pending_quiz: Option<QuizOffer>,
}

impl Console {
    pub fn new(identity: SessionIdentity) -> Self {
        Self {
            identity,
            state: Snapshot::default(),
            pending_quiz: None,
        }
    }

    pub fn pending_quiz(&self) -> Option<&QuizOffer> {
        self.pending_quiz.as_ref()
    }

    /// Returns the text to show for a session event, if any.
    pub fn on_event(&mut self, event: SessionEvent) -> Option<String> {
        match event {
            SessionEvent::StateChanged(snapshot) => {
                let fresh = new_log_lines(&self.state, &snapshot);
                self.state = snapshot;
                if fresh.is_empty() {
                    None
                } else {
                    Some(fresh.join("\n"))
                }
            }
            SessionEvent::Landing(LandingEffect::Quiz(offer)) => {
                let mut text = format!(
                    "{} is for sale at ${}. Answer to unlock the purchase:\n{}",
                    offer.tile_name, offer.price, offer.question.question
                );
                for (i, option) in offer.question.options.iter().enumerate() {
                    text.push_str(&format!("\n  {}. {}", i + 1, option));
                }
                self.pending_quiz = Some(offer);
                Some(text)
            }
            SessionEvent::Landing(LandingEffect::Rent {
                tile_name, amount, ..
            }) => Some(format!(
                "You landed on {}. Paying ${} rent.",
                tile_name, amount
            )),
            SessionEvent::Disconnected => Some("Lost the link to the host.".to_string()),
        }
    }

    pub fn on_command(&mut self, command: Command) -> Reply {
        let own_id = &self.identity.own_id;
        match command {
            Command::Start if !self.identity.is_host() => {
                Reply::say("Only the host can start the game.")
            }
            Command::Start => Reply::send(Action::ResetGame),
            Command::Roll | Command::End => {
                if self.state.game_status != GameStatus::Playing {
                    Reply::say("The game is not running.")
                } else if !self.state.is_turn_of(own_id) {
                    Reply::say("It is not your turn.")
                } else if command == Command::Roll {
                    Reply::send(Action::RollDice)
                } else {
                    Reply::send(Action::EndTurn)
                }
            }
            Command::Answer { choice, buy } => match self.pending_quiz.take() {
                None => Reply::say("No question pending."),
                Some(offer) => match offer.answer(choice, buy) {
                    QuizOutcome::Correct { buy: Some(action) } => Reply {
                        action: Some(action),
                        message: Some(format!("Correct! {}", offer.question.fact)),
                        quit: false,
                    },
                    QuizOutcome::Correct { buy: None } => Reply::say(format!(
                        "Correct! {} You passed on {}.",
                        offer.question.fact, offer.tile_name
                    )),
                    QuizOutcome::Wrong { correct_answer } => {
                        Reply::say(format!("Wrong! The answer was: {}", correct_answer))
                    }
                },
            },
            Command::State => Reply::say(describe(&self.state, own_id)),
            Command::Help => Reply::say(HELP),
            Command::Quit => Reply {
                quit: true,
                ..Reply::default()
            },
        }
    }
}

/// Log lines in `next` that `previous` has not shown yet, oldest first.
/// Lines in `next` that `previous` has not shown yet, oldest first.
///
/// New lines are prepended and the log may drop its oldest lines, so the
/// already shown part of `next` is its longest tail that starts `previous`.
fn new_log_lines(previous: &GameState, next: &GameState) -> Vec<String> {
    let (prev, logs) = (&previous.logs, &next.logs);
    let overlap = (1..=logs.len().min(prev.len()))
        .rev()
        .find(|&k| logs[logs.len() - k..] == prev[..k])
        .unwrap_or(0);
    logs[..logs.len() - overlap].iter().rev().cloned().collect()
}

pub fn describe(state: &GameState, own_id: &PeerId) -> String {
    let mut text = format!(
        "status {:?}, dice {}+{}, version {}",
        state.game_status, state.dice.0, state.dice.1, state.version
    );
    for (index, player) in state.players.iter().enumerate() {
        let marker = if index == state.current_player_index {
            '>'
        } else {
            ' '
        };
        let you = if &player.peer_id == own_id { " (you)" } else { "" };
        let tile = state
            .tile(player.position)
            .map_or("?", |tile| tile.name.as_str());
        let owned: Vec<String> = state
            .properties_of(&player.peer_id)
            .into_iter()
            .filter_map(|id| state.tile(id).map(|t| t.name.clone()))
            .collect();
        text.push_str(&format!(
            "\n{} {}{}: ${} at {}{} owns [{}]",
            marker,
            player.name,
            you,
            player.money,
            tile,
            if player.is_jailed { " (jailed)" } else { "" },
            owned.join(", ")
        ));
    }
    if let Some(winner) = &state.winner {
        text.push_str(&format!("\nwinner: {}", winner));
    }
    text
}

/// Runs the console on stdin/stdout until `quit`, end of input, or the
/// session stops sending events.
pub async fn run_console(
    identity: SessionIdentity,
    mut events: mpsc::UnboundedReceiver<SessionEvent>,
    actions: mpsc::UnboundedSender<Action>,
) {
    let mut console = Console::new(identity);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("{}", HELP);

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(event) => {
                    if let Some(text) = console.on_event(event) {
                        println!("{}", text);
                    }
                }
                None => break,
            },
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) | Err(_) => break,
                };
                if line.trim().is_empty() {
                    continue;
                }
                let reply = match line.parse::<Command>() {
                    Ok(command) => console.on_command(command),
                    Err(e) => Reply::say(e.to_string()),
                };
                if let Some(message) = reply.message {
                    println!("{}", message);
                }
                if let Some(action) = reply.action {
                    if actions.send(action).is_err() {
                        break;
                    }
                }
                if reply.quit {
                    break;
                }
            }
        }
    }
    debug!("Console closed");
}
