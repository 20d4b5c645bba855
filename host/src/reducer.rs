//! The transition function: `(state, action) -> state`.
//!
//! Every game rule lives here. Nothing in this module can fail; an action
//! that does not apply leaves the state exactly as it was, and bankruptcy is
//! a regular transition into `GAME_OVER`.

use log::debug;
use shared::{Action, GameRules, GameState, GameStatus, PeerId, Player, TileKind, PLAYER_COLORS};

use crate::dice::Dice;

pub const GAME_STARTED_LOG: &str = "Game started! Player 1 turn.";

/// Applies one action to `state` and returns the next state.
///
/// Randomness comes only from `dice`, so a scripted `Dice` makes the result
/// fully reproducible. Actions that do not apply return `state` unchanged;
/// the caller compares the result to decide whether anything happened.
pub fn reduce<D: Dice + ?Sized>(
    state: GameState,
    action: Action,
    rules: &GameRules,
    dice: &mut D,
) -> GameState {
    // GAME_OVER is terminal for everything but replication.
    if state.game_status == GameStatus::GameOver && !action.is_sync() {
        debug!("Ignoring {} after game over", action.tag());
        return state;
    }

    match action {
        Action::JoinGame(player) => join_game(state, player, rules),
        Action::ResetGame => reset_game(state, rules),
        Action::RollDice => roll_dice(state, rules, dice),
        Action::BuyProperty { tile_id } => buy_property(state, tile_id, rules),
        Action::PayRent { amount, to } => pay_rent(state, amount, &to, rules),
        Action::EndTurn => end_turn(state),
        Action::SyncState(next) => *next,
    }
}

/// Turn-based actions need a current player and a game that has not ended.
/// They apply in the lobby too.
fn in_play(state: &GameState) -> bool {
    state.game_status != GameStatus::GameOver && state.current_player().is_some()
}

fn push_log(state: &mut GameState, entry: String, rules: &GameRules) {
    state.logs.insert(0, entry);
    if let Some(capacity) = rules.log_capacity {
        state.logs.truncate(capacity);
    }
}

fn next_player_index(state: &GameState) -> usize {
    (state.current_player_index + 1) % state.players.len()
}

fn join_game(mut state: GameState, player: Player, rules: &GameRules) -> GameState {
    if state.player(&player.peer_id).is_some() {
        return state;
    }

    let color = PLAYER_COLORS[state.players.len() % PLAYER_COLORS.len()].to_string();
    let player = Player {
        color,
        ..Player::new(player.peer_id, player.name, rules.starting_money)
    };

    let entry = format!("{} joined the game.", player.name);
    state.players.push(player);
    push_log(&mut state, entry, rules);
    state
}

fn reset_game(mut state: GameState, rules: &GameRules) -> GameState {
    for player in &mut state.players {
        player.money = rules.starting_money;
        player.position = 0;
        player.is_jailed = false;
        player.jail_turns = 0;
    }
    if rules.reset_clears_ownership {
        for tile in &mut state.tiles {
            tile.owner_id = None;
        }
    }

    state.game_status = GameStatus::Playing;
    state.current_player_index = 0;
    state.dice = (1, 1);
    state.winner = None;
    state.logs = vec![GAME_STARTED_LOG.to_string()];
    state
}

fn roll_dice<D: Dice + ?Sized>(mut state: GameState, rules: &GameRules, dice: &mut D) -> GameState {
    if !in_play(&state) || state.tiles.is_empty() {
        return state;
    }

    let index = state.current_player_index;
    let (d1, d2) = dice.roll();
    state.dice = (d1, d2);

    let name = state.players[index].name.clone();

    if state.players[index].is_jailed {
        if d1 == d2 {
            let player = &mut state.players[index];
            player.is_jailed = false;
            player.jail_turns = 0;
            push_log(
                &mut state,
                format!("{} rolled doubles and got out of jail!", name),
                rules,
            );
        } else {
            state.players[index].jail_turns += 1;
            state.current_player_index = next_player_index(&state);
            push_log(&mut state, format!("{} stays in jail.", name), rules);
        }
        return state;
    }

    let total = usize::from(d1) + usize::from(d2);
    let old_position = state.players[index].position;
    let new_position = (old_position + total) % state.tiles.len();
    let mut money = state.players[index].money;

    if new_position < old_position {
        money += rules.pass_start_bonus;
        let start = state.tiles[0].name.clone();
        push_log(
            &mut state,
            format!(
                "{} passed {}! Collected ${}.",
                name, start, rules.pass_start_bonus
            ),
            rules,
        );
    }

    let tile = state.tiles[new_position].clone();
    push_log(
        &mut state,
        format!("{} rolled {} (moved to {}).", name, total, tile.name),
        rules,
    );

    match tile.kind {
        TileKind::Tax => {
            let amount = tile.price.unwrap_or(0);
            money -= amount;
            push_log(&mut state, format!("{} paid ${} tax.", name, amount), rules);
        }
        TileKind::Chance => {
            if dice.chance_grant() {
                money += rules.chance_grant;
                push_log(
                    &mut state,
                    format!(
                        "Chance: You won a sustainability grant! +${}",
                        rules.chance_grant
                    ),
                    rules,
                );
            } else {
                money -= rules.chance_fee;
                push_log(
                    &mut state,
                    format!("Chance: Carbon offset fee. -${}", rules.chance_fee),
                    rules,
                );
            }
        }
        // Property landings need player input and are requested separately.
        TileKind::Property | TileKind::Start | TileKind::Jail | TileKind::Parking => {}
    }

    let player = &mut state.players[index];
    player.position = new_position;
    player.money = money;
    state
}

fn buy_property(mut state: GameState, tile_id: usize, rules: &GameRules) -> GameState {
    if !in_play(&state) {
        return state;
    }
    let index = state.current_player_index;

    let (price, tile_name) = match state.tile(tile_id) {
        Some(tile) if tile.kind == TileKind::Property && !tile.is_owned() => {
            (tile.price.unwrap_or(0), tile.name.clone())
        }
        _ => return state,
    };
    if state.players[index].money < price {
        return state;
    }

    let buyer = &mut state.players[index];
    buyer.money -= price;
    let peer_id = buyer.peer_id.clone();
    let name = buyer.name.clone();
    state.tiles[tile_id].owner_id = Some(peer_id);

    push_log(
        &mut state,
        format!("{} bought {} for ${}.", name, tile_name, price),
        rules,
    );
    state
}

fn pay_rent(mut state: GameState, amount: i64, to: &PeerId, rules: &GameRules) -> GameState {
    if !in_play(&state) {
        return state;
    }
    let payer_index = state.current_player_index;
    let receiver_index = match state.player_index(to) {
        Some(index) => index,
        None => return state,
    };

    let payer_name = state.players[payer_index].name.clone();
    let receiver_name = state.players[receiver_index].name.clone();

    if state.players[payer_index].money < amount {
        state.game_status = GameStatus::GameOver;
        state.winner = Some(receiver_name.clone());
        push_log(
            &mut state,
            format!("{} went bankrupt! {} wins!", payer_name, receiver_name),
            rules,
        );
        return state;
    }

    state.players[payer_index].money -= amount;
    state.players[receiver_index].money += amount;
    push_log(
        &mut state,
        format!(
            "{} paid ${} rent to {}.",
            payer_name, amount, receiver_name
        ),
        rules,
    );
    state
}

fn end_turn(mut state: GameState) -> GameState {
    if !in_play(&state) {
        return state;
    }
    state.current_player_index = next_player_index(&state);
    state
}
