use holdem_engine::config::TableConfig;
use holdem_engine::errors::GameError;
use holdem_engine::game::{Board, GameState, Street, TableSnapshot};
use holdem_engine::player::{Player, PlayerAction as A, Position};

fn table(players: usize, seed: u64) -> TableConfig {
    TableConfig {
        players,
        starting_stack: 200,
        small_blind: 1,
        big_blind: 2,
        seed: Some(seed),
    }
}

#[test]
fn positions_follow_the_button_around_a_full_ring() {
    let state = GameState::make_with_config(&table(9, 1)).unwrap();
    let positions: Vec<Position> = state.players().iter().map(Player::position).collect();
    assert_eq!(
        positions,
        vec![
            Position::Button,
            Position::SmallBlind,
            Position::BigBlind,
            Position::Early,
            Position::Early,
            Position::Middle,
            Position::Middle,
            Position::Late,
            Position::Late,
        ]
    );
    assert_eq!(Position::Late.name(), "Late Position");
    assert_eq!(state.players()[3].name(), "Player 4");
}

#[test]
fn start_on_own_snapshot_changes_nothing() {
    let state = GameState::make_with_config(&table(4, 21)).unwrap();
    let state = state.apply_action(A::Raise(6)).unwrap();
    let state = state.apply_action(A::Call).unwrap();
    let snap = state.snapshot();
    let restarted = GameState::start(snap.clone()).unwrap();
    assert_eq!(restarted.snapshot(), snap);
    let again = GameState::start(restarted.snapshot()).unwrap();
    assert_eq!(again.snapshot(), snap);
}

#[test]
fn snapshot_survives_json() {
    let state = GameState::make_with_config(&table(3, 8)).unwrap();
    let state = state.apply_action(A::Call).unwrap();
    let json = serde_json::to_string(&state.snapshot()).unwrap();
    let back: TableSnapshot = serde_json::from_str(&json).unwrap();
    let resumed = GameState::start(back).unwrap();
    assert_eq!(resumed.snapshot(), state.snapshot());
    assert_eq!(resumed.player_turn(), Some(1));
}

#[test]
fn start_recomputes_pot_and_active_bet() {
    let state = GameState::make_with_config(&table(3, 2)).unwrap();
    let mut snap = state.snapshot();
    snap.pot = 999;
    snap.active_bet = 0;
    let fixed = GameState::start(snap).unwrap();
    assert_eq!(fixed.pot(), 3);
    assert_eq!(fixed.active_bet(), 2);
}

#[test]
fn start_rejects_a_missing_card() {
    let state = GameState::make_with_config(&table(3, 2)).unwrap();
    let mut snap = state.snapshot();
    snap.deck.pop();
    assert!(matches!(
        GameState::start(snap),
        Err(GameError::InvalidState(_))
    ));
}

#[test]
fn start_rejects_a_duplicated_card() {
    let state = GameState::make_with_config(&table(3, 2)).unwrap();
    let mut snap = state.snapshot();
    let first = snap.deck[0];
    snap.deck[1] = first;
    assert!(matches!(
        GameState::start(snap),
        Err(GameError::InvalidState(_))
    ));
}

#[test]
fn start_rejects_board_that_does_not_match_street() {
    let state = GameState::make_with_config(&table(3, 2)).unwrap();
    let mut snap = state.snapshot();
    let flop: Vec<_> = snap.deck.drain(..3).collect();
    snap.board = Board::from_cards(&flop).unwrap();
    // the street still says preflop
    assert!(matches!(
        GameState::start(snap.clone()),
        Err(GameError::InvalidState(_))
    ));
    snap.street = Street::Flop;
    assert!(GameState::start(snap).is_ok());
}

#[test]
fn replay_reproduces_the_hand() {
    let initial = GameState::make_with_config(&table(3, 99)).unwrap();
    let mut state = initial.clone();
    for action in [A::Raise(6), A::Call, A::Fold, A::Check, A::Raise(4), A::Call] {
        state = state.apply_action(action).unwrap();
    }
    assert_eq!(state.street(), Street::Turn);
    let replayed = GameState::replay(initial.snapshot(), state.history()).unwrap();
    assert_eq!(replayed.snapshot(), state.snapshot());
}

#[test]
fn replay_stops_on_an_out_of_turn_record() {
    let initial = GameState::make_with_config(&table(3, 99)).unwrap();
    let played = initial.apply_action(A::Call).unwrap();
    let mut history = played.history().to_vec();
    history[0].player_id = 2;
    assert!(GameState::replay(initial.snapshot(), &history)
        .unwrap_err()
        .is_illegal_action());
}

#[test]
fn actions_are_described_for_display() {
    let state = GameState::make(3, 200, 1, 2).unwrap();
    assert_eq!(state.describe_action(A::Call), "Player 1 calls 2");
    assert_eq!(state.describe_action(A::Raise(10)), "Player 1 raises to 10");
    assert_eq!(state.describe_action(A::Raise(200)), "Player 1 raises to 200 (all-in)");
    assert_eq!(state.describe_action(A::Fold), "Player 1 folds");
    let state = state.apply_action(A::Call).unwrap();
    let state = state.apply_action(A::Call).unwrap();
    let state = state.apply_action(A::Check).unwrap();
    assert_eq!(state.describe_action(A::Check), "Player 2 checks");
    assert_eq!(state.describe_action(A::Raise(4)), "Player 2 bets 4");
}
