use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use holdem_engine::config::TableConfig;
use holdem_engine::errors::GameError;
use holdem_engine::game::{GameState, Street};
use holdem_engine::player::{Player, PlayerAction as A, Position};
use holdem_engine::rules::ActionKind;

fn table(players: usize, stack: u32, seed: u64) -> TableConfig {
    TableConfig {
        players,
        starting_stack: stack,
        small_blind: 1,
        big_blind: 2,
        seed: Some(seed),
    }
}

#[test]
fn three_handed_table_starts_preflop_with_blinds_posted() {
    let state = GameState::make(3, 200, 1, 2).unwrap();
    assert_eq!(state.pot(), 3);
    assert_eq!(state.active_bet(), 2);
    assert_eq!(state.street(), Street::Preflop);
    assert_eq!(state.players().len(), 3);
    assert!(state.players().iter().all(|p| p.pocket().is_some()));
    assert_eq!(state.player_turn(), Some(0));
    let positions: Vec<Position> = state.players().iter().map(Player::position).collect();
    assert_eq!(
        positions,
        vec![Position::Button, Position::SmallBlind, Position::BigBlind]
    );
    assert_eq!(state.deck_remaining(), 46);
}

#[test]
fn invalid_tables_are_rejected() {
    assert!(matches!(
        GameState::make(1, 200, 1, 2),
        Err(GameError::InvalidTable(_))
    ));
    assert!(matches!(
        GameState::make(11, 200, 1, 2),
        Err(GameError::InvalidTable(_))
    ));
    assert!(matches!(
        GameState::make(3, 200, 0, 2),
        Err(GameError::InvalidTable(_))
    ));
    assert!(matches!(
        GameState::make(3, 0, 1, 2),
        Err(GameError::InvalidTable(_))
    ));
}

#[test]
fn tables_whose_chips_overflow_the_pot_are_rejected() {
    assert!(matches!(
        GameState::make_with_config(&table(3, 2_000_000_000, 1)),
        Err(GameError::InvalidTable(_))
    ));
    let deep = vec![
        Player::new(0, "Player 1", u32::MAX),
        Player::new(1, "Player 2", 1),
    ];
    assert!(matches!(
        GameState::with_players(deep, 0, 1, 2, holdem_engine::deck::Deck::new(Some(1)), 1),
        Err(GameError::InvalidTable(_))
    ));

    let max_even = u32::MAX / 2;
    let state = GameState::make_with_config(&table(2, max_even, 4)).unwrap();
    let state = state.apply_action(A::Raise(max_even - 1)).unwrap();
    let state = state.apply_action(A::Call).unwrap();
    assert!(state.is_complete());
    assert_eq!(state.total_chips(), max_even * 2);
}

#[test]
fn streets_progress_when_everyone_checks() {
    let mut state = GameState::make_with_config(&table(3, 200, 11)).unwrap();
    state = state.apply_action(A::Call).unwrap();
    state = state.apply_action(A::Call).unwrap();
    // big blind has the option
    assert_eq!(state.player_turn(), Some(2));
    assert_eq!(
        state.available_actions(),
        vec![ActionKind::Check, ActionKind::Raise, ActionKind::Fold]
    );
    state = state.apply_action(A::Check).unwrap();
    assert_eq!(state.street(), Street::Flop);
    assert_eq!(state.board().len(), 3);
    assert_eq!(state.active_bet(), 0);
    assert_eq!(state.deck_remaining(), 52 - 6 - 3);
    // small blind opens postflop
    assert_eq!(state.player_turn(), Some(1));

    for (street, board) in [(Street::Turn, 4), (Street::River, 5)] {
        for _ in 0..3 {
            state = state.apply_action(A::Check).unwrap();
        }
        assert_eq!(state.street(), street);
        assert_eq!(state.board().len(), board);
    }
    for _ in 0..3 {
        state = state.apply_action(A::Check).unwrap();
    }
    assert!(state.is_complete());
    assert_eq!(state.player_turn(), None);
    let outcome = state.outcome().unwrap();
    assert_eq!(outcome.showdown.len(), 3);
    assert_eq!(outcome.payouts.iter().sum::<u32>(), 6);
}

#[test]
fn fold_to_one_player_ends_without_dealing() {
    let state = GameState::make(3, 200, 1, 2).unwrap();
    let state = state.apply_action(A::Fold).unwrap();
    let state = state.apply_action(A::Fold).unwrap();
    assert!(state.is_complete());
    assert_eq!(state.winners(), Some(&[2][..]));
    assert!(state.board().is_empty());
    assert_eq!(state.deck_remaining(), 46);
    assert_eq!(state.players()[2].stack(), 201);
    assert!(state.outcome().unwrap().showdown.is_empty());
}

#[test]
fn heads_up_button_acts_first_preflop_and_last_after() {
    let state = GameState::make_with_config(&table(2, 100, 5)).unwrap();
    assert_eq!(state.players()[0].position(), Position::Button);
    assert_eq!(state.players()[0].round_contribution(), 1);
    assert_eq!(state.players()[1].round_contribution(), 2);
    assert_eq!(state.player_turn(), Some(0));
    let state = state.apply_action(A::Call).unwrap();
    assert_eq!(state.player_turn(), Some(1));
    let state = state.apply_action(A::Check).unwrap();
    assert_eq!(state.street(), Street::Flop);
    assert_eq!(state.player_turn(), Some(1));
}

#[test]
fn all_in_and_call_runs_the_board_out() {
    let state = GameState::make_with_config(&table(2, 100, 9)).unwrap();
    let state = state.apply_action(A::Raise(99)).unwrap();
    assert!(state.players()[0].is_all_in());
    let state = state.apply_action(A::Call).unwrap();
    assert!(state.is_complete());
    assert_eq!(state.board().len(), 5);
    assert_eq!(state.street(), Street::River);
    assert_eq!(state.outcome().unwrap().showdown.len(), 2);
    assert_eq!(state.total_chips(), 200);
}

#[test]
fn raise_reopens_action_for_earlier_callers() {
    let state = GameState::make(3, 200, 1, 2).unwrap();
    let state = state.apply_action(A::Call).unwrap();
    let state = state.apply_action(A::Call).unwrap();
    let state = state.apply_action(A::Raise(6)).unwrap();
    assert_eq!(state.street(), Street::Preflop);
    assert_eq!(state.active_bet(), 8);
    assert_eq!(state.player_turn(), Some(0));
    assert_eq!(state.to_call(0), 6);
}

fn random_action(state: &GameState, rng: &mut ChaCha20Rng) -> A {
    let legal = state.available_actions();
    match legal[rng.random_range(0..legal.len())] {
        ActionKind::Check => A::Check,
        ActionKind::Call => A::Call,
        ActionKind::Fold => A::Fold,
        ActionKind::Raise => {
            let (min, max) = state.raise_range().unwrap();
            A::Raise(rng.random_range(min..=max))
        }
    }
}

fn assert_consistent(state: &GameState) {
    let committed: u32 = state.players().iter().map(Player::hand_contribution).sum();
    assert_eq!(state.pot(), committed);
    if let Some(turn) = state.player_turn() {
        let highest = state
            .players()
            .iter()
            .filter(|p| p.is_live())
            .map(Player::round_contribution)
            .max()
            .unwrap();
        if state.street() == Street::Preflop {
            // a short big blind leaves the full blind to match
            assert_eq!(state.active_bet(), highest.max(state.blinds().1));
        } else {
            assert_eq!(state.active_bet(), highest);
        }
        assert!(state.players()[turn].can_act());
        assert!(!state.available_actions().is_empty());
    }
    assert_eq!(state.board().len(), state.street().board_len());
}

#[test]
fn random_legal_play_keeps_invariants_and_conserves_chips() {
    for seed in 0..200u64 {
        let players = 2 + (seed % 9) as usize;
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let mut state = GameState::make_with_config(&table(players, 100, seed)).unwrap();
        let total = state.total_chips();
        for _hand in 0..5 {
            assert_consistent(&state);
            let mut steps = 0;
            while !state.is_complete() {
                let action = random_action(&state, &mut rng);
                let before = (state.street(), state.active_bet());
                state = state.apply_action(action).unwrap();
                assert_consistent(&state);
                if !state.is_complete() && state.street() == before.0 {
                    assert!(
                        state.active_bet() >= before.1,
                        "active bet fell from {} to {} on the {}",
                        before.1,
                        state.active_bet(),
                        before.0
                    );
                }
                assert_eq!(state.total_chips(), total);
                steps += 1;
                assert!(steps < 500, "hand did not terminate");
            }
            let stacks: u32 = state.players().iter().map(Player::stack).sum();
            assert_eq!(stacks, total);
            match state.reset() {
                Ok(next) => state = next,
                Err(GameError::InsufficientPlayers { available }) => {
                    assert_eq!(available, 1);
                    break;
                }
                Err(e) => panic!("unexpected reset error: {}", e),
            }
        }
    }
}
