use holdem_engine::cards::{full_deck, parse_cards};
use holdem_engine::deck::Deck;
use holdem_engine::errors::GameError;
use holdem_engine::game::GameState;
use holdem_engine::player::{Player, PlayerAction as A, Position};

fn stacked(top: &str) -> Deck {
    let top = parse_cards(top).unwrap();
    let mut cards = top.clone();
    cards.extend(full_deck().into_iter().filter(|c| !top.contains(c)));
    Deck::from_cards(cards)
}

fn seated(stacks: &[u32]) -> Vec<Player> {
    stacks
        .iter()
        .enumerate()
        .map(|(seat, &stack)| Player::new(seat, format!("Player {}", seat + 1), stack))
        .collect()
}

fn check_down(mut state: GameState) -> GameState {
    while !state.is_complete() {
        let action = if state.to_call(state.player_turn().unwrap()) > 0 {
            A::Call
        } else {
            A::Check
        };
        state = state.apply_action(action).unwrap();
    }
    state
}

#[test]
fn reset_rotates_button_and_carries_stacks() {
    let state = GameState::make(3, 200, 1, 2).unwrap();
    let state = state.apply_action(A::Fold).unwrap();
    let state = state.apply_action(A::Fold).unwrap();
    let next = state.reset().unwrap();

    assert_eq!(next.hand_number(), 1);
    assert_eq!(next.button(), 1);
    assert_eq!(next.players()[1].position(), Position::Button);
    assert_eq!(next.players()[2].position(), Position::SmallBlind);
    assert_eq!(next.players()[0].position(), Position::BigBlind);
    // stacks 200 / 199 / 201 before the new blinds
    assert_eq!(next.players()[0].stack(), 198);
    assert_eq!(next.players()[1].stack(), 199);
    assert_eq!(next.players()[2].stack(), 200);
    assert_eq!(next.player_turn(), Some(1));
    assert_eq!(next.pot(), 3);
    assert!(next.history().is_empty());
}

#[test]
fn reset_during_a_hand_is_rejected() {
    let state = GameState::make(3, 200, 1, 2).unwrap();
    assert!(matches!(state.reset(), Err(GameError::InvalidState(_))));
}

#[test]
fn busted_player_sits_out_next_hand() {
    // seats 1, 2, 0 dealt in turn: seat 1 AA, seat 2 QQ, seat 0 72
    let deck = stacked("As Qs 7c Ad Qd 2d 3h 8h 9c Jd Kc");
    let state = GameState::with_players(seated(&[10, 100, 100]), 0, 1, 2, deck, 5).unwrap();
    let state = state.apply_action(A::Raise(10)).unwrap();
    let state = check_down(state);
    assert_eq!(state.winners(), Some(&[1][..]));
    assert_eq!(state.players()[0].stack(), 0);

    let next = state.reset().unwrap();
    assert!(next.players()[0].pocket().is_none());
    assert!(!next.players()[0].is_live());
    assert_eq!(next.button(), 1);
    // heads-up between seats 1 and 2: button posts the small blind and acts first
    assert_eq!(next.players()[1].round_contribution(), 1);
    assert_eq!(next.players()[2].round_contribution(), 2);
    assert_eq!(next.player_turn(), Some(1));
    assert_eq!(next.deck_remaining(), 48);
}

#[test]
fn last_player_with_chips_cannot_be_dealt() {
    let deck = stacked("Ks As Kd Ad 2c 7d 9s Jh 4c");
    let state = GameState::with_players(seated(&[100, 100]), 0, 1, 2, deck, 5).unwrap();
    let state = state.apply_action(A::Raise(99)).unwrap();
    let state = state.apply_action(A::Call).unwrap();
    assert!(state.is_complete());
    assert_eq!(state.players()[1].stack(), 0);
    match state.reset() {
        Err(GameError::InsufficientPlayers { available }) => assert_eq!(available, 1),
        other => panic!("expected InsufficientPlayers, got {:?}", other.map(|s| s.hand_number())),
    }
}

#[test]
fn next_hand_deck_comes_from_table_seed() {
    let a = GameState::make_with_config(&holdem_engine::config::TableConfig {
        players: 4,
        starting_stack: 100,
        small_blind: 1,
        big_blind: 2,
        seed: Some(77),
    })
    .unwrap();
    let b = GameState::make_with_config(&holdem_engine::config::TableConfig {
        players: 4,
        starting_stack: 100,
        small_blind: 1,
        big_blind: 2,
        seed: Some(77),
    })
    .unwrap();
    assert_eq!(a.snapshot(), b.snapshot());

    let fold_out = |mut s: GameState| {
        while !s.is_complete() {
            s = s.apply_action(A::Fold).unwrap();
        }
        s.reset().unwrap()
    };
    let (a, b) = (fold_out(a), fold_out(b));
    assert_eq!(a.snapshot(), b.snapshot());
    assert_eq!(a.seed(), 77);
}
