use serde::{Deserialize, Serialize};

use crate::errors::IllegalAction;
use crate::player::PlayerAction as A;

/// The shape of an action without its amount, as reported in the legal set.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    Check,
    Call,
    Raise,
    Fold,
}

/// An action resolved to the chips it moves from the player's stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidatedAction {
    Fold,
    Check,
    /// Chips put in to call; less than the amount owed when calling all-in.
    Call(u32),
    /// Chips put in by the raise, including the part that calls.
    Raise(u32),
}

/// Legal actions for a player holding `stack` chips who owes `to_call`.
///
/// Check only when nothing is owed, Call only when something is owed and the
/// player has chips, Raise only when the stack covers more than the call.
/// Fold is always available while the hand is live.
pub fn available_actions(stack: u32, to_call: u32) -> Vec<ActionKind> {
    let mut legal = Vec::with_capacity(3);
    if to_call == 0 {
        legal.push(ActionKind::Check);
    } else if stack > 0 {
        legal.push(ActionKind::Call);
    }
    if stack > to_call {
        legal.push(ActionKind::Raise);
    }
    legal.push(ActionKind::Fold);
    legal
}

/// Inclusive bounds on the chips a raise may put in.
///
/// The minimum calls and then raises by `min_increment` (the previous raise
/// size or the big blind, whichever is larger). A stack that cannot cover a
/// full raise may still go all-in, so the minimum is capped at the stack.
/// The maximum is the whole stack (no-limit).
///
/// # Examples
///
/// ```
/// use holdem_engine::rules::raise_range;
///
/// assert_eq!(raise_range(200, 2, 2), Some((4, 200)));
/// assert_eq!(raise_range(3, 2, 2), Some((3, 3)));
/// assert_eq!(raise_range(2, 2, 2), None);
/// ```
pub fn raise_range(stack: u32, to_call: u32, min_increment: u32) -> Option<(u32, u32)> {
    if stack <= to_call {
        return None;
    }
    let min = to_call.saturating_add(min_increment).min(stack);
    Some((min, stack))
}

/// Validates a player action against betting rules and stack size.
///
/// Converts a [`crate::player::PlayerAction`] into a [`ValidatedAction`]
/// without changing any state; rejected actions never touch the game.
///
/// # Errors
///
/// - [`IllegalAction::ActionNotAvailable`] - the action is not in the legal set
/// - [`IllegalAction::RaiseOutOfRange`] - the raise lies outside [`raise_range`]
///
/// # Examples
///
/// ```
/// use holdem_engine::rules::{validate_action, ValidatedAction};
/// use holdem_engine::player::PlayerAction;
///
/// let result = validate_action(1000, 50, 100, PlayerAction::Call);
/// assert!(matches!(result, Ok(ValidatedAction::Call(50))));
///
/// // Calling more than the stack goes all-in for less
/// let result = validate_action(30, 50, 100, PlayerAction::Call);
/// assert!(matches!(result, Ok(ValidatedAction::Call(30))));
/// ```
///
/// ```
/// use holdem_engine::rules::validate_action;
/// use holdem_engine::player::PlayerAction;
/// use holdem_engine::errors::IllegalAction;
///
/// // Check when facing a bet
/// let result = validate_action(1000, 50, 100, PlayerAction::Check);
/// assert!(matches!(result, Err(IllegalAction::ActionNotAvailable { .. })));
///
/// // Raise below minimum
/// let result = validate_action(1000, 50, 100, PlayerAction::Raise(60));
/// assert!(matches!(result, Err(IllegalAction::RaiseOutOfRange { min: 150, .. })));
/// ```
pub fn validate_action(
    stack: u32,
    to_call: u32,
    min_increment: u32,
    action: A,
) -> Result<ValidatedAction, IllegalAction> {
    let legal = available_actions(stack, to_call);
    let kind = action.kind();
    if !legal.contains(&kind) {
        return Err(IllegalAction::ActionNotAvailable {
            action: kind,
            legal,
        });
    }
    match action {
        A::Fold => Ok(ValidatedAction::Fold),
        A::Check => Ok(ValidatedAction::Check),
        A::Call => Ok(ValidatedAction::Call(to_call.min(stack))),
        A::Raise(amount) => {
            // Raise is in the legal set, so the range exists.
            let (min, max) = raise_range(stack, to_call, min_increment).unwrap_or((stack, stack));
            if amount < min || amount > max {
                Err(IllegalAction::RaiseOutOfRange { amount, min, max })
            } else {
                Ok(ValidatedAction::Raise(amount))
            }
        }
    }
}
