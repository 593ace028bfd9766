//! Main and side pot construction.
//!
//! Contributions are layered at every distinct contribution level. Each layer
//! is contested by the non-folded players who reached it, so a short all-in
//! player can only win chips matched against their own stack. Adjacent layers
//! with the same contestants collapse into a single pot, and a layer reached by
//! exactly one live player is an uncalled bet that goes straight back to them.

use crate::hand::Score;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pot {
    pub amount: u32,
    /// Seats that may win this pot
    pub eligible: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PotManager {
    pots: Vec<Pot>,
}

impl PotManager {
    /// Pots for a hand where nobody folded.
    pub fn from_contributions(contributions: &[u32]) -> Self {
        Self::new(contributions, &vec![false; contributions.len()])
    }

    /// Pots from per-seat hand contributions; folded seats pay in but are
    /// never eligible.
    pub fn new(contributions: &[u32], folded: &[bool]) -> Self {
        let mut levels: Vec<u32> = contributions.iter().copied().filter(|&c| c > 0).collect();
        levels.sort_unstable();
        levels.dedup();

        let mut pots: Vec<Pot> = Vec::new();
        // chips from layers nobody live reached, waiting for a pot
        let mut orphaned = 0u32;
        let mut prev = 0u32;
        for level in levels {
            let amount: u32 = contributions
                .iter()
                .map(|&c| c.min(level) - c.min(prev))
                .sum();
            let eligible: Vec<usize> = contributions
                .iter()
                .enumerate()
                .filter(|&(i, &c)| c >= level && !folded.get(i).copied().unwrap_or(false))
                .map(|(i, _)| i)
                .collect();
            prev = level;

            if eligible.is_empty() {
                match pots.last_mut() {
                    Some(last) => last.amount += amount,
                    None => orphaned += amount,
                }
                continue;
            }
            let amount = amount + std::mem::take(&mut orphaned);
            match pots.last_mut() {
                Some(last) if last.eligible == eligible => last.amount += amount,
                _ => pots.push(Pot { amount, eligible }),
            }
        }
        Self { pots }
    }

    pub fn pots(&self) -> &[Pot] {
        &self.pots
    }

    pub fn main_pot(&self) -> u32 {
        self.pots.first().map_or(0, |p| p.amount)
    }

    pub fn side_pots(&self) -> Vec<u32> {
        self.pots.iter().skip(1).map(|p| p.amount).collect()
    }

    pub fn total(&self) -> u32 {
        self.pots.iter().map(|p| p.amount).sum()
    }

    /// Chips won per seat. `scores[seat]` is the seat's showdown score (`None`
    /// for seats without one), and `odd_chip_order` lists seats in the order
    /// that receives indivisible chips, normally clockwise from the button.
    /// A pot whose eligible players have no scores is split among them evenly,
    /// which is how an uncontested pot is awarded.
    pub fn distribute(&self, scores: &[Option<Score>], odd_chip_order: &[usize]) -> Vec<u32> {
        let seats = scores.len().max(odd_chip_order.len());
        let mut payouts = vec![0u32; seats];
        for pot in &self.pots {
            let best = pot
                .eligible
                .iter()
                .filter_map(|&i| scores.get(i).copied().flatten())
                .max();
            let winners: Vec<usize> = pot
                .eligible
                .iter()
                .copied()
                .filter(|&i| best.is_none() || scores.get(i).copied().flatten() == best)
                .collect();
            if winners.is_empty() {
                continue;
            }
            let share = pot.amount / winners.len() as u32;
            let mut odd = pot.amount % winners.len() as u32;
            for &w in &winners {
                if let Some(slot) = payouts.get_mut(w) {
                    *slot += share;
                }
            }
            for seat in odd_chip_order.iter().filter(|s| winners.contains(*s)) {
                if odd == 0 {
                    break;
                }
                if let Some(slot) = payouts.get_mut(*seat) {
                    *slot += 1;
                }
                odd -= 1;
            }
        }
        payouts
    }
}
