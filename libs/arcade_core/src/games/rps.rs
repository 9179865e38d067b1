//! Rock-paper-scissors.

use super::{Outcome, Seat};
use crate::emoji;
use crate::random::Dice;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Rock = 0,
    Paper = 1,
    Scissors = 2,
}

impl Choice {
    pub const ALL: [Self; 3] = [Self::Rock, Self::Paper, Self::Scissors];

    #[must_use]
    pub fn index(self) -> u32 {
        self as u32
    }

    #[must_use]
    pub fn from_index(index: u32) -> Option<Self> {
        Self::ALL.get(usize::try_from(index).ok()?).copied()
    }

    /// Draws a choice uniformly at random.
    #[must_use]
    pub fn random(dice: &dyn Dice) -> Self {
        Self::from_index(dice.below(3)).unwrap_or(Self::Rock)
    }

    /// Whether this choice beats `other`.
    ///
    /// Each choice beats the one just before it, wrapping around.
    #[must_use]
    pub fn beats(self, other: Self) -> bool {
        self.index() == (other.index() + 1) % 3
    }

    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Rock => "rock",
            Self::Paper => "paper",
            Self::Scissors => "scissors",
        }
    }

    #[must_use]
    pub fn emoji(self) -> &'static str {
        match self {
            Self::Rock => emoji::ROCK,
            Self::Paper => emoji::PAPER,
            Self::Scissors => emoji::SCISSORS,
        }
    }

    #[must_use]
    pub fn from_emoji(text: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| emoji::equivalent(c.emoji(), text))
    }
}

/// A single round. Each side chooses once, in any order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rps {
    challenger: Option<Choice>,
    opponent: Option<Choice>,
}

impl Rps {
    fn slot(&mut self, seat: Seat) -> &mut Option<Choice> {
        match seat {
            Seat::Challenger => &mut self.challenger,
            Seat::Opponent => &mut self.opponent,
        }
    }

    #[must_use]
    pub fn choice(&self, seat: Seat) -> Option<Choice> {
        match seat {
            Seat::Challenger => self.challenger,
            Seat::Opponent => self.opponent,
        }
    }

    /// Records a choice. A seat that already chose cannot change its mind.
    pub fn choose(&mut self, seat: Seat, choice: Choice) -> bool {
        let slot = self.slot(seat);
        if slot.is_some() {
            return false;
        }

        *slot = Some(choice);
        true
    }

    #[must_use]
    pub fn determine_outcome(&self) -> Outcome<Seat> {
        let (Some(c), Some(o)) = (self.challenger, self.opponent) else {
            return Outcome::InProgress;
        };

        if c == o {
            Outcome::Draw
        } else if c.beats(o) {
            Outcome::Win(Seat::Challenger)
        } else {
            Outcome::Win(Seat::Opponent)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round(c: Choice, o: Choice) -> Outcome<Seat> {
        let mut rps = Rps::default();
        assert!(rps.choose(Seat::Challenger, c));
        assert!(rps.choose(Seat::Opponent, o));
        rps.determine_outcome()
    }

    #[test]
    fn beats_cycle() {
        use Choice::*;

        assert_eq!(round(Rock, Scissors), Outcome::Win(Seat::Challenger));
        assert_eq!(round(Paper, Rock), Outcome::Win(Seat::Challenger));
        assert_eq!(round(Scissors, Paper), Outcome::Win(Seat::Challenger));
        assert_eq!(round(Scissors, Rock), Outcome::Win(Seat::Opponent));
        assert_eq!(round(Rock, Paper), Outcome::Win(Seat::Opponent));
        assert_eq!(round(Paper, Scissors), Outcome::Win(Seat::Opponent));
    }

    #[test]
    fn equal_is_draw() {
        for c in Choice::ALL {
            assert_eq!(round(c, c), Outcome::Draw);
        }
    }

    #[test]
    fn order_does_not_matter() {
        let mut rps = Rps::default();
        assert!(rps.choose(Seat::Opponent, Choice::Scissors));
        assert_eq!(rps.determine_outcome(), Outcome::InProgress);
        assert!(rps.choose(Seat::Challenger, Choice::Rock));
        assert_eq!(rps.determine_outcome(), Outcome::Win(Seat::Challenger));
    }

    #[test]
    fn second_choice_ignored() {
        let mut rps = Rps::default();
        assert!(rps.choose(Seat::Challenger, Choice::Rock));
        assert!(!rps.choose(Seat::Challenger, Choice::Paper));
        assert_eq!(rps.choice(Seat::Challenger), Some(Choice::Rock));
    }

    #[test]
    fn from_emoji_ignores_variation_selector() {
        assert_eq!(Choice::from_emoji("\u{2702}"), Some(Choice::Scissors));
        assert_eq!(Choice::from_emoji("\u{2702}\u{FE0F}"), Some(Choice::Scissors));
        assert_eq!(Choice::from_emoji("\u{1F600}"), None);
    }
}
