//! Per-server player statistics.
//!
//! The layout is `guild -> game code -> player -> record`. Every level is
//! created on demand with [`StatsRoot::check_undefined`], so reading an entry
//! that was never written just yields zeroed counters.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::games::{Outcome, Seat};
use crate::ids::{GuildId, UserId};

mod store;

pub use store::{JsonFile, Persistence, StatsStore};

/// All records of one game on one server.
pub type Board = IndexMap<UserId, StatRecord>;

/// Counters keyed by a game-specific option, like `rock` or `x`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Counts(IndexMap<String, u64>);

impl Counts {
    /// Creates counters for the given keys, all at zero.
    #[must_use]
    pub fn zeroed(keys: &[&str]) -> Self {
        Self(keys.iter().map(|&k| (k.to_owned(), 0)).collect())
    }

    #[must_use]
    pub fn get(&self, key: &str) -> u64 {
        self.0.get(key).copied().unwrap_or(0)
    }

    /// Increments the counter for `key`, adding it if it is missing.
    pub fn bump(&mut self, key: &str) {
        match self.0.get_mut(key) {
            Some(count) => *count += 1,
            None => _ = self.0.insert(key.to_owned(), 1),
        }
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(k, &v)| (k.as_str(), v))
    }
}

/// Which column of a duel record a result goes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Win,
    Draw,
    Loss,
}

/// Win, draw and loss counters of a duel game.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcomes {
    pub win: Counts,
    pub draw: Counts,
    pub loss: Counts,
}

impl Outcomes {
    #[must_use]
    pub fn zeroed(keys: &[&str]) -> Self {
        let counts = Counts::zeroed(keys);
        Self {
            win: counts.clone(),
            draw: counts.clone(),
            loss: counts,
        }
    }

    #[must_use]
    pub fn wins(&self) -> u64 {
        self.win.total()
    }

    #[must_use]
    pub fn draws(&self) -> u64 {
        self.draw.total()
    }

    #[must_use]
    pub fn losses(&self) -> u64 {
        self.loss.total()
    }

    #[must_use]
    pub fn games(&self) -> u64 {
        self.wins() + self.draws() + self.losses()
    }

    pub fn category_mut(&mut self, category: Category) -> &mut Counts {
        match category {
            Category::Win => &mut self.win,
            Category::Draw => &mut self.draw,
            Category::Loss => &mut self.loss,
        }
    }
}

/// A player's own totals plus one entry per opponent they have faced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStat<T> {
    pub totals: T,
    #[serde(default)]
    pub versus: IndexMap<UserId, T>,
}

impl<T> PlayerStat<T> {
    fn new(totals: T) -> Self {
        Self {
            totals,
            versus: IndexMap::new(),
        }
    }
}

/// A stored record. Duels count outcomes, tools count plain uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatRecord {
    Duel(PlayerStat<Outcomes>),
    Tool(PlayerStat<Counts>),
}

impl StatRecord {
    /// The zeroed record for a duel with the given option keys.
    #[must_use]
    pub fn duel_default(keys: &[&str]) -> Self {
        Self::Duel(PlayerStat::new(Outcomes::zeroed(keys)))
    }

    /// The zeroed record for a tool with the given counter keys.
    #[must_use]
    pub fn tool_default(keys: &[&str]) -> Self {
        Self::Tool(PlayerStat::new(Counts::zeroed(keys)))
    }

    #[must_use]
    pub fn as_duel(&self) -> Option<&PlayerStat<Outcomes>> {
        match self {
            Self::Duel(stat) => Some(stat),
            Self::Tool(_) => None,
        }
    }

    #[must_use]
    pub fn as_tool(&self) -> Option<&PlayerStat<Counts>> {
        match self {
            Self::Tool(stat) => Some(stat),
            Self::Duel(_) => None,
        }
    }

    /// Adds a head-to-head entry against `other`, if none exists yet.
    fn ensure_versus(&mut self, other: UserId, default: &Self) {
        match (self, default) {
            (Self::Duel(stat), Self::Duel(default)) => {
                stat.versus
                    .entry(other)
                    .or_insert_with(|| default.totals.clone());
            },
            (Self::Tool(stat), Self::Tool(default)) => {
                stat.versus
                    .entry(other)
                    .or_insert_with(|| default.totals.clone());
            },
            _ => log::warn!("Stat record kind mismatch, head-to-head vs {other} left out."),
        }
    }
}

/// One side of a finished duel.
#[derive(Debug, Clone, Copy)]
pub struct Standing<'a> {
    pub player: UserId,
    /// The option the player played, used as the counter key.
    pub key: &'a str,
}

/// A finished duel, ready to be credited.
#[derive(Debug, Clone, Copy)]
pub struct DuelResult<'a> {
    pub challenger: Standing<'a>,
    pub opponent: Standing<'a>,
    pub outcome: Outcome<Seat>,
}

impl DuelResult<'_> {
    fn category(&self, seat: Seat) -> Option<Category> {
        match self.outcome {
            Outcome::InProgress => None,
            Outcome::Draw => Some(Category::Draw),
            Outcome::Win(winner) if winner == seat => Some(Category::Win),
            Outcome::Win(_) => Some(Category::Loss),
        }
    }
}

/// The root of all statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatsRoot(IndexMap<GuildId, IndexMap<String, Board>>);

impl StatsRoot {
    /// Gets the board for a game, if anything was recorded for it yet.
    #[must_use]
    pub fn board(&self, guild: GuildId, code: &str) -> Option<&Board> {
        self.0.get(&guild)?.get(code)
    }

    /// Ensures the nested maps exist down to the given players.
    ///
    /// If both players are given, each player's head-to-head entry against the
    /// other is created as well. Every new leaf is a fresh clone of `default`.
    /// Existing records are never replaced.
    pub fn check_undefined(
        &mut self,
        guild: GuildId,
        code: &str,
        p1: Option<UserId>,
        p2: Option<UserId>,
        default: &StatRecord,
    ) -> &mut Board {
        let board = self
            .0
            .entry(guild)
            .or_default()
            .entry(code.to_owned())
            .or_default();

        for player in [p1, p2].into_iter().flatten() {
            board.entry(player).or_insert_with(|| default.clone());
        }

        if let (Some(p1), Some(p2)) = (p1, p2) {
            for (player, other) in [(p1, p2), (p2, p1)] {
                if let Some(record) = board.get_mut(&player) {
                    record.ensure_versus(other, default);
                }
            }
        }

        board
    }

    /// Credits both players of a finished duel.
    ///
    /// Each player's counters are keyed by the option they played themselves.
    /// Does nothing for an [`Outcome::InProgress`] result.
    pub fn record_duel(&mut self, guild: GuildId, code: &str, keys: &[&str], result: &DuelResult<'_>) {
        let default = StatRecord::duel_default(keys);
        let a = result.challenger;
        let b = result.opponent;
        let board = self.check_undefined(guild, code, Some(a.player), Some(b.player), &default);

        for (seat, me, other) in [(Seat::Challenger, a, b), (Seat::Opponent, b, a)] {
            let Some(category) = result.category(seat) else {
                return;
            };

            let Some(StatRecord::Duel(stat)) = board.get_mut(&me.player) else {
                log::warn!("Record of {} in `{code}` is not a duel record.", me.player);
                continue;
            };

            stat.totals.category_mut(category).bump(me.key);
            if let Some(versus) = stat.versus.get_mut(&other.player) {
                versus.category_mut(category).bump(me.key);
            }
        }
    }

    /// Increments a single tool counter.
    pub fn record_tool(&mut self, guild: GuildId, code: &str, keys: &[&str], user: UserId, key: &str) {
        let default = StatRecord::tool_default(keys);
        let board = self.check_undefined(guild, code, Some(user), None, &default);
        if let Some(StatRecord::Tool(stat)) = board.get_mut(&user) {
            stat.totals.bump(key);
        }
    }

    /// Increments a tool counter used by one player on another.
    ///
    /// `user` gets `user_key` bumped, `target` gets `target_key` bumped, both
    /// in their totals and in their head-to-head entry against each other.
    pub fn record_tool_pair(
        &mut self,
        guild: GuildId,
        code: &str,
        keys: &[&str],
        (user, user_key): (UserId, &str),
        (target, target_key): (UserId, &str),
    ) {
        let default = StatRecord::tool_default(keys);
        let board = self.check_undefined(guild, code, Some(user), Some(target), &default);

        for (me, other, key) in [(user, target, user_key), (target, user, target_key)] {
            if let Some(StatRecord::Tool(stat)) = board.get_mut(&me) {
                stat.totals.bump(key);
                if let Some(versus) = stat.versus.get_mut(&other) {
                    versus.bump(key);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests;
