//! Win-rate ranking and stat rendering.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt::Write as _;

use crate::ids::UserId;
use crate::stats::{Counts, Outcomes, PlayerStat};

/// The win rate, counting draws as half a win.
///
/// Players without any games have no score.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn score(record: &Outcomes) -> Option<f64> {
    let games = record.games();
    if games == 0 {
        return None;
    }

    let points = record.wins() as f64 + 0.5 * record.draws() as f64;
    Some(points / games as f64)
}

/// One line of a leaderboard.
#[derive(Debug, Clone, Copy)]
pub struct Ranked<'a> {
    /// The displayed rank. Tied entries share a rank.
    pub rank: usize,
    pub player: UserId,
    pub record: &'a Outcomes,
    pub score: f64,
}

impl Ranked<'_> {
    fn ties_with(&self, other: &Self) -> bool {
        self.score == other.score && self.record.wins() == other.record.wins()
    }
}

/// Ranks players by score, then by raw wins.
///
/// The sort is stable, so full ties keep their input order. Players without
/// games are left out.
pub fn rank<'a, I>(entries: I) -> Vec<Ranked<'a>>
where
    I: IntoIterator<Item = (UserId, &'a Outcomes)>,
{
    let mut ranked: Vec<Ranked<'a>> = entries
        .into_iter()
        .filter_map(|(player, record)| {
            Some(Ranked {
                rank: 0,
                player,
                record,
                score: score(record)?,
            })
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.record.wins().cmp(&a.record.wins()))
    });

    // competition ranking: ties share a rank, the next entry skips ahead
    for index in 0..ranked.len() {
        ranked[index].rank = match index.checked_sub(1) {
            Some(prev) if ranked[index].ties_with(&ranked[prev]) => ranked[prev].rank,
            _ => index + 1,
        };
    }

    ranked
}

/// The label shown in front of a rank.
#[must_use]
pub fn rank_label(rank: usize) -> Cow<'static, str> {
    match rank {
        1 => Cow::Borrowed("\u{1F947}"),
        2 => Cow::Borrowed("\u{1F948}"),
        3 => Cow::Borrowed("\u{1F949}"),
        n => Cow::Owned(format!("`#{n}`")),
    }
}

fn write_record(out: &mut String, record: &Outcomes) {
    _ = write!(
        out,
        "{}W {}D {}L",
        record.wins(),
        record.draws(),
        record.losses()
    );
}

fn percent(record: &Outcomes) -> String {
    match score(record) {
        Some(score) => format!("{:.1}%", score * 100.0),
        None => "-".to_owned(),
    }
}

/// Renders a ranked leaderboard.
#[must_use]
pub fn render_leaderboard(ranked: &[Ranked<'_>]) -> String {
    if ranked.is_empty() {
        return "No games played yet.".to_owned();
    }

    let mut out = String::with_capacity(ranked.len() * 48);
    for entry in ranked {
        _ = write!(
            out,
            "{} {} **{:.1}%** (",
            rank_label(entry.rank),
            entry.player.mention(),
            entry.score * 100.0,
        );
        write_record(&mut out, entry.record);
        out.push_str(")\n");
    }

    out
}

/// Renders a player's duel record with a per-option breakdown and their
/// head-to-head records.
#[must_use]
pub fn render_duel_stats(player: UserId, stat: &PlayerStat<Outcomes>) -> String {
    let mut out = String::with_capacity(256);
    _ = write!(out, "{} **{}** (", player.mention(), percent(&stat.totals));
    write_record(&mut out, &stat.totals);
    out.push_str(")\n");

    for (label, counts) in [
        ("Wins", &stat.totals.win),
        ("Draws", &stat.totals.draw),
        ("Losses", &stat.totals.loss),
    ] {
        _ = write!(out, "-# {label}: ");
        write_counts(&mut out, counts);
        out.push('\n');
    }

    if !stat.versus.is_empty() {
        out.push_str("### Head-to-head\n");
        for (opponent, record) in &stat.versus {
            _ = write!(out, "vs {} **{}** (", opponent.mention(), percent(record));
            write_record(&mut out, record);
            out.push_str(")\n");
        }
    }

    out
}

/// Renders a player's tool counters and those against other users.
#[must_use]
pub fn render_tool_stats(player: UserId, stat: &PlayerStat<Counts>) -> String {
    let mut out = String::with_capacity(128);
    _ = write!(out, "{}: ", player.mention());
    write_counts(&mut out, &stat.totals);
    out.push('\n');

    for (other, counts) in &stat.versus {
        _ = write!(out, "-# with {}: ", other.mention());
        write_counts(&mut out, counts);
        out.push('\n');
    }

    out
}

fn write_counts(out: &mut String, counts: &Counts) {
    let mut first = true;
    for (key, value) in counts.iter() {
        if !first {
            out.push_str(", ");
        }

        first = false;
        _ = write!(out, "{key} {value}");
    }
}
