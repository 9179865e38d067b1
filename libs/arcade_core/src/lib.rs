//! Platform-independent core of the arcade bot.
//!
//! Holds the turn-based game state machines, the challenge handshake, the
//! statistics store and its leaderboards, as well as the one-shot tools.
//! Talking to the chat platform goes through the [`Messenger`] trait, and
//! reaction events are fed back in via [`Arcade::handle_reaction`].

pub mod arcade;
pub mod challenge;
pub mod collector;
pub mod duel;
pub mod emoji;
mod error;
pub mod games;
mod ids;
pub mod leaderboard;
pub mod messenger;
pub mod random;
pub mod stats;
#[cfg(test)]
mod testing;
pub mod tools;

pub use arcade::{Arcade, Settings};
pub use error::{BoxError, Error, Result};
pub use ids::{ChannelId, GuildId, MessageId, UserId};
pub use messenger::{MessageRef, Messenger, Post};
