//! One-shot commands that only count uses.

use crate::arcade::Arcade;
use crate::error::Result;
use crate::ids::{ChannelId, GuildId, UserId};
use crate::messenger::{Messenger, Post};

/// The tools on offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    Roll,
    Flip,
    Hug,
}

impl ToolKind {
    /// The short code used as the stats key.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Roll => "roll",
            Self::Flip => "flip",
            Self::Hug => "hug",
        }
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Roll => "\u{1F3B2} Roll",
            Self::Flip => "\u{1FA99} Flip",
            Self::Hug => "\u{1F917} Hug",
        }
    }

    /// The counters kept per user.
    #[must_use]
    pub fn keys(self) -> &'static [&'static str] {
        match self {
            Self::Roll => &["uses"],
            Self::Flip => &["heads", "tails"],
            Self::Hug => &["hugged", "hugged_by"],
        }
    }
}

/// Rolls a number from 1 to 100.
#[derive(Debug, Clone, Copy)]
pub struct Roll {
    pub channel: ChannelId,
    pub guild: GuildId,
    pub user: UserId,
}

impl Roll {
    /// Rolls, announces the result and counts the use.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the message cannot be sent or the stats not saved.
    pub async fn invoke<M: Messenger>(&self, arcade: &Arcade<M>) -> Result<u32> {
        const KIND: ToolKind = ToolKind::Roll;

        let value = arcade.dice().below(100) + 1;
        let post = Post::new(KIND.title(), format!("{} rolled **{value}**.", self.user.mention()));
        arcade.messenger().send(self.channel, post).await?;

        arcade.stats().update(|root| {
            root.record_tool(self.guild, KIND.code(), KIND.keys(), self.user, "uses");
        })?;

        Ok(value)
    }
}

/// A coin side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Heads,
    Tails,
}

impl Side {
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Heads => "heads",
            Self::Tails => "tails",
        }
    }
}

/// Number of distinct raw flip values. The raw value is shown as a fraction
/// in the footer.
const FLIP_RESOLUTION: u32 = 1_000_000;

/// Flips a coin.
#[derive(Debug, Clone, Copy)]
pub struct Flip {
    pub channel: ChannelId,
    pub guild: GuildId,
    pub user: UserId,
}

impl Flip {
    /// Flips, announces the side with the raw draw and counts it.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the message cannot be sent or the stats not saved.
    pub async fn invoke<M: Messenger>(&self, arcade: &Arcade<M>) -> Result<Side> {
        const KIND: ToolKind = ToolKind::Flip;

        let raw = arcade.dice().below(FLIP_RESOLUTION);
        let side = if raw >= FLIP_RESOLUTION / 2 {
            Side::Heads
        } else {
            Side::Tails
        };

        let post = Post::new(
            KIND.title(),
            format!("{} flipped **{}**.", self.user.mention(), side.key()),
        )
        .footer(format!("0.{raw:06}"));
        arcade.messenger().send(self.channel, post).await?;

        arcade.stats().update(|root| {
            root.record_tool(self.guild, KIND.code(), KIND.keys(), self.user, side.key());
        })?;

        Ok(side)
    }
}

/// Hugs another user, or yourself.
#[derive(Debug, Clone, Copy)]
pub struct Hug {
    pub channel: ChannelId,
    pub guild: GuildId,
    pub user: UserId,
    /// Without a target nothing happens.
    pub target: Option<UserId>,
}

impl Hug {
    /// Announces the hug and counts it for both sides.
    ///
    /// Returns whether anything happened.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the message cannot be sent or the stats not saved.
    pub async fn invoke<M: Messenger>(&self, arcade: &Arcade<M>) -> Result<bool> {
        const KIND: ToolKind = ToolKind::Hug;

        let Some(target) = self.target else {
            return Ok(false);
        };

        let text = if target == self.user {
            format!("{} hugs themself.", self.user.mention())
        } else {
            format!("{} hugs {}!", self.user.mention(), target.mention())
        };

        arcade.messenger().send(self.channel, Post::new(KIND.title(), text)).await?;

        arcade.stats().update(|root| {
            root.record_tool_pair(
                self.guild,
                KIND.code(),
                KIND.keys(),
                (self.user, "hugged"),
                (target, "hugged_by"),
            );
        })?;

        Ok(true)
    }
}
