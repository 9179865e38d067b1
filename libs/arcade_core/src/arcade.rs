//! The shared state every duel and tool runs against.

use std::sync::Arc;
use std::time::Duration;

use crate::challenge::Player;
use crate::collector::{Collectors, ReactionEvent};
use crate::duel::Duel;
use crate::error::Result;
use crate::games::GameKind;
use crate::ids::{ChannelId, GuildId, UserId};
use crate::leaderboard;
use crate::messenger::{MessageRef, Messenger, Post};
use crate::random::Dice;
use crate::stats::{StatRecord, StatsStore};
use crate::tools::ToolKind;

/// Timing knobs of the arcade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    /// How long an invitation waits for an answer.
    pub challenge_timeout: Duration,
    /// How long a player may take for a single move.
    pub move_timeout: Duration,
    /// How long rejection notices stay visible.
    pub notice_lifetime: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            challenge_timeout: Duration::from_secs(90),
            move_timeout: Duration::from_secs(300),
            notice_lifetime: Duration::from_millis(5000),
        }
    }
}

/// Owns the messenger, the stats and the reaction collectors.
pub struct Arcade<M> {
    messenger: M,
    stats: StatsStore,
    collectors: Arc<Collectors>,
    dice: Box<dyn Dice>,
    bot: UserId,
    settings: Settings,
}

impl<M: Messenger> Arcade<M> {
    /// Creates a new arcade.
    ///
    /// `bot` is the user id of the bot itself. It is the only automated
    /// participant that can be challenged.
    pub fn new(messenger: M, stats: StatsStore, dice: Box<dyn Dice>, bot: UserId, settings: Settings) -> Self {
        Self {
            messenger,
            stats,
            collectors: Collectors::new(),
            dice,
            bot,
            settings,
        }
    }

    pub fn messenger(&self) -> &M {
        &self.messenger
    }

    pub fn stats(&self) -> &StatsStore {
        &self.stats
    }

    pub fn collectors(&self) -> &Arc<Collectors> {
        &self.collectors
    }

    pub fn dice(&self) -> &dyn Dice {
        &*self.dice
    }

    pub fn bot(&self) -> UserId {
        self.bot
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Prepares a duel. Nothing is sent until [`Duel::challenge`] is called.
    pub fn duel(
        self: &Arc<Self>,
        kind: GameKind,
        channel: ChannelId,
        guild: GuildId,
        challenger: Player,
        opponent: Player,
    ) -> Duel<M> {
        Duel::new(Arc::clone(self), kind, channel, guild, challenger, opponent)
    }

    /// Feeds a reaction event from the platform to the collectors.
    ///
    /// Returns whether an active collector took it.
    pub fn handle_reaction(&self, event: ReactionEvent) -> bool {
        self.collectors.dispatch(event)
    }

    /// Deletes `message` once the notice lifetime has passed.
    pub(crate) fn expire_notice(self: &Arc<Self>, message: MessageRef) {
        let this = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep(this.settings.notice_lifetime).await;
            if let Err(why) = this.messenger.delete(message).await {
                log::warn!("Failed to delete notice {}: {why:?}", message.id);
            }
        });
    }

    /// Sends the leaderboard of a game, or a player's own stats for it.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the message cannot be sent.
    pub async fn send_leaderboard(
        &self,
        channel: ChannelId,
        guild: GuildId,
        kind: GameKind,
        player: Option<UserId>,
    ) -> Result<MessageRef> {
        if let Some(player) = player {
            return self.send_personal_stats(channel, guild, kind, player).await;
        }

        let description = self.stats.inspect(|root| {
            let Some(board) = root.board(guild, kind.code()) else {
                return leaderboard::render_leaderboard(&[]);
            };

            let entries = board
                .iter()
                .filter_map(|(&player, record)| Some((player, &record.as_duel()?.totals)));

            leaderboard::render_leaderboard(&leaderboard::rank(entries))
        });

        let post = Post::new(format!("{kind} Leaderboard"), description);
        self.messenger.send(channel, post).await
    }

    /// Sends a player's record in a game, including their head-to-heads.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the message cannot be sent.
    pub async fn send_personal_stats(
        &self,
        channel: ChannelId,
        guild: GuildId,
        kind: GameKind,
        player: UserId,
    ) -> Result<MessageRef> {
        let default = StatRecord::duel_default(kind.option_keys());
        let description = self.stats.inspect(|root| {
            let board = root.check_undefined(guild, kind.code(), Some(player), None, &default);
            match board.get(&player).and_then(StatRecord::as_duel) {
                Some(stat) => leaderboard::render_duel_stats(player, stat),
                None => format!("{} has no {} record.", player.mention(), kind.title()),
            }
        });

        let post = Post::new(format!("{kind} Stats"), description);
        self.messenger.send(channel, post).await
    }

    /// Sends a player's counters for a tool.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the message cannot be sent.
    pub async fn send_tool_stats(
        &self,
        channel: ChannelId,
        guild: GuildId,
        tool: ToolKind,
        player: UserId,
    ) -> Result<MessageRef> {
        let default = StatRecord::tool_default(tool.keys());
        let description = self.stats.inspect(|root| {
            let board = root.check_undefined(guild, tool.code(), Some(player), None, &default);
            match board.get(&player).and_then(StatRecord::as_tool) {
                Some(stat) => leaderboard::render_tool_stats(player, stat),
                None => format!("{} has no {} record.", player.mention(), tool.code()),
            }
        });

        let post = Post::new(format!("{} Stats", tool.title()), description);
        self.messenger.send(channel, post).await
    }
}

impl<M> std::fmt::Debug for Arcade<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Arcade")
            .field("stats", &self.stats)
            .field("collectors", &self.collectors)
            .field("bot", &self.bot)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
