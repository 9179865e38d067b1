use std::sync::Arc;

use anyhow::Result;
use arc_swap::ArcSwap;
use arcade_core::challenge::Player;
use arcade_core::collector::{ReactionEvent, ReactionKind};
use arcade_core::tools::{Flip, Hug, Roll};
use arcade_core::{Arcade, ChannelId, GuildId, MessageId, MessageRef, Messenger as _, UserId};
use serenity::all::{Context, EventHandler, Message, Reaction, ReactionType, Ready};

use crate::commands::{self, Command};
use crate::discord::DiscordMessenger;

pub struct ArcadeHandler {
    arcade: Arc<Arcade<DiscordMessenger>>,
    prefix: ArcSwap<String>,
}

impl ArcadeHandler {
    pub fn new(arcade: Arc<Arcade<DiscordMessenger>>, prefix: String) -> Self {
        Self {
            arcade,
            prefix: ArcSwap::from_pointee(prefix),
        }
    }

    async fn handle_message(&self, message: Message) -> Result<()> {
        if message.author.bot {
            return Ok(());
        }

        // only servers keep stats
        let Some(guild) = message.guild_id else {
            return Ok(());
        };

        let mentions: Vec<Player> = message
            .mentions
            .iter()
            .map(|u| Player {
                id: UserId(u.id.get()),
                bot: u.bot,
            })
            .collect();

        let prefix = self.prefix.load_full();
        let Some(command) = commands::parse(&message.content, &prefix, &mentions) else {
            return Ok(());
        };

        let channel = ChannelId(message.channel_id.get());
        let guild = GuildId(guild.get());
        let author = UserId(message.author.id.get());
        let arcade = &self.arcade;
        log::trace!("{author} in {channel}: {command:?}");

        match command {
            Command::Challenge { kind, opponent } => {
                let duel = arcade.duel(kind, channel, guild, Player::human(author), opponent);
                tokio::spawn(async move {
                    match duel.challenge(None).await {
                        Ok(resolution) => log::debug!("{kind} duel ended: {resolution:?}"),
                        Err(why) => log::error!("{kind} duel failed: {why:?}"),
                    }
                });

                let command_message = MessageRef {
                    channel,
                    id: MessageId(message.id.get()),
                };
                arcade.messenger().delete(command_message).await?;
            },
            Command::Stats { kind, player } => {
                arcade.send_leaderboard(channel, guild, kind, player).await?;
            },
            Command::Roll => {
                Roll { channel, guild, user: author }.invoke(arcade).await?;
            },
            Command::Flip => {
                Flip { channel, guild, user: author }.invoke(arcade).await?;
            },
            Command::Hug { target } => {
                Hug {
                    channel,
                    guild,
                    user: author,
                    target,
                }
                .invoke(arcade)
                .await?;
            },
            Command::ToolStats { kind, player } => {
                let player = player.unwrap_or(author);
                arcade.send_tool_stats(channel, guild, kind, player).await?;
            },
            Command::SetPrefix(new) => {
                log::info!("{author} changed the prefix from {prefix:?} to {new:?}");
                self.prefix.store(Arc::new(new));
            },
        }

        Ok(())
    }

    fn handle_reaction(&self, reaction: &Reaction, kind: ReactionKind) {
        let Some(user) = reaction.user_id else {
            return;
        };

        let user = UserId(user.get());
        if user == self.arcade.bot() {
            return;
        }

        // the games only use unicode emojis
        let ReactionType::Unicode(emoji) = &reaction.emoji else {
            return;
        };

        let event = ReactionEvent {
            message: MessageId(reaction.message_id.get()),
            user,
            emoji: emoji.clone(),
            kind,
        };

        if !self.arcade.handle_reaction(event) {
            log::trace!("Uncollected reaction {emoji} on {}", reaction.message_id);
        }
    }
}

#[serenity::async_trait]
impl EventHandler for ArcadeHandler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        log::info!("Logged in as {}", ready.user.name);
    }

    async fn message(&self, _ctx: Context, new_message: Message) {
        if let Err(why) = self.handle_message(new_message).await {
            log::error!("Command handling failed: {why:?}");
        }
    }

    async fn reaction_add(&self, _ctx: Context, add_reaction: Reaction) {
        self.handle_reaction(&add_reaction, ReactionKind::Add);
    }

    async fn reaction_remove(&self, _ctx: Context, removed_reaction: Reaction) {
        self.handle_reaction(&removed_reaction, ReactionKind::Remove);
    }
}
