//! The serenity-backed [`Messenger`].

use std::sync::Arc;

use arcade_core::{ChannelId, Error, MessageId, MessageRef, Messenger, Post, Result, UserId};
use serenity::builder::{CreateEmbed, CreateEmbedFooter, CreateMessage, EditMessage};
use serenity::http::Http;
use serenity::model::Color;
use serenity::model::channel::{Message, ReactionType};
use serenity::model::id as sid;

/// Sends every [`Post`] as an embed in the configured color.
#[derive(Clone)]
pub struct DiscordMessenger {
    http: Arc<Http>,
    color: Color,
}

impl DiscordMessenger {
    pub fn new(http: Arc<Http>, color: Color) -> Self {
        Self { http, color }
    }

    fn http(&self) -> &Http {
        &self.http
    }

    fn embed(&self, post: Post) -> CreateEmbed {
        let embed = CreateEmbed::new()
            .title(post.title)
            .description(post.description)
            .color(self.color);

        match post.footer {
            Some(footer) => embed.footer(CreateEmbedFooter::new(footer)),
            None => embed,
        }
    }
}

impl std::fmt::Debug for DiscordMessenger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordMessenger")
            .field("color", &self.color)
            .finish_non_exhaustive()
    }
}

fn channel_id(id: ChannelId) -> sid::ChannelId {
    sid::ChannelId::new(id.get())
}

fn message_id(id: MessageId) -> sid::MessageId {
    sid::MessageId::new(id.get())
}

fn user_id(id: UserId) -> sid::UserId {
    sid::UserId::new(id.get())
}

fn message_ref(message: &Message) -> MessageRef {
    MessageRef {
        channel: ChannelId(message.channel_id.get()),
        id: MessageId(message.id.get()),
    }
}

impl Messenger for DiscordMessenger {
    async fn send(&self, channel: ChannelId, post: Post) -> Result<MessageRef> {
        let builder = CreateMessage::new().embed(self.embed(post));
        let message = channel_id(channel)
            .send_message(self.http(), builder)
            .await
            .map_err(Error::messenger)?;

        Ok(message_ref(&message))
    }

    async fn edit(&self, message: MessageRef, post: Post) -> Result {
        let builder = EditMessage::new().embed(self.embed(post));
        channel_id(message.channel)
            .edit_message(self.http(), message_id(message.id), builder)
            .await
            .map_err(Error::messenger)?;

        Ok(())
    }

    async fn delete(&self, message: MessageRef) -> Result {
        channel_id(message.channel)
            .delete_message(self.http(), message_id(message.id))
            .await
            .map_err(Error::messenger)
    }

    async fn react(&self, message: MessageRef, emoji: &'static str) -> Result {
        channel_id(message.channel)
            .create_reaction(
                self.http(),
                message_id(message.id),
                ReactionType::Unicode(emoji.to_owned()),
            )
            .await
            .map_err(Error::messenger)
    }

    async fn clear_reactions(&self, message: MessageRef) -> Result {
        channel_id(message.channel)
            .delete_reactions(self.http(), message_id(message.id))
            .await
            .map_err(Error::messenger)
    }

    async fn direct_message(&self, user: UserId, post: Post) -> Result<MessageRef> {
        let builder = CreateMessage::new().embed(self.embed(post));
        let message = user_id(user)
            .direct_message(self.http(), builder)
            .await
            .map_err(Error::messenger)?;

        Ok(message_ref(&message))
    }
}
