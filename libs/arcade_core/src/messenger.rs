//! The port to the chat platform.

use std::future::Future;

use crate::error::Result;
use crate::ids::{ChannelId, MessageId, UserId};

/// A plain renderable message. The platform decides how it looks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub title: String,
    pub description: String,
    pub footer: Option<String>,
}

impl Post {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            footer: None,
        }
    }

    #[must_use]
    pub fn footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }
}

/// Points at a message that was sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageRef {
    pub channel: ChannelId,
    pub id: MessageId,
}

/// Operations the arcade needs from the chat platform.
///
/// None of these are retried. Failures are returned as
/// [`Error::Messenger`](crate::Error::Messenger).
pub trait Messenger: Send + Sync + 'static {
    fn send(&self, channel: ChannelId, post: Post) -> impl Future<Output = Result<MessageRef>> + Send;

    fn edit(&self, message: MessageRef, post: Post) -> impl Future<Output = Result> + Send;

    fn delete(&self, message: MessageRef) -> impl Future<Output = Result> + Send;

    fn react(&self, message: MessageRef, emoji: &'static str) -> impl Future<Output = Result> + Send;

    /// Removes all reactions from a message.
    fn clear_reactions(&self, message: MessageRef) -> impl Future<Output = Result> + Send;

    /// Sends a private message to a user.
    fn direct_message(&self, user: UserId, post: Post) -> impl Future<Output = Result<MessageRef>> + Send;
}

/// Adds the reactions in order.
///
/// # Errors
///
/// Returns the first failure. Reactions added before it are kept.
pub async fn react_all<M: Messenger>(messenger: &M, message: MessageRef, emojis: &[&'static str]) -> Result {
    for &emoji in emojis {
        messenger.react(message, emoji).await?;
    }

    Ok(())
}
