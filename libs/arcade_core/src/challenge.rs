//! The invitation handshake in front of every duel.
//!
//! [`screen`] decides whether a challenge can be issued at all. If it can,
//! [`negotiate`] posts the invitation and waits for the first qualifying
//! reaction or the timeout, whichever comes first.

use std::time::Duration;

use tokio::time::{Instant, timeout_at};

use crate::arcade::Arcade;
use crate::collector::{ReactionEvent, ReactionKind};
use crate::emoji;
use crate::error::Result;
use crate::games::GameKind;
use crate::ids::{ChannelId, UserId};
use crate::messenger::{MessageRef, Messenger, Post, react_all};

/// A participant of a duel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Player {
    pub id: UserId,
    /// Whether this is an automated account.
    pub bot: bool,
}

impl Player {
    #[must_use]
    pub fn human(id: UserId) -> Self {
        Self { id, bot: false }
    }

    #[must_use]
    pub fn bot(id: UserId) -> Self {
        Self { id, bot: true }
    }
}

/// Why a challenge was refused before any invitation was sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    SelfChallenge,
    BotInitiator,
    BotsNotAllowed,
    OtherBot,
}

impl Rejection {
    /// The text of the notice shown to the challenger.
    #[must_use]
    pub fn notice(self) -> &'static str {
        match self {
            Self::SelfChallenge => "You cannot challenge yourself.",
            Self::BotInitiator => "Bots cannot start challenges.",
            Self::BotsNotAllowed => "You cannot challenge bots to this game.",
            Self::OtherBot => "You cannot challenge other bots.",
        }
    }
}

/// The result of screening a challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screening {
    Reject(Rejection),
    /// The opponent is this bot. The game starts right away.
    VersusBot,
    /// Two humans. An invitation has to be accepted first.
    Invite,
}

/// Checks who may challenge whom, in a fixed order.
#[must_use]
pub fn screen(challenger: Player, opponent: Player, bot: UserId, allows_bot: bool) -> Screening {
    if challenger.id == opponent.id {
        return Screening::Reject(Rejection::SelfChallenge);
    }

    if challenger.bot {
        return Screening::Reject(Rejection::BotInitiator);
    }

    if opponent.bot && !allows_bot {
        return Screening::Reject(Rejection::BotsNotAllowed);
    }

    if opponent.id == bot && allows_bot {
        return Screening::VersusBot;
    }

    if opponent.bot {
        return Screening::Reject(Rejection::OtherBot);
    }

    Screening::Invite
}

/// A pending invitation.
#[derive(Debug, Clone, Copy)]
pub struct Challenge {
    pub challenger: Player,
    pub opponent: Player,
    pub kind: GameKind,
    pub created_at: Instant,
    pub timeout_at: Instant,
}

impl Challenge {
    #[must_use]
    pub fn new(challenger: Player, opponent: Player, kind: GameKind, timeout: Duration) -> Self {
        let created_at = Instant::now();
        Self {
            challenger,
            opponent,
            kind,
            created_at,
            timeout_at: created_at + timeout,
        }
    }

    /// Whether a reaction may answer this invitation.
    ///
    /// The opponent can accept or decline. The challenger can only withdraw.
    fn qualifies(&self, event: &ReactionEvent) -> bool {
        if event.kind != ReactionKind::Add {
            return false;
        }

        let decline = emoji::equivalent(&event.emoji, emoji::DECLINE);
        if event.user == self.opponent.id {
            decline || emoji::equivalent(&event.emoji, emoji::ACCEPT)
        } else {
            event.user == self.challenger.id && decline
        }
    }

    fn invitation(&self) -> Post {
        Post::new(
            self.kind.to_string(),
            format!(
                "{}, {} challenges you to {}!\nReact with {} to accept or {} to decline.",
                self.opponent.id.mention(),
                self.challenger.id.mention(),
                self.kind.title(),
                emoji::ACCEPT,
                emoji::DECLINE,
            ),
        )
    }

    fn closed(&self, what: &str) -> Post {
        Post::new(
            self.kind.to_string(),
            format!(
                "{} challenged {} to {}.\n{what}",
                self.challenger.id.mention(),
                self.opponent.id.mention(),
                self.kind.title(),
            ),
        )
    }
}

/// How an invitation was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    /// The opponent accepted. The invitation message is handed on to the game.
    Accepted(MessageRef),
    Declined,
    /// The challenger withdrew. The invitation was deleted.
    Cancelled,
    TimedOut,
}

/// Posts the invitation and waits for it to be resolved.
///
/// # Errors
///
/// Returns `Err` if a message could not be sent or changed.
pub async fn negotiate<M: Messenger>(
    arcade: &Arcade<M>,
    challenge: &Challenge,
    channel: ChannelId,
) -> Result<Response> {
    let messenger = arcade.messenger();
    let message = messenger.send(channel, challenge.invitation()).await?;

    let filter = *challenge;
    let mut subscription = arcade
        .collectors()
        .subscribe(message.id, move |event| filter.qualifies(event));

    react_all(messenger, message, &[emoji::ACCEPT, emoji::DECLINE]).await?;

    let received = timeout_at(challenge.timeout_at, subscription.next()).await;
    let event = match received {
        Ok(Some(event)) => event,
        Ok(None) => {
            log::warn!("Invitation collector on {} was replaced.", message.id);
            return Ok(Response::Cancelled);
        },
        Err(_) => {
            subscription.cancel();
            log::trace!("Challenge by {} timed out.", challenge.challenger.id);

            messenger.edit(message, challenge.closed("The challenge timed out.")).await?;
            messenger.clear_reactions(message).await?;
            return Ok(Response::TimedOut);
        },
    };

    subscription.cancel();

    if event.user == challenge.challenger.id {
        messenger.delete(message).await?;
        return Ok(Response::Cancelled);
    }

    if emoji::equivalent(&event.emoji, emoji::ACCEPT) {
        messenger.clear_reactions(message).await?;
        return Ok(Response::Accepted(message));
    }

    messenger.edit(message, challenge.closed("The challenge was declined.")).await?;
    messenger.clear_reactions(message).await?;
    Ok(Response::Declined)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOT: UserId = UserId(99);

    fn screen_with(challenger: Player, opponent: Player, allows_bot: bool) -> Screening {
        screen(challenger, opponent, BOT, allows_bot)
    }

    #[test]
    fn self_challenge_first() {
        let me = Player::human(UserId(1));
        assert_eq!(
            screen_with(me, me, true),
            Screening::Reject(Rejection::SelfChallenge)
        );

        let bot = Player::bot(BOT);
        assert_eq!(
            screen_with(bot, bot, true),
            Screening::Reject(Rejection::SelfChallenge)
        );
    }

    #[test]
    fn bots_cannot_initiate() {
        let other = Player::bot(UserId(50));
        assert_eq!(
            screen_with(other, Player::human(UserId(1)), true),
            Screening::Reject(Rejection::BotInitiator)
        );
    }

    #[test]
    fn bot_opponents() {
        let me = Player::human(UserId(1));
        assert_eq!(
            screen_with(me, Player::bot(BOT), false),
            Screening::Reject(Rejection::BotsNotAllowed)
        );
        assert_eq!(screen_with(me, Player::bot(BOT), true), Screening::VersusBot);
        assert_eq!(
            screen_with(me, Player::bot(UserId(50)), true),
            Screening::Reject(Rejection::OtherBot)
        );
        assert_eq!(
            screen_with(me, Player::bot(UserId(50)), false),
            Screening::Reject(Rejection::BotsNotAllowed)
        );
    }

    #[test]
    fn humans_get_an_invitation() {
        assert_eq!(
            screen_with(Player::human(UserId(1)), Player::human(UserId(2)), false),
            Screening::Invite
        );
    }

    #[test]
    fn qualifying_reactions() {
        let challenge = Challenge::new(
            Player::human(UserId(1)),
            Player::human(UserId(2)),
            GameKind::TicTacToe,
            Duration::from_secs(90),
        );

        let event = |user, emoji: &str, kind| ReactionEvent {
            message: crate::ids::MessageId(1),
            user: UserId(user),
            emoji: emoji.to_owned(),
            kind,
        };

        assert!(challenge.qualifies(&event(2, emoji::ACCEPT, ReactionKind::Add)));
        assert!(challenge.qualifies(&event(2, emoji::DECLINE, ReactionKind::Add)));
        assert!(challenge.qualifies(&event(1, emoji::DECLINE, ReactionKind::Add)));
        assert!(!challenge.qualifies(&event(1, emoji::ACCEPT, ReactionKind::Add)), "challenger cannot accept");
        assert!(!challenge.qualifies(&event(3, emoji::ACCEPT, ReactionKind::Add)), "bystander");
        assert!(!challenge.qualifies(&event(2, emoji::ACCEPT, ReactionKind::Remove)));
        assert!(!challenge.qualifies(&event(2, emoji::ROCK, ReactionKind::Add)));
    }
}
