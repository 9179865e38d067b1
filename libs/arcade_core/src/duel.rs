//! Drives a duel from the challenge to the recorded result.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{Instant, sleep_until, timeout_at};

use crate::arcade::Arcade;
use crate::challenge::{self, Challenge, Player, Rejection, Response, Screening};
use crate::collector::{ReactionEvent, ReactionKind};
use crate::emoji;
use crate::error::Result;
use crate::games::connect_four::ConnectFour;
use crate::games::rps::{Choice, Rps};
use crate::games::tic_tac_toe::TicTacToe;
use crate::games::{BoardGame, GameKind, Match, Outcome, Piece as _, Seat};
use crate::ids::{ChannelId, GuildId, UserId};
use crate::messenger::{MessageRef, Messenger, Post, react_all};
use crate::stats::{DuelResult, Standing};

/// How a duel ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The challenge was refused up front and a notice was shown.
    Rejected(Rejection),
    Declined,
    Cancelled,
    TimedOut,
    /// The game was played to the end and recorded.
    Finished(Outcome<Seat>),
    /// A player stopped moving. Nothing was recorded.
    Abandoned,
}

/// One challenge and the game that follows if it is accepted.
pub struct Duel<M> {
    arcade: Arc<Arcade<M>>,
    kind: GameKind,
    channel: ChannelId,
    guild: GuildId,
    challenger: Player,
    opponent: Player,
}

impl<M: Messenger> Duel<M> {
    pub fn new(
        arcade: Arc<Arcade<M>>,
        kind: GameKind,
        channel: ChannelId,
        guild: GuildId,
        challenger: Player,
        opponent: Player,
    ) -> Self {
        Self {
            arcade,
            kind,
            channel,
            guild,
            challenger,
            opponent,
        }
    }

    /// Issues the challenge and plays the game if it is accepted.
    ///
    /// `timeout` overrides the configured invitation timeout.
    ///
    /// # Errors
    ///
    /// Returns `Err` if talking to the platform or saving the stats fails.
    pub async fn challenge(self, timeout: Option<Duration>) -> Result<Resolution> {
        let arcade = &*self.arcade;
        let screening = challenge::screen(
            self.challenger,
            self.opponent,
            arcade.bot(),
            self.kind.allows_bot(),
        );
        log::debug!(
            "{} challenges {} to {}: {screening:?}",
            self.challenger.id,
            self.opponent.id,
            self.kind.code()
        );

        match screening {
            Screening::Reject(rejection) => {
                let post = Post::new(self.kind.to_string(), rejection.notice());
                let notice = arcade.messenger().send(self.channel, post).await?;
                self.arcade.expire_notice(notice);
                Ok(Resolution::Rejected(rejection))
            },
            Screening::VersusBot => self.play_rps_vs_bot().await,
            Screening::Invite => {
                let timeout = timeout.unwrap_or(arcade.settings().challenge_timeout);
                let challenge = Challenge::new(self.challenger, self.opponent, self.kind, timeout);
                match challenge::negotiate(arcade, &challenge, self.channel).await? {
                    Response::Accepted(message) => self.play(message).await,
                    Response::Declined => Ok(Resolution::Declined),
                    Response::Cancelled => Ok(Resolution::Cancelled),
                    Response::TimedOut => Ok(Resolution::TimedOut),
                }
            },
        }
    }

    async fn play(&self, message: MessageRef) -> Result<Resolution> {
        match self.kind {
            GameKind::RockPaperScissors => self.play_rps(message).await,
            GameKind::TicTacToe => self.play_board::<TicTacToe>(message).await,
            GameKind::ConnectFour => self.play_board::<ConnectFour>(message).await,
        }
    }

    fn seat_of(&self, user: UserId) -> Seat {
        if user == self.challenger.id {
            Seat::Challenger
        } else {
            Seat::Opponent
        }
    }

    fn player(&self, seat: Seat) -> Player {
        match seat {
            Seat::Challenger => self.challenger,
            Seat::Opponent => self.opponent,
        }
    }

    fn record(&self, keys: (&str, &str), outcome: Outcome<Seat>) -> Result {
        let result = DuelResult {
            challenger: Standing {
                player: self.challenger.id,
                key: keys.0,
            },
            opponent: Standing {
                player: self.opponent.id,
                key: keys.1,
            },
            outcome,
        };

        self.arcade.stats().update(|root| {
            root.record_duel(self.guild, self.kind.code(), self.kind.option_keys(), &result);
        })
    }

    fn describe(&self, outcome: Outcome<Seat>) -> String {
        match outcome {
            Outcome::Win(seat) => format!("{} wins!", self.player(seat).id.mention()),
            Outcome::Draw => "It's a draw!".to_owned(),
            Outcome::InProgress => String::new(),
        }
    }

    fn abandoned(&self) -> Post {
        Post::new(
            self.kind.to_string(),
            format!(
                "The game between {} and {} was abandoned.",
                self.challenger.id.mention(),
                self.opponent.id.mention(),
            ),
        )
    }

    /// Rock-paper-scissors against the bot, picked through reactions on a
    /// channel message. The bot draws its choice once the human has picked.
    async fn play_rps_vs_bot(&self) -> Result<Resolution> {
        let arcade = &*self.arcade;
        let messenger = arcade.messenger();
        let human = self.challenger.id;

        let post = Post::new(
            self.kind.to_string(),
            format!("{}, pick your move!", human.mention()),
        );

        let message = messenger.send(self.channel, post).await?;
        let mut subscription = arcade.collectors().subscribe(message.id, choice_filter(human));

        react_all(messenger, message, &RPS_EMOJIS).await?;

        let deadline = Instant::now() + arcade.settings().move_timeout;
        let received = timeout_at(deadline, subscription.next()).await;
        subscription.cancel();

        let Some(choice) = received.ok().flatten().and_then(|e| Choice::from_emoji(&e.emoji)) else {
            messenger.edit(message, self.abandoned()).await?;
            messenger.clear_reactions(message).await?;
            return Ok(Resolution::Abandoned);
        };

        let mut round = Rps::default();
        round.choose(Seat::Challenger, choice);
        round.choose(Seat::Opponent, Choice::random(arcade.dice()));
        self.finish_rps(message, &round).await
    }

    /// Rock-paper-scissors between two humans. Both pick in private, in any
    /// order.
    async fn play_rps(&self, message: MessageRef) -> Result<Resolution> {
        let arcade = &*self.arcade;
        let messenger = arcade.messenger();

        let waiting = Post::new(
            self.kind.to_string(),
            format!(
                "{} and {}, check your direct messages to pick your move!",
                self.challenger.id.mention(),
                self.opponent.id.mention(),
            ),
        );
        messenger.edit(message, waiting).await?;

        let prompt = || Post::new(self.kind.to_string(), "Pick your move!");
        let (dm_a, dm_b) = tokio::try_join!(
            messenger.direct_message(self.challenger.id, prompt()),
            messenger.direct_message(self.opponent.id, prompt()),
        )?;

        let collectors = arcade.collectors();
        let mut sub_a = collectors.subscribe(dm_a.id, choice_filter(self.challenger.id));
        let mut sub_b = collectors.subscribe(dm_b.id, choice_filter(self.opponent.id));
        tokio::try_join!(
            react_all(messenger, dm_a, &RPS_EMOJIS),
            react_all(messenger, dm_b, &RPS_EMOJIS),
        )?;

        let deadline = Instant::now() + arcade.settings().move_timeout;
        let mut round = Rps::default();
        while !round.determine_outcome().is_over() {
            let (seat, event) = tokio::select! {
                Some(event) = sub_a.next(), if round.choice(Seat::Challenger).is_none() => (Seat::Challenger, event),
                Some(event) = sub_b.next(), if round.choice(Seat::Opponent).is_none() => (Seat::Opponent, event),
                () = sleep_until(deadline) => {
                    // close the private prompts too
                    let post = self.abandoned();
                    tokio::try_join!(
                        messenger.edit(message, post.clone()),
                        messenger.edit(dm_a, post.clone()),
                        messenger.edit(dm_b, post),
                    )?;
                    return Ok(Resolution::Abandoned);
                },
            };

            let Some(choice) = Choice::from_emoji(&event.emoji) else {
                continue;
            };

            if round.choose(seat, choice) {
                let dm = if seat == Seat::Challenger { dm_a } else { dm_b };
                let post = Post::new(
                    self.kind.to_string(),
                    format!("You picked {} {}.", choice.emoji(), choice.key()),
                );

                messenger.edit(dm, post).await?;
            }
        }

        sub_a.cancel();
        sub_b.cancel();
        self.finish_rps(message, &round).await
    }

    async fn finish_rps(&self, message: MessageRef, round: &Rps) -> Result<Resolution> {
        let outcome = round.determine_outcome();
        let (Some(a), Some(b)) = (round.choice(Seat::Challenger), round.choice(Seat::Opponent)) else {
            return Ok(Resolution::Abandoned);
        };

        self.record((a.key(), b.key()), outcome)?;

        let post = Post::new(
            self.kind.to_string(),
            format!(
                "{} {} vs {} {}\n{}",
                self.challenger.id.mention(),
                a.emoji(),
                b.emoji(),
                self.opponent.id.mention(),
                self.describe(outcome),
            ),
        );

        let messenger = self.arcade.messenger();
        messenger.edit(message, post).await?;
        messenger.clear_reactions(message).await?;
        Ok(Resolution::Finished(outcome))
    }

    fn board_post<G: BoardGame>(&self, game: &Match<G>) -> Post {
        let status = match game.outcome() {
            Outcome::InProgress => {
                let seat = game.turn();
                format!(
                    "{}'s turn ({})",
                    self.player(seat).id.mention(),
                    game.piece_of(seat).icon()
                )
            },
            outcome => self.describe(outcome),
        };

        Post::new(
            self.kind.to_string(),
            format!("{}\n\n{status}", game.game().render()),
        )
        .footer(format!(
            "{} {} vs {} {}",
            game.piece_of(Seat::Challenger).icon(),
            self.challenger.id,
            game.piece_of(Seat::Opponent).icon(),
            self.opponent.id,
        ))
    }

    /// Plays a board game on the accepted invitation message.
    ///
    /// Both adding and removing a reaction count as a move, so the same
    /// reaction can be used more than once.
    async fn play_board<G: BoardGame>(&self, message: MessageRef) -> Result<Resolution> {
        let arcade = &*self.arcade;
        let messenger = arcade.messenger();

        let mut game = Match::<G>::assign(arcade.dice());
        messenger.edit(message, self.board_post(&game)).await?;

        let (a, b) = (self.challenger.id, self.opponent.id);
        let mut subscription = arcade.collectors().subscribe(message.id, move |event| {
            (event.user == a || event.user == b) && G::parse_move(&event.emoji).is_some()
        });

        react_all(messenger, message, G::MOVE_EMOJIS).await?;

        while !game.outcome().is_over() {
            let deadline = Instant::now() + arcade.settings().move_timeout;
            loop {
                let received = timeout_at(deadline, subscription.next()).await;
                let Ok(Some(event)) = received else {
                    subscription.cancel();
                    log::trace!("{} game on {} abandoned.", self.kind.code(), message.id);

                    messenger.edit(message, self.abandoned()).await?;
                    messenger.clear_reactions(message).await?;
                    return Ok(Resolution::Abandoned);
                };

                let Some(mv) = G::parse_move(&event.emoji) else {
                    continue;
                };

                if game.play(self.seat_of(event.user), mv) {
                    break;
                }
            }

            if !game.outcome().is_over() {
                messenger.edit(message, self.board_post(&game)).await?;
            }
        }

        subscription.cancel();

        let outcome = game.outcome();
        let keys = (
            game.piece_of(Seat::Challenger).key(),
            game.piece_of(Seat::Opponent).key(),
        );
        self.record(keys, outcome)?;

        messenger.edit(message, self.board_post(&game)).await?;
        messenger.clear_reactions(message).await?;
        Ok(Resolution::Finished(outcome))
    }
}

const RPS_EMOJIS: [&str; 3] = [emoji::ROCK, emoji::PAPER, emoji::SCISSORS];

fn choice_filter(user: UserId) -> impl Fn(&ReactionEvent) -> bool + Send + Sync + 'static {
    move |event| event.user == user && event.kind == ReactionKind::Add && Choice::from_emoji(&event.emoji).is_some()
}

impl<M> std::fmt::Debug for Duel<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Duel")
            .field("kind", &self.kind)
            .field("channel", &self.channel)
            .field("guild", &self.guild)
            .field("challenger", &self.challenger)
            .field("opponent", &self.opponent)
            .finish_non_exhaustive()
    }
}
