//! The turn-based game state machines.
//!
//! These are pure and synchronous. Soliciting moves and rendering them to
//! the chat is handled by [`crate::duel`].

use std::fmt;

use crate::random::Dice;

pub mod connect_four;
pub mod rps;
pub mod tic_tac_toe;

/// The state of a game as seen by its rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome<P> {
    InProgress,
    Win(P),
    Draw,
}

impl<P> Outcome<P> {
    #[must_use]
    pub fn is_over(&self) -> bool {
        !matches!(self, Self::InProgress)
    }

    pub fn map<Q>(self, f: impl FnOnce(P) -> Q) -> Outcome<Q> {
        match self {
            Self::InProgress => Outcome::InProgress,
            Self::Win(p) => Outcome::Win(f(p)),
            Self::Draw => Outcome::Draw,
        }
    }
}

/// The two sides of a duel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Seat {
    Challenger,
    Opponent,
}

impl Seat {
    #[must_use]
    pub fn other(self) -> Self {
        match self {
            Self::Challenger => Self::Opponent,
            Self::Opponent => Self::Challenger,
        }
    }
}

/// The duel games on offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameKind {
    RockPaperScissors,
    TicTacToe,
    ConnectFour,
}

impl GameKind {
    /// The short code used as the stats key.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::RockPaperScissors => "rps",
            Self::TicTacToe => "ttt",
            Self::ConnectFour => "c4",
        }
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::RockPaperScissors => "Rock Paper Scissors",
            Self::TicTacToe => "Tic-Tac-Toe",
            Self::ConnectFour => "Connect Four",
        }
    }

    #[must_use]
    pub fn icon(self) -> &'static str {
        match self {
            Self::RockPaperScissors => "\u{270A}",
            Self::TicTacToe => "\u{274C}",
            Self::ConnectFour => "\u{1F534}",
        }
    }

    /// Whether the bot itself can be challenged.
    ///
    /// Only rock-paper-scissors has a bot player.
    #[must_use]
    pub fn allows_bot(self) -> bool {
        matches!(self, Self::RockPaperScissors)
    }

    /// The option keys the stats are broken down by.
    #[must_use]
    pub fn option_keys(self) -> &'static [&'static str] {
        match self {
            Self::RockPaperScissors => &["rock", "paper", "scissors"],
            Self::TicTacToe => &["x", "o"],
            Self::ConnectFour => &["red", "yellow"],
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.icon(), self.title())
    }
}

/// A kind of piece a player plays with, like X or O.
pub trait Piece: Copy + Eq + fmt::Debug + Send + 'static {
    /// The piece that makes the first move.
    const FIRST: Self;

    #[must_use]
    fn other(self) -> Self;

    /// The stats option key for this piece.
    fn key(self) -> &'static str;

    /// The icon used when rendering.
    fn icon(self) -> &'static str;
}

/// Rules of a game where two pieces take turns.
pub trait TurnGame: Default + Send + 'static {
    type Piece: Piece;
    type Move: Copy + fmt::Debug + Send;

    /// Places `piece` with the given move.
    ///
    /// Returns `false` and leaves the game unchanged if the move is illegal.
    fn place(&mut self, piece: Self::Piece, mv: Self::Move) -> bool;

    /// Determines the current outcome from the board alone.
    fn determine_outcome(&self) -> Outcome<Self::Piece>;
}

/// A [`TurnGame`] that is played through reactions on a rendered board.
pub trait BoardGame: TurnGame {
    /// The reactions offered as moves, in order.
    const MOVE_EMOJIS: &'static [&'static str];

    /// Parses a reaction into a move.
    fn parse_move(emoji: &str) -> Option<Self::Move>;

    /// Renders the board as text.
    fn render(&self) -> String;
}

/// A [`TurnGame`] with the pieces assigned to seats and a turn flag.
#[derive(Debug, Clone)]
pub struct Match<G: TurnGame> {
    game: G,
    challenger_piece: G::Piece,
    turn: G::Piece,
}

impl<G: TurnGame> Match<G> {
    /// Starts a match where the challenger plays `challenger_piece`.
    pub fn new(challenger_piece: G::Piece) -> Self {
        Self {
            game: G::default(),
            challenger_piece,
            turn: G::Piece::FIRST,
        }
    }

    /// Starts a match with the pieces assigned at random.
    pub fn assign(dice: &dyn Dice) -> Self {
        let first = G::Piece::FIRST;
        let piece = if dice.below(2) == 0 { first } else { first.other() };
        Self::new(piece)
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn piece_of(&self, seat: Seat) -> G::Piece {
        match seat {
            Seat::Challenger => self.challenger_piece,
            Seat::Opponent => self.challenger_piece.other(),
        }
    }

    pub fn seat_of(&self, piece: G::Piece) -> Seat {
        if piece == self.challenger_piece {
            Seat::Challenger
        } else {
            Seat::Opponent
        }
    }

    /// The seat whose turn it is.
    pub fn turn(&self) -> Seat {
        self.seat_of(self.turn)
    }

    /// Plays a move for `seat`.
    ///
    /// Moves out of turn, illegal moves and moves after the game ended are
    /// ignored and return `false`.
    pub fn play(&mut self, seat: Seat, mv: G::Move) -> bool {
        if seat != self.turn() || self.game.determine_outcome().is_over() {
            return false;
        }

        if !self.game.place(self.turn, mv) {
            return false;
        }

        self.turn = self.turn.other();
        true
    }

    pub fn outcome(&self) -> Outcome<Seat> {
        self.game.determine_outcome().map(|p| self.seat_of(p))
    }
}
