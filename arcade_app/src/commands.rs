//! Prefix command parsing.

use arcade_core::UserId;
use arcade_core::challenge::Player;
use arcade_core::games::GameKind;
use arcade_core::tools::ToolKind;

/// A parsed chat command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Challenges the first mentioned user.
    Challenge { kind: GameKind, opponent: Player },
    /// Shows the leaderboard, or the stats of the mentioned user.
    Stats { kind: GameKind, player: Option<UserId> },
    Roll,
    Flip,
    Hug { target: Option<UserId> },
    /// Shows a user's tool counters. Defaults to the author.
    ToolStats { kind: ToolKind, player: Option<UserId> },
    SetPrefix(String),
}

fn game_kind(name: &str) -> Option<GameKind> {
    Some(match name {
        "rps" => GameKind::RockPaperScissors,
        "tic-tac-toe" | "tictactoe" | "ttt" => GameKind::TicTacToe,
        "connect-four" | "connectfour" | "connect-4" | "connect4" | "c4" => GameKind::ConnectFour,
        _ => return None,
    })
}

fn tool_kind(name: &str) -> Option<ToolKind> {
    Some(match name {
        "roll" => ToolKind::Roll,
        "flip" => ToolKind::Flip,
        "hug" => ToolKind::Hug,
        _ => return None,
    })
}

fn is_stats_word(word: &str) -> bool {
    matches!(
        word.to_ascii_lowercase().as_str(),
        "l" | "list" | "leaderboard" | "score" | "scores" | "stat" | "stats"
    )
}

/// Parses `content` if it starts with `prefix`.
///
/// `mentions` are the users mentioned in the message, in order. Commands
/// that need a mention but have none parse to `None`.
pub fn parse(content: &str, prefix: &str, mentions: &[Player]) -> Option<Command> {
    let rest = content.strip_prefix(prefix)?;
    let mut args = rest.split_whitespace();
    let name = args.next()?.to_ascii_lowercase();
    let first = args.next();
    let mentioned = mentions.first().copied();

    if name == "config" {
        return match (first, args.next()) {
            (Some("prefix"), Some(new)) => Some(Command::SetPrefix(new.to_owned())),
            _ => None,
        };
    }

    if let Some(kind) = game_kind(&name) {
        if first.is_some_and(is_stats_word) {
            return Some(Command::Stats {
                kind,
                player: mentioned.map(|p| p.id),
            });
        }

        return mentioned.map(|opponent| Command::Challenge { kind, opponent });
    }

    let kind = tool_kind(&name)?;
    if first.is_some_and(is_stats_word) {
        return Some(Command::ToolStats {
            kind,
            player: mentioned.map(|p| p.id),
        });
    }

    Some(match kind {
        ToolKind::Roll => Command::Roll,
        ToolKind::Flip => Command::Flip,
        ToolKind::Hug => Command::Hug {
            target: mentioned.map(|p| p.id),
        },
    })
}
