use super::*;

const GUILD: GuildId = GuildId(10);
const GUILD_ONE: GuildId = GuildId(1);
const RPS_KEYS: &[&str] = &["rock", "paper", "scissors"];

fn duel<'a>(challenger: (u64, &'a str), opponent: (u64, &'a str), outcome: Outcome<Seat>) -> DuelResult<'a> {
    DuelResult {
        challenger: Standing {
            player: UserId(challenger.0),
            key: challenger.1,
        },
        opponent: Standing {
            player: UserId(opponent.0),
            key: opponent.1,
        },
        outcome,
    }
}

fn duel_stat<'a>(root: &'a StatsRoot, code: &str, player: u64) -> &'a PlayerStat<Outcomes> {
    root.board(GUILD, code)
        .and_then(|b| b.get(&UserId(player)))
        .and_then(StatRecord::as_duel)
        .expect("duel record must exist")
}

#[test]
fn check_undefined_is_idempotent() {
    let mut root = StatsRoot::default();
    let default = StatRecord::duel_default(RPS_KEYS);

    root.check_undefined(GUILD, "rps", Some(UserId(1)), Some(UserId(2)), &default);
    let once = root.clone();
    root.check_undefined(GUILD, "rps", Some(UserId(1)), Some(UserId(2)), &default);
    assert_eq!(root, once);

    let board = root.board(GUILD, "rps").expect("board must exist");
    assert_eq!(board.len(), 2);

    let a = board[&UserId(1)].as_duel().expect("must be a duel record");
    assert_eq!(a.totals, Outcomes::zeroed(RPS_KEYS));
    assert!(a.versus.contains_key(&UserId(2)));
}

#[test]
fn check_undefined_keeps_existing_records() {
    let mut root = StatsRoot::default();
    root.record_duel(GUILD, "rps", RPS_KEYS, &duel((1, "rock"), (2, "scissors"), Outcome::Win(Seat::Challenger)));

    let default = StatRecord::duel_default(RPS_KEYS);
    root.check_undefined(GUILD, "rps", Some(UserId(1)), Some(UserId(3)), &default);

    let a = duel_stat(&root, "rps", 1);
    assert_eq!(a.totals.win.get("rock"), 1, "existing totals stay");
    assert_eq!(a.versus[&UserId(2)].wins(), 1, "existing head-to-head stays");
    assert_eq!(a.versus[&UserId(3)].games(), 0, "new head-to-head is zeroed");
}

#[test]
fn single_player_gets_no_versus() {
    let mut root = StatsRoot::default();
    let default = StatRecord::tool_default(&["uses"]);
    root.check_undefined(GUILD, "roll", Some(UserId(1)), None, &default);

    let stat = root.board(GUILD, "roll").expect("board")[&UserId(1)]
        .as_tool()
        .expect("must be a tool record");
    assert!(stat.versus.is_empty());
}

#[test]
fn rock_beats_scissors() {
    let mut root = StatsRoot::default();
    root.record_duel(GUILD, "rps", RPS_KEYS, &duel((1, "rock"), (2, "scissors"), Outcome::Win(Seat::Challenger)));

    let a = duel_stat(&root, "rps", 1);
    assert_eq!(a.totals.win.get("rock"), 1);
    assert_eq!(a.totals.games(), 1);
    assert_eq!(a.versus[&UserId(2)].win.get("rock"), 1);

    let b = duel_stat(&root, "rps", 2);
    assert_eq!(b.totals.loss.get("scissors"), 1);
    assert_eq!(b.totals.games(), 1);
    assert_eq!(b.versus[&UserId(1)].loss.get("scissors"), 1);
}

#[test]
fn draw_credits_both() {
    let mut root = StatsRoot::default();
    root.record_duel(GUILD, "ttt", &["x", "o"], &duel((1, "o"), (2, "x"), Outcome::Draw));

    let a = duel_stat(&root, "ttt", 1);
    let b = duel_stat(&root, "ttt", 2);
    assert_eq!(a.totals.draw.get("o"), 1);
    assert_eq!(b.totals.draw.get("x"), 1);
    assert_eq!(a.versus[&UserId(2)].draws(), 1);
    assert_eq!(b.versus[&UserId(1)].draws(), 1);
}

#[test]
fn in_progress_records_nothing() {
    let mut root = StatsRoot::default();
    root.record_duel(GUILD, "c4", &["red", "yellow"], &duel((1, "red"), (2, "yellow"), Outcome::InProgress));

    assert_eq!(duel_stat(&root, "c4", 1).totals.games(), 0);
    assert_eq!(duel_stat(&root, "c4", 2).totals.games(), 0);
}

#[test]
fn versus_sums_match_totals() {
    let mut root = StatsRoot::default();
    let games = [
        ((1, "rock"), (2, "paper"), Outcome::Win(Seat::Opponent)),
        ((1, "paper"), (3, "paper"), Outcome::Draw),
        ((2, "scissors"), (3, "paper"), Outcome::Win(Seat::Challenger)),
        ((3, "rock"), (1, "scissors"), Outcome::Win(Seat::Challenger)),
        ((1, "rock"), (2, "scissors"), Outcome::Win(Seat::Challenger)),
    ];

    for (a, b, outcome) in games {
        root.record_duel(GUILD, "rps", RPS_KEYS, &duel(a, b, outcome));
    }

    for player in 1..=3 {
        let stat = duel_stat(&root, "rps", player);
        let wins: u64 = stat.versus.values().map(Outcomes::wins).sum();
        let draws: u64 = stat.versus.values().map(Outcomes::draws).sum();
        let losses: u64 = stat.versus.values().map(Outcomes::losses).sum();
        assert_eq!(wins, stat.totals.wins(), "wins of {player}");
        assert_eq!(draws, stat.totals.draws(), "draws of {player}");
        assert_eq!(losses, stat.totals.losses(), "losses of {player}");
    }

    // every win on one side is a loss on the other
    let a = duel_stat(&root, "rps", 1);
    let b = duel_stat(&root, "rps", 2);
    assert_eq!(a.versus[&UserId(2)].wins(), b.versus[&UserId(1)].losses());
    assert_eq!(a.versus[&UserId(2)].losses(), b.versus[&UserId(1)].wins());
}

#[test]
fn tool_counters() {
    let mut root = StatsRoot::default();
    root.record_tool(GUILD, "flip", &["heads", "tails"], UserId(1), "tails");
    root.record_tool(GUILD, "flip", &["heads", "tails"], UserId(1), "tails");

    let stat = root.board(GUILD, "flip").expect("board")[&UserId(1)]
        .as_tool()
        .expect("tool record");
    assert_eq!(stat.totals.get("heads"), 0);
    assert_eq!(stat.totals.get("tails"), 2);
}

#[test]
fn hug_pair_and_self_hug() {
    let keys = &["hugged", "hugged_by"];
    let mut root = StatsRoot::default();
    root.record_tool_pair(GUILD, "hug", keys, (UserId(1), "hugged"), (UserId(2), "hugged_by"));
    root.record_tool_pair(GUILD, "hug", keys, (UserId(3), "hugged"), (UserId(3), "hugged_by"));

    let board = root.board(GUILD, "hug").expect("board");
    let a = board[&UserId(1)].as_tool().expect("tool record");
    let b = board[&UserId(2)].as_tool().expect("tool record");
    assert_eq!(a.totals.get("hugged"), 1);
    assert_eq!(a.versus[&UserId(2)].get("hugged"), 1);
    assert_eq!(b.totals.get("hugged_by"), 1);
    assert_eq!(b.versus[&UserId(1)].get("hugged_by"), 1);

    let c = board[&UserId(3)].as_tool().expect("tool record");
    assert_eq!(c.totals.get("hugged"), 1);
    assert_eq!(c.totals.get("hugged_by"), 1);
    assert_eq!(c.versus[&UserId(3)].total(), 2);
}

#[test]
fn json_shape() {
    let mut root = StatsRoot::default();
    root.record_duel(GUILD, "rps", RPS_KEYS, &duel((1, "rock"), (2, "scissors"), Outcome::Win(Seat::Challenger)));
    root.record_tool(GUILD, "roll", &["uses"], UserId(1), "uses");

    let json: serde_json::Value = serde_json::to_value(&root).expect("must serialize");
    assert_eq!(json["10"]["rps"]["1"]["totals"]["win"]["rock"], 1);
    assert_eq!(json["10"]["rps"]["2"]["versus"]["1"]["loss"]["scissors"], 1);
    assert_eq!(json["10"]["roll"]["1"]["totals"]["uses"], 1);

    let back: StatsRoot = serde_json::from_value(json).expect("must deserialize");
    assert_eq!(back, root);
    assert!(back.board(GUILD, "rps").expect("board")[&UserId(1)].as_duel().is_some());
    assert!(back.board(GUILD, "roll").expect("board")[&UserId(1)].as_tool().is_some());
}

#[test]
fn versus_is_optional_in_json() {
    let json = r#"{ "1": { "flip": { "5": { "totals": { "heads": 3, "tails": 1 } } } } }"#;
    let root: StatsRoot = serde_json::from_str(json).expect("must deserialize");

    let stat = root.board(GUILD_ONE, "flip").expect("board")[&UserId(5)]
        .as_tool()
        .expect("tool record");
    assert_eq!(stat.totals.get("heads"), 3);
    assert!(stat.versus.is_empty());
}

#[test]
fn missing_file_loads_as_none() {
    let path = std::env::temp_dir().join(format!("arcade-missing-{}.json", std::process::id()));
    let file = JsonFile::new(&path);
    assert!(file.load().expect("missing file is not an error").is_none());
}

#[test]
fn json_file_round_trip() {
    let path = std::env::temp_dir().join(format!("arcade-stats-{}.json", std::process::id()));
    let file = JsonFile::new(&path);

    let mut root = StatsRoot::default();
    root.record_tool(GUILD, "roll", &["uses"], UserId(7), "uses");
    file.save(&root).expect("must save");

    let text = std::fs::read_to_string(&path).expect("file must exist");
    assert!(text.contains("\n    \"10\""), "four space indent: {text}");

    let loaded = file.load().expect("must load");
    _ = std::fs::remove_file(&path);
    assert_eq!(loaded, Some(root));
}
