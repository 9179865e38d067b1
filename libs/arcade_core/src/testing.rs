//! Test doubles for the platform ports.

use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::arcade::{Arcade, Settings};
use crate::collector::{ReactionEvent, ReactionKind};
use crate::error::Result;
use crate::ids::{ChannelId, MessageId, UserId};
use crate::messenger::{MessageRef, Messenger, Post};
use crate::random::Dice;
use crate::stats::{Persistence, StatsRoot, StatsStore};

pub const BOT: UserId = UserId(99);
pub const CHANNEL: ChannelId = ChannelId(500);
pub const GUILD: crate::ids::GuildId = crate::ids::GuildId(700);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Send(ChannelId, Post),
    Edit(MessageId, Post),
    Delete(MessageId),
    React(MessageId, &'static str),
    Clear(MessageId),
    Dm(UserId, Post),
}

/// Records every request. Sent messages get ids counting up from 1.
#[derive(Debug, Default)]
pub struct RecordingMessenger {
    calls: Mutex<Vec<Call>>,
    last_id: AtomicU64,
}

impl RecordingMessenger {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("lock not poisoned").clone()
    }

    fn push(&self, call: Call) {
        self.calls.lock().expect("lock not poisoned").push(call);
    }

    fn next_id(&self) -> MessageId {
        MessageId(self.last_id.fetch_add(1, Ordering::Relaxed) + 1)
    }
}

impl Messenger for RecordingMessenger {
    async fn send(&self, channel: ChannelId, post: Post) -> Result<MessageRef> {
        self.push(Call::Send(channel, post));
        Ok(MessageRef {
            channel,
            id: self.next_id(),
        })
    }

    async fn edit(&self, message: MessageRef, post: Post) -> Result {
        self.push(Call::Edit(message.id, post));
        Ok(())
    }

    async fn delete(&self, message: MessageRef) -> Result {
        self.push(Call::Delete(message.id));
        Ok(())
    }

    async fn react(&self, message: MessageRef, emoji: &'static str) -> Result {
        self.push(Call::React(message.id, emoji));
        Ok(())
    }

    async fn clear_reactions(&self, message: MessageRef) -> Result {
        self.push(Call::Clear(message.id));
        Ok(())
    }

    async fn direct_message(&self, user: UserId, post: Post) -> Result<MessageRef> {
        self.push(Call::Dm(user, post));
        Ok(MessageRef {
            channel: ChannelId(user.get()),
            id: self.next_id(),
        })
    }
}

/// Plays back scripted values, then zeroes.
#[derive(Debug, Default)]
pub struct FixedDice(Mutex<VecDeque<u32>>);

impl FixedDice {
    pub fn new(values: &[u32]) -> Self {
        Self(Mutex::new(values.iter().copied().collect()))
    }
}

impl Dice for FixedDice {
    fn below(&self, n: u32) -> u32 {
        let value = self.0.lock().expect("lock not poisoned").pop_front().unwrap_or(0);
        assert!(value < n, "scripted {value} is out of range for {n}");
        value
    }
}

/// Keeps nothing, but counts saves.
#[derive(Debug, Default)]
pub struct CountingPersistence(pub Arc<AtomicUsize>);

impl Persistence for CountingPersistence {
    fn load(&self) -> Result<Option<StatsRoot>> {
        Ok(None)
    }

    fn save(&self, _root: &StatsRoot) -> Result {
        self.0.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

/// Loads nothing and fails every save.
#[derive(Debug, Default)]
pub struct FailingPersistence;

impl Persistence for FailingPersistence {
    fn load(&self) -> Result<Option<StatsRoot>> {
        Ok(None)
    }

    fn save(&self, _root: &StatsRoot) -> Result {
        Err(io::Error::other("disk full").into())
    }
}

pub struct Harness {
    pub arcade: Arc<Arcade<RecordingMessenger>>,
    pub saves: Arc<AtomicUsize>,
}

impl Harness {
    pub fn new(dice: &[u32]) -> Self {
        let saves = Arc::new(AtomicUsize::new(0));
        let persistence = CountingPersistence(Arc::clone(&saves));
        Self::with_persistence(dice, Box::new(persistence), saves)
    }

    /// A harness whose stats can never be saved.
    pub fn failing(dice: &[u32]) -> Self {
        Self::with_persistence(dice, Box::new(FailingPersistence), Arc::default())
    }

    fn with_persistence(dice: &[u32], persistence: Box<dyn Persistence>, saves: Arc<AtomicUsize>) -> Self {
        let stats = StatsStore::open(persistence).expect("empty store must open");

        let arcade = Arcade::new(
            RecordingMessenger::default(),
            stats,
            Box::new(FixedDice::new(dice)),
            BOT,
            Settings::default(),
        );

        Self {
            arcade: Arc::new(arcade),
            saves,
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.arcade.messenger().calls()
    }

    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::Relaxed)
    }

    /// Lets other tasks run until `check` passes.
    pub async fn until(&self, what: &str, check: impl Fn(&Self) -> bool) {
        for _ in 0..1000 {
            if check(self) {
                return;
            }

            tokio::task::yield_now().await;
        }

        panic!("never happened: {what}\ncalls: {:#?}", self.calls());
    }

    /// Waits until `emoji` was added to `message`, which happens after the
    /// collector for it is registered.
    pub async fn until_reacted(&self, message: MessageId, emoji: &'static str) {
        self.until("reaction added", |h| h.calls().contains(&Call::React(message, emoji)))
            .await;
    }

    pub fn react(&self, message: MessageId, user: UserId, emoji: &str) -> bool {
        self.arcade.handle_reaction(event(message, user, emoji, ReactionKind::Add))
    }

    pub fn unreact(&self, message: MessageId, user: UserId, emoji: &str) -> bool {
        self.arcade.handle_reaction(event(message, user, emoji, ReactionKind::Remove))
    }
}

pub fn event(message: MessageId, user: UserId, emoji: &str, kind: ReactionKind) -> ReactionEvent {
    ReactionEvent {
        message,
        user,
        emoji: emoji.to_owned(),
        kind,
    }
}
