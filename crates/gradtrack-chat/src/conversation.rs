//! Conversation management.
//!
//! Owns the ordered message log and runs each turn: append the user's
//! message, mark the conversation as loading, wait a short simulated typing
//! delay, resolve a reply and append it. A failed or panicking resolution
//! becomes a single apology message, and the loading flag always clears
//! when the turn ends.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::FutureExt;
use gradtrack_core::clock::{Clock, SystemClock};
use gradtrack_core::config::{ChatConfig, GradtrackConfig};
use rand::Rng;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::ChatError;
use crate::response::{Responder, ResponseResolver};
use crate::types::{ContentBlock, Message, TurnOutcome, TurnPhase};

/// Reply appended when the responder fails.
pub const DEGRADED_REPLY: &str = "I'm having trouble fetching your data right now. Please make sure the backend server is running and try again.";

// =============================================================================
// ConversationManager
// =============================================================================

/// Append-only chat log plus the turn state machine
/// (`Idle -> Sending -> Idle`).
///
/// Turns are not serialized against each other. If two `send_message` calls
/// overlap, both append in completion order and whichever finishes first
/// reports the conversation as idle.
pub struct ConversationManager {
    responder: Arc<dyn Responder>,
    clock: Arc<dyn Clock>,
    config: ChatConfig,
    messages: Mutex<Vec<Message>>,
    phase: watch::Sender<TurnPhase>,
}

impl ConversationManager {
    pub fn new(responder: Arc<dyn Responder>, config: ChatConfig) -> Self {
        Self::with_clock(responder, config, Arc::new(SystemClock))
    }

    /// Create a manager that stamps messages using `clock`.
    pub fn with_clock(
        responder: Arc<dyn Responder>,
        config: ChatConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let (phase, _) = watch::channel(TurnPhase::Idle);
        Self {
            responder,
            clock,
            config,
            messages: Mutex::new(Vec::new()),
            phase,
        }
    }

    /// Wire a manager to a keyword resolver for the configured backend.
    pub fn from_config(config: &GradtrackConfig) -> Result<Self, ChatError> {
        let resolver = ResponseResolver::from_config(&config.backend)?;
        info!(backend = %resolver.client().backend_url(), "Conversation ready");
        Ok(Self::new(Arc::new(resolver), config.chat.clone()))
    }

    /// Run one turn for `raw` input.
    ///
    /// Blank input is ignored and appends nothing. Otherwise exactly one user
    /// message and then exactly one assistant message are appended.
    pub async fn send_message(&self, raw: &str) -> TurnOutcome {
        let text = raw.trim();
        if text.is_empty() {
            debug!("Ignoring blank message");
            return TurnOutcome::Ignored;
        }

        self.append(|at| Message::user(text, at));
        let _loading = LoadingGuard::enter(&self.phase);

        let delay = self.typing_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let result = AssertUnwindSafe(self.responder.respond(text))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| {
                Err(ChatError::ResponseFailed(panic_message(panic.as_ref())))
            });

        match result {
            Ok(blocks) => {
                debug!(blocks = blocks.len(), "Assistant replied");
                self.append(|at| Message::assistant(blocks, at));
                TurnOutcome::Answered
            }
            Err(e) => {
                warn!(error = %e, "Response failed, sending degraded reply");
                self.append(|at| Message::assistant(vec![ContentBlock::text(DEGRADED_REPLY)], at));
                TurnOutcome::Degraded
            }
        }
    }

    /// Drop every message.
    pub fn clear_messages(&self) {
        let mut messages = self.lock();
        let removed = messages.len();
        messages.clear();
        info!(removed, "Conversation cleared");
    }

    /// Snapshot of the log, oldest first.
    pub fn messages(&self) -> Vec<Message> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_loading(&self) -> bool {
        *self.phase.borrow() == TurnPhase::Sending
    }

    /// Watch the turn phase.
    pub fn subscribe(&self) -> watch::Receiver<TurnPhase> {
        self.phase.subscribe()
    }

    /// Stamp and append a message. Timestamps never go backwards within the
    /// log, even if the clock does.
    fn append(&self, build: impl FnOnce(DateTime<Utc>) -> Message) {
        let mut messages = self.lock();
        let now = self.clock.now();
        let at = match messages.last() {
            Some(last) if last.timestamp > now => last.timestamp,
            _ => now,
        };
        messages.push(build(at));
    }

    fn typing_delay(&self) -> Duration {
        let (min, max) = self.config.typing_delay_bounds();
        if min == max {
            return min;
        }
        let ms = rand::rng().random_range(min.as_millis()..=max.as_millis());
        Duration::from_millis(u64::try_from(ms).unwrap_or(u64::MAX))
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Message>> {
        self.messages.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    let detail = panic
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown cause".to_string());
    format!("responder panicked: {}", detail)
}

// =============================================================================
// LoadingGuard
// =============================================================================

/// Holds the conversation in `Sending` until dropped.
struct LoadingGuard<'a> {
    phase: &'a watch::Sender<TurnPhase>,
}

impl<'a> LoadingGuard<'a> {
    fn enter(phase: &'a watch::Sender<TurnPhase>) -> Self {
        phase.send_replace(TurnPhase::Sending);
        Self { phase }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.phase.send_replace(TurnPhase::Idle);
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ContentKind, MessageContent, Role};
    use async_trait::async_trait;
    use chrono::TimeZone;
    use gradtrack_core::clock::ManualClock;
    use tokio::sync::Notify;

    struct EchoResponder;

    #[async_trait]
    impl Responder for EchoResponder {
        async fn respond(&self, text: &str) -> Result<Vec<ContentBlock>, ChatError> {
            Ok(vec![ContentBlock::text(format!("echo: {}", text))])
        }
    }

    struct FailingResponder;

    #[async_trait]
    impl Responder for FailingResponder {
        async fn respond(&self, _text: &str) -> Result<Vec<ContentBlock>, ChatError> {
            Err(ChatError::ResponseFailed("backend exploded".to_string()))
        }
    }

    struct PanickingResponder;

    #[async_trait]
    impl Responder for PanickingResponder {
        async fn respond(&self, _text: &str) -> Result<Vec<ContentBlock>, ChatError> {
            panic!("responder bug");
        }
    }

    /// Signals when a turn reaches the responder and waits to be released.
    #[derive(Default)]
    struct GatedResponder {
        started: Notify,
        release: Notify,
    }

    #[async_trait]
    impl Responder for GatedResponder {
        async fn respond(&self, _text: &str) -> Result<Vec<ContentBlock>, ChatError> {
            self.started.notify_one();
            self.release.notified().await;
            Ok(vec![ContentBlock::text("done")])
        }
    }

    /// Winds the clock back while answering.
    struct RewindingResponder {
        clock: Arc<ManualClock>,
    }

    #[async_trait]
    impl Responder for RewindingResponder {
        async fn respond(&self, _text: &str) -> Result<Vec<ContentBlock>, ChatError> {
            self.clock.advance(chrono::Duration::minutes(-5));
            Ok(vec![ContentBlock::text("from the past")])
        }
    }

    fn manager(responder: Arc<dyn Responder>) -> ConversationManager {
        ConversationManager::new(responder, ChatConfig::instant())
    }

    fn reply_text(message: &Message) -> Option<&str> {
        message.content.blocks().first().and_then(|b| b.text.as_deref())
    }

    #[tokio::test]
    async fn test_turn_appends_user_then_assistant() {
        let chat = manager(Arc::new(EchoResponder));

        let outcome = chat.send_message("  show my goals  ").await;

        assert_eq!(outcome, TurnOutcome::Answered);
        let messages = chat.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::User);
        assert_eq!(
            messages[0].content,
            MessageContent::Text("show my goals".to_string())
        );
        assert_eq!(messages[1].role, Role::Assistant);
        assert_eq!(reply_text(&messages[1]), Some("echo: show my goals"));
        assert!(messages[0].timestamp <= messages[1].timestamp);
        assert!(!chat.is_loading());
    }

    #[tokio::test]
    async fn test_blank_input_is_ignored() {
        let chat = manager(Arc::new(EchoResponder));

        assert_eq!(chat.send_message("").await, TurnOutcome::Ignored);
        assert_eq!(chat.send_message("   \n\t ").await, TurnOutcome::Ignored);

        assert!(chat.is_empty());
        assert!(!chat.is_loading());
    }

    #[tokio::test]
    async fn test_failure_appends_single_degraded_reply() {
        let chat = manager(Arc::new(FailingResponder));

        let outcome = chat.send_message("study").await;

        assert_eq!(outcome, TurnOutcome::Degraded);
        let messages = chat.messages();
        assert_eq!(messages.len(), 2);
        let blocks = messages[1].content.blocks();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].kind, ContentKind::Text);
        assert_eq!(blocks[0].text.as_deref(), Some(DEGRADED_REPLY));
        assert!(!chat.is_loading());
    }

    #[tokio::test]
    async fn test_loading_while_responder_runs() {
        let gate = Arc::new(GatedResponder::default());
        let chat = Arc::new(manager(gate.clone()));
        let mut phase = chat.subscribe();
        assert_eq!(*phase.borrow(), TurnPhase::Idle);

        let turn = tokio::spawn({
            let chat = chat.clone();
            async move { chat.send_message("hello").await }
        });

        gate.started.notified().await;
        assert!(chat.is_loading());
        assert!(phase.has_changed().unwrap());
        assert_eq!(*phase.borrow_and_update(), TurnPhase::Sending);
        // User message is visible before the reply arrives
        assert_eq!(chat.len(), 1);

        gate.release.notify_one();
        assert_eq!(turn.await.unwrap(), TurnOutcome::Answered);
        assert!(!chat.is_loading());
        assert_eq!(*phase.borrow_and_update(), TurnPhase::Idle);
        assert_eq!(chat.len(), 2);
    }

    #[tokio::test]
    async fn test_panicking_responder_gets_degraded_reply() {
        let chat = Arc::new(manager(Arc::new(PanickingResponder)));

        let outcome = tokio::spawn({
            let chat = chat.clone();
            async move { chat.send_message("study").await }
        })
        .await
        .unwrap();

        assert_eq!(outcome, TurnOutcome::Degraded);
        assert!(!chat.is_loading());
        let messages = chat.messages();
        let roles: Vec<Role> = messages.iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::User, Role::Assistant]);
        assert_eq!(reply_text(&messages[1]), Some(DEGRADED_REPLY));
    }

    #[tokio::test]
    async fn test_conversation_usable_after_responder_panic() {
        let chat = manager(Arc::new(PanickingResponder));
        chat.send_message("one").await;
        chat.send_message("two").await;
        assert_eq!(chat.len(), 4);
    }

    #[test]
    fn test_panic_message_payloads() {
        assert_eq!(panic_message(&"boom"), "responder panicked: boom");
        assert_eq!(
            panic_message(&"index out of bounds".to_string()),
            "responder panicked: index out of bounds"
        );
        assert_eq!(panic_message(&42_u8), "responder panicked: unknown cause");
    }

    #[tokio::test]
    async fn test_timestamps_never_go_backwards() {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2025, 11, 10, 9, 0, 0).unwrap(),
        ));
        let chat = ConversationManager::with_clock(
            Arc::new(RewindingResponder {
                clock: clock.clone(),
            }),
            ChatConfig::instant(),
            clock.clone(),
        );

        chat.send_message("week").await;

        let messages = chat.messages();
        assert_eq!(messages[0].timestamp, messages[1].timestamp);
        assert!(clock.now() < messages[1].timestamp);
    }

    #[tokio::test]
    async fn test_timestamps_follow_clock() {
        let start = Utc.with_ymd_and_hms(2025, 11, 10, 9, 0, 0).unwrap();
        let clock = Arc::new(ManualClock::new(start));
        let chat =
            ConversationManager::with_clock(Arc::new(EchoResponder), ChatConfig::instant(), clock.clone());

        chat.send_message("one").await;
        clock.advance(chrono::Duration::seconds(30));
        chat.send_message("two").await;

        let stamps: Vec<_> = chat.messages().iter().map(|m| m.timestamp).collect();
        assert_eq!(stamps[0], start);
        assert_eq!(stamps[2], start + chrono::Duration::seconds(30));
        assert!(stamps.windows(2).all(|w| w[0] <= w[1]));
    }

    #[tokio::test]
    async fn test_clear_messages() {
        let chat = manager(Arc::new(EchoResponder));
        chat.send_message("one").await;
        chat.send_message("two").await;
        assert_eq!(chat.len(), 4);

        chat.clear_messages();

        assert!(chat.is_empty());
        chat.send_message("three").await;
        assert_eq!(chat.len(), 2);
    }

    #[tokio::test]
    async fn test_message_ids_are_distinct() {
        let chat = manager(Arc::new(EchoResponder));
        chat.send_message("a").await;
        chat.send_message("b").await;

        let mut ids: Vec<String> = chat.messages().into_iter().map(|m| m.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_typing_delay_within_bounds() {
        let chat = ConversationManager::new(Arc::new(EchoResponder), ChatConfig::default());

        let started = tokio::time::Instant::now();
        chat.send_message("hi").await;
        let elapsed = started.elapsed();

        assert!(elapsed >= Duration::from_millis(800), "{:?}", elapsed);
        assert!(elapsed <= Duration::from_millis(1_250), "{:?}", elapsed);
    }

    #[test]
    fn test_typing_delay_disabled() {
        let chat = manager(Arc::new(EchoResponder));
        assert_eq!(chat.typing_delay(), Duration::ZERO);
    }

    #[test]
    fn test_typing_delay_fixed_when_bounds_equal() {
        let config = ChatConfig {
            typing_delay_min_ms: 250,
            typing_delay_max_ms: 250,
        };
        let chat = ConversationManager::new(Arc::new(EchoResponder), config);
        assert_eq!(chat.typing_delay(), Duration::from_millis(250));
    }

    #[test]
    fn test_typing_delay_sampled_in_range() {
        let chat = ConversationManager::new(Arc::new(EchoResponder), ChatConfig::default());
        for _ in 0..50 {
            let delay = chat.typing_delay();
            assert!(delay >= Duration::from_millis(800));
            assert!(delay <= Duration::from_millis(1_200));
        }
    }

    #[test]
    fn test_from_config() {
        let chat = ConversationManager::from_config(&GradtrackConfig::default()).unwrap();
        assert!(chat.is_empty());
        assert!(!chat.is_loading());
    }
}
