//! Repeat suppression.
//!
//! `ThrottleState` only decides; the logger does all emitting, with the state
//! unlocked.
//!
//! `repeat_count` counts the calls of the current streak, the first one
//! included. With a threshold of 5, calls 1 to 5 are emitted and from the 6th
//! on they are suppressed. Flushing a streak of `n` calls re-emits the last
//! emitted message once, annotated with `repeated = "<n - threshold - 1>
//! times"` when more than one call was suppressed.
//!
//! The reported count is one less than the number of suppressed calls on
//! purpose: ten identical calls give five lines and a summary saying
//! `4 times`. Do not change it to the full suppressed count.

use tintlog_config::ThrottleConfig;
use tintlog_core::{field, Level, ResolvedMessage};

use crate::schedule::ScheduledFlush;

/// Identifier of the field carried by repeat summaries.
pub const REPEATED_FIELD: &str = "repeated";

/// The last message that reached the formatter.
#[derive(Debug, Clone, PartialEq)]
pub struct LastEmission {
    pub level: Level,
    pub message: ResolvedMessage,
}

/// A flushed streak, ready to be emitted.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub level: Level,
    pub message: ResolvedMessage,
    /// Calls that were suppressed.
    pub suppressed: u32,
}

#[derive(Debug)]
pub enum Decision {
    /// Swallow the call. A flush timer should be armed for `generation`.
    Suppress { generation: u64 },
    /// Emit the call, after `summary` if there is one. `seq` identifies this
    /// emission when recording it.
    Emit { summary: Option<Summary>, seq: u64 },
}

#[derive(Debug, Default)]
pub struct ThrottleState {
    last_key: Option<String>,
    last: Option<LastEmission>,
    repeat_count: u32,
    last_log_ms: Option<u64>,
    /// Bumped on every passing call; a timer armed for an older generation is
    /// stale.
    generation: u64,
    emit_seq: u64,
    timer: Option<ScheduledFlush>,
}

impl ThrottleState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn repeat_count(&self) -> u32 {
        self.repeat_count
    }

    pub fn last(&self) -> Option<&LastEmission> {
        self.last.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn has_timer(&self) -> bool {
        self.timer.is_some()
    }

    /// Classifies a passing call. `key` is `None` when the call could not be
    /// serialized; such a call never counts as a repeat.
    pub fn observe(&mut self, key: Option<String>, now_ms: u64, config: &ThrottleConfig) -> Decision {
        let diff = self
            .last_log_ms
            .map_or(0, |last| now_ms.saturating_sub(last));
        self.last_log_ms = Some(now_ms);
        self.generation += 1;

        let same = key.is_some() && key == self.last_key;
        self.last_key = key;

        if diff < config.window_ms && same {
            self.repeat_count = self.repeat_count.saturating_add(1);
            if self.repeat_count > config.min_threshold {
                return Decision::Suppress {
                    generation: self.generation,
                };
            }
            return Decision::Emit {
                summary: None,
                seq: self.next_seq(),
            };
        }

        let summary = self.take_summary(config.min_threshold);
        self.repeat_count = 1;
        Decision::Emit {
            summary,
            seq: self.next_seq(),
        }
    }

    /// Flushes the streak if nothing happened since `generation` was handed
    /// out.
    pub fn flush_if_current(&mut self, generation: u64, min_threshold: u32) -> Option<Summary> {
        if generation != self.generation {
            return None;
        }
        self.timer = None;
        self.take_summary(min_threshold)
    }

    /// Flushes the streak unconditionally, dropping any armed timer.
    pub fn flush(&mut self, min_threshold: u32) -> Option<Summary> {
        self.generation += 1;
        if let Some(mut timer) = self.timer.take() {
            timer.cancel();
        }
        self.take_summary(min_threshold)
    }

    /// Stores the resolved message of emission `seq`, unless a later call
    /// was let through in the meantime.
    pub fn record_emission(&mut self, seq: u64, level: Level, message: ResolvedMessage) {
        if seq == self.emit_seq {
            self.last = Some(LastEmission { level, message });
        }
    }

    pub fn arm(&mut self, timer: ScheduledFlush) {
        self.timer = Some(timer);
    }

    pub fn take_timer(&mut self) -> Option<ScheduledFlush> {
        self.timer.take()
    }

    fn next_seq(&mut self) -> u64 {
        self.emit_seq += 1;
        self.emit_seq
    }

    fn take_summary(&mut self, min_threshold: u32) -> Option<Summary> {
        let suppressed = self.repeat_count.saturating_sub(min_threshold);
        if suppressed == 0 {
            return None;
        }
        let last = self.last.as_ref()?;
        self.repeat_count = 1;

        let mut message = last.message.clone();
        if suppressed > 1 {
            message = message.with_field(field(
                REPEATED_FIELD,
                format!("{} times", suppressed - 1),
            ));
        }
        Some(Summary {
            level: last.level,
            message,
            suppressed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn config() -> ThrottleConfig {
        ThrottleConfig::default()
    }

    fn key(text: &str) -> Option<String> {
        Some(text.to_string())
    }

    /// Feeds one call through the state the way the logger does.
    fn call(state: &mut ThrottleState, text: &str, now_ms: u64) -> Decision {
        let decision = state.observe(key(text), now_ms, &config());
        if let Decision::Emit { seq, .. } = &decision {
            state.record_emission(*seq, Level::Info, ResolvedMessage::new(text, vec![]));
        }
        decision
    }

    #[test]
    fn first_five_pass_then_suppress() {
        let mut state = ThrottleState::new();
        let outcomes: Vec<bool> = (0..10)
            .map(|i| matches!(call(&mut state, "a", i), Decision::Emit { .. }))
            .collect();
        assert_eq!(
            outcomes,
            [true, true, true, true, true, false, false, false, false, false]
        );
        assert_eq!(state.repeat_count(), 10);
    }

    #[test]
    fn timer_flush_reports_suppressed_minus_one() {
        let mut state = ThrottleState::new();
        let mut generation = 0;
        for i in 0..10 {
            if let Decision::Suppress { generation: g } = call(&mut state, "a", i) {
                generation = g;
            }
        }
        let summary = state.flush_if_current(generation, 5).unwrap();
        assert_eq!(summary.suppressed, 5);
        let repeated = summary.message.fields.last().unwrap();
        assert_eq!(repeated.identifier(), REPEATED_FIELD);
        assert_eq!(repeated.value().to_display_json(), "4 times");
        assert_eq!(state.repeat_count(), 1);
    }

    #[test]
    fn single_suppressed_call_flushes_without_field() {
        let mut state = ThrottleState::new();
        for i in 0..6 {
            call(&mut state, "a", i);
        }
        let summary = state.flush(5).unwrap();
        assert_eq!(summary.suppressed, 1);
        assert!(summary.message.fields.is_empty());
    }

    #[test]
    fn different_message_flushes_the_streak() {
        let mut state = ThrottleState::new();
        for i in 0..6 {
            call(&mut state, "a", i);
        }
        match call(&mut state, "b", 6) {
            Decision::Emit {
                summary: Some(summary),
                ..
            } => assert_eq!(summary.message.text, "a"),
            other => panic!("expected flush before b, got {other:?}"),
        }
        assert_eq!(state.repeat_count(), 1);
        assert_eq!(state.last().unwrap().message.text, "b");
    }

    #[test]
    fn elapsed_window_restarts_the_streak() {
        let mut state = ThrottleState::new();
        for i in 0..5 {
            call(&mut state, "a", i * 10);
        }
        assert!(matches!(
            call(&mut state, "a", 40 + 1_000),
            Decision::Emit { summary: None, .. }
        ));
        assert_eq!(state.repeat_count(), 1);
    }

    #[test]
    fn unserializable_calls_never_repeat() {
        let mut state = ThrottleState::new();
        for i in 0..20 {
            let decision = state.observe(None, i, &config());
            assert!(matches!(decision, Decision::Emit { .. }));
        }
    }

    #[test]
    fn stale_generation_does_not_flush() {
        let mut state = ThrottleState::new();
        let mut armed = 0;
        for i in 0..7 {
            if let Decision::Suppress { generation } = call(&mut state, "a", i) {
                armed = generation;
            }
        }
        call(&mut state, "a", 7);
        assert!(state.flush_if_current(armed, 5).is_none());
        assert_eq!(state.repeat_count(), 8);
    }

    #[test]
    fn late_resolution_of_an_older_emission_is_ignored() {
        let mut state = ThrottleState::new();
        let Decision::Emit { seq: first, .. } = state.observe(key("a"), 0, &config()) else {
            panic!("first call must pass");
        };
        let Decision::Emit { seq: second, .. } = state.observe(key("b"), 1, &config()) else {
            panic!("second call must pass");
        };
        state.record_emission(second, Level::Warn, ResolvedMessage::new("b", vec![]));
        state.record_emission(first, Level::Info, ResolvedMessage::new("a", vec![]));
        assert_eq!(state.last().unwrap().message.text, "b");
    }

    proptest! {
        #[test]
        fn streak_emits_exactly_threshold(calls in 1u32..200, threshold in 1u32..20) {
            let config = ThrottleConfig { window_ms: 1_000, min_threshold: threshold };
            let mut state = ThrottleState::new();
            let mut emitted = 0;
            for i in 0..calls {
                if let Decision::Emit { seq, .. } = state.observe(key("x"), u64::from(i), &config) {
                    state.record_emission(seq, Level::Info, ResolvedMessage::new("x", vec![]));
                    emitted += 1;
                }
            }
            prop_assert_eq!(emitted, calls.min(threshold));
            let summary = state.flush(threshold);
            prop_assert_eq!(summary.map(|s| s.suppressed).unwrap_or(0), calls.saturating_sub(threshold));
        }
    }
}
