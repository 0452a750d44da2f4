//! Fields: named annotations attached to a log message.
//!
//! A field value is either a `Timer` (rendered as colored elapsed time) or any
//! serde-serializable value captured as JSON at construction. Values whose
//! serialization fails are kept as `Opaque` text so a log call never fails
//! because of a field.

use serde::ser::{Error as _, SerializeStruct};
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::color::Rgb;
use crate::time::{Clock, SystemClock};

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Timer(Timer),
    Json(Value),
    /// Error text of a value that could not be serialized.
    Opaque(String),
}

impl FieldValue {
    pub fn as_timer(&self) -> Option<&Timer> {
        match self {
            FieldValue::Timer(timer) => Some(timer),
            _ => None,
        }
    }

    /// JSON used when rendering. Opaque values render as their text.
    pub fn to_display_json(&self) -> Value {
        match self {
            FieldValue::Timer(timer) => serde_json::json!({
                "expected_ms": timer.expected_ms,
                "started_at_ms": timer.started_at_ms,
            }),
            FieldValue::Json(value) => value.clone(),
            FieldValue::Opaque(text) => Value::String(text.clone()),
        }
    }

    /// Console-style type label shown next to grouped fields.
    pub fn type_name(&self) -> Option<&'static str> {
        match self {
            FieldValue::Timer(_) => Some("Timer"),
            FieldValue::Json(Value::Null) | FieldValue::Opaque(_) => None,
            FieldValue::Json(Value::Bool(_)) => Some("Boolean"),
            FieldValue::Json(Value::Number(_)) => Some("Number"),
            FieldValue::Json(Value::String(_)) => Some("String"),
            FieldValue::Json(Value::Array(_)) => Some("Array"),
            FieldValue::Json(Value::Object(_)) => Some("Object"),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Timer(timer) => {
                let mut state = serializer.serialize_struct("Timer", 2)?;
                state.serialize_field("expected_ms", &timer.expected_ms)?;
                state.serialize_field("started_at_ms", &timer.started_at_ms)?;
                state.end()
            }
            FieldValue::Json(value) => value.serialize(serializer),
            FieldValue::Opaque(reason) => Err(S::Error::custom(reason)),
        }
    }
}

/// Conversion into a field value.
///
/// Every `Serialize` type is captured as JSON; `Timer` keeps its own variant.
pub trait IntoFieldValue {
    fn into_field_value(self) -> FieldValue;
}

impl<T: Serialize> IntoFieldValue for T {
    fn into_field_value(self) -> FieldValue {
        match serde_json::to_value(&self) {
            Ok(value) => FieldValue::Json(value),
            Err(err) => FieldValue::Opaque(err.to_string()),
        }
    }
}

impl IntoFieldValue for Timer {
    fn into_field_value(self) -> FieldValue {
        FieldValue::Timer(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    identifier: String,
    value: FieldValue,
}

impl Field {
    pub fn new(identifier: impl Into<String>, value: FieldValue) -> Self {
        Self {
            identifier: identifier.into(),
            value,
        }
    }

    pub fn timer(identifier: impl Into<String>, timer: Timer) -> Self {
        Self::new(identifier, FieldValue::Timer(timer))
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn value(&self) -> &FieldValue {
        &self.value
    }

    pub fn is_timer(&self) -> bool {
        self.value.as_timer().is_some()
    }

    /// `{"identifier": .., "value": ..}` with opaque values as text.
    pub fn to_display_json(&self) -> Value {
        serde_json::json!({
            "identifier": self.identifier,
            "value": self.value.to_display_json(),
        })
    }
}

/// A field to show with the message.
pub fn field(identifier: impl Into<String>, value: impl IntoFieldValue) -> Field {
    Field::new(identifier, value.into_field_value())
}

pub fn timer_field(identifier: impl Into<String>, timer: Timer) -> Field {
    Field::timer(identifier, timer)
}

/// Expected duration plus the moment the measured operation started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timer {
    expected_ms: u64,
    started_at_ms: u64,
}

impl Timer {
    pub fn started_at(expected_ms: u64, started_at_ms: u64) -> Self {
        Self {
            expected_ms,
            started_at_ms,
        }
    }

    pub fn start(expected_ms: u64, clock: &dyn Clock) -> Self {
        Self::started_at(expected_ms, clock.now_ms())
    }

    pub fn expected_ms(&self) -> u64 {
        self.expected_ms
    }

    pub fn started_at_ms(&self) -> u64 {
        self.started_at_ms
    }

    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.started_at_ms)
    }

    pub fn color(&self, now_ms: u64) -> Rgb {
        timer_color(self.elapsed_ms(now_ms), self.expected_ms)
    }
}

/// Log how long something took. Call this before doing the thing, then pass
/// it into a field once it finished.
pub fn start_timer(expected_ms: u64) -> Timer {
    Timer::start(expected_ms, &SystemClock)
}

/// Green under budget, red over budget, equal parts at exactly the budget.
///
/// A zero budget counts as infinitely over budget.
pub fn timer_color(elapsed_ms: u64, expected_ms: u64) -> Rgb {
    let ratio = if expected_ms == 0 {
        f64::INFINITY
    } else {
        elapsed_ms as f64 / expected_ms as f64
    };
    let red = 125.0 * ratio;
    let green = 125.0 * (2.0 - ratio);
    Rgb::from_channels(red, green, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::VirtualClock;
    use std::collections::HashMap;

    #[test]
    fn serializable_values_become_json() {
        let f = field("userId", 12345);
        assert_eq!(f.identifier(), "userId");
        assert_eq!(f.value(), &FieldValue::Json(serde_json::json!(12345)));
        assert_eq!(f.value().type_name(), Some("Number"));
    }

    #[test]
    fn timers_keep_their_variant() {
        let f = field("time", Timer::started_at(100, 5));
        assert!(f.is_timer());
        assert_eq!(f.value().type_name(), Some("Timer"));
    }

    #[test]
    fn unserializable_values_become_opaque() {
        let mut map = HashMap::new();
        map.insert((1, 2), "tuple keys are not valid JSON object keys");
        let f = field("map", map);
        assert!(matches!(f.value(), FieldValue::Opaque(_)));
        assert!(serde_json::to_string(&f).is_err());
        assert!(f.to_display_json()["value"].is_string());
    }

    #[test]
    fn timer_elapsed_saturates() {
        let timer = Timer::started_at(100, 1_000);
        assert_eq!(timer.elapsed_ms(1_050), 50);
        assert_eq!(timer.elapsed_ms(900), 0);
    }

    #[test]
    fn timer_reads_the_given_clock() {
        let clock = VirtualClock::new(7_000);
        let timer = Timer::start(200, &clock);
        clock.advance(150);
        assert_eq!(timer.elapsed_ms(clock.now_ms()), 150);
    }

    #[test]
    fn timer_color_leans_by_budget() {
        let under = timer_color(50, 100);
        assert!(under.green() > under.red());
        assert_eq!(under, Rgb(63, 188, 0));

        let over = timer_color(200, 100);
        assert!(over.red() > over.green());

        let exact = timer_color(100, 100);
        assert_eq!(exact.red(), exact.green());
        assert_eq!(exact.to_string(), "#7d7d00");
    }

    #[test]
    fn zero_budget_is_over_budget() {
        assert_eq!(timer_color(0, 0), Rgb(255, 0, 0));
    }
}
