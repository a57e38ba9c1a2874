use serde::{Deserialize, Deserializer, Serialize};

/// Constant-acceleration interval with a strictly positive duration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Event {
    acceleration: f64,
    duration: f64,
}

impl Event {
    /// Returns `None` unless `duration > 0` (NaN is rejected too).
    pub fn new(acceleration: f64, duration: f64) -> Option<Self> {
        if duration > 0.0 {
            Some(Self { acceleration, duration })
        } else {
            None
        }
    }

    pub fn acceleration(&self) -> f64 { self.acceleration }
    pub fn duration(&self) -> f64 { self.duration }
}

/// Event as authored, before validation. Field names follow the form (`acc`, `dur`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    #[serde(rename = "acc", default, deserialize_with = "lenient_number")]
    pub acceleration: f64,
    #[serde(rename = "dur", default, deserialize_with = "lenient_number")]
    pub duration: f64,
}

impl RawEvent {
    pub fn new(acceleration: f64, duration: f64) -> Self {
        Self { acceleration, duration }
    }
}

impl Default for RawEvent {
    /// A freshly added form row: no acceleration for one second.
    fn default() -> Self {
        Self { acceleration: 0.0, duration: 1.0 }
    }
}

/// Ordered, validated list of events for one object.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EventSequence {
    events: Vec<Event>,
}

impl EventSequence {
    /// Keeps the entries with `duration > 0` in their authored order.
    /// Anything else is dropped without error.
    pub fn build<'a, I>(raw: I) -> Self
    where
        I: IntoIterator<Item = &'a RawEvent>,
    {
        let mut events = Vec::new();
        for (index, r) in raw.into_iter().enumerate() {
            let acceleration = finite_or_zero(r.acceleration);
            match Event::new(acceleration, finite_or_zero(r.duration)) {
                Some(e) => events.push(e),
                None => tracing::debug!(index, duration = r.duration, "dropping event with non-positive duration"),
            }
        }
        Self { events }
    }

    pub fn len(&self) -> usize { self.events.len() }
    pub fn is_empty(&self) -> bool { self.events.is_empty() }
    pub fn get(&self, index: usize) -> Option<&Event> { self.events.get(index) }
    pub fn iter(&self) -> std::slice::Iter<'_, Event> { self.events.iter() }

    /// Nominal length of the motion plan.
    pub fn total_duration(&self) -> f64 {
        self.events.iter().map(Event::duration).sum()
    }
}

impl<'a> IntoIterator for &'a EventSequence {
    type Item = &'a Event;
    type IntoIter = std::slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter { self.events.iter() }
}

/// Parses a form field the way the authoring layer does: anything that is not a
/// finite number becomes `0`.
pub fn parse_number(text: &str) -> f64 {
    text.trim().parse::<f64>().map(finite_or_zero).unwrap_or(0.0)
}

pub(crate) fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LooseNumber {
    Number(f64),
    Text(String),
    Other(serde::de::IgnoredAny),
}

/// Accepts numbers, numeric strings, `null` or anything else; non-numbers map to `0`.
pub(crate) fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match LooseNumber::deserialize(deserializer)? {
        LooseNumber::Number(v) => finite_or_zero(v),
        LooseNumber::Text(s) => parse_number(&s),
        LooseNumber::Other(_) => 0.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_non_positive_durations_and_keeps_order() {
        let raw = [
            RawEvent::new(1.0, 2.0),
            RawEvent::new(1.0, -3.0),
            RawEvent::new(-2.0, 0.0),
            RawEvent::new(3.0, 0.5),
        ];
        let seq = EventSequence::build(&raw);
        assert_eq!(seq.len(), 2);
        assert_eq!(seq.get(0).map(Event::acceleration), Some(1.0));
        assert_eq!(seq.get(1).map(Event::acceleration), Some(3.0));
        assert_eq!(seq.total_duration(), 2.5);
    }

    #[test]
    fn only_invalid_events_give_empty_sequence() {
        let seq = EventSequence::build(&[RawEvent::new(1.0, -3.0)]);
        assert!(seq.is_empty());
        assert_eq!(seq.total_duration(), 0.0);
    }

    #[test]
    fn nan_duration_is_dropped() {
        let seq = EventSequence::build(&[RawEvent::new(1.0, f64::NAN), RawEvent::new(f64::NAN, 1.0)]);
        assert_eq!(seq.len(), 1);
        assert_eq!(seq.get(0).map(Event::acceleration), Some(0.0));
    }

    #[test]
    fn parse_number_normalizes_garbage() {
        assert_eq!(parse_number(" 2.5 "), 2.5);
        assert_eq!(parse_number("-1e2"), -100.0);
        assert_eq!(parse_number(""), 0.0);
        assert_eq!(parse_number("abc"), 0.0);
        assert_eq!(parse_number("inf"), 0.0);
    }

    #[test]
    fn raw_event_json_is_lenient() {
        let raw: Vec<RawEvent> =
            serde_json::from_str(r#"[{"acc": 2, "dur": "1.5"}, {"acc": null}, {"acc": "x", "dur": true}]"#)
                .unwrap();
        assert_eq!(raw[0], RawEvent::new(2.0, 1.5));
        assert_eq!(raw[1], RawEvent::new(0.0, 0.0));
        assert_eq!(raw[2], RawEvent::new(0.0, 0.0));
        assert_eq!(EventSequence::build(&raw).len(), 1);
    }
}
