use std::fmt;

/// A label of the alphabet, identified by its whitespace-stripped name.
///
/// Two events are equal iff their names are equal; [`Event`] is cheap to
/// clone and is used both as an alphabet symbol and, for active events, as
/// the name of the per-event clock that is reset on every occurrence.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Event {
    name: String,
}

impl Event {
    /// The reserved symbol used for the empty (`ε`) symbolic event.
    pub const EPSILON: &'static str = "EPSILON";

    /// Creates a new event, stripping all whitespace from `name`.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self {
            name: name.as_ref().chars().filter(|c| !c.is_whitespace()).collect(),
        }
    }

    /// Returns the (whitespace-stripped) name of this event.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this is the reserved `EPSILON` event.
    pub fn is_epsilon(&self) -> bool {
        self.name == Self::EPSILON
    }

    /// The reserved epsilon event.
    pub fn epsilon() -> Self {
        Self::new(Self::EPSILON)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl From<&str> for Event {
    fn from(value: &str) -> Self {
        Event::new(value)
    }
}

impl From<String> for Event {
    fn from(value: String) -> Self {
        Event::new(value)
    }
}

/// The alphabet of an ERA: an ordered, finite set of events together with
/// the subset marked active (i.e. carrying a per-event clock).
#[derive(Debug, Clone, Default)]
pub struct Alphabet {
    events: Vec<Event>,
    active: Vec<bool>,
}

impl Alphabet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares `event`, optionally marking it active. Panics if an event
    /// with the same name was already declared.
    pub fn declare(&mut self, event: Event, active: bool) {
        assert!(
            !self.events.contains(&event),
            "event {event} declared twice"
        );
        self.events.push(event);
        self.active.push(active);
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// The ordered list of active events, i.e. the clocks of the ERA.
    pub fn active_clocks(&self) -> Vec<Event> {
        self.events
            .iter()
            .zip(&self.active)
            .filter_map(|(e, &a)| a.then(|| e.clone()))
            .collect()
    }

    pub fn is_active(&self, event: &Event) -> bool {
        self.events
            .iter()
            .position(|e| e == event)
            .map(|i| self.active[i])
            .unwrap_or(false)
    }

    pub fn contains(&self, event: &Event) -> bool {
        self.events.contains(event)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_whitespace_from_name() {
        let e = Event::new(" a b ");
        assert_eq!(e.name(), "ab");
    }

    #[test]
    fn alphabet_tracks_active_events() {
        let mut alphabet = Alphabet::new();
        alphabet.declare(Event::new("a"), true);
        alphabet.declare(Event::new("b"), false);
        assert_eq!(alphabet.active_clocks(), vec![Event::new("a")]);
        assert!(alphabet.is_active(&Event::new("a")));
        assert!(!alphabet.is_active(&Event::new("b")));
    }
}
