use std::fmt;

use itertools::Itertools;

use crate::event::Event;
use crate::guard::Guard;

/// A guarded letter `(event, guard)` of the symbolic input alphabet, i.e. an
/// element of `A = L x R` (`spec.md` §3). The reserved `ε` symbol is the
/// pair `(EPSILON, True)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SymEvent {
    event: Event,
    guard: Guard,
}

impl SymEvent {
    pub fn new(event: Event, guard: Guard) -> Self {
        Self { event, guard }
    }

    /// The reserved `ε` symbolic event.
    pub fn epsilon() -> Self {
        Self::new(Event::epsilon(), Guard::True)
    }

    pub fn event(&self) -> &Event {
        &self.event
    }

    pub fn guard(&self) -> &Guard {
        &self.guard
    }

    pub fn is_epsilon(&self) -> bool {
        self.event.is_epsilon()
    }
}

impl fmt::Display for SymEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.event, self.guard)
    }
}

/// A finite sequence of [`SymEvent`]s, denoting the set of concrete timed
/// words whose per-event clock valuations at each position satisfy the
/// corresponding guard (`spec.md` §4.2). The empty word `ε` is represented
/// as the zero-length sequence; unlike the original implementation there is
/// no sentinel `EPSILON` token stored in the sequence, so concatenation
/// (`ε` as identity) falls out of plain vector concatenation rather than a
/// special case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SymWord {
    events: Vec<SymEvent>,
}

impl SymWord {
    pub fn epsilon() -> Self {
        Self { events: Vec::new() }
    }

    pub fn single(event: SymEvent) -> Self {
        if event.is_epsilon() {
            Self::epsilon()
        } else {
            Self {
                events: vec![event],
            }
        }
    }

    pub fn from_events(events: impl IntoIterator<Item = SymEvent>) -> Self {
        let events: Vec<_> = events.into_iter().filter(|e| !e.is_epsilon()).collect();
        Self { events }
    }

    pub fn is_epsilon(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[SymEvent] {
        &self.events
    }

    /// The word obtained by appending `suffix`, treating `ε` as identity on
    /// either side.
    pub fn concat(&self, suffix: &SymWord) -> SymWord {
        let mut events = self.events.clone();
        events.extend(suffix.events.iter().cloned());
        SymWord { events }
    }

    /// Every non-empty prefix of this word, shortest first.
    pub fn prefixes(&self) -> impl Iterator<Item = SymWord> + '_ {
        (1..=self.events.len()).map(move |i| SymWord {
            events: self.events[..i].to_vec(),
        })
    }

    /// The suffix starting at position `from` (0-indexed).
    pub fn suffix_from(&self, from: usize) -> SymWord {
        SymWord {
            events: self.events[from.min(self.events.len())..].to_vec(),
        }
    }

    /// The prefix of length `len`.
    pub fn prefix_of_len(&self, len: usize) -> SymWord {
        SymWord {
            events: self.events[..len.min(self.events.len())].to_vec(),
        }
    }
}

impl fmt::Display for SymWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_epsilon() {
            return f.write_str("EPSILON");
        }
        f.write_str(&self.events.iter().join(", "))
    }
}

impl FromIterator<SymEvent> for SymWord {
    fn from_iter<T: IntoIterator<Item = SymEvent>>(iter: T) -> Self {
        SymWord::from_events(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guard::Cmp;

    fn ev(name: &str) -> SymEvent {
        SymEvent::new(Event::new(name), Guard::True)
    }

    #[test]
    fn epsilon_is_identity_for_concat() {
        let eps = SymWord::epsilon();
        let w = SymWord::from_events([ev("a")]);
        assert_eq!(eps.concat(&w), w);
        assert_eq!(w.concat(&eps), w);
    }

    #[test]
    fn concat_is_pointwise() {
        let w1 = SymWord::from_events([ev("a")]);
        let w2 = SymWord::from_events([ev("b")]);
        let w = w1.concat(&w2);
        assert_eq!(w.len(), 2);
        assert_eq!(w.events()[0], ev("a"));
        assert_eq!(w.events()[1], ev("b"));
    }

    #[test]
    fn display_of_epsilon_is_reserved_token() {
        assert_eq!(SymWord::epsilon().to_string(), "EPSILON");
    }

    #[test]
    fn display_includes_guard() {
        let w = SymWord::from_events([SymEvent::new(
            Event::new("a"),
            Guard::simple(Event::new("a"), Cmp::Eq, 1),
        )]);
        assert_eq!(w.to_string(), "(a, a==1)");
    }

    #[test]
    fn prefixes_are_ordered_shortest_first() {
        let w = SymWord::from_events([ev("a"), ev("b"), ev("c")]);
        let prefixes: Vec<_> = w.prefixes().collect();
        assert_eq!(prefixes.len(), 3);
        assert_eq!(prefixes[0].len(), 1);
        assert_eq!(prefixes[2], w);
    }
}
