//! Parses the line-oriented SUL textual format (`spec.md` §6): `event:`,
//! `location:` and `transition:` declarations, building an
//! [`erax_core::Era`] through its ordinary `add_state`/`make_initial`/
//! `make_final`/transition API — no parser-internal shortcuts. The format
//! accepted here is the one [`erax_core::Era`]'s own `Display` impl
//! produces, so a learned hypothesis can be written out and read back.

use erax_core::{Alphabet, Era, Event, Guard, GuardError, GuardOracle};
use thiserror::Error;
use tracing::trace;

#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("line {0}: malformed attribute block \"{1}\" (expected NAME{{attr,attr}})")]
    MalformedAttributes(usize, String),
    #[error("line {0}: unrecognized attribute \"{1}\"")]
    UnknownAttribute(usize, String),
    #[error("line {0}: malformed transition line \"{1}\" (expected transition:SRC:TGT:EVENT:GUARD)")]
    MalformedTransition(usize, String),
    #[error("line {0}: {1}")]
    Guard(usize, GuardError),
    #[error("line {0}: transition references undeclared event \"{1}\"")]
    UnknownEvent(usize, String),
    #[error("line {0}: transition references undeclared location \"{1}\"")]
    UnknownLocation(usize, String),
    #[error("no location was marked initial")]
    NoInitialState,
    #[error("more than one location marked initial (\"{0}\" and \"{1}\")")]
    MultipleInitialStates(String, String),
    #[error("line {0}: event \"{1}\" declared twice")]
    DuplicateEvent(usize, String),
}

struct PendingTransition {
    src: String,
    tgt: String,
    event: String,
    guard: String,
    line: usize,
}

/// Parses `input` into a fresh [`Era`], per `spec.md` §6. Transitions are
/// inserted through [`Era::add_transition`]'s subsumption-preserving path
/// (mirroring `tlsep/parse.py`'s `build_era_from_file`), so `guard_oracle`
/// is needed for the containment checks that discipline imposes.
pub fn parse(guard_oracle: &impl GuardOracle, input: &str) -> Result<Era, ParseError> {
    let mut alphabet = Alphabet::new();
    let mut locations: Vec<(String, bool, bool)> = Vec::new();
    let mut transitions: Vec<PendingTransition> = Vec::new();

    for (idx, raw_line) in input.lines().enumerate() {
        let lineno = idx + 1;
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        let Some((keyword, rest)) = line.split_once(':') else {
            trace!(lineno, "skipping line with no keyword separator");
            continue;
        };

        match keyword.trim() {
            "event" => {
                let (name, attrs) = split_attrs(rest)
                    .ok_or_else(|| ParseError::MalformedAttributes(lineno, line.to_string()))?;
                let mut active = false;
                for attr in attrs.split(',').map(str::trim).filter(|a| !a.is_empty()) {
                    match attr {
                        "active" => active = true,
                        other => return Err(ParseError::UnknownAttribute(lineno, other.to_string())),
                    }
                }
                let event = Event::new(name.trim());
                if alphabet.contains(&event) {
                    return Err(ParseError::DuplicateEvent(lineno, event.name().to_string()));
                }
                alphabet.declare(event, active);
            }
            "location" => {
                let (name, attrs) = split_attrs(rest)
                    .ok_or_else(|| ParseError::MalformedAttributes(lineno, line.to_string()))?;
                let mut initial = false;
                let mut accepting = false;
                for attr in attrs.split(',').map(str::trim).filter(|a| !a.is_empty()) {
                    match attr {
                        "initial" => initial = true,
                        "accepting" => accepting = true,
                        other => return Err(ParseError::UnknownAttribute(lineno, other.to_string())),
                    }
                }
                locations.push((name.trim().to_string(), initial, accepting));
            }
            "transition" => {
                let parts: Vec<&str> = rest.splitn(4, ':').collect();
                let [src, tgt, event, guard] = parts[..] else {
                    return Err(ParseError::MalformedTransition(lineno, line.to_string()));
                };
                transitions.push(PendingTransition {
                    src: src.trim().to_string(),
                    tgt: tgt.trim().to_string(),
                    event: event.trim().to_string(),
                    guard: guard.trim().to_string(),
                    line: lineno,
                });
            }
            other => trace!(lineno, other, "skipping unrecognized keyword"),
        }
    }

    let mut era = Era::new(locations.len(), alphabet);
    let mut initial_name: Option<String> = None;
    for (index, (name, initial, accepting)) in locations.iter().enumerate() {
        era.rename_state(index, name.clone());
        if *initial {
            if let Some(prior) = &initial_name {
                return Err(ParseError::MultipleInitialStates(prior.clone(), name.clone()));
            }
            era.make_initial(index);
            initial_name = Some(name.clone());
        }
        if *accepting {
            era.make_final(index);
        }
    }
    if era.initial_state().is_none() {
        return Err(ParseError::NoInitialState);
    }

    for t in transitions {
        let src = era
            .find_state_by_name(&t.src)
            .ok_or_else(|| ParseError::UnknownLocation(t.line, t.src.clone()))?;
        let tgt = era
            .find_state_by_name(&t.tgt)
            .ok_or_else(|| ParseError::UnknownLocation(t.line, t.tgt.clone()))?;
        let event = Event::new(&t.event);
        if !era.alphabet().contains(&event) {
            return Err(ParseError::UnknownEvent(t.line, t.event.clone()));
        }
        let guard = Guard::parse(&t.guard).map_err(|e| ParseError::Guard(t.line, e))?;
        era.add_transition(guard_oracle, src, event, guard, tgt);
    }

    Ok(era)
}

/// Splits `NAME{attr,attr}` into `("NAME", "attr,attr")`.
fn split_attrs(rest: &str) -> Option<(&str, &str)> {
    let open = rest.find('{')?;
    let close = rest.rfind('}')?;
    if close < open {
        return None;
    }
    Some((&rest[..open], &rest[open + 1..close]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use erax_core::Cmp;

    struct TrueOracle;
    impl GuardOracle for TrueOracle {
        fn is_contained(&self, sub: &Guard, sup: &Guard) -> bool {
            sup.is_true() || sub == sup
        }
        fn intersects(&self, a: &Guard, b: &Guard) -> bool {
            a.is_true() || b.is_true() || a == b
        }
    }

    #[test]
    fn epsilon_acceptance_scenario() {
        // spec.md §8 scenario 1: one initial-and-accepting state, no events.
        let sul = "location:q0{initial,accepting}";
        let era = parse(&TrueOracle, sul).unwrap();
        assert_eq!(era.states_count(), 1);
        assert!(era.state(era.initial_state().unwrap()).is_accepting());
    }

    #[test]
    fn single_event_unconditional_scenario() {
        // spec.md §8 scenario 2.
        let sul = "\
event:a{active}
location:q0{initial}
location:q1{accepting}
transition:q0:q1:a:True";
        let era = parse(&TrueOracle, sul).unwrap();
        assert_eq!(era.states_count(), 2);
        assert!(era.alphabet().is_active(&Event::new("a")));
        let t = &era.transitions_between(
            era.find_state_by_name("q0").unwrap(),
            era.find_state_by_name("q1").unwrap(),
        )[0];
        assert!(t.guard().is_true());
    }

    #[test]
    fn simple_guard_scenario() {
        // spec.md §8 scenario 3.
        let sul = "\
event:a{active}
location:q0{initial}
location:q1{accepting}
transition:q0:q1:a:a==1";
        let era = parse(&TrueOracle, sul).unwrap();
        let t = &era.transitions_between(
            era.find_state_by_name("q0").unwrap(),
            era.find_state_by_name("q1").unwrap(),
        )[0];
        assert_eq!(t.guard(), &Guard::simple(Event::new("a"), Cmp::Eq, 1));
    }

    #[test]
    fn rejects_transition_with_undeclared_event() {
        let sul = "\
location:q0{initial}
location:q1{accepting}
transition:q0:q1:a:True";
        assert!(matches!(
            parse(&TrueOracle, sul),
            Err(ParseError::UnknownEvent(_, _))
        ));
    }

    #[test]
    fn rejects_transition_with_unknown_location() {
        let sul = "\
event:a{active}
location:q0{initial,accepting}
transition:q0:q1:a:True";
        assert!(matches!(
            parse(&TrueOracle, sul),
            Err(ParseError::UnknownLocation(_, _))
        ));
    }

    #[test]
    fn rejects_multiple_initial_states() {
        let sul = "\
location:q0{initial}
location:q1{initial}";
        assert!(matches!(
            parse(&TrueOracle, sul),
            Err(ParseError::MultipleInitialStates(_, _))
        ));
    }

    #[test]
    fn rejects_no_initial_state() {
        let sul = "location:q0{accepting}";
        assert!(matches!(
            parse(&TrueOracle, sul),
            Err(ParseError::NoInitialState)
        ));
    }

    #[test]
    fn rejects_duplicate_event_declaration() {
        let sul = "\
event:a{active}
event:a{}
location:q0{initial}";
        assert!(matches!(
            parse(&TrueOracle, sul),
            Err(ParseError::DuplicateEvent(_, _))
        ));
    }

    #[test]
    fn dominating_guard_subsumes_weaker_transition() {
        // Two legal transition lines between the same pair of locations on
        // the same event, one strictly weaker than the other: add_transition
        // must collapse them rather than keep both.
        let sul = "\
event:a{active}
location:q0{initial}
location:q1{accepting}
transition:q0:q1:a:a==1
transition:q0:q1:a:True";
        let era = parse(&TrueOracle, sul).unwrap();
        let transitions = era.transitions_between(
            era.find_state_by_name("q0").unwrap(),
            era.find_state_by_name("q1").unwrap(),
        );
        assert_eq!(transitions.len(), 1);
        assert!(transitions[0].guard().is_true());
    }

    #[test]
    fn round_trips_through_eras_own_display() {
        let mut era = Era::new(2, {
            let mut a = Alphabet::new();
            a.declare(Event::new("a"), true);
            a
        });
        era.make_initial(0);
        era.make_final(1);
        era.add_transition(&TrueOracle, 0, Event::new("a"), Guard::True, 1);

        let text = era.to_string();
        let lines: String = text
            .lines()
            .filter(|l| !l.starts_with("number of states") && !l.starts_with("deterministic?"))
            .collect::<Vec<_>>()
            .join("\n");
        let reparsed = parse(&TrueOracle, &lines).unwrap();
        assert_eq!(reparsed.states_count(), era.states_count());
        assert!(reparsed.state(reparsed.initial_state().unwrap()).is_init());
    }
}
