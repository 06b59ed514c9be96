//! Parses the reachability oracle's DOT-style counterexample certificate
//! into a [`SymWord`] (`spec.md` §6, grounded in `tlsep/tLsep.py`'s
//! `extract_details`/`extract_cex`, and in the DOT conventions the
//! `graphviz-render` crate emits from the other direction).
//!
//! The oracle reports emptiness as `REACHABLE false`; otherwise it prints a
//! digraph whose initial node carries the attribute `initial="true"` and
//! whose edges have the exact shape:
//! ```text
//!   SRC -> TGT [delay="…", guard="…", reset="…", src_invariant="…", tgt_invariant="…", vedge="<…@EVENT>"]
//! ```
//! The certificate is consumed by locating the initial node and walking
//! forward along the (assumed unique) outgoing edge of each node in turn.

use std::collections::HashMap;

use erax_core::{Event, Guard, GuardError, SymEvent, SymWord};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CertificateError {
    #[error("oracle reported the label unreachable")]
    Unreachable,
    #[error("no node with attribute initial=\"true\" found in the certificate")]
    NoInitialNode,
    #[error("malformed vedge attribute \"{0}\" (expected <...@EVENT>)")]
    MalformedVedge(String),
    #[error("{0}")]
    Guard(#[from] GuardError),
    #[error("certificate edge from \"{0}\" branches (expected a single path)")]
    BranchingPath(String),
}

struct Edge {
    tgt: String,
    event: Event,
    guard: Guard,
}

/// `Some(counterexample)` if the oracle's output describes a reachable
/// path; `Err(CertificateError::Unreachable)` if it reported
/// `REACHABLE false` for the queried label; otherwise a parse error.
pub fn parse_certificate(input: &str) -> Result<SymWord, CertificateError> {
    if input.trim().starts_with("REACHABLE false") {
        return Err(CertificateError::Unreachable);
    }

    let mut initial: Option<String> = None;
    let mut edges: HashMap<String, Vec<Edge>> = HashMap::new();

    for line in input.lines() {
        let line = line.trim();
        if line.contains("initial=\"true\"") {
            if let Some(name) = extract_node_name(line) {
                initial = Some(name);
            }
            continue;
        }
        if let Some((src, tgt, attrs)) = parse_edge_line(line) {
            let vedge = extract_attr(attrs, "vedge")
                .ok_or_else(|| CertificateError::MalformedVedge(line.to_string()))?;
            let event = extract_event(&vedge)?;
            let guard_str = extract_attr(attrs, "guard").unwrap_or_else(|| "True".to_string());
            let guard = Guard::parse(&guard_str)?;
            edges.entry(src).or_default().push(Edge { tgt, event, guard });
        }
    }

    let mut current = initial.ok_or(CertificateError::NoInitialNode)?;
    let mut word = SymWord::epsilon();
    loop {
        let Some(mut outs) = edges.remove(&current) else {
            break;
        };
        if outs.len() > 1 {
            return Err(CertificateError::BranchingPath(current));
        }
        let edge = outs.pop().expect("checked non-empty by remove's Some arm being non-empty by construction");
        word = word.concat(&SymWord::from_events([SymEvent::new(edge.event, edge.guard)]));
        current = edge.tgt;
    }
    Ok(word)
}

fn extract_node_name(line: &str) -> Option<String> {
    let before_bracket = line.split('[').next()?;
    let name = before_bracket.trim().trim_matches('"');
    (!name.is_empty()).then(|| name.to_string())
}

fn parse_edge_line(line: &str) -> Option<(String, String, &str)> {
    let (lhs, rest) = line.split_once('[')?;
    let (src_part, tgt_part) = lhs.split_once("->")?;
    let attrs = rest.trim_end().trim_end_matches(';').trim_end();
    let attrs = attrs.strip_suffix(']')?;
    Some((clean_node(src_part), clean_node(tgt_part), attrs))
}

fn clean_node(s: &str) -> String {
    s.trim().trim_matches('"').to_string()
}

fn extract_attr(attrs: &str, key: &str) -> Option<String> {
    for part in split_top_level_commas(attrs) {
        let part = part.trim();
        if let Some(value) = part.strip_prefix(key).and_then(|r| r.trim_start().strip_prefix('=')) {
            return Some(value.trim().trim_matches('"').to_string());
        }
    }
    None
}

/// Splits `attrs` on commas that are not inside a quoted value, since a
/// `vedge` value like `<a,b@EVENT>` may itself contain commas.
fn split_top_level_commas(attrs: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;
    for (i, c) in attrs.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                parts.push(&attrs[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&attrs[start..]);
    parts
}

fn extract_event(vedge: &str) -> Result<Event, CertificateError> {
    let at = vedge
        .find('@')
        .ok_or_else(|| CertificateError::MalformedVedge(vedge.to_string()))?;
    let rest = &vedge[at + 1..];
    let end = rest.find('>').unwrap_or(rest.len());
    Ok(Event::new(&rest[..end]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use erax_core::Cmp;

    #[test]
    fn reports_unreachable() {
        assert_eq!(
            parse_certificate("REACHABLE false"),
            Err(CertificateError::Unreachable)
        );
    }

    #[test]
    fn walks_single_edge_path() {
        let dot = r#"digraph {
  "q0" [initial="true"];
  "q0" -> "q1" [delay="0", guard="a>1", reset="a", src_invariant="true", tgt_invariant="true", vedge="<q0,q1@a>"]
}"#;
        let word = parse_certificate(dot).unwrap();
        assert_eq!(word.len(), 1);
        assert_eq!(word.events()[0].event(), &Event::new("a"));
        assert_eq!(word.events()[0].guard(), &Guard::simple(Event::new("a"), Cmp::Gt, 1));
    }

    #[test]
    fn walks_multi_edge_path_in_order() {
        let dot = r#"digraph {
  "q0" [initial="true"];
  "q0" -> "q1" [guard="True", vedge="<q0,q1@a>"]
  "q1" -> "q2" [guard="b==2", vedge="<q1,q2@b>"]
}"#;
        let word = parse_certificate(dot).unwrap();
        assert_eq!(word.len(), 2);
        assert_eq!(word.events()[0].event(), &Event::new("a"));
        assert_eq!(word.events()[1].event(), &Event::new("b"));
    }

    #[test]
    fn missing_initial_node_is_an_error() {
        let dot = r#"digraph {
  "q0" -> "q1" [guard="True", vedge="<q0,q1@a>"]
}"#;
        assert_eq!(parse_certificate(dot), Err(CertificateError::NoInitialNode));
    }
}
