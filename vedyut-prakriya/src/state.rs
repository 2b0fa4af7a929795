//! The ordered sequence of upadeśas that a derivation thread carries,
//! plus the append-only history of rules that produced it (spec §3,
//! "State").
//!
//! Like `Upadesha`, `State` is immutable: every mutator returns a new
//! `State` sharing the unmodified terms. The driver keeps a stack of
//! these and pushes a new one per branch rather than mutating shared
//! state in place (spec §5).

use crate::term::Upadesha;
use std::sync::Arc;

/// One entry in a state's history: which rule fired, and at which term
/// index it was anchored (useful for tracing an optional rule's effect
/// back to its declaration).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub rule_name: Arc<str>,
    pub position: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    terms: Vec<Upadesha>,
    history: Vec<HistoryEntry>,
}

impl State {
    pub fn new(terms: Vec<Upadesha>) -> Self {
        State {
            terms,
            history: Vec::new(),
        }
    }

    pub fn terms(&self) -> &[Upadesha] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Upadesha> {
        self.terms.get(index)
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// True if `rule_name` has already fired anywhere in this state's
    /// history. Used by the driver to refuse re-applying a rule whose
    /// filter window hasn't moved past it (spec §5 termination discipline).
    pub fn has_applied(&self, rule_name: &str) -> bool {
        self.history.iter().any(|h| &*h.rule_name == rule_name)
    }

    /// True if `rule_name` has already fired at this exact term
    /// position. Narrower than `has_applied`: a rule is allowed to fire
    /// again at a different position in the same derivation.
    pub fn has_applied_at(&self, rule_name: &str, position: usize) -> bool {
        self.history
            .iter()
            .any(|h| &*h.rule_name == rule_name && h.position == position)
    }

    /// Replace the term at `index`.
    #[must_use]
    pub fn set(&self, index: usize, term: Upadesha) -> Self {
        let mut new = self.clone();
        new.terms[index] = term;
        new
    }

    /// Insert a term before `index`, shifting later terms right.
    #[must_use]
    pub fn insert(&self, index: usize, term: Upadesha) -> Self {
        let mut new = self.clone();
        new.terms.insert(index, term);
        new
    }

    /// Remove the term at `index`.
    #[must_use]
    pub fn remove(&self, index: usize) -> Self {
        let mut new = self.clone();
        new.terms.remove(index);
        new
    }

    /// Append a term to the end of the sequence.
    #[must_use]
    pub fn push(&self, term: Upadesha) -> Self {
        let mut new = self.clone();
        new.terms.push(term);
        new
    }

    /// Record that `rule_name` fired at `position`. Called by the
    /// driver immediately after an operator has been applied, so the
    /// history always reflects term positions *before* any further
    /// rule runs against them.
    #[must_use]
    pub fn mark_rule(&self, rule_name: &str, position: usize) -> Self {
        let mut new = self.clone();
        new.history.push(HistoryEntry {
            rule_name: Arc::from(rule_name),
            position,
        });
        new
    }

    /// Join every term's value at the given locus into a single
    /// surface string. Used to read off the final derived word once the
    /// asiddha layer has been closed by the phonological post-pass.
    pub fn joined(&self, locus: crate::term::Locus) -> String {
        self.terms.iter().map(|t| t.at(locus)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::ParseOptions;

    fn bu() -> Upadesha {
        Upadesha::parse("BU", ParseOptions::default())
    }

    #[test]
    fn set_does_not_affect_original() {
        let s1 = State::new(vec![bu()]);
        let s2 = s1.set(0, bu().write(crate::term::Locus::Value, "Bo"));
        assert_eq!(s1.get(0).unwrap().value(), "BU");
        assert_eq!(s2.get(0).unwrap().value(), "Bo");
    }

    #[test]
    fn history_accumulates_across_mutations() {
        let s = State::new(vec![bu()]).mark_rule("1.1.1", 0).mark_rule("3.4.78", 0);
        assert_eq!(s.history().len(), 2);
        assert!(s.has_applied("1.1.1"));
        assert!(!s.has_applied("9.9.9"));
    }

    #[test]
    fn insert_shifts_later_terms() {
        let s = State::new(vec![bu(), bu()]);
        let tip = Upadesha::parse("tip", ParseOptions::default());
        let s2 = s.insert(1, tip);
        assert_eq!(s2.len(), 3);
        assert_eq!(s2.get(1).unwrap().raw(), "tip");
        assert_eq!(s2.get(2).unwrap().raw(), "BU");
    }
}
