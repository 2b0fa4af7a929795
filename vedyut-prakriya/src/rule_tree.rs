//! A feature-bucketed index over the rule registry (spec §4.5).
//!
//! Instead of scanning every rule's filter window against every term
//! position, rules are grouped by the atomic conditions their filters
//! are built from (a specific sound in the antya position, a specific
//! saṃjñā, a gaṇa number, ...). The feature with the most rules becomes
//! the root of a child node; the rules lacking it fall through to the
//! next-most-common feature among what's left; whatever remains after
//! every feature partitions down to a single rule (or none at all)
//! lands in that node's residual list and is tried by linear scan.
//! This cuts candidate lookup from O(rule_count) to roughly
//! O(log(rule_count)) for rule sets built from a handful of recurring
//! conditions — which is how the Aṣṭādhyāyī's own sūtras read, each
//! one differing from its neighbors by one or two conditions.

use crate::filter::Filter;
use crate::registry::RuleRegistry;
use crate::rule::RuleId;
use crate::sounds::SoundSet;
use crate::state::State;
use crate::tag::Tag;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowOffset {
    Previous,
    Current,
    Next,
}

impl WindowOffset {
    fn resolve(self, index: usize) -> Option<usize> {
        match self {
            WindowOffset::Previous => index.checked_sub(1),
            WindowOffset::Current => Some(index),
            WindowOffset::Next => Some(index + 1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AtomicFeature {
    /// The entire sound-set a rule's `antya`/`adi`/`upadha` filter names,
    /// indexed as one necessary condition rather than split per member —
    /// a disjunctive filter like `antya("i u")` only narrows candidates
    /// correctly if a term matching *any* member of the set stays
    /// reachable, which requires keeping the set whole (mirrors
    /// `filters.py: required()`, which indexes the whole `al(...)`
    /// filter rather than one feature per sound; see DESIGN.md).
    Antya(WindowOffset, SoundSet),
    Adi(WindowOffset, SoundSet),
    Upadha(WindowOffset, SoundSet),
    Samjna(WindowOffset, Tag),
    Gana(WindowOffset, u8),
}

impl AtomicFeature {
    /// Does the term at `index`'s window (per this feature's offset)
    /// in `state` actually satisfy this atomic condition?
    pub fn test(&self, state: &State, index: usize) -> bool {
        let (offset, check): (WindowOffset, Box<dyn Fn(&crate::term::Upadesha) -> bool>) =
            match self {
                AtomicFeature::Antya(o, set) => {
                    let set = set.clone();
                    (*o, Box::new(move |t| t.antya().is_some_and(|c| set.contains(c))))
                }
                AtomicFeature::Adi(o, set) => {
                    let set = set.clone();
                    (*o, Box::new(move |t| t.adi().is_some_and(|c| set.contains(c))))
                }
                AtomicFeature::Upadha(o, set) => {
                    let set = set.clone();
                    (*o, Box::new(move |t| t.upadha().is_some_and(|c| set.contains(c))))
                }
                AtomicFeature::Samjna(o, tag) => {
                    let tag = tag.clone();
                    (*o, Box::new(move |t| t.has_tag(&tag)))
                }
                AtomicFeature::Gana(o, n) => {
                    let n = *n;
                    (*o, Box::new(move |t| t.has_tag(&Tag::named(format!("gana{n}")))))
                }
            };
        match offset.resolve(index).and_then(|i| state.get(i)) {
            Some(term) => check(term),
            None => false,
        }
    }
}

fn collect_features(filter: &Filter, offset: WindowOffset, out: &mut Vec<AtomicFeature>) {
    match filter {
        Filter::Antya(set) => out.push(AtomicFeature::Antya(offset, set.clone())),
        Filter::Adi(set) => out.push(AtomicFeature::Adi(offset, set.clone())),
        Filter::Upadha(set) => out.push(AtomicFeature::Upadha(offset, set.clone())),
        Filter::Samjna(tag) => out.push(AtomicFeature::Samjna(offset, tag.clone())),
        Filter::Gana(n) => out.push(AtomicFeature::Gana(offset, *n)),
        Filter::And(a, b) => {
            collect_features(a, offset, out);
            collect_features(b, offset, out);
        }
        // Raw/Value/Lakshana/Or/Not/AllowAll/None carry no single atomic
        // condition worth indexing; rules built only from these fall
        // through to residual scanning at the root.
        _ => {}
    }
}

fn atomic_features(rule: &crate::rule::Rule) -> Vec<AtomicFeature> {
    let mut out = Vec::new();
    collect_features(&rule.previous, WindowOffset::Previous, &mut out);
    collect_features(&rule.current, WindowOffset::Current, &mut out);
    collect_features(&rule.next, WindowOffset::Next, &mut out);
    out
}

#[derive(Debug, Default)]
pub struct Node {
    residual: Vec<RuleId>,
    children: Vec<(AtomicFeature, Node)>,
}

impl Node {
    pub fn build(registry: &RuleRegistry) -> Self {
        let all: Vec<RuleId> = registry.iter().map(|r| r.id()).collect();
        build_node(all, registry, &HashSet::new())
    }

    /// Every rule id reachable either at this node or a descendant.
    pub fn len(&self) -> usize {
        self.residual.len() + self.children.iter().map(|(_, c)| c.len()).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Collect every rule id whose feature path matches the state at
    /// `index`. Linear scanning within a node's residual list is
    /// deliberate: by the time recursion reaches a small residual, the
    /// features that mattered have already narrowed the candidate set.
    pub fn candidates(&self, state: &State, index: usize, out: &mut Vec<RuleId>) {
        out.extend_from_slice(&self.residual);
        for (feature, child) in &self.children {
            if feature.test(state, index) {
                child.candidates(state, index, out);
            }
        }
    }

    /// A human-readable dump of the tree's shape, depth-first, mirroring
    /// the kind of introspection a rule author uses to sanity-check that
    /// a block actually indexed the way they expected.
    pub fn pprint(&self, depth: usize, out: &mut String) {
        use std::fmt::Write;
        let indent = "  ".repeat(depth);
        let _ = writeln!(out, "{indent}residual: {:?}", self.residual);
        for (feature, child) in &self.children {
            let _ = writeln!(out, "{indent}{feature:?}");
            child.pprint(depth + 1, out);
        }
    }
}

fn build_node(mut rule_ids: Vec<RuleId>, registry: &RuleRegistry, used: &HashSet<AtomicFeature>) -> Node {
    let mut children = Vec::new();
    loop {
        if rule_ids.is_empty() {
            break;
        }
        let mut buckets: Vec<(AtomicFeature, Vec<RuleId>)> = Vec::new();
        for &id in &rule_ids {
            let Some(rule) = registry.get(id) else { continue };
            for feature in atomic_features(rule) {
                if used.contains(&feature) {
                    continue;
                }
                match buckets.iter_mut().find(|(f, _)| *f == feature) {
                    Some((_, ids)) => ids.push(id),
                    None => buckets.push((feature, vec![id])),
                }
            }
        }

        let mut best_index = None;
        let mut best_len = 1; // a feature shared by only one rule isn't worth splitting on.
        for (i, (_, ids)) in buckets.iter().enumerate() {
            if ids.len() > best_len {
                best_len = ids.len();
                best_index = Some(i);
            }
        }

        let Some(best_index) = best_index else { break };
        let (feature, has_ids) = buckets.swap_remove(best_index);
        let has_set: HashSet<RuleId> = has_ids.iter().copied().collect();
        rule_ids.retain(|id| !has_set.contains(id));

        let mut used_here = used.clone();
        used_here.insert(feature.clone());
        children.push((feature, build_node(has_ids, registry, &used_here)));
    }
    Node {
        residual: rule_ids,
        children,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::Operator;
    use crate::rule::Rule;
    use crate::term::{ParseOptions, Upadesha};

    fn sample_registry() -> RuleRegistry {
        let mut reg = RuleRegistry::new();
        reg.register_all(vec![
            Rule::new("a1", Filter::antya("ac").unwrap(), Operator::replace("1")),
            Rule::new("a2", Filter::antya("ac").unwrap(), Operator::replace("2")),
            Rule::new("a3", Filter::antya("ik").unwrap(), Operator::replace("3")),
            Rule::new("a4", Filter::samjna(Tag::Dhatu), Operator::replace("4")),
        ]);
        reg
    }

    #[test]
    fn tree_indexes_every_rule() {
        let reg = sample_registry();
        let tree = Node::build(&reg);
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn candidates_narrow_by_actual_term_content() {
        let reg = sample_registry();
        let tree = Node::build(&reg);
        let state = State::new(vec![Upadesha::parse("kf", ParseOptions::default())]);
        let mut out = Vec::new();
        tree.candidates(&state, 0, &mut out);
        // "kf" ends in an ik vowel, which is also an ac vowel: a1, a2, a3
        // must all be reachable. `candidates` is a safe superset, not an
        // exact match — a4 (samjna(Dhatu)) has no sound feature to be
        // ruled out by, so it stays in some residual and is returned too;
        // it's `Rule::matches` in the driver that rejects it.
        assert!(out.contains(&reg.get(0).unwrap().id()));
        assert!(out.contains(&reg.get(2).unwrap().id()));
    }

    #[test]
    fn disjunctive_antya_filter_stays_whole_across_members() {
        // Two rules sharing one disjunctive filter, antya("i u"), and no
        // other indexable feature. Splitting the filter per character
        // and filing both rules under one char's child (then dropping
        // them from the parent) would lose both for a term ending in
        // the *other* member of the set. Indexing the whole set as one
        // feature keeps them reachable regardless of which member the
        // term actually ends in.
        let mut reg = RuleRegistry::new();
        reg.register_all(vec![
            Rule::new("r1", Filter::antya("i u").unwrap(), Operator::replace("1")),
            Rule::new("r2", Filter::antya("i u").unwrap(), Operator::replace("2")),
        ]);
        let tree = Node::build(&reg);

        let ends_in_i = State::new(vec![Upadesha::parse("ki", ParseOptions::default())]);
        let mut out_i = Vec::new();
        tree.candidates(&ends_in_i, 0, &mut out_i);
        assert!(out_i.contains(&reg.get(0).unwrap().id()));
        assert!(out_i.contains(&reg.get(1).unwrap().id()));

        let ends_in_u = State::new(vec![Upadesha::parse("ku", ParseOptions::default())]);
        let mut out_u = Vec::new();
        tree.candidates(&ends_in_u, 0, &mut out_u);
        assert!(out_u.contains(&reg.get(0).unwrap().id()));
        assert!(out_u.contains(&reg.get(1).unwrap().id()));
    }
}
