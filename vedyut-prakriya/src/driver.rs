//! The derivation loop: repeatedly finds the highest-ranked applicable
//! rule and fires it, forking the search when an optional rule is met,
//! until no rule matches any term (spec §4.7, §5).

use crate::error::{DerivationError, DerivationErrorKind};
use crate::registry::RuleRegistry;
use crate::rule::{Rule, WindowSlot};
use crate::rule_tree::Node;
use crate::state::State;
use crate::term::Locus;
use compact_str::CompactString;

/// Bounds on a single `derive` call. The only knob the spec gives the
/// host control over (spec §6, §7): everything else about a derivation
/// is determined by the registered rule content.
#[derive(Debug, Clone, Copy)]
pub struct DerivationConfig {
    pub max_applications: usize,
}

impl Default for DerivationConfig {
    fn default() -> Self {
        DerivationConfig {
            max_applications: 10_000,
        }
    }
}

pub struct Driver {
    registry: RuleRegistry,
    tree: Node,
    config: DerivationConfig,
}

impl Driver {
    pub fn new(registry: RuleRegistry, config: DerivationConfig) -> Self {
        let tree = Node::build(&registry);
        Driver {
            registry,
            tree,
            config,
        }
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    pub fn rule_tree(&self) -> &Node {
        &self.tree
    }

    /// Run the derivation to exhaustion, returning every distinct final
    /// state the search reached. Each optional rule the search meets
    /// forks into an applied and a declined branch (spec §4.6); both
    /// branches keep running independently. Rules written at
    /// `Locus::Asiddha` sit out of this loop entirely (see
    /// `derive_forms`, which runs them afterward as a closed pass).
    pub fn derive(&self, start: State) -> Result<Vec<State>, DerivationError> {
        let mut finished = Vec::new();
        let mut stack = vec![(start, 0usize)];

        while let Some((state, applications)) = stack.pop() {
            log::trace!("popped state with {} term(s), {applications} application(s) so far", state.len());
            if applications > self.config.max_applications {
                return Err(DerivationError {
                    kind: DerivationErrorKind::BudgetExceeded(self.config.max_applications),
                    rule_name: None,
                    position: None,
                });
            }
            match self.apply_next_rule(&state, LocusScope::MainLoop) {
                Some(branches) => {
                    log::debug!("branching into {} state(s)", branches.len());
                    for branch in branches {
                        stack.push((branch, applications + 1));
                    }
                }
                None => {
                    log::debug!("state has no further applicable rule, finishing");
                    finished.push(state);
                }
            }
        }
        Ok(finished)
    }

    /// Run a full derivation, then close the asiddha sub-domain and the
    /// phonological post-pass over each finished state, returning the
    /// deduplicated set of surface forms (spec §4.7). This is the
    /// top-level entry point a host actually wants: `derive` alone
    /// leaves asiddha-locus rules unfired and sandhi unapplied.
    pub fn derive_forms(&self, start: State) -> Result<Vec<String>, DerivationError> {
        let finished = self.derive(start)?;
        let mut forms: Vec<String> = Vec::with_capacity(finished.len());
        for mut state in finished {
            log::debug!("closing the asiddha sub-domain for a finished state");
            loop {
                match self.apply_next_rule(&state, LocusScope::AsiddhaOnly) {
                    Some(mut branches) => state = branches.remove(0),
                    None => break,
                }
            }
            let values: Vec<String> = state
                .terms()
                .iter()
                .map(|t| t.at(Locus::Asiddha).to_string())
                .collect();
            log::debug!("applying the phonological post-pass over {} term boundary(ies)", values.len().saturating_sub(1));
            let rewritten = vedyut_sandhi::sandhi_over_terms(&values);
            forms.push(rewritten.concat());
        }
        forms.sort();
        forms.dedup();
        Ok(forms)
    }

    /// Find the first term position (left to right) with an applicable
    /// rule in `scope`, and fire the highest-ranked one. Returns `None`
    /// once no term position has any rule left to apply in this scope.
    fn apply_next_rule(&self, state: &State, scope: LocusScope) -> Option<Vec<State>> {
        for index in 0..state.len() {
            let mut candidate_ids = Vec::new();
            self.tree.candidates(state, index, &mut candidate_ids);
            candidate_ids.sort_unstable();
            candidate_ids.dedup();

            let mut matching: Vec<&Rule> = candidate_ids
                .iter()
                .filter_map(|id| self.registry.get(*id))
                .filter(|r| scope.accepts(r.locus))
                .filter(|r| r.matches(state, index))
                .collect();
            matching.sort_by(|a, b| b.rank().cmp(&a.rank()));

            for rule in matching {
                if state.has_applied_at(&rule.name, index) {
                    continue;
                }
                if !window_slot_in_bounds(rule.target, index, state.len()) {
                    continue;
                }
                let target_index = rule.target_index(index);
                // An apavāda that already fired at this term stamps its
                // name into `term.ops` alongside every utsarga it
                // overrides (spec §4.6), so a more general competing
                // rule never gets a second chance at the same term.
                if state
                    .get(target_index)
                    .is_some_and(|t| t.has_op(&rule.name))
                {
                    continue;
                }

                if rule.modifier.is_prohibition() {
                    let stamped =
                        self.stamp_utsargas(state.mark_rule(&rule.name, index), target_index, rule);
                    return Some(vec![stamped]);
                }

                let (new_state, found) = rule.operator.apply(state, target_index, rule.locus);
                if !found {
                    // The filter matched but the operator had nothing to
                    // act on (e.g. samprasarana on a term without the
                    // expected semivowel); try the next candidate rather
                    // than treating this as the step's outcome.
                    continue;
                }
                log::trace!("applying {} at term {target_index}", rule.name);

                let stamped = self.stamp_utsargas(new_state, target_index, rule);
                let applied = stamped.mark_rule(&rule.name, index);
                if rule.modifier.is_optional() {
                    let declined = state.mark_rule(&rule.name, index);
                    return Some(vec![applied, declined]);
                }
                return Some(vec![applied]);
            }
        }
        None
    }

    /// Record that `rule` fired against the term at `target_index`, by
    /// adding its own name and every utsarga it overrides to that
    /// term's `ops` set (spec §4.6): the mechanism that keeps a
    /// more-general rule from firing again once its apavāda has.
    fn stamp_utsargas(&self, state: State, target_index: usize, rule: &Rule) -> State {
        let Some(term) = state.get(target_index) else {
            return state;
        };
        let mut names: Vec<CompactString> = vec![rule.name.clone()];
        for utsarga_id in rule.utsargas() {
            if let Some(u) = self.registry.get(*utsarga_id) {
                names.push(u.name.clone());
            }
        }
        let new_term = term.add_ops(names.iter().map(|n| n.as_str()));
        state.set(target_index, new_term)
    }
}

/// Which rules `apply_next_rule` is allowed to consider. The main
/// search runs every rule except those writing the asiddha layer;
/// `derive_forms` then runs a second, asiddha-only pass per finished
/// state before handing off to the phonological post-pass (spec §4.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LocusScope {
    MainLoop,
    AsiddhaOnly,
}

impl LocusScope {
    fn accepts(self, locus: Locus) -> bool {
        match self {
            LocusScope::MainLoop => locus != Locus::Asiddha,
            LocusScope::AsiddhaOnly => locus == Locus::Asiddha,
        }
    }
}

fn window_slot_in_bounds(slot: WindowSlot, index: usize, len: usize) -> bool {
    match slot {
        WindowSlot::Previous => index > 0,
        WindowSlot::Current => true,
        WindowSlot::Next => index + 1 < len,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Filter;
    use crate::operator::Operator;
    use crate::rule::Modifier;
    use crate::tag::Tag;
    use crate::term::{ParseOptions, Upadesha};

    #[test]
    fn derive_halts_once_no_rule_applies() {
        let mut reg = RuleRegistry::new();
        reg.register_all(vec![Rule::new(
            "1.1.1",
            Filter::antya("u U").unwrap(),
            Operator::Guna,
        )]);
        reg.infer_apavadas();
        let driver = Driver::new(reg, DerivationConfig::default());
        let start = State::new(vec![Upadesha::parse("BU", ParseOptions::default())]);
        let results = driver.derive(start).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].terms()[0].value(), "Bo");
    }

    #[test]
    fn optional_rule_forks_into_two_finished_states() {
        let mut reg = RuleRegistry::new();
        reg.register_all(vec![Rule::new(
            "6.4.1",
            Filter::samjna(Tag::Dhatu),
            Operator::Guna,
        )
        .modified(Modifier::Vibhasha)]);
        reg.infer_apavadas();
        let driver = Driver::new(reg, DerivationConfig::default());
        let start = State::new(vec![
            Upadesha::parse("BU", ParseOptions::default()).add_tag(Tag::Dhatu)
        ]);
        let results = driver.derive(start).unwrap();
        assert_eq!(results.len(), 2);
        let values: Vec<&str> = results.iter().map(|s| s.terms()[0].value()).collect();
        assert!(values.contains(&"Bo"));
        assert!(values.contains(&"BU"));
    }

    #[test]
    fn budget_exceeded_is_reported() {
        let mut reg = RuleRegistry::new();
        // A rule whose own firing keeps its filter satisfied: antya "a"
        // under dirgha/hrasva oscillation would loop forever without a
        // budget cap. Simulate directly by setting a tiny budget with a
        // rule that can always re-fire because the marker guard only
        // blocks the same (name, index) pair once it succeeds, and this
        // rule inserts a new term each time, so the index keeps moving
        // and it keeps matching a fresh insertion point.
        reg.register_all(vec![Rule::new(
            "9.9.9",
            Filter::AllowAll,
            Operator::insert_after("a", Tag::Agama),
        )]);
        reg.infer_apavadas();
        let driver = Driver::new(
            reg,
            DerivationConfig {
                max_applications: 3,
            },
        );
        let start = State::new(vec![Upadesha::parse("a", ParseOptions::default())]);
        let err = driver.derive(start).unwrap_err();
        assert!(matches!(err.kind, DerivationErrorKind::BudgetExceeded(3)));
    }

    #[test]
    fn derive_forms_runs_sandhi_over_the_finished_state() {
        let mut reg = RuleRegistry::new();
        reg.register_all(vec![Rule::new(
            "1.1.1",
            Filter::antya("u U").unwrap(),
            Operator::Guna,
        )]);
        reg.infer_apavadas();
        let driver = Driver::new(reg, DerivationConfig::default());
        let start = State::new(vec![
            Upadesha::parse("BU", ParseOptions::default()),
            Upadesha::from_value("a", Tag::Vikarana),
            Upadesha::from_value("ti", Tag::Tin),
        ]);
        let forms = driver.derive_forms(start).unwrap();
        assert_eq!(forms, vec!["Bavati".to_string()]);
    }
}
