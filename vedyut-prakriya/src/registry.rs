//! The rule registry: owns every registered `Rule` by stable integer
//! id and runs the inference pass that discovers apavāda/utsarga pairs
//! automatically from filter specificity (spec §4.6).

use crate::filter::Filter;
use crate::rule::{Rule, RuleId};

#[derive(Debug, Default)]
pub struct RuleRegistry {
    rules: Vec<Rule>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        RuleRegistry { rules: Vec::new() }
    }

    /// Register a block of rules, assigning each a stable id in
    /// registration order.
    pub fn register_all(&mut self, mut rules: Vec<Rule>) {
        for mut rule in rules.drain(..) {
            rule.id = self.rules.len() as RuleId;
            self.rules.push(rule);
        }
    }

    pub fn get(&self, id: RuleId) -> Option<&Rule> {
        self.rules.get(id as usize)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    /// Run once, after every block has been registered: for every pair
    /// of rules (A, B) with matching window-size (here: target slot and
    /// locus) where A's combined window filter is a strict subset of
    /// B's, and A's operator conflicts with B's at that locus, record A
    /// as an apavāda of B (spec §4.6). Quadratic in rule count, but this
    /// runs once at startup, not per derivation.
    pub fn infer_apavadas(&mut self) {
        let n = self.rules.len();
        let combined: Vec<Filter> = self.rules.iter().map(combined_filter).collect();
        let mut pairs = Vec::new();
        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                if self.rules[i].target != self.rules[j].target {
                    continue;
                }
                if self.rules[i].locus != self.rules[j].locus {
                    continue;
                }
                if !crate::operator::categories_conflict(
                    self.rules[i].operator.category(),
                    self.rules[j].operator.category(),
                ) {
                    continue;
                }
                if combined[i].is_subset_of(&combined[j]) {
                    pairs.push((i, j));
                }
            }
        }
        for (i, j) in pairs {
            let j_id = self.rules[j].id;
            self.rules[i].utsargas.push(j_id);
            let i_id = self.rules[i].id;
            self.rules[j].apavadas.push(i_id);
        }
    }

    /// Rules in descending specificity order, the order the rule tree
    /// (spec §4.5) and a linear fallback scan try them in.
    pub fn sorted_by_specificity(&self) -> Vec<&Rule> {
        let mut v: Vec<&Rule> = self.rules.iter().collect();
        v.sort_by(|a, b| b.rank().cmp(&a.rank()));
        v
    }
}

fn combined_filter(rule: &Rule) -> Filter {
    rule.previous
        .clone()
        .and(rule.current.clone())
        .and(rule.next.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::Operator;
    use crate::tag::Tag;

    #[test]
    fn narrower_rule_becomes_apavada_of_wider() {
        let mut reg = RuleRegistry::new();
        let wide = Rule::new(
            "utsarga",
            Filter::antya("ac").unwrap(),
            Operator::replace("X"),
        );
        let narrow = Rule::new(
            "apavada",
            Filter::antya("ik").unwrap(),
            Operator::replace("Y"),
        );
        reg.register_all(vec![wide, narrow]);
        reg.infer_apavadas();

        let wide = reg.get(0).unwrap();
        let narrow = reg.get(1).unwrap();
        assert_eq!(narrow.utsargas(), &[wide.id()]);
        assert_eq!(wide.apavadas(), &[narrow.id()]);
    }

    #[test]
    fn unrelated_filters_do_not_pair() {
        let mut reg = RuleRegistry::new();
        let a = Rule::new("a", Filter::samjna(Tag::Dhatu), Operator::replace("X"));
        let b = Rule::new("b", Filter::samjna(Tag::Pratyaya), Operator::replace("Y"));
        reg.register_all(vec![a, b]);
        reg.infer_apavadas();
        assert!(reg.get(0).unwrap().utsargas().is_empty());
        assert!(reg.get(1).unwrap().utsargas().is_empty());
    }
}
