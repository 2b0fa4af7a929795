//! A terse block-declaration helper for rule content, modeled on the
//! row-wise inheritance the original templating layer used: a block of
//! sūtras sharing most of their filter window declares a base row once,
//! and each subsequent row only states what's different, leaving every
//! other column to inherit (spec §9 design note).

use crate::filter::Filter;
use crate::operator::Operator;
use crate::rule::{Modifier, Rule, WindowSlot};
use crate::term::Locus;

/// One column's value in a template row: inherit the block's base,
/// inherit whatever the immediately preceding row resolved to, or set
/// an explicit value that becomes the new "previous" for rows after it.
#[derive(Debug, Clone)]
pub enum Field<T> {
    Inherit,
    InheritPrev,
    Override(T),
}

impl<T: Clone> Field<T> {
    fn resolve(&self, base: &T, prev: &T) -> T {
        match self {
            Field::Inherit => base.clone(),
            Field::InheritPrev => prev.clone(),
            Field::Override(v) => v.clone(),
        }
    }
}

/// A single row in a block: one sūtra's deviation from the base row.
pub struct Row {
    pub name: &'static str,
    pub description: &'static str,
    pub previous: Field<Filter>,
    pub current: Field<Filter>,
    pub next: Field<Filter>,
    pub operator: Field<Operator>,
    pub target: Field<WindowSlot>,
    pub locus: Field<Locus>,
    pub modifier: Modifier,
}

impl Row {
    pub fn new(name: &'static str, operator: Operator) -> Self {
        Row {
            name,
            description: "",
            previous: Field::InheritPrev,
            current: Field::InheritPrev,
            next: Field::InheritPrev,
            operator: Field::Override(operator),
            target: Field::InheritPrev,
            locus: Field::InheritPrev,
            modifier: Modifier::Plain,
        }
    }

    #[must_use]
    pub fn described(mut self, d: &'static str) -> Self {
        self.description = d;
        self
    }

    #[must_use]
    pub fn current(mut self, f: Filter) -> Self {
        self.current = Field::Override(f);
        self
    }

    #[must_use]
    pub fn previous(mut self, f: Filter) -> Self {
        self.previous = Field::Override(f);
        self
    }

    #[must_use]
    pub fn next(mut self, f: Filter) -> Self {
        self.next = Field::Override(f);
        self
    }

    #[must_use]
    pub fn targeting(mut self, t: WindowSlot) -> Self {
        self.target = Field::Override(t);
        self
    }

    #[must_use]
    pub fn writing(mut self, locus: Locus) -> Self {
        self.locus = Field::Override(locus);
        self
    }

    #[must_use]
    pub fn modified(mut self, m: Modifier) -> Self {
        self.modifier = m;
        self
    }
}

/// The base row a block starts from: every column fully specified, no
/// inheritance markers.
pub struct Base {
    pub previous: Filter,
    pub current: Filter,
    pub next: Filter,
    pub operator: Operator,
    pub target: WindowSlot,
    pub locus: Locus,
}

impl Default for Base {
    fn default() -> Self {
        Base {
            previous: Filter::AllowAll,
            current: Filter::AllowAll,
            next: Filter::AllowAll,
            operator: Operator::replace(""),
            target: WindowSlot::Current,
            locus: Locus::Value,
        }
    }
}

/// Expand a block of rows against a base, resolving `Field::Inherit`
/// against `base` and `Field::InheritPrev` against whatever the
/// immediately preceding row resolved to in this same block.
pub fn expand_block(base: Base, rows: Vec<Row>) -> Vec<Rule> {
    let mut prev_previous = base.previous.clone();
    let mut prev_current = base.current.clone();
    let mut prev_next = base.next.clone();
    let mut prev_operator = base.operator.clone();
    let mut prev_target = base.target;
    let mut prev_locus = base.locus;

    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        let previous = row.previous.resolve(&base.previous, &prev_previous);
        let current = row.current.resolve(&base.current, &prev_current);
        let next = row.next.resolve(&base.next, &prev_next);
        let operator = row.operator.resolve(&base.operator, &prev_operator);
        let target = row.target.resolve(&base.target, &prev_target);
        let locus = row.locus.resolve(&base.locus, &prev_locus);

        let rule = Rule::new(row.name, current.clone(), operator.clone())
            .described(row.description)
            .when_previous(previous.clone())
            .when_next(next.clone())
            .targeting(target)
            .writing(locus)
            .modified(row.modifier);
        out.push(rule);

        prev_previous = previous;
        prev_current = current;
        prev_next = next;
        prev_operator = operator;
        prev_target = target;
        prev_locus = locus;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag::Tag;

    #[test]
    fn rows_inherit_current_filter_until_overridden() {
        let base = Base {
            current: Filter::samjna(Tag::Dhatu),
            ..Default::default()
        };
        let rows = vec![
            Row::new("1.1.1", Operator::replace("x")),
            Row::new("1.1.2", Operator::replace("y")).current(Filter::samjna(Tag::Pratyaya)),
            Row::new("1.1.3", Operator::replace("z")),
        ];
        let rules = expand_block(base, rows);
        assert_eq!(rules[0].current, Filter::samjna(Tag::Dhatu));
        assert_eq!(rules[1].current, Filter::samjna(Tag::Pratyaya));
        // row 3 inherits from row 2 (InheritPrev), not the block base.
        assert_eq!(rules[2].current, Filter::samjna(Tag::Pratyaya));
    }

    #[test]
    fn modifier_defaults_to_plain() {
        let base = Base::default();
        let rows = vec![Row::new("1.1.1", Operator::replace("x"))];
        let rules = expand_block(base, rows);
        assert_eq!(rules[0].modifier, Modifier::Plain);
    }
}
