//! Accent-derived pada assignment (spec §9 supplement): which voice a
//! dhātu takes by default is read off its *own* accentuation, not
//! chosen freely by the host. 1.3.12 "अनुदात्तङित आत्मनेपदम्" makes a
//! svarita- or ṅit-marked root ātmanepada; 1.3.78 "शेषात् कर्तरि
//! परस्मैपदम्" is the ātmanepada rule's utsarga, covering every dhātu
//! 1.3.12 doesn't reach.
//!
//! None of the four demo roots in `dhatupatha` carry a svarita or ṅit
//! mark, so in practice every one of them falls through to the
//! parasmaipada default here — the mechanism is real, even though this
//! particular root set never exercises its apavāda branch.

use crate::filter::Filter;
use crate::operator::Operator;
use crate::rule::Rule;
use crate::tag::Tag;

/// 1.3.12: a dhātu marked svarita, or carrying an indicatory guttural
/// nasal (ṅit), defaults to ātmanepada.
pub fn atmanepada_from_accent() -> Rule {
    Rule::new(
        "1.3.12",
        Filter::samjna(Tag::Dhatu)
            .and(Filter::samjna(Tag::Svarita).or(Filter::samjna(Tag::It('N')))),
        Operator::AddSamjna(Tag::Atmanepada),
    )
    .described("a svarita or ṅit dhātu is ātmanepada by default")
}

/// 1.3.78: every other dhātu is parasmaipada by default. Ranked below
/// 1.3.12 by the extra disjunctive term in that rule's filter, so the
/// driver tries the more specific rule first at a term both could
/// match.
pub fn parasmaipada_default() -> Rule {
    Rule::new(
        "1.3.78",
        Filter::samjna(Tag::Dhatu),
        Operator::AddSamjna(Tag::Parasmaipada),
    )
    .described("a dhātu not reached by 1.3.12 is parasmaipada by default")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::State;
    use crate::term::{ParseOptions, Upadesha};

    #[test]
    fn plain_dhatu_gets_parasmaipada_by_default() {
        let bu = Upadesha::parse("BU", ParseOptions::default()).add_tag(Tag::Dhatu);
        let state = State::new(vec![bu]);
        assert!(!atmanepada_from_accent().matches(&state, 0));
        assert!(parasmaipada_default().matches(&state, 0));
    }

    #[test]
    fn svarita_dhatu_is_reached_by_the_accent_rule() {
        let edh = Upadesha::parse("eDa^", ParseOptions::default()).add_tag(Tag::Dhatu);
        let state = State::new(vec![edh]);
        assert!(atmanepada_from_accent().matches(&state, 0));
    }
}
