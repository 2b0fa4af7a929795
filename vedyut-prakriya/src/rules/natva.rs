//! 8.4.2 अट्कुप्वाङ्नुम्व्यवाये ऽपि (ṇatva, simplified): a dental nasal
//! retroflexes to ण् when a retroflexion-inducing sound — र्, ऋ/ॠ, or
//! ष् — occurs earlier in the word. The real sūtra tracks this across
//! an arbitrary stretch of permitted intervening sounds and any number
//! of terms; this demo narrows the condition to "the immediately
//! preceding term's penultimate sound is one of the triggers", which
//! is exactly the shape krī's क्री + ना needs (see DESIGN.md) and is
//! expressible with the existing `upadha`/`adi` filter vocabulary
//! without introducing a new filter kind.

use crate::filter::Filter;
use crate::operator::Operator;
use crate::rule::Rule;

/// 8.4.2: a term whose own initial sound is dental "n" retroflexes it
/// to "R" when the previous term's penultimate sound is a retroflexion
/// trigger (r, f/F the vocalic ṛ/ṝ, or z).
pub fn natva_after_trigger() -> Rule {
    Rule::new("8.4.2", Filter::adi("n").unwrap(), Operator::adi("R"))
        .when_previous(Filter::upadha("r f F z").unwrap())
        .described("n retroflexes to N after a preceding r, f, F, or z")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::State;
    use crate::tag::Tag;
    use crate::term::{ParseOptions, Upadesha};

    #[test]
    fn retroflexes_after_preceding_r() {
        let kri = Upadesha::parse("krI", ParseOptions::default()).add_tag(Tag::Dhatu);
        let na = Upadesha::from_value("nA", Tag::Vikarana);
        let state = State::new(vec![kri, na]);
        let rule = natva_after_trigger();
        assert!(rule.matches(&state, 1));
        let (new_state, found) = rule.operator.apply(&state, 1, rule.locus);
        assert!(found);
        assert_eq!(new_state.terms()[1].value(), "RA");
    }

    #[test]
    fn does_not_fire_without_a_preceding_trigger() {
        let stem = Upadesha::parse("staB", ParseOptions::default()).add_tag(Tag::Dhatu);
        let nu = Upadesha::from_value("nu", Tag::Vikarana);
        let state = State::new(vec![stem, nu]);
        assert!(!natva_after_trigger().matches(&state, 1));
    }
}
