//! Gaṇa-conditioned rule content: vikaraṇa insertion and the guṇa that
//! follows it, scoped to the four gaṇas `dhatupatha` carries (spec §9
//! supplement: gaṇa-based vikaraṇa selection).
//!
//! Each gaṇa gets its own insertion row rather than one parametrized
//! rule, mirroring how the Dhātupāṭha tradition itself states vikaraṇa
//! assignment sūtra by sūtra (3.1.68, 3.1.73, 3.1.77, 3.1.79...) rather
//! than as a single lookup function.

use crate::dsl::{expand_block, Base, Row};
use crate::filter::Filter;
use crate::operator::Operator;
use crate::rule::{Rule, WindowSlot};
use crate::tag::Tag;
use crate::term::ParseOptions;

/// Insert the vikaraṇa for each of the four demo gaṇas, immediately
/// after the dhātu. A vikaraṇa's own indicatory letters are stripped
/// the way any pratyaya's are (`pratyaya: true`), so "Snu" becomes
/// "nu", "Sap" becomes "a", and so on (spec §4.2).
pub fn vikarana_insertion() -> Vec<Rule> {
    let base = Base {
        current: Filter::AllowAll,
        operator: Operator::insert_pratyaya_after("a", Tag::Vikarana, ParseOptions::default()),
        target: WindowSlot::Current,
        ..Base::default()
    };
    let rows = vec![
        Row::new(
            "3.1.68",
            Operator::insert_pratyaya_after("Sap", Tag::Vikarana, ParseOptions::default()),
        )
        .described("bhvādi gaṇa takes śap")
        .current(Filter::gana(1)),
        Row::new(
            "3.1.73",
            Operator::insert_pratyaya_after("Snu", Tag::Vikarana, ParseOptions::default()),
        )
        .described("svādi gaṇa takes śnu")
        .current(Filter::gana(5)),
        Row::new(
            "3.1.79",
            Operator::insert_pratyaya_after("u", Tag::Vikarana, ParseOptions::default()),
        )
        .described("tanādi gaṇa takes u")
        .current(Filter::gana(8)),
        Row::new(
            "3.1.81",
            Operator::insert_pratyaya_after("SnA", Tag::Vikarana, ParseOptions::default()),
        )
        .described("kryādi gaṇa takes śnā")
        .current(Filter::gana(9)),
    ];
    expand_block(base, rows)
}

/// Once inserted, a vikaraṇa is itself a pratyaya — the designation
/// aṅga (below) conditions on that, not on `Vikarana` specifically, so
/// any future kṛt/āgama insertion gets the same treatment for free.
pub fn vikarana_is_pratyaya() -> Rule {
    Rule::new(
        "1.4.14-vikarana",
        Filter::samjna(Tag::Vikarana),
        Operator::AddSamjna(Tag::Pratyaya),
    )
    .described("a vikaraṇa carries the general pratyaya designation")
}

/// अङ्ग (1.4.13, generalized): a term immediately followed by a
/// pratyaya is the aṅga for whatever substitution that pratyaya
/// conditions.
pub fn anga_samjna() -> Rule {
    Rule::new(
        "1.4.13",
        Filter::samjna(Tag::Dhatu),
        Operator::AddSamjna(Tag::Anga),
    )
    .when_next(Filter::samjna(Tag::Pratyaya))
    .described("a dhātu immediately followed by a pratyaya is termed aṅga")
}

/// The इक् vowels a guṇa-conditioning rule looks for, in both vowel
/// lengths. The formal pratyāhāra "ik" enumerates only the four short
/// symbols (i, u, ṛ, ḷ); Pāṇini extends every such symbol to its long
/// counterpart by 1.1.69 "अणुदित् सवर्णस्य चाप्रत्ययः", a meta-rule this
/// engine's filter algebra doesn't apply automatically to pratyāhāra
/// resolution. Rule content that actually needs the extended set spells
/// it out literally, the same way `vedyut-sandhi`'s own `IK` constant
/// does (see DESIGN.md).
fn ik_savarna() -> &'static str {
    "i I u U f F x X"
}

/// 7.3.84 सार्वधातुकार्धधातुकयोः, generalized to this demo's shape: a
/// dhātu ending in an इक् sound guṇa-grades before its own vikaraṇa.
/// kryādi (gaṇa 9) is carved out explicitly — its root vowel is left
/// alone before श्ना, unlike every other gaṇa here (see DESIGN.md).
pub fn dhatu_guna_before_vikarana() -> Rule {
    Rule::new(
        "7.3.84-dhatu",
        Filter::antya(ik_savarna())
            .unwrap()
            .and(Filter::samjna(Tag::Dhatu))
            .and(Filter::gana(9).not()),
        Operator::Guna,
    )
    .when_next(Filter::samjna(Tag::Vikarana))
    .described("an aṅga ending in ik guṇa-grades before a sārvadhātuka vikaraṇa")
}

/// The same rule applied to the vikaraṇa's own vowel, once it is
/// itself aṅga-final before the sārvadhātuka tiṅ ending.
pub fn vikarana_guna_before_tin() -> Rule {
    Rule::new(
        "7.3.84-vikarana",
        Filter::antya(ik_savarna())
            .unwrap()
            .and(Filter::samjna(Tag::Vikarana)),
        Operator::Guna,
    )
    .when_next(Filter::samjna(Tag::Tin))
    .described("a vikaraṇa ending in ik guṇa-grades before the sārvadhātuka tiṅ ending")
}

/// 6.4.24 अनिदितां हल उपधायाः क्ङिति, narrowed to this demo's single
/// nasal-upadha root (gaṇa 5's "stambh"): an aṅga whose penultimate
/// sound is a nasal loses it before a following vikaraṇa. The full
/// sūtra additionally requires the root to be *anidit* (no iṭ
/// indicatory vowel) and the pratyaya to be kit/ṅit specifically;
/// narrowing to gaṇa 5 stands in for that fuller condition here, the
/// same demo-scoping `dhatu_guna_before_vikarana` already uses for
/// gaṇa 9 (see DESIGN.md).
pub fn nasal_lopa_before_vikarana() -> Rule {
    Rule::new(
        "6.4.24",
        Filter::upadha("m n N Y R")
            .unwrap()
            .and(Filter::samjna(Tag::Dhatu))
            .and(Filter::gana(5)),
        Operator::upadha(""),
    )
    .when_next(Filter::samjna(Tag::Vikarana))
    .described("a nasal-upadha aṅga drops that nasal before its vikaraṇa")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::RuleRegistry;
    use crate::rule_tree::Node;
    use crate::state::State;
    use crate::term::Upadesha;

    fn registry() -> RuleRegistry {
        let mut reg = RuleRegistry::new();
        reg.register_all(vikarana_insertion());
        reg.register_all(vec![
            vikarana_is_pratyaya(),
            anga_samjna(),
            dhatu_guna_before_vikarana(),
            vikarana_guna_before_tin(),
            nasal_lopa_before_vikarana(),
        ]);
        reg.infer_apavadas();
        reg
    }

    #[test]
    fn registry_indexes_without_panicking() {
        let reg = registry();
        let tree = Node::build(&reg);
        assert!(!tree.is_empty());
    }

    #[test]
    fn nasal_upadha_root_drops_its_nasal_before_the_vikarana() {
        let stambh = Upadesha::parse("sta\\mBu~", ParseOptions::default())
            .add_tag(Tag::Dhatu)
            .add_tag(crate::dhatupatha::gana_tag(5));
        let snu = Upadesha::from_value("nu", Tag::Vikarana);
        let state = State::new(vec![stambh, snu]);
        let rule = nasal_lopa_before_vikarana();
        assert!(rule.matches(&state, 0));
        let (new_state, found) = rule.operator.apply(&state, 0, rule.locus);
        assert!(found);
        assert_eq!(new_state.terms()[0].value(), "staB");
    }

    #[test]
    fn gana9_dhatu_is_excluded_from_the_general_guna_rule() {
        let reg = registry();
        let rule = reg
            .iter()
            .find(|r| r.name == "7.3.84-dhatu")
            .expect("rule registered");
        let krI = Upadesha::parse("krI", ParseOptions::default())
            .add_tag(Tag::Dhatu)
            .add_tag(crate::dhatupatha::gana_tag(9));
        let tip = crate::rules::tin::build(
            crate::rules::tin::Purusha::Prathama,
            crate::rules::tin::Vacana::Eka,
        )
        .unwrap();
        let state = State::new(vec![krI, tip]);
        assert!(!rule.matches(&state, 0));
    }
}
