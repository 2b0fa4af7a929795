//! Pāṇinian word generator for Sanskrit.
//!
//! This crate derives Sanskrit word forms the way the Aṣṭādhyāyī
//! itself does: a lexical element (an *upadeśa* — a dhātu, pratyaya, or
//! āgama) accrues a sequence of rule-driven transformations until no
//! further rule applies, and a closing phonological pass resolves the
//! sound changes at the seams between them.
//!
//! The engine itself (`filter`, `operator`, `rule`, `registry`,
//! `rule_tree`, `driver`) is grammar-agnostic: it knows how to index,
//! rank, and fire a registered rule, and how to search the space an
//! optional rule forks open, but it carries no sūtra content of its
//! own. The `rules` module supplies a demonstration slice of real
//! sūtras, sized to drive the four gaṇas the bundled `dhatupatha`
//! covers through a complete tiṅanta derivation.

pub mod dhatupatha;
pub mod driver;
pub mod dsl;
pub mod error;
pub mod filter;
pub mod operator;
pub mod registry;
pub mod rule;
pub mod rule_tree;
pub mod rules;
pub mod sounds;
pub mod state;
pub mod tag;
pub mod term;

pub use driver::{DerivationConfig, Driver};
pub use error::{ConfigError, DerivationError, DerivationErrorKind, RuleConstructionError};
pub use registry::RuleRegistry;
pub use rule::Rule;
pub use state::State;
pub use term::{Locus, ParseOptions, Upadesha};

/// Derive every surface form of a tiṅanta built from a dhātu and a
/// finite verb ending, using the bundled demonstration rule set.
///
/// This is the convenience entry point for the four roots/gaṇas
/// `dhatupatha` ships with: build `dhatu` and `tin` via their own
/// constructors and pass them here rather than re-deriving a `Driver`
/// per call. A host deriving at scale should build one `Driver` and
/// call `Driver::derive_forms` directly instead, since constructing the
/// registry and rule tree isn't free.
pub fn derive(dhatu: Upadesha, vikarana: Upadesha, tin: Upadesha) -> Result<Vec<String>, DerivationError> {
    let driver = Driver::new(rules::build_registry(), DerivationConfig::default());
    let start = State::new(vec![dhatu, vikarana, tin]);
    driver.derive_forms(start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::tin::{build, Purusha, Vacana};
    use crate::tag::Tag;

    #[test]
    fn bhu_plus_tip_derives_bhavati() {
        let bhu = Upadesha::parse("BU", ParseOptions::default()).add_tag(Tag::Dhatu);
        let sap = Upadesha::parse(
            "Sap",
            ParseOptions {
                pratyaya: true,
                ..Default::default()
            },
        )
        .add_tag(Tag::Vikarana);
        let tip = build(Purusha::Prathama, Vacana::Eka).unwrap();
        let forms = derive(bhu, sap, tip).unwrap();
        assert!(forms.contains(&"Bavati".to_string()));
    }
}
