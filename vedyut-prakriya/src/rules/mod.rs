//! Demonstration rule content (spec §9 supplements 1–2): enough
//! registered sūtras to drive the four gaṇas the bundled Dhātupāṭha
//! slice covers through a full tiṅanta derivation. The ~4,000-rule
//! corpus itself is input data the engine consumes, not something this
//! crate ships (spec §1); these modules exist to exercise the engine
//! mechanics (blocking rules, apavāda inference, optional rules) against
//! real sūtras rather than synthetic ones.

pub mod gana;
pub mod natva;
pub mod samjna;
pub mod tin;

use crate::registry::RuleRegistry;

/// Register every demonstration sūtra and run apavāda inference once,
/// giving the driver a ready-to-use registry without callers having to
/// know which modules contribute what.
pub fn build_registry() -> RuleRegistry {
    let mut reg = RuleRegistry::new();
    reg.register_all(gana::vikarana_insertion());
    reg.register_all(vec![
        gana::vikarana_is_pratyaya(),
        gana::anga_samjna(),
        gana::dhatu_guna_before_vikarana(),
        gana::vikarana_guna_before_tin(),
        gana::nasal_lopa_before_vikarana(),
        natva::natva_after_trigger(),
        samjna::atmanepada_from_accent(),
        samjna::parasmaipada_default(),
    ]);
    reg.infer_apavadas();
    reg
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_registry_builds_without_panicking() {
        let reg = build_registry();
        assert!(reg.len() > 0);
    }
}
