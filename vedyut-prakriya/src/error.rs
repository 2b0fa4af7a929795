//! Error taxonomy for the derivation engine (see spec §7).
//!
//! Construction-time errors (`ConfigError`, `RuleConstructionError`) are
//! fatal and meant to be propagated with `?` out of the engine
//! constructor. `DerivationError` is reported per-derivation: it carries
//! enough context to diagnose the failing state without invalidating any
//! forms already emitted on that same `derive` call.

use std::fmt;

/// Raised while loading the Dhātupāṭha or otherwise configuring the
/// engine, before any rule is registered.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("malformed dhatupatha row {line}: {reason}")]
    MalformedDhatupathaRow { line: usize, reason: String },

    #[error("unknown pratyahara name: {0}")]
    UnknownPratyahara(String),

    #[error("rule tuple has the wrong shape: expected {expected} fields, found {found}")]
    MalformedRuleTuple { expected: usize, found: usize },
}

/// Raised while building the rule registry and its index.
#[derive(Debug, thiserror::Error)]
pub enum RuleConstructionError {
    #[error("unknown operator category: {0}")]
    UnknownOperatorCategory(String),

    #[error("filter `auto` received a value it cannot classify: {0}")]
    UnclassifiableFilterSpec(String),

    #[error("rule {name} declares inconsistent locus: {left} at one position, {right} at another")]
    InconsistentLocus {
        name: String,
        left: String,
        right: String,
    },
}

/// Raised during `derive`. Stops only the current derivation; the host
/// may start a fresh one.
#[derive(Debug, thiserror::Error)]
pub struct DerivationError {
    pub kind: DerivationErrorKind,
    pub rule_name: Option<String>,
    pub position: Option<usize>,
}

impl fmt::Display for DerivationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(name) = &self.rule_name {
            write!(f, " (rule {name})")?;
        }
        if let Some(pos) = self.position {
            write!(f, " at position {pos}")?;
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DerivationErrorKind {
    #[error("tasya substitution could not classify its sthani argument")]
    UnclassifiableSthani,

    #[error("derivation exceeded the maximum of {0} rule applications")]
    BudgetExceeded(usize),
}
