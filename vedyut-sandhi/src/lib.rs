//! Sandhi application: the phonological post-pass over a finished
//! derivation's term boundaries (spec §4.7). Generation-direction only —
//! splitting a surface form back into its constituent sounds is text
//! analysis, out of scope for a derivation engine (spec §1 Non-goals).

pub mod rules;

pub use rules::{ac_sandhi, hal_sandhi, sandhi_over_terms, sandhi_pair};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn karoti_needs_no_boundary_rewrite() {
        let terms = vec!["kar".to_string(), "o".to_string(), "ti".to_string()];
        assert_eq!(sandhi_over_terms(&terms).concat(), "karoti");
    }
}
