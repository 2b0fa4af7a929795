//! The filter algebra: composable predicates over a term, used to gate
//! rule application (spec §4.3).
//!
//! A `Filter` matches a single `Upadesha` in a particular window
//! position (previous/current/next, chosen by the rule that owns it).
//! Filters compose with `and`, `or`, and `not`; the rule-tree indexer
//! (spec §4.5) also needs a conservative `is_subset_of` relation and a
//! `Rank` it can sort rules by, so that a more specific filter's rule
//! is tried as an apavāda ("exception") before the more general rule it
//! overrides (spec §4.6).

use crate::error::{ConfigError, RuleConstructionError};
use crate::sounds::{sound_group, SoundSet};
use crate::tag::Tag;
use crate::term::Upadesha;
use compact_str::CompactString;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// Matches every term; the default when a rule only constrains one
    /// side of a window.
    AllowAll,
    /// Matches no term; used as a safe default for a window slot a rule
    /// doesn't otherwise reach (e.g. there is no term after the last).
    None,
    Adi(SoundSet),
    Antya(SoundSet),
    Upadha(SoundSet),
    Raw(CompactString),
    RawIn(Vec<CompactString>),
    Value(CompactString),
    Lakshana(CompactString),
    Samjna(Tag),
    /// Dhātu gaṇa membership, 1-indexed as in the Dhātupāṭha.
    Gana(u8),
    And(Box<Filter>, Box<Filter>),
    Or(Box<Filter>, Box<Filter>),
    Not(Box<Filter>),
}

impl Filter {
    pub fn adi(spec: &str) -> Result<Filter, ConfigError> {
        Ok(Filter::Adi(sound_group(spec)?))
    }
    pub fn antya(spec: &str) -> Result<Filter, ConfigError> {
        Ok(Filter::Antya(sound_group(spec)?))
    }
    pub fn upadha(spec: &str) -> Result<Filter, ConfigError> {
        Ok(Filter::Upadha(sound_group(spec)?))
    }
    pub fn raw(value: &str) -> Filter {
        Filter::Raw(CompactString::from(value))
    }
    pub fn raw_in(values: &[&str]) -> Filter {
        Filter::RawIn(values.iter().map(|v| CompactString::from(*v)).collect())
    }
    pub fn value(value: &str) -> Filter {
        Filter::Value(CompactString::from(value))
    }
    pub fn lakshana(value: &str) -> Filter {
        Filter::Lakshana(CompactString::from(value))
    }
    pub fn samjna(tag: Tag) -> Filter {
        Filter::Samjna(tag)
    }
    pub fn gana(n: u8) -> Filter {
        Filter::Gana(n)
    }

    pub fn and(self, other: Filter) -> Filter {
        Filter::And(Box::new(self), Box::new(other))
    }
    pub fn or(self, other: Filter) -> Filter {
        Filter::Or(Box::new(self), Box::new(other))
    }
    pub fn not(self) -> Filter {
        Filter::Not(Box::new(self))
    }

    /// Build a filter from a bare token the way rule content declares
    /// them tersely: a known saṃjñā name becomes `samjna`, a recognized
    /// sound group or single sound becomes `antya` (term-final position
    /// is by far the commonest condition in sūtra text), and anything
    /// else is taken as an exact `value` literal.
    pub fn auto(spec: &str) -> Result<Filter, RuleConstructionError> {
        if let Some(tag) = known_tag(spec) {
            return Ok(Filter::samjna(tag));
        }
        if let Ok(set) = sound_group(spec) {
            if !set.is_empty() {
                return Ok(Filter::Antya(set));
            }
        }
        if spec.is_empty() {
            return Err(RuleConstructionError::UnclassifiableFilterSpec(
                spec.to_string(),
            ));
        }
        Ok(Filter::value(spec))
    }

    pub fn matches(&self, term: &Upadesha) -> bool {
        match self {
            Filter::AllowAll => true,
            Filter::None => false,
            Filter::Adi(set) => term.adi().is_some_and(|c| set.contains(c)),
            Filter::Antya(set) => term.antya().is_some_and(|c| set.contains(c)),
            Filter::Upadha(set) => term.upadha().is_some_and(|c| set.contains(c)),
            Filter::Raw(v) => term.raw() == v.as_str(),
            Filter::RawIn(vs) => vs.iter().any(|v| term.raw() == v.as_str()),
            Filter::Value(v) => term.value() == v.as_str(),
            Filter::Lakshana(v) => term.has_lakshana(v),
            Filter::Samjna(tag) => term.has_tag(tag),
            Filter::Gana(n) => term.has_tag(&Tag::named(format!("gana{n}"))),
            Filter::And(a, b) => a.matches(term) && b.matches(term),
            Filter::Or(a, b) => a.matches(term) || b.matches(term),
            Filter::Not(a) => !a.matches(term),
        }
    }

    /// A conservative "is every term matched by `self` also matched by
    /// `other`" relation. Used by the registry to find an apavāda's
    /// general utsarga automatically (spec §4.6) and by the rule-tree
    /// builder to decide whether a feature split is useful (spec §4.5).
    /// Where the two filters aren't structurally comparable this
    /// returns `false` rather than guessing — a missed apavāda pairing
    /// is safer than a wrong one, since rule content can still state the
    /// relationship explicitly (see DESIGN.md).
    pub fn is_subset_of(&self, other: &Filter) -> bool {
        if self == other {
            return true;
        }
        match other {
            Filter::AllowAll => return true,
            Filter::Or(a, b) => {
                if self.is_subset_of(a) || self.is_subset_of(b) {
                    return true;
                }
            }
            _ => {}
        }
        match self {
            Filter::None => return true,
            Filter::And(a, b) => {
                if a.is_subset_of(other) || b.is_subset_of(other) {
                    return true;
                }
            }
            _ => {}
        }
        match (self, other) {
            (Filter::Adi(a), Filter::Adi(b))
            | (Filter::Antya(a), Filter::Antya(b))
            | (Filter::Upadha(a), Filter::Upadha(b)) => {
                a.iter().all(|c| b.contains(*c)) && a.len() < b.len()
            }
            (Filter::Raw(a), Filter::RawIn(bs)) => bs.iter().any(|b| b == a),
            (Filter::RawIn(a_s), Filter::RawIn(bs)) => {
                a_s.iter().all(|a| bs.contains(a)) && a_s.len() < bs.len()
            }
            _ => false,
        }
    }

    /// A five-component specificity vector: rules are tried most
    /// specific first within a feature bucket, so that an apavāda's
    /// operator fires before its utsarga's would (spec §4.6). Ordered
    /// lexicographically by derived `Ord`.
    pub fn rank(&self) -> Rank {
        let mut r = Rank::default();
        self.accumulate_rank(&mut r);
        r
    }

    fn accumulate_rank(&self, r: &mut Rank) {
        match self {
            Filter::Gana(_) => r.gana += 1,
            Filter::Samjna(_) => r.samjna += 1,
            Filter::Raw(_) | Filter::RawIn(_) | Filter::Value(_) | Filter::Lakshana(_) => {
                r.literal += 1
            }
            Filter::Adi(set) | Filter::Antya(set) | Filter::Upadha(set) => {
                // A narrower sound group is more specific than a wide one.
                r.sound += 1;
                r.sound_narrowness += 64u32.saturating_sub(set.len() as u32);
            }
            Filter::And(a, b) => {
                a.accumulate_rank(r);
                b.accumulate_rank(r);
            }
            Filter::Or(a, b) => {
                a.accumulate_rank(r);
                b.accumulate_rank(r);
                r.disjunctive += 1;
            }
            Filter::Not(a) => a.accumulate_rank(r),
            Filter::AllowAll | Filter::None => {}
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Rank {
    pub gana: u8,
    pub samjna: u8,
    pub literal: u8,
    pub sound: u8,
    pub sound_narrowness: u32,
    pub disjunctive: u8,
}

fn known_tag(spec: &str) -> Option<Tag> {
    Some(match spec {
        "dhatu" => Tag::Dhatu,
        "anga" => Tag::Anga,
        "pratyaya" => Tag::Pratyaya,
        "pratipadika" => Tag::Pratipadika,
        "vikarana" => Tag::Vikarana,
        "agama" => Tag::Agama,
        "krt" => Tag::Krt,
        "taddhita" => Tag::Taddhita,
        "vibhakti" => Tag::Vibhakti,
        "tin" => Tag::Tin,
        "sup" => Tag::Sup,
        "sarvadhatuka" => Tag::Sarvadhatuka,
        "ardhadhatuka" => Tag::Ardhadhatuka,
        "abhyasa" => Tag::Abhyasa,
        "abhyasta" => Tag::Abhyasta,
        "pada" => Tag::Pada,
        "guna" => Tag::Guna,
        "vrddhi" => Tag::Vrddhi,
        "sarvanama" => Tag::Sarvanama,
        "avyaya" => Tag::Avyaya,
        "sambuddhi" => Tag::Sambuddhi,
        "atmanepada" => Tag::Atmanepada,
        "parasmaipada" => Tag::Parasmaipada,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::ParseOptions;

    #[test]
    fn antya_matches_term_final_sound() {
        let f = Filter::antya("ac").unwrap();
        let bu = Upadesha::parse("BU", ParseOptions::default());
        assert!(f.matches(&bu));
        // "f" (vocalic r) is itself a member of "ac", so a consonant-final
        // root is needed to exercise the non-matching case.
        let tan = Upadesha::parse("tan", ParseOptions::default());
        assert!(!f.matches(&tan));
    }

    #[test]
    fn and_requires_both() {
        let f = Filter::antya("ac").unwrap().and(Filter::samjna(Tag::Dhatu));
        let bu = Upadesha::parse("BU", ParseOptions::default()).add_tag(Tag::Dhatu);
        assert!(f.matches(&bu));
        let bu_no_tag = Upadesha::parse("BU", ParseOptions::default());
        assert!(!f.matches(&bu_no_tag));
    }

    #[test]
    fn narrower_sound_group_is_subset_of_wider() {
        let ik = Filter::antya("ik").unwrap();
        let ac = Filter::antya("ac").unwrap();
        assert!(ik.is_subset_of(&ac));
        assert!(!ac.is_subset_of(&ik));
    }

    #[test]
    fn everything_is_subset_of_allow_all() {
        let f = Filter::samjna(Tag::Dhatu);
        assert!(f.is_subset_of(&Filter::AllowAll));
    }

    #[test]
    fn narrower_filter_outranks_wider_one() {
        let narrow = Filter::antya("ik").unwrap().and(Filter::samjna(Tag::Dhatu));
        let wide = Filter::antya("ac").unwrap();
        assert!(narrow.rank() > wide.rank());
    }
}
