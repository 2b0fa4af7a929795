//! Saṃjñā tags: the classificatory labels an upadeśa accrues over a
//! derivation (spec §3, §4.2).
//!
//! Most tags are fixed, well-known grammatical categories and get their
//! own enum variant. The one genuinely open-ended family is the
//! indicatory-letter tag `<L>it`, produced for every indicatory letter
//! the parser strips off a raw form (spec §4.2); that family is modeled
//! as `Tag::It(char)` rather than one variant per letter, since the set
//! of possible letters isn't fixed ahead of time.

use compact_str::CompactString;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Tag {
    Dhatu,
    Anga,
    Pratyaya,
    Pratipadika,
    Vikarana,
    Agama,
    Krt,
    Taddhita,
    Vibhakti,
    Tin,
    Sup,
    Sarvadhatuka,
    Ardhadhatuka,
    Abhyasa,
    Abhyasta,
    Pada,
    Guna,
    Vrddhi,
    Sarvanama,
    Avyaya,
    Sambuddhi,
    Atmanepada,
    Parasmaipada,
    /// Accent marks captured during parsing (spec §4.2 step 1).
    Anudatta,
    Svarita,
    Anudattet,
    Svaritet,
    /// The trailing `i~r` indicatory sequence (spec §4.2 step 3).
    Ir,
    /// `<L>it`: indicatory letter `L` was dropped during parsing.
    It(char),
    /// A rarer dynamic tag recorded verbatim, such as the `vit`/`It`
    /// designation from spec §4.2 step 6 (e.g. `"Yvit"`, `"qIt"`).
    Named(CompactString),
}

impl Tag {
    pub fn it(letter: char) -> Tag {
        Tag::It(letter)
    }

    pub fn named(s: impl Into<CompactString>) -> Tag {
        Tag::Named(s.into())
    }
}
