//! The operator algebra: the transformations a rule's right-hand side
//! applies once its filters match (spec §4.4).
//!
//! Every operator is a pure function from a `State` and a term index to
//! a new `State`, plus a `found` flag reporting whether it actually
//! changed anything. The flag matters for `samprasarana` in particular:
//! a rule can be declared for a term whose expected semivowel isn't
//! actually in the position the operator looks at (see the note on
//! `Operator::Samprasarana` below), and the driver needs to know
//! whether to treat that as a real application or a silent no-op. This
//! session resolves the ambiguity in spec §9 by threading `found`
//! through every variant uniformly rather than singling one out; see
//! DESIGN.md.

use crate::state::State;
use crate::tag::Tag;
use crate::term::{Locus, ParseOptions, Upadesha};
use compact_str::CompactString;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Before,
    After,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operator {
    /// General "of that" substitution: replace the term's entire value
    /// (from `Locus::Value` onward) with a literal adesha, re-running
    /// the indicatory-letter parser over it first.
    Tasya(CompactString),
    /// Replace only the term's first sound.
    Adi(CompactString),
    /// Replace the "ti" region: the term's last vowel and everything
    /// after it (Panini 1.1.64). The common locus for aṅga-level
    /// substitutions such as vikaraṇa-conditioned changes.
    Ti(CompactString),
    /// Replace only the term's last sound.
    AlTasya(CompactString),
    /// Replace only the term's penultimate sound.
    Upadha(CompactString),
    /// Insert a fresh upadeśa adjacent to this term: an āgama
    /// (augment) or a pratyaya (vikaraṇa, kṛt, taddhita, tiṅ, ...). The
    /// two differ only in which indicatory letters the parser strips
    /// (spec §4.2): a pratyaya sheds the `{z,c,j,Y,w,q,R}`/`{l,S}`∪ku
    /// leading letters an āgama doesn't.
    Insert {
        raw: CompactString,
        direction: Direction,
        tag: Tag,
        opts: ParseOptions,
    },
    /// Replace the term's value with a literal, without re-parsing
    /// indicatory letters (used for sandhi-adjacent string substitution
    /// rather than new-upadesha declaration).
    Replace(CompactString),
    AddSamjna(Tag),
    RemoveSamjna(Tag),
    /// Guṇa-grade the term's last vowel (1.1.2 "adeṅ guṇaḥ").
    Guna,
    /// Vṛddhi-grade the term's last vowel (1.1.1 "vṛddhir ādaic").
    Vrddhi,
    /// Lengthen the term's last vowel to its long counterpart.
    Dirgha,
    /// Shorten the term's last vowel to its short counterpart.
    Hrasva,
    /// Replace a semivowel (y/v/r/l) with its vowel counterpart
    /// (i/u/ṛ/ḷ). A no-op (found = false) if the targeted sound isn't
    /// actually a semivowel — declared rules aren't always applicable
    /// to every term they're registered against.
    Samprasarana,
    /// Try each `(filter, operator)` pair in order against the term,
    /// applying the first whose filter matches. Models the positional
    /// pairing of several sthāni conditions with several adeśas
    /// declared together (yathāsaṃkhya).
    YathaSamkhya(Vec<(crate::filter::Filter, Box<Operator>)>),
    /// Apply each operator in sequence, short-circuiting on the first
    /// that actually changes something.
    FirstOf(Vec<Operator>),
}

const GUNA: &[(char, &str)] = &[
    ('a', "a"),
    ('A', "a"),
    ('i', "e"),
    ('I', "e"),
    ('u', "o"),
    ('U', "o"),
    ('f', "ar"),
    ('F', "ar"),
    ('x', "al"),
    ('X', "al"),
];

const VRDDHI: &[(char, &str)] = &[
    ('a', "A"),
    ('A', "A"),
    ('i', "E"),
    ('I', "E"),
    ('u', "O"),
    ('U', "O"),
    ('f', "Ar"),
    ('F', "Ar"),
    ('x', "Al"),
    ('X', "Al"),
];

const DIRGHA: &[(char, char)] = &[
    ('a', 'A'),
    ('i', 'I'),
    ('u', 'U'),
    ('f', 'F'),
    ('x', 'X'),
];

const HRASVA: &[(char, char)] = &[
    ('A', 'a'),
    ('I', 'i'),
    ('U', 'u'),
    ('F', 'f'),
    ('X', 'x'),
];

const SAMPRASARANA: &[(char, char)] = &[('y', 'i'), ('v', 'u'), ('r', 'f'), ('l', 'x')];

impl Operator {
    pub fn tasya(adesha: &str) -> Operator {
        Operator::Tasya(CompactString::from(adesha))
    }
    pub fn adi(adesha: &str) -> Operator {
        Operator::Adi(CompactString::from(adesha))
    }
    pub fn ti(adesha: &str) -> Operator {
        Operator::Ti(CompactString::from(adesha))
    }
    pub fn al_tasya(adesha: &str) -> Operator {
        Operator::AlTasya(CompactString::from(adesha))
    }
    pub fn upadha(adesha: &str) -> Operator {
        Operator::Upadha(CompactString::from(adesha))
    }
    /// Insert an āgama (augment): parsed with default options, since an
    /// āgama's own declared form rarely carries pratyaya-only
    /// indicatory letters.
    pub fn insert_before(raw: &str, tag: Tag) -> Operator {
        Operator::Insert {
            raw: CompactString::from(raw),
            direction: Direction::Before,
            tag,
            opts: ParseOptions::default(),
        }
    }
    pub fn insert_after(raw: &str, tag: Tag) -> Operator {
        Operator::Insert {
            raw: CompactString::from(raw),
            direction: Direction::After,
            tag,
            opts: ParseOptions::default(),
        }
    }

    /// Insert a pratyaya (vikaraṇa, kṛt, taddhita, vibhakti, ...) after
    /// the current term, parsed with `pratyaya: true` so its own
    /// indicatory letters are stripped the way a declared suffix's are.
    pub fn insert_pratyaya_after(raw: &str, tag: Tag, opts: ParseOptions) -> Operator {
        Operator::Insert {
            raw: CompactString::from(raw),
            direction: Direction::After,
            tag,
            opts: ParseOptions {
                pratyaya: true,
                ..opts
            },
        }
    }
    pub fn replace(value: &str) -> Operator {
        Operator::Replace(CompactString::from(value))
    }

    /// Apply this operator to the term at `index` and `locus` (the
    /// value-stack layer the owning rule targets; spec §3 "Rule",
    /// §4.4), returning the new state and whether anything actually
    /// changed.
    pub fn apply(&self, state: &State, index: usize, locus: Locus) -> (State, bool) {
        match self {
            Operator::Tasya(adesha) => {
                let term = &state.terms()[index];
                let parsed = Upadesha::parse(adesha, ParseOptions::default());
                let new_term = term
                    .write(locus, parsed.value())
                    .add_tags(parsed.tags().cloned().collect::<Vec<_>>())
                    .add_part(adesha);
                (state.set(index, new_term), true)
            }
            Operator::Adi(adesha) => replace_prefix(state, index, 1, adesha, locus),
            Operator::AlTasya(adesha) => replace_suffix(state, index, 1, adesha, locus),
            Operator::Upadha(adesha) => replace_at_from_end(state, index, 2, 1, adesha, locus),
            Operator::Ti(adesha) => {
                let term = &state.terms()[index];
                match ti_start(term.at(locus)) {
                    Some(start) => {
                        let new_value = format!("{}{}", &term.at(locus)[..start], adesha);
                        let new_term = term.write(locus, &new_value);
                        (state.set(index, new_term), true)
                    }
                    None => (state.clone(), false),
                }
            }
            Operator::Insert { raw, direction, tag, opts } => {
                let new_term = Upadesha::parse(raw, *opts).add_tag(*tag);
                let at = match direction {
                    Direction::Before => index,
                    Direction::After => index + 1,
                };
                (state.insert(at, new_term), true)
            }
            Operator::Replace(value) => {
                let term = &state.terms()[index];
                let changed = term.at(locus) != value.as_str();
                (state.set(index, term.write(locus, value)), changed)
            }
            Operator::AddSamjna(tag) => {
                let term = &state.terms()[index];
                let changed = !term.has_tag(tag);
                (state.set(index, term.add_tag(*tag)), changed)
            }
            Operator::RemoveSamjna(tag) => {
                let term = &state.terms()[index];
                let changed = term.has_tag(tag);
                (state.set(index, term.remove_tags(&[tag.clone()])), changed)
            }
            Operator::Guna => grade_last_vowel(state, index, GUNA, locus),
            Operator::Vrddhi => grade_last_vowel(state, index, VRDDHI, locus),
            Operator::Dirgha => length_last_vowel(state, index, DIRGHA, locus),
            Operator::Hrasva => length_last_vowel(state, index, HRASVA, locus),
            Operator::Samprasarana => {
                let term = &state.terms()[index];
                match term.at(locus).chars().last().and_then(|c| {
                    SAMPRASARANA
                        .iter()
                        .find(|(semivowel, _)| *semivowel == c)
                        .map(|(_, vowel)| *vowel)
                }) {
                    Some(vowel) => {
                        let mut value = term.at(locus).to_string();
                        value.pop();
                        value.push(vowel);
                        (state.set(index, term.write(locus, &value)), true)
                    }
                    None => (state.clone(), false),
                }
            }
            Operator::YathaSamkhya(pairs) => {
                let term = state.terms()[index].clone();
                for (filter, op) in pairs {
                    if filter.matches(&term) {
                        return op.apply(state, index, locus);
                    }
                }
                (state.clone(), false)
            }
            Operator::FirstOf(ops) => {
                for op in ops {
                    let (new_state, found) = op.apply(state, index, locus);
                    if found {
                        return (new_state, true);
                    }
                }
                (state.clone(), false)
            }
        }
    }

    /// The operator's conflict category (spec §4.4): two operators that
    /// share a category in `conflicts_with` cannot both fire at the same
    /// locus, the condition the registry's apavāda inference checks
    /// alongside filter specificity (spec §4.6).
    pub fn category(&self) -> OperatorCategory {
        match self {
            Operator::Tasya(_) | Operator::Adi(_) | Operator::AlTasya(_) | Operator::Upadha(_) => {
                OperatorCategory::Tasya
            }
            Operator::Ti(_) => OperatorCategory::Ti,
            Operator::Insert { .. } => OperatorCategory::Insert,
            Operator::Replace(_) => OperatorCategory::Replace,
            Operator::AddSamjna(_) | Operator::RemoveSamjna(_) => OperatorCategory::AddSamjna,
            Operator::Guna | Operator::Vrddhi => OperatorCategory::GunaVrddhi,
            Operator::Dirgha => OperatorCategory::Dirgha,
            Operator::Hrasva => OperatorCategory::Hrasva,
            Operator::Samprasarana => OperatorCategory::Samprasarana,
            // A combinator's category is whatever its first branch's is;
            // conflict-checking a combinator against itself never arises
            // in the registry's pairwise scan (rule content doesn't
            // declare two rules with identical combinator operators).
            Operator::YathaSamkhya(pairs) => pairs
                .first()
                .map(|(_, op)| op.category())
                .unwrap_or(OperatorCategory::Replace),
            Operator::FirstOf(ops) => ops
                .first()
                .map(|op| op.category())
                .unwrap_or(OperatorCategory::Replace),
        }
    }
}

/// The closed set of operator categories the conflict predicate (spec
/// §4.4) is defined over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorCategory {
    Tasya,
    Ti,
    Insert,
    Replace,
    AddSamjna,
    GunaVrddhi,
    Dirgha,
    Hrasva,
    Samprasarana,
}

/// True iff two operator categories cannot both fire at the same locus
/// (spec §4.4): `{dirgha, hrasva}`, `{insert}` with itself, `{replace}`
/// with itself, `{add_samjna}` with itself, and `{ti, tasya}`.
pub fn categories_conflict(a: OperatorCategory, b: OperatorCategory) -> bool {
    use OperatorCategory::*;
    matches!(
        (a, b),
        (Dirgha, Hrasva)
            | (Hrasva, Dirgha)
            | (Insert, Insert)
            | (Replace, Replace)
            | (AddSamjna, AddSamjna)
            | (Ti, Tasya)
            | (Tasya, Ti)
    )
}

fn replace_prefix(state: &State, index: usize, n: usize, adesha: &str, locus: Locus) -> (State, bool) {
    let term = &state.terms()[index];
    let chars: Vec<char> = term.at(locus).chars().collect();
    if chars.len() < n {
        return (state.clone(), false);
    }
    let rest: String = chars[n..].iter().collect();
    let new_value = format!("{adesha}{rest}");
    let changed = new_value != term.at(locus);
    (state.set(index, term.write(locus, &new_value)), changed)
}

fn replace_suffix(state: &State, index: usize, n: usize, adesha: &str, locus: Locus) -> (State, bool) {
    let term = &state.terms()[index];
    let chars: Vec<char> = term.at(locus).chars().collect();
    if chars.len() < n {
        return (state.clone(), false);
    }
    let prefix: String = chars[..chars.len() - n].iter().collect();
    let new_value = format!("{prefix}{adesha}");
    let changed = new_value != term.at(locus);
    (state.set(index, term.write(locus, &new_value)), changed)
}

/// Replace `len` characters starting `from_end` characters before the
/// end (e.g. `from_end=2, len=1` targets the penultimate sound).
fn replace_at_from_end(
    state: &State,
    index: usize,
    from_end: usize,
    len: usize,
    adesha: &str,
    locus: Locus,
) -> (State, bool) {
    let term = &state.terms()[index];
    let chars: Vec<char> = term.at(locus).chars().collect();
    if chars.len() < from_end {
        return (state.clone(), false);
    }
    let cut = chars.len() - from_end;
    let prefix: String = chars[..cut].iter().collect();
    let suffix: String = chars[cut + len..].iter().collect();
    let new_value = format!("{prefix}{adesha}{suffix}");
    let changed = new_value != term.at(locus);
    (state.set(index, term.write(locus, &new_value)), changed)
}

/// The byte offset of the "ti" region (Panini 1.1.64): the last vowel
/// in `value` and everything after it. `None` if `value` has no vowel.
fn ti_start(value: &str) -> Option<usize> {
    let vowels = "aAiIuUfFxXeEoO";
    value
        .char_indices()
        .rev()
        .find(|(_, c)| vowels.contains(*c))
        .map(|(i, _)| i)
}

fn grade_last_vowel(state: &State, index: usize, table: &[(char, &str)], locus: Locus) -> (State, bool) {
    let term = &state.terms()[index];
    let chars: Vec<char> = term.at(locus).chars().collect();
    let Some(pos) = chars.iter().rposition(|c| table.iter().any(|(v, _)| v == c)) else {
        return (state.clone(), false);
    };
    let replacement = table.iter().find(|(v, _)| *v == chars[pos]).unwrap().1;
    let prefix: String = chars[..pos].iter().collect();
    let suffix: String = chars[pos + 1..].iter().collect();
    let new_value = format!("{prefix}{replacement}{suffix}");
    let changed = new_value != term.at(locus);
    (state.set(index, term.write(locus, &new_value)), changed)
}

fn length_last_vowel(state: &State, index: usize, table: &[(char, char)], locus: Locus) -> (State, bool) {
    let term = &state.terms()[index];
    let chars: Vec<char> = term.at(locus).chars().collect();
    let Some(pos) = chars.iter().rposition(|c| table.iter().any(|(v, _)| v == c)) else {
        return (state.clone(), false);
    };
    let replacement = table.iter().find(|(v, _)| *v == chars[pos]).unwrap().1;
    let mut new_chars = chars.clone();
    new_chars[pos] = replacement;
    let new_value: String = new_chars.into_iter().collect();
    (state.set(index, term.write(locus, &new_value)), true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::ParseOptions;

    fn state_of(raw: &str) -> State {
        State::new(vec![Upadesha::parse(raw, ParseOptions::default())])
    }

    #[test]
    fn guna_raises_short_vowel() {
        let s = state_of("BU");
        let (s2, found) = Operator::Guna.apply(&s, 0, Locus::Value);
        assert!(found);
        assert_eq!(s2.terms()[0].value(), "Bo");
    }

    #[test]
    fn vrddhi_raises_above_guna() {
        let s = state_of("kf");
        let (s2, found) = Operator::Vrddhi.apply(&s, 0, Locus::Value);
        assert!(found);
        assert_eq!(s2.terms()[0].value(), "kAr");
    }

    #[test]
    fn samprasarana_is_noop_without_semivowel() {
        let s = state_of("BU");
        let (s2, found) = Operator::Samprasarana.apply(&s, 0, Locus::Value);
        assert!(!found);
        assert_eq!(s2.terms()[0].value(), "BU");
    }

    #[test]
    fn samprasarana_replaces_final_semivowel_with_vowel() {
        let s = state_of("sev");
        let (s2, found) = Operator::Samprasarana.apply(&s, 0, Locus::Value);
        assert!(found);
        assert_eq!(s2.terms()[0].value(), "seu");
    }

    #[test]
    fn insert_adds_a_new_term() {
        let s = state_of("BU");
        let (s2, found) = Operator::insert_after("tip", Tag::Tin).apply(&s, 0, Locus::Value);
        assert!(found);
        assert_eq!(s2.len(), 2);
        assert_eq!(s2.terms()[1].raw(), "tip");
    }

    #[test]
    fn ti_replaces_from_last_vowel() {
        let s = state_of("eDa");
        let (s2, found) = Operator::ti("a").apply(&s, 0, Locus::Value);
        assert!(found);
        assert_eq!(s2.terms()[0].value(), "eDa");
    }

    #[test]
    fn dirgha_and_hrasva_conflict() {
        assert!(categories_conflict(
            OperatorCategory::Dirgha,
            OperatorCategory::Hrasva
        ));
        assert!(!categories_conflict(
            OperatorCategory::Dirgha,
            OperatorCategory::GunaVrddhi
        ));
    }

    #[test]
    fn insert_conflicts_with_itself_but_not_replace() {
        assert!(categories_conflict(
            OperatorCategory::Insert,
            OperatorCategory::Insert
        ));
        assert!(!categories_conflict(
            OperatorCategory::Insert,
            OperatorCategory::Replace
        ));
    }
}
