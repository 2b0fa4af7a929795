//! The Sanskrit phonological alphabet, in SLP1 transliteration.
//!
//! This module is the foundation the rest of the engine builds on
//! (spec §4.1): it defines each sound's articulatory attributes, the
//! *pratyāhāra* shorthand for naming ranges of sounds (derived the way
//! the Sanskrit grammatical tradition derives them, from the fourteen
//! Māheśvara Sūtras), *savarṇa* equivalence, and a `closest` function
//! used throughout the operator algebra.

use crate::error::ConfigError;
use std::collections::HashMap;

/// Place of articulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Place {
    Kanthya,
    Talavya,
    Murdhanya,
    Dantya,
    Osthya,
    Dantosthya,
    Kanthosthya,
    Kanthatalavya,
    Other,
}

/// Vowel length. Consonants carry `NotApplicable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Length {
    Hrasva,
    Dirgha,
    Pluta,
    NotApplicable,
}

/// The articulatory features of a single sound, used by `savarna` and
/// `closest`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Features {
    pub place: Place,
    pub length: Length,
    pub voiced: bool,
    pub aspirated: bool,
    pub nasal: bool,
}

/// The fourteen Māheśvara Sūtras, as (sounds, terminating-it) pairs.
/// Pratyāhāras are named by a starting sound and a terminating it-letter
/// drawn from this table; `pratyahara` reconstructs the range the
/// tradition intends.
const SUTRAS: &[(&str, char)] = &[
    ("aiu", 'R'),
    ("fx", 'k'),
    ("eo", 'N'),
    ("EO", 'c'),
    ("hyvr", 'w'),
    ("l", 'R'),
    ("YmNRn", 'm'),
    ("JB", 'Y'),
    ("GQD", 'z'),
    ("jbgqd", 'S'),
    ("KPCWTcwt", 'v'),
    ("kp", 'y'),
    ("Szs", 'r'),
    ("h", 'l'),
];

fn features(c: char) -> Option<Features> {
    use Length::*;
    use Place::*;

    let f = |place, length, voiced, aspirated, nasal| {
        Some(Features {
            place,
            length,
            voiced,
            aspirated,
            nasal,
        })
    };

    match c {
        'a' => f(Kanthya, Hrasva, true, false, false),
        'A' => f(Kanthya, Dirgha, true, false, false),
        'i' => f(Talavya, Hrasva, true, false, false),
        'I' => f(Talavya, Dirgha, true, false, false),
        'u' => f(Osthya, Hrasva, true, false, false),
        'U' => f(Osthya, Dirgha, true, false, false),
        'f' => f(Murdhanya, Hrasva, true, false, false),
        'F' => f(Murdhanya, Dirgha, true, false, false),
        'x' => f(Dantya, Hrasva, true, false, false),
        'X' => f(Dantya, Dirgha, true, false, false),
        'e' => f(Kanthatalavya, Dirgha, true, false, false),
        'E' => f(Kanthatalavya, Pluta, true, false, false),
        'o' => f(Kanthosthya, Dirgha, true, false, false),
        'O' => f(Kanthosthya, Pluta, true, false, false),

        'k' => f(Kanthya, NotApplicable, false, false, false),
        'K' => f(Kanthya, NotApplicable, false, true, false),
        'g' => f(Kanthya, NotApplicable, true, false, false),
        'G' => f(Kanthya, NotApplicable, true, true, false),
        'N' => f(Kanthya, NotApplicable, true, false, true),

        'c' => f(Talavya, NotApplicable, false, false, false),
        'C' => f(Talavya, NotApplicable, false, true, false),
        'j' => f(Talavya, NotApplicable, true, false, false),
        'J' => f(Talavya, NotApplicable, true, true, false),
        'Y' => f(Talavya, NotApplicable, true, false, true),

        'w' => f(Murdhanya, NotApplicable, false, false, false),
        'W' => f(Murdhanya, NotApplicable, false, true, false),
        'q' => f(Murdhanya, NotApplicable, true, false, false),
        'Q' => f(Murdhanya, NotApplicable, true, true, false),
        'R' => f(Murdhanya, NotApplicable, true, false, true),

        't' => f(Dantya, NotApplicable, false, false, false),
        'T' => f(Dantya, NotApplicable, false, true, false),
        'd' => f(Dantya, NotApplicable, true, false, false),
        'D' => f(Dantya, NotApplicable, true, true, false),
        'n' => f(Dantya, NotApplicable, true, false, true),

        'p' => f(Osthya, NotApplicable, false, false, false),
        'P' => f(Osthya, NotApplicable, false, true, false),
        'b' => f(Osthya, NotApplicable, true, false, false),
        'B' => f(Osthya, NotApplicable, true, true, false),
        'm' => f(Osthya, NotApplicable, true, false, true),

        'y' => f(Talavya, NotApplicable, true, false, false),
        'r' => f(Murdhanya, NotApplicable, true, false, false),
        'l' => f(Dantya, NotApplicable, true, false, false),
        'v' => f(Dantosthya, NotApplicable, true, false, false),

        'S' => f(Talavya, NotApplicable, false, false, false),
        'z' => f(Murdhanya, NotApplicable, false, false, false),
        's' => f(Dantya, NotApplicable, false, false, false),
        'h' => f(Kanthya, NotApplicable, true, true, false),

        'M' => f(Other, NotApplicable, true, false, true),
        'H' => f(Other, NotApplicable, false, false, false),
        '~' => f(Other, NotApplicable, true, false, true),

        _ => None,
    }
}

/// A single sound from the SLP1 alphabet, with its articulatory
/// attributes attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sound {
    pub value: char,
    pub features: Features,
}

impl Sound {
    pub fn new(value: char) -> Option<Self> {
        features(value).map(|features| Sound { value, features })
    }

    /// True iff `self` and `other` are *savarṇa*: the same place of
    /// articulation and nasality, regardless of length.
    pub fn is_savarna(&self, other: &Sound) -> bool {
        self.features.place == other.features.place && self.features.nasal == other.features.nasal
    }

    /// The count of articulatory features `self` shares with `other`,
    /// used to break ties in `closest`.
    fn shared_feature_count(&self, other: &Sound) -> u32 {
        let mut n = 0;
        if self.features.place == other.features.place {
            n += 1;
        }
        if self.features.voiced == other.features.voiced {
            n += 1;
        }
        if self.features.aspirated == other.features.aspirated {
            n += 1;
        }
        if self.features.nasal == other.features.nasal {
            n += 1;
        }
        n
    }

    /// Pick the member of `group` that shares the most articulatory
    /// features with `self`. Ties are broken by preferring a member of
    /// the same length, then by the member's position in `group`.
    /// Total whenever `group` is nonempty (spec §4.1).
    pub fn closest(&self, group: &SoundSet) -> Option<char> {
        let mut best: Option<(char, u32, bool)> = None;
        for &c in group.iter() {
            let Some(s) = Sound::new(c) else { continue };
            let shared = self.shared_feature_count(&s);
            let same_length = s.features.length == self.features.length;
            let better = match best {
                None => true,
                Some((_, best_shared, best_len)) => {
                    (shared, same_length) > (best_shared, best_len)
                }
            };
            if better {
                best = Some((c, shared, same_length));
            }
        }
        best.map(|(c, _, _)| c)
    }
}

/// An ordered, deduplicated set of sounds. Order matters: `closest`
/// breaks ties by first-in-group position, so this is a `Vec`, not a
/// `HashSet`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SoundSet(Vec<char>);

impl SoundSet {
    pub fn new() -> Self {
        SoundSet(Vec::new())
    }

    pub fn from_chars(chars: impl IntoIterator<Item = char>) -> Self {
        let mut set = SoundSet::new();
        for c in chars {
            set.push(c);
        }
        set
    }

    fn push(&mut self, c: char) {
        if !self.0.contains(&c) {
            self.0.push(c);
        }
    }

    pub fn contains(&self, c: char) -> bool {
        self.0.contains(&c)
    }

    pub fn iter(&self) -> impl Iterator<Item = &char> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn union(&self, other: &SoundSet) -> SoundSet {
        let mut out = self.clone();
        for &c in &other.0 {
            out.push(c);
        }
        out
    }
}

/// Reconstruct the sounds named by a pratyāhāra such as `ac`, `hal`,
/// `ik`, or `yaR`, by walking the Māheśvara Sūtras from the starting
/// sound to the first occurrence of the terminating it-letter at or
/// after it.
fn pratyahara(name: &str) -> Option<Vec<char>> {
    let mut chars = name.chars();
    let start = chars.next()?;
    let it = chars.last().unwrap_or(start);
    if name.chars().count() < 2 {
        return None;
    }

    // Flatten the sutras into a sequence of sounds, recording the index
    // immediately after which each it-marker occurrence falls.
    let mut flat: Vec<char> = Vec::new();
    let mut it_positions: Vec<(char, usize)> = Vec::new();
    for (sounds, it_marker) in SUTRAS {
        for c in sounds.chars() {
            flat.push(c);
        }
        it_positions.push((*it_marker, flat.len()));
    }

    let start_index = flat.iter().position(|&c| c == start)?;
    let (_, end_index) = it_positions
        .iter()
        .find(|&&(marker, pos)| marker == it && pos > start_index)?;

    if *end_index <= start_index {
        return None;
    }
    Some(flat[start_index..*end_index].to_vec())
}

/// Resolve a sound-group specification: a pratyāhāra name (`ac`, `hal`,
/// `ik`, `yaR`, ...), a space-separated list of such names and literal
/// sounds, or a single literal sound.
pub fn sound_group(spec: &str) -> Result<SoundSet, ConfigError> {
    if spec.contains(' ') {
        let mut set = SoundSet::new();
        for token in spec.split_whitespace() {
            set = set.union(&sound_group(token)?);
        }
        return Ok(set);
    }

    let mut chars = spec.chars();
    let first = chars.next();
    match first {
        None => Ok(SoundSet::new()),
        Some(c) if spec.chars().count() == 1 => Ok(SoundSet::from_chars([c])),
        _ => {
            if let Some(sounds) = pratyahara(spec) {
                Ok(SoundSet::from_chars(sounds))
            } else if spec.chars().all(|c| features(c).is_some()) {
                // A literal run of sounds, e.g. "tu s m" without spaces: "tusm".
                Ok(SoundSet::from_chars(spec.chars()))
            } else {
                Err(ConfigError::UnknownPratyahara(spec.to_string()))
            }
        }
    }
}

/// A small cache over `sound_group`, since the same pratyāhāra names are
/// resolved repeatedly while building filters.
#[derive(Default)]
pub struct PratyaharaCache {
    cache: HashMap<String, SoundSet>,
}

impl PratyaharaCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, spec: &str) -> Result<SoundSet, ConfigError> {
        if let Some(set) = self.cache.get(spec) {
            return Ok(set.clone());
        }
        let set = sound_group(spec)?;
        self.cache.insert(spec.to_string(), set.clone());
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ac_is_all_vowels() {
        let ac = sound_group("ac").unwrap();
        for v in "aAiIuUfFxXeEoO".chars() {
            assert!(ac.contains(v), "missing vowel {v}");
        }
        assert!(!ac.contains('k'));
    }

    #[test]
    fn hal_is_all_consonants() {
        let hal = sound_group("hal").unwrap();
        assert!(hal.contains('k'));
        assert!(hal.contains('h'));
        assert!(!hal.contains('a'));
    }

    #[test]
    fn ik_is_i_u_r_l() {
        // The bare pratyahara "ik" enumerates only the short symbols the
        // Maheshvara Sutras actually list (i, u, f, x); it does not
        // savarna-extend to the long vowels (that's rule 1.1.69's job,
        // not pratyahara resolution — see DESIGN.md).
        let ik = sound_group("ik").unwrap();
        for v in "iufx".chars() {
            assert!(ik.contains(v), "missing {v}");
        }
        assert!(!ik.contains('I'));
        assert!(!ik.contains('U'));
        assert!(!ik.contains('a'));
        assert!(!ik.contains('e'));
    }

    #[test]
    fn yan_is_semivowels() {
        let yan = sound_group("yaR").unwrap();
        for v in "yvrl".chars() {
            assert!(yan.contains(v), "missing {v}");
        }
    }

    #[test]
    fn savarna_ignores_length() {
        let a = Sound::new('a').unwrap();
        let aa = Sound::new('A').unwrap();
        let i = Sound::new('i').unwrap();
        assert!(a.is_savarna(&aa));
        assert!(!a.is_savarna(&i));
    }

    #[test]
    fn closest_picks_matching_place_and_length() {
        let i = Sound::new('i').unwrap();
        let group = sound_group("yaR").unwrap();
        // i -> y (both talavya/palatal-ish semivowel substitution, 1.1.45)
        assert_eq!(i.closest(&group), Some('y'));
    }

    #[test]
    fn closest_is_total_on_nonempty_group() {
        let h = Sound::new('h').unwrap();
        let group = sound_group("ac").unwrap();
        assert!(h.closest(&group).is_some());
    }
}
