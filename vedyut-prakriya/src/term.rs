//! The upadeśa: an annotated lexical element (spec §3, §4.2).
//!
//! An `Upadesha` is immutable. Every transformation — writing a
//! value-stack layer, accruing a tag, changing `raw` — returns a new
//! `Upadesha`; nothing is mutated in place. This mirrors "Immutable
//! states" in spec §9: copies share what they don't change, and the
//! type itself carries no interior mutability.

use crate::sounds::sound_group;
use crate::tag::Tag;
use compact_str::CompactString;
use rustc_hash::FxHashSet;

/// Which layer of the five-layer value stack a read or write targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Locus {
    Raw,
    Clean,
    Value,
    Asiddhavat,
    Asiddha,
}

impl Locus {
    fn index(self) -> usize {
        match self {
            Locus::Raw => 0,
            Locus::Clean => 1,
            Locus::Value => 2,
            Locus::Asiddhavat => 3,
            Locus::Asiddha => 4,
        }
    }
}

/// Flags that change how `parse_it` strips indicatory letters,
/// depending on what kind of upadeśa is being declared (spec §4.2).
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    pub pratyaya: bool,
    pub vibhakti: bool,
    pub taddhita: bool,
}

/// Sounds that a vibhakti's final consonant is *not* stripped for, per
/// 1.3.4 "na vibhaktau tusmāḥ". `sounds.py` is not part of the retrieved
/// corpus, so this is resolved as a documented judgment call (see
/// DESIGN.md): "tu", "s", "m" each degrade to their literal characters
/// when they don't resolve as a pratyāhāra, giving the set {t, u, s, m}.
fn vibhakti_kept_finals() -> crate::sounds::SoundSet {
    sound_group("tu s m").expect("literal sound list always resolves")
}

fn ku_varga() -> crate::sounds::SoundSet {
    // "ku": the guttural stops k, kh, g, gh, ṅ. Not derivable from the
    // Māheśvara Sūtras by the ordinary pratyāhāra algorithm, so it is a
    // named alias, the way the tradition itself treats it.
    crate::sounds::SoundSet::from_chars(['k', 'K', 'g', 'G', 'N'])
}

#[derive(Debug, Clone)]
struct NamedSet<T: std::hash::Hash + Eq>(FxHashSet<T>);

impl<T: std::hash::Hash + Eq + Clone> NamedSet<T> {
    fn new() -> Self {
        NamedSet(FxHashSet::default())
    }
    fn contains(&self, v: &T) -> bool {
        self.0.contains(v)
    }
    fn insert(&mut self, v: T) {
        self.0.insert(v);
    }
    fn iter(&self) -> impl Iterator<Item = &T> {
        self.0.iter()
    }
}

impl<T: std::hash::Hash + Eq + Clone> PartialEq for NamedSet<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}
impl<T: std::hash::Hash + Eq + Clone> Eq for NamedSet<T> {}

type TagSet = NamedSet<Tag>;
type NameSet = NamedSet<CompactString>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upadesha {
    /// The five-layer value stack: raw, clean, value, asiddhavat, asiddha.
    values: [CompactString; 5],
    /// Whether a layer has been independently written rather than merely
    /// inheriting an earlier layer's cascade (spec §3: "writes propagate
    /// forward" to layers that have *not* already diverged — see
    /// DESIGN.md's resolution of this value-stack write-cascade question).
    overridden: [bool; 5],
    tags: TagSet,
    /// Every `raw` value this term has ever held.
    lakshana: NameSet,
    /// Names of operators already applied, to suppress re-application.
    ops: NameSet,
    /// Raw values of upadeśas inserted into this term by `tasya` (spec §4.4).
    parts: Vec<CompactString>,
}

impl Upadesha {
    /// Construct an upadeśa from a raw declared form, parsing off its
    /// indicatory letters (spec §4.2).
    pub fn parse(raw: &str, opts: ParseOptions) -> Self {
        let (clean, tags) = parse_it(raw, opts);
        let mut term = Upadesha {
            values: std::array::from_fn(|_| CompactString::new("")),
            overridden: [true, true, false, false, false],
            tags: TagSet::new(),
            lakshana: NameSet::new(),
            ops: NameSet::new(),
            parts: Vec::new(),
        };
        term.values[0] = CompactString::from(raw);
        // Writing `clean` (index 1) cascades to value/asiddhavat/asiddha,
        // since none of those layers has its own override yet.
        for i in 1..5 {
            term.values[i] = CompactString::from(clean.as_str());
        }
        for tag in tags {
            term.tags.insert(tag);
        }
        term
    }

    /// Construct directly from an already-clean value, carrying one tag.
    /// Used by operators and rule content that build terms (e.g. a tiN
    /// suffix or a fresh anga) rather than parse them from scratch.
    pub fn from_value(value: &str, tag: Tag) -> Self {
        let mut term = Upadesha {
            values: std::array::from_fn(|_| CompactString::new("")),
            overridden: [true, true, false, false, false],
            tags: TagSet::new(),
            lakshana: NameSet::new(),
            ops: NameSet::new(),
            parts: Vec::new(),
        };
        for slot in term.values.iter_mut() {
            *slot = CompactString::from(value);
        }
        term.tags.insert(tag);
        term
    }

    pub fn raw(&self) -> &str {
        &self.values[Locus::Raw.index()]
    }
    pub fn clean(&self) -> &str {
        &self.values[Locus::Clean.index()]
    }
    pub fn value(&self) -> &str {
        &self.values[Locus::Value.index()]
    }
    pub fn asiddhavat(&self) -> &str {
        &self.values[Locus::Asiddhavat.index()]
    }
    pub fn asiddha(&self) -> &str {
        &self.values[Locus::Asiddha.index()]
    }

    pub fn at(&self, locus: Locus) -> &str {
        &self.values[locus.index()]
    }

    pub fn adi(&self) -> Option<char> {
        self.value().chars().next()
    }

    pub fn antya(&self) -> Option<char> {
        self.value().chars().last()
    }

    pub fn upadha(&self) -> Option<char> {
        let chars: Vec<char> = self.value().chars().collect();
        chars.len().checked_sub(2).map(|i| chars[i])
    }

    pub fn tags(&self) -> impl Iterator<Item = &Tag> {
        self.tags.iter()
    }

    pub fn has_tag(&self, tag: &Tag) -> bool {
        self.tags.contains(tag)
    }

    pub fn has_any_tag(&self, tags: &[Tag]) -> bool {
        tags.iter().any(|t| self.has_tag(t))
    }

    pub fn is_kit(&self) -> bool {
        self.has_tag(&Tag::It('k'))
    }
    pub fn is_nit(&self) -> bool {
        self.has_tag(&Tag::It('N'))
    }
    pub fn is_git(&self) -> bool {
        self.has_tag(&Tag::It('g'))
    }

    pub fn lakshana(&self) -> impl Iterator<Item = &str> {
        self.lakshana.iter().map(|s| s.as_str())
    }

    pub fn has_lakshana(&self, value: &str) -> bool {
        self.lakshana.0.contains(value)
    }

    pub fn ops(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().map(|s| s.as_str())
    }

    pub fn has_op(&self, name: &str) -> bool {
        self.ops.0.contains(name)
    }

    pub fn parts(&self) -> &[CompactString] {
        &self.parts
    }

    /// Write a value-stack layer. A write at layer `L` sets `L` itself,
    /// then cascades forward into every later layer that has not already
    /// been independently written — a layer that previously diverged
    /// (e.g. an asiddhavat-locus rule already ran before this
    /// value-locus write) keeps its own value (spec §3: "writes
    /// propagate forward" only to layers that have not yet overridden
    /// the cascade; see DESIGN.md).
    #[must_use]
    pub fn write(&self, locus: Locus, value: &str) -> Self {
        let mut new = self.clone();
        let start = locus.index();
        new.values[start] = CompactString::from(value);
        new.overridden[start] = true;
        for i in (start + 1)..5 {
            if new.overridden[i] {
                break;
            }
            new.values[i] = CompactString::from(value);
        }
        new
    }

    /// Set a new `raw` value. Per spec §3, `raw` is otherwise immutable:
    /// this clones the upadeśa, re-parses indicatory letters against the
    /// new raw, and records the old raw in `lakshana`. This establishes a
    /// fresh value stack, so every layer starts over the way a freshly
    /// parsed upadeśa would (see `parse`).
    #[must_use]
    pub fn set_raw(&self, raw: &str, opts: ParseOptions) -> Self {
        let (clean, new_tags) = parse_it(raw, opts);
        let mut new = self.clone();
        new.lakshana.insert(CompactString::from(self.raw()));
        new.values[0] = CompactString::from(raw);
        new.overridden = [true, true, false, false, false];
        for i in 1..5 {
            new.values[i] = CompactString::from(clean.as_str());
        }
        for tag in new_tags {
            new.tags.insert(tag);
        }
        new
    }

    #[must_use]
    pub fn add_tag(&self, tag: Tag) -> Self {
        let mut new = self.clone();
        new.tags.insert(tag);
        new
    }

    #[must_use]
    pub fn add_tags(&self, tags: impl IntoIterator<Item = Tag>) -> Self {
        let mut new = self.clone();
        for t in tags {
            new.tags.insert(t);
        }
        new
    }

    /// Retract exactly the given tags. Used when an optional
    /// saṃjñā-adding rule is declined (spec §3 invariants, §4.6).
    #[must_use]
    pub fn remove_tags(&self, tags: &[Tag]) -> Self {
        let mut new = self.clone();
        new.tags.0.retain(|t| !tags.contains(t));
        new
    }

    #[must_use]
    pub fn add_op(&self, name: &str) -> Self {
        let mut new = self.clone();
        new.ops.insert(CompactString::from(name));
        new
    }

    #[must_use]
    pub fn add_ops<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut new = self.clone();
        for n in names {
            new.ops.insert(CompactString::from(n));
        }
        new
    }

    #[must_use]
    pub fn add_part(&self, raw: &str) -> Self {
        let mut new = self.clone();
        new.parts.push(CompactString::from(raw));
        new
    }

    #[must_use]
    pub fn set_parts(&self, parts: Vec<CompactString>) -> Self {
        let mut new = self.clone();
        new.parts = parts;
        new
    }
}

/// Extract indicatory letters from a raw form, returning the resulting
/// `clean` value and the saṃjñā tags the process discovers (spec §4.2).
fn parse_it(raw: &str, opts: ParseOptions) -> (String, Vec<Tag>) {
    let mut tags = Vec::new();

    // Step 1-2: accent markers. `\` = anudatta, `^` = svarita. If they
    // follow a nasal marker `~`, tag -et forms instead.
    let chars: Vec<char> = raw.chars().collect();
    let mut clean_chars: Vec<char> = Vec::with_capacity(chars.len());
    for (i, &c) in chars.iter().enumerate() {
        if c == '\\' || c == '^' {
            let after_nasal = i > 0 && chars[i - 1] == '~';
            tags.push(match (c, after_nasal) {
                ('\\', true) => Tag::Anudattet,
                ('\\', false) => Tag::Anudatta,
                (_, true) => Tag::Svaritet,
                (_, false) => Tag::Svarita,
            });
            continue;
        }
        clean_chars.push(c);
    }
    let mut clean: String = clean_chars.into_iter().collect();

    // Step 3: trailing "i~r" -> tag `ir`, strip the tilde only.
    let mut trailing_it_already_found = false;
    if clean.ends_with("i~r") {
        tags.push(Tag::Ir);
        let prefix_len = clean.len() - "i~r".len();
        clean = format!("{}{}", &clean[..prefix_len], "ir");
        trailing_it_already_found = true;
    }

    // Step 4: every nasal-marked vowel `V~` anywhere loses both
    // characters and adds tag `Vdit`.
    {
        let cs: Vec<char> = clean.chars().collect();
        let mut keep = vec![true; cs.len()];
        for i in 0..cs.len() {
            if cs[i] == '~' && i > 0 {
                tags.push(Tag::named(format!("{}dit", cs[i - 1])));
                keep[i - 1] = false;
                keep[i] = false;
                if i + 1 == cs.len() {
                    trailing_it_already_found = true;
                }
            }
        }
        clean = cs
            .iter()
            .zip(keep.iter())
            .filter(|(_, k)| **k)
            .map(|(c, _)| *c)
            .collect();
    }

    // Step 5: drop the final consonant as an it-letter (1.3.3
    // "halantyam"), unless `vibhakti` is set and that consonant is one
    // of tu/s/m (1.3.4), or a trailing it-vowel was already found in
    // step 3/4 — an upadesha carries one trailing-it convention, not
    // two stacked ones, so a dummy it-vowel already stripped from the
    // end protects whatever consonant it was shielding.
    if !trailing_it_already_found {
        let hal = sound_group("hal").expect("hal is a fixed pratyahara");
        if let Some(last) = clean.chars().last() {
            if hal.contains(last) {
                let kept = opts.vibhakti && vibhakti_kept_finals().contains(last);
                if !kept {
                    tags.push(Tag::it(last));
                    clean.pop();
                }
            }
        }
    }

    // Step 6: leading "Yi"/"wu"/"qu" drop both letters; record a
    // vit/It designation based on the vowel.
    {
        let cs: Vec<char> = clean.chars().collect();
        if cs.len() >= 2 {
            let two: String = cs[..2].iter().collect();
            if matches!(two.as_str(), "Yi" | "wu" | "qu") {
                let suffix = if two.ends_with('u') { "vit" } else { "It" };
                tags.push(Tag::named(format!("{}{}", cs[0], suffix)));
                clean = cs[2..].iter().collect();
            }
        }
    }

    // Step 7: if this is a pratyaya, a leading letter in
    // {z,c,j,Y,w,q,R} is dropped; unless it's a taddhita, a further
    // leading letter in {l,S} ∪ ku is also dropped.
    if opts.pratyaya {
        if let Some(first) = clean.chars().next() {
            if "zcjYwqR".contains(first) {
                tags.push(Tag::it(first));
                clean.remove(0);
            }
        }
        if !opts.taddhita {
            if let Some(first) = clean.chars().next() {
                let ls = sound_group("l S").expect("literal sound list");
                let ku = ku_varga();
                if ls.contains(first) || ku.contains(first) {
                    tags.push(Tag::it(first));
                    clean.remove(0);
                }
            }
        }
    }

    (clean, tags)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anta_parses_adit() {
        let t = Upadesha::parse("anta~", ParseOptions::default());
        assert_eq!(t.raw(), "anta~");
        assert_eq!(t.value(), "ant");
        assert_eq!(t.antya(), Some('t'));
        assert!(t.has_tag(&Tag::named("adit")));
    }

    #[test]
    fn kvasu_as_pratyaya_is_kit_and_udit() {
        let t = Upadesha::parse(
            "kvasu~",
            ParseOptions {
                pratyaya: true,
                ..Default::default()
            },
        );
        assert_eq!(t.value(), "vas");
        assert!(t.is_kit());
        assert!(t.has_tag(&Tag::named("udit")));
    }

    #[test]
    fn bhu_dhatu_has_no_it_letters() {
        let t = Upadesha::parse("BU", ParseOptions::default());
        assert_eq!(t.value(), "BU");
    }

    #[test]
    fn write_cascades_to_later_layers() {
        let t = Upadesha::parse("kf", ParseOptions::default());
        let t = t.write(Locus::Value, "kar");
        assert_eq!(t.value(), "kar");
        assert_eq!(t.asiddhavat(), "kar");
        assert_eq!(t.asiddha(), "kar");
        assert_eq!(t.clean(), "kf");
    }

    #[test]
    fn write_does_not_clobber_a_layer_that_already_diverged() {
        let t = Upadesha::parse("kf", ParseOptions::default());
        // asiddhavat writes first, establishing its own override...
        let t = t.write(Locus::Asiddhavat, "kf-asv");
        // ...so a later value-locus write cascades only as far as the
        // layer that hasn't diverged yet (asiddha), not past it.
        let t = t.write(Locus::Value, "kar");
        assert_eq!(t.value(), "kar");
        assert_eq!(t.asiddhavat(), "kf-asv");
        assert_eq!(t.asiddha(), "kf-asv");
    }

    #[test]
    fn raw_is_immutable_across_set_raw() {
        let t = Upadesha::parse("kf", ParseOptions::default());
        let t2 = t.set_raw("kar", ParseOptions::default());
        assert_eq!(t.raw(), "kf");
        assert_eq!(t2.raw(), "kar");
        assert!(t2.has_lakshana("kf"));
    }

    #[test]
    fn round_trip_parsing_does_not_double_strip() {
        let t1 = Upadesha::parse("tip", ParseOptions::default());
        let t2 = Upadesha::parse(
            t1.clean(),
            ParseOptions {
                vibhakti: true,
                ..Default::default()
            },
        );
        assert_eq!(t2.value(), t1.value());
    }
}
