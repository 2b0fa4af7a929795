//! The tiṅ pratyayas: personal endings for a finite verb, keyed by
//! puruṣa (person), vacana (number), and pada (voice).
//!
//! Only the parasmaipada sārvadhātuka row used by lakāra लट् (the
//! present indicative) is carried here — a demo slice, not the full
//! tiṅ paradigm (that's rule *content*, in scope only as far as it
//! drives the four gaṇas `dhatupatha` already covers).

use crate::tag::Tag;
use crate::term::{ParseOptions, Upadesha};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Purusha {
    Prathama,
    Madhyama,
    Uttama,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vacana {
    Eka,
    Dvi,
    Bahu,
}

pub struct TinEntry {
    pub raw: &'static str,
    pub purusha: Purusha,
    pub vacana: Vacana,
}

/// लट् परस्मैपद, सार्वधातुक: तिप् तस् झि / सिप् थस् थ / मिप् वस् मस्.
pub const LAT_PARASMAIPADA: &[TinEntry] = &[
    TinEntry {
        raw: "tip",
        purusha: Purusha::Prathama,
        vacana: Vacana::Eka,
    },
    TinEntry {
        raw: "tas",
        purusha: Purusha::Prathama,
        vacana: Vacana::Dvi,
    },
    TinEntry {
        raw: "Ji",
        purusha: Purusha::Prathama,
        vacana: Vacana::Bahu,
    },
    TinEntry {
        raw: "sip",
        purusha: Purusha::Madhyama,
        vacana: Vacana::Eka,
    },
    TinEntry {
        raw: "Tas",
        purusha: Purusha::Madhyama,
        vacana: Vacana::Dvi,
    },
    TinEntry {
        raw: "Ta",
        purusha: Purusha::Madhyama,
        vacana: Vacana::Bahu,
    },
    TinEntry {
        raw: "mip",
        purusha: Purusha::Uttama,
        vacana: Vacana::Eka,
    },
    TinEntry {
        raw: "vas",
        purusha: Purusha::Uttama,
        vacana: Vacana::Dvi,
    },
    TinEntry {
        raw: "mas",
        purusha: Purusha::Uttama,
        vacana: Vacana::Bahu,
    },
];

pub fn entry(purusha: Purusha, vacana: Vacana) -> Option<&'static TinEntry> {
    LAT_PARASMAIPADA
        .iter()
        .find(|e| e.purusha == purusha && e.vacana == vacana)
}

/// Build the tiṅ term for a paradigm cell: parsed with `vibhakti: true`
/// (1.3.4 keeps a trailing tu/s/m), tagged `Tin`, `Sarvadhatuka`, and
/// `Parasmaipada` — the pada is a lexical property of which ending was
/// picked, not something a rule derives from the dhātu.
pub fn build(purusha: Purusha, vacana: Vacana) -> Option<Upadesha> {
    let e = entry(purusha, vacana)?;
    let opts = ParseOptions {
        vibhakti: true,
        ..Default::default()
    };
    Some(
        Upadesha::parse(e.raw, opts)
            .add_tag(Tag::Tin)
            .add_tag(Tag::Sarvadhatuka)
            .add_tag(Tag::Parasmaipada),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tip_keeps_no_trailing_consonant_p_is_stripped() {
        let t = build(Purusha::Prathama, Vacana::Eka).unwrap();
        assert_eq!(t.value(), "ti");
        assert!(t.has_tag(&Tag::Parasmaipada));
    }

    #[test]
    fn tas_keeps_its_trailing_s_per_tusma() {
        let t = build(Purusha::Prathama, Vacana::Dvi).unwrap();
        assert_eq!(t.value(), "tas");
    }
}
