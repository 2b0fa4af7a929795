//! The Dhātupāṭha: a read-only table of verbal roots, each row
//! `(gaṇa, index-within-gaṇa, raw)` (spec §3 "Dhātupāṭha", §6 "External
//! interfaces").
//!
//! The file format itself — plain CSV, `gana,index,raw` — is an
//! external contract the host satisfies (spec §6); `Dhatupatha::from_csv`
//! parses it into the read-only, process-wide table spec §5's
//! "shared-resource policy" describes. Full coverage of all ~2000
//! listed roots is out of scope (that's rule *content*, not engine
//! machinery; spec §1); the bundled `DHATUPATHA` constant carries four
//! roots spanning four different gaṇas, enough to drive a real
//! tiṅanta derivation end to end for each vikaraṇa-selection path, and
//! doubles as the default table when no CSV is supplied.

use crate::error::ConfigError;
use crate::tag::Tag;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DhatuEntry {
    pub gana: u8,
    pub index: u16,
    pub raw: &'static str,
    pub artha: &'static str,
}

pub const DHATUPATHA: &[DhatuEntry] = &[
    DhatuEntry {
        gana: 1,
        index: 1,
        raw: "BU",
        artha: "sattayam",
    },
    DhatuEntry {
        gana: 8,
        index: 10,
        raw: "qukf\\Y",
        artha: "karane",
    },
    DhatuEntry {
        gana: 5,
        index: 2,
        raw: "sta\\mBu~",
        artha: "praticabandane",
    },
    DhatuEntry {
        gana: 9,
        index: 1,
        raw: "qukrI\\Y",
        artha: "dravyavinimaye",
    },
];

pub fn by_gana(gana: u8) -> impl Iterator<Item = &'static DhatuEntry> {
    DHATUPATHA.iter().filter(move |d| d.gana == gana)
}

pub fn by_raw(raw: &str) -> Option<&'static DhatuEntry> {
    DHATUPATHA.iter().find(|d| d.raw == raw)
}

/// The set of Dhātupāṭha rows for any of `ganas`, the dual of
/// `gana_set`: a rule whose condition is "this dhātu belongs to one of
/// these gaṇas" looks it up this way, by gaṇa rather than by name.
pub fn dhatu_set(ganas: &[u8]) -> Vec<&'static DhatuEntry> {
    DHATUPATHA
        .iter()
        .filter(|d| ganas.contains(&d.gana))
        .collect()
}

/// The set of gaṇa numbers actually present among `raws`, the dual of
/// `dhatu_set`: given a handful of dhātu names, which gaṇas do they
/// span.
pub fn gana_set(raws: &[&str]) -> Vec<u8> {
    let mut ganas: Vec<u8> = DHATUPATHA
        .iter()
        .filter(|d| raws.contains(&d.raw))
        .map(|d| d.gana)
        .collect();
    ganas.sort_unstable();
    ganas.dedup();
    ganas
}

/// The vikaraṇa (class-sign) raw form for a gaṇa, as declared in the
/// Dhātupāṭha tradition (dhatu.py's per-gaṇa table). Only the four
/// gaṇas actually exercised by `DHATUPATHA` are covered; an unlisted
/// gaṇa has no vikaraṇa content registered here.
pub fn vikarana_for_gana(gana: u8) -> Option<&'static str> {
    match gana {
        1 => Some("Sap"),
        5 => Some("Snu"),
        8 => Some("Snu"),
        9 => Some("SnA"),
        _ => None,
    }
}

/// Tag a dhātu gets for gaṇa-indexed filter matching (`Filter::Gana`),
/// e.g. `"gana1"`.
pub fn gana_tag(gana: u8) -> Tag {
    Tag::named(format!("gana{gana}"))
}

/// One row of a host-supplied Dhātupāṭha, owned rather than `'static`
/// since it comes from a runtime-loaded CSV file rather than code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DhatuRow {
    pub gana: u8,
    pub index: u16,
    pub raw: String,
}

/// A full, host-loaded Dhātupāṭha table (spec §3, §6). Immutable after
/// construction; every query borrows from it rather than copying.
#[derive(Debug, Clone, Default)]
pub struct Dhatupatha {
    rows: Vec<DhatuRow>,
}

impl Dhatupatha {
    /// Parse a Dhātupāṭha from CSV text: one root per line, three
    /// comma-separated fields `gana,index,raw` (spec §6). Rows are kept
    /// in file order, since the traditional ordering the tradition
    /// calls "gaṇa then index" is exactly the file's own row order —
    /// this is what `range` walks.
    pub fn from_csv(contents: &str) -> Result<Self, ConfigError> {
        let mut rows = Vec::new();
        for (i, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split(',').collect();
            if fields.len() != 3 {
                return Err(ConfigError::MalformedDhatupathaRow {
                    line: i + 1,
                    reason: format!("expected 3 comma-separated fields, found {}", fields.len()),
                });
            }
            let gana: u8 = fields[0].trim().parse().map_err(|_| ConfigError::MalformedDhatupathaRow {
                line: i + 1,
                reason: format!("gana `{}` is not a number", fields[0]),
            })?;
            let index: u16 = fields[1].trim().parse().map_err(|_| ConfigError::MalformedDhatupathaRow {
                line: i + 1,
                reason: format!("index `{}` is not a number", fields[1]),
            })?;
            let raw = fields[2].trim().to_string();
            if raw.is_empty() {
                return Err(ConfigError::MalformedDhatupathaRow {
                    line: i + 1,
                    reason: "raw field is empty".to_string(),
                });
            }
            rows.push(DhatuRow { gana, index, raw });
        }
        Ok(Dhatupatha { rows })
    }

    /// The bundled four-root demonstration table (spec §9 supplement 4),
    /// for callers that don't supply their own CSV.
    pub fn bundled() -> Self {
        Dhatupatha {
            rows: DHATUPATHA
                .iter()
                .map(|e| DhatuRow {
                    gana: e.gana,
                    index: e.index,
                    raw: e.raw.to_string(),
                })
                .collect(),
        }
    }

    pub fn rows(&self) -> &[DhatuRow] {
        &self.rows
    }

    pub fn by_raw(&self, raw: &str) -> Option<&DhatuRow> {
        self.rows.iter().find(|r| r.raw == raw)
    }

    /// Every root from `start` up to and including `end`, or — when
    /// `end` is `None` — up to the end of `start`'s own gaṇa (spec §3:
    /// "range queries returning every root from a start root up to
    /// (and including) an end root, or to the end of its gaṇa").
    /// Empty if `start` isn't found.
    pub fn range(&self, start: &str, end: Option<&str>) -> &[DhatuRow] {
        let Some(start_idx) = self.rows.iter().position(|r| r.raw == start) else {
            return &[];
        };
        let end_idx = match end {
            Some(end_raw) => match self.rows.iter().position(|r| r.raw == end_raw) {
                Some(i) if i >= start_idx => i + 1,
                _ => return &[],
            },
            None => {
                let gana = self.rows[start_idx].gana;
                self.rows[start_idx..]
                    .iter()
                    .position(|r| r.gana != gana)
                    .map(|offset| start_idx + offset)
                    .unwrap_or(self.rows.len())
            }
        };
        &self.rows[start_idx..end_idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_demo_root_has_a_vikarana() {
        for entry in DHATUPATHA {
            assert!(
                vikarana_for_gana(entry.gana).is_some(),
                "no vikarana registered for gana {} ({})",
                entry.gana,
                entry.raw
            );
        }
    }

    #[test]
    fn dhatu_set_and_gana_set_are_duals() {
        let ganas = gana_set(&["BU", "qukf\\Y"]);
        assert_eq!(ganas, vec![1, 8]);
        let roots = dhatu_set(&ganas);
        assert_eq!(roots.len(), 2);
    }

    #[test]
    fn by_raw_finds_krI() {
        let krI = by_raw("qukrI\\Y").unwrap();
        assert_eq!(krI.gana, 9);
    }

    #[test]
    fn csv_parses_rows_in_file_order() {
        let csv = "1,1,BU\n1,2,eDa~\n2,1,asa~\n";
        let table = Dhatupatha::from_csv(csv).unwrap();
        assert_eq!(table.rows().len(), 3);
        assert_eq!(table.rows()[1].raw, "eDa~");
    }

    #[test]
    fn range_to_end_of_gana_stops_before_next_gana() {
        let csv = "1,1,BU\n1,2,eDa~\n2,1,asa~\n";
        let table = Dhatupatha::from_csv(csv).unwrap();
        let slice = table.range("BU", None);
        assert_eq!(slice.len(), 2);
        assert_eq!(slice[1].raw, "eDa~");
    }

    #[test]
    fn range_to_explicit_end_is_inclusive() {
        let csv = "1,1,BU\n1,2,eDa~\n1,3,divu~\n";
        let table = Dhatupatha::from_csv(csv).unwrap();
        let slice = table.range("BU", Some("divu~"));
        assert_eq!(slice.len(), 3);
    }

    #[test]
    fn malformed_row_is_reported_with_its_line_number() {
        let csv = "1,1,BU\nnotanumber,2,eDa~\n";
        let err = Dhatupatha::from_csv(csv).unwrap_err();
        match err {
            ConfigError::MalformedDhatupathaRow { line, .. } => assert_eq!(line, 2),
            _ => panic!("expected MalformedDhatupathaRow"),
        }
    }
}
