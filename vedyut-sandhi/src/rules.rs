//! Boundary-level sandhi rules (6.1.66, 6.1.77, 6.1.78, 6.1.87, 6.1.88,
//! 6.1.97, 6.1.101), ported from the cascading if/elif dispatch in the
//! original `sandhi.py`: at every adjacent sound pair `(x, y)`, `ac_sandhi`
//! fires when `x` is a vowel and `hal_sandhi` when `x` is a consonant, each
//! trying its rules in a fixed priority order and stopping at the first
//! match.
//!
//! This crate doesn't depend on `vedyut-prakriya`'s sound model (the
//! dependency runs the other way), so it carries its own minimal, literal
//! sound-group constants rather than re-deriving them from the Māheśvara
//! Sūtras — see DESIGN.md.

const IK: &[char] = &['i', 'I', 'u', 'U', 'f', 'F', 'x', 'X'];
const EC: &[char] = &['e', 'E', 'o', 'O'];
const EN: &[char] = &['e', 'o'];
const AC: &[char] = &[
    'a', 'A', 'i', 'I', 'u', 'U', 'f', 'F', 'x', 'X', 'e', 'E', 'o', 'O',
];

fn is_ac(c: char) -> bool {
    AC.contains(&c)
}

/// *savarṇa*: same articulatory place and nasality, ignoring vowel
/// length. Enough of the place/length facts from
/// `vedyut-prakriya::sounds::Features` to decide 6.1.101 at a boundary,
/// without pulling in that crate.
fn savarna(a: char, b: char) -> bool {
    fn place(c: char) -> Option<u8> {
        Some(match c {
            'a' | 'A' => 0,
            'i' | 'I' => 1,
            'u' | 'U' => 2,
            'f' | 'F' => 3,
            'x' | 'X' => 4,
            _ => return None,
        })
    }
    place(a).is_some() && place(a) == place(b)
}

fn dirgha(c: char) -> char {
    match c {
        'a' => 'A',
        'i' => 'I',
        'u' => 'U',
        'f' => 'F',
        'x' => 'X',
        _ => c,
    }
}

fn guna(c: char) -> String {
    match c {
        'i' | 'I' => "e".to_string(),
        'u' | 'U' => "o".to_string(),
        'f' | 'F' => "ar".to_string(),
        'x' | 'X' => "al".to_string(),
        other => other.to_string(),
    }
}

fn vrddhi(c: char) -> String {
    match c {
        'e' | 'E' => "E".to_string(),
        'o' | 'O' => "O".to_string(),
        other => other.to_string(),
    }
}

/// 6.1.77 iko yaṇ aci: replace an *ik* vowel with its semivowel.
fn yan(c: char) -> char {
    match c {
        'i' | 'I' => 'y',
        'u' | 'U' => 'v',
        'f' | 'F' => 'r',
        'x' | 'X' => 'l',
        other => other,
    }
}

/// Apply 6.1.97, 6.1.101, 6.1.77, 6.1.78, 6.1.87/6.1.88 in that order to
/// the single-sound pair `(x, y)`, stopping at the first rule whose
/// condition holds. `x` is assumed to be a vowel; callers dispatch on
/// that before calling this.
pub fn ac_sandhi(x: char, y: char) -> (String, String) {
    // 6.1.97 ato guṇe: "a" followed by a guṇa vowel (e, o) is simply
    // absorbed into it.
    if x == 'a' && EN.contains(&y) {
        return (String::new(), y.to_string());
    }
    // 6.1.101 akaḥ savarṇe dīrghaḥ
    if savarna(x, y) {
        return (String::new(), dirgha(y).to_string());
    }
    // 6.1.77 iko yaṇ aci
    if IK.contains(&x) && is_ac(y) {
        return (yan(x).to_string(), y.to_string());
    }
    // 6.1.78 eco 'yavāyāvaḥ
    if EC.contains(&x) && is_ac(y) {
        let replacement = match x {
            'e' => "ay",
            'E' => "Ay",
            'o' => "av",
            'O' => "Av",
            _ => unreachable!(),
        };
        return (replacement.to_string(), y.to_string());
    }
    // 6.1.87 ād guṇaḥ / 6.1.88 vṛddhir eci
    if (x == 'a' || x == 'A') && (IK.contains(&y) || EC.contains(&y)) {
        let replaced = if EC.contains(&y) { vrddhi(y) } else { guna(y) };
        return (String::new(), replaced);
    }
    (x.to_string(), y.to_string())
}

/// 6.1.66 lopo vyor vali: "v"/"y" elides before any consonant.
pub fn hal_sandhi(x: char, y: char) -> (String, String) {
    if (x == 'v' || x == 'y') && !is_ac(y) {
        return (String::new(), y.to_string());
    }
    (x.to_string(), y.to_string())
}

/// Resolve the boundary between the last sound of `left` and the first
/// sound of `right`, returning the rewritten edges of each. Pass-through
/// (no rule fires, or either side is empty) leaves both unchanged.
pub fn sandhi_pair(left: &str, right: &str) -> (String, String) {
    let (Some(x), Some(y)) = (left.chars().last(), right.chars().next()) else {
        return (left.to_string(), right.to_string());
    };
    let (new_x, new_y) = if is_ac(x) {
        ac_sandhi(x, y)
    } else {
        hal_sandhi(x, y)
    };
    let mut new_left: String = left.chars().take(left.chars().count() - 1).collect();
    new_left.push_str(&new_x);
    let mut new_right = new_y;
    new_right.push_str(&right.chars().skip(1).collect::<String>());
    (new_left, new_right)
}

/// Apply `sandhi_pair` at every term boundary, left to right: term *i*'s
/// rewritten right edge feeds into term *i+1* before that boundary is
/// examined. This mirrors `sandhi.py`'s single forward traversal, scoped
/// to term boundaries rather than every adjacent sound in the state — the
/// main derivation's own operators (guṇa, vṛddhi, ...) already settle
/// intra-term sound pairs, so only the seams between upadeśas are still
/// open (see DESIGN.md).
pub fn sandhi_over_terms(values: &[String]) -> Vec<String> {
    if values.len() < 2 {
        return values.to_vec();
    }
    let mut terms = values.to_vec();
    for i in 0..terms.len() - 1 {
        let (new_left, new_right) = sandhi_pair(&terms[i], &terms[i + 1]);
        terms[i] = new_left;
        terms[i + 1] = new_right;
    }
    terms
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ato_gune_absorbs_a_into_a_following_guna_vowel() {
        assert_eq!(ac_sandhi('a', 'o'), ("".to_string(), "o".to_string()));
    }

    #[test]
    fn savarna_dirgha_lengthens_the_second_vowel() {
        assert_eq!(ac_sandhi('a', 'a'), ("".to_string(), "A".to_string()));
        assert_eq!(ac_sandhi('i', 'I'), ("".to_string(), "I".to_string()));
    }

    #[test]
    fn iko_yan_aci_replaces_with_the_semivowel() {
        assert_eq!(ac_sandhi('i', 'a'), ("y".to_string(), "a".to_string()));
        assert_eq!(ac_sandhi('u', 'a'), ("v".to_string(), "a".to_string()));
    }

    #[test]
    fn ecoyavayavah_splits_e_into_ay() {
        assert_eq!(ac_sandhi('e', 'a'), ("ay".to_string(), "a".to_string()));
        assert_eq!(ac_sandhi('o', 'a'), ("av".to_string(), "a".to_string()));
    }

    #[test]
    fn a_before_ik_gunas_a_before_ec_vrddhis() {
        assert_eq!(ac_sandhi('a', 'i'), ("".to_string(), "e".to_string()));
        assert_eq!(ac_sandhi('a', 'e'), ("".to_string(), "E".to_string()));
    }

    #[test]
    fn lopo_vyor_vali_elides_v_and_y_before_a_consonant() {
        assert_eq!(hal_sandhi('v', 'k'), ("".to_string(), "k".to_string()));
        assert_eq!(hal_sandhi('y', 't'), ("".to_string(), "t".to_string()));
        assert_eq!(hal_sandhi('k', 't'), ("k".to_string(), "t".to_string()));
    }

    #[test]
    fn sandhi_over_terms_rewrites_every_boundary_left_to_right() {
        let terms = vec!["Bo".to_string(), "a".to_string(), "ti".to_string()];
        let result = sandhi_over_terms(&terms);
        assert_eq!(result.concat(), "Bavati");
    }

    #[test]
    fn short_terms_pass_through_untouched() {
        let terms = vec!["BU".to_string()];
        assert_eq!(sandhi_over_terms(&terms), terms);
    }
}
