//! French spelling of non-negative integers.
//!
//! The output follows the conventions the verse texts use, including their
//! irregular spots: no plural on `cent`/`vingt`/scale words, `-et-` only for
//! the unit 1 outside the 80 and 90 families, 70 and 90 built on 60 and 80
//! plus the teens, and a bare `mille` for one thousand.

/// Words for 0..=19, indexed by value.
const UNITS: [&str; 20] = [
    "zéro",
    "un",
    "deux",
    "trois",
    "quatre",
    "cinq",
    "six",
    "sept",
    "huit",
    "neuf",
    "dix",
    "onze",
    "douze",
    "treize",
    "quatorze",
    "quinze",
    "seize",
    "dix-sept",
    "dix-huit",
    "dix-neuf",
];

/// Tens words indexed by the tens digit (index 0 unused).
const TENS: [&str; 10] = [
    "",
    "dix",
    "vingt",
    "trente",
    "quarante",
    "cinquante",
    "soixante",
    "soixante-dix",
    "quatre-vingt",
    "quatre-vingt-dix",
];

const HUNDRED: &str = "cent";

/// Scale word for each group of three digits (index 0 is the units group).
const SCALES: [&str; 7] = ["", "mille", "million", "milliard", "billion", "billiard", "trillion"];

/// Every word a spelled number can be built from, as far as overlap checks
/// are concerned. A number-range match touching one of these across a space
/// or hyphen belongs to a larger number.
pub const NUMBER_FRAGMENTS: &[&str] = &[
    "dix",
    "cent",
    "mille",
    "million",
    "milliard",
    "billion",
    "billiard",
    "trillion",
    "zéro",
    "un",
    "deux",
    "trois",
    "quatre",
    "cinq",
    "six",
    "sept",
    "huit",
    "neuf",
    "onze",
    "douze",
    "treize",
    "quatorze",
    "quinze",
    "seize",
    "vingt",
    "trente",
    "quarante",
    "cinquante",
    "soixante",
];

/// Spell `n` in words.
///
/// ```
/// assert_eq!(versefind::spell(21), "vingt-et-un");
/// assert_eq!(versefind::spell(1999), "mille neuf cent quatre-vingt-dix-neuf");
/// ```
pub fn spell(n: u64) -> String {
    if n == 0 {
        return UNITS[0].to_string();
    }

    // Groups are collected lowest order first, then joined highest first.
    let mut groups: Vec<String> = Vec::new();
    let mut rest = n;
    let mut scale = 0usize;
    while rest > 0 {
        let group = (rest % 1000) as usize;
        if group > 0 {
            let mut part = if scale == 1 && group == 1 { String::new() } else { spell_below_thousand(group) };
            if scale > 0 {
                if !part.is_empty() {
                    part.push(' ');
                }
                part.push_str(SCALES[scale]);
            }
            groups.push(part);
        }
        rest /= 1000;
        scale += 1;
    }

    groups.reverse();
    groups.join(" ")
}

/// Spell 1..=999. Zero yields an empty string; callers skip empty groups.
fn spell_below_thousand(n: usize) -> String {
    debug_assert!(n < 1000);
    let mut out = String::new();

    let hundreds = n / 100;
    if hundreds > 0 {
        if hundreds > 1 {
            out.push_str(UNITS[hundreds]);
            out.push(' ');
        }
        out.push_str(HUNDRED);
    }

    let rest = n % 100;
    if rest == 0 {
        return out;
    }
    if !out.is_empty() {
        out.push(' ');
    }
    if rest < 20 {
        out.push_str(UNITS[rest]);
        return out;
    }

    let tens = rest / 10;
    let mut unit = rest % 10;
    // 71..79 and 91..99 reuse the teens on top of 60 and 80.
    let tens_word = if matches!(tens, 7 | 9) && unit > 0 {
        unit += 10;
        TENS[tens - 1]
    } else {
        TENS[tens]
    };
    out.push_str(tens_word);

    if unit > 0 {
        if !matches!(tens, 8 | 9) && unit % 10 == 1 {
            out.push_str("-et");
        }
        out.push('-');
        out.push_str(UNITS[unit]);
    }
    out
}
