//! Station name normalization and plausibility checks

use crate::app::models::is_blank;
use crate::constants::{NON_STATION_WORDS, STATION_SUFFIX};
use regex::Regex;
use std::sync::LazyLock;

/// Parenthesised annotations such as "(JR)" or "（横浜市営地下鉄）"
static ANNOTATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(.*?\)|（.*?）").expect("annotation pattern is valid"));

/// Station name without annotations and without the trailing suffix
pub fn station_base(name: &str) -> String {
    let stripped = ANNOTATION.replace_all(name.trim(), "");
    let stripped = stripped.trim();
    stripped
        .strip_suffix(STATION_SUFFIX)
        .unwrap_or(stripped)
        .trim()
        .to_string()
}

/// Normalize a station name so it ends in the station suffix
///
/// "新羽" becomes "新羽駅", "菊名駅(東急)" becomes "菊名駅" and anything after
/// the first suffix is dropped.
pub fn normalize_station_name(name: &str) -> String {
    let base = station_base(name);
    if base.is_empty() {
        return String::new();
    }
    match base.find(STATION_SUFFIX) {
        Some(pos) => format!("{}{}", &base[..pos], STATION_SUFFIX),
        None => format!("{}{}", base, STATION_SUFFIX),
    }
}

/// Reading for a station name: its base with katakana turned into hiragana
///
/// "センター北駅" becomes "せんたー北". Kanji are left as they are.
pub fn station_kana(name: &str) -> String {
    to_hiragana(&station_base(name))
}

/// Map the katakana block (ァ to ヶ) onto hiragana
pub fn to_hiragana(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{30A1}'..='\u{30F6}' => char::from_u32(c as u32 - 0x60).unwrap_or(c),
            _ => c,
        })
        .collect()
}

/// True for blank names and names that denote something other than a station
pub fn is_bad_station_name(name: &str) -> bool {
    let name = name.trim();
    name.is_empty() || NON_STATION_WORDS.iter().any(|w| name.contains(w))
}

/// True when the station/walk pair of a record needs fixing
pub fn needs_station_fix(station: &str, walk_minutes: &str) -> bool {
    is_blank(station)
        || is_blank(walk_minutes)
        || is_bad_station_name(station)
        || !station.contains(STATION_SUFFIX)
}
