//! Tests for station name handling

use crate::app::services::places::station::{station_base, to_hiragana};
use crate::app::services::places::{
    is_bad_station_name, needs_station_fix, normalize_station_name, station_kana,
};

#[test]
fn test_station_base() {
    assert_eq!(station_base(" 菊名駅 "), "菊名");
    assert_eq!(station_base("新横浜駅（JR東海）"), "新横浜");
    assert_eq!(station_base("日吉(東急)"), "日吉");
}

#[test]
fn test_annotation_stripping_is_lazy_per_group() {
    assert_eq!(station_base("(JR)新横浜(新幹線)駅"), "新横浜");
    assert_eq!(station_base("（旧）綱島"), "綱島");
    assert_eq!(station_base("小机"), "小机");
}

#[test]
fn test_station_kana() {
    assert_eq!(to_hiragana("コヅクエ"), "こづくえ");
    assert_eq!(to_hiragana("ヴァ"), "ゔぁ");
    assert_eq!(station_kana("センター北駅"), "せんたー北");
    assert_eq!(station_kana("みなとみらい駅(みなとみらい線)"), "みなとみらい");
    assert_eq!(station_kana("菊名駅"), "菊名");
}

#[test]
fn test_normalize_station_name() {
    assert_eq!(normalize_station_name("新羽"), "新羽駅");
    assert_eq!(normalize_station_name("菊名駅"), "菊名駅");
    assert_eq!(normalize_station_name("菊名駅(東急東横線)"), "菊名駅");
    assert_eq!(normalize_station_name("綱島駅東口"), "綱島駅");
    assert_eq!(normalize_station_name("  "), "");
}

#[test]
fn test_bad_station_names() {
    assert!(is_bad_station_name(""));
    assert!(is_bad_station_name("菊名駅入口"));
    assert!(is_bad_station_name("港北区役所"));
    assert!(is_bad_station_name("大倉山公園"));
    assert!(!is_bad_station_name("大倉山駅"));
}

#[test]
fn test_needs_station_fix() {
    assert!(needs_station_fix("", "5"));
    assert!(needs_station_fix("菊名駅", ""));
    assert!(needs_station_fix("菊名", "5"));
    assert!(needs_station_fix("菊名駅前バス", "5"));
    assert!(!needs_station_fix("菊名駅", "5"));
}
