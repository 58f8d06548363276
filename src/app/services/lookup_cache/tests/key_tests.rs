//! Tests for key derivation

use crate::app::models::MasterRecord;
use crate::app::services::lookup_cache::{LookupKey, normalize_text};

#[test]
fn test_normalize_text() {
    assert_eq!(normalize_text("  さくら\u{3000}保育園\t 東 "), "さくら 保育園 東");
    assert_eq!(normalize_text(""), "");
}

#[test]
fn test_key_ignores_address_and_spacing() {
    let mut record = MasterRecord::new("1");
    record.name = "さくら　保育園".to_string();
    record.ward = "港北区".to_string();
    let before = LookupKey::for_record(&record, "横浜市", "").unwrap();

    record.name = " さくら 保育園 ".to_string();
    record.address = "横浜市港北区菊名1-1".to_string();
    let after = LookupKey::for_record(&record, "横浜市", "").unwrap();

    assert_eq!(before.key, after.key);
    assert_eq!(before.key, "横浜市|港北区|さくら 保育園");
    assert_eq!(before.query, "さくら 保育園 横浜市港北区");
    assert_eq!(after.query, "さくら 保育園 横浜市港北区菊名1-1");
}

#[test]
fn test_key_uses_ward_fallback_and_needs_name() {
    let mut record = MasterRecord::new("1");
    assert!(LookupKey::for_record(&record, "横浜市", "港北区").is_none());

    record.name = "さくら".to_string();
    let key = LookupKey::for_record(&record, "横浜市", "鶴見区").unwrap();
    assert_eq!(key.key, "横浜市|鶴見区|さくら");
}
