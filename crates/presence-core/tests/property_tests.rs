//! Property-based tests for presence-core
//!
//! Covers the distance laws, perimeter containment and the QR codec.

use chrono::{Duration, TimeZone, Utc};
use presence_core::qr::{DEFAULT_LAST_NAME, TOKEN_VALIDITY_MINUTES};
use presence_core::{
    decode_scan_at, decode_simple, distance, encode_rich_at, encode_simple, is_within_perimeter,
    validate_rich_at, DecodeError, GeoPoint, PerimeterConfig, ValidationError,
};
use proptest::prelude::*;

// ============================================================
// Strategies
// ============================================================

fn geo_point() -> impl Strategy<Value = GeoPoint> {
    (-90.0f64..=90.0, -180.0f64..=180.0).prop_map(|(lat, lon)| GeoPoint::new(lat, lon).unwrap())
}

/// Points within roughly 2 km of the default center
fn nearby_point() -> impl Strategy<Value = GeoPoint> {
    (-0.02f64..0.02, -0.02f64..0.02).prop_map(|(dlat, dlon)| {
        GeoPoint::new(6.1833023 + dlat, 1.1467070 + dlon).unwrap()
    })
}

/// Field values without the delimiter
fn field() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 éèçà'-]{0,20}"
}

fn registration_number() -> impl Strategy<Value = String> {
    "[A-Z0-9]{1,12}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // ============================================================
    // Distance
    // ============================================================

    #[test]
    fn distance_to_self_is_zero(p in geo_point()) {
        prop_assert_eq!(distance(&p, &p), 0.0);
    }

    #[test]
    fn distance_is_symmetric(a in geo_point(), b in geo_point()) {
        let ab = distance(&a, &b);
        let ba = distance(&b, &a);
        prop_assert!((ab - ba).abs() < 1e-6, "{} vs {}", ab, ba);
    }

    #[test]
    fn distance_is_bounded_by_half_circumference(a in geo_point(), b in geo_point()) {
        let d = distance(&a, &b);
        prop_assert!(d >= 0.0);
        prop_assert!(d <= presence_core::EARTH_RADIUS_METERS * std::f64::consts::PI + 1e-6);
    }

    // ============================================================
    // Perimeter
    // ============================================================

    #[test]
    fn containment_matches_circumscribed_circle(
        p in nearby_point(),
        side in 1.0f64..2_000.0
    ) {
        let config = PerimeterConfig { side_length: side, ..PerimeterConfig::default() };
        let expected = distance(&p, &config.center) <= (side / 2.0) * 2f64.sqrt();
        prop_assert_eq!(is_within_perimeter(&p, &config), expected);
    }

    #[test]
    fn disabled_perimeter_accepts_everything(p in geo_point(), side in 0.1f64..500.0) {
        let config = PerimeterConfig {
            side_length: side,
            enabled: false,
            ..PerimeterConfig::default()
        };
        prop_assert!(is_within_perimeter(&p, &config));
    }

    // ============================================================
    // Simple QR tokens
    // ============================================================

    #[test]
    fn simple_token_round_trips(r in registration_number(), l in field(), f in field()) {
        let decoded = decode_simple(&encode_simple(&r, &l, &f)).unwrap();
        prop_assert_eq!(decoded.registration_number, r);
        prop_assert_eq!(decoded.last_name, l);
        prop_assert_eq!(decoded.first_name, f);
    }

    #[test]
    fn foreign_tags_are_rejected(tag in "[A-Za-z]{1,6}", rest in field()) {
        prop_assume!(tag != "EMP");
        let text = format!("{}:{}", tag, rest);
        prop_assert_eq!(decode_simple(&text), Err(DecodeError::BadTag));
    }

    // ============================================================
    // Rich QR payloads
    // ============================================================

    #[test]
    fn rich_payload_freshness(id in 1i64..100_000, r in registration_number(), age_secs in 0i64..900) {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap();
        let text = encode_rich_at(id, &r, now - Duration::seconds(age_secs));
        let result = validate_rich_at(&text, now);
        if age_secs <= TOKEN_VALIDITY_MINUTES * 60 {
            let payload = result.unwrap();
            prop_assert_eq!(payload.registration_number, r);
        } else {
            let is_expired = matches!(result, Err(ValidationError::Expired { .. }));
            prop_assert!(is_expired);
        }
    }

    #[test]
    fn non_json_is_parse_error(text in "[A-Za-z:]{1,30}") {
        prop_assume!(serde_json::from_str::<serde_json::Value>(&text).is_err());
        prop_assert_eq!(validate_rich_at(&text, Utc::now()), Err(ValidationError::Parse));
    }
}

// ============================================================
// Fixed scenarios
// ============================================================

#[test]
fn registration_only_token_uses_defaults() {
    let identity = decode_simple("EMP:X").unwrap();
    assert_eq!(identity.registration_number, "X");
    assert_eq!(identity.last_name, DEFAULT_LAST_NAME);
    assert_eq!(identity.first_name, "");
}

#[test]
fn four_and_six_minute_old_payloads() {
    let now = Utc::now();
    let fresh = encode_rich_at(1i64, "M1", now - Duration::minutes(4));
    let stale = encode_rich_at(1i64, "M1", now - Duration::minutes(6));
    assert!(validate_rich_at(&fresh, now).is_ok());
    assert_eq!(
        validate_rich_at(&stale, now),
        Err(ValidationError::Expired { age_minutes: 6 })
    );
}

#[test]
fn missing_registration_number_is_reported() {
    let text = format!(
        r#"{{"employeeId": 1, "timestamp": "{}", "type": "employee_qr", "version": "1.0"}}"#,
        Utc::now().to_rfc3339()
    );
    assert_eq!(
        validate_rich_at(&text, Utc::now()),
        Err(ValidationError::MissingField("registrationNumber"))
    );
}

#[test]
fn unified_decoder_keeps_both_contracts() {
    let now = Utc::now();
    assert!(decode_scan_at("EMP:M9:Doe:Jo", now).is_ok());
    assert!(decode_scan_at(&encode_rich_at(9i64, "M9", now), now).is_ok());
    assert!(decode_scan_at("FOO:M9", now).is_err());
}
