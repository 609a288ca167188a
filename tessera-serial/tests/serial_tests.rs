use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use tessera_serial::{
    compose, day_ordinal, encode_text, fields_match, is_well_formed, Error, ExpectedFields,
    SerialRequest, SerialType, TRIAL_MARKER,
};

const MAC: &str = "AA:BB:CC:DD:EE:FF";
const DRIVE_SERIAL: &str = "1C6F654E33B0";

fn request(serial_type: SerialType) -> SerialRequest<'static> {
    SerialRequest {
        license: "ACME",
        mac_address: MAC,
        app_code: "APP",
        module_code: "MOD",
        serial_type,
        expiration: NaiveDate::from_ymd_opt(2030, 6, 15),
        pen_drive_serial: DRIVE_SERIAL,
    }
}

fn expected(today: NaiveDate) -> ExpectedFields<'static> {
    ExpectedFields {
        license: "ACME",
        mac_address: MAC,
        today,
        pen_drive_serial: Some(DRIVE_SERIAL),
    }
}

fn all_flag_sets() -> Vec<SerialType> {
    let flags = [
        SerialType::MAC_ADDRESS,
        SerialType::LICENSE_NAME,
        SerialType::EXPIRATION_DATE,
        SerialType::PEN_DRIVE,
        SerialType::TRIAL,
    ];
    (0u32..32)
        .map(|bits| {
            flags
                .iter()
                .enumerate()
                .filter(|(i, _)| bits & (1 << i) != 0)
                .fold(SerialType::NAME_ONLY, |acc, (_, f)| acc | *f)
        })
        .collect()
}

// ── SerialType ───────────────────────────────────────────────────

#[test]
fn flag_predicates() {
    let st = SerialType::LICENSE_NAME | SerialType::TRIAL;
    assert!(st.has_license_name());
    assert!(st.has_trial());
    assert!(!st.has_mac_address());
    assert!(!st.has_expiration_date());
    assert!(!st.has_pen_drive());
    assert_eq!(st.field_count(), 2);
    assert_eq!(SerialType::NAME_ONLY.field_count(), 0);
}

#[test]
fn parse_symbolic_names() {
    assert_eq!(
        SerialType::parse("MAC_ADDRESS, TRIAL").unwrap(),
        SerialType::MAC_ADDRESS | SerialType::TRIAL
    );
    assert_eq!(
        SerialType::parse("NAME_ONLY").unwrap(),
        SerialType::NAME_ONLY
    );
    assert_eq!(
        SerialType::parse("EXPIRATION_DATE").unwrap(),
        SerialType::EXPIRATION_DATE
    );
}

#[test]
fn parse_unknown_name_is_an_error() {
    assert_eq!(
        SerialType::parse("SITE_LICENSE"),
        Err(Error::UnknownFlag("SITE_LICENSE".to_string()))
    );
}

#[test]
fn display_round_trips_through_parse() {
    for st in all_flag_sets() {
        assert_eq!(SerialType::parse(&st.to_string()).unwrap(), st);
    }
}

// ── compose ──────────────────────────────────────────────────────

#[test]
fn compose_name_only_has_two_parts() {
    let serial = compose(&request(SerialType::NAME_ONLY)).unwrap();
    assert_eq!(serial.split('-').count(), 2);
}

#[test]
fn compose_part_count_tracks_flags() {
    for st in all_flag_sets() {
        let serial = compose(&request(st)).unwrap();
        assert_eq!(serial.split('-').count(), 2 + st.field_count());
    }
}

#[test]
fn compose_first_field_hashes_app_and_module_code() {
    let serial = compose(&request(SerialType::TRIAL)).unwrap();
    assert_eq!(serial.split('-').next().unwrap(), encode_text("APPMOD"));
}

#[test]
fn compose_trial_field_is_the_marker_hash() {
    let serial = compose(&request(SerialType::TRIAL)).unwrap();
    let parts: Vec<&str> = serial.split('-').collect();
    assert_eq!(parts[1], encode_text(TRIAL_MARKER));
}

#[test]
fn compose_is_insensitive_to_flag_declaration_order() {
    let a = compose(&request(SerialType::MAC_ADDRESS | SerialType::EXPIRATION_DATE)).unwrap();
    let b = compose(&request(SerialType::EXPIRATION_DATE | SerialType::MAC_ADDRESS)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn compose_expiration_flag_requires_a_date() {
    let mut req = request(SerialType::EXPIRATION_DATE);
    req.expiration = None;
    assert_eq!(compose(&req), Err(Error::MissingExpiration));
}

// ── is_well_formed ───────────────────────────────────────────────

#[test]
fn composed_serials_are_always_well_formed() {
    for st in all_flag_sets() {
        let serial = compose(&request(st)).unwrap();
        assert!(
            is_well_formed(&serial, "APP", "MOD"),
            "flags {st}: {serial}"
        );
    }
}

#[test]
fn well_formed_fails_for_wrong_module_code() {
    let serial = compose(&request(SerialType::LICENSE_NAME)).unwrap();
    assert!(!is_well_formed(&serial, "APP", "XYZ"));
    assert!(!is_well_formed(&serial, "OTHER", "MOD"));
}

#[test]
fn well_formed_fails_on_garbage() {
    assert!(!is_well_formed("", "APP", "MOD"));
    assert!(!is_well_formed("AAAA", "APP", "MOD"));
    assert!(!is_well_formed("not-a-serial", "APP", "MOD"));
}

#[test]
fn tampered_checksum_is_detected() {
    let serial = compose(&request(SerialType::LICENSE_NAME | SerialType::TRIAL)).unwrap();
    let tampered = flip_last_char(&serial);
    assert!(!is_well_formed(&tampered, "APP", "MOD"));
}

#[test]
fn tampered_body_field_is_detected() {
    let serial = compose(&request(SerialType::LICENSE_NAME)).unwrap();
    let parts: Vec<&str> = serial.split('-').collect();
    // Flip the last character of the license field; the checksum no longer
    // matches. Best-effort detection: the hash is weak by design, but a
    // trailing-character flip always changes the accumulated value.
    let tampered_field = flip_last_char(parts[1]);
    let tampered = format!("{}-{}-{}", parts[0], tampered_field, parts[2]);
    assert!(!is_well_formed(&tampered, "APP", "MOD"));
}

fn flip_last_char(s: &str) -> String {
    let mut chars: Vec<char> = s.chars().collect();
    let last = chars.last_mut().expect("non-empty");
    *last = if *last == 'A' { 'B' } else { 'A' };
    chars.into_iter().collect()
}

// ── fields_match ─────────────────────────────────────────────────

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, 23).unwrap()
}

#[test]
fn fields_match_full_binding() {
    let st = SerialType::LICENSE_NAME
        | SerialType::MAC_ADDRESS
        | SerialType::EXPIRATION_DATE
        | SerialType::PEN_DRIVE;
    let serial = compose(&request(st)).unwrap();
    assert!(fields_match(&serial, st, &expected(today())));
}

#[test]
fn fields_match_rejects_wrong_license() {
    let st = SerialType::LICENSE_NAME;
    let serial = compose(&request(st)).unwrap();
    let mut exp = expected(today());
    exp.license = "OTHER";
    assert!(!fields_match(&serial, st, &exp));
}

#[test]
fn fields_match_rejects_wrong_mac() {
    let st = SerialType::MAC_ADDRESS;
    let serial = compose(&request(st)).unwrap();
    let mut exp = expected(today());
    exp.mac_address = "AA:BB:CC:DD:EE:FE";
    assert!(!fields_match(&serial, st, &exp));
}

#[test]
fn fields_match_rejects_missing_mac() {
    let st = SerialType::MAC_ADDRESS;
    let serial = compose(&request(st)).unwrap();
    let mut exp = expected(today());
    exp.mac_address = "";
    assert!(!fields_match(&serial, st, &exp));
}

#[test]
fn expiration_on_the_boundary_day_passes() {
    let day = today();
    let mut req = request(SerialType::EXPIRATION_DATE);
    req.expiration = Some(day);
    let serial = compose(&req).unwrap();
    assert!(fields_match(&serial, req.serial_type, &expected(day)));
}

#[test]
fn expiration_one_day_earlier_fails() {
    let day = today();
    let mut req = request(SerialType::EXPIRATION_DATE);
    req.expiration = Some(day.pred_opt().unwrap());
    let serial = compose(&req).unwrap();
    assert!(!fields_match(&serial, req.serial_type, &expected(day)));
}

#[test]
fn fields_match_rejects_absent_pen_drive() {
    let st = SerialType::PEN_DRIVE;
    let serial = compose(&request(st)).unwrap();
    let mut exp = expected(today());
    exp.pen_drive_serial = None;
    assert!(!fields_match(&serial, st, &exp));
    exp.pen_drive_serial = Some("");
    assert!(!fields_match(&serial, st, &exp));
}

#[test]
fn fields_match_rejects_different_pen_drive() {
    let st = SerialType::PEN_DRIVE;
    let serial = compose(&request(st)).unwrap();
    let mut exp = expected(today());
    exp.pen_drive_serial = Some("0BADBEEF");
    assert!(!fields_match(&serial, st, &exp));
}

#[test]
fn fields_match_rejects_truncated_serial() {
    let st = SerialType::LICENSE_NAME | SerialType::MAC_ADDRESS;
    let serial = compose(&request(st)).unwrap();
    let truncated: String = serial.rsplit_once('-').map(|(head, _)| head.to_string()).unwrap();
    let truncated: String = truncated.rsplit_once('-').map(|(head, _)| head.to_string()).unwrap();
    assert!(!fields_match(&truncated, st, &expected(today())));
}

#[test]
fn name_only_serial_has_no_field_checks() {
    let serial = compose(&request(SerialType::NAME_ONLY)).unwrap();
    let exp = ExpectedFields {
        license: "",
        mac_address: "",
        today: today(),
        pen_drive_serial: None,
    };
    assert!(fields_match(&serial, SerialType::NAME_ONLY, &exp));
}

// ── day_ordinal ──────────────────────────────────────────────────

#[test]
fn day_ordinal_formula_is_exact() {
    let date = NaiveDate::from_ymd_opt(2026, 8, 23).unwrap();
    assert_eq!(day_ordinal(date), 2026 * 365 + 8 * 31 + 23);
}
