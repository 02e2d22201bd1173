//! Lecture scenarios
//!
//! An instructor opens check-in for a lecture and students scan the code from
//! their seats, from the corridor, or after the window has closed.

use crate::test_utils::{
    deployment_config, init_test_logging, lecture_room, north_of_lecture_room, TestDeployment,
};
use rollcall_core::Config;
use rollcall_token::{AttendanceToken, RejectionReason};
use std::io::Write;

const LECTURE_START: u64 = 1_760_086_800_000;

#[test]
fn test_student_in_room_checks_in() {
    init_test_logging();
    let deployment = TestDeployment::from_config(&deployment_config(), LECTURE_START);

    let token = deployment
        .issuer
        .issue("CS101", "instr-1", Some(lecture_room()))
        .unwrap();
    let scanned = AttendanceToken::from_qr_payload(&token.to_qr_payload().unwrap()).unwrap();

    let verdict = deployment
        .validator
        .check_in(&scanned, Some(north_of_lecture_room(20.0)));
    assert!(verdict.accepted, "{:?}", verdict.rejections);
    assert_eq!(scanned.expires_at - scanned.timestamp, 300_000);
}

#[test]
fn test_radius_boundary_from_room() {
    init_test_logging();
    let deployment = TestDeployment::from_config(&deployment_config(), LECTURE_START);
    let token = deployment
        .issuer
        .issue("CS101", "instr-1", Some(lecture_room()))
        .unwrap();

    let inside = deployment
        .validator
        .check_in(&token, Some(north_of_lecture_room(99.0)));
    assert!(inside.accepted);

    let outside = deployment
        .validator
        .check_in(&token, Some(north_of_lecture_room(101.0)));
    assert!(!outside.accepted);
    match &outside.rejections[..] {
        [RejectionReason::OutOfRange {
            distance_m,
            max_distance_m,
        }] => {
            assert!((distance_m - 101.0).abs() < 0.5, "got {}", distance_m);
            assert_eq!(*max_distance_m, 100.0);
        }
        other => panic!("Expected a single OutOfRange rejection, got {:?}", other),
    }
}

#[test]
fn test_late_scan_is_rejected_as_expired() {
    init_test_logging();
    let config = deployment_config();
    let instructor = TestDeployment::from_config(&config, LECTURE_START);
    let late_student = TestDeployment::from_config(&config, LECTURE_START + 301_000);

    let token = instructor
        .issuer
        .issue("CS101", "instr-1", Some(lecture_room()))
        .unwrap();

    let verdict = late_student
        .validator
        .check_in(&token, Some(north_of_lecture_room(5.0)));
    assert!(!verdict.accepted);
    assert!(verdict.signature_valid);
    assert!(!verdict.time_valid);
}

#[test]
fn test_config_file_drives_window_and_radius() {
    init_test_logging();
    let secret_hex = "ab".repeat(32);
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "[issuance]\nvalidity_window_ms = 60000\nsigning_secret_hex = \"{}\"\n\n[proximity]\nmax_distance_m = 250.0",
        secret_hex
    )
    .unwrap();

    let config = Config::from_file(file.path()).unwrap();
    let deployment = TestDeployment::from_config(&config, LECTURE_START);
    let token = deployment
        .issuer
        .issue("PHY110", "instr-7", Some(lecture_room()))
        .unwrap();

    assert_eq!(token.expires_at, LECTURE_START + 60_000);
    assert!(
        deployment
            .validator
            .check_in(&token, Some(north_of_lecture_room(200.0)))
            .accepted
    );

    let after_window = TestDeployment::from_config(&config, LECTURE_START + 60_001);
    assert!(
        !after_window
            .validator
            .check_in(&token, Some(north_of_lecture_room(10.0)))
            .accepted
    );
}

#[test]
fn test_verdict_json_for_the_app() {
    init_test_logging();
    let deployment = TestDeployment::from_config(&deployment_config(), LECTURE_START);
    let token = deployment
        .issuer
        .issue("CS101", "instr-1", Some(lecture_room()))
        .unwrap();

    let verdict = deployment
        .validator
        .check_in(&token, Some(north_of_lecture_room(500.0)));
    let json = serde_json::to_value(&verdict).unwrap();

    assert_eq!(json["accepted"], false);
    assert_eq!(json["signature_valid"], true);
    assert_eq!(json["rejections"][0]["reason"], "out_of_range");
    assert_eq!(json["rejections"][0]["max_distance_m"], 100.0);
}
