//! Forgery attempts
//!
//! A student who has seen one valid code tries to stretch, copy or fabricate
//! codes. Every attempt must fail at the signature gate.

use crate::test_utils::{
    deployment_config, init_test_logging, lecture_room, north_of_lecture_room, TestDeployment,
};
use rollcall_crypto::{HmacSigner, LegacySigner, SigningSecret, TokenSigner};
use rollcall_token::{generate_signature, AttendanceToken, RejectionReason};

const LECTURE_START: u64 = 1_760_086_800_000;

#[test]
fn test_extended_expiry_is_detected() {
    init_test_logging();
    let config = deployment_config();
    let deployment = TestDeployment::from_config(&config, LECTURE_START);
    let mut token = deployment
        .issuer
        .issue("CS101", "instr-1", Some(lecture_room()))
        .unwrap();

    token.expires_at += 24 * 3_600_000;

    let tomorrow = TestDeployment::from_config(&config, LECTURE_START + 3_600_000);
    let verdict = tomorrow
        .validator
        .check_in(&token, Some(north_of_lecture_room(1.0)));
    assert_eq!(verdict.rejections, vec![RejectionReason::InvalidSignature]);
}

#[test]
fn test_code_copied_to_other_course_is_detected() {
    init_test_logging();
    let deployment = TestDeployment::from_config(&deployment_config(), LECTURE_START);
    let mut token = deployment
        .issuer
        .issue("CS101", "instr-1", Some(lecture_room()))
        .unwrap();

    token.course_id = "CS102".to_string();
    assert!(!deployment.validator.validate_signature(&token));
}

#[test]
fn test_legacy_style_forgery_fails_against_keyed_validator() {
    init_test_logging();
    let deployment = TestDeployment::from_config(&deployment_config(), LECTURE_START);
    let genuine = deployment
        .issuer
        .issue("CS101", "instr-1", Some(lecture_room()))
        .unwrap();

    let mut forged = genuine.clone();
    forged.session_id = "session-forged".to_string();
    let signature = generate_signature(&LegacySigner, &forged.signed_fields());
    forged.signature = signature;

    assert!(!deployment.validator.validate_signature(&forged));
}

#[test]
fn test_guessed_secret_fails() {
    init_test_logging();
    let deployment = TestDeployment::from_config(&deployment_config(), LECTURE_START);
    let genuine = deployment
        .issuer
        .issue("CS101", "instr-1", Some(lecture_room()))
        .unwrap();

    let attacker = HmacSigner::new(&SigningSecret::generate()).unwrap();
    let mut forged = genuine.clone();
    forged.instructor_id = "instr-2".to_string();
    let signature = attacker.sign(&forged.signed_fields().canonical_bytes());
    forged.signature = signature;

    assert!(!deployment.validator.validate_signature(&forged));
    assert!(deployment.validator.validate_signature(&genuine));
}

#[test]
fn test_garbled_payload_never_reaches_validator() {
    init_test_logging();
    let deployment = TestDeployment::from_config(&deployment_config(), LECTURE_START);
    let token = deployment
        .issuer
        .issue("CS101", "instr-1", Some(lecture_room()))
        .unwrap();

    let mut payload = token.to_qr_payload().unwrap();
    payload.truncate(payload.len() / 2);
    assert!(AttendanceToken::from_qr_payload(&payload).is_err());
}
