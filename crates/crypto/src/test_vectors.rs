//! Published test vectors for the keyed signature schemes.
//!
//! These pin the HMAC-SHA256 and Ed25519 implementations to their reference
//! outputs so a dependency bump cannot silently change issued signatures.

use crate::keys::SigningSecret;
use crate::signing::{Ed25519TokenSigner, HmacSigner, TokenSigner, TokenVerifier};

/// RFC 8032 section 7.1, TEST 1 private key.
///
/// ⚠️ WARNING: DO NOT USE IN PRODUCTION ⚠️
///
/// This key is publicly known and only reproduces the published vector.
const RFC8032_TEST1_PRIVATE_KEY: [u8; 32] = [
    0x9d, 0x61, 0xb1, 0x9d, 0xef, 0xfd, 0x5a, 0x60, 0xba, 0x84, 0x4a, 0xf4, 0x92, 0xec, 0x2c, 0xc4,
    0x44, 0x49, 0xc5, 0x69, 0x7b, 0x32, 0x69, 0x19, 0x70, 0x3b, 0xac, 0x03, 0x1c, 0xae, 0x7f, 0x60,
];

const RFC8032_TEST1_PUBLIC_KEY_HEX: &str =
    "d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a";

const RFC8032_TEST1_SIGNATURE_HEX: &str = "e5564300c360ac729086e2cc806e828a84877f1eb8e5d974d873e065224901555fb8821590a33bacc61e39701cf9b46bd25bf5f0595bbe24655141438e7a100b";

#[test]
fn test_ed25519_rfc8032_test1() {
    let signer = Ed25519TokenSigner::from_bytes(&RFC8032_TEST1_PRIVATE_KEY).unwrap();

    assert_eq!(hex::encode(signer.public_key()), RFC8032_TEST1_PUBLIC_KEY_HEX);
    assert_eq!(signer.sign(b""), RFC8032_TEST1_SIGNATURE_HEX);

    let verifier = crate::Ed25519TokenVerifier::from_hex(RFC8032_TEST1_PUBLIC_KEY_HEX).unwrap();
    assert!(verifier.verify(b"", RFC8032_TEST1_SIGNATURE_HEX));
}

#[test]
fn test_hmac_sha256_rfc4231_case6() {
    // 131-byte key, larger than the SHA-256 block size
    let secret = SigningSecret::from_bytes(vec![0xaa; 131]).unwrap();
    let signer = HmacSigner::new(&secret).unwrap();
    let message = b"Test Using Larger Than Block-Size Key - Hash Key First";

    let expected = "60e431591ee0b67f0d8a26aacbf5b77f8e0bc6213728c5140546040f0ee37f54";
    assert_eq!(signer.sign(message), expected);
    assert!(signer.verify(message, expected));
}
