use std::fs;

use cipherkit_core::config::SymmetricConfig;
use cipherkit_core::{AesCrypto, CipherAlgorithm, EncryptedData, ErrorCode, KeyDerivation};

fn write_payload(dir: &tempfile::TempDir, data: &EncryptedData) -> std::path::PathBuf {
    let path = dir.path().join("payload.json");
    let json = serde_json::to_string_pretty(data).expect("serialize should succeed");
    fs::write(&path, json).expect("write should succeed");
    path
}

fn read_payload(path: &std::path::Path) -> EncryptedData {
    let json = fs::read_to_string(path).expect("read should succeed");
    serde_json::from_str(&json).expect("deserialize should succeed")
}

#[test]
fn test_encrypted_file_round_trip() {
    let dir = tempfile::tempdir().expect("tempdir should be available");
    let crypto = AesCrypto::with_algorithm(CipherAlgorithm::Aes256Gcm);
    let password = "test-password-secure-123";
    let plaintext = b"policy 4471: premium 1250.50";

    let encrypted = crypto
        .encrypt(plaintext, password)
        .expect("encryption should succeed");
    let path = write_payload(&dir, &encrypted);

    let on_disk = fs::read_to_string(&path).expect("read should succeed");
    assert!(!on_disk.contains("premium"));

    let decrypted = crypto
        .decrypt(&read_payload(&path), password)
        .expect("decryption should succeed");
    assert_eq!(decrypted, plaintext);
}

#[test]
fn test_encrypted_file_wrong_password_fails() {
    let dir = tempfile::tempdir().expect("tempdir should be available");
    let crypto = AesCrypto::with_algorithm(CipherAlgorithm::Aes128Gcm);

    let encrypted = crypto
        .encrypt(b"secret entry", "correct-password-123")
        .expect("encryption should succeed");
    let path = write_payload(&dir, &encrypted);

    let err = crypto
        .decrypt(&read_payload(&path), "wrong-password-456")
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::DecryptionFailed);
}

#[test]
fn test_tampered_ciphertext_is_rejected() {
    let crypto = AesCrypto::with_algorithm(CipherAlgorithm::Aes256Gcm);
    let mut encrypted = crypto
        .encrypt(b"claim amount: 9000", "tamper-password-123")
        .expect("encryption should succeed");

    let (salt, ciphertext) = encrypted
        .salt_and_ciphertext()
        .map(|(s, c)| (s.to_string(), c.to_string()))
        .expect("payload should carry a salt");
    let mut bytes = hex::decode(&ciphertext).expect("ciphertext should be hex");
    bytes[0] ^= 0x01;
    encrypted.encrypted = format!("{}:{}", salt, hex::encode(bytes));

    let err = crypto
        .decrypt(&encrypted, "tamper-password-123")
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::DecryptionFailed);
    assert_eq!(err.operation(), "decrypt");
}

fn flip_first_bit(hex_value: &str) -> String {
    let mut bytes = hex::decode(hex_value).expect("value should be hex");
    bytes[0] ^= 0x01;
    hex::encode(bytes)
}

#[test]
fn test_tampered_tag_is_rejected() {
    let crypto = AesCrypto::with_algorithm(CipherAlgorithm::Aes256Gcm);
    let mut encrypted = crypto
        .encrypt(b"claim amount: 9000", "tamper-password-123")
        .expect("encryption should succeed");

    let tag = encrypted.tag.as_deref().expect("GCM payload should carry a tag");
    encrypted.tag = Some(flip_first_bit(tag));

    let err = crypto
        .decrypt(&encrypted, "tamper-password-123")
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::DecryptionFailed);
}

#[test]
fn test_tampered_iv_is_rejected() {
    for algorithm in [CipherAlgorithm::Aes128Gcm, CipherAlgorithm::Aes256Gcm] {
        let crypto = AesCrypto::with_algorithm(algorithm);
        let mut encrypted = crypto
            .encrypt(b"claim amount: 9000", "tamper-password-123")
            .expect("encryption should succeed");
        encrypted.iv = flip_first_bit(&encrypted.iv);

        let err = crypto
            .decrypt(&encrypted, "tamper-password-123")
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::DecryptionFailed, "{:?}", algorithm);
    }
}

#[test]
fn test_scrypt_configured_round_trip() {
    let config = SymmetricConfig {
        kdf: KeyDerivation::Scrypt,
        scrypt_log_n: 10,
        ..SymmetricConfig::default().with_algorithm(CipherAlgorithm::Aes256Cbc)
    };
    let crypto = AesCrypto::new(config).expect("config should validate");

    let encrypted = crypto
        .encrypt(b"scrypt payload", "scrypt-password-123")
        .expect("encryption should succeed");
    let decrypted = crypto
        .decrypt_to_string(&encrypted, "scrypt-password-123")
        .expect("decryption should succeed");
    assert_eq!(decrypted, "scrypt payload");
}

#[test]
fn test_same_input_never_repeats() {
    let crypto = AesCrypto::default();
    let a = crypto.encrypt(b"same", "same-password-123").expect("encrypt");
    let b = crypto.encrypt(b"same", "same-password-123").expect("encrypt");
    assert_ne!(a.encrypted, b.encrypted);
    assert_ne!(a.iv, b.iv);
}
