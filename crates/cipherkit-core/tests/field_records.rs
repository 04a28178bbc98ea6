use serde_json::{json, Map, Value};

use cipherkit_core::fields::{is_encrypted_value, parse_field_value};
use cipherkit_core::{AesCrypto, CipherAlgorithm, FieldEncryptor};

const PASSWORD: &str = "record-password-123";

fn policy() -> Map<String, Value> {
    match json!({
        "policyNumber": "P-2024-0042",
        "insured": "Acme Freight LLC",
        "taxId": "12-3456789",
        "bankAccount": "000123456789",
        "limits": {"perOccurrence": 1000000}
    }) {
        Value::Object(map) => map,
        _ => unreachable!(),
    }
}

#[test]
fn test_sensitive_fields_round_trip_through_json_file() {
    let dir = tempfile::tempdir().expect("tempdir should be available");
    let path = dir.path().join("policy.json");
    let crypto = AesCrypto::with_algorithm(CipherAlgorithm::Aes256Gcm);
    let fields = FieldEncryptor::new(&crypto);
    let sensitive = ["taxId", "bankAccount"];

    let encrypted = fields
        .encrypt_fields(&policy(), &sensitive, PASSWORD)
        .expect("encrypt should succeed");
    std::fs::write(&path, serde_json::to_vec(&encrypted).expect("serialize"))
        .expect("write should succeed");

    let on_disk = std::fs::read_to_string(&path).expect("read should succeed");
    assert!(!on_disk.contains("12-3456789"));
    assert!(on_disk.contains("P-2024-0042"));

    let loaded: Map<String, Value> = serde_json::from_str(&on_disk).expect("parse");
    let decrypted = fields
        .decrypt_fields(&loaded, &sensitive, PASSWORD)
        .expect("decrypt should succeed");
    assert_eq!(decrypted, policy());
}

#[test]
fn test_gcm_fields_carry_a_tag_and_cbc_fields_do_not() {
    let gcm = AesCrypto::with_algorithm(CipherAlgorithm::Aes256Gcm);
    let cbc = AesCrypto::with_algorithm(CipherAlgorithm::Aes256Cbc);

    let with_tag = FieldEncryptor::new(&gcm)
        .encrypt_fields(&policy(), &["taxId"], PASSWORD)
        .expect("encrypt");
    let without_tag = FieldEncryptor::new(&cbc)
        .encrypt_fields(&policy(), &["taxId"], PASSWORD)
        .expect("encrypt");

    assert!(is_encrypted_value(&with_tag["taxId"]));
    let gcm_value = with_tag["taxId"].as_str().expect("string");
    let cbc_value = without_tag["taxId"].as_str().expect("string");
    assert!(parse_field_value(gcm_value).expect("parse").tag.is_some());
    assert!(parse_field_value(cbc_value).expect("parse").tag.is_none());
}

#[test]
fn test_object_values_decrypt_to_json_text() {
    let crypto = AesCrypto::default();
    let fields = FieldEncryptor::new(&crypto);

    let encrypted = fields
        .encrypt_fields(&policy(), &["limits"], PASSWORD)
        .expect("encrypt");
    let decrypted = fields
        .decrypt_fields(&encrypted, &["limits"], PASSWORD)
        .expect("decrypt");

    let text = decrypted["limits"].as_str().expect("string");
    let restored: Value = serde_json::from_str(text).expect("json text");
    assert_eq!(restored, policy()["limits"]);
}
