use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

const PASSWORD: &str = "test-password-secure-123";

fn bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_cipherkit"))
}

/// Isolated XDG config home so a developer's config never leaks in.
fn temp_home() -> tempfile::TempDir {
    tempfile::tempdir().expect("tempdir")
}

fn command(home: &Path) -> Command {
    let mut cmd = Command::new(bin());
    cmd.env("XDG_CONFIG_HOME", home)
        .env("HOME", home)
        .env_remove("CIPHERKIT_CONFIG")
        .env_remove("CIPHERKIT_PASSWORD")
        .env_remove("RUST_LOG");
    cmd
}

fn run_with_stdin(mut cmd: Command, stdin: &[u8]) -> Output {
    cmd.stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    let mut child = cmd.spawn().expect("spawn cipherkit");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(stdin)
        .expect("write stdin");
    child.wait_with_output().expect("wait for cipherkit")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

#[test]
fn test_cli_encrypt_decrypt_round_trip() {
    let home = temp_home();
    let input = home.path().join("plain.txt");
    let payload = home.path().join("payload.json");
    std::fs::write(&input, "quarterly loss run").expect("write input");

    let mut encrypt = command(home.path());
    encrypt
        .arg("encrypt")
        .arg("--input")
        .arg(&input)
        .arg("--algorithm")
        .arg("aes-256-gcm")
        .env("CIPHERKIT_PASSWORD", PASSWORD);
    let encrypt = encrypt.output().expect("run encrypt");
    assert!(encrypt.status.success(), "{}", stderr(&encrypt));

    let value: serde_json::Value = serde_json::from_slice(&encrypt.stdout).expect("payload json");
    assert!(value.get("encrypted").is_some());
    assert!(value.get("iv").is_some());
    assert!(value.get("tag").is_some());
    std::fs::write(&payload, &encrypt.stdout).expect("write payload");

    let mut decrypt = command(home.path());
    decrypt
        .arg("decrypt")
        .arg("--input")
        .arg(&payload)
        .arg("--algorithm")
        .arg("aes-256-gcm")
        .env("CIPHERKIT_PASSWORD", PASSWORD);
    let decrypt = decrypt.output().expect("run decrypt");
    assert!(decrypt.status.success(), "{}", stderr(&decrypt));
    assert_eq!(stdout(&decrypt), "quarterly loss run");
}

#[test]
fn test_cli_decrypt_wrong_password_exits_auth_failed() {
    let home = temp_home();

    let mut encrypt = command(home.path());
    encrypt
        .arg("encrypt")
        .arg("--algorithm")
        .arg("aes-128-gcm")
        .env("CIPHERKIT_PASSWORD", PASSWORD);
    let encrypt = run_with_stdin(encrypt, b"secret");
    assert!(encrypt.status.success(), "{}", stderr(&encrypt));

    let mut decrypt = command(home.path());
    decrypt
        .arg("decrypt")
        .arg("--algorithm")
        .arg("aes-128-gcm")
        .env("CIPHERKIT_PASSWORD", "wrong-password-456");
    let decrypt = run_with_stdin(decrypt, &encrypt.stdout);
    assert_eq!(decrypt.status.code(), Some(5));
    assert!(stderr(&decrypt).contains("DECRYPTION_FAILED"));
    assert!(decrypt.stdout.is_empty());
}

#[test]
fn test_cli_decrypt_output_file() {
    let home = temp_home();
    let target = home.path().join("out").join("plain.bin");

    let mut encrypt = command(home.path());
    encrypt.arg("encrypt").env("CIPHERKIT_PASSWORD", PASSWORD);
    let encrypt = run_with_stdin(encrypt, b"\x00\x01binary\xff");
    assert!(encrypt.status.success(), "{}", stderr(&encrypt));

    let mut decrypt = command(home.path());
    decrypt
        .arg("decrypt")
        .arg("--output")
        .arg(&target)
        .arg("--quiet")
        .env("CIPHERKIT_PASSWORD", PASSWORD);
    let decrypt = run_with_stdin(decrypt, &encrypt.stdout);
    assert!(decrypt.status.success(), "{}", stderr(&decrypt));
    assert_eq!(std::fs::read(&target).expect("read output"), b"\x00\x01binary\xff");
}

#[test]
fn test_cli_missing_password_non_interactive() {
    let home = temp_home();
    let mut encrypt = command(home.path());
    encrypt.arg("encrypt");
    let output = run_with_stdin(encrypt, b"data");
    assert_eq!(output.status.code(), Some(4));
    assert!(stderr(&output).contains("CIPHERKIT_PASSWORD"));
}

#[test]
fn test_cli_missing_input_file() {
    let home = temp_home();
    let output = command(home.path())
        .arg("encrypt")
        .arg("--input")
        .arg(home.path().join("absent.txt"))
        .env("CIPHERKIT_PASSWORD", PASSWORD)
        .output()
        .expect("run encrypt");
    assert_eq!(output.status.code(), Some(3));
    assert!(stderr(&output).contains("Input file not found"));
}

#[test]
fn test_cli_hash_and_verify_password() {
    let home = temp_home();
    let strong = "Renewal-Desk-2025!";

    let hash = command(home.path())
        .arg("hash-password")
        .env("CIPHERKIT_PASSWORD", strong)
        .output()
        .expect("run hash-password");
    assert!(hash.status.success(), "{}", stderr(&hash));
    let hash = stdout(&hash).trim().to_string();
    assert!(hash.starts_with("$argon2id$"));

    let verify = command(home.path())
        .arg("verify-password")
        .arg("--hash")
        .arg(&hash)
        .arg("--json")
        .env("CIPHERKIT_PASSWORD", strong)
        .output()
        .expect("run verify-password");
    assert!(verify.status.success(), "{}", stderr(&verify));
    let value: serde_json::Value = serde_json::from_slice(&verify.stdout).expect("verify json");
    assert_eq!(value["valid"], true);
    assert_eq!(value["scheme"], "argon2");
    assert_eq!(value["needs_rehash"], false);

    let mismatch = command(home.path())
        .arg("verify-password")
        .arg("--hash")
        .arg(&hash)
        .env("CIPHERKIT_PASSWORD", "Renewal-Desk-2026!")
        .output()
        .expect("run verify-password");
    assert_eq!(mismatch.status.code(), Some(5));
}

#[test]
fn test_cli_verify_password_legacy_scheme() {
    let home = temp_home();

    let hash = command(home.path())
        .arg("hash-password")
        .arg("--scheme")
        .arg("pbkdf2")
        .env("CIPHERKIT_PASSWORD", "short")
        .output()
        .expect("run hash-password");
    assert!(hash.status.success(), "{}", stderr(&hash));
    let hash = stdout(&hash).trim().to_string();
    assert!(hash.starts_with("pbkdf2:100000:"));

    let verify = command(home.path())
        .arg("verify-password")
        .arg("--hash")
        .arg(&hash)
        .env("CIPHERKIT_PASSWORD", "short")
        .output()
        .expect("run verify-password");
    assert!(verify.status.success(), "{}", stderr(&verify));
    assert!(stdout(&verify).contains("rehash"));
}

#[test]
fn test_cli_unknown_hash_format_is_invalid_input() {
    let home = temp_home();
    let output = command(home.path())
        .arg("verify-password")
        .arg("--hash")
        .arg("$1$saltsalt$abcdef")
        .env("CIPHERKIT_PASSWORD", PASSWORD)
        .output()
        .expect("run verify-password");
    assert_eq!(output.status.code(), Some(4));
    assert!(stderr(&output).contains("UNSUPPORTED_HASH_FORMAT"));
}

#[test]
fn test_cli_weak_password_rejected() {
    let home = temp_home();
    let output = command(home.path())
        .arg("hash-password")
        .env("CIPHERKIT_PASSWORD", "password")
        .output()
        .expect("run hash-password");
    assert_eq!(output.status.code(), Some(4));
    assert!(stderr(&output).contains("WEAK_PASSWORD"));
}

#[test]
fn test_cli_check_password_json() {
    let home = temp_home();
    let output = command(home.path())
        .arg("check-password")
        .arg("--json")
        .env("CIPHERKIT_PASSWORD", "abc")
        .output()
        .expect("run check-password");
    assert!(output.status.success(), "{}", stderr(&output));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(value["is_strong"], false);
    assert!(!value["feedback"].as_array().expect("feedback").is_empty());
}

#[test]
fn test_cli_rsa_keygen_sign_verify() {
    let home = temp_home();
    let keys = home.path().join("keys");
    let document = home.path().join("document.txt");
    std::fs::write(&document, "bind coverage effective 2025-01-01").expect("write document");

    let keygen = command(home.path())
        .arg("rsa")
        .arg("keygen")
        .arg("--out-dir")
        .arg(&keys)
        .output()
        .expect("run keygen");
    assert!(keygen.status.success(), "{}", stderr(&keygen));
    assert!(keys.join("private.pem").exists());
    assert!(keys.join("public.pem").exists());

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(keys.join("private.pem"))
            .expect("metadata")
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    let sign = command(home.path())
        .arg("rsa")
        .arg("sign")
        .arg("--private-key")
        .arg(keys.join("private.pem"))
        .arg("--input")
        .arg(&document)
        .output()
        .expect("run sign");
    assert!(sign.status.success(), "{}", stderr(&sign));
    let signature = stdout(&sign).trim().to_string();

    let verify = command(home.path())
        .arg("rsa")
        .arg("verify")
        .arg("--public-key")
        .arg(keys.join("public.pem"))
        .arg("--signature")
        .arg(&signature)
        .arg("--input")
        .arg(&document)
        .output()
        .expect("run verify");
    assert!(verify.status.success(), "{}", stderr(&verify));

    std::fs::write(&document, "bind coverage effective 2025-02-01").expect("tamper");
    let tampered = command(home.path())
        .arg("rsa")
        .arg("verify")
        .arg("--public-key")
        .arg(keys.join("public.pem"))
        .arg("--signature")
        .arg(&signature)
        .arg("--input")
        .arg(&document)
        .output()
        .expect("run verify");
    assert_eq!(tampered.status.code(), Some(6));

    let again = command(home.path())
        .arg("rsa")
        .arg("keygen")
        .arg("--out-dir")
        .arg(&keys)
        .output()
        .expect("run keygen");
    assert_eq!(again.status.code(), Some(4));
}

#[test]
fn test_cli_rsa_keygen_leaves_no_partial_pair() {
    let home = temp_home();
    let keys = home.path().join("keys");
    std::fs::create_dir_all(&keys).expect("keys dir");
    std::fs::write(keys.join("public.pem"), "existing").expect("write public key");

    let output = command(home.path())
        .arg("rsa")
        .arg("keygen")
        .arg("--out-dir")
        .arg(&keys)
        .output()
        .expect("run keygen");
    assert_eq!(output.status.code(), Some(4));
    assert!(!keys.join("private.pem").exists());
    assert_eq!(
        std::fs::read_to_string(keys.join("public.pem")).expect("read public key"),
        "existing"
    );
}

#[test]
fn test_cli_fields_round_trip() {
    let home = temp_home();
    let record = br#"{"claimId":"CL-77","ssn":"123-45-6789","notes":null}"#;

    let mut encrypt = command(home.path());
    encrypt
        .arg("fields")
        .arg("encrypt")
        .arg("--fields")
        .arg("ssn,notes")
        .env("CIPHERKIT_PASSWORD", PASSWORD);
    let encrypt = run_with_stdin(encrypt, record);
    assert!(encrypt.status.success(), "{}", stderr(&encrypt));

    let encrypted: serde_json::Value = serde_json::from_slice(&encrypt.stdout).expect("json");
    assert_eq!(encrypted["claimId"], "CL-77");
    assert!(encrypted["ssn"]
        .as_str()
        .expect("ssn string")
        .starts_with("encrypted:"));
    assert!(encrypted["notes"].is_null());

    let mut decrypt = command(home.path());
    decrypt
        .arg("fields")
        .arg("decrypt")
        .arg("--fields")
        .arg("ssn")
        .env("CIPHERKIT_PASSWORD", PASSWORD);
    let decrypt = run_with_stdin(decrypt, &encrypt.stdout);
    assert!(decrypt.status.success(), "{}", stderr(&decrypt));
    let decrypted: serde_json::Value = serde_json::from_slice(&decrypt.stdout).expect("json");
    assert_eq!(decrypted["ssn"], "123-45-6789");
}

#[test]
fn test_cli_fields_rejects_non_object() {
    let home = temp_home();
    let mut cmd = command(home.path());
    cmd.arg("fields")
        .arg("encrypt")
        .arg("--fields")
        .arg("a")
        .env("CIPHERKIT_PASSWORD", PASSWORD);
    let output = run_with_stdin(cmd, b"[1, 2, 3]");
    assert_eq!(output.status.code(), Some(4));
}

#[test]
fn test_cli_generators() {
    let home = temp_home();

    let salt = command(home.path())
        .arg("salt")
        .arg("--length")
        .arg("16")
        .output()
        .expect("run salt");
    assert!(salt.status.success());
    assert_eq!(stdout(&salt).trim().len(), 32);

    let short = command(home.path())
        .arg("salt")
        .arg("--length")
        .arg("8")
        .output()
        .expect("run salt");
    assert_eq!(short.status.code(), Some(4));

    let token = command(home.path())
        .arg("token")
        .arg("--json")
        .output()
        .expect("run token");
    assert!(token.status.success());
    let value: serde_json::Value = serde_json::from_slice(&token.stdout).expect("json");
    assert_eq!(value["token"].as_str().expect("token").len(), 43);

    let uuid = command(home.path()).arg("uuid").output().expect("run uuid");
    assert!(uuid.status.success());
    assert_eq!(stdout(&uuid).trim().len(), 36);
}

#[test]
fn test_cli_digest() {
    let home = temp_home();
    let cmd = {
        let mut cmd = command(home.path());
        cmd.arg("digest");
        cmd
    };
    let output = run_with_stdin(cmd, b"abc");
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(
        stdout(&output).trim(),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
}

#[test]
fn test_cli_pkce_with_verifier() {
    let home = temp_home();
    let output = command(home.path())
        .arg("pkce")
        .arg("--verifier")
        .arg("dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk")
        .arg("--json")
        .output()
        .expect("run pkce");
    assert!(output.status.success(), "{}", stderr(&output));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(value["challenge"], "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM");
    assert_eq!(value["method"], "S256");
}

fn token(payload: serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256","typ":"JWT"}"#);
    let body = URL_SAFE_NO_PAD.encode(payload.to_string());
    format!("{}.{}.sig", header, body)
}

#[test]
fn test_cli_claims_valid_and_expired() {
    let home = temp_home();
    let now = chrono::Utc::now().timestamp();

    let valid = token(serde_json::json!({
        "sub": "user-1",
        "aud": "api://underwriting",
        "exp": now + 3600,
    }));
    let output = command(home.path())
        .arg("claims")
        .arg(&valid)
        .arg("--audience")
        .arg("api://underwriting")
        .arg("--json")
        .output()
        .expect("run claims");
    assert!(output.status.success(), "{}", stderr(&output));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(value["sub"], "user-1");

    let expired = token(serde_json::json!({ "sub": "user-1", "exp": now - 3600 }));
    let output = command(home.path())
        .arg("claims")
        .arg(&expired)
        .output()
        .expect("run claims");
    assert_eq!(output.status.code(), Some(5));
    assert!(stderr(&output).contains("TOKEN_EXPIRED"));

    let output = command(home.path())
        .arg("claims")
        .arg(&valid)
        .arg("--audience")
        .arg("api://billing")
        .output()
        .expect("run claims");
    assert_eq!(output.status.code(), Some(4));
}

#[test]
fn test_cli_config_file_is_applied_and_validated() {
    let home = temp_home();
    let config_dir = home.path().join("cipherkit");
    std::fs::create_dir_all(&config_dir).expect("config dir");

    std::fs::write(
        config_dir.join("config.toml"),
        "[symmetric]\nalgorithm = \"aes-256-gcm\"\n",
    )
    .expect("write config");
    let mut encrypt = command(home.path());
    encrypt.arg("encrypt").env("CIPHERKIT_PASSWORD", PASSWORD);
    let output = run_with_stdin(encrypt, b"payload");
    assert!(output.status.success(), "{}", stderr(&output));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert!(value.get("tag").is_some());

    std::fs::write(config_dir.join("config.toml"), "[symmetric]\niterations = 10\n")
        .expect("write config");
    let output = command(home.path())
        .arg("uuid")
        .output()
        .expect("run uuid");
    assert_eq!(output.status.code(), Some(4));
    assert!(stderr(&output).contains("Invalid config"));
}

#[test]
fn test_cli_explicit_missing_config() {
    let home = temp_home();
    let output = command(home.path())
        .arg("--config")
        .arg(home.path().join("nope.toml"))
        .arg("uuid")
        .output()
        .expect("run uuid");
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn test_cli_completions() {
    let home = temp_home();
    let output = command(home.path())
        .arg("completions")
        .arg("bash")
        .output()
        .expect("run completions");
    assert!(output.status.success());
    assert!(stdout(&output).contains("cipherkit"));
}
