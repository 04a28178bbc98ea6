use std::path::Path;

use crate::errors::CliError;

/// Write a private key readable only by the owner. Existing files are never
/// overwritten.
pub fn write_private_file(path: &Path, contents: &str) -> anyhow::Result<()> {
    ensure_parent_dir(path)?;
    refuse_existing(path)?;
    std::fs::write(path, contents)
        .map_err(|e| anyhow::anyhow!("Failed to write key {}: {}", path.display(), e))?;
    set_file_permissions(path)?;
    Ok(())
}

pub fn write_public_file(path: &Path, contents: &str) -> anyhow::Result<()> {
    ensure_parent_dir(path)?;
    refuse_existing(path)?;
    std::fs::write(path, contents)
        .map_err(|e| anyhow::anyhow!("Failed to write key {}: {}", path.display(), e))?;
    Ok(())
}

/// Write decrypted output, owner-only on unix.
pub fn write_plaintext_file(path: &Path, contents: &[u8]) -> anyhow::Result<()> {
    ensure_parent_dir(path)?;
    std::fs::write(path, contents)
        .map_err(|e| anyhow::anyhow!("Failed to write {}: {}", path.display(), e))?;
    set_file_permissions(path)?;
    Ok(())
}

/// Fail if any of `paths` exists, before anything is written.
pub fn ensure_absent(paths: &[&Path]) -> anyhow::Result<()> {
    paths.iter().try_for_each(|path| refuse_existing(path))
}

fn refuse_existing(path: &Path) -> anyhow::Result<()> {
    if path.exists() {
        return Err(CliError::invalid_input(format!(
            "Key file already exists: {}",
            path.display()
        ))
        .with_hint("Choose another --out-dir or remove the old keys first.")
        .into());
    }
    Ok(())
}

fn ensure_parent_dir(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!("Failed to create directory {}: {}", parent.display(), e)
        })?;
    }
    Ok(())
}

fn set_file_permissions(path: &Path) -> anyhow::Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = std::fs::metadata(path)?.permissions();
        perms.set_mode(0o600);
        std::fs::set_permissions(path, perms)?;
    }
    #[cfg(not(unix))]
    let _ = path;
    Ok(())
}
