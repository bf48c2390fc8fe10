//! Bulk encryption engine behind the packaging tool.
//!
//! Directory processing is encrypt-only: decryption happens per file here
//! or on demand in the registry. There is no bulk decrypt.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::crypto;
use crate::error::ProviderError;
use crate::ENCRYPTED_SUFFIX;

/// Encrypt one file, creating the output's parent directories as needed.
/// The output path is used verbatim; no suffix is appended.
pub fn encrypt_file(input: &Path, output: &Path, secret: &str) -> Result<(), ProviderError> {
    let plain = fs::read(input).map_err(|err| ProviderError::io(input, err))?;
    let cipher = crypto::encrypt(&plain, secret);
    write_output(output, &cipher)?;
    debug!(
        input = %input.display(),
        output = %output.display(),
        len = cipher.len(),
        "encrypted file"
    );
    Ok(())
}

/// Decrypt one file. Suffix handling is the caller's business.
pub fn decrypt_file(input: &Path, output: &Path, secret: &str) -> Result<(), ProviderError> {
    let cipher = fs::read(input).map_err(|err| ProviderError::io(input, err))?;
    let plain = crypto::decrypt(&cipher, secret);
    write_output(output, &plain)?;
    debug!(
        input = %input.display(),
        output = %output.display(),
        len = plain.len(),
        "decrypted file"
    );
    Ok(())
}

/// Encrypt every file under `in_dir` whose name matches one of `extensions`
/// (case-insensitive entries like ".qml") to the parallel path under
/// `out_dir` with the encrypted suffix appended. A file that fails is
/// logged and skipped; the returned count covers successes only.
pub fn encrypt_directory(
    in_dir: &Path,
    out_dir: &Path,
    secret: &str,
    extensions: &[String],
) -> usize {
    if !in_dir.is_dir() {
        warn!(dir = %in_dir.display(), "input directory does not exist");
        return 0;
    }
    let mut count = 0usize;
    for entry in WalkDir::new(in_dir).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(%err, "walk error during bulk encryption");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if !matches_extension(path, extensions) {
            continue;
        }
        let relative = match path.strip_prefix(in_dir) {
            Ok(relative) => relative,
            Err(_) => continue,
        };
        let output = with_encrypted_suffix(&out_dir.join(relative));
        match encrypt_file(path, &output, secret) {
            Ok(()) => count += 1,
            Err(err) => warn!(file = %path.display(), %err, "skipping file"),
        }
    }
    info!(
        count,
        in_dir = %in_dir.display(),
        out_dir = %out_dir.display(),
        "bulk encryption finished"
    );
    count
}

fn write_output(output: &Path, bytes: &[u8]) -> Result<(), ProviderError> {
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent).map_err(|err| ProviderError::io(parent, err))?;
    }
    fs::write(output, bytes).map_err(|err| ProviderError::io(output, err))
}

fn with_encrypted_suffix(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(ENCRYPTED_SUFFIX);
    PathBuf::from(name)
}

fn matches_extension(path: &Path, extensions: &[String]) -> bool {
    let name = match path.file_name() {
        Some(name) => name.to_string_lossy().to_ascii_lowercase(),
        None => return false,
    };
    extensions
        .iter()
        .any(|ext| name.ends_with(&ext.to_ascii_lowercase()))
}
