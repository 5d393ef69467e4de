use sha2::{Digest, Sha256};

/// Compute a stable SHA-256 fingerprint for an entry-point finding.
///
/// Identity fields:
/// - check_id
/// - code
/// - manifest path (workspace-relative)
/// - entry label (`exports`, `exports[./sub]`, `main`, `module`)
/// - declared path
pub fn fingerprint_for_entry(
    check_id: &str,
    code: &str,
    manifest_path: &str,
    entry: &str,
    declared_path: &str,
) -> String {
    let canonical = [check_id, code, manifest_path, entry, declared_path].join("|");

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    let digest = hasher.finalize();
    hex::encode(digest)
}
