use camino::Utf8Path;
use exportguard_domain::targets::PackageManager;

/// Detect the workspace's package manager from its lockfile.
///
/// npm is the fallback when no lockfile is recognized.
pub fn detect_package_manager(workspace_root: &Utf8Path) -> PackageManager {
    const LOCKFILES: [(&str, PackageManager); 5] = [
        ("pnpm-lock.yaml", PackageManager::Pnpm),
        ("yarn.lock", PackageManager::Yarn),
        ("bun.lockb", PackageManager::Bun),
        ("bun.lock", PackageManager::Bun),
        ("package-lock.json", PackageManager::Npm),
    ];

    for (lockfile, pm) in LOCKFILES {
        if workspace_root.join(lockfile).exists() {
            return pm;
        }
    }
    PackageManager::Npm
}
