pub mod init;
pub mod inspect;
pub mod languages;
pub mod play;

use std::path::{Path, PathBuf};

use wordloop_core::loader::PackageSource;
use wordloop_core::model::Language;

/// Source reading `package` (a package directory) for `language`, or the
/// default package layout under `packages_dir`.
pub fn package_source(
    packages_dir: &Path,
    package: Option<&Path>,
    language: Language,
) -> PackageSource {
    match package {
        Some(dir) => {
            let root = dir
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."));
            let name = dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            PackageSource::new(root).with_package(language, name)
        }
        None => PackageSource::new(packages_dir),
    }
}
