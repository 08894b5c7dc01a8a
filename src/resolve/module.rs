//! Where units live on disk: import specifiers, conventional type locations,
//! and the project-wide source scan.
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use super::ResolverOptions;

/// Directories the project scan never descends into.
const IGNORED_DIRS: &[&str] = &["node_modules", "dist", "build", ".git", "target", "coverage"];

/// Stems (relative to the project root, without extension) searched before
/// the full project scan. `{Name}` / `{name}` are replaced with the type name
/// as written and lowercased.
const CONVENTIONAL_STEMS: &[&str] = &[
    "src/types",
    "src/types/index",
    "src/types/{Name}",
    "src/types/{name}",
    "src/api/types",
    "src/models/{Name}",
    "src/models/{name}",
    "types/index",
    "types",
];

pub fn is_relative(specifier: &str) -> bool {
    specifier == "." || specifier == ".." || specifier.starts_with("./") || specifier.starts_with("../")
}

/// Map an import specifier to an existing file, or `None` when nothing on disk
/// matches (bare package imports always land here).
pub fn resolve_specifier(
    specifier: &str,
    unit_dir: &Path,
    root: &Path,
    options: &ResolverOptions,
) -> Option<PathBuf> {
    let base = if is_relative(specifier) {
        unit_dir.join(specifier)
    } else if let Some(rest) = specifier.strip_prefix(options.alias_prefix.as_str()) {
        root.join(&options.alias_dir).join(rest)
    } else {
        return None;
    };
    candidates(&base, &options.extensions)
        .into_iter()
        .find(|p| p.is_file())
        .map(|p| p.canonicalize().unwrap_or(p))
}

fn candidates(base: &Path, extensions: &[String]) -> Vec<PathBuf> {
    let mut out = vec![base.to_path_buf()];
    out.extend(extensions.iter().map(|ext| with_suffix(base, ext)));
    out.extend(extensions.iter().map(|ext| base.join(format!("index{ext}"))));
    out
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut s: OsString = path.as_os_str().to_owned();
    s.push(suffix);
    PathBuf::from(s)
}

pub fn conventional_locations(root: &Path, name: &str, options: &ResolverOptions) -> Vec<PathBuf> {
    let lower = name.to_lowercase();
    let mut out: Vec<PathBuf> = Vec::new();
    for stem in CONVENTIONAL_STEMS {
        let stem = stem.replace("{Name}", name).replace("{name}", &lower);
        for ext in &options.extensions {
            let path = with_suffix(&root.join(&stem), ext);
            if path.is_file() && !out.contains(&path) {
                out.push(path);
            }
        }
    }
    out
}

/// Every `.ts`/`.tsx` file under `root`, outside of build and vendor output,
/// in a stable order.
pub fn project_sources(root: &Path) -> Vec<PathBuf> {
    let escaped = glob::Pattern::escape(&root.to_string_lossy());
    let mut out = Vec::new();
    for ext in ["ts", "tsx"] {
        let pattern = format!("{escaped}/**/*.{ext}");
        let entries = match glob::glob(&pattern) {
            Ok(entries) => entries,
            Err(error) => {
                tracing::warn!(%pattern, %error, "invalid project scan pattern");
                continue;
            }
        };
        out.extend(entries.filter_map(Result::ok).filter(|p| !is_ignored(root, p)));
    }
    out.sort();
    out
}

fn is_ignored(root: &Path, path: &Path) -> bool {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .any(|c| IGNORED_DIRS.iter().any(|dir| c.as_os_str() == *dir))
}
