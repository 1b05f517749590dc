//! Utilities for working with output paths.

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};

/// Substitutes every `{code}` and `{lang}` in `pattern`.
pub fn expand_pattern(pattern: &str, code: u16, lang: &str) -> String {
    pattern
        .replace("{code}", &code.to_string())
        .replace("{lang}", lang)
}

/// Path of the error page for `lang`, i.e. `root / subdir / file`.
pub fn destination(root: &Utf8Path, subdir: &str, file: &str) -> Utf8PathBuf {
    root.join(subdir).join(file)
}

/// Normalize a path, removing things like `.` and `..`.
///
/// CAUTION: This does not resolve symlinks (unlike [`std::fs::canonicalize`]).
/// This may cause incorrect or surprising behavior at times. This should be
/// used carefully.
///
/// Adapted from
/// <https://github.com/rust-lang/cargo/blob/f7acf448fc127df9a77c52cc2bba027790ac4931/crates/cargo-util/src/paths.rs#L76-L116>
pub fn normalize_path(path: &Utf8Path) -> Utf8PathBuf {
    let mut components = path.components().peekable();
    let mut ret = if let Some(c @ Utf8Component::Prefix(..)) = components.peek().cloned() {
        components.next();
        Utf8PathBuf::from(c.as_str())
    } else {
        Utf8PathBuf::new()
    };

    for component in components {
        match component {
            Utf8Component::Prefix(..) => unreachable!(),
            Utf8Component::RootDir => {
                ret.push(Utf8Component::RootDir);
            }
            Utf8Component::CurDir => {}
            Utf8Component::ParentDir => {
                if ret.ends_with(Utf8Component::ParentDir) {
                    ret.push(Utf8Component::ParentDir);
                } else {
                    let popped = ret.pop();
                    if !popped && !ret.has_root() {
                        ret.push(Utf8Component::ParentDir);
                    }
                }
            }
            Utf8Component::Normal(c) => {
                ret.push(c);
            }
        }
    }

    if ret.as_str().is_empty() {
        ret.push(".");
    }

    ret
}
