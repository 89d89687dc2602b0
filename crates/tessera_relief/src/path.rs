//! Canonical file-path keys.
//!
//! Every file-path key in the store goes through [`normalize_path`] so that
//! `a/b.ts`, `a\b.ts` and `a/./x/../b.ts` all land on the same entry.
//! Normalization is purely lexical and never touches the file system.

use std::fmt;

use serde::{Serialize, Serializer};

/// A lexically normalized file path using `/` as separator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedPath(String);

impl NormalizedPath {
    /// Normalize `path`.
    #[inline]
    pub fn new(path: &str) -> Self {
        normalize_path(path)
    }

    /// The normalized path as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the path is rooted (`/x` or `C:/x`).
    pub fn is_absolute(&self) -> bool {
        let bytes = self.0.as_bytes();
        bytes.first() == Some(&b'/')
            || (bytes.len() >= 3 && bytes[1] == b':' && bytes[2] == b'/')
    }

    /// Component-aware prefix test.
    ///
    /// `/p` is a prefix of `/p` and `/p/a.ts` but not of `/p2/a.ts`.
    pub fn starts_with(&self, prefix: &NormalizedPath) -> bool {
        self.relative_to(prefix).is_some()
    }

    /// The remainder of this path below `root`, or `None` if `root` is not a
    /// component prefix. A path is relative to itself with an empty remainder.
    pub fn relative_to(&self, root: &NormalizedPath) -> Option<&str> {
        if root.0 == "." {
            return (!self.is_absolute()).then_some(self.0.as_str());
        }

        let rest = self.0.strip_prefix(root.0.as_str())?;
        if rest.is_empty() || root.0.ends_with('/') {
            Some(rest)
        } else {
            rest.strip_prefix('/')
        }
    }

    /// Path components, excluding the root.
    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|c| !c.is_empty())
    }

    /// Consume into the inner string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for NormalizedPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Normalize a file path.
///
/// - `\` and `/` are both treated as separators; the output uses `/`
/// - repeated separators collapse, `.` segments disappear
/// - `..` removes the previous segment, is dropped at an absolute root and
///   kept for relative paths that climb above their start
/// - trailing separators are dropped (except for the root itself)
/// - a drive letter is upper-cased; on Windows the rest is lower-cased
/// - the empty path becomes `.`
pub fn normalize_path(path: &str) -> NormalizedPath {
    let unified = path.replace('\\', "/");
    let bytes = unified.as_bytes();

    let (mut prefix, rest) =
        if bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' {
            let mut drive = String::with_capacity(3);
            drive.push(char::from(bytes[0].to_ascii_uppercase()));
            drive.push(':');
            (drive, &unified[2..])
        } else {
            (String::new(), unified.as_str())
        };

    let absolute = rest.starts_with('/');
    if absolute {
        prefix.push('/');
    }

    let mut segments: Vec<&str> = Vec::new();
    for segment in rest.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(last) if *last != ".." => {
                    segments.pop();
                }
                _ if absolute => {}
                _ => segments.push(".."),
            },
            other => segments.push(other),
        }
    }

    let mut normalized = prefix;
    normalized.push_str(&fold_case(&segments.join("/")));

    if normalized.is_empty() {
        normalized.push('.');
    }

    NormalizedPath(normalized)
}

#[cfg(windows)]
fn fold_case(path: &str) -> String {
    path.to_lowercase()
}

#[cfg(not(windows))]
fn fold_case(path: &str) -> String {
    path.to_string()
}
