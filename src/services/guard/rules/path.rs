//! Path based rule: protected prefixes with glob exemptions.
//!
//! Ignore globs are relative to each protected prefix. Every `<prefix><ignore>`
//! pair is compiled once into a glob set with `*` stopping at `/`, brace
//! alternation (`/{public,assets}`) and `**` accepted anywhere. An ignore match
//! always wins over a protected prefix.
//!
//! The host takes part in the comparison only as a literal that is identical on
//! both sides (`http://<host><path>` vs `http://<host><prefix><ignore>`), so the
//! match reduces to the path alone.

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

use crate::error::ConfigError;

use super::Rule;

#[derive(Debug, Clone)]
pub struct PathRule {
    paths: Vec<String>,
    ignored: GlobSet,
}

impl PathRule {
    pub fn new(paths: Vec<String>, ignore: Vec<String>) -> Result<Self, ConfigError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &ignore {
            for base in &paths {
                let combined = format!("{base}{pattern}");
                let glob = GlobBuilder::new(&combined)
                    .literal_separator(true)
                    .build()
                    .map_err(|source| ConfigError::InvalidIgnorePattern {
                        pattern: combined.clone(),
                        source,
                    })?;
                builder.add(glob);
            }
        }

        let ignored = builder.build().map_err(|source| ConfigError::InvalidIgnorePattern {
            pattern: ignore.join(","),
            source,
        })?;

        Ok(Self { paths, ignored })
    }

    fn is_ignored(&self, path: &str) -> bool {
        self.ignored.is_match(path)
    }

    fn is_protected(&self, path: &str) -> bool {
        self.paths.iter().any(|base| {
            let base = base.trim_end_matches('/');
            match path.strip_prefix(base) {
                Some(rest) => rest.is_empty() || rest.starts_with('/'),
                None => false,
            }
        })
    }
}

impl Rule for PathRule {
    fn evaluate(&self, path: &str, _host: &str) -> bool {
        let path = collapse_slashes(path);

        if self.is_ignored(&path) {
            return false;
        }

        self.is_protected(&path)
    }
}

/// `//a///b` -> `/a/b`
fn collapse_slashes(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut prev_slash = false;
    for c in path.chars() {
        if c == '/' {
            if prev_slash {
                continue;
            }
            prev_slash = true;
        } else {
            prev_slash = false;
        }
        out.push(c);
    }
    out
}
