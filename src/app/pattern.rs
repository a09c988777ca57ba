use crate::app::error::{DumpError, Result};
use regex::Regex;

/// A glob compiled to an anchored regex.
///
/// `**` matches across separators, `*` and `?` stay within one path segment,
/// and `[...]` classes are passed through to the regex engine untouched.
#[derive(Debug, Clone)]
pub struct GlobPattern {
    source: String,
    regex: Regex,
}

impl GlobPattern {
    pub fn new(pattern: &str) -> Result<Self> {
        let translated = glob_to_regex(pattern)?;
        let regex = Regex::new(&translated).map_err(|e| DumpError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Tests the bare and `/`-prefixed forms of `relative`, plus their
    /// trailing-slash variants when `is_dir` is set.
    pub fn matches(&self, relative: &str, is_dir: bool) -> bool {
        let rooted = format!("/{relative}");
        if self.regex.is_match(relative) || self.regex.is_match(&rooted) {
            return true;
        }
        is_dir
            && (self.regex.is_match(&format!("{relative}/"))
                || self.regex.is_match(&format!("{rooted}/")))
    }
}

fn glob_to_regex(pattern: &str) -> Result<String> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::from("^");
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '*' if chars.get(i + 1) == Some(&'*') => {
                out.push_str(".*");
                i += 2;
                continue;
            }
            '*' => out.push_str("[^/]*"),
            '?' => out.push_str("[^/]"),
            '[' => {
                let close = chars[i + 1..]
                    .iter()
                    .position(|&c| c == ']')
                    .ok_or_else(|| DumpError::InvalidPattern {
                        pattern: pattern.to_string(),
                        reason: "unterminated character class".to_string(),
                    })?;
                let end = i + 1 + close;
                out.extend(&chars[i..=end]);
                i = end + 1;
                continue;
            }
            c => out.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
        }
        i += 1;
    }

    out.push('$');
    Ok(out)
}

/// Compiles every pattern up front; the first bad one aborts.
pub fn compile_all(patterns: &[String]) -> Result<Vec<GlobPattern>> {
    patterns.iter().map(|p| GlobPattern::new(p)).collect()
}
