//! Language profiles: the static rules governing how the scanner
//! classifies one file.
//!
//! A [`LanguageProfile`] is consumed read-only by the scanner. The
//! constructors derive the two fast-reject byte sets from the declared
//! sequences and register longer delimiters ahead of shorter ones sharing
//! a prefix, so the scanner's first-match tie-break always picks the
//! longest candidate.

use hashbrown::HashMap;
use std::sync::Arc;

/// Open/close delimiter pair for strings and multi-line comments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenClose {
    pub open: Vec<u8>,
    pub close: Vec<u8>,
}

impl OpenClose {
    #[must_use]
    pub fn new(open: &str, close: &str) -> Self {
        Self {
            open: open.as_bytes().to_vec(),
            close: close.as_bytes().to_vec(),
        }
    }
}

/// Comment, string and complexity rules for one language.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguageProfile {
    /// Byte sequences opening a comment that runs to end of line.
    pub single_line_comments: Vec<Vec<u8>>,
    /// Open/close pairs for multi-line comments.
    pub multi_line_comments: Vec<OpenClose>,
    /// Open/close pairs for string-like delimiters.
    pub string_checks: Vec<OpenClose>,
    /// Byte sequences recognized as complexity tokens.
    pub complexity_checks: Vec<Vec<u8>>,
    /// First bytes appearing in any complexity token.
    pub complexity_bytes: Vec<u8>,
    /// First bytes any code-state transition could consume.
    pub process_bytes: Vec<u8>,
    /// Whether multi-line comments of this language may nest.
    pub nested: bool,
}

impl LanguageProfile {
    /// Build a profile from string delimiters, deriving the fast-reject
    /// byte sets. Empty sequences are dropped.
    #[must_use]
    pub fn new(
        single_line_comments: &[&str],
        multi_line_comments: &[(&str, &str)],
        string_checks: &[(&str, &str)],
        complexity_checks: &[&str],
        nested: bool,
    ) -> Self {
        let mut single_line_comments: Vec<Vec<u8>> = single_line_comments
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| s.as_bytes().to_vec())
            .collect();
        single_line_comments.sort_by_key(|s| std::cmp::Reverse(s.len()));

        let mut multi_line_comments: Vec<OpenClose> = multi_line_comments
            .iter()
            .filter(|(open, close)| !open.is_empty() && !close.is_empty())
            .map(|(open, close)| OpenClose::new(open, close))
            .collect();
        multi_line_comments.sort_by_key(|pair| std::cmp::Reverse(pair.open.len()));

        let mut string_checks: Vec<OpenClose> = string_checks
            .iter()
            .filter(|(open, close)| !open.is_empty() && !close.is_empty())
            .map(|(open, close)| OpenClose::new(open, close))
            .collect();
        string_checks.sort_by_key(|pair| std::cmp::Reverse(pair.open.len()));

        let mut complexity_checks: Vec<Vec<u8>> = complexity_checks
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| s.as_bytes().to_vec())
            .collect();
        complexity_checks.sort_by_key(|s| std::cmp::Reverse(s.len()));

        let complexity_bytes = first_bytes(complexity_checks.iter().map(Vec::as_slice));
        let process_bytes = first_bytes(
            string_checks
                .iter()
                .map(|pair| pair.open.as_slice())
                .chain(single_line_comments.iter().map(Vec::as_slice))
                .chain(multi_line_comments.iter().map(|pair| pair.open.as_slice()))
                .chain(complexity_checks.iter().map(Vec::as_slice)),
        );

        Self {
            single_line_comments,
            multi_line_comments,
            string_checks,
            complexity_checks,
            complexity_bytes,
            process_bytes,
            nested,
        }
    }

    /// No comments, no strings: every non-whitespace line is code.
    #[must_use]
    pub fn plain() -> Self {
        Self::new(&[], &[], &[], &[], false)
    }

    /// C-family languages: `//`, `/* */`, double and single quoted strings.
    #[must_use]
    pub fn c() -> Self {
        Self::new(
            &["//"],
            &[("/*", "*/")],
            &[("\"", "\""), ("'", "'")],
            &[
                "for", "if", "switch", "while", "else", "case", "||", "&&", "!=", "==",
            ],
            false,
        )
    }

    /// Rust: C-family delimiters with nesting block comments.
    #[must_use]
    pub fn rust() -> Self {
        Self::new(
            &["//"],
            &[("/*", "*/")],
            &[("\"", "\"")],
            &[
                "for", "if", "match", "while", "loop", "else", "||", "&&", "!=", "==",
            ],
            true,
        )
    }

    /// Go: C-family plus backtick raw strings.
    #[must_use]
    pub fn go() -> Self {
        Self::new(
            &["//"],
            &[("/*", "*/")],
            &[("\"", "\""), ("`", "`"), ("'", "'")],
            &[
                "for", "if", "switch", "select", "case", "else", "||", "&&", "!=", "==",
            ],
            false,
        )
    }

    /// Python: hash comments, triple-quoted and plain strings.
    #[must_use]
    pub fn python() -> Self {
        Self::new(
            &["#"],
            &[],
            &[
                ("\"\"\"", "\"\"\""),
                ("'''", "'''"),
                ("\"", "\""),
                ("'", "'"),
            ],
            &["for", "if", "elif", "while", "and", "or", "not", "except"],
            false,
        )
    }

    /// Shell-style hash comments: sh, yaml, toml and friends. The comment
    /// opener shares its leading byte with nothing, but quoted strings do
    /// appear after code.
    #[must_use]
    pub fn shell() -> Self {
        Self::new(
            &["#"],
            &[],
            &[("\"", "\""), ("'", "'")],
            &["for", "if", "elif", "while", "case", "until"],
            false,
        )
    }
}

fn first_bytes<'a>(sequences: impl Iterator<Item = &'a [u8]>) -> Vec<u8> {
    let mut bytes = Vec::new();
    for sequence in sequences {
        if let Some(&first) = sequence.first() {
            if !bytes.contains(&first) {
                bytes.push(first);
            }
        }
    }
    bytes
}

/// Maps a file extension to the name of a built-in profile.
#[must_use]
pub fn language_for_extension(extension: &str) -> &'static str {
    match extension.to_lowercase().as_str() {
        "c" | "h" | "cpp" | "cc" | "cxx" | "hpp" | "hh" | "cs" | "java" | "js" | "mjs"
        | "jsx" | "ts" | "tsx" | "swift" | "kt" | "scala" | "dart" | "css" | "proto" => "c",
        "rs" => "rust",
        "go" => "go",
        "py" | "pyw" | "pyi" => "python",
        "sh" | "bash" | "zsh" | "fish" | "yml" | "yaml" | "toml" | "mk" | "cmake"
        | "dockerfile" | "tf" | "nix" => "shell",
        _ => "text",
    }
}

/// Read-only mapping from language key to profile, shared across the
/// pipeline stages.
#[derive(Debug, Clone)]
pub struct LanguageRegistry {
    profiles: HashMap<String, Arc<LanguageProfile>>,
    fallback: Arc<LanguageProfile>,
}

impl LanguageRegistry {
    /// An empty registry; every lookup falls back to the plain profile.
    #[must_use]
    pub fn new() -> Self {
        Self {
            profiles: HashMap::new(),
            fallback: Arc::new(LanguageProfile::plain()),
        }
    }

    /// Registry pre-populated with the built-in profiles.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register("c", LanguageProfile::c());
        registry.register("rust", LanguageProfile::rust());
        registry.register("go", LanguageProfile::go());
        registry.register("python", LanguageProfile::python());
        registry.register("shell", LanguageProfile::shell());
        registry.register("text", LanguageProfile::plain());
        registry
    }

    pub fn register(&mut self, name: impl Into<String>, profile: LanguageProfile) {
        self.profiles.insert(name.into(), Arc::new(profile));
    }

    /// Profile for `name`; unregistered keys resolve to the plain profile,
    /// which classifies every non-blank line as code.
    #[must_use]
    pub fn get(&self, name: &str) -> Arc<LanguageProfile> {
        self.profiles
            .get(name)
            .unwrap_or(&self.fallback)
            .clone()
    }
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_longer_delimiters_sort_first() {
        let profile = LanguageProfile::python();
        assert_eq!(profile.string_checks[0].open, b"\"\"\"");
        assert_eq!(profile.string_checks[1].open, b"'''");
        assert!(profile.string_checks[2].open.len() == 1);
    }

    #[test]
    fn test_process_bytes_derived_from_all_sets() {
        let profile = LanguageProfile::c();
        assert!(profile.process_bytes.contains(&b'/'));
        assert!(profile.process_bytes.contains(&b'"'));
        assert!(profile.process_bytes.contains(&b'\''));
        assert!(profile.process_bytes.contains(&b'f')); // "for"
        assert!(profile.process_bytes.contains(&b'|'));
        assert!(!profile.process_bytes.contains(&b'x'));
    }

    #[test]
    fn test_complexity_bytes_deduplicated() {
        let profile = LanguageProfile::c();
        let count = profile
            .complexity_bytes
            .iter()
            .filter(|&&b| b == b'e')
            .count();
        // "else" and "==" start differently, but "else" shares 'e' with nothing else
        assert_eq!(count, 1);
    }

    #[test]
    fn test_empty_sequences_dropped() {
        let profile = LanguageProfile::new(&[""], &[("", "x")], &[("\"", "")], &[""], false);
        assert!(profile.single_line_comments.is_empty());
        assert!(profile.multi_line_comments.is_empty());
        assert!(profile.string_checks.is_empty());
        assert!(profile.complexity_checks.is_empty());
        assert!(profile.process_bytes.is_empty());
    }

    #[test]
    fn test_extension_lookup() {
        assert_eq!(language_for_extension("RS"), "rust");
        assert_eq!(language_for_extension("cpp"), "c");
        assert_eq!(language_for_extension("yaml"), "shell");
        assert_eq!(language_for_extension("weird"), "text");
    }

    #[test]
    fn test_registry_falls_back_to_plain() {
        let registry = LanguageRegistry::builtin();
        let profile = registry.get("klingon");
        assert!(profile.single_line_comments.is_empty());
        assert!(profile.string_checks.is_empty());
    }
}
