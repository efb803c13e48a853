// SPDX-FileCopyrightText: 2026 Motivate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Figment-to-miette error bridge with "did you mean?" suggestions.
//!
//! Deserialization errors from Figment are turned into miette diagnostics
//! carrying a source span (when the offending file can be located), the list
//! of valid keys for the section, and a Jaro-Winkler based suggestion.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Minimum Jaro-Winkler similarity for a suggestion to be offered.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// Why a configuration could not be used.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("`{key}` is not a recognized setting")]
    #[diagnostic(code(motivate::config::unknown_key), help("{}", unknown_key_help(suggestion.as_deref(), valid_keys)))]
    UnknownKey {
        key: String,
        suggestion: Option<String>,
        valid_keys: String,
        #[label("unrecognized")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    #[error("`{key}` has the wrong type: {detail}")]
    #[diagnostic(code(motivate::config::invalid_type), help("use a {expected} here"))]
    InvalidType {
        key: String,
        detail: String,
        expected: String,
    },

    #[error("`{key}` must be set")]
    #[diagnostic(
        code(motivate::config::missing_key),
        help("set `{key}` in motivate.toml or through a MOTIVATE_ environment variable")
    )]
    MissingKey { key: String },

    /// Deserialized fine but failed a semantic check.
    #[error("invalid configuration: {message}")]
    #[diagnostic(code(motivate::config::validation))]
    Validation { message: String },

    #[error("configuration error: {0}")]
    #[diagnostic(code(motivate::config::other))]
    Other(String),
}

fn unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    let known = format!("known settings here: {valid_keys}");
    suggestion.map_or(known.clone(), |s| format!("did you mean `{s}`? {known}"))
}

fn dotted(path: &[String]) -> String {
    path.join(".")
}

/// Splits a figment error into one diagnostic per underlying failure.
///
/// `toml_sources` holds `(path, contents)` of every file that was merged, so
/// unknown keys can be pointed at in the file they came from.
pub fn figment_to_config_errors(
    err: figment::Error,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    use figment::error::Kind;

    let mut out = Vec::new();
    for error in err {
        let converted = match &error.kind {
            Kind::UnknownField(field, expected) => {
                let (span, src) = locate(&error, field, toml_sources).unzip();
                ConfigError::UnknownKey {
                    key: field.clone(),
                    suggestion: suggest_key(field, expected),
                    valid_keys: expected.join(", "),
                    span,
                    src,
                }
            }
            Kind::MissingField(field) => {
                let mut path = error.path.clone();
                path.push(field.to_string());
                ConfigError::MissingKey { key: dotted(&path) }
            }
            Kind::InvalidType(actual, expected) => ConfigError::InvalidType {
                key: dotted(&error.path),
                detail: format!("got {actual}"),
                expected: expected.to_string(),
            },
            _ => ConfigError::Other(error.to_string()),
        };
        out.push(converted);
    }
    out
}

/// Span and named source for `field`, when the error came from a file we read.
fn locate(
    error: &figment::error::Error,
    field: &str,
    toml_sources: &[(String, String)],
) -> Option<(SourceSpan, NamedSource<String>)> {
    let figment::Source::File(file) = error.metadata.as_ref()?.source.as_ref()? else {
        return None;
    };
    let file = file.display().to_string();
    let (name, content) = toml_sources.iter().find(|(name, _)| *name == file)?;
    let offset = find_key_offset(content, &error.path, field)?;
    Some((
        SourceSpan::new(offset.into(), field.len()),
        NamedSource::new(name, content.clone()),
    ))
}

/// Byte offset of `field` in TOML `content`.
///
/// The search starts after the `[section]` header named by `path[0]`, or at
/// the top of the file for top-level keys.
pub fn find_key_offset(content: &str, path: &[String], field: &str) -> Option<usize> {
    let start = match path.first() {
        Some(section) => {
            let header = format!("[{section}]");
            content.find(&header)? + header.len()
        }
        None => 0,
    };

    let mut line_start = start;
    for line in content[start..].split_inclusive('\n') {
        let indent = line.len() - line.trim_start().len();
        let rest = &line[indent..];
        if rest
            .strip_prefix(field)
            .is_some_and(|after| after.starts_with([' ', '\t', '=']))
        {
            return Some(line_start + indent);
        }
        line_start += line.len();
    }
    None
}

/// Closest valid key by Jaro-Winkler similarity, if it is close enough.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    valid_keys
        .iter()
        .map(|key| (strsim::jaro_winkler(unknown, key), *key))
        .filter(|(score, _)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, key)| key.to_string())
}

/// Prints every diagnostic to stderr with miette's graphical renderer.
pub fn render_errors(errors: &[ConfigError]) {
    let handler = miette::GraphicalReportHandler::new();
    for error in errors {
        let mut rendered = String::new();
        match handler.render_report(&mut rendered, error as &dyn Diagnostic) {
            Ok(()) => eprint!("{rendered}"),
            Err(_) => eprintln!("error: {error}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggests_capacity_for_capacty() {
        let valid = &["capacity", "max_entry_bytes"];
        assert_eq!(suggest_key("capacty", valid), Some("capacity".to_string()));
    }

    #[test]
    fn suggests_debounce_ms_for_debounce() {
        let valid = &["debounce_ms"];
        assert_eq!(
            suggest_key("debounce_msec", valid),
            Some("debounce_ms".to_string())
        );
    }

    #[test]
    fn no_suggestion_for_distant_typo() {
        let valid = &["url", "anon_key", "bucket", "request_timeout_secs"];
        assert_eq!(suggest_key("zzzzzz", valid), None);
    }

    #[test]
    fn help_lists_known_settings_with_or_without_suggestion() {
        assert_eq!(
            unknown_key_help(Some("bucket"), "url, bucket"),
            "did you mean `bucket`? known settings here: url, bucket"
        );
        assert_eq!(unknown_key_help(None, "url"), "known settings here: url");
    }

    #[test]
    fn top_level_key_offset_ignores_sections() {
        let content = "debug = true\n[app]\nlog_level = \"info\"\n";
        assert_eq!(find_key_offset(content, &[], "debug"), Some(0));
        assert_eq!(find_key_offset(content, &["cache".to_string()], "capacity"), None);
    }

    #[test]
    fn find_key_offset_in_section() {
        let content = "[app]\nlog_level = \"debug\"\n[cache]\ncapacty = 3\n";
        let path = vec!["cache".to_string()];
        let o = find_key_offset(content, &path, "capacty").unwrap();
        assert_eq!(&content[o..o + 7], "capacty");
    }

    #[test]
    fn unknown_key_conversion_carries_suggestion() {
        let err = crate::loader::load_config_from_str("[cache]\ncapacty = 3\n").unwrap_err();
        let errors = figment_to_config_errors(err, &[]);
        assert!(errors.iter().any(|e| matches!(
            e,
            ConfigError::UnknownKey { key, suggestion: Some(s), .. } if key == "capacty" && s == "capacity"
        )));
    }
}
