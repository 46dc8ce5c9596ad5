//! Account identifier resolution
//!
//! Callers may name an account by its display name (as listed in the
//! `accounts.json` mapping file) or by its numeric customer ID in any
//! formatting (`123-456-7890`, `123 456 7890`, ...). Both reduce to the
//! digits-only [`CustomerId`] the Google Ads API expects.
//!
//! The mapping file is optional and re-read on every call. Any failure to
//! read or parse it is treated as "no mapping": resolution then falls back to
//! parsing the input as a numeric ID. Entries whose value is not a string are
//! skipped the same way. When names differ only by case, the entry appearing
//! last in the file wins.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{Error, Result};

/// File name of the account mapping, looked up beside the executable
pub const ACCOUNTS_FILE_NAME: &str = "accounts.json";

/// Digits-only Google Ads customer ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CustomerId(String);

impl CustomerId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CustomerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A named account from the mapping file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountEntry {
    pub name: String,
    pub customer_id: CustomerId,
}

/// Resolves account names and loosely formatted IDs to [`CustomerId`]s
#[derive(Debug, Clone)]
pub struct AccountResolver {
    mapping_path: PathBuf,
}

impl AccountResolver {
    /// Create a resolver reading the mapping from the given path
    pub fn new(mapping_path: impl Into<PathBuf>) -> Self {
        Self {
            mapping_path: mapping_path.into(),
        }
    }

    pub fn mapping_path(&self) -> &Path {
        &self.mapping_path
    }

    /// Resolve an account name or numeric ID to a digits-only customer ID.
    ///
    /// Name lookup is case-insensitive and takes priority over numeric
    /// parsing. A mapped ID is trusted as-is once its separators are
    /// stripped.
    pub fn resolve(&self, identifier: &str) -> Result<CustomerId> {
        let identifier = identifier.trim();

        if let Some(mapping) = self.load_mapping() {
            let needle = identifier.to_lowercase();
            let matched = mapping
                .iter()
                .rev()
                .find(|(name, _)| name.to_lowercase() == needle);
            match matched {
                Some((_, Value::String(raw_id))) => {
                    let id = strip_non_digits(raw_id);
                    debug!("Resolved account '{}' by name to {}", identifier, id);
                    return Ok(CustomerId(id));
                }
                Some((name, _)) => {
                    debug!("Ignoring non-string mapping entry '{}'", name);
                }
                None => {}
            }
        }

        let id = strip_non_digits(identifier);
        if id.is_empty() {
            if identifier.chars().any(|c| c.is_ascii_alphabetic()) {
                return Err(Error::InvalidAccount(format!(
                    "Account '{}' not found in the list of known accounts.",
                    identifier
                )));
            }
            return Err(Error::InvalidAccount(
                "Customer ID is empty or invalid.".to_string(),
            ));
        }

        Ok(CustomerId(id))
    }

    /// List the accounts in the mapping file, sorted by name.
    ///
    /// Same soft-fail rules as [`resolve`](Self::resolve): an unreadable or
    /// malformed file yields an empty list.
    pub fn accounts(&self) -> Vec<AccountEntry> {
        let mut entries: Vec<AccountEntry> = self
            .load_mapping()
            .unwrap_or_default()
            .into_iter()
            .filter_map(|(name, raw_id)| match raw_id {
                Value::String(raw_id) => Some(AccountEntry {
                    customer_id: CustomerId(strip_non_digits(&raw_id)),
                    name,
                }),
                _ => None,
            })
            .collect();
        entries.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        entries
    }

    /// Best-effort read of the mapping file; `None` on any failure
    fn load_mapping(&self) -> Option<Map<String, Value>> {
        if !self.mapping_path.exists() {
            return None;
        }
        let contents = match std::fs::read_to_string(&self.mapping_path) {
            Ok(contents) => contents,
            Err(e) => {
                debug!(
                    "Ignoring unreadable account mapping {}: {}",
                    self.mapping_path.display(),
                    e
                );
                return None;
            }
        };
        match serde_json::from_str(&contents) {
            Ok(mapping) => Some(mapping),
            Err(e) => {
                debug!(
                    "Ignoring malformed account mapping {}: {}",
                    self.mapping_path.display(),
                    e
                );
                None
            }
        }
    }
}

/// `accounts.json` next to the current executable (or the working directory
/// if the executable path is unavailable)
pub fn default_mapping_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_default()
        .join(ACCOUNTS_FILE_NAME)
}

fn strip_non_digits(s: &str) -> String {
    s.chars().filter(char::is_ascii_digit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    fn resolver_with(contents: &str) -> (NamedTempFile, AccountResolver) {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        let resolver = AccountResolver::new(file.path());
        (file, resolver)
    }

    fn missing_file_resolver() -> (TempDir, AccountResolver) {
        let dir = TempDir::new().unwrap();
        let resolver = AccountResolver::new(dir.path().join(ACCOUNTS_FILE_NAME));
        (dir, resolver)
    }

    const MAPPING: &str = r#"{
        "Agro Baggio": "123-456-7890",
        "Loja Centro": "987 654 3210",
        "555": "111-222-3333"
    }"#;

    #[test]
    fn test_resolves_name_case_insensitively() {
        let (_file, resolver) = resolver_with(MAPPING);
        for name in ["Agro Baggio", "agro baggio", "AGRO BAGGIO", "  aGrO bAgGiO  "] {
            assert_eq!(resolver.resolve(name).unwrap().as_str(), "1234567890");
        }
        assert_eq!(resolver.resolve("loja centro").unwrap().as_str(), "9876543210");
    }

    #[test]
    fn test_numeric_input_with_separators() {
        let (_file, resolver) = resolver_with(MAPPING);
        assert_eq!(
            resolver.resolve("123-456-7890").unwrap().as_str(),
            "1234567890"
        );
        assert_eq!(resolver.resolve(" 42 ").unwrap().as_str(), "42");
    }

    #[test]
    fn test_name_lookup_beats_numeric_parsing() {
        let (_file, resolver) = resolver_with(MAPPING);
        assert_eq!(resolver.resolve("555").unwrap().as_str(), "1112223333");
    }

    #[test]
    fn test_unknown_name_is_not_found() {
        let (_file, resolver) = resolver_with(MAPPING);
        let err = resolver.resolve("Unknown Shop").unwrap_err();
        assert!(matches!(err, Error::InvalidAccount(_)));
        assert!(err.to_string().contains("'Unknown Shop'"));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_empty_and_whitespace_are_invalid() {
        let (_dir, resolver) = missing_file_resolver();
        for input in ["", "   ", "\t\n", "---"] {
            let err = resolver.resolve(input).unwrap_err();
            assert!(matches!(err, Error::InvalidAccount(_)));
            assert_eq!(err.to_string(), "Customer ID is empty or invalid.");
        }
    }

    #[test]
    fn test_missing_file_falls_back_to_numeric() {
        let (_dir, resolver) = missing_file_resolver();
        assert_eq!(
            resolver.resolve("123-456-7890").unwrap().as_str(),
            "1234567890"
        );
        let err = resolver.resolve("Agro Baggio").unwrap_err();
        assert!(err.to_string().contains("'Agro Baggio'"));
    }

    #[test]
    fn test_malformed_file_falls_back_to_numeric() {
        let (_file, resolver) = resolver_with("{ not json");
        assert_eq!(resolver.resolve("1-2-3").unwrap().as_str(), "123");
        assert!(resolver.resolve("Agro Baggio").is_err());
    }

    #[test]
    fn test_non_string_values_fall_back_to_numeric() {
        let (_file, resolver) = resolver_with(r#"{"Agro Baggio": 1234567890}"#);
        assert!(resolver.resolve("Agro Baggio").is_err());
        assert_eq!(resolver.resolve("77").unwrap().as_str(), "77");
    }

    #[test]
    fn test_non_string_entry_does_not_hide_others() {
        let (_file, resolver) =
            resolver_with(r#"{"Agro Baggio": "123-456-7890", "Other": null}"#);
        assert_eq!(
            resolver.resolve("agro baggio").unwrap().as_str(),
            "1234567890"
        );
        assert!(resolver.resolve("other").is_err());

        let names: Vec<String> = resolver.accounts().into_iter().map(|a| a.name).collect();
        assert_eq!(names, vec!["Agro Baggio"]);
    }

    #[test]
    fn test_case_collision_last_entry_wins() {
        let (_file, resolver) = resolver_with(r#"{"Shop": "111", "SHOP": "222"}"#);
        for _ in 0..20 {
            assert_eq!(resolver.resolve("shop").unwrap().as_str(), "222");
        }

        let (_file, resolver) = resolver_with(r#"{"SHOP": "222", "Shop": "111"}"#);
        assert_eq!(resolver.resolve("Shop").unwrap().as_str(), "111");
    }

    #[test]
    fn test_mapping_is_reread_on_each_call() {
        let (file, resolver) = resolver_with(r#"{"Shop": "1"}"#);
        assert_eq!(resolver.resolve("shop").unwrap().as_str(), "1");

        std::fs::write(file.path(), r#"{"Shop": "2"}"#).unwrap();
        assert_eq!(resolver.resolve("shop").unwrap().as_str(), "2");
    }

    #[test]
    fn test_mapped_value_without_digits_is_returned_as_is() {
        // The mapping is trusted; no validation after stripping
        let (_file, resolver) = resolver_with(r#"{"Broken": "n/a"}"#);
        assert_eq!(resolver.resolve("broken").unwrap().as_str(), "");
    }

    #[test]
    fn test_list_accounts_sorted() {
        let (_file, resolver) = resolver_with(MAPPING);
        let names: Vec<String> = resolver.accounts().into_iter().map(|a| a.name).collect();
        assert_eq!(names, vec!["555", "Agro Baggio", "Loja Centro"]);

        let (_dir, missing) = missing_file_resolver();
        assert!(missing.accounts().is_empty());
    }
}
