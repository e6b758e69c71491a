use crate::error::EntryParseError;
use std::{fmt, str::FromStr};

/// The flat, user-editable unit: a set of hostnames routed to one upstream
/// dial address. Derived from a proxy-bearing route on extraction and turned
/// back into one on merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
  /// Hostnames in declaration order, comma-joined for display
  pub domains: Vec<String>,
  /// Dial address of the upstream, e.g. `127.0.0.1:8080`
  pub upstream: String,
}

impl Entry {
  /// Build an entry from raw user input: a comma-separated domain list and an
  /// upstream string. Both sides are trimmed; empty domain fragments are dropped.
  pub fn new(domains: &str, upstream: &str) -> Self {
    Self {
      domains: split_domains(domains),
      upstream: upstream.trim().to_string(),
    }
  }

  /// An entry with no domains or no upstream is excluded from a merge
  pub fn is_valid(&self) -> bool {
    !self.domains.is_empty() && !self.upstream.is_empty()
  }

  /// Comma-joined domain list as shown to the user
  pub fn domain_list(&self) -> String {
    self.domains.join(",")
  }

  /// Build entries from position-paired domain/upstream lists, the form the
  /// hosting layer supplies. Index i of one list corresponds to index i of the other.
  pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Vec<Self> {
    pairs.into_iter().map(|(domains, upstream)| Self::new(domains, upstream)).collect()
  }
}

/// Split a comma-separated domain list, trimming each fragment
pub(crate) fn split_domains(domains: &str) -> Vec<String> {
  domains
    .split(',')
    .map(str::trim)
    .filter(|d| !d.is_empty())
    .map(str::to_string)
    .collect()
}

impl fmt::Display for Entry {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} -> {}", self.domain_list(), self.upstream)
  }
}

impl FromStr for Entry {
  type Err = EntryParseError;

  /// Parses the `<domains>=<upstream>` form, e.g. `a.com,www.a.com=127.0.0.1:8080`
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let Some((domains, upstream)) = s.split_once('=') else {
      return Err(EntryParseError::MissingSeparator(s.to_string()));
    };
    Ok(Self::new(domains, upstream))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_new_splits_and_trims() {
    let entry = Entry::new(" a.example.com, b.example.com ,", " 127.0.0.1:8080 ");
    assert_eq!(entry.domains, vec!["a.example.com", "b.example.com"]);
    assert_eq!(entry.upstream, "127.0.0.1:8080");
    assert!(entry.is_valid());
  }

  #[test]
  fn test_blank_fields_are_invalid() {
    assert!(!Entry::new("", "127.0.0.1:8080").is_valid());
    assert!(!Entry::new(" , ", "127.0.0.1:8080").is_valid());
    assert!(!Entry::new("a.example.com", "   ").is_valid());
  }

  #[test]
  fn test_parse_entry() {
    let entry = "a.com,www.a.com=10.0.0.1:9000".parse::<Entry>().unwrap();
    assert_eq!(entry.domains, vec!["a.com", "www.a.com"]);
    assert_eq!(entry.upstream, "10.0.0.1:9000");

    assert!("no-separator".parse::<Entry>().is_err());
  }

  #[test]
  fn test_display_joins_domains_with_comma() {
    let entry = Entry::new("a.com,b.com", "10.0.0.1:9000");
    assert_eq!(entry.to_string(), "a.com,b.com -> 10.0.0.1:9000");
  }

  #[test]
  fn test_from_pairs_keeps_positions() {
    let entries = Entry::from_pairs(vec![("a.com", "127.0.0.1:8080"), ("b.com", "127.0.0.1:8081")]);
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].upstream, "127.0.0.1:8080");
    assert_eq!(entries[1].domains, vec!["b.com"]);
  }
}
