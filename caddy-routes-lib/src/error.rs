/// Errors surfaced by the text/JSON to document adapters
#[derive(thiserror::Error, Debug)]
pub enum AdaptError {
  /* --------------------------------------- */
  /// A closing brace with no site block open
  #[error("Unexpected '}}' outside of a site block (line {line})")]
  UnexpectedCloseBrace { line: usize },

  /// A directive before any site block was opened
  #[error("Directive outside of a site block (line {line}): {directive}")]
  DirectiveOutsideBlock { line: usize, directive: String },

  /// A site block left open at the end of input
  #[error("Site block opened at line {line} is never closed")]
  UnclosedBlock { line: usize },

  /* --------------------------------------- */
  /// Structured JSON source could not be deserialized
  #[error("Invalid JSON document: {0}")]
  Json(#[from] serde_json::Error),
}

/// Canonicalizer failure. Non-fatal: callers fall back to the unformatted text.
#[derive(thiserror::Error, Debug)]
pub enum FormatError {
  #[error("Unbalanced braces in rendered output")]
  UnbalancedBraces,
}

/// A flat-entry argument that does not follow the `<domains>=<upstream>` form
#[derive(thiserror::Error, Debug)]
pub enum EntryParseError {
  #[error("Entry must be in the form '<domains>=<upstream>', got: {0}")]
  MissingSeparator(String),
}
