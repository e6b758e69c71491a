mod parse;

pub(crate) use parse::parse_opts;

use caddy_routes_lib::Entry;

/// Environment variable naming the source file, checked when --file is absent
pub const SOURCE_PATH_ENV: &str = "CADDYFILE_PATH";

/// Fallback source path when neither --file nor the environment names one
pub const DEFAULT_SOURCE_PATH: &str = "/etc/caddy/Caddyfile";

/// Parsed options
pub struct Opts {
  /// Path of the textual or JSON source document
  pub source_path: String,
  /// Treat the source as a structured JSON document rather than a Caddyfile
  pub json: bool,
  /// Requested operation
  pub command: Command,
}

/// One operation on the flat proxy-entry view
pub enum Command {
  /// Print the current entries
  List,
  /// Replace the whole proxy rule set with the given entries
  Set { entries: Vec<Entry> },
  /// Append entries to the current set
  Add { entries: Vec<Entry> },
  /// Remove entries whose domain list contains any of the given domains
  Remove { domains: Vec<String> },
  /// Print the canonical textual rendering without writing
  Render,
}
