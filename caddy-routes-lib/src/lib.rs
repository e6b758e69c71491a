mod caddyfile;
mod constants;
mod document;
mod entry;
mod error;
mod extract;
mod merge;
mod render;
mod trace;

pub use caddyfile::parse_caddyfile;
pub use constants::{DEFAULT_LISTEN_ADDR, DEFAULT_SERVER_NAME};
pub use document::{Document, Handler, Matcher, Route, Server, Upstream};
pub use entry::Entry;
pub use error::{AdaptError, EntryParseError, FormatError};
pub use extract::extract;
pub use merge::merge;
pub use render::{canonicalize, render};
