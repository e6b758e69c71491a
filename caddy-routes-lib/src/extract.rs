use crate::{document::Document, entry::Entry};

/// Produce the flat proxy-entry view of a document.
///
/// Servers are visited in stored order, routes in declaration order. A route
/// contributes an entry only if it has at least one `host` predicate value and
/// its handler chain contains, at any nesting depth, a reverse-proxy handler
/// with at least one upstream. Anything else is configuration this engine does
/// not manage and is skipped, not reported.
pub fn extract(doc: &Document) -> Vec<Entry> {
  let mut entries = Vec::new();
  for server in doc.servers.values() {
    for route in &server.routes {
      let domains = route.host_names();
      if domains.is_empty() {
        continue;
      }
      let Some(dial) = route.first_dial() else {
        continue;
      };
      entries.push(Entry {
        domains,
        upstream: dial.to_string(),
      });
    }
  }
  entries
}
