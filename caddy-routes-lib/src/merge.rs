use crate::{
  document::{Document, Route},
  entry::{Entry, split_domains},
  trace::debug,
};

/// Replace the proxy rule set of a document with the submitted entries.
///
/// Entries with a blank domain list or blank upstream are silently dropped;
/// callers wanting validation feedback compare list lengths before and after.
/// Duplicates are kept and each produces its own route, in submission order.
///
/// Every proxy-bearing route is removed whole, never edited in place. The
/// retained non-proxy routes keep their original order and are followed by one
/// freshly built route per surviving entry. The replacement is broadcast to
/// every server in the document; the flat entry model has no server-selection
/// concept, a documented limitation of this design.
///
/// This operation has no I/O and does not fail.
pub fn merge(mut doc: Document, entries: &[Entry]) -> Document {
  let surviving = normalize_entries(entries);
  if surviving.len() < entries.len() {
    debug!("Dropped {} invalid entries during merge", entries.len() - surviving.len());
  }

  doc.ensure_server();

  for server in doc.servers.values_mut() {
    let mut routes: Vec<Route> = std::mem::take(&mut server.routes)
      .into_iter()
      .filter(|route| !route.is_proxy_bearing())
      .collect();
    routes.extend(
      surviving
        .iter()
        .map(|entry| Route::proxy(entry.domains.clone(), entry.upstream.clone())),
    );
    server.routes = routes;
  }
  doc
}

/// Trim and re-split submitted entries, dropping the invalid ones.
/// Submission order is preserved; nothing is deduplicated.
fn normalize_entries(entries: &[Entry]) -> Vec<Entry> {
  entries
    .iter()
    .filter_map(|entry| {
      let domains: Vec<String> = entry.domains.iter().flat_map(|d| split_domains(d)).collect();
      let upstream = entry.upstream.trim();
      if domains.is_empty() || upstream.is_empty() {
        return None;
      }
      Some(Entry {
        domains,
        upstream: upstream.to_string(),
      })
    })
    .collect()
}
