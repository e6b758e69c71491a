use crate::{
  constants::{DEFAULT_LISTEN_ADDR, DEFAULT_SERVER_NAME},
  error::AdaptError,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Root of the structured routing configuration.
///
/// A document is constructed fresh from its textual or JSON source for every
/// read-modify-write cycle and discarded after rendering. It is never shared
/// across requests.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
  /// Servers keyed by name. Server names carry no semantics beyond map
  /// uniqueness; the sorted map keeps iteration deterministic across runs.
  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  pub servers: BTreeMap<String, Server>,
}

impl Document {
  /// Deserialize a document from its structured JSON form
  pub fn from_json(src: &str) -> Result<Self, AdaptError> {
    Ok(serde_json::from_str(src)?)
  }

  /// Serialize the document to its structured JSON form
  pub fn to_json(&self) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(self)
  }

  /// Synthesize a default server if the document has none
  pub(crate) fn ensure_server(&mut self) {
    if self.servers.is_empty() {
      self
        .servers
        .insert(DEFAULT_SERVER_NAME.to_string(), Server::with_default_listen());
    }
  }
}

/// One HTTP server: listen addresses (opaque passthrough) and an ordered route list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Server {
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub listen: Vec<String>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub routes: Vec<Route>,
}

impl Server {
  /// A server with the default listen address and no routes
  pub fn with_default_listen() -> Self {
    Self {
      listen: vec![DEFAULT_LISTEN_ADDR.to_string()],
      routes: Vec::new(),
    }
  }
}

/// One routing rule: match predicates plus an ordered handler chain.
/// Chain order is semantically significant at runtime and is preserved on
/// round-trip unless the route is replaced as a whole.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Route {
  #[serde(rename = "match", default, skip_serializing_if = "Vec::is_empty")]
  pub matchers: Vec<Matcher>,
  #[serde(rename = "handle", default, skip_serializing_if = "Vec::is_empty")]
  pub handlers: Vec<Handler>,
}

impl Route {
  /// Build the single-matcher, single-upstream route a flat entry maps to
  pub fn proxy(hosts: Vec<String>, dial: impl Into<String>) -> Self {
    Self {
      matchers: vec![Matcher {
        host: hosts,
        extra: Map::new(),
      }],
      handlers: vec![Handler::ReverseProxy {
        upstreams: vec![Upstream { dial: dial.into() }],
      }],
    }
  }

  /// Whether any handler in the chain, at any nesting depth, is a reverse proxy.
  /// Computed on demand, never stored.
  pub fn is_proxy_bearing(&self) -> bool {
    self.handlers.iter().any(Handler::contains_reverse_proxy)
  }

  /// Concatenation of all matchers' host lists, verbatim and in declaration order
  pub fn host_names(&self) -> Vec<String> {
    self.matchers.iter().flat_map(|m| m.host.iter().cloned()).collect()
  }

  /// Dial address of the first reverse-proxy handler found depth-first,
  /// left-to-right in the chain. Proxy handlers with no upstreams are
  /// treated as not found and the search continues.
  pub fn first_dial(&self) -> Option<&str> {
    self.handlers.iter().find_map(Handler::first_dial)
  }
}

/// A set of named match predicates. Only `host` is interpreted here; anything
/// else is carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Matcher {
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub host: Vec<String>,
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

/// One step in a route's handler chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "handler", rename_all = "snake_case")]
pub enum Handler {
  ReverseProxy {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    upstreams: Vec<Upstream>,
  },
  FileServer {
    /// Uninterpreted file_server options, preserved on JSON round-trip
    #[serde(flatten)]
    options: Map<String, Value>,
  },
  Vars {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    root: Option<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
  },
  Subroute {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    routes: Vec<Route>,
  },
  /// Any handler type not enumerated above, kept as its raw payload
  #[serde(untagged)]
  Unknown(Value),
}

impl Handler {
  /// Recursive presence test used to partition routes during merge.
  /// Unlike [`Handler::first_dial`], a proxy with zero upstreams still counts.
  pub fn contains_reverse_proxy(&self) -> bool {
    match self {
      Handler::ReverseProxy { .. } => true,
      Handler::Subroute { routes } => routes.iter().any(Route::is_proxy_bearing),
      _ => false,
    }
  }

  /// First upstream dial address reachable from this handler, depth-first
  pub fn first_dial(&self) -> Option<&str> {
    match self {
      Handler::ReverseProxy { upstreams } => upstreams.first().map(|u| u.dial.as_str()),
      Handler::Subroute { routes } => routes.iter().find_map(Route::first_dial),
      _ => None,
    }
  }
}

/// One upstream of a reverse-proxy handler
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Upstream {
  #[serde(default)]
  pub dial: String,
}
