use crate::{
  constants::{DEFAULT_LISTEN_ADDR, DEFAULT_SERVER_NAME},
  document::{Document, Handler, Matcher, Route, Server, Upstream},
  error::AdaptError,
  trace::debug,
};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Line-oriented adapter from Caddyfile text to a document.
///
/// This is the degraded-mode adapter for plain proxy-oriented files. It
/// recognizes `<addresses> {` block headers, `reverse_proxy`, `file_server`,
/// `root`, and `}`, and ignores blank lines and `#` comments. Any other
/// directive, and any nested sub-block, is captured verbatim as an unknown
/// handler so the rest of the engine can skip past it.
///
/// All parsed routes land in one synthesized server with the default listen
/// address. Empty input produces an empty document, the same value a missing
/// source file maps to.
pub fn parse_caddyfile(src: &str) -> Result<Document, AdaptError> {
  let mut routes: Vec<Route> = Vec::new();
  // line number of the open block header, its addresses, and its handlers so far
  let mut open: Option<(usize, Vec<String>, Vec<Handler>)> = None;
  // brace depth and raw lines of an uninterpreted nested block
  let mut nested: Option<(usize, Vec<String>)> = None;

  for (idx, raw) in src.lines().enumerate() {
    let line_no = idx + 1;
    let line = raw.trim();
    if line.is_empty() || line.starts_with('#') {
      continue;
    }

    if let Some((mut depth, mut buf)) = nested.take() {
      buf.push(raw.to_string());
      if line.ends_with('{') {
        depth += 1;
      } else if line == "}" {
        depth -= 1;
      }
      if depth == 0 {
        if let Some((_, _, handlers)) = open.as_mut() {
          handlers.push(Handler::Unknown(Value::String(buf.join("\n"))));
        }
      } else {
        nested = Some((depth, buf));
      }
      continue;
    }

    if line == "}" {
      match open.take() {
        Some((_, addresses, handlers)) => routes.push(block_route(addresses, handlers)),
        None => return Err(AdaptError::UnexpectedCloseBrace { line: line_no }),
      }
      continue;
    }

    if open.is_none() {
      let Some(header) = line.strip_suffix('{') else {
        return Err(AdaptError::DirectiveOutsideBlock {
          line: line_no,
          directive: line.to_string(),
        });
      };
      open = Some((line_no, split_addresses(header), Vec::new()));
      continue;
    }

    if line.ends_with('{') {
      // an encode/handle/... sub-block this adapter does not interpret
      nested = Some((1, vec![raw.to_string()]));
      continue;
    }
    if let Some((_, _, handlers)) = open.as_mut() {
      handlers.push(parse_directive(line));
    }
  }

  if let Some((depth, _)) = nested {
    debug!("Nested block still open at depth {depth} at end of input");
  }
  if let Some((line, _, _)) = open {
    return Err(AdaptError::UnclosedBlock { line });
  }

  let mut servers = BTreeMap::new();
  if !routes.is_empty() {
    servers.insert(
      DEFAULT_SERVER_NAME.to_string(),
      Server {
        listen: vec![DEFAULT_LISTEN_ADDR.to_string()],
        routes,
      },
    );
  }
  Ok(Document { servers })
}

/// Site addresses may be separated by commas, whitespace, or both
fn split_addresses(header: &str) -> Vec<String> {
  header
    .split(|c: char| c.is_whitespace() || c == ',')
    .filter(|s| !s.is_empty())
    .map(str::to_string)
    .collect()
}

fn block_route(addresses: Vec<String>, handlers: Vec<Handler>) -> Route {
  let matchers = if addresses.is_empty() {
    // a host-less block, e.g. global options; kept but never extracted or rendered
    vec![]
  } else {
    vec![Matcher {
      host: addresses,
      extra: Map::new(),
    }]
  };
  Route { matchers, handlers }
}

fn parse_directive(line: &str) -> Handler {
  let mut parts = line.split_whitespace();
  let name = parts.next().unwrap_or_default();
  match name {
    "reverse_proxy" => Handler::ReverseProxy {
      upstreams: parts.map(|dial| Upstream { dial: dial.to_string() }).collect(),
    },
    "file_server" => Handler::FileServer { options: Map::new() },
    "root" => {
      // `root * <path>` or `root <path>`
      let args: Vec<&str> = parts.collect();
      let root = match args.as_slice() {
        ["*", path, ..] => Some(path.to_string()),
        [path, ..] => Some(path.to_string()),
        [] => None,
      };
      Handler::Vars {
        root,
        extra: Map::new(),
      }
    }
    _ => Handler::Unknown(Value::String(line.to_string())),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{extract::extract, render::render};

  #[test]
  fn test_parse_single_proxy_block() {
    let doc = parse_caddyfile("a.example.com {\n    reverse_proxy 127.0.0.1:8080\n}\n").unwrap();
    let server = doc.servers.get(DEFAULT_SERVER_NAME).unwrap();
    assert_eq!(server.listen, vec![DEFAULT_LISTEN_ADDR]);
    assert_eq!(server.routes.len(), 1);
    assert_eq!(server.routes[0].host_names(), vec!["a.example.com"]);
    assert_eq!(server.routes[0].first_dial(), Some("127.0.0.1:8080"));
  }

  #[test]
  fn test_parse_ignores_comments_and_blank_lines() {
    let src = "# managed file\n\na.example.com {\n    # local app\n    reverse_proxy 127.0.0.1:8080\n}\n";
    let doc = parse_caddyfile(src).unwrap();
    assert_eq!(extract(&doc).len(), 1);
  }

  #[test]
  fn test_parse_multiple_addresses() {
    let doc = parse_caddyfile("a.example.com, www.a.example.com {\n    reverse_proxy 127.0.0.1:8080\n}\n").unwrap();
    let route = &doc.servers[DEFAULT_SERVER_NAME].routes[0];
    assert_eq!(route.host_names(), vec!["a.example.com", "www.a.example.com"]);
  }

  #[test]
  fn test_parse_file_server_and_root() {
    let src = "file.example.com {\n    root * /var/www\n    file_server\n}\n";
    let doc = parse_caddyfile(src).unwrap();
    let route = &doc.servers[DEFAULT_SERVER_NAME].routes[0];
    assert!(matches!(
      &route.handlers[0],
      Handler::Vars { root: Some(root), .. } if root == "/var/www"
    ));
    assert!(matches!(route.handlers[1], Handler::FileServer { .. }));
    // round-trips through the renderer unchanged
    assert_eq!(render(&doc), src);
  }

  #[test]
  fn test_unrecognized_directive_becomes_unknown() {
    let src = "a.example.com {\n    encode gzip\n    reverse_proxy 127.0.0.1:8080\n}\n";
    let doc = parse_caddyfile(src).unwrap();
    let route = &doc.servers[DEFAULT_SERVER_NAME].routes[0];
    assert!(matches!(&route.handlers[0], Handler::Unknown(Value::String(s)) if s == "encode gzip"));
    // extraction still finds the proxy past it
    assert_eq!(extract(&doc)[0].upstream, "127.0.0.1:8080");
  }

  #[test]
  fn test_nested_sub_block_is_captured_raw() {
    let src = "a.example.com {\n    handle /static/* {\n        file_server\n    }\n    reverse_proxy 127.0.0.1:8080\n}\n";
    let doc = parse_caddyfile(src).unwrap();
    let route = &doc.servers[DEFAULT_SERVER_NAME].routes[0];
    assert_eq!(route.handlers.len(), 2);
    assert!(matches!(
      &route.handlers[0],
      Handler::Unknown(Value::String(s)) if s.contains("handle /static/*")
    ));
    assert_eq!(route.first_dial(), Some("127.0.0.1:8080"));
  }

  #[test]
  fn test_hostless_block_is_kept_but_not_extracted() {
    let src = "{\n    email admin@example.com\n}\n\na.example.com {\n    reverse_proxy 127.0.0.1:8080\n}\n";
    let doc = parse_caddyfile(src).unwrap();
    assert_eq!(doc.servers[DEFAULT_SERVER_NAME].routes.len(), 2);
    let entries = extract(&doc);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].domains, vec!["a.example.com"]);
  }

  #[test]
  fn test_empty_input_is_empty_document() {
    let doc = parse_caddyfile("").unwrap();
    assert!(doc.servers.is_empty());
  }

  #[test]
  fn test_parse_errors_carry_line_numbers() {
    match parse_caddyfile("a.example.com {\n}\n}\n") {
      Err(AdaptError::UnexpectedCloseBrace { line }) => assert_eq!(line, 3),
      other => panic!("Expected UnexpectedCloseBrace, got {other:?}"),
    }
    match parse_caddyfile("reverse_proxy 127.0.0.1:8080\n") {
      Err(AdaptError::DirectiveOutsideBlock { line, .. }) => assert_eq!(line, 1),
      other => panic!("Expected DirectiveOutsideBlock, got {other:?}"),
    }
    match parse_caddyfile("a.example.com {\n    reverse_proxy 127.0.0.1:8080\n") {
      Err(AdaptError::UnclosedBlock { line }) => assert_eq!(line, 1),
      other => panic!("Expected UnclosedBlock, got {other:?}"),
    }
  }
}
