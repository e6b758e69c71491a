use crate::{
  constants::RENDER_INDENT,
  document::{Document, Handler},
  error::FormatError,
};

/// Render the canonical directive-block text of a document.
///
/// One block per route with at least one host, in server then route order:
/// the space-joined host list, `{`, one directive line per handler, `}`.
/// Blocks are separated by a single blank line. Routes without hosts cannot be
/// expressed as a site block and are not rendered.
///
/// Known limitations, kept deliberately: only the first upstream of a
/// reverse-proxy handler is emitted; nested subroutes are flattened into the
/// parent block so their own matchers are lost; unknown handlers emit nothing.
/// Documents relying on match-conditioned subroutes are read-extract-only.
pub fn render(doc: &Document) -> String {
  let mut blocks = Vec::new();
  for server in doc.servers.values() {
    for route in &server.routes {
      let hosts = route.host_names();
      if hosts.is_empty() {
        continue;
      }
      let mut block = String::new();
      block.push_str(&hosts.join(" "));
      block.push_str(" {\n");
      render_handlers(&route.handlers, &mut block);
      block.push_str("}\n");
      blocks.push(block);
    }
  }
  blocks.join("\n")
}

/// Emit one directive line per handler, recursing into subroutes.
/// Indentation stays flat regardless of nesting depth.
fn render_handlers(handlers: &[Handler], out: &mut String) {
  for handler in handlers {
    match handler {
      Handler::ReverseProxy { upstreams } => {
        if let Some(upstream) = upstreams.first() {
          out.push_str(RENDER_INDENT);
          out.push_str("reverse_proxy ");
          out.push_str(&upstream.dial);
          out.push('\n');
        }
      }
      Handler::FileServer { .. } => {
        out.push_str(RENDER_INDENT);
        out.push_str("file_server\n");
      }
      Handler::Vars { root: Some(root), .. } => {
        out.push_str(RENDER_INDENT);
        out.push_str("root * ");
        out.push_str(root);
        out.push('\n');
      }
      Handler::Vars { root: None, .. } => {}
      Handler::Subroute { routes } => {
        for route in routes {
          render_handlers(&route.handlers, out);
        }
      }
      Handler::Unknown(_) => {}
    }
  }
}

/// Canonicalize rendered text: strip trailing whitespace, collapse blank-line
/// runs, end with exactly one newline. Fails on unbalanced braces; callers
/// fall back to the unformatted text since that is still usable.
pub fn canonicalize(text: &str) -> Result<String, FormatError> {
  let mut depth: usize = 0;
  for line in text.lines() {
    let line = line.trim();
    if line.starts_with('#') {
      continue;
    }
    if line.ends_with('{') {
      depth += 1;
    } else if line == "}" {
      depth = depth.checked_sub(1).ok_or(FormatError::UnbalancedBraces)?;
    }
  }
  if depth != 0 {
    return Err(FormatError::UnbalancedBraces);
  }

  let mut out = String::with_capacity(text.len());
  let mut previous_blank = true; // leading blank lines are dropped too
  for line in text.lines() {
    let line = line.trim_end();
    if line.is_empty() {
      if previous_blank {
        continue;
      }
      previous_blank = true;
    } else {
      previous_blank = false;
    }
    out.push_str(line);
    out.push('\n');
  }
  while out.ends_with("\n\n") {
    out.pop();
  }
  Ok(out)
}
