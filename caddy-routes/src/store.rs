use crate::log::*;
use anyhow::Context;
use caddy_routes_lib::{Document, canonicalize, parse_caddyfile, render};
use std::{fs, io::ErrorKind, path::Path};

/// On-disk representation of the source document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
  Caddyfile,
  Json,
}

/// Read and adapt the whole source document.
/// A source that does not exist yet is an empty document, not an error.
pub fn load_document(path: &str, format: SourceFormat) -> Result<Document, anyhow::Error> {
  let raw = match fs::read_to_string(path) {
    Ok(raw) => raw,
    Err(e) if e.kind() == ErrorKind::NotFound => {
      warn!("Source {path} does not exist yet, starting from an empty document");
      return Ok(Document::default());
    }
    Err(e) => return Err(e).with_context(|| format!("failed to read {path}")),
  };
  match format {
    SourceFormat::Caddyfile => parse_caddyfile(&raw).with_context(|| format!("failed to adapt {path}")),
    SourceFormat::Json => Document::from_json(&raw).with_context(|| format!("failed to adapt {path}")),
  }
}

/// Render and write the whole document back to its source.
/// A canonicalizer failure is downgraded to a warning and the raw rendering is
/// written instead; a write failure is surfaced to the caller.
pub fn write_document(path: &str, doc: &Document, format: SourceFormat) -> Result<(), anyhow::Error> {
  let text = match format {
    SourceFormat::Caddyfile => {
      let raw = render(doc);
      match canonicalize(&raw) {
        Ok(formatted) => formatted,
        Err(e) => {
          warn!("Formatter failed ({e}), writing unformatted output");
          raw
        }
      }
    }
    SourceFormat::Json => {
      let mut serialized = doc.to_json().context("failed to serialize document")?;
      serialized.push('\n');
      serialized
    }
  };
  if let Some(parent) = Path::new(path).parent() {
    if !parent.as_os_str().is_empty() {
      fs::create_dir_all(parent).with_context(|| format!("failed to create {}", parent.display()))?;
    }
  }
  fs::write(path, text).with_context(|| format!("failed to write {path}"))
}
