mod config;
mod log;
mod store;

use crate::{
  config::{Command, Opts, parse_opts},
  log::*,
  store::{SourceFormat, load_document, write_document},
};
use caddy_routes_lib::{extract, merge, render};

fn main() {
  init_logger();

  let opts = match parse_opts() {
    Ok(opts) => opts,
    Err(e) => {
      error!("Invalid arguments: {e}");
      std::process::exit(1);
    }
  };

  if let Err(e) = run(opts) {
    error!("{e:#}");
    std::process::exit(1);
  }
}

/// One full construct-mutate-serialize cycle per invocation. The document is
/// rebuilt from the source every time and never cached.
fn run(opts: Opts) -> Result<(), anyhow::Error> {
  let format = if opts.json {
    SourceFormat::Json
  } else {
    SourceFormat::Caddyfile
  };
  let doc = load_document(&opts.source_path, format)?;

  match opts.command {
    Command::List => {
      for entry in extract(&doc) {
        println!("{entry}");
      }
    }
    Command::Set { entries } => {
      let submitted = entries.len();
      let doc = merge(doc, &entries);
      let kept = extract(&doc).len();
      if kept < submitted {
        warn!("Dropped {} invalid entries", submitted - kept);
      }
      write_document(&opts.source_path, &doc, format)?;
      info!("Wrote {kept} proxy entries to {}", opts.source_path);
    }
    Command::Add { entries } => {
      let mut current = extract(&doc);
      current.extend(entries);
      let submitted = current.len();
      let doc = merge(doc, &current);
      let kept = extract(&doc).len();
      if kept < submitted {
        warn!("Dropped {} invalid entries", submitted - kept);
      }
      write_document(&opts.source_path, &doc, format)?;
      info!("Wrote {kept} proxy entries to {}", opts.source_path);
    }
    Command::Remove { domains } => {
      let current = extract(&doc);
      let before = current.len();
      let remaining: Vec<_> = current
        .into_iter()
        .filter(|entry| !entry.domains.iter().any(|d| domains.contains(d)))
        .collect();
      if remaining.len() == before {
        warn!("No entries matched {domains:?}");
      }
      let doc = merge(doc, &remaining);
      write_document(&opts.source_path, &doc, format)?;
      info!(
        "Removed {} entries, {} remain in {}",
        before - remaining.len(),
        remaining.len(),
        opts.source_path
      );
    }
    Command::Render => {
      print!("{}", render(&doc));
    }
  }
  Ok(())
}
