use super::{Command, DEFAULT_SOURCE_PATH, Opts, SOURCE_PATH_ENV};
use anyhow::{Context, anyhow};
use caddy_routes_lib::Entry;
use clap::{Arg, ArgAction, ArgMatches, Command as ClapCommand};

/// Parse arg values passed from cli
pub fn parse_opts() -> Result<Opts, anyhow::Error> {
  let _ = include_str!("../../Cargo.toml");
  let options = clap::command!()
    .subcommand_required(true)
    .arg_required_else_help(true)
    .arg(
      Arg::new("file")
        .long("file")
        .short('f')
        .value_name("FILE")
        .help("Source document path. Falls back to $CADDYFILE_PATH, then /etc/caddy/Caddyfile"),
    )
    .arg(
      Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Treat the source as a structured JSON document instead of a Caddyfile"),
    )
    .subcommand(ClapCommand::new("list").about("Print the current proxy entries, one per line"))
    .subcommand(
      ClapCommand::new("set")
        .about("Replace the whole proxy rule set with the given entries")
        .arg(entry_arg()),
    )
    .subcommand(
      ClapCommand::new("add")
        .about("Append proxy entries, keeping the existing ones")
        .arg(entry_arg()),
    )
    .subcommand(
      ClapCommand::new("remove")
        .about("Remove proxy entries whose domain list contains any of the given domains")
        .arg(
          Arg::new("domain")
            .value_name("DOMAIN")
            .num_args(1..)
            .required(true)
            .help("Domain to remove, e.g. old.example.com"),
        ),
    )
    .subcommand(ClapCommand::new("render").about("Print the canonical textual rendering without writing"));
  let matches = options.get_matches();

  ///////////////////////////////////
  let source_path = matches
    .get_one::<String>("file")
    .cloned()
    .or_else(|| std::env::var(SOURCE_PATH_ENV).ok())
    .unwrap_or_else(|| DEFAULT_SOURCE_PATH.to_string());
  let json = matches.get_flag("json");

  let command = match matches.subcommand() {
    Some(("list", _)) => Command::List,
    Some(("set", sub)) => Command::Set {
      entries: parse_entries(sub)?,
    },
    Some(("add", sub)) => Command::Add {
      entries: parse_entries(sub)?,
    },
    Some(("remove", sub)) => Command::Remove {
      domains: sub
        .get_many::<String>("domain")
        .ok_or_else(|| anyhow!("at least one domain is required"))?
        .cloned()
        .collect(),
    },
    Some(("render", _)) => Command::Render,
    _ => return Err(anyhow!("a subcommand is required")),
  };

  Ok(Opts {
    source_path,
    json,
    command,
  })
}

fn entry_arg() -> Arg {
  Arg::new("entry")
    .long("entry")
    .short('e')
    .value_name("DOMAINS=UPSTREAM")
    .action(ArgAction::Append)
    .required(true)
    .help("Proxy entry: comma-separated domains and an upstream dial address, e.g. a.com,www.a.com=127.0.0.1:8080")
}

fn parse_entries(matches: &ArgMatches) -> Result<Vec<Entry>, anyhow::Error> {
  matches
    .get_many::<String>("entry")
    .ok_or_else(|| anyhow!("at least one --entry is required"))?
    .map(|raw| raw.parse::<Entry>().with_context(|| format!("invalid entry '{raw}'")))
    .collect()
}
