mod interface;

use std::process::ExitCode;

use camino::Utf8PathBuf;
use color_eyre::eyre::{eyre, Context};
use color_eyre::Result;

use rit_tags::store::command::GitCommand;
use rit_tags::store::loose::LooseStore;
use rit_tags::{ObjectStore, Repo, TagKind};

use crate::interface::*;

use clap::Parser;
use once_cell::sync::Lazy;
use tracing_subscriber::prelude::*;

static ARGS: Lazy<Opt> = Lazy::new(Opt::parse);

fn main() -> Result<ExitCode> {
    color_eyre::install()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    Lazy::force(&ARGS);

    let path = match ARGS.path {
        Some(ref path) => path
            .canonicalize_utf8()
            .wrap_err(format!("Directory not found: '{path}'"))?,
        None => Utf8PathBuf::try_from(std::env::current_dir()?)?,
    };

    let store: Box<dyn ObjectStore> = match ARGS.backend {
        Backend::Loose => Box::new(LooseStore::open(&path)?),
        Backend::Git => Box::new(GitCommand::new(&path)),
    };
    let repo = Repo::with_config(store, ARGS.config());

    match &ARGS.command {
        Command::List => {
            for name in repo.list_names()? {
                println!("{name}");
            }
        }
        Command::Log => {
            for tag in repo.list_full()? {
                match tag.kind() {
                    TagKind::Lightweight => {
                        println!("{} {}", tag.target_id().short(), tag.name())
                    }
                    TagKind::Annotated(annotation) => println!(
                        "{} {} {} <{}> {}",
                        tag.target_id().short(),
                        tag.name(),
                        annotation.tagger.name,
                        annotation.tagger.email,
                        annotation.tagger.when.0.to_rfc2822(),
                    ),
                }
            }
        }
        Command::Show { name } => {
            let tag = repo
                .resolve_by_name(name)
                .wrap_err(eyre!("Could not resolve tag '{name}'"))?;
            print!("{}", tag.pretty_print());
        }
        Command::Exists { name } => {
            if !repo.tag_exists(name)? {
                return Ok(ExitCode::FAILURE);
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}
