use camino::Utf8PathBuf;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

use rit_tags::Config;

#[derive(Clone, Debug, Subcommand)]
pub enum Command {
    /// Print tag names, highest version first
    List,

    /// Print every tag with its target and tagger, most recent first
    Log,

    /// Pretty-print a single tag
    Show {
        #[clap(value_name = "tag")]
        name: String,
    },

    /// Exit with status `ExitCode::SUCCESS` if the tag exists, `ExitCode::FAILURE` otherwise
    Exists {
        #[clap(value_name = "tag")]
        name: String,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// Read loose objects and refs straight from `.git`
    Loose,
    /// Ask the `git` executable
    Git,
}

#[derive(Debug, Parser)]
pub struct Opt {
    #[clap(subcommand)]
    pub command: Command,

    /// The path to be used.
    #[clap(short = 'C')]
    pub path: Option<Utf8PathBuf>,

    /// How objects and refs are read.
    #[clap(long, value_enum, default_value = "git", env = "RIT_TAGS_BACKEND")]
    pub backend: Backend,

    /// Maximum number of resolved tags kept in memory.
    #[clap(long, default_value_t = Config::DEFAULT_CACHE_CAPACITY, env = "RIT_TAGS_CACHE_CAPACITY")]
    pub cache_capacity: usize,

    /// Maximum number of tags resolved at once.
    #[clap(short, long, default_value_t = Config::DEFAULT_JOBS, env = "RIT_TAGS_JOBS")]
    pub jobs: usize,
}

impl Opt {
    pub fn config(&self) -> Config {
        Config {
            cache_capacity: self.cache_capacity,
            jobs: self.jobs,
        }
    }
}
