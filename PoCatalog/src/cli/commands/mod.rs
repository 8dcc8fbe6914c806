use clap::Subcommand;
use std::path::PathBuf;

pub mod catalog;
pub mod lookup;

#[derive(Subcommand)]
pub enum Commands {
    /// Parse a single PO file and print a summary
    Parse {
        /// PO/POT file
        file: PathBuf,

        /// Fail on malformed lines and duplicate ids
        #[arg(long)]
        strict: bool,

        /// Print the parsed catalog as JSON
        #[arg(long)]
        json: bool,
    },

    /// Strictly parse files and report the first error in each
    Check {
        /// Files to check
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// List the languages found in a translation tree
    Langs {
        /// Root directory of the translation tree
        root: PathBuf,

        /// TOML file with load options
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Translate a message id
    Translate {
        /// Root directory of the translation tree
        root: PathBuf,

        /// Language code to translate into
        #[arg(short, long)]
        lang: String,

        /// Fallback language (overrides the config file)
        #[arg(short, long)]
        default: Option<String>,

        /// Message context (msgctxt)
        #[arg(long)]
        context: Option<String>,

        /// TOML file with load options
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Message id
        id: String,

        /// Values substituted into the translation (numbers and booleans are detected)
        args: Vec<String>,
    },

    /// Print one header field of a language
    Meta {
        /// Root directory of the translation tree
        root: PathBuf,

        /// Language code
        #[arg(short, long)]
        lang: String,

        /// Header field name (e.g., "Language-Name")
        key: String,
    },
}

impl Commands {
    /// Execute the selected command.
    ///
    /// # Errors
    /// Returns an error if the underlying command fails.
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            Commands::Parse { file, strict, json } => catalog::parse(file, *strict, *json),
            Commands::Check { files } => catalog::check(files),
            Commands::Langs { root, config } => lookup::langs(root, config.as_deref()),
            Commands::Translate {
                root,
                lang,
                default,
                context,
                config,
                id,
                args,
            } => lookup::translate(
                root,
                lang,
                default.as_deref(),
                context.as_deref(),
                config.as_deref(),
                id,
                args,
            ),
            Commands::Meta { root, lang, key } => lookup::meta(root, lang, key),
        }
    }
}
