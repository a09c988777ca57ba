use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(
    author,
    version,
    about = "Dump a directory tree into one Markdown file for LLM context"
)]
pub struct Cli {
    /// Directory to dump (same as --root)
    pub path: Option<PathBuf>,

    /// Directory to dump; takes precedence over the positional path
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Output file, relative to the root unless absolute
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Comma-separated directory names to skip (e.g. '.git,target')
    #[arg(long, value_delimiter = ',')]
    pub ignore_dirs: Option<Vec<String>>,

    /// Comma-separated glob patterns to skip (e.g. '**/*.log,dist/**')
    #[arg(long, value_delimiter = ',')]
    pub ignore_patterns: Option<Vec<String>>,

    /// JSON object mapping extensions to fence tags (e.g. '{"rs":"rust"}')
    #[arg(long)]
    pub language_map: Option<String>,

    /// Use a named profile from dump.toml instead of [default].
    /// Unlike a missing [default], this fails when no dump.toml exists.
    #[arg(long, short = 'c')]
    pub config: Option<String>,
}

impl Cli {
    /// The root given on the command line, if any.
    pub fn root_arg(&self) -> Option<&PathBuf> {
        self.root.as_ref().or(self.path.as_ref())
    }
}
