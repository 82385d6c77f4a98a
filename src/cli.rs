use clap::builder::NonEmptyStringValueParser;
use clap::Parser;
use std::path::PathBuf;

/// Search, replace and rename across a directory tree.
///
/// `srr` rewrites every occurrence of a token in the content of C# project
/// files, and in the names of those files and of every directory below the
/// root.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Search, replace and rename across a directory tree",
    long_about = "srr - Replace a token in file contents, file names and directory names, in place.

Content and names are rewritten for files ending in .cs, .cshtml, .csproj,
.csproj.user and .sln. Folders named bin, .vs, .git or Logs (any case) are
skipped entirely. Matching is literal and case-sensitive.

There is no undo: commit or back up the tree first.

EXAMPLES:
  srr -d ./MyApp -s MyApp -r Acme.Portal     # Rename a solution
  srr -d . -s Legacy. -r ''                  # Delete a namespace prefix
  srr -d . -s Foo -r Bar -f json | jq .      # Machine-readable progress"
)]
pub struct Args {
    /// The root directory to rewrite.
    #[arg(short, long)]
    pub dir: PathBuf,

    /// The literal text to find in names and content.
    #[arg(short, long, value_parser = NonEmptyStringValueParser::new())]
    pub search: String,

    /// The literal text to put in its place. May be empty.
    #[arg(short, long, allow_hyphen_values = true)]
    pub replace: String,

    /// The output format for progress (`text`, `json` or `csv`).
    #[arg(short = 'f', long = "format", default_value = "text", env = "SRR_FORMAT")]
    pub format: String,

    /// Print every rewritten file and renamed path, and enable debug logging.
    #[arg(short, long)]
    pub verbose: bool,

    /// Do not show the progress spinner.
    #[arg(long)]
    pub no_progress: bool,
}

/// Parses command-line arguments and returns the populated `Args` struct.
pub fn parse_args() -> Args {
    Args::parse()
}
