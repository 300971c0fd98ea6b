//! Command-line arguments.

use clap::ArgAction;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "hoverquote-demo",
    version,
    about = "Hover a board, topic or post reference and print the preview markup"
)]
pub struct Cli {
    /// Fixture document mapping API paths to responses (defaults to the bundled set).
    #[arg(long, value_name = "PATH")]
    pub fixtures: Option<PathBuf>,

    /// Preview configuration as JSON.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Board slug placed on the reference element.
    #[arg(long)]
    pub board: Option<String>,

    /// Topic id placed on the reference element.
    #[arg(long)]
    pub topic: Option<String>,

    /// Post number or range placed on the reference element.
    #[arg(long)]
    pub number: Option<String>,

    /// Leave the reference before the fetch settles.
    #[arg(long)]
    pub detach_early: bool,

    /// Leave the reference after the preview is shown and print the body again.
    #[arg(long)]
    pub leave: bool,

    /// Raise log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Reference attributes as (board, topic, number).
    pub fn reference(&self) -> [Option<&str>; 3] {
        [
            self.board.as_deref(),
            self.topic.as_deref(),
            self.number.as_deref(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::Cli;
    use clap::Parser;

    #[test]
    fn parses_reference_and_verbosity() {
        let cli = Cli::try_parse_from([
            "hoverquote-demo",
            "--topic",
            "42",
            "--number",
            "3-5",
            "-vv",
            "--detach-early",
        ])
        .unwrap_or_else(|error| panic!("{error}"));

        assert_eq!(cli.reference(), [None, Some("42"), Some("3-5")]);
        assert_eq!(cli.verbose, 2);
        assert!(cli.detach_early);
        assert!(!cli.leave);
    }
}
