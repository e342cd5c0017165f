use std::path::PathBuf;

use clap::Parser;

/// Battery status indicator drawn as a small icon in the terminal.
#[derive(Debug, Parser)]
#[command(name = "batticon", version, about)]
pub struct Cli {
    /// Terminal device to draw on (defaults to the controlling tty).
    #[arg(short = 'd', long = "display", value_name = "DEVICE")]
    pub display: Option<PathBuf>,

    /// Seconds between battery polls.
    #[arg(
        short = 'i',
        long = "interval",
        value_name = "SECONDS",
        default_value_t = 10,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub interval: u64,

    /// Use double-resolution icons for high-density displays.
    #[arg(long)]
    pub hidpi: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_defaults() {
        let cli = Cli::try_parse_from(["batticon"]).unwrap();

        assert_eq!(cli.interval, 10);
        assert!(cli.display.is_none());
        assert!(!cli.hidpi);
    }

    #[test]
    fn rejects_a_zero_interval() {
        assert!(Cli::try_parse_from(["batticon", "-i", "0"]).is_err());
    }

    #[test]
    fn accepts_short_flags() {
        let cli =
            Cli::try_parse_from(["batticon", "-d", "/dev/pts/3", "-i", "30"]).unwrap();

        assert_eq!(cli.display, Some(PathBuf::from("/dev/pts/3")));
        assert_eq!(cli.interval, 30);
    }
}
