//! Command-line arguments.

use clap::{Parser, Subcommand};

use crate::domain::runner::Locale;

#[derive(Debug, Parser)]
#[command(name = "halfmarathon-predictor", version)]
#[command(about = "Predicts a half-marathon finishing time from a free-text description")]
pub struct Cli {
    /// Language of messages (pl or en)
    #[arg(long, global = true)]
    pub locale: Option<Locale>,

    /// Print results at once instead of revealing them character by character
    #[arg(long, global = true)]
    pub no_animate: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Predict once from the given text and exit
    Predict {
        /// Description with age, gender and 5 km time
        #[arg(long)]
        text: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_interactive_mode() {
        let cli = Cli::try_parse_from(["halfmarathon-predictor"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.locale.is_none());
        assert!(!cli.no_animate);
    }

    #[test]
    fn parses_predict_subcommand() {
        let cli = Cli::try_parse_from([
            "halfmarathon-predictor",
            "--locale",
            "en",
            "predict",
            "--text",
            "Mam 30 lat",
            "--no-animate",
        ])
        .unwrap();

        assert_eq!(cli.locale, Some(Locale::En));
        assert!(cli.no_animate);
        match cli.command {
            Some(Command::Predict { text }) => assert_eq!(text, "Mam 30 lat"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_locale() {
        assert!(Cli::try_parse_from(["halfmarathon-predictor", "--locale", "de"]).is_err());
    }
}
