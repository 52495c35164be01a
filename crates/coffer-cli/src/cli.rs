use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "coffer",
    about = "Coffer — custodial interest-bearing ledger",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Ledger snapshot file.
    #[arg(long, global = true, default_value = "coffer.json")]
    pub ledger: PathBuf,

    /// Append ledger events to this JSONL file.
    #[arg(long, global = true)]
    pub events: Option<PathBuf>,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Deposit value into an account
    Deposit(DepositArgs),
    /// Withdraw value from an account
    Withdraw(WithdrawArgs),
    /// Withdraw an account's entire balance, interest included
    WithdrawAll(WithdrawAllArgs),
    /// Show interest pending for an account
    Interest(InterestArgs),
    /// Show an account's full deposit record
    Info(InfoArgs),
    /// Show ledger-wide aggregates
    Stats(StatsArgs),
    /// Show the fixed interest rate
    Rate(RateArgs),
}

#[derive(Args)]
pub struct DepositArgs {
    /// Account name or 64-char hex identifier
    pub account: String,
    /// Amount in whole units, e.g. "1.5"
    pub amount: String,
}

#[derive(Args)]
pub struct WithdrawArgs {
    pub account: String,
    pub amount: String,
}

#[derive(Args)]
pub struct WithdrawAllArgs {
    pub account: String,
}

#[derive(Args)]
pub struct InterestArgs {
    pub account: String,
}

#[derive(Args)]
pub struct InfoArgs {
    pub account: String,
}

#[derive(Args)]
pub struct StatsArgs {}

#[derive(Args)]
pub struct RateArgs {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_deposit() {
        let cli = Cli::try_parse_from(["coffer", "deposit", "alice", "1.5"]).unwrap();
        if let Command::Deposit(args) = cli.command {
            assert_eq!(args.account, "alice");
            assert_eq!(args.amount, "1.5");
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_withdraw() {
        let cli = Cli::try_parse_from(["coffer", "withdraw", "alice", "0.5"]).unwrap();
        assert!(matches!(cli.command, Command::Withdraw(_)));
    }

    #[test]
    fn parse_withdraw_all() {
        let cli = Cli::try_parse_from(["coffer", "withdraw-all", "alice"]).unwrap();
        if let Command::WithdrawAll(args) = cli.command {
            assert_eq!(args.account, "alice");
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_stats() {
        let cli = Cli::try_parse_from(["coffer", "stats"]).unwrap();
        assert!(matches!(cli.command, Command::Stats(_)));
    }

    #[test]
    fn parse_ledger_path() {
        let cli =
            Cli::try_parse_from(["coffer", "--ledger", "/tmp/l.json", "stats"]).unwrap();
        assert_eq!(cli.ledger.to_str(), Some("/tmp/l.json"));
    }

    #[test]
    fn parse_events_path() {
        let cli = Cli::try_parse_from([
            "coffer",
            "--events",
            "/tmp/events.jsonl",
            "deposit",
            "alice",
            "1",
        ])
        .unwrap();
        assert_eq!(
            cli.events.as_deref().and_then(|p| p.to_str()),
            Some("/tmp/events.jsonl")
        );
    }

    #[test]
    fn parse_json_format() {
        let cli = Cli::try_parse_from(["coffer", "--format", "json", "rate"]).unwrap();
        assert!(matches!(cli.format, OutputFormat::Json));
    }

    #[test]
    fn parse_verbose() {
        let cli = Cli::try_parse_from(["coffer", "--verbose", "stats"]).unwrap();
        assert!(cli.verbose);
    }
}
