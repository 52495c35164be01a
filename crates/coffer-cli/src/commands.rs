use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use colored::Colorize;

use coffer_ledger::{
    CofferLedger, EventSink, InMemoryVault, JsonlSink, LedgerConfig, LedgerRead, LedgerSnapshot,
    LedgerWrite, MemorySink, SystemClock,
};
use coffer_types::{format_amount, parse_amount, AccountId};

use crate::cli::{Cli, Command, OutputFormat};

pub fn run_command(cli: Cli) -> Result<()> {
    let engine = load_engine(&cli.ledger, cli.events.as_deref())?;

    match &cli.command {
        Command::Deposit(args) => {
            let account = resolve_account(&args.account);
            let amount = parse_amount(&args.amount)?;
            let new_balance = engine.deposit(account, amount)?;
            save_engine(&engine, &cli.ledger)?;
            match cli.format {
                OutputFormat::Text => println!(
                    "{} {} to {} (balance {})",
                    "deposited".green(),
                    format_amount(amount),
                    account,
                    format_amount(new_balance),
                ),
                OutputFormat::Json => println!(
                    "{}",
                    serde_json::json!({
                        "account": account.to_hex(),
                        "deposited": format_amount(amount),
                        "balance": format_amount(new_balance),
                    })
                ),
            }
        }
        Command::Withdraw(args) => {
            let account = resolve_account(&args.account);
            let amount = parse_amount(&args.amount)?;
            let new_balance = engine.withdraw(account, amount)?;
            save_engine(&engine, &cli.ledger)?;
            match cli.format {
                OutputFormat::Text => println!(
                    "{} {} from {} (balance {})",
                    "withdrew".yellow(),
                    format_amount(amount),
                    account,
                    format_amount(new_balance),
                ),
                OutputFormat::Json => println!(
                    "{}",
                    serde_json::json!({
                        "account": account.to_hex(),
                        "withdrawn": format_amount(amount),
                        "balance": format_amount(new_balance),
                    })
                ),
            }
        }
        Command::WithdrawAll(args) => {
            let account = resolve_account(&args.account);
            let withdrawn = engine.withdraw_all(account)?;
            save_engine(&engine, &cli.ledger)?;
            match cli.format {
                OutputFormat::Text => println!(
                    "{} {} from {} (balance 0.0)",
                    "withdrew".yellow(),
                    format_amount(withdrawn),
                    account,
                ),
                OutputFormat::Json => println!(
                    "{}",
                    serde_json::json!({
                        "account": account.to_hex(),
                        "withdrawn": format_amount(withdrawn),
                        "balance": "0.0",
                    })
                ),
            }
        }
        Command::Interest(args) => {
            let account = resolve_account(&args.account);
            let pending = engine.calculate_interest(&account)?;
            match cli.format {
                OutputFormat::Text => {
                    println!("{} pending for {}", format_amount(pending), account)
                }
                OutputFormat::Json => println!(
                    "{}",
                    serde_json::json!({
                        "account": account.to_hex(),
                        "pending_interest": format_amount(pending),
                    })
                ),
            }
        }
        Command::Info(args) => {
            let account = resolve_account(&args.account);
            let info = engine.deposit_info(&account)?;
            match cli.format {
                OutputFormat::Text => {
                    if !info.exists {
                        println!("{} {}", account, "has never deposited".dimmed());
                    } else {
                        println!("account           {account}");
                        println!("balance           {}", format_amount(info.principal));
                        println!(
                            "pending interest  {}",
                            format_amount(info.pending_interest)
                        );
                        println!(
                            "total deposited   {}",
                            format_amount(info.total_deposited)
                        );
                        println!(
                            "total withdrawn   {}",
                            format_amount(info.total_withdrawn)
                        );
                        println!("last accrual      {}", info.last_accrual);
                    }
                }
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&info)?)
                }
            }
        }
        Command::Stats(_) => {
            let stats = engine.stats()?;
            match cli.format {
                OutputFormat::Text => {
                    println!("custodied     {}", format_amount(stats.custodied));
                    println!("total users   {}", stats.total_users);
                    println!("total supply  {}", format_amount(stats.total_supply));
                    if stats.custodied != stats.total_supply {
                        println!("{}", "custody drift detected".red().bold());
                    }
                }
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&stats)?)
                }
            }
        }
        Command::Rate(_) => {
            let rate = engine.interest_rate();
            let percent = 100.0 * rate.rate as f64 / rate.precision as f64;
            match cli.format {
                OutputFormat::Text => println!(
                    "{}/{} ({percent}% per year)",
                    rate.rate, rate.precision
                ),
                OutputFormat::Json => println!(
                    "{}",
                    serde_json::json!({
                        "rate": rate.rate,
                        "precision": rate.precision,
                        "percent_per_year": percent,
                    })
                ),
            }
        }
    }

    Ok(())
}

/// Accounts are addressed by hex id when one is given, otherwise the
/// argument is treated as identity material and hashed.
fn resolve_account(s: &str) -> AccountId {
    AccountId::from_hex(s).unwrap_or_else(|_| AccountId::derive(s.as_bytes()))
}

fn load_engine(path: &Path, events: Option<&Path>) -> Result<CofferLedger> {
    let sink: Arc<dyn EventSink> = match events {
        Some(path) => Arc::new(
            JsonlSink::open(path)
                .with_context(|| format!("opening event log {}", path.display()))?,
        ),
        None => Arc::new(MemorySink::new()),
    };

    if path.exists() {
        let data = fs::read(path)
            .with_context(|| format!("reading ledger {}", path.display()))?;
        let snapshot: LedgerSnapshot =
            serde_json::from_slice(&data).context("parsing ledger snapshot")?;
        let vault = Arc::new(InMemoryVault::with_balance(snapshot.total_supply));
        Ok(CofferLedger::from_snapshot_with(
            snapshot,
            Arc::new(SystemClock),
            vault,
            sink,
        ))
    } else {
        Ok(CofferLedger::with_collaborators(
            LedgerConfig::default(),
            Arc::new(SystemClock),
            Arc::new(InMemoryVault::new()),
            sink,
        ))
    }
}

/// Save via temp file + rename so an interrupted write never truncates
/// the ledger.
fn save_engine(engine: &CofferLedger, path: &Path) -> Result<()> {
    let snapshot = engine.snapshot()?;
    let json = serde_json::to_vec_pretty(&snapshot)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("creating temp file in {}", dir.display()))?;
    tmp.write_all(&json)?;
    tmp.persist(path)
        .with_context(|| format!("replacing ledger {}", path.display()))?;
    Ok(())
}
