use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::error::Error;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use validator_lcd_monitor::address::wallet_address;
use validator_lcd_monitor::config::ValidatorConfig;
use validator_lcd_monitor::http::Transport;
use validator_lcd_monitor::{AppConfig, ChainConfig, Lcd, Query, QueryResult};

#[derive(Parser)]
#[command(name = "lcd-monitor", version, about = "Query validator data from a Cosmos LCD endpoint")]
struct Cli {
    /// Config file, extension optional.
    #[arg(short, long, default_value = "config")]
    config: String,

    /// Chain to query, defaults to the first configured one.
    #[arg(long)]
    chain: Option<String>,

    /// Log filter, overridden by RUST_LOG.
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validator info.
    Validator { address: String },
    /// Number of delegations to a validator.
    DelegationsCount { address: String },
    /// Number of unbonding delegations from a validator.
    UnbondsCount { address: String },
    /// A wallet's delegation to a validator. The wallet defaults to the
    /// validator's own account.
    SelfDelegation {
        validator: String,
        wallet: Option<String>,
    },
    /// All validators (first 1000).
    Validators,
    /// Outstanding validator commission.
    Commission { address: String },
    /// A wallet's rewards from a validator. The wallet defaults to the
    /// validator's own account.
    Rewards {
        validator: String,
        wallet: Option<String>,
    },
    /// Wallet balance.
    Balance { wallet: String },
    /// Signing info for a consensus address.
    SigningInfo { valcons: String },
    SlashingParams,
    StakingParams,
    /// Run every per-validator query for the configured validators.
    Check,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let config = AppConfig::load(&cli.config)?;

    let level = cli.log_level.as_deref().unwrap_or(config.log_level.as_str());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let chain = config.chain(cli.chain.as_deref())?.clone();
    let lcd = Lcd::new(chain, config.timeout())?;

    match cli.command {
        Command::Validator { address } => print(Query::Validator, lcd.get_validator(&address)),
        Command::DelegationsCount { address } => {
            print(Query::Delegations, lcd.get_delegations_count(&address))
        }
        Command::UnbondsCount { address } => {
            print(Query::Unbonds, lcd.get_unbonds_count(&address))
        }
        Command::SelfDelegation { validator, wallet } => {
            let wallet = resolve_wallet(lcd.chain(), &validator, wallet)?;
            print(
                Query::SelfDelegation,
                lcd.get_single_delegation(&validator, &wallet),
            )
        }
        Command::Validators => print(Query::Validators, lcd.get_all_validators()),
        Command::Commission { address } => {
            print(Query::Commission, lcd.get_validator_commission(&address))
        }
        Command::Rewards { validator, wallet } => {
            let wallet = resolve_wallet(lcd.chain(), &validator, wallet)?;
            print(Query::Rewards, lcd.get_delegator_rewards(&validator, &wallet))
        }
        Command::Balance { wallet } => print(Query::Balance, lcd.get_wallet_balance(&wallet)),
        Command::SigningInfo { valcons } => {
            print(Query::SigningInfo, lcd.get_signing_info(&valcons))
        }
        Command::SlashingParams => print(Query::SlashingParams, lcd.get_slashing_params()),
        Command::StakingParams => print(Query::StakingParams, lcd.get_staking_params()),
        Command::Check => check(&lcd),
    }
}

fn resolve_wallet(
    chain: &ChainConfig,
    validator: &str,
    wallet: Option<String>,
) -> Result<String, Box<dyn Error>> {
    if let Some(wallet) = wallet {
        return Ok(wallet);
    }
    let prefix = chain.bech_wallet_prefix.as_deref().ok_or_else(|| {
        format!(
            "no wallet given and chain {} has no bech-wallet-prefix to derive one",
            chain.name
        )
    })?;
    Ok(wallet_address(validator, prefix)?)
}

fn print<T: Serialize>(query: Query, result: QueryResult<T>) -> Result<(), Box<dyn Error>> {
    match result? {
        Some(fetched) => {
            info!(%query, url = %fetched.info.url, duration = ?fetched.info.duration, "query done");
            println!("{}", serde_json::to_string_pretty(&fetched.value)?);
        }
        None => eprintln!("query `{}` is disabled for this chain", query),
    }
    Ok(())
}

// Disabled queries are left out of the report, failed ones are reported
// inline so one bad endpoint doesn't hide the rest.
fn record<T: Serialize>(report: &mut Map<String, Value>, query: Query, result: QueryResult<T>) {
    let value = match result {
        Ok(Some(fetched)) => match serde_json::to_value(&fetched.value) {
            Ok(value) => value,
            Err(err) => {
                warn!(%query, error = %err, "cannot serialize query result");
                json!({ "error": err.to_string() })
            }
        },
        Ok(None) => return,
        Err(err) => {
            warn!(%query, error = %err, "query failed");
            json!({ "error": err.to_string() })
        }
    };
    report.insert(query.to_string(), value);
}

fn validator_report<T: Transport>(lcd: &Lcd<T>, validator: &ValidatorConfig) -> Map<String, Value> {
    let address = validator.address.as_str();
    let mut report = Map::new();
    report.insert("address".to_string(), json!(address));

    record(&mut report, Query::Validator, lcd.get_validator(address));
    record(&mut report, Query::Delegations, lcd.get_delegations_count(address));
    record(&mut report, Query::Unbonds, lcd.get_unbonds_count(address));
    record(&mut report, Query::Commission, lcd.get_validator_commission(address));

    if let Some(prefix) = lcd.chain().bech_wallet_prefix.as_deref() {
        match wallet_address(address, prefix) {
            Ok(wallet) => {
                record(
                    &mut report,
                    Query::SelfDelegation,
                    lcd.get_single_delegation(address, &wallet),
                );
                record(&mut report, Query::Rewards, lcd.get_delegator_rewards(address, &wallet));
                record(&mut report, Query::Balance, lcd.get_wallet_balance(&wallet));
                report.insert("wallet".to_string(), json!(wallet));
            }
            Err(err) => {
                warn!(address, error = %err, "cannot derive wallet");
                report.insert("wallet".to_string(), json!({ "error": err.to_string() }));
            }
        }
    }

    if let Some(valcons) = validator.consensus_address.as_deref() {
        record(&mut report, Query::SigningInfo, lcd.get_signing_info(valcons));
    }

    report
}

fn check_report<T: Transport>(lcd: &Lcd<T>) -> Map<String, Value> {
    let chain = lcd.chain();
    let validators = chain
        .validators
        .iter()
        .map(|validator| Value::Object(validator_report(lcd, validator)))
        .collect();

    let mut summary = Map::new();
    summary.insert("chain".to_string(), json!(chain.name));
    summary.insert("validators".to_string(), Value::Array(validators));
    record(&mut summary, Query::SlashingParams, lcd.get_slashing_params());
    record(&mut summary, Query::StakingParams, lcd.get_staking_params());
    summary
}

fn check(lcd: &Lcd) -> Result<(), Box<dyn Error>> {
    let summary = check_report(lcd);
    println!("{}", serde_json::to_string_pretty(&Value::Object(summary))?);
    Ok(())
}
