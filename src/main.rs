//! sora-format - command line access to the storefront display helpers.

use anyhow::Result;
use clap::{Parser, Subcommand};
use sora_storefront_core::{is_valid, Config, CurrencyCode, CurrencyFormatter, PhoneDisplay};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sora-format")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a phone number masked for display
    Mask {
        raw: String,

        /// Print the number as entered instead
        #[arg(long)]
        reveal: bool,
    },

    /// Check whether a phone number is a valid Russian number
    Validate { raw: String },

    /// Format a ruble amount in the given currency
    Price {
        #[arg(allow_hyphen_values = true)]
        amount: f64,

        #[arg(short, long)]
        currency: Option<CurrencyCode>,
    },

    /// Print the symbol of a currency
    Symbol { currency: CurrencyCode },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    // Logging goes to stderr so command output stays clean
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    debug!("Configuration loaded: {:?}", config);

    println!("{}", run(cli.command, &config));

    Ok(())
}

/// Execute one command and return the line to print.
fn run(command: Commands, config: &Config) -> String {
    let formatter = CurrencyFormatter::new(config.exchange_rates());

    match command {
        Commands::Mask { raw, reveal } => {
            let mut display = PhoneDisplay::new(Some(raw));
            display.set_revealed(reveal);
            display.text()
        }
        Commands::Validate { raw } => {
            let verdict = if is_valid(Some(&raw)) {
                "valid"
            } else {
                "invalid"
            };
            verdict.to_string()
        }
        Commands::Price { amount, currency } => {
            if !amount.is_finite() {
                warn!("Amount {} is not a finite number, rendering as zero", amount);
            }
            let currency = currency.unwrap_or(config.default_currency);
            formatter.format(amount, currency)
        }
        Commands::Symbol { currency } => formatter.symbol(currency).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_args(args: &[&str], config: &Config) -> String {
        let cli = Cli::try_parse_from(args).unwrap();
        run(cli.command, config)
    }

    #[test]
    fn test_mask_hides_digits_unless_revealed() {
        let config = Config::default();

        assert_eq!(
            run_args(&["sora-format", "mask", "+7 (912) 345-67-89"], &config),
            "+7 (***) ***-**89"
        );
        assert_eq!(
            run_args(&["sora-format", "mask", "+7 (912) 345-67-89", "--reveal"], &config),
            "+7 (912) 345-67-89"
        );
    }

    #[test]
    fn test_validate_verdicts() {
        let config = Config::default();

        assert_eq!(run_args(&["sora-format", "validate", "89123456789"], &config), "valid");
        assert_eq!(run_args(&["sora-format", "validate", "12345"], &config), "invalid");
    }

    #[test]
    fn test_price_falls_back_to_configured_currency() {
        let config = Config {
            default_currency: CurrencyCode::Usd,
            ..Config::default()
        };

        assert_eq!(run_args(&["sora-format", "price", "1000"], &config), "$11.00");
        assert_eq!(
            run_args(&["sora-format", "price", "1000", "--currency", "RUB"], &config),
            "1 000 ₽"
        );
        assert_eq!(run_args(&["sora-format", "price", "-1000", "-c", "USD"], &config), "-$11.00");
    }

    #[test]
    fn test_symbol_command() {
        assert_eq!(run_args(&["sora-format", "symbol", "USD"], &Config::default()), "$");
    }

    #[test]
    fn test_unknown_currency_is_rejected() {
        assert!(Cli::try_parse_from(["sora-format", "price", "1000", "--currency", "EUR"]).is_err());
        assert!(Cli::try_parse_from(["sora-format", "symbol", "EUR"]).is_err());
    }
}
