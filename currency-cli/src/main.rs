//! Currency CLI
//!
//! Command-line interface for the Currency API.

use anyhow::Result;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

use currency_client::CurrencyClient;
use currency_types::{ConvertRequest, CurrencyId, CurrencyRequest};

#[derive(Parser)]
#[command(name = "currency")]
#[command(author, version, about = "Currency API CLI client", long_about = None)]
struct Cli {
    /// Base URL of the Currency API
    #[arg(
        long,
        env = "CURRENCY_API_URL",
        default_value = "http://localhost:3000"
    )]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all currencies
    List,
    /// Create a currency
    Create {
        /// Unique currency name
        name: String,
        /// Short code
        #[arg(long, default_value = "")]
        code: String,
        /// Local rate as TARGET=RATE (repeatable)
        #[arg(long = "rate", value_parser = parse_rate)]
        rates: Vec<(String, Decimal)>,
    },
    /// Replace a currency's name, code and rates
    Update {
        /// Currency ID
        id: i64,
        /// New name
        name: String,
        #[arg(long, default_value = "")]
        code: String,
        /// Local rate as TARGET=RATE (repeatable)
        #[arg(long = "rate", value_parser = parse_rate)]
        rates: Vec<(String, Decimal)>,
    },
    /// Delete a currency
    Delete {
        /// Currency ID
        id: i64,
    },
    /// Convert an amount
    Convert {
        from: String,
        to: String,
        amount: Decimal,
    },
    /// Latest provider quotes
    Quotes {
        /// Pair tags (comma-separated), e.g. USD-BRL,EUR-BRL
        #[arg(value_delimiter = ',', required = true)]
        pairs: Vec<String>,
    },
    /// Check API health
    Health,
}

fn parse_rate(s: &str) -> Result<(String, Decimal), String> {
    let (target, rate) = s
        .split_once('=')
        .ok_or_else(|| format!("expected TARGET=RATE, got {s}"))?;
    let rate = rate
        .trim()
        .parse::<Decimal>()
        .map_err(|e| format!("invalid rate {rate}: {e}"))?;
    Ok((target.trim().to_string(), rate))
}

fn currency_request(name: String, code: String, rates: Vec<(String, Decimal)>) -> CurrencyRequest {
    rates
        .into_iter()
        .fold(CurrencyRequest::new(name, code), |req, (target, rate)| {
            req.with_rate(target, rate)
        })
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let client = CurrencyClient::new(&cli.api_url);

    match cli.command {
        Commands::Health => {
            let healthy = client.health().await?;
            if healthy {
                println!("✓ API is healthy");
            } else {
                println!("✗ API is not healthy");
                std::process::exit(1);
            }
        }

        Commands::List => {
            for currency in client.list().await? {
                println!("{}", currency.label);
            }
        }

        Commands::Create { name, code, rates } => {
            let id = client.create(&currency_request(name, code, rates)).await?;
            println!("{}", id);
        }

        Commands::Update {
            id,
            name,
            code,
            rates,
        } => {
            client
                .update(CurrencyId::new(id), &currency_request(name, code, rates))
                .await?;
            println!("✓ Currency {} updated", id);
        }

        Commands::Delete { id } => {
            client.delete(CurrencyId::new(id)).await?;
            println!("✓ Currency {} deleted", id);
        }

        Commands::Convert { from, to, amount } => {
            let resp = client
                .convert(&ConvertRequest::new(from, to, amount))
                .await?;
            println!("{}", resp.amount);
        }

        Commands::Quotes { pairs } => {
            let tags: Vec<&str> = pairs.iter().map(String::as_str).collect();
            let quotes = client.latest_quotes(&tags).await?;
            println!("{}", serde_json::to_string_pretty(&quotes)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rust_decimal_macros::dec;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_rate() {
        assert_eq!(parse_rate("EUR=0.9").unwrap(), ("EUR".to_string(), dec!(0.9)));
        assert!(parse_rate("EUR").is_err());
        assert!(parse_rate("EUR=abc").is_err());
    }

    #[test]
    fn test_create_with_repeated_rates() {
        let cli = Cli::try_parse_from([
            "currency", "create", "USD", "--code", "US", "--rate", "EUR=0.92", "--rate",
            "BRL=5.36",
        ])
        .unwrap();

        let Commands::Create { name, code, rates } = cli.command else {
            panic!("expected create");
        };
        let req = currency_request(name, code, rates);
        let exchanges = req.exchanges.unwrap();
        assert_eq!(exchanges["EUR"], dec!(0.92));
        assert_eq!(exchanges["BRL"], dec!(5.36));
    }

    #[test]
    fn test_quotes_splits_pairs() {
        let cli = Cli::try_parse_from(["currency", "quotes", "USD-BRL,EUR-BRL"]).unwrap();
        let Commands::Quotes { pairs } = cli.command else {
            panic!("expected quotes");
        };
        assert_eq!(pairs, vec!["USD-BRL", "EUR-BRL"]);
    }
}
