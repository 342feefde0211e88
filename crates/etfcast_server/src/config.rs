use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use etfcast_core::model::SimulationLimits;

#[derive(Parser, Debug)]
#[command(name = "etfcast")]
#[command(version, about = "Monte Carlo projections for ETF portfolios")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub settings: Settings,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Start the HTTP server (default)
    Serve,
    /// Run one projection from a JSON request file and print the result
    Simulate {
        /// Path to a request body as accepted by POST /api/backtest/monte-carlo
        #[arg(short, long)]
        request: PathBuf,
    },
}

#[derive(Args, Debug, Clone)]
pub struct Settings {
    /// Address the HTTP server listens on
    #[arg(long, env = "ETFCAST_BIND", default_value = "0.0.0.0:3001", global = true)]
    pub bind: SocketAddr,

    /// SQLite database holding index prices
    #[arg(long, env = "ETFCAST_DATABASE", default_value = "etfcast.db", global = true)]
    pub database: PathBuf,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(short, long, default_value = "info", global = true)]
    pub log_level: String,

    /// Largest accepted simulation count
    #[arg(long, default_value_t = SimulationLimits::DEFAULT_MAX_SIMULATIONS, global = true)]
    pub max_simulations: usize,

    /// Longest accepted forecast horizon in years
    #[arg(long, default_value_t = 100, global = true)]
    pub max_forecast_years: usize,

    /// Seconds before a projection request is abandoned
    #[arg(long, default_value_t = 30, global = true)]
    pub timeout_secs: u64,
}

impl Settings {
    pub fn limits(&self) -> SimulationLimits {
        SimulationLimits {
            max_simulations: self.max_simulations,
            max_forecast_months: self.max_forecast_years.saturating_mul(12),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Cli {
    pub fn subcommand(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["etfcast"]).unwrap();
        assert_eq!(cli.subcommand(), Command::Serve);
        assert_eq!(cli.settings.limits(), SimulationLimits::default());
        assert_eq!(cli.settings.timeout(), Duration::from_secs(30));
        assert_eq!(cli.settings.log_level, "info");
    }

    #[test]
    fn test_simulate_with_overrides() {
        let cli = Cli::try_parse_from([
            "etfcast",
            "simulate",
            "--request",
            "request.json",
            "--max-simulations",
            "2000",
            "--max-forecast-years",
            "40",
        ])
        .unwrap();

        assert_eq!(
            cli.subcommand(),
            Command::Simulate {
                request: PathBuf::from("request.json")
            }
        );
        assert_eq!(cli.settings.limits().max_simulations, 2000);
        assert_eq!(cli.settings.limits().max_forecast_months, 480);
    }
}
