// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of VoltION.

//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "voltion-sim")]
#[command(author, version, about = "VoltION Schedule Simulator CLI")]
#[command(
    long_about = "Fast CLI for running the slot optimization engine against price scenarios.\n\
    \nSupports synthetic scenarios and JSON price exports.\n\
    Ideal for threshold tuning and regression checks without a live host.\n\
    \nExamples:\n  \
    voltion-sim schedule                        # Discharge plan for the default scenario\n  \
    voltion-sim charge --max-price 1.0          # Overnight charging plan\n  \
    voltion-sim arbitrage --min-profit 2.0      # Most profitable charge/discharge pairs"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute a discharge schedule for a scenario or export
    #[command(
        long_about = "Compute the discharge schedule the engine would hand to a host.\n\
        \nData Sources (choose one):\n  \
        - Synthetic: --scenario <name> (usual_day, volatile, negative)\n  \
        - JSON Export: --from-json <path>\n\
        \nExamples:\n  \
        voltion-sim schedule\n  \
        voltion-sim schedule --scenario volatile --min-sell-price 5.0\n  \
        voltion-sim schedule --solar moderate --with-tomorrow --output both --csv-path plan.csv"
    )]
    Schedule(ScheduleArgs),

    /// Compute a grid charging schedule for a scenario or export
    #[command(
        long_about = "Compute the cheapest charging slots up to the target battery level.\n\
        \nExamples:\n  \
        voltion-sim charge --max-price 1.0\n  \
        voltion-sim charge --scenario negative --max-price 0.0 --target 90\n  \
        voltion-sim charge --solar high --max-price 1.5"
    )]
    Charge(ChargeArgs),

    /// Scan a scenario for charge/discharge arbitrage pairs
    #[command(
        long_about = "Rank charge-then-discharge slot pairs by round-trip profit.\n\
        \nExamples:\n  \
        voltion-sim arbitrage\n  \
        voltion-sim arbitrage --scenario volatile --min-profit 3.0 --top 20"
    )]
    Arbitrage(ArbitrageArgs),
}

#[derive(Parser)]
pub struct ScheduleArgs {
    /// Price scenario name (usual_day, volatile, negative)
    #[arg(
        long,
        default_value = "usual_day",
        help = "Synthetic price scenario to simulate",
        long_help = "Available scenarios:\n  \
          - usual_day: Typical Czech spot prices (1.5-4.5 CZK/kWh)\n  \
          - volatile: High price volatility (0.5-8 CZK/kWh)\n  \
          - negative: Includes negative price periods\n\
          \nIgnored when using --from-json"
    )]
    pub scenario: String,

    /// Load prices from a JSON export file
    #[arg(
        long,
        value_name = "PATH",
        help = "Path to a VoltION price export file",
        long_help = "Load today's (and optionally tomorrow's) curve plus a solar\n\
          forecast from a JSON export instead of generating a scenario.\n\
          \nExample: --from-json export_20250710.json"
    )]
    pub from_json: Option<String>,

    /// Date to generate the scenario for (YYYY-MM-DD, defaults to today)
    #[arg(long, value_name = "YYYY-MM-DD", help = "Scenario date")]
    pub date: Option<String>,

    /// TOML file with battery and trading settings
    #[arg(
        long,
        value_name = "PATH",
        help = "Path to simulator configuration file",
        long_help = "TOML file with [battery] and [trading] sections.\n\
          Flags override values from the file.\n\
          \nExample: --config simulator.toml"
    )]
    pub config: Option<String>,

    /// Battery capacity in kWh (overrides config)
    #[arg(long, help = "Battery capacity in kilowatt-hours")]
    pub battery_capacity: Option<f32>,

    /// Initial battery level (0-100%, overrides config)
    #[arg(long, help = "Starting battery level percentage")]
    pub initial_level: Option<f32>,

    /// Minimum sell price (CZK/kWh, overrides config)
    #[arg(long, help = "Slots below this price never discharge")]
    pub min_sell_price: Option<f32>,

    /// Maximum number of discharge slots
    #[arg(long, help = "Cap on the number of selected slots")]
    pub max_slots: Option<usize>,

    /// Maximum total discharge duration in hours (overrides config)
    #[arg(long, help = "Cap on total selected hours (0 = unlimited)")]
    pub max_hours: Option<f32>,

    /// Solar generation profile (none, moderate, high)
    #[arg(
        long,
        default_value = "none",
        value_parser = ["none", "moderate", "high"],
        help = "Solar generation profile for synthetic scenarios",
        long_help = "Solar generation profiles:\n  \
          - none: No solar (winter/cloudy day testing)\n  \
          - moderate: Spring/fall typical (~12 kWh/day, 07-18)\n  \
          - high: Summer day (~24 kWh/day, 05-21)\n\
          \nIgnored when using --from-json"
    )]
    pub solar: String,

    /// Also generate tomorrow's curve and merge it after today's
    #[arg(
        long,
        default_value_t = false,
        help = "Extend the horizon with a generated tomorrow curve"
    )]
    pub with_tomorrow: bool,

    /// Output format: table, csv, or both
    #[arg(long, default_value = "table",
          value_parser = ["table", "csv", "both"],
          help = "How to display results")]
    pub output: String,

    /// CSV file path (required when output is csv or both)
    #[arg(long, value_name = "PATH", help = "Where to save CSV results")]
    pub csv_path: Option<String>,
}

#[derive(Parser)]
pub struct ChargeArgs {
    /// Price scenario name (usual_day, volatile, negative)
    #[arg(
        long,
        default_value = "usual_day",
        help = "Synthetic price scenario to simulate"
    )]
    pub scenario: String,

    /// Load prices from a JSON export file
    #[arg(long, value_name = "PATH", help = "Path to a VoltION price export file")]
    pub from_json: Option<String>,

    /// Date to generate the scenario for (YYYY-MM-DD, defaults to today)
    #[arg(long, value_name = "YYYY-MM-DD", help = "Scenario date")]
    pub date: Option<String>,

    /// TOML file with battery and trading settings
    #[arg(long, value_name = "PATH", help = "Path to simulator configuration file")]
    pub config: Option<String>,

    /// Battery capacity in kWh (overrides config)
    #[arg(long, help = "Battery capacity in kilowatt-hours")]
    pub battery_capacity: Option<f32>,

    /// Initial battery level (0-100%, overrides config)
    #[arg(long, help = "Starting battery level percentage")]
    pub initial_level: Option<f32>,

    /// Maximum charge price (CZK/kWh, overrides config)
    #[arg(long, help = "Only slots at or below this price charge from the grid")]
    pub max_price: Option<f32>,

    /// Target battery level (0-100%, overrides config)
    #[arg(long, help = "State of charge to reach")]
    pub target: Option<f32>,

    /// Maximum number of charging slots
    #[arg(long, help = "Cap on the number of selected slots")]
    pub max_slots: Option<usize>,

    /// Solar generation profile (none, moderate, high)
    #[arg(
        long,
        default_value = "none",
        value_parser = ["none", "moderate", "high"],
        help = "Solar generation profile for synthetic scenarios"
    )]
    pub solar: String,

    /// Output format: table, csv, or both
    #[arg(long, default_value = "table",
          value_parser = ["table", "csv", "both"],
          help = "How to display results")]
    pub output: String,

    /// CSV file path (required when output is csv or both)
    #[arg(long, value_name = "PATH", help = "Where to save CSV results")]
    pub csv_path: Option<String>,
}

#[derive(Parser)]
pub struct ArbitrageArgs {
    /// Price scenario name (usual_day, volatile, negative)
    #[arg(
        long,
        default_value = "usual_day",
        help = "Synthetic price scenario to simulate"
    )]
    pub scenario: String,

    /// Load prices from a JSON export file
    #[arg(long, value_name = "PATH", help = "Path to a VoltION price export file")]
    pub from_json: Option<String>,

    /// Date to generate the scenario for (YYYY-MM-DD, defaults to today)
    #[arg(long, value_name = "YYYY-MM-DD", help = "Scenario date")]
    pub date: Option<String>,

    /// TOML file with battery and trading settings
    #[arg(long, value_name = "PATH", help = "Path to simulator configuration file")]
    pub config: Option<String>,

    /// Battery capacity in kWh (overrides config)
    #[arg(long, help = "Battery capacity in kilowatt-hours")]
    pub battery_capacity: Option<f32>,

    /// Initial battery level (0-100%, overrides config)
    #[arg(long, help = "Starting battery level percentage")]
    pub initial_level: Option<f32>,

    /// Minimum profit per pair (CZK)
    #[arg(
        long,
        default_value_t = 1.0,
        help = "Pairs below this round-trip profit are not reported"
    )]
    pub min_profit: f32,

    /// Number of pairs to display
    #[arg(
        long,
        default_value_t = 10,
        help = "Show only the N most profitable pairs"
    )]
    pub top: usize,

    /// Output format: table, csv, or both
    #[arg(long, default_value = "table",
          value_parser = ["table", "csv", "both"],
          help = "How to display results")]
    pub output: String,

    /// CSV file path (required when output is csv or both)
    #[arg(long, value_name = "PATH", help = "Where to save CSV results")]
    pub csv_path: Option<String>,
}
