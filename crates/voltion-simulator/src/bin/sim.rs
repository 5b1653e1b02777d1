// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of VoltION.

//! Entry point for the VoltION schedule simulator.

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::Parser;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

use voltion_core::{
    ArbitrageRequest, ChargeRequest, DischargeRequest, MaxDuration, TradeOptimizer,
};
use voltion_simulator::cli::data_loaders::find_scenario;
use voltion_simulator::cli::{
    ArbitrageArgs, ChargeArgs, Cli, Commands, CsvFormatter, DataLoader, JsonExportLoader,
    ScheduleArgs, SimulatorConfig, SolarProfile, SyntheticLoader, TableFormatter,
};
use voltion_types::{BatteryParameters, SlotSelection};

fn main() -> Result<()> {
    // Respects RUST_LOG environment variable
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let cli = Cli::parse();
    match cli.command {
        Commands::Schedule(args) => run_schedule(&args),
        Commands::Charge(args) => run_charge(&args),
        Commands::Arbitrage(args) => run_arbitrage(&args),
    }
}

fn run_schedule(args: &ScheduleArgs) -> Result<()> {
    check_csv_args(&args.output, args.csv_path.as_deref())?;

    let config = load_config(args.config.as_deref())?;
    let date = parse_date(args.date.as_deref())?;
    let loader = build_loader(
        args.from_json.as_deref(),
        &args.scenario,
        &args.solar,
        args.with_tomorrow,
    )?;
    let day = loader.load(date)?;

    let battery = resolve_battery(&config, args.battery_capacity, args.initial_level);
    let min_sell = args
        .min_sell_price
        .unwrap_or(config.trading.min_forced_sell_price_czk);
    let max_duration = match args.max_hours {
        Some(hours) => MaxDuration::from_hours(hours),
        None => config.trading.discharge_duration(),
    };

    info!(
        "Computing discharge schedule for {} ({})",
        day.source_name, day.date
    );

    let optimizer = TradeOptimizer::from_config(&config.trading);
    let schedule = optimizer.discharge_schedule(&DischargeRequest {
        today: &day.today,
        tomorrow: day.tomorrow.as_deref(),
        battery: &battery,
        min_sell_price_czk: min_sell,
        max_slots: args.max_slots,
        max_duration,
        solar_forecast: day.solar.as_ref(),
    });

    emit_schedule(
        &schedule,
        &day.source_name,
        &args.output,
        args.csv_path.as_deref(),
    )
}

fn run_charge(args: &ChargeArgs) -> Result<()> {
    check_csv_args(&args.output, args.csv_path.as_deref())?;

    let config = load_config(args.config.as_deref())?;
    let date = parse_date(args.date.as_deref())?;
    let loader = build_loader(args.from_json.as_deref(), &args.scenario, &args.solar, false)?;
    let day = loader.load(date)?;

    let battery = resolve_battery(&config, args.battery_capacity, args.initial_level);
    let max_price = args
        .max_price
        .unwrap_or(config.trading.max_force_charge_price_czk);
    let target = args.target.unwrap_or(config.trading.charge_target_percent);

    info!(
        "Computing charging schedule for {} ({})",
        day.source_name, day.date
    );

    let optimizer = TradeOptimizer::from_config(&config.trading);
    let schedule = optimizer.charging_schedule(&ChargeRequest {
        today: &day.today,
        tomorrow: day.tomorrow.as_deref(),
        battery: &battery,
        max_charge_price_czk: max_price,
        target_level_percent: target,
        max_slots: args.max_slots,
        solar_forecast: day.solar.as_ref(),
    });

    emit_schedule(
        &schedule,
        &day.source_name,
        &args.output,
        args.csv_path.as_deref(),
    )
}

fn run_arbitrage(args: &ArbitrageArgs) -> Result<()> {
    check_csv_args(&args.output, args.csv_path.as_deref())?;

    let config = load_config(args.config.as_deref())?;
    let date = parse_date(args.date.as_deref())?;
    let loader = build_loader(args.from_json.as_deref(), &args.scenario, "none", false)?;
    let day = loader.load(date)?;

    let battery = resolve_battery(&config, args.battery_capacity, args.initial_level);

    info!(
        "Scanning {} ({}) for arbitrage pairs",
        day.source_name, day.date
    );

    let optimizer = TradeOptimizer::from_config(&config.trading);
    let opportunities = optimizer.arbitrage_opportunities(&ArbitrageRequest {
        today: &day.today,
        tomorrow: day.tomorrow.as_deref(),
        battery: &battery,
        min_profit_czk: args.min_profit,
    });

    if args.output == "table" || args.output == "both" {
        print!(
            "{}",
            TableFormatter::format_opportunities(&opportunities, args.top)
        );
    }
    if let Some(path) = args.csv_path.as_deref() {
        if args.output == "csv" || args.output == "both" {
            CsvFormatter::write_opportunities(&opportunities, path)?;
            info!("CSV written to {}", path);
        }
    }

    Ok(())
}

fn load_config(path: Option<&str>) -> Result<SimulatorConfig> {
    match path {
        Some(path) => SimulatorConfig::from_file(path),
        None => Ok(SimulatorConfig::default()),
    }
}

fn parse_date(raw: Option<&str>) -> Result<Option<NaiveDate>> {
    raw.map(|raw| {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", raw))
    })
    .transpose()
}

fn build_loader(
    from_json: Option<&str>,
    scenario_id: &str,
    solar_id: &str,
    with_tomorrow: bool,
) -> Result<Box<dyn DataLoader>> {
    if let Some(path) = from_json {
        return Ok(Box::new(JsonExportLoader::new(path.to_owned())));
    }

    let scenario = find_scenario(scenario_id)?;
    let solar = SolarProfile::from_id(solar_id)
        .ok_or_else(|| anyhow::anyhow!("Unknown solar profile '{}'", solar_id))?;

    Ok(Box::new(SyntheticLoader {
        scenario,
        solar,
        with_tomorrow,
    }))
}

fn resolve_battery(
    config: &SimulatorConfig,
    capacity_override: Option<f32>,
    level_override: Option<f32>,
) -> BatteryParameters {
    let mut battery = config.battery.to_parameters();
    if let Some(capacity) = capacity_override {
        battery.capacity_kwh = capacity;
    }
    if let Some(level) = level_override {
        battery.level_percent = level;
    }
    battery
}

fn check_csv_args(output: &str, csv_path: Option<&str>) -> Result<()> {
    if (output == "csv" || output == "both") && csv_path.is_none() {
        bail!("--csv-path is required when --output is '{}'", output);
    }
    Ok(())
}

fn emit_schedule(
    schedule: &[SlotSelection],
    source: &str,
    output: &str,
    csv_path: Option<&str>,
) -> Result<()> {
    if output == "table" || output == "both" {
        print!("{}", TableFormatter::format_schedule(schedule, source));
    }
    if let Some(path) = csv_path {
        if output == "csv" || output == "both" {
            CsvFormatter::write_schedule(schedule, path)?;
            info!("CSV written to {}", path);
        }
    }
    Ok(())
}
