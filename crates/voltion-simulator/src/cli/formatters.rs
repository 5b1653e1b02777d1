// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of VoltION.

//! Output formatters for CLI simulation results.

use anyhow::Result;
use chrono::{DateTime, Utc};
use chrono_tz::Europe::Prague;
use comfy_table::{Attribute, Cell, Color, Table, presets::UTF8_FULL};
use std::fs::File;
use std::io::Write;
use voltion_core::economics;
use voltion_types::{ArbitrageOpportunity, SlotKind, SlotSelection};

/// Formatter for pretty ASCII tables
pub struct TableFormatter;

/// Formatter for CSV export
pub struct CsvFormatter;

/// Render a UTC window in local Prague time
fn local_window(start: DateTime<Utc>, end: DateTime<Utc>) -> String {
    format!(
        "{} - {}",
        start.with_timezone(&Prague).format("%d.%m. %H:%M"),
        end.with_timezone(&Prague).format("%H:%M")
    )
}

fn kind_label(kind: SlotKind) -> &'static str {
    match kind {
        SlotKind::Discharge => "Discharge",
        SlotKind::Charge => "Charge",
    }
}

impl TableFormatter {
    /// Format a merged schedule as a pretty table with an economics footer
    pub fn format_schedule(schedule: &[SlotSelection], source_name: &str) -> String {
        if schedule.is_empty() {
            return format!("No slots qualified for {} with the current thresholds.\n", source_name);
        }

        let mut output = String::new();

        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(vec![
            Cell::new("Window (local)").add_attribute(Attribute::Bold),
            Cell::new("Kind").add_attribute(Attribute::Bold),
            Cell::new("Blocks").add_attribute(Attribute::Bold),
            Cell::new("Energy\n(kWh)").add_attribute(Attribute::Bold),
            Cell::new("Price\n(CZK/kWh)").add_attribute(Attribute::Bold),
            Cell::new("Revenue\n(CZK)").add_attribute(Attribute::Bold),
            Cell::new("Cost\n(CZK)").add_attribute(Attribute::Bold),
            Cell::new("Battery\n(kWh)").add_attribute(Attribute::Bold),
            Cell::new("Partial").add_attribute(Attribute::Bold),
        ]);

        // Highlight the most valuable period
        let best_start = schedule
            .iter()
            .max_by(|a, b| {
                a.revenue_czk
                    .partial_cmp(&b.revenue_czk)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|period| period.start);

        for period in schedule {
            let window = local_window(period.start, period.end);
            let window_cell = if Some(period.start) == best_start && period.revenue_czk > 0.0 {
                Cell::new(window).fg(Color::Green).add_attribute(Attribute::Bold)
            } else {
                Cell::new(window)
            };

            table.add_row(vec![
                window_cell,
                Cell::new(kind_label(period.kind)),
                Cell::new(period.slot_count),
                Cell::new(format!("{:.2}", period.energy_kwh)),
                Cell::new(format!("{:.2}", period.price_czk_per_kwh)),
                Cell::new(format!("{:.2}", period.revenue_czk)),
                Cell::new(format!("{:.2}", period.cost_czk)),
                Cell::new(format!(
                    "{:.2} -> {:.2}",
                    period.battery_before_kwh, period.battery_after_kwh
                )),
                Cell::new(if period.partial_discharge { "yes" } else { "-" }),
            ]);
        }

        output.push_str(&table.to_string());
        output.push('\n');

        output.push_str(&format!(
            "Schedule for {}: {} period(s)\n",
            source_name,
            schedule.len()
        ));
        output.push_str(&format!(
            "Energy: {:.2} kWh | Revenue: {:.2} CZK | Cost: {:.2} CZK | Net: {:.2} CZK\n",
            economics::total_energy_kwh(schedule),
            economics::total_revenue_czk(schedule),
            economics::total_cost_czk(schedule),
            economics::net_profit_czk(schedule),
        ));

        output
    }

    /// Format ranked arbitrage pairs, showing at most `limit` rows
    pub fn format_opportunities(opportunities: &[ArbitrageOpportunity], limit: usize) -> String {
        if opportunities.is_empty() {
            return "No profitable charge/discharge pairs found.\n".to_owned();
        }

        let mut output = String::new();

        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(vec![
            Cell::new("#").add_attribute(Attribute::Bold),
            Cell::new("Charge (local)").add_attribute(Attribute::Bold),
            Cell::new("Discharge (local)").add_attribute(Attribute::Bold),
            Cell::new("Energy\n(kWh)").add_attribute(Attribute::Bold),
            Cell::new("Buy\n(CZK/kWh)").add_attribute(Attribute::Bold),
            Cell::new("Sell\n(CZK/kWh)").add_attribute(Attribute::Bold),
            Cell::new("Profit\n(CZK)").add_attribute(Attribute::Bold),
            Cell::new("ROI\n(%)").add_attribute(Attribute::Bold),
        ]);

        for (rank, opportunity) in opportunities.iter().take(limit).enumerate() {
            let rank_cell = if rank == 0 {
                Cell::new(rank + 1).fg(Color::Green).add_attribute(Attribute::Bold)
            } else {
                Cell::new(rank + 1)
            };

            table.add_row(vec![
                rank_cell,
                Cell::new(local_window(
                    opportunity.charge_window.start,
                    opportunity.charge_window.end,
                )),
                Cell::new(local_window(
                    opportunity.discharge_window.start,
                    opportunity.discharge_window.end,
                )),
                Cell::new(format!("{:.2}", opportunity.energy_kwh)),
                Cell::new(format!("{:.2}", opportunity.charge_price_czk_per_kwh)),
                Cell::new(format!("{:.2}", opportunity.discharge_price_czk_per_kwh)),
                Cell::new(format!("{:.2}", opportunity.profit_czk)),
                Cell::new(format!("{:.1}", opportunity.roi_percent)),
            ]);
        }

        output.push_str(&table.to_string());
        output.push('\n');
        output.push_str(&format!(
            "{} pair(s) above threshold, showing top {}\n",
            opportunities.len(),
            opportunities.len().min(limit)
        ));

        output
    }
}

impl CsvFormatter {
    /// Export a merged schedule to CSV
    pub fn write_schedule(schedule: &[SlotSelection], path: &str) -> Result<()> {
        let mut file = File::create(path)?;

        writeln!(
            file,
            "start,end,kind,blocks,energy_kwh,price_czk_per_kwh,revenue_czk,cost_czk,\
             battery_before_kwh,battery_after_kwh,partial"
        )?;

        for period in schedule {
            writeln!(
                file,
                "{},{},{},{},{:.4},{:.4},{:.4},{:.4},{:.4},{:.4},{}",
                period.start.to_rfc3339(),
                period.end.to_rfc3339(),
                kind_label(period.kind),
                period.slot_count,
                period.energy_kwh,
                period.price_czk_per_kwh,
                period.revenue_czk,
                period.cost_czk,
                period.battery_before_kwh,
                period.battery_after_kwh,
                period.partial_discharge,
            )?;
        }

        Ok(())
    }

    /// Export ranked arbitrage pairs to CSV
    pub fn write_opportunities(opportunities: &[ArbitrageOpportunity], path: &str) -> Result<()> {
        let mut file = File::create(path)?;

        writeln!(
            file,
            "charge_start,charge_end,discharge_start,discharge_end,energy_kwh,\
             charge_price_czk_per_kwh,discharge_price_czk_per_kwh,profit_czk,roi_percent"
        )?;

        for opportunity in opportunities {
            writeln!(
                file,
                "{},{},{},{},{:.4},{:.4},{:.4},{:.4},{:.2}",
                opportunity.charge_window.start.to_rfc3339(),
                opportunity.charge_window.end.to_rfc3339(),
                opportunity.discharge_window.start.to_rfc3339(),
                opportunity.discharge_window.end.to_rfc3339(),
                opportunity.energy_kwh,
                opportunity.charge_price_czk_per_kwh,
                opportunity.discharge_price_czk_per_kwh,
                opportunity.profit_czk,
                opportunity.roi_percent,
            )?;
        }

        Ok(())
    }
}
