//! CSV export for tick telemetry and daily series.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::sim::kpi::DailySummary;
use crate::sim::types::TickResult;

/// Column header for per-tick telemetry.
const TICK_HEADER: &str = "tick,day,hour,energy_kwh,power_kw,occupied,\
                           arrivals,no_charge_arrivals,completed";

/// Column header for the daily series.
const DAILY_HEADER: &str = "day,energy_kwh,peak_power_kw,arrivals";

/// Exports tick results to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(results: &[TickResult], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_csv(results, io::BufWriter::new(file))
}

/// Writes tick results as CSV to any writer.
///
/// Produces deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(results: &[TickResult], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(TICK_HEADER.split(',').map(str::trim))?;

    for r in results {
        wtr.write_record(&[
            r.tick.to_string(),
            r.day.to_string(),
            r.hour.to_string(),
            format!("{:.4}", r.energy_kwh),
            format!("{:.2}", r.power_kw),
            r.occupied.to_string(),
            r.arrivals.to_string(),
            r.no_charge_arrivals.to_string(),
            r.completed.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Exports the daily series to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_daily_csv(days: &[DailySummary], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_daily_csv(days, io::BufWriter::new(file))
}

/// Writes the daily series as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_daily_csv(days: &[DailySummary], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(DAILY_HEADER.split(','))?;

    for d in days {
        wtr.write_record(&[
            d.day.to_string(),
            format!("{:.4}", d.energy_kwh),
            format!("{:.2}", d.peak_power_kw),
            d.arrivals.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
