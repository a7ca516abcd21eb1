mod bootstrap;
mod report;

use anyhow::{Context, Result};
use clap::Parser;
use health_core::settings::Settings;
use health_core::warnings::LogSink;
use health_data::analysis::analyze_files;

fn main() -> Result<()> {
    let settings = Settings::parse();

    bootstrap::setup_logging(settings.effective_log_level())?;

    tracing::info!("Health Aggregator v{} starting", env!("CARGO_PKG_VERSION"));

    // Boundary checks happen here; the pipeline assumes a valid zone and threshold.
    let user_tz = settings.resolve_timezone()?;
    let threshold = settings.validate_threshold()?;
    tracing::info!("Timezone: {}, sleep threshold: {}h", user_tz, threshold);

    let mut sink = LogSink;
    let analysis = analyze_files(
        &settings.sleep,
        &settings.workouts,
        user_tz,
        threshold,
        &mut sink,
    )?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    report::write_daily_table(&mut out, &analysis.daily_records)?;
    report::write_correlation(&mut out, &analysis.correlation)?;
    report::write_skip_summary(&mut out, &analysis.metadata)?;

    if let Some(output_path) = &settings.output {
        // A failed export is reported but does not discard the console report.
        match report::write_daily_records_json(output_path, &analysis.daily_records)
            .with_context(|| format!("failed to write output file '{}'", output_path.display()))
        {
            Ok(()) => {
                use std::io::Write as _;
                writeln!(
                    out,
                    "\nMerged daily records written to: {}",
                    output_path.display()
                )?;
            }
            Err(e) => eprintln!("Error: {:#}", e),
        }
    }

    Ok(())
}
