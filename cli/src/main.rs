use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

use imgconv::batch::Batch;
use imgconv::cli::Cli;
use imgconv::report::FileResult;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Init logging
    let log_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = cli.to_config();
    if cli.verbose {
        println!("Options: {:#?}", config);
    }

    let batch = Batch::new(&cli.image_dir, config).context("Invalid conversion options")?;

    let files = batch.collect().context("Failed to collect input files")?;

    if files.is_empty() {
        println!("No .{} files found.", batch.config().input_ext);
        return Ok(());
    }

    if batch.config().dry_run {
        println!("[dry-run] Would convert:");
        for (input, output) in batch.plan(&files)? {
            println!("  {} ---> {}", input.display(), output.display());
        }
        return Ok(());
    }

    println!(
        "Converting {} file(s) from {} to {}...",
        files.len(),
        batch.config().input_ext,
        batch.config().output_ext
    );

    // The per-file log lines replace the bar in verbose mode
    let pb = if cli.verbose {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(files.len() as u64)
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .context("Invalid progress bar template")?
            .progress_chars("█▓░"),
    );

    let report = batch.run(&files, &|result: &FileResult| {
        if let Some(name) = result.input.file_name() {
            let msg = match result.error {
                None => format!("{} ({:+.1}%)", name.to_string_lossy(), result.size_change_pct()),
                Some(_) => format!("{} (failed)", name.to_string_lossy()),
            };
            pb.set_message(msg);
        }
        pb.inc(1);
    })?;

    pb.finish_with_message("Done!");
    report.print_summary();

    if cli.verbose {
        println!("\nconverted {} files", report.success_count());
    }

    if report.error_count() > 0 {
        anyhow::bail!("{} file(s) failed to convert", report.error_count());
    }

    Ok(())
}
