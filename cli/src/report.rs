use std::path::PathBuf;

use imgconv_core::convert::Conversion;
use imgconv_core::ConvertError;

/// Result of converting a single file.
#[derive(Debug, Clone)]
pub struct FileResult {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub original_size: u64,
    pub converted_size: u64,
    pub error: Option<String>,
}

impl FileResult {
    pub fn converted(conversion: Conversion) -> Self {
        Self {
            input: conversion.input,
            output: Some(conversion.output),
            original_size: conversion.original_size,
            converted_size: conversion.converted_size,
            error: None,
        }
    }

    pub fn failed(input: PathBuf, error: &ConvertError) -> Self {
        Self {
            input,
            output: None,
            original_size: 0,
            converted_size: 0,
            error: Some(error.to_string()),
        }
    }

    /// Size change relative to the input, negative when the output is smaller.
    pub fn size_change_pct(&self) -> f64 {
        if self.original_size == 0 {
            return 0.0;
        }
        (self.converted_size as f64 / self.original_size as f64 - 1.0) * 100.0
    }
}

/// Aggregate report for all processed files.
#[derive(Debug, Default)]
pub struct Report {
    pub results: Vec<FileResult>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, result: FileResult) {
        self.results.push(result);
    }

    pub fn total_original(&self) -> u64 {
        self.results.iter().map(|r| r.original_size).sum()
    }

    pub fn total_converted(&self) -> u64 {
        self.results.iter().map(|r| r.converted_size).sum()
    }

    pub fn success_count(&self) -> usize {
        self.results.iter().filter(|r| r.error.is_none()).count()
    }

    pub fn error_count(&self) -> usize {
        self.results.iter().filter(|r| r.error.is_some()).count()
    }

    pub fn print_summary(&self) {
        println!("\n--- Summary ---");
        println!(
            "Converted {} file(s) | Errors: {}",
            self.success_count(),
            self.error_count()
        );

        if self.success_count() > 0 {
            println!(
                "Total: {} → {}",
                format_size(self.total_original()),
                format_size(self.total_converted())
            );
        }

        for r in &self.results {
            if let Some(ref err) = r.error {
                println!("  ERROR {}: {}", r.input.display(), err);
            }
        }
    }
}

fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * KB;
    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
