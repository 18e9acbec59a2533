//! Grantline CLI - transform grant tracker exports
//!
//! # Main Commands
//!
//! ```bash
//! grantline amendments Award_Details.xlsx        # Extract amendment JSON
//! grantline timeline "Master Tracker.csv" \
//!     --workbook Award_Details.xlsx              # Build the HTML timeline
//! ```
//!
//! # Debug Commands
//!
//! ```bash
//! grantline parse input.csv                      # Just parse a table to JSON
//! grantline check amendment_data.json            # Validate an amendment doc
//! ```

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use grantline::{
    build_timeline, extract_amendments, parse_file_auto, validate_amendment_map,
    TimelineOptions,
};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "grantline")]
#[command(about = "Transform grant tracker exports into amendment JSON and timeline HTML", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract amendments from a workbook into identifier-grouped JSON
    Amendments {
        /// Input workbook (.xlsx)
        input: PathBuf,

        /// Sheet holding the amendment rows
        #[arg(short, long, default_value = grantline::DEFAULT_SHEET)]
        sheet: String,

        /// Output file
        #[arg(short, long, default_value = "amendment_data.json")]
        output: PathBuf,

        /// Skip output validation
        #[arg(long)]
        no_validate: bool,
    },

    /// Build the interactive timeline HTML from a tracker table
    Timeline {
        /// Input tracker table (CSV export)
        input: PathBuf,

        /// Amendment workbook (.xlsx); omit for an empty overlay
        #[arg(short, long)]
        workbook: Option<PathBuf>,

        /// Sheet holding the amendment rows
        #[arg(short, long, default_value = grantline::DEFAULT_SHEET)]
        sheet: String,

        /// Reference date (YYYY-MM-DD, default: today)
        #[arg(long, value_name = "DATE")]
        as_of: Option<NaiveDate>,

        /// "Date of Source Data" label shown in the legend
        #[arg(long)]
        source_label: Option<String>,

        /// Output file
        #[arg(short, long, default_value = grantline::report::DEFAULT_OUTPUT)]
        output: PathBuf,

        /// Skip output validation
        #[arg(long)]
        no_validate: bool,
    },

    /// Parse a delimited table with auto-detection and output JSON
    Parse {
        /// Input table file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate an amendment JSON document against the embedded schema
    Check {
        /// Amendment JSON file
        input: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Amendments {
            input,
            sheet,
            output,
            no_validate,
        } => cmd_amendments(&input, &sheet, &output, no_validate),

        Commands::Timeline {
            input,
            workbook,
            sheet,
            as_of,
            source_label,
            output,
            no_validate,
        } => cmd_timeline(
            &input,
            workbook.as_deref(),
            sheet,
            as_of,
            source_label,
            &output,
            no_validate,
        ),

        Commands::Parse { input, output } => cmd_parse(&input, output.as_deref()),

        Commands::Check { input } => cmd_check(&input),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_amendments(
    input: &Path,
    sheet: &str,
    output: &Path,
    no_validate: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let result = extract_amendments(input, sheet, no_validate)?;

    let json = serde_json::to_string_pretty(&result.grouped)?;
    fs::write(output, &json)?;
    eprintln!("💾 Amendment data written to: {}", output.display());

    Ok(())
}

fn cmd_timeline(
    input: &Path,
    workbook: Option<&Path>,
    sheet: String,
    as_of: Option<NaiveDate>,
    source_label: Option<String>,
    output: &Path,
    no_validate: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = TimelineOptions {
        sheet,
        reference_date: as_of,
        source_label,
        skip_validation: no_validate,
    };

    let result = build_timeline(input, workbook, &options)?;

    fs::write(output, &result.html)?;
    eprintln!(
        "💾 Timeline with {} awards written to: {}",
        result.records.len(),
        output.display()
    );

    Ok(())
}

fn cmd_parse(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Parsing table: {}", input.display());

    let result = parse_file_auto(input)?;

    eprintln!("   Encoding: {}", result.encoding);
    eprintln!(
        "   Delimiter: '{}'",
        match result.delimiter {
            '\t' => "\\t".to_string(),
            c => c.to_string(),
        }
    );
    eprintln!("   Columns: {}", result.headers.join(", "));
    eprintln!("✅ Parsed {} rows", result.records.len());

    let json = serde_json::to_string_pretty(&result.records)?;
    match output {
        Some(p) => {
            fs::write(p, &json)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}

fn cmd_check(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("✔️  Validating: {}", input.display());

    let content = fs::read_to_string(input)?;
    let document: serde_json::Value = serde_json::from_str(&content)?;

    match validate_amendment_map(&document) {
        Ok(()) => {
            let groups = document.as_object().map(|m| m.len()).unwrap_or(0);
            eprintln!("✅ Valid amendment mapping ({} identifiers)", groups);
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ Invalid: {}", e);
            std::process::exit(1);
        }
    }
}
