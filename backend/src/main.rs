//! Weatherstat CLI - validate and analyze daily weather CSV files
//!
//! # Commands
//!
//! ```bash
//! weatherstat analyze weather.csv      # Full analysis as JSON
//! weatherstat validate weather.csv     # Check the file only
//! weatherstat serve                    # Start HTTP server (port 3000)
//! ```
//!
//! # Debug Commands
//!
//! ```bash
//! weatherstat parse weather.csv        # Just parse CSV to JSON rows
//! ```

use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use weatherstat::analysis::pipeline::format_delimiter;
use weatherstat::config::ServerConfig;
use weatherstat::{analyze_file, decode_content, detect_encoding, parse_file_auto, parse_table};

#[derive(Parser)]
#[command(name = "weatherstat")]
#[command(about = "Validate and analyze daily weather observations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a CSV file and output the analysis as JSON
    Analyze {
        /// Input CSV file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Single-line JSON instead of pretty-printed
        #[arg(long)]
        compact: bool,
    },

    /// Validate a CSV file without analysing it
    Validate {
        /// Input CSV file
        input: PathBuf,
    },

    /// Parse a CSV file and output JSON rows
    Parse {
        /// Input CSV file
        input: PathBuf,

        /// CSV delimiter (auto-detect if not specified)
        #[arg(short, long)]
        delimiter: Option<char>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Start HTTP server
    Serve {
        /// Port to listen on (default: $WEATHERSTAT_PORT or 3000)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Analyze {
            input,
            output,
            compact,
        } => cmd_analyze(&input, output.as_deref(), compact),

        Commands::Validate { input } => cmd_validate(&input),

        Commands::Parse {
            input,
            delimiter,
            output,
        } => cmd_parse(&input, delimiter, output.as_deref()),

        Commands::Serve { port } => cmd_serve(port).await,
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_analyze(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Analyzing: {}", input.display());

    let report = analyze_file(input)?;

    eprintln!("   Encoding: {}", report.source.encoding);
    eprintln!("   Delimiter: '{}'", format_delimiter(report.source.delimiter));
    eprintln!("   Records: {}", report.source.row_count);
    eprintln!(
        "   Period: {} → {}",
        report.source.first_date, report.source.last_date
    );

    let json = if compact {
        serde_json::to_string(&report)?
    } else {
        serde_json::to_string_pretty(&report)?
    };
    write_output(&json, output)?;

    eprintln!("\n✨ Done!");
    Ok(())
}

fn cmd_validate(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("✔️  Validating: {}", input.display());

    let bytes = fs::read(input)?;
    let dataset = weatherstat::validate_bytes(&bytes)?;
    let (first, last) = dataset.date_range();
    let months: Vec<String> = dataset.months().iter().map(u32::to_string).collect();

    eprintln!("\n📊 {} valid records", dataset.len());
    eprintln!("   Period: {} → {}", first, last);
    eprintln!("   Months: {}", months.join(", "));

    Ok(())
}

fn cmd_parse(
    input: &Path,
    delimiter: Option<char>,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Parsing CSV: {}", input.display());

    let table = match delimiter {
        Some(d) => {
            let bytes = fs::read(input)?;
            let encoding = detect_encoding(&bytes);
            let content = decode_content(&bytes, &encoding);
            parse_table(&content, d, encoding)?
        }
        None => parse_file_auto(input)?,
    };

    eprintln!("   Encoding: {}", table.encoding);
    eprintln!(
        "   Delimiter: '{}'{}",
        format_delimiter(table.delimiter),
        if delimiter.is_none() { " (auto-detected)" } else { "" }
    );
    eprintln!("   Columns: {}", table.headers.join(", "));
    eprintln!("✅ Parsed {} rows", table.rows.len());

    let json = serde_json::to_string_pretty(&table.to_json_records())?;
    write_output(&json, output)?;

    Ok(())
}

async fn cmd_serve(port: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = ServerConfig::from_env();
    if let Some(port) = port {
        config = config.with_port(port);
    }
    weatherstat::server::start_server(config).await
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
