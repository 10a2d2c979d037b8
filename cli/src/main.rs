//! retab CLI - rebuild spreadsheet tables from document text

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use retab::{
    CellValue, ConvertOptions, ConvertResult, Converter, ExtractOptions, InputDocument,
    OutputFormat,
};

#[derive(Parser)]
#[command(name = "retab")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Rebuild spreadsheet tables from PDF and text documents", long_about = None)]
struct Cli {
    /// Input PDF or text file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output file
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert one or more documents to spreadsheets
    Convert {
        /// Input files
        #[arg(value_name = "FILES", required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory (next to each input if not specified)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        #[command(flatten)]
        settings: Settings,

        /// Convert files one at a time
        #[arg(long)]
        sequential: bool,
    },

    /// Show the reconstructed rows of a document
    Inspect {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        #[command(flatten)]
        settings: Settings,

        /// Print the statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the extracted text of a document
    Text {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[command(flatten)]
        settings: Settings,
    },

    /// Show version information
    Version,
}

/// Options shared by every command that reads a document.
#[derive(clap::Args, Clone)]
struct Settings {
    /// Output format
    #[arg(long, value_enum, env = "RETAB_FORMAT", default_value = "xlsx")]
    format: Format,

    /// Maximum number of pages to read (0 = all)
    #[arg(long, env = "RETAB_PAGES", default_value_t = 0)]
    pages: u32,

    /// Worksheet name
    #[arg(long, env = "RETAB_SHEET", default_value = "Report")]
    sheet: String,

    /// Skip pages that fail to extract instead of aborting
    #[arg(long)]
    lenient: bool,

    /// Normalize extracted text to Unicode NFC
    #[arg(long)]
    normalize: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            format: Format::Xlsx,
            pages: 0,
            sheet: "Report".to_string(),
            lenient: false,
            normalize: false,
        }
    }
}

impl Settings {
    fn convert_options(&self) -> ConvertOptions {
        let mut extract = ExtractOptions::new()
            .with_max_pages(self.pages)
            .with_unicode_normalization(self.normalize);
        if self.lenient {
            extract = extract.lenient();
        }

        ConvertOptions::new()
            .with_extract_options(extract)
            .with_sheet_name(self.sheet.clone())
            .with_format(self.format.into())
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Excel workbook
    Xlsx,
    /// JSON sheet document
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Xlsx => OutputFormat::Xlsx,
            Format::Json => OutputFormat::Json,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Convert {
            inputs,
            output,
            settings,
            sequential,
        }) => cmd_convert(&inputs, output.as_deref(), &settings, sequential),
        Some(Commands::Inspect {
            input,
            settings,
            json,
        }) => cmd_inspect(&input, &settings, json),
        Some(Commands::Text {
            input,
            output,
            settings,
        }) => cmd_text(&input, output.as_deref(), &settings),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: convert if input is provided
            if let Some(input) = cli.input {
                cmd_convert_single(&input, cli.output.as_deref(), &Settings::default())
            } else {
                println!("{}", "Usage: retab <FILE> [OUTPUT]".yellow());
                println!("       retab --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Where the converted file for `input` goes.
fn output_path(input: &Path, output_dir: Option<&Path>, file_name: &str) -> PathBuf {
    let dir = output_dir
        .map(Path::to_path_buf)
        .or_else(|| input.parent().map(Path::to_path_buf))
        .unwrap_or_default();
    dir.join(file_name)
}

fn convert_one(converter: &Converter, input: &Path) -> retab::Result<ConvertResult> {
    let document = InputDocument::from_path(input)?;
    converter.convert(&document)
}

fn cmd_convert(
    inputs: &[PathBuf],
    output: Option<&Path>,
    settings: &Settings,
    sequential: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(dir) = output {
        fs::create_dir_all(dir)?;
    }

    let converter = Converter::with_options(settings.convert_options());

    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    let run = |input: &PathBuf| {
        pb.set_message(input.display().to_string());
        let outcome = convert_one(&converter, input).and_then(|result| {
            let path = output_path(input, output, &result.file_name);
            fs::write(&path, &result.content)?;
            Ok((path, result))
        });
        pb.inc(1);
        (input.clone(), outcome)
    };

    let outcomes: Vec<_> = if sequential {
        inputs.iter().map(run).collect()
    } else {
        inputs.par_iter().map(run).collect()
    };

    pb.finish_with_message("Done!");

    println!("\n{}", "Output files:".green().bold());
    let mut failures = 0;
    for (input, outcome) in &outcomes {
        match outcome {
            Ok((path, result)) => println!(
                "  {} {} ({} rows, {} typed cells)",
                "✓".green(),
                path.display(),
                result.stats.row_count(),
                result.stats.typed_cells()
            ),
            Err(e) => {
                failures += 1;
                log::warn!("Failed to convert {}: {}", input.display(), e);
                println!(
                    "  {} {}: {} ({})",
                    "✗".red(),
                    input.display(),
                    e.kind().user_message(),
                    e.to_string().dimmed()
                );
            }
        }
    }

    if failures > 0 {
        return Err(format!("{} of {} files failed", failures, outcomes.len()).into());
    }
    Ok(())
}

fn cmd_convert_single(
    input: &Path,
    output: Option<&Path>,
    settings: &Settings,
) -> Result<(), Box<dyn std::error::Error>> {
    let converter = Converter::with_options(settings.convert_options());
    let result = convert_one(&converter, input)?;

    let path = match output {
        Some(path) => path.to_path_buf(),
        None => output_path(input, None, &result.file_name),
    };
    fs::write(&path, &result.content)?;
    println!("{} {}", "Saved to".green(), path.display());

    Ok(())
}

fn cmd_inspect(
    input: &Path,
    settings: &Settings,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let converter = Converter::with_options(settings.convert_options());
    let document = InputDocument::from_path(input)?;
    let (table, stats) = converter.reconstruct(&document)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("{}", "Reconstructed Rows".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    for (i, row) in table.rows.iter().enumerate() {
        let cells: Vec<String> = row
            .cells
            .iter()
            .filter(|c| !c.is_empty())
            .map(|c| describe_cell(c.value(), c.raw()))
            .collect();
        println!(
            "{:>4} {:<9} {}",
            (i + 1).to_string().dimmed(),
            row.kind.name().yellow(),
            cells.join(" | ")
        );
    }

    println!();
    println!("{}", "Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Lines".bold(), stats.line_count);
    println!("{}: {}", "Blank lines".bold(), stats.blank_line_count);
    println!("{}: {}", "Rows".bold(), stats.row_count());
    println!("{}: {}", "Columns".bold(), stats.column_count);
    println!(
        "{}: {} heading, {} tab, {} space, {} pattern, {} fallback",
        "Row kinds".bold(),
        stats.heading_rows,
        stats.tab_rows,
        stats.space_rows,
        stats.pattern_rows,
        stats.fallback_rows
    );
    println!(
        "{}: {} currency, {} decimal, {} integer, {} date, {} text",
        "Cells".bold(),
        stats.currency_cells,
        stats.decimal_cells,
        stats.integer_cells,
        stats.date_cells,
        stats.text_cells
    );

    Ok(())
}

fn describe_cell(value: &CellValue, raw: &str) -> String {
    match value {
        CellValue::Text(_) => raw.to_string(),
        CellValue::Integer(n) => format!("{}", n.to_string().blue()),
        CellValue::Decimal(x) => format!("{}", format!("{:.2}", x).blue()),
        CellValue::Currency { amount, symbol } => {
            format!("{}", format!("{:.2} {}", amount, symbol).green())
        }
        CellValue::Date(date) => format!("{}", date.format("%d/%m/%Y").to_string().magenta()),
    }
}

fn cmd_text(
    input: &Path,
    output: Option<&Path>,
    settings: &Settings,
) -> Result<(), Box<dyn std::error::Error>> {
    let converter = Converter::with_options(settings.convert_options());
    let document = InputDocument::from_path(input)?;
    let text = converter.extract_text(&document)?;

    if let Some(path) = output {
        fs::write(path, &text)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", text);
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "retab".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Table reconstruction from document text");
    println!();
    println!("Repository: {}", "https://github.com/iyulab/retab".dimmed());
    println!("License: MIT");
}
