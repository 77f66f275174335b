//! structmd CLI - OCR text structuring tool

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;

use structmd::{ConvertOptions, Converter, RenderOptions, StructureAnalyzer};

#[derive(Parser)]
#[command(name = "structmd")]
#[command(version)]
#[command(about = "Infer headings, lists and paragraphs in plain text and render Markdown", long_about = None)]
struct Cli {
    /// Input text file (stdin if omitted or "-")
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "markdown", env = "STRUCTMD_FORMAT")]
    format: OutputFormat,

    /// Output file (stdout if not specified)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Save to a generated file name (ocr_result_<timestamp>.<ext>)
    #[arg(long, conflicts_with = "output")]
    save: bool,

    /// Print the full conversion result as JSON
    #[arg(long)]
    json: bool,

    /// Print structure counts after the output
    #[arg(long)]
    stats: bool,

    /// Maximum heading level (1-6)
    #[arg(long, default_value = "6", value_parser = clap::value_parser!(u8).range(1..=6))]
    max_heading: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the inferred structure as JSON
    Analyze {
        /// Input text file (stdin if omitted or "-")
        #[arg(value_name = "FILE")]
        input: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Check a conversion request without running it
    Validate {
        /// Input text file (stdin if omitted or "-")
        #[arg(value_name = "FILE")]
        input: Option<PathBuf>,

        /// Target format name
        #[arg(short, long, default_value = "markdown")]
        format: String,
    },

    /// List supported output formats
    Formats,

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Markdown with inferred structure
    Markdown,
    /// Input text unchanged
    Text,
}

impl OutputFormat {
    fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Markdown => "markdown",
            OutputFormat::Text => "text",
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match &cli.command {
        Some(Commands::Analyze { input, compact }) => cmd_analyze(input.as_deref(), *compact),
        Some(Commands::Validate { input, format }) => cmd_validate(input.as_deref(), format),
        Some(Commands::Formats) => {
            cmd_formats();
            Ok(())
        }
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => cmd_convert(&cli),
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn read_input(input: Option<&Path>) -> io::Result<String> {
    match input {
        Some(path) if path != Path::new("-") => fs::read_to_string(path),
        _ => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

fn cmd_convert(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let text = read_input(cli.input.as_deref())?;

    let options = ConvertOptions::new()
        .with_render_options(RenderOptions::new().with_max_heading(cli.max_heading));
    let converter = Converter::with_options(options);

    let result = converter.convert_format(&text, cli.format.as_str())?;

    if let Some(error) = &result.error {
        eprintln!(
            "{} {} ({}), writing original text",
            "Conversion failed:".yellow(),
            error.message,
            error.kind
        );
    }

    let body = if cli.json {
        serde_json::to_string_pretty(&result)?
    } else {
        result.content.clone()
    };

    let target = if cli.save {
        let descriptor = converter.prepare_export(&body, &result.format, None)?;
        Some(PathBuf::from(descriptor.filename))
    } else {
        cli.output.clone()
    };

    if let Some(path) = target {
        fs::write(&path, &body)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", body);
    }

    if cli.stats {
        print_stats(&result);
    }

    Ok(())
}

fn print_stats(result: &structmd::ConversionResult) {
    println!();
    println!("{}", "Structure".cyan().bold());
    match result.structure_info {
        Some(info) => {
            println!("{}: {}", "Headings".bold(), info.headings_count);
            println!("{}: {}", "Paragraphs".bold(), info.paragraphs_count);
            println!("{}: {}", "List items".bold(), info.lists_count);
            println!("{}: {}", "Tables".bold(), info.tables_count);
        }
        None => println!("{}", "not analyzed".dimmed()),
    }
    println!(
        "{}: {:.3} ms",
        "Time".bold(),
        result.conversion_time * 1000.0
    );
}

fn cmd_analyze(input: Option<&Path>, compact: bool) -> Result<(), Box<dyn std::error::Error>> {
    let text = read_input(input)?;
    let structure = StructureAnalyzer::new().analyze_text(&text);

    let json = if compact {
        serde_json::to_string(&structure)?
    } else {
        serde_json::to_string_pretty(&structure)?
    };
    println!("{}", json);

    Ok(())
}

fn cmd_validate(input: Option<&Path>, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let text = read_input(input)?;
    let report = Converter::new().validate_conversion_request(&text, format);

    if report.valid {
        println!("{}", "Valid".green().bold());
    } else {
        println!("{}", "Invalid".red().bold());
    }
    for error in &report.errors {
        println!("  {} {}", "error:".red(), error);
    }
    for warning in &report.warnings {
        println!("  {} {}", "warning:".yellow(), warning);
    }

    if report.valid {
        Ok(())
    } else {
        Err(report.errors.join("; ").into())
    }
}

fn cmd_formats() {
    println!("{}", "Supported formats".cyan().bold());
    for format in Converter::new().get_supported_formats() {
        println!("  {}", format);
    }
}

fn cmd_version() {
    println!("{} {}", "structmd".cyan().bold(), env!("CARGO_PKG_VERSION"));
}
