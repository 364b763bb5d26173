use std::path::{Path, PathBuf};
use std::sync::Arc;

use chartname_core::{
    constants::REVIEW_QUEUE_FILENAME, read_review_queue, write_review_queue, ConfigOverrides,
    CoreConfig, DocumentPipeline, ExtractedText, OutputFormat, PatientInfo, PipelineError,
    ReviewCorrection,
};
use chartname_types::NonEmptyText;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "chartname")]
#[command(about = "Rename exported patient chart PDFs")]
struct Cli {
    /// YAML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Output format id (see `chartname formats`)
    #[arg(long, global = true)]
    format: Option<OutputFormat>,
    /// Output folder (default: rename in place)
    #[arg(long, global = true)]
    output: Option<PathBuf>,
    /// Line preceding the patient name
    #[arg(long, global = true)]
    anchor: Option<String>,
    /// Current date for current-date formats (YYYY-MM-DD)
    #[arg(long, global = true)]
    today: Option<NaiveDate>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List output formats
    Formats,
    /// Show what a document would be renamed to, without touching it
    Preview {
        /// Source document
        source: PathBuf,
        /// Extracted text file (default: sidecar next to the document)
        #[arg(long)]
        text: Option<PathBuf>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Rename documents; low-confidence ones are left for review
    Rename {
        /// Source documents
        #[arg(required = true)]
        sources: Vec<PathBuf>,
        /// Write the review queue to this file
        #[arg(long)]
        queue: Option<PathBuf>,
    },
    /// Rename a reviewed document with corrected values
    Resume {
        /// Source document
        source: PathBuf,
        /// First name(s)
        first_name: String,
        /// Last name(s)
        last_name: String,
        /// Appointment date, e.g. "December 18, 2025"
        #[arg(long)]
        date: Option<String>,
        /// DOI/DOB code placed before the date, e.g. "DOI:010125"
        #[arg(long)]
        date_code: Option<String>,
    },
    /// Show a review queue file
    Queue {
        /// Queue file (default: review-queue.yaml in the current directory)
        path: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("chartname=warn".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let cfg = CoreConfig::resolve(
        cli.config.as_deref(),
        ConfigOverrides {
            output_dir: cli.output,
            format: cli.format,
            anchor_marker: cli.anchor,
        },
    )?;
    let mut pipeline = DocumentPipeline::from_config(Arc::new(cfg));
    if let Some(today) = cli.today {
        pipeline = pipeline.with_today(today);
    }

    match cli.command {
        Some(Commands::Formats) => {
            for format in OutputFormat::ALL {
                let date = if format.requires_appointment_date() {
                    "appointment date"
                } else {
                    "today"
                };
                println!("{:<24} {:<20} ({})", format.id(), format.suffix(), date);
            }
        }
        Some(Commands::Preview { source, text, json }) => {
            let info = match text {
                Some(text_path) => {
                    let raw = std::fs::read_to_string(&text_path)?;
                    match ExtractedText::from_raw(&raw) {
                        Some(text) => pipeline.analyse_text(&file_name(&source), &text),
                        None => {
                            eprintln!("No extractable text in {}", text_path.display());
                            return Ok(());
                        }
                    }
                }
                None => pipeline.analyse(&source)?,
            };
            let proposed = if info.needs_review() {
                None
            } else {
                Some(pipeline.proposed_filename(&info)?)
            };
            if json {
                println!("{}", preview_json(&source, &info, proposed.as_deref()));
            } else {
                print_preview(&source, &info, proposed.as_deref());
            }
        }
        Some(Commands::Rename { sources, queue }) => {
            let report = pipeline.process_batch(&sources);
            for receipt in &report.renamed {
                println!(
                    "Renamed {} -> {} ({})",
                    receipt.original_filename,
                    receipt.final_path.display(),
                    receipt.resolution.label()
                );
            }
            for pending in &report.pending {
                let reasons: Vec<&str> = pending.reasons().iter().map(|r| r.label()).collect();
                println!(
                    "Needs review: {} [{}]",
                    file_name(&pending.source),
                    reasons.join(", ")
                );
            }
            for failure in &report.failed {
                eprintln!(
                    "Failed: {} [{}] {}",
                    file_name(&failure.source),
                    failure.label,
                    failure.message
                );
            }
            if let Some(queue_path) = queue {
                if !report.pending.is_empty() {
                    write_review_queue(&queue_path, &report.review_queue(pipeline.config().format()))?;
                    println!("Review queue written to {}", queue_path.display());
                }
            }
        }
        Some(Commands::Resume {
            source,
            first_name,
            last_name,
            date,
            date_code,
        }) => {
            let correction = ReviewCorrection::new(
                NonEmptyText::new(&first_name)?,
                NonEmptyText::new(&last_name)?,
                date,
            )
            .with_date_code(date_code);
            resume_document(&pipeline, &source, correction)?;
        }
        Some(Commands::Queue { path }) => {
            let path = path.unwrap_or_else(|| PathBuf::from(REVIEW_QUEUE_FILENAME));
            let queue = read_review_queue(&path)?;
            if queue.entries.is_empty() {
                println!("Nothing to review.");
            } else {
                println!("Format: {} (generated {})", queue.format, queue.generated_at);
                for entry in queue.entries {
                    let reasons: Vec<&str> = entry.reasons.iter().map(|r| r.label()).collect();
                    println!("{} [{}]", entry.source_filename, reasons.join(", "));
                }
            }
        }
        None => {
            println!("Use 'chartname --help' for commands");
        }
    }

    Ok(())
}

/// Renames a reviewed document, reporting the outcome. A failure is returned so the exit status
/// reflects it.
fn resume_document(
    pipeline: &DocumentPipeline,
    source: &Path,
    correction: ReviewCorrection,
) -> Result<(), PipelineError> {
    match pipeline.resume(source, correction) {
        Ok(receipt) => {
            println!(
                "Renamed {} -> {} ({})",
                receipt.original_filename,
                receipt.final_path.display(),
                receipt.resolution.label()
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("Error resuming {} [{}]: {}", file_name(source), e.label(), e);
            Err(e)
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn format_date(info: &PatientInfo) -> Option<String> {
    info.appointment_date()
        .map(|d| format!("{:04}-{:02}-{:02}", d.year(), d.month(), d.day()))
}

fn print_preview(source: &Path, info: &PatientInfo, proposed: Option<&str>) {
    println!("Source:      {}", file_name(source));
    println!("Display:     {}", info.raw_display_name());
    println!("First name:  {}", info.first_name());
    println!("Last name:   {}", info.last_name());
    println!("Date:        {}", format_date(info).unwrap_or_else(|| "-".into()));
    if let Some(code) = info.date_code() {
        println!("Date code:   {}", code.as_str());
    }
    println!("Confidence:  {:?}", info.confidence());
    if !info.review_reasons().is_empty() {
        let reasons: Vec<&str> = info.review_reasons().iter().map(|r| r.label()).collect();
        println!("Review:      {}", reasons.join(", "));
    }
    if let Some(name) = proposed {
        println!("Rename to:   {}", name);
    }
}

fn preview_json(source: &Path, info: &PatientInfo, proposed: Option<&str>) -> serde_json::Value {
    serde_json::json!({
        "source": file_name(source),
        "display_name": info.raw_display_name(),
        "first_name": info.first_name(),
        "last_name": info.last_name(),
        "appointment_date": format_date(info),
        "date_code": info.date_code().map(|c| c.as_str()),
        "confidence": info.confidence(),
        "name_outcome": info.name_outcome(),
        "review_reasons": info.review_reasons(),
        "proposed_filename": proposed,
    })
}
