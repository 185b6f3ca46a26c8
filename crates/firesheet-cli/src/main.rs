mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "firesheet",
    version,
    about = "Convert fire detection BOQ and spec sheet PDFs into Excel workbooks"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a single PDF into an .xlsx workbook
    Convert {
        /// Path to the PDF file
        input_file: PathBuf,

        /// Output workbook path
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Document type: auto (default), boq or spec
        #[arg(short = 't', long = "type", default_value = "auto", value_parser = ["auto", "boq", "spec"])]
        doc_type: String,

        /// Custom JSON profile (default: builtin fire-detection profile)
        #[arg(short, long, value_name = "FILE")]
        profile: Option<PathBuf>,

        /// Name of the line-item or specifications sheet
        #[arg(long, value_name = "NAME")]
        sheet_name: Option<String>,
    },
    /// Convert every PDF in a directory
    Batch {
        /// Directory containing PDF files
        input_dir: PathBuf,

        /// Directory for the generated workbooks (created if missing)
        output_dir: PathBuf,

        /// Document type: auto (default), boq or spec
        #[arg(short = 't', long = "type", default_value = "auto", value_parser = ["auto", "boq", "spec"])]
        doc_type: String,

        /// Custom JSON profile
        #[arg(short, long, value_name = "FILE")]
        profile: Option<PathBuf>,
    },
    /// Extract records from a PDF and print them (no workbook)
    Parse {
        /// Path to the PDF file
        input_file: PathBuf,

        /// Document type: auto (default), boq or spec
        #[arg(short = 't', long = "type", default_value = "auto", value_parser = ["auto", "boq", "spec"])]
        doc_type: String,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Custom JSON profile
        #[arg(short, long, value_name = "FILE")]
        profile: Option<PathBuf>,
    },
    /// Compare several spec sheets in one workbook
    Compare {
        /// Spec sheet PDFs, numbered Product 1, 2, ... in this order
        #[arg(required = true, num_args = 1..)]
        input_files: Vec<PathBuf>,

        /// Output workbook path
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Custom JSON profile
        #[arg(short, long, value_name = "FILE")]
        profile: Option<PathBuf>,
    },
    /// Recompute line and grand totals of a priced BOQ workbook
    Totals {
        /// Path to the .xlsx workbook
        workbook: PathBuf,

        /// Sheet holding the line items
        #[arg(long, default_value = "BOQ")]
        sheet: String,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Inspect and validate extraction profiles
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
}

#[derive(Subcommand)]
enum ProfileAction {
    /// Print the keyword and pattern tables of a profile
    Show {
        /// Profile file (default: builtin fire-detection profile)
        file: Option<PathBuf>,
    },
    /// Validate a custom profile file
    Validate {
        /// Path to JSON profile
        file: PathBuf,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Convert {
            input_file,
            output,
            doc_type,
            profile,
            sheet_name,
        } => commands::convert::run(&input_file, &output, &doc_type, profile, sheet_name),
        Commands::Batch {
            input_dir,
            output_dir,
            doc_type,
            profile,
        } => commands::batch::run(&input_dir, &output_dir, &doc_type, profile),
        Commands::Parse {
            input_file,
            doc_type,
            output,
            profile,
        } => commands::parse::run(&input_file, &doc_type, &output, profile),
        Commands::Compare {
            input_files,
            output,
            profile,
        } => commands::compare::run(&input_files, &output, profile),
        Commands::Totals {
            workbook,
            sheet,
            output,
        } => commands::totals::run(&workbook, &sheet, &output),
        Commands::Profile { action } => match action {
            ProfileAction::Show { file } => commands::profile::show(file.as_deref()),
            ProfileAction::Validate { file } => commands::profile::validate(&file),
        },
    };

    if let Err(e) = result {
        log::error!("{}", commands::error_chain(&e));
        std::process::exit(1);
    }
}
