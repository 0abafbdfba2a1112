use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "journeygen",
    about = "Generate a reproducible synthetic customer-journey dataset",
    version,
    after_help = "Examples:\n  journeygen generate                        # 10000 rows, seed 42 → customer_journey_data.csv\n  journeygen generate --rows 500 --seed 7 -o journeys.json\n  journeygen preview --rows 10\n  journeygen summary customer_journey_data.csv\n  journeygen check"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate the journey dataset and write it to a file
    Generate(GenerateArgs),

    /// Print sample generated records without writing anything
    Preview(PreviewArgs),

    /// Read a generated file and print aggregate statistics
    Summary(SummaryArgs),

    /// Verify that a lock file still reproduces its output
    Check(CheckArgs),
}

#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// Number of journey records to generate
    /// Falls back to JOURNEYGEN_ROWS, then journeygen.toml, then 10000
    #[arg(long, env = "JOURNEYGEN_ROWS")]
    pub rows: Option<usize>,

    /// Random seed for deterministic generation (default: 42)
    #[arg(long, env = "JOURNEYGEN_SEED")]
    pub seed: Option<u64>,

    /// Output file path (.csv or .json), or "-" for stdout
    #[arg(short, long, env = "JOURNEYGEN_OUTPUT")]
    pub output: Option<String>,

    /// Output format (auto-detected from file extension if not specified)
    #[arg(long)]
    pub format: Option<OutputFormat>,

    /// Skip writing journeygen.lock
    #[arg(long)]
    pub no_lock: bool,
}

#[derive(Parser, Debug)]
pub struct PreviewArgs {
    /// Number of sample records to show
    #[arg(long, default_value = "5")]
    pub rows: usize,

    /// Random seed (default: 42)
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Parser, Debug)]
pub struct SummaryArgs {
    /// Journey CSV file to summarize
    #[arg(default_value = "customer_journey_data.csv")]
    pub path: String,

    /// Output format for the summary
    #[arg(long, default_value = "table")]
    pub format: ReportFormat,
}

#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Lock file to verify
    #[arg(long, default_value = "journeygen.lock")]
    pub lock: String,

    /// Output format for the report
    #[arg(long, default_value = "text")]
    pub format: CheckFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Csv,
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ReportFormat {
    Table,
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CheckFormat {
    Text,
    Json,
}

impl From<OutputFormat> for journeygen_core::output::OutputFormat {
    fn from(f: OutputFormat) -> Self {
        match f {
            OutputFormat::Csv => journeygen_core::output::OutputFormat::Csv,
            OutputFormat::Json => journeygen_core::output::OutputFormat::Json,
        }
    }
}

impl GenerateArgs {
    /// Determine output format from the explicit flag or the file extension.
    pub fn output_format(&self, path: &str) -> journeygen_core::output::OutputFormat {
        match self.format {
            Some(fmt) => fmt.into(),
            None => journeygen_core::output::OutputFormat::from_path(std::path::Path::new(path)),
        }
    }
}
