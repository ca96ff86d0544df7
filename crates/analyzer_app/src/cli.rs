use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "resume-analyzer",
    version,
    about = "Upload a resume and a job description for AI-powered analysis"
)]
pub struct Cli {
    /// RON settings file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Base URL of the analysis service
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Name sent with the upload
    #[arg(long, global = true)]
    pub user_name: Option<String>,

    /// Directory downloaded reports are saved to
    #[arg(long, global = true)]
    pub output_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Also write logs to ./analyzer.log
    #[arg(long, global = true)]
    pub log_file: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Analyze one resume and exit
    Analyze(AnalyzeArgs),
    /// Interactive session: analyze, download, analyze another
    Session,
}

#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// Resume file (.pdf, .doc, .docx, .txt)
    #[arg(short, long)]
    pub resume: PathBuf,

    /// Job description text
    #[arg(short, long, conflicts_with = "job_description_file")]
    pub job_description: Option<String>,

    /// File containing the job description
    #[arg(long)]
    pub job_description_file: Option<PathBuf>,

    /// Download the generated report after a successful analysis
    #[arg(short, long)]
    pub download: bool,

    /// Print the raw service response
    #[arg(long)]
    pub json: bool,
}
