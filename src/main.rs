use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use cv_match::{
    AnalysisMode, DisabledAnalyzer, KeywordExtractor, KeywordMatcher, MatchPipeline, MatchReport,
    OptimizationAdvisor, PlainTextExtractor, RewriteLevel, ScoreCalculator, ScoringConfig,
    SemanticAnalyzer, SemanticClient, SynonymTable, TextExtractor,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "cvmatch", about = "Score a CV against a job description")]
struct Cli {
    /// Optional YAML file overriding the scoring weights
    #[arg(long, global = true)]
    weights: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze how well a CV matches a job description
    Analyze {
        /// CV file (txt, text or md)
        #[arg(long)]
        cv: PathBuf,
        /// Job description file
        #[arg(long)]
        job: PathBuf,
        #[arg(long, value_enum, default_value_t = Mode::Combined)]
        mode: Mode,
    },
    /// Analyze, then request a rewritten CV from the semantic service
    Optimize {
        #[arg(long)]
        cv: PathBuf,
        #[arg(long)]
        job: PathBuf,
        #[arg(long, value_enum, default_value_t = Level::Honest)]
        level: Level,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    Combined,
    Keyword,
    Semantic,
}

impl From<Mode> for AnalysisMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Combined => AnalysisMode::Combined,
            Mode::Keyword => AnalysisMode::KeywordOnly,
            Mode::Semantic => AnalysisMode::SemanticOnly,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Level {
    Honest,
    Aggressive,
}

impl From<Level> for RewriteLevel {
    fn from(level: Level) -> Self {
        match level {
            Level::Honest => RewriteLevel::Honest,
            Level::Aggressive => RewriteLevel::Aggressive,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.weights {
        Some(path) => ScoringConfig::load(path)?,
        None => {
            let config = ScoringConfig::default();
            config.validate()?;
            config
        }
    };

    match cli.command {
        Commands::Analyze { cv, job, mode } => {
            let (job_text, resume_text) = read_documents(&job, &cv)?;
            let mode = AnalysisMode::from(mode);

            let report = if mode == AnalysisMode::KeywordOnly {
                run_analysis(config, DisabledAnalyzer, &job_text, &resume_text, mode).await?
            } else {
                let client = SemanticClient::from_env()?;
                run_analysis(config, client, &job_text, &resume_text, mode).await?
            };

            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Optimize { cv, job, level } => {
            let (job_text, resume_text) = read_documents(&job, &cv)?;
            let client = SemanticClient::from_env()?;

            let report = run_analysis(
                config,
                &client,
                &job_text,
                &resume_text,
                AnalysisMode::Combined,
            )
            .await?;

            let advisor = OptimizationAdvisor::new(level.into());
            let outcome = advisor
                .request_rewrite(&client, &job_text, &resume_text, &report.result)
                .await
                .context("CV rewrite failed")?;

            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
    }

    Ok(())
}

async fn run_analysis<A: SemanticAnalyzer>(
    config: ScoringConfig,
    analyzer: A,
    job_text: &str,
    resume_text: &str,
    mode: AnalysisMode,
) -> Result<MatchReport> {
    let matcher = KeywordMatcher::new(
        KeywordExtractor::default(),
        SynonymTable::default(),
        config.clone(),
    );
    let calculator = ScoreCalculator::new(config);
    let pipeline = MatchPipeline::new(matcher, analyzer, calculator);

    pipeline
        .analyze(job_text, resume_text, mode)
        .await
        .context("Analysis failed")
}

fn read_documents(job_path: &Path, cv_path: &Path) -> Result<(String, String)> {
    let extractor = PlainTextExtractor;
    Ok((
        read_document(&extractor, job_path)?,
        read_document(&extractor, cv_path)?,
    ))
}

fn read_document(extractor: &PlainTextExtractor, path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("txt");

    extractor
        .extract(&bytes, extension)
        .with_context(|| format!("Failed to extract text from {}", path.display()))
}
