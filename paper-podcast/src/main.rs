//! paper-podcast - Turn a research paper PDF into a spoken MP3

mod audio;
mod config;
mod pdf;
mod pipeline;
mod sentiment;
mod summarize;
mod text;
mod tts;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::PodcastConfig;
use indicatif::{ProgressBar, ProgressStyle};
use llm_client::{LlmConfig, ProviderKind};
use pipeline::{Pipeline, PipelineEvent, PodcastRequest, StageStatus};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use summarize::Summarizer;
use tts::{GoogleTranslateTts, SpeechSynthesizer};

#[derive(Parser, Debug)]
#[command(name = "paper-podcast")]
#[command(about = "Convert a research paper PDF into a podcast MP3", long_about = None)]
#[command(version)]
struct Args {
    /// Path to the PDF file
    pdf_file: Option<PathBuf>,

    /// Output file path (default: <pdf-name>.mp3)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Background music MP3 to mix under the speech
    #[arg(long)]
    background: Option<PathBuf>,

    /// Summarize the paper before reading it (needs the provider's API key)
    #[arg(long)]
    summarize: bool,

    /// Analyze sentiment and report a suggested speech rate
    #[arg(long)]
    sentiment: bool,

    /// Summary requests in flight at once (overrides config)
    #[arg(long)]
    concurrency: Option<usize>,

    /// Summarization model (overrides config)
    #[arg(long)]
    model: Option<String>,

    /// Write a JSON run report to this path
    #[arg(long)]
    report: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, default_value_t = false)]
    debug: bool,

    /// Subcommands
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Set the summarization provider (groq, openrouter, cerebras, openai)
    SetProvider {
        /// Provider name
        name: String,
    },
    /// Set the summarization model
    SetModel {
        /// Model identifier
        model: String,
    },
    /// Set the ffmpeg executable
    SetFfmpeg {
        /// Path to ffmpeg
        path: PathBuf,
    },
    /// Set how many summary requests run at once
    SetConcurrency {
        /// Value (1 = one at a time)
        value: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.debug);

    if let Some(Commands::Config { action }) = &args.command {
        return handle_config_command(action);
    }

    let pdf_path = args.pdf_file.clone().ok_or_else(|| {
        anyhow::anyhow!("PDF file path is required. Run 'paper-podcast --help' for usage.")
    })?;

    if !pdf_path.exists() {
        anyhow::bail!("PDF file not found: {}", pdf_path.display());
    }

    let mut config = PodcastConfig::load().context("Failed to load configuration")?;
    if let Some(concurrency) = args.concurrency {
        config.summarize_concurrency = concurrency;
    }
    if let Some(model) = &args.model {
        config.llm.model = model.clone();
    }

    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&pdf_path));

    if args.debug {
        eprintln!("PDF: {}", pdf_path.display());
        eprintln!("Output: {}", output_path.display());
        eprintln!("Background: {:?}", args.background);
        eprintln!("Summarize: {}", args.summarize);
        eprintln!("Sentiment: {}", args.sentiment);
    }

    let ffmpeg = audio::FfmpegTools::new(config.ffmpeg_path.clone(), config.ffprobe_path.clone());
    if args.background.is_some() && !ffmpeg.is_ffmpeg_available() {
        anyhow::bail!(
            "ffmpeg not found at '{}'. Install it or run 'paper-podcast config set-ffmpeg <path>'.",
            ffmpeg.ffmpeg_path().display()
        );
    }

    let pipeline = build_pipeline(&config, &ffmpeg, args.summarize)?;

    let pdf = std::fs::read(&pdf_path)
        .with_context(|| format!("Failed to read {}", pdf_path.display()))?;
    let background = args
        .background
        .as_ref()
        .map(|path| {
            std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
        })
        .transpose()?;

    let request = PodcastRequest {
        pdf,
        background,
        summarize: args.summarize,
        sentiment_adjustment: args.sentiment,
    };

    let mut spinner: Option<ProgressBar> = None;
    let output = pipeline
        .run(request, |event| render_event(&mut spinner, event))
        .await
        .context("Failed to generate podcast")?;

    std::fs::copy(&output.audio_path, &output_path)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;
    // Removes the run's intermediate files
    drop(output.workdir);

    let mut report = output.report;
    report.output = Some(output_path.clone());

    if let Some(report_path) = &args.report {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(report_path, json)
            .with_context(|| format!("Failed to write report {}", report_path.display()))?;
        eprintln!("Report: {}", report_path.display());
    }

    if report.is_degraded() {
        eprintln!("Finished with degraded stages, see warnings above.");
    }

    if let Some(rate) = report.nominal_speech_rate {
        eprintln!(
            "Sentiment: {:.3} (suggested speech rate {})",
            report.sentiment.unwrap_or_default(),
            rate
        );
    }

    let metadata = std::fs::metadata(&output_path)?;
    let size_mb = metadata.len() as f64 / (1024.0 * 1024.0);
    match report.duration_ms {
        Some(ms) => eprintln!(
            "Output: {} ({:.1} MB, {:.1}s)",
            output_path.display(),
            size_mb,
            ms as f64 / 1000.0
        ),
        None => eprintln!("Output: {} ({:.1} MB)", output_path.display(), size_mb),
    }

    Ok(())
}

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

/// `paper.pdf` -> `paper.mp3` next to it.
fn default_output_path(pdf_path: &Path) -> PathBuf {
    let stem = pdf_path.file_stem().unwrap_or_default();
    pdf_path.with_file_name(format!("{}.mp3", stem.to_string_lossy()))
}

/// Wire up the speech backend and, if requested, the summarizer.
///
/// A missing API key fails here, before any stage runs.
fn build_pipeline(
    config: &PodcastConfig,
    ffmpeg: &audio::FfmpegTools,
    summarize: bool,
) -> Result<Pipeline> {
    let tts_timeout = config.tts_timeout_secs.map(Duration::from_secs);
    let mut backend = GoogleTranslateTts::new(ffmpeg.clone(), tts_timeout)
        .context("Failed to initialize speech backend")?;
    if let Some(endpoint) = &config.tts_endpoint {
        backend = backend.with_endpoint(endpoint);
    }
    let synthesizer = SpeechSynthesizer::new(Arc::new(backend), config.tts_options());

    let mut pipeline = Pipeline::new(synthesizer, ffmpeg.clone());

    if summarize {
        let provider = llm_client::get_provider(&config.llm)
            .context("Failed to initialize summarization provider")?;
        log::info!("summarizing with {} ({})", provider.name(), provider.model());
        pipeline = pipeline.with_summarizer(Summarizer::new(provider, config.summary_options()));
    }

    Ok(pipeline)
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn render_event(spinner: &mut Option<ProgressBar>, event: &PipelineEvent) {
    match event {
        PipelineEvent::StageStarted(stage) => {
            let pb = ProgressBar::new_spinner();
            pb.set_style(spinner_style());
            pb.enable_steady_tick(Duration::from_millis(100));
            pb.set_message(stage.label());
            *spinner = Some(pb);
        }
        PipelineEvent::StageFinished { stage, status } => {
            let message = match status {
                StageStatus::Complete => format!("{} {}", stage.label(), status),
                _ => format!("{} ({})", stage.label(), status),
            };
            match spinner.take() {
                Some(pb) => pb.finish_with_message(message),
                None => eprintln!("{}", message),
            }
        }
        PipelineEvent::Warning(warning) => match spinner {
            Some(pb) => pb.suspend(|| eprintln!("Warning: {}", warning)),
            None => eprintln!("Warning: {}", warning),
        },
    }
}

fn handle_config_command(action: &ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = PodcastConfig::load()?;
            println!("Configuration file: {:?}", PodcastConfig::config_path()?);
            println!();
            println!("chunk_words = {}", config.chunk_words);
            println!("min_chunk_words = {}", config.min_chunk_words);
            println!("summary_max_tokens = {}", config.summary_max_tokens);
            println!("temperature = {}", config.temperature);
            println!("summarize_concurrency = {}", config.summarize_concurrency);
            println!("language = \"{}\"", config.language);
            println!("slow = {}", config.slow);
            match config.tts_timeout_secs {
                Some(secs) => println!("tts_timeout_secs = {}", secs),
                None => println!("tts_timeout_secs = (none)"),
            }
            match &config.tts_endpoint {
                Some(endpoint) => println!("tts_endpoint = \"{}\"", endpoint),
                None => println!("tts_endpoint = (default)"),
            }
            match &config.ffmpeg_path {
                Some(path) => println!("ffmpeg_path = \"{}\"", path.display()),
                None => println!("ffmpeg_path = (PATH)"),
            }
            match &config.ffprobe_path {
                Some(path) => println!("ffprobe_path = \"{}\"", path.display()),
                None => println!("ffprobe_path = (PATH)"),
            }
            print_llm_config(&config.llm);
        }
        ConfigAction::SetProvider { name } => {
            let kind: ProviderKind = name.parse()?;
            let mut config = PodcastConfig::load()?;
            config.llm.provider = name.to_lowercase();
            config.save()?;
            println!("Summarization provider set to: {}", kind.display_name());
        }
        ConfigAction::SetModel { model } => {
            let mut config = PodcastConfig::load()?;
            config.llm.model = model.clone();
            config.save()?;
            println!("Summarization model set to: {}", model);
        }
        ConfigAction::SetFfmpeg { path } => {
            let mut config = PodcastConfig::load()?;
            config.ffmpeg_path = Some(path.clone());
            config.save()?;
            println!("ffmpeg path set to: {}", path.display());
        }
        ConfigAction::SetConcurrency { value } => {
            let mut config = PodcastConfig::load()?;
            config.summarize_concurrency = (*value).max(1);
            config.save()?;
            println!("Summary concurrency set to: {}", config.summarize_concurrency);
        }
    }
    Ok(())
}

fn print_llm_config(llm: &LlmConfig) {
    println!();
    println!("[llm]");
    println!("provider = \"{}\"", llm.provider);
    println!("model = \"{}\"", llm.model);
    match llm.kind() {
        Ok(kind) => {
            let key_state = if llm.resolve_api_key().is_ok() {
                "set"
            } else {
                "missing"
            };
            println!("api_key = ({} via config or {})", key_state, kind.env_var());
            println!("base_url = \"{}\"", llm.resolve_base_url().unwrap_or_default());
        }
        Err(e) => println!("# {}", e),
    }
    if let Some(secs) = llm.timeout_secs {
        println!("timeout_secs = {}", secs);
    }
}
