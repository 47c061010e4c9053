use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use spam_filtering::{
    ClassifyRequest, Config, Dispatcher, LogFormat, LoggingConfig, Track, TrackPipeline,
};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "spam-filtering", version, about = "Classify short texts as spam or not spam")]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the model artifacts (overrides the config file)
    #[arg(long)]
    artifacts_dir: Option<PathBuf>,

    /// Log level or filter directive (overrides the config file)
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Classify one text and print the JSON result
    Classify {
        /// Track to use: message or email
        #[arg(short = 't', long = "type", default_value = "message")]
        kind: String,
        text: String,
    },
    /// Read JSON-lines requests from stdin, write one JSON result per line
    Batch,
    /// Load and validate all artifacts, then print a summary
    Check,
}

fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let installed = match config.format {
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    installed.map_err(|e| anyhow!(e))
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => Config::default(),
    };

    if let Some(dir) = &cli.artifacts_dir {
        config.artifacts.dir = dir.clone();
    }
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }

    Ok(config)
}

fn batch(dispatcher: &Dispatcher) -> anyhow::Result<()> {
    let stdin = std::io::stdin().lock();
    let mut stdout = std::io::stdout().lock();

    for (n, line) in stdin.lines().enumerate() {
        let line = line.context("reading stdin")?;
        if line.trim().is_empty() {
            continue;
        }

        let request: ClassifyRequest = serde_json::from_str(&line)
            .with_context(|| format!("line {}: malformed request", n + 1))?;
        let response = dispatcher.respond(&request)?;

        serde_json::to_writer(&mut stdout, &response)?;
        writeln!(stdout)?;
    }

    stdout.flush()?;
    Ok(())
}

fn check(dispatcher: &Dispatcher) {
    println!(
        "stop words: {}",
        dispatcher.preprocessor().stopwords().len()
    );
    println!("stemmer: {:?}", dispatcher.preprocessor().stemmer());
    for track in Track::ALL {
        let pipeline: &dyn TrackPipeline = dispatcher.pipeline(track);
        println!(
            "{track}: vocabulary {}, classifier {} over {} classes {:?}",
            pipeline.vectorizer().dimension(),
            pipeline.classifier().kind(),
            pipeline.classifier().classes().len(),
            pipeline.classifier().classes(),
        );
    }
    println!(
        "message labels: {:?}",
        dispatcher.message().labels().classes()
    );
}

fn run(cli: Cli, config: Config) -> anyhow::Result<()> {
    let dispatcher = Dispatcher::from_config(&config.artifacts)
        .with_context(|| format!("loading artifacts from {}", config.artifacts.dir.display()))?;

    match cli.command {
        Command::Classify { kind, text } => {
            let response = dispatcher.respond(&ClassifyRequest::new(kind, text))?;
            println!("{}", serde_json::to_string(&response)?);
        }
        Command::Batch => batch(&dispatcher)?,
        Command::Check => check(&dispatcher),
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_logging(&config.logging)?;

    run(cli, config).inspect_err(|e| error!("{e:#}"))
}
