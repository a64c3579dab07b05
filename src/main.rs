//! @ai:module:intent CLI for the content contest pipeline
//! @ai:module:layer presentation

use anyhow::Result;
use clap::{Parser, Subcommand};
use content_contest::{
    analyzer::{ContentAnalyzer, HttpLinkChecker},
    config::ContestConfig,
    contest::{missing_models, ContestRanker, ModelScore},
    generator::ContentGenerator,
    judge::AiJudge,
    prompts::{default_prompts, PromptFile, PromptLoader, PromptLoaderTrait},
    provider::ProviderGateway,
    qc::QcRunner,
    report::ReportGenerator,
    store,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "content-contest")]
#[command(about = "Generate, analyze, judge and rank AI-written articles")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Stage 1: generate articles from every configured model
    Generate {
        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output file override (default: raw_outputs/content_with_costs.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Stage 2: word counts and broken-link detection
    Analyze {
        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Input file override (default: raw_outputs/content_with_costs.json)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file override (default: raw_outputs/content_with_analysis.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Stage 3: score articles with the AI judge
    Judge {
        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Input file override (default: raw_outputs/content_with_analysis.json)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file override (default: raw_outputs/content_with_judgment.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Stage 4: normalize metrics and rank the leaderboard
    Rank {
        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Input file override (default: raw_outputs/content_with_judgment.json)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Report directory override (default: raw_outputs)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Draft one article and screen it through the quality checker
    Qc {
        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Prompt ID to draft (default: first prompt in the catalog)
        #[arg(short, long)]
        prompt: Option<String>,

        /// Output directory override (default: qc_results)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the prompt catalog
    List {
        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Initialize default configuration and prompt catalog
    Init {
        /// Output path for config file
        #[arg(short, long, default_value = "contest.toml")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("content_contest=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { config, output } => run_generate(config, output).await,
        Commands::Analyze {
            config,
            input,
            output,
        } => run_analyze(config, input, output).await,
        Commands::Judge {
            config,
            input,
            output,
        } => run_judge(config, input, output).await,
        Commands::Rank {
            config,
            input,
            output,
        } => run_rank(config, input, output),
        Commands::Qc {
            config,
            prompt,
            output,
        } => run_qc(config, prompt, output).await,
        Commands::List { config } => list_prompts(config),
        Commands::Init { output } => init_config(output),
    }
}

/// @ai:intent Stage 1 entry point
/// @ai:effects network, fs:write
async fn run_generate(config_path: Option<PathBuf>, output: Option<PathBuf>) -> Result<()> {
    let config = load_or_default_config(config_path)?;
    let output_path = output.unwrap_or_else(|| config.paths.costs_file());

    let gateway = Arc::new(ProviderGateway::from_env(&config.api)?);

    let loader = PromptLoader::new();
    let prompts = loader.load_all(&config.paths.prompts_dir)?;
    tracing::info!(
        "Loaded {} prompts for {} models",
        prompts.len(),
        config.models.len()
    );

    let generator = ContentGenerator::new(gateway, config.api.clone());
    let items = generator.run(&config.models, &prompts, &output_path).await?;

    println!(
        "Generated {} items across {} models, saved to {}",
        items.len(),
        config.models.len(),
        output_path.display()
    );
    Ok(())
}

/// @ai:intent Stage 2 entry point
/// @ai:effects network, fs:read, fs:write
async fn run_analyze(
    config_path: Option<PathBuf>,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<()> {
    let config = load_or_default_config(config_path)?;
    let input_path = input.unwrap_or_else(|| config.paths.costs_file());
    let output_path = output.unwrap_or_else(|| config.paths.analysis_file());

    let items = store::load_items(&input_path)?;
    tracing::info!("Analyzing {} items from {}", items.len(), input_path.display());

    let checker = HttpLinkChecker::new(config.api.link_timeout_secs)?;
    let analyzer = ContentAnalyzer::new(checker);
    let analyzed = analyzer.analyze_items(items).await;

    store::save_items(&output_path, &analyzed)?;

    let broken_total: usize = analyzed
        .iter()
        .filter_map(|i| i.broken_links.as_ref().map(Vec::len))
        .sum();
    println!(
        "Analyzed {} items ({} broken links), saved to {}",
        analyzed.len(),
        broken_total,
        output_path.display()
    );
    Ok(())
}

/// @ai:intent Stage 3 entry point
/// @ai:effects network, fs:read, fs:write
async fn run_judge(
    config_path: Option<PathBuf>,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<()> {
    let config = load_or_default_config(config_path)?;
    let input_path = input.unwrap_or_else(|| config.paths.analysis_file());
    let output_path = output.unwrap_or_else(|| config.paths.judgment_file());

    let items = store::load_items(&input_path)?;
    tracing::info!("Judging {} items from {}", items.len(), input_path.display());

    let gateway = Arc::new(ProviderGateway::from_env(&config.api)?);
    let judge = AiJudge::new(gateway, config.judge.clone(), config.api.clone());
    let judged = judge.run(&items, &output_path).await?;

    println!(
        "Judged {} of {} items, saved to {}",
        judged.len(),
        items.len(),
        output_path.display()
    );
    Ok(())
}

/// @ai:intent Stage 4 entry point
/// @ai:effects fs:read, fs:write
fn run_rank(
    config_path: Option<PathBuf>,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<()> {
    let config = load_or_default_config(config_path)?;
    let input_path = input.unwrap_or_else(|| config.paths.judgment_file());
    let report_dir = output.unwrap_or_else(|| config.paths.output_dir.clone());

    let items = store::load_items(&input_path)?;

    let expected: Vec<String> = config.models.iter().map(|m| m.id.clone()).collect();
    for model_id in missing_models(&expected, &items) {
        tracing::warn!("Model {} has no judged items and is excluded from ranking", model_id);
    }

    let ranker = ContestRanker::new(config.weights)?;
    let scores = ranker.rank(&items)?;

    let reporter = ReportGenerator::new();
    reporter.generate_all(&scores, &report_dir)?;

    print_leaderboard(&scores);
    Ok(())
}

/// @ai:intent QC entry point
/// @ai:effects network, fs:write
async fn run_qc(
    config_path: Option<PathBuf>,
    prompt_id: Option<String>,
    output: Option<PathBuf>,
) -> Result<()> {
    let config = load_or_default_config(config_path)?;
    let output_dir = output.unwrap_or_else(|| config.paths.qc_dir.clone());

    let loader = PromptLoader::new();
    let prompt = match prompt_id {
        Some(id) => loader
            .load_by_id(&config.paths.prompts_dir, &id)?
            .ok_or_else(|| anyhow::anyhow!("prompt {} not found in catalog", id))?,
        None => loader
            .load_all(&config.paths.prompts_dir)?
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("prompt catalog is empty"))?,
    };

    let gateway = Arc::new(ProviderGateway::from_env(&config.api)?);
    let runner = QcRunner::new(gateway, config.qc.clone(), config.api.clone());
    let path = runner.run(&prompt, &output_dir).await?;

    println!("QC run complete, results in {}", path.display());
    Ok(())
}

/// @ai:intent List the prompt catalog
/// @ai:effects fs:read
fn list_prompts(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_or_default_config(config_path)?;
    let loader = PromptLoader::new();
    let prompts = loader.load_all(&config.paths.prompts_dir)?;

    println!("Available prompts ({}):", prompts.len());
    println!();
    println!("{:<6} {:<45} {}", "ID", "Title", "Keywords");
    println!("{}", "-".repeat(80));

    for prompt in &prompts {
        println!(
            "{:<6} {:<45} {}",
            prompt.id,
            prompt.title,
            prompt.keyword_list()
        );
    }

    Ok(())
}

/// @ai:intent Write the default configuration and prompt catalog
/// @ai:effects fs:write
fn init_config(output: PathBuf) -> Result<()> {
    let config = ContestConfig::default();
    config.save(&output)?;
    println!("Configuration saved to {}", output.display());

    std::fs::create_dir_all(&config.paths.prompts_dir)?;

    for prompt in default_prompts() {
        let path = config
            .paths
            .prompts_dir
            .join(format!("{}.toml", prompt.id.to_lowercase()));

        if path.exists() {
            tracing::info!("Keeping existing prompt file {}", path.display());
            continue;
        }

        let content = toml::to_string_pretty(&PromptFile { prompt })?;
        std::fs::write(&path, content)?;
    }

    println!(
        "Prompt catalog written to {}",
        config.paths.prompts_dir.display()
    );
    Ok(())
}

/// @ai:intent Load configuration or fall back to defaults
/// @ai:effects fs:read
fn load_or_default_config(path: Option<PathBuf>) -> Result<ContestConfig> {
    let config = match path {
        Some(p) => ContestConfig::load(&p)?,
        None => {
            let default_path = PathBuf::from("contest.toml");

            if default_path.exists() {
                ContestConfig::load(&default_path)?
            } else {
                ContestConfig::default()
            }
        }
    };

    Ok(config)
}

/// @ai:intent Print the leaderboard to the console
/// @ai:effects io
fn print_leaderboard(scores: &[ModelScore]) {
    println!();
    println!("Contest Results");
    println!("===============");
    println!();
    println!(
        "{:<6} {:<36} {:>10} {:>7} {:>9} {:>11} {:>8} {:>7} {:>9}",
        "Rank", "Model", "Composite", "Cost", "Accuracy", "Factuality", "Safety", "Words", "Latency"
    );
    println!("{}", "-".repeat(110));

    for score in scores {
        println!(
            "{:<6} {:<36} {:>10.4} {:>7.3} {:>9.3} {:>11.3} {:>8.3} {:>7.3} {:>9.3}",
            score.rank,
            score.model_id,
            score.composite_score,
            score.cost_norm,
            score.accuracy_norm,
            score.factuality_norm,
            score.safety_norm,
            score.wordcount_norm,
            score.latency_norm
        );
    }

    if let Some(winner) = scores.first() {
        println!();
        println!(
            "Winner: {} with composite score {:.4}",
            winner.model_id, winner.composite_score
        );
    }

    println!();
}
