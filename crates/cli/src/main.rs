//! refmerge command-line tool.
//!
//! Loads a merge plan and its baseline text, resolves the two branch commands
//! (prompting the operator or replaying an answers file when the resolver
//! needs a decision), and writes the merged text.

mod prompt;
mod style;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use tracing::info;
use tracing_subscriber::EnvFilter;

use refmerge_core::command::Command;
use refmerge_core::config::MergeConfig;
use refmerge_core::conflict::{ConflictResolver, Resolution};
use refmerge_core::oracle::ScriptedOracle;
use refmerge_core::plan::MergePlan;

use prompt::{CliOracle, PromptOracle};

// ---------------------------------------------------------------------------
// CLI argument definitions
// ---------------------------------------------------------------------------

/// Merge two refactoring branches recorded against a shared baseline.
#[derive(Parser, Debug)]
#[command(
    name = "refmerge",
    version,
    about = "Semantic three-way merge of refactoring commands"
)]
struct Cli {
    /// Path to the TOML configuration file. Defaults apply when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the log level from the config file (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve a plan and apply it to the baseline.
    Merge {
        /// Merge plan file.
        #[arg(short, long)]
        plan: PathBuf,

        /// Replay answers from this file instead of prompting.
        #[arg(short, long)]
        answers: Option<PathBuf>,

        /// Write the merged text here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also print a unified diff against the baseline.
        #[arg(long)]
        diff: bool,
    },

    /// Resolve a plan and show the resulting commands without applying them.
    Resolve {
        /// Merge plan file.
        #[arg(short, long)]
        plan: PathBuf,

        /// Replay answers from this file instead of prompting.
        #[arg(short, long)]
        answers: Option<PathBuf>,

        /// Print the resolution as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Generate a default configuration file.
    Init {
        /// Output path for the generated config file.
        #[arg(short, long, default_value = "./refmerge.toml")]
        output: PathBuf,
    },

    /// Validate a configuration file.
    Validate,
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Commands::Init { output } = &cli.command {
        init_tracing(cli.log_level.as_deref().unwrap_or("warn"));
        return cmd_init(output);
    }

    let config = load_config(cli.config.as_deref())?;
    init_tracing(cli.log_level.as_deref().unwrap_or(&config.log.level));

    match cli.command {
        Commands::Merge {
            plan,
            answers,
            output,
            diff,
        } => cmd_merge(&config, &plan, answers, output.as_deref(), diff),
        Commands::Resolve {
            plan,
            answers,
            json,
        } => cmd_resolve(&config, &plan, answers, json),
        Commands::Validate => cmd_validate(&config, cli.config.as_deref()),
        Commands::Init { .. } => unreachable!(),
    }
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

// ---------------------------------------------------------------------------
// Config helpers
// ---------------------------------------------------------------------------

fn load_config(path: Option<&Path>) -> Result<MergeConfig> {
    match path {
        Some(path) => {
            MergeConfig::load_and_validate(path).context("failed to load configuration file")
        }
        None => Ok(MergeConfig::default()),
    }
}

fn select_oracle(config: &MergeConfig, answers: Option<PathBuf>) -> Result<CliOracle> {
    match answers.or_else(|| config.oracle.answers_file.clone()) {
        Some(path) => {
            let oracle = ScriptedOracle::load_from_file(&path)
                .with_context(|| format!("failed to load answers from {}", path.display()))?;
            Ok(CliOracle::Scripted(oracle))
        }
        None => Ok(CliOracle::Prompt(PromptOracle::new())),
    }
}

fn load_plan(path: &Path) -> Result<(MergePlan, String)> {
    let plan = MergePlan::load_from_file(path).context("failed to load merge plan")?;
    let baseline = std::fs::read_to_string(&plan.baseline)
        .with_context(|| format!("failed to read baseline {}", plan.baseline.display()))?;
    Ok((plan, baseline))
}

// ---------------------------------------------------------------------------
// Subcommand implementations
// ---------------------------------------------------------------------------

fn cmd_merge(
    config: &MergeConfig,
    plan_path: &Path,
    answers: Option<PathBuf>,
    output: Option<&Path>,
    show_diff: bool,
) -> Result<()> {
    let (plan, baseline) = load_plan(plan_path)?;
    let mut oracle = select_oracle(config, answers)?;

    let outcome = plan
        .session(baseline.as_str())
        .with_layout(config.layout)
        .merge(&mut oracle)
        .context("merge failed")?;
    oracle.finish().context("answers file does not match the merge")?;

    info!(kind = %outcome.resolution.kind, "merge complete");

    match output {
        Some(path) => {
            std::fs::write(path, &outcome.merged)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!(
                "{}",
                style::success(&format!(
                    "Merged {} command(s) ({}) into {}",
                    outcome.commands().len(),
                    outcome.resolution.kind,
                    path.display()
                ))
            );
        }
        None => print!("{}", outcome.merged),
    }

    if show_diff {
        let patch = outcome.unified_diff(&baseline);
        eprintln!();
        if outcome.merged == baseline {
            eprintln!("{}", style::dim("(no changes)"));
        } else {
            eprintln!("{}", style::diff(&patch));
        }
    }

    Ok(())
}

fn cmd_resolve(
    config: &MergeConfig,
    plan_path: &Path,
    answers: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let plan = MergePlan::load_from_file(plan_path).context("failed to load merge plan")?;
    let mut oracle = select_oracle(config, answers)?;

    let resolution = ConflictResolver::resolve_detailed(&mut oracle, &plan.left, &plan.right)
        .context("resolution failed")?;
    oracle.finish().context("answers file does not match the resolution")?;

    if json {
        let rendered =
            serde_json::to_string_pretty(&resolution).context("failed to render resolution")?;
        println!("{}", rendered);
        return Ok(());
    }

    print_resolution(&resolution);
    Ok(())
}

fn print_resolution(resolution: &Resolution) {
    println!();
    println!(
        "{}",
        style::header(&format!(
            "Resolution: {} ({} command(s))",
            resolution.kind,
            resolution.commands.len()
        ))
    );
    println!();

    if resolution.commands.is_empty() {
        println!("{}", style::dim("nothing to apply"));
        return;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "Kind", "Target", "Change"]);

    for (i, command) in resolution.commands.iter().enumerate() {
        let (target, change) = match command {
            Command::Rename(r) => (
                format!("{}.{}", r.class_full_name, r.method),
                format!("{} -> {}", r.variable, r.new_name),
            ),
            Command::MoveMethod(m) => (
                format!("{}.{}", m.class_full_name, m.method),
                if m.move_up { "move up" } else { "keep" }.to_string(),
            ),
        };

        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(command.kind()),
            Cell::new(&target),
            Cell::new(&change),
        ]);
    }

    println!("{}", table);
    println!();
}

fn cmd_init(output: &Path) -> Result<()> {
    if output.exists() {
        anyhow::bail!(
            "file already exists: {}. Use a different path or remove the existing file.",
            output.display()
        );
    }

    let body = MergeConfig::default()
        .to_toml_string()
        .context("failed to render default configuration")?;
    let contents = format!(
        "# refmerge configuration\n\
         # [layout] describes the fixed two-method source shape used by method moves.\n\
         # Set [oracle] answers_file to replay answers instead of prompting.\n\n{}",
        body
    );

    std::fs::write(output, contents).context("failed to write config file")?;

    println!(
        "{}",
        style::success(&format!("Default configuration written to {}", output.display()))
    );
    println!();
    println!("Next steps:");
    println!("  1. Adjust [layout] if your sources use a different header or trailer size");
    println!(
        "  2. Validate with: refmerge validate --config {}",
        output.display()
    );
    println!(
        "  3. Merge with: refmerge merge --config {} --plan plan.toml",
        output.display()
    );

    Ok(())
}

fn cmd_validate(config: &MergeConfig, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => println!("Validating configuration: {}", path.display()),
        None => println!(
            "{}",
            style::warn("No --config given; validating built-in defaults")
        ),
    }
    println!();
    println!("  [OK] TOML structure is valid");
    println!("  [OK] All fields are valid");

    let layout = &config.layout;
    println!();
    println!("Configuration summary:");
    println!("  Log level      : {}", config.log.level);
    println!(
        "  Layout         : {} header, 2 x {} method, {} separator, {} trailer ({} lines)",
        layout.header_lines,
        layout.method_lines,
        layout.separator_lines,
        layout.trailer_lines,
        layout.total_lines()
    );
    println!(
        "  Answers file   : {}",
        config
            .oracle
            .answers_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "none (interactive)".to_string())
    );
    println!();
    println!("{}", style::success("Configuration is valid."));

    Ok(())
}
