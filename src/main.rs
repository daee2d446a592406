//! Command-line front end: analyse a project tree exported as JSON.

use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use colored::Colorize;
use tracing::Level;

use ladder_analyzer_lib::analysis::ProgramAnalysis;
use ladder_analyzer_lib::{analyze, load_project, parse_config_from_text, AnalyzerConfig, AnalyzerError};

#[derive(Parser)]
#[command(name = "ladder-analyzer")]
#[command(about = "Static analysis of ladder-logic projects")]
#[command(version)]
struct Cli {
    /// Project tree JSON produced by an upstream parser
    project: PathBuf,
    /// Analyzer config JSON
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,
    /// Print the full analysis as JSON instead of the report
    #[arg(long)]
    json: bool,
    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
    /// Rows shown per report table
    #[arg(long, default_value_t = 10)]
    top: usize,
    /// Debug logging on stderr
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("{} {}", "error:".red().bold(), e);
        process::exit(1);
    }
}

fn read_config(path: Option<&Path>) -> Result<AnalyzerConfig, AnalyzerError> {
    let Some(path) = path else {
        return Ok(AnalyzerConfig::default());
    };
    let text = std::fs::read_to_string(path).map_err(|source| AnalyzerError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config_from_text(&text)
}

fn run(cli: &Cli) -> Result<(), AnalyzerError> {
    let config = read_config(cli.config.as_deref())?;
    let project = load_project(&cli.project)?;
    let analysis = analyze(&project, &config);

    if cli.json {
        let out = if cli.pretty {
            serde_json::to_string_pretty(&analysis)
        } else {
            serde_json::to_string(&analysis)
        };
        println!("{}", out.map_err(AnalyzerError::Serialize)?);
    } else {
        print_report(&analysis, cli.top);
    }
    Ok(())
}

fn print_report(analysis: &ProgramAnalysis, top: usize) {
    let s = &analysis.summary;
    println!("{}", "Summary".bold().underline());
    println!(
        "  rungs {}  safety {}  motor {}  timer {}  counter {}",
        s.total_rungs,
        s.safety_rungs.to_string().red(),
        s.motor_control_rungs,
        s.timer_rungs,
        s.counter_rungs
    );
    println!("  tags {}  unreferenced {}", s.total_tags, s.unreferenced_tags);

    if !s.pattern_counts.is_empty() {
        println!("\n{}", "Patterns".bold().underline());
        for p in s.pattern_counts.iter().take(top) {
            println!("  {:<22} {}", p.pattern_type.as_str().cyan(), p.count);
        }
    }

    if !s.key_tags.is_empty() {
        println!("\n{}", "Key tags".bold().underline());
        for t in s.key_tags.iter().take(top) {
            println!(
                "  {:<28} {:<10} r{} w{}",
                t.name.yellow(),
                t.semantic_type.as_str(),
                t.readers,
                t.writers
            );
        }
    }

    println!("\n{}", "Rungs".bold().underline());
    for (key, ctx) in &analysis.rung_contexts {
        let key = if ctx.safety_relevant { key.red().bold() } else { key.normal() };
        println!("  {:<28} {:<18} {}", key, ctx.category.as_str().green(), ctx.purpose);
        for concern in &ctx.concerns {
            println!("    {} {}", "review:".yellow(), concern);
        }
    }
}
