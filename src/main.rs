// Command-line entry point for globalint.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Result};
use clap::Parser;

use globalint::application::AnalyzeUsecase;
use globalint::domain::ast::AstNode;
use globalint::domain::engine::RuleEngine;
use globalint::domain::rules;
use globalint::infrastructure::{collect_ast_files, load_tree, ProjectOracle};
use globalint::ports::report::{JsonExporter, TextExporter};
use globalint::ports::ReportExporter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Serialized AST file path (can specify multiple)
    #[arg(short, long, required = false)]
    input: Vec<String>,

    /// Folder(s) to scan recursively for *.ast.json files
    #[arg(short = 'd', long, required = false)]
    folder: Vec<String>,

    /// Output file path (stdout when omitted)
    #[arg(short, long)]
    output: Option<String>,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    format: String,

    /// Flag superglobal use even in top-level bootstrap code
    #[arg(long)]
    strict: bool,
}

fn load_sources(cli: &Cli) -> Result<Vec<(String, AstNode)>> {
    let mut paths: Vec<PathBuf> = cli.input.iter().map(PathBuf::from).collect();
    for folder in &cli.folder {
        paths.extend(collect_ast_files(Path::new(folder)));
    }
    if paths.is_empty() {
        bail!("provide at least one --input <file> or --folder <dir>");
    }

    let mut sources = Vec::with_capacity(paths.len());
    for path in paths {
        let tree = load_tree(&path)?;
        sources.push((path.display().to_string(), tree));
    }
    Ok(sources)
}

fn run(cli: &Cli) -> Result<usize> {
    let sources = load_sources(cli)?;
    let trees: Vec<AstNode> = sources.iter().map(|(_, tree)| tree.clone()).collect();
    let oracle = ProjectOracle::build(&trees);

    let rule_set = if cli.strict {
        rules::strict_set()
    } else {
        rules::default_set()
    };
    let engine = RuleEngine::with_rules(rule_set);

    let exporter: Box<dyn ReportExporter> = match cli.format.as_str() {
        "json" => Box::new(JsonExporter),
        "text" => Box::new(TextExporter),
        other => bail!("unknown output format: {other}"),
    };

    let usecase = AnalyzeUsecase {
        engine: &engine,
        oracle: &oracle,
        exporter: exporter.as_ref(),
    };
    let outcome = usecase.run(&sources)?;

    match &cli.output {
        Some(path) => fs::write(path, &outcome.rendered)?,
        None => print!("{}", outcome.rendered),
    }
    Ok(outcome.diagnostic_count)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        // Diagnostics present map to a nonzero exit for CI gates.
        Ok(0) => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
