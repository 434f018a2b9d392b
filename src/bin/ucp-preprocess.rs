//! UCP Schema Preprocessor CLI
//!
//! Rewrites a tree of UCP JSON Schemas into a code-generator-friendly
//! output tree.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use ucp_preprocess::{preprocess_tree, PathFixup, PreprocessOptions};

#[derive(Parser)]
#[command(name = "ucp-preprocess")]
#[command(about = "Preprocess UCP JSON Schemas for code generation")]
#[command(version)]
struct Cli {
    /// Source schema tree
    #[arg(default_value = "ucp/source")]
    input_dir: PathBuf,

    /// Output tree (deleted and rebuilt on every run)
    #[arg(default_value = "temp_schemas")]
    output_dir: PathBuf,

    /// Document (relative to the input root) whose sibling references
    /// should be rewritten to absolute paths
    #[arg(long, requires = "fixup_sibling")]
    fixup_doc: Option<PathBuf>,

    /// Sibling file name to absolutize (repeatable)
    #[arg(long, requires = "fixup_doc")]
    fixup_sibling: Vec<String>,

    /// Suppress per-file progress output
    #[arg(long, short)]
    quiet: bool,

    /// Emit the run report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let fixup = cli.fixup_doc.map(|document| PathFixup {
        document,
        siblings: cli.fixup_sibling,
    });

    let options = PreprocessOptions {
        input_root: cli.input_dir,
        output_root: cli.output_dir,
        fixup,
    };

    if !cli.quiet && !cli.json {
        println!(
            "Preprocessing schemas in {} ...",
            options.input_root.display()
        );
    }

    let report = match preprocess_tree(&options) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(e.exit_code() as u8);
        }
    };

    if cli.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing report: {}", e);
                return ExitCode::from(2);
            }
        }
        return ExitCode::SUCCESS;
    }

    if !cli.quiet {
        for file in &report.files {
            if file.scenarios.is_empty() {
                println!("  {}", file.path.display());
            } else {
                println!("  {} [{}]", file.path.display(), file.scenarios.join(", "));
            }
        }
    }

    println!(
        "Preprocessed {} files ({} scenario documents) into {}",
        report.files_processed,
        report.scenarios_generated,
        report.output_root.display()
    );

    ExitCode::SUCCESS
}
