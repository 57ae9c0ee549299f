use anyhow::{bail, Context, Result};
use std::env;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use hideout_extract::{load_rows, ExtractConfig, HideoutBuilder, Severity};

struct Cli {
    rows: PathBuf,
    config: Option<PathBuf>,
    version: String,
    include_seasonal: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = parse_cli()?;
    run(cli)
}

fn run(cli: Cli) -> Result<()> {
    eprintln!("🏠 Hideout Extract v{}", hideout_extract::VERSION);
    eprintln!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    // 1. Config
    let mut config = match &cli.config {
        Some(path) => ExtractConfig::from_file(path)?,
        None => ExtractConfig::default(),
    };
    if cli.include_seasonal {
        config.filter.include_seasonal = true;
    }
    eprintln!(
        "✓ {} curated items in {} categories, {} rename rules",
        config.categories.item_count(),
        config.categories.tables().len(),
        config.renames.len()
    );

    // 2. Rows
    let rows = load_rows(&cli.rows)?;
    eprintln!("✓ Loaded {} module levels from {}", rows.len(), cli.rows.display());

    // 3. Build
    let builder = HideoutBuilder::new(config);
    let output = builder
        .build(&cli.version, &rows)
        .context("Failed to build hideout document")?;

    let counts = output.reference.counts();
    eprintln!("✓ Found {} unique items", counts.items);
    eprintln!("✓ Found {} unique traders", counts.traders);
    eprintln!("✓ Found {} unique skills", counts.skills);
    eprintln!("✓ Found {} unique modules", counts.modules);
    for rename in &output.renames {
        eprintln!("  ↳ renamed \"{}\" → \"{}\"", rename.from, rename.to);
    }

    // 4. Document
    let json = serde_json::to_string_pretty(&output.document)?;
    println!("{}", json);

    // 5. Report
    eprintln!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    eprintln!("📊 {}", output.summary.summary());
    eprintln!("   fingerprint {}", output.summary.fingerprint);

    let quality = &output.quality;
    if !quality.unclassified.is_empty() {
        eprintln!("\n⚠️  The following lines were not recognised:");
        for line in &quality.unclassified {
            eprintln!("   {} {}: {}", line.module, line.level, line.text);
        }
    }
    if !quality.uncategorized.is_empty() {
        eprintln!("\n⚠️  The following items have no category:");
        for name in quality.uncategorized_names() {
            eprintln!("   {}", name);
        }
    }
    for issue in &quality.issues {
        let marker = match issue.severity {
            Severity::Critical => "❌",
            Severity::Warning => "⚠️ ",
            Severity::Info => "ℹ️ ",
        };
        eprintln!("{} {}: {} ({})", marker, issue.subject, issue.issue, issue.recommendation);
    }

    if quality.has_critical_issues() {
        eprintln!("\n❌ {} module levels are missing from the document", quality.skipped_rows.len());
    } else if quality.is_clean() {
        eprintln!("\n✅ Document built with no data gaps");
    }

    Ok(())
}

fn parse_cli() -> Result<Cli> {
    let mut rows = None;
    let mut config = None;
    let mut version = String::from("unknown");
    let mut include_seasonal = false;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-c" | "--config" => {
                config = Some(PathBuf::from(args.next().context("Missing config file")?));
            }
            "-v" | "--version" => version = args.next().context("Missing game version")?,
            "--include-seasonal" => include_seasonal = true,
            "-h" | "--help" => {
                eprintln!("Usage: hideout-extract <rows.csv> [--config <file>] [--version <v>] [--include-seasonal]");
                std::process::exit(0);
            }
            other if other.starts_with('-') => bail!("Unknown arg: {}", other),
            other => {
                if rows.is_some() {
                    bail!("Only one rows file can be given");
                }
                rows = Some(PathBuf::from(other));
            }
        }
    }

    let rows = rows.context("Specify the rows CSV file")?;
    Ok(Cli {
        rows,
        config,
        version,
        include_seasonal,
    })
}
