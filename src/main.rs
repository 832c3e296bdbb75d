mod db;
mod reader;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use roster_extract::report::unique_roster;
use roster_extract::{Patterns, RosterExtractor};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "roster_extract", about = "Extract officers and board members from page text")]
struct Cli {
    /// SQLite database path
    #[arg(long, global = true, env = "ROSTER_DB_PATH", default_value = "data/roster.sqlite")]
    db: PathBuf,
    /// Pattern tables (TOML); defaults to the built-in set
    #[arg(long, global = true, env = "ROSTER_PATTERNS")]
    patterns: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database schema
    Init,
    /// Load page documents (*.json) from a directory
    Import {
        dir: PathBuf,
    },
    /// Extract rosters from imported pages
    Process {
        /// Max pages to process (default: all unprocessed)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Run the extractor on one page document and print the result
    Extract {
        file: PathBuf,
        /// Print JSON instead of the text report
        #[arg(long)]
        json: bool,
    },
    /// Unique executives and board members across one site
    Summary {
        /// Substring of the page URLs, e.g. "ayagoldsilver.com"
        domain: String,
    },
    /// Show processing statistics
    Stats,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => {
            let conn = db::connect(&cli.db)?;
            db::init_schema(&conn)?;
            println!("Schema ready at {}", cli.db.display());
            Ok(())
        }
        Commands::Import { dir } => {
            let conn = db::connect(&cli.db)?;
            db::init_schema(&conn)?;
            let files = reader::list_page_files(&dir)?;
            let mut pages = Vec::with_capacity(files.len());
            let mut failed = 0;
            for file in &files {
                match reader::read_page(file) {
                    Ok(page) => pages.push(page),
                    Err(e) => {
                        warn!(file = %file.display(), error = %e, "skipping unreadable page");
                        failed += 1;
                    }
                }
            }
            let inserted = db::insert_pages(&conn, &pages)?;
            println!(
                "Imported {} new pages ({} files found, {} unreadable)",
                inserted,
                files.len(),
                failed
            );
            Ok(())
        }
        Commands::Process { limit } => {
            let conn = db::connect(&cli.db)?;
            db::init_schema(&conn)?;
            let pages = db::fetch_unprocessed(&conn, limit)?;
            if pages.is_empty() {
                println!("No unprocessed pages. Run 'import' first.");
                return Ok(());
            }
            let extractor = load_extractor(cli.patterns.as_deref())?;
            println!("Processing {} pages...", pages.len());
            let counts = process_pages(&conn, &extractor, &pages)?;
            counts.print();
            Ok(())
        }
        Commands::Extract { file, json } => {
            let extractor = load_extractor(cli.patterns.as_deref())?;
            let page = reader::read_page(&file)?;
            let content = extractor.process(&page);
            if json {
                println!("{}", serde_json::to_string_pretty(&content)?);
            } else {
                println!("{content}");
            }
            Ok(())
        }
        Commands::Summary { domain } => {
            let conn = db::connect(&cli.db)?;
            db::init_schema(&conn)?;
            let rosters = db::fetch_rosters_for_domain(&conn, &domain)?;
            if rosters.is_empty() {
                println!("No processed pages match '{}'.", domain);
                return Ok(());
            }
            let summary = unique_roster(&rosters);
            println!("{}", serde_json::to_string_pretty(&summary)?);
            println!(
                "\n{} pages | {} executives | {} board members",
                rosters.len(),
                summary.executives.len(),
                summary.board_members.len()
            );
            Ok(())
        }
        Commands::Stats => {
            let conn = db::connect(&cli.db)?;
            db::init_schema(&conn)?;
            let s = db::get_stats(&conn)?;
            println!("Pages:         {}", s.pages);
            println!("Processed:     {}", s.processed);
            println!("Unprocessed:   {}", s.unprocessed);
            println!("Excluded:      {}", s.excluded);
            println!("Executives:    {}", s.executives);
            println!("Board members: {}", s.board_members);
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn load_extractor(patterns: Option<&Path>) -> anyhow::Result<RosterExtractor> {
    let tables = match patterns {
        Some(path) => Patterns::from_file(path)
            .with_context(|| format!("loading pattern tables from {}", path.display()))?,
        None => Patterns::default_tables().clone(),
    };
    let extractor = RosterExtractor::new(tables);
    info!(version = extractor.patterns().version, "pattern tables ready");
    Ok(extractor)
}

struct ProcessCounts {
    pages: usize,
    excluded: usize,
    executives: usize,
    board_members: usize,
}

impl ProcessCounts {
    fn print(&self) {
        println!(
            "Saved {} rosters ({} excluded), {} executives, {} board members.",
            self.pages, self.excluded, self.executives, self.board_members,
        );
    }
}

fn process_pages(
    conn: &rusqlite::Connection,
    extractor: &RosterExtractor,
    pages: &[db::StoredPage],
) -> anyhow::Result<ProcessCounts> {
    use indicatif::{ProgressBar, ProgressStyle};
    use rayon::prelude::*;

    let pb = ProgressBar::new(pages.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")?
            .progress_chars("#>-"),
    );

    let mut counts = ProcessCounts {
        pages: 0,
        excluded: 0,
        executives: 0,
        board_members: 0,
    };

    for chunk in pages.chunks(500) {
        let rows: Vec<db::RosterRow> = chunk
            .par_iter()
            .map(|stored| db::RosterRow {
                page_id: stored.id,
                excluded: extractor.is_excluded(&stored.page.url),
                content: extractor.process(&stored.page),
            })
            .collect();

        for row in &rows {
            counts.pages += 1;
            counts.excluded += usize::from(row.excluded);
            counts.executives += row.content.executives.len();
            counts.board_members += row.content.board_members.len();
        }

        db::save_rosters(conn, &rows)?;
        pb.inc(chunk.len() as u64);
    }

    pb.finish_and_clear();
    Ok(counts)
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
