use std::path::Path;

use anyhow::{Context, Result};
use roster_extract::{PageContent, Person, ProcessedContent};
use rusqlite::Connection;

pub fn connect(path: &Path) -> Result<Connection> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating database directory {}", dir.display()))?;
    }
    let conn = Connection::open(path)
        .with_context(|| format!("opening database {}", path.display()))?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS pages (
            id          INTEGER PRIMARY KEY,
            source_file TEXT UNIQUE NOT NULL,
            url         TEXT NOT NULL,
            title       TEXT,
            body_text   TEXT NOT NULL,
            imported_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        CREATE INDEX IF NOT EXISTS idx_pages_url ON pages(url);

        -- executives / board_members: JSON arrays of {name, role, contact_info}
        CREATE TABLE IF NOT EXISTS rosters (
            page_id       INTEGER PRIMARY KEY REFERENCES pages(id),
            url           TEXT NOT NULL,
            title         TEXT,
            source_file   TEXT NOT NULL,
            excluded      BOOLEAN NOT NULL DEFAULT 0,
            sections      TEXT NOT NULL,
            executives    TEXT NOT NULL,
            board_members TEXT NOT NULL,
            processed_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );
        CREATE INDEX IF NOT EXISTS idx_rosters_url ON rosters(url);
        ",
    )?;
    Ok(())
}

// ── Import ──

/// Insert pages, skipping any whose source file is already stored.
pub fn insert_pages(conn: &Connection, pages: &[PageContent]) -> Result<usize> {
    let tx = conn.unchecked_transaction()?;
    let mut count = 0;
    {
        let mut stmt = tx.prepare(
            "INSERT OR IGNORE INTO pages (source_file, url, title, body_text) VALUES (?1, ?2, ?3, ?4)",
        )?;
        for p in pages {
            count += stmt.execute(rusqlite::params![p.source_file, p.url, p.title, p.body_text])?;
        }
    }
    tx.commit()?;
    Ok(count)
}

// ── Processing ──

pub struct StoredPage {
    pub id: i64,
    pub page: PageContent,
}

pub fn fetch_unprocessed(conn: &Connection, limit: Option<usize>) -> Result<Vec<StoredPage>> {
    let sql = format!(
        "SELECT p.id, p.url, p.body_text, p.title, p.source_file
         FROM pages p
         LEFT JOIN rosters r ON r.page_id = p.id
         WHERE r.page_id IS NULL
         ORDER BY p.id{}",
        match limit {
            Some(n) => format!(" LIMIT {}", n),
            None => String::new(),
        }
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], |row| {
            Ok(StoredPage {
                id: row.get(0)?,
                page: PageContent {
                    url: row.get(1)?,
                    body_text: row.get(2)?,
                    title: row.get(3)?,
                    source_file: row.get(4)?,
                },
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub struct RosterRow {
    pub page_id: i64,
    pub excluded: bool,
    pub content: ProcessedContent,
}

pub fn save_rosters(conn: &Connection, rows: &[RosterRow]) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    {
        let mut stmt = tx.prepare(
            "INSERT OR REPLACE INTO rosters
             (page_id, url, title, source_file, excluded, sections, executives, board_members)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )?;
        for r in rows {
            let c = &r.content;
            stmt.execute(rusqlite::params![
                r.page_id,
                c.url,
                c.title,
                c.source_file,
                r.excluded,
                serde_json::to_string(&c.sections)?,
                serde_json::to_string(&c.executives)?,
                serde_json::to_string(&c.board_members)?,
            ])?;
        }
    }
    tx.commit()?;
    Ok(())
}

// ── Queries ──

/// Stored rosters whose URL contains `domain`, in page order.
pub fn fetch_rosters_for_domain(conn: &Connection, domain: &str) -> Result<Vec<ProcessedContent>> {
    let mut stmt = conn.prepare(
        "SELECT url, title, source_file, sections, executives, board_members
         FROM rosters
         WHERE excluded = 0 AND instr(lower(url), lower(?1)) > 0
         ORDER BY page_id",
    )?;
    let raw = stmt
        .query_map([domain], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, Option<String>>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    raw.into_iter()
        .map(|(url, title, source_file, sections, executives, board_members)| {
            Ok(ProcessedContent {
                sections: serde_json::from_str(&sections)
                    .with_context(|| format!("bad sections json for {url}"))?,
                executives: parse_people(&executives)
                    .with_context(|| format!("bad executives json for {url}"))?,
                board_members: parse_people(&board_members)
                    .with_context(|| format!("bad board_members json for {url}"))?,
                url,
                title,
                source_file,
            })
        })
        .collect()
}

fn parse_people(json: &str) -> serde_json::Result<Vec<Person>> {
    serde_json::from_str(json)
}

// ── Stats ──

pub struct Stats {
    pub pages: usize,
    pub processed: usize,
    pub unprocessed: usize,
    pub excluded: usize,
    pub executives: usize,
    pub board_members: usize,
}

pub fn get_stats(conn: &Connection) -> Result<Stats> {
    let pages: usize = conn.query_row("SELECT COUNT(*) FROM pages", [], |r| r.get(0))?;
    let processed: usize = conn.query_row("SELECT COUNT(*) FROM rosters", [], |r| r.get(0))?;
    let excluded: usize =
        conn.query_row("SELECT COUNT(*) FROM rosters WHERE excluded = 1", [], |r| r.get(0))?;
    let executives: usize = conn.query_row(
        "SELECT COALESCE(SUM(json_array_length(executives)), 0) FROM rosters",
        [],
        |r| r.get(0),
    )?;
    let board_members: usize = conn.query_row(
        "SELECT COALESCE(SUM(json_array_length(board_members)), 0) FROM rosters",
        [],
        |r| r.get(0),
    )?;
    Ok(Stats {
        pages,
        processed,
        unprocessed: pages - processed,
        excluded,
        executives,
        board_members,
    })
}

// ── Tests ──
