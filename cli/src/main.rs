use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use search_core::{
    remove_duplicates, DocId, DocumentStatus, InvertedIndex, RequestQueue, SearchConfig, StopWords,
};
use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};
use walkdir::WalkDir;

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct InputDoc {
    id: DocId,
    text: String,
    #[serde(default)]
    status: DocumentStatus,
    #[serde(default)]
    ratings: Vec<i32>,
}

#[derive(Parser)]
#[command(name = "search")]
#[command(about = "Query an in-memory TF-IDF index built from JSON/JSONL documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct IndexArgs {
    /// Input path (file or directory of .json/.jsonl files)
    #[arg(long)]
    docs: PathBuf,
    /// Space-separated stop words
    #[arg(long, default_value = "")]
    stop_words: String,
    /// JSON file with search settings (max_results, relevance_epsilon, history_capacity)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the top documents for a query
    Query {
        #[command(flatten)]
        index: IndexArgs,
        #[arg(long)]
        query: String,
        /// Only return documents with this status
        #[arg(long, default_value_t = DocumentStatus::Actual)]
        status: DocumentStatus,
        /// Override the configured number of results
        #[arg(long)]
        top: Option<usize>,
        /// Results per printed page
        #[arg(long, default_value_t = 2)]
        page_size: usize,
        /// Remove duplicate documents before searching
        #[arg(long, default_value_t = false)]
        dedup: bool,
    },
    /// Show which query terms a document contains
    Match {
        #[command(flatten)]
        index: IndexArgs,
        #[arg(long)]
        query: String,
        #[arg(long)]
        id: DocId,
    },
    /// Remove documents with identical vocabularies
    Dedup {
        #[command(flatten)]
        index: IndexArgs,
    },
    /// Run every line of a file as a query and report how many found nothing
    Replay {
        #[command(flatten)]
        index: IndexArgs,
        #[arg(long)]
        queries: PathBuf,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.command {
        Commands::Query { index, query, status, top, page_size, dedup } => {
            let mut idx = load_index(&index)?;
            run_query(&mut idx, &query, status, top, page_size, dedup, &mut out)
        }
        Commands::Match { index, query, id } => run_match(&load_index(&index)?, &query, id, &mut out),
        Commands::Dedup { index } => run_dedup(&mut load_index(&index)?, &mut out),
        Commands::Replay { index, queries } => {
            let f = File::open(&queries).with_context(|| format!("open {}", queries.display()))?;
            run_replay(&load_index(&index)?, BufReader::new(f), &mut out)
        }
    }
}

fn run_query(
    idx: &mut InvertedIndex,
    query: &str,
    status: DocumentStatus,
    top: Option<usize>,
    page_size: usize,
    dedup: bool,
    out: &mut impl Write,
) -> Result<()> {
    if dedup {
        remove_duplicates(idx);
    }
    let k = top.unwrap_or(idx.config().max_results);
    let found = idx.find_top_k(query, status, k)?;
    if found.is_empty() {
        writeln!(out, "no documents found")?;
    }
    for (page_no, page) in found.chunks(page_size.max(1)).enumerate() {
        writeln!(out, "Page {}", page_no + 1)?;
        for doc in page {
            writeln!(out, "{doc}")?;
        }
    }
    Ok(())
}

fn run_match(idx: &InvertedIndex, query: &str, id: DocId, out: &mut impl Write) -> Result<()> {
    let (words, status) = idx.match_document(query, id)?;
    writeln!(out, "{{ document_id = {id}, status = {status}, words = [{}] }}", words.join(", "))?;
    Ok(())
}

fn run_dedup(idx: &mut InvertedIndex, out: &mut impl Write) -> Result<()> {
    for doc_id in remove_duplicates(idx) {
        writeln!(out, "Found duplicate document id {doc_id}")?;
    }
    writeln!(out, "{} documents remain", idx.document_count())?;
    Ok(())
}

/// Blank lines are skipped; malformed queries are logged and not recorded.
fn run_replay(idx: &InvertedIndex, queries: impl BufRead, out: &mut impl Write) -> Result<()> {
    let mut queue = RequestQueue::new(idx);
    for line in queries.lines() {
        let line = line?;
        if line.trim().is_empty() { continue; }
        if let Err(e) = queue.add_find_request(&line) {
            tracing::warn!(query = %line, error = %e, "skipping query");
        }
    }
    writeln!(out, "Total empty requests: {}", queue.empty_result_count())?;
    Ok(())
}

fn load_index(args: &IndexArgs) -> Result<InvertedIndex> {
    let config = match &args.config {
        Some(path) => {
            let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
            SearchConfig::from_json(&raw).with_context(|| format!("parse {}", path.display()))?
        }
        None => SearchConfig::default(),
    };
    let stop_words = StopWords::from_text(&args.stop_words)?;
    let mut idx = InvertedIndex::with_config(stop_words, config);

    let docs = read_docs(&args.docs)?;
    for doc in docs {
        idx.add_document(doc.id, &doc.text, doc.status, &doc.ratings)
            .with_context(|| format!("add document {}", doc.id))?;
    }
    tracing::info!(num_docs = idx.document_count(), "index loaded");
    Ok(idx)
}

fn read_docs(input: &Path) -> Result<Vec<InputDoc>> {
    let mut files: Vec<PathBuf> = Vec::new();
    if input.is_dir() {
        for entry in WalkDir::new(input).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() && matches!(p.extension().and_then(|s| s.to_str()), Some("json" | "jsonl")) {
                files.push(p.to_path_buf());
            }
        }
    } else {
        files.push(input.to_path_buf());
    }

    let mut docs = Vec::new();
    for file in files {
        if file.extension().and_then(|s| s.to_str()) == Some("jsonl") {
            read_jsonl(&file, &mut docs)?;
        } else {
            read_json(&file, &mut docs)?;
        }
    }
    Ok(docs)
}

fn read_jsonl(file: &Path, docs: &mut Vec<InputDoc>) -> Result<()> {
    let f = File::open(file).with_context(|| format!("open {}", file.display()))?;
    for (line_no, line) in BufReader::new(f).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() { continue; }
        let doc: InputDoc = serde_json::from_str(&line)
            .with_context(|| format!("{}:{}", file.display(), line_no + 1))?;
        docs.push(doc);
    }
    Ok(())
}

fn read_json(file: &Path, docs: &mut Vec<InputDoc>) -> Result<()> {
    let f = File::open(file).with_context(|| format!("open {}", file.display()))?;
    let json: serde_json::Value = serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parse {}", file.display()))?;
    match json {
        serde_json::Value::Array(arr) => {
            for v in arr {
                docs.push(serde_json::from_value(v)?);
            }
        }
        serde_json::Value::Object(_) => docs.push(serde_json::from_value(json)?),
        _ => tracing::warn!(file = %file.display(), "ignoring non-document JSON"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn reads_json_and_jsonl_from_dir() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("a.jsonl"),
            "{\"id\": 1, \"text\": \"cat city\", \"ratings\": [1, 2]}\n\n{\"id\": 2, \"text\": \"dog\", \"status\": \"banned\"}\n",
        )
        .unwrap();
        fs::write(dir.path().join("b.json"), r#"[{"id": 3, "text": "cat dog"}]"#).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let docs = read_docs(dir.path()).unwrap();
        let ids: Vec<DocId> = docs.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(docs[1].status, DocumentStatus::Banned);
        assert_eq!(docs[0].ratings, vec![1, 2]);
        assert!(docs[2].ratings.is_empty());
    }

    #[test]
    fn load_index_applies_stop_words_and_config() {
        let dir = tempdir().unwrap();
        let docs = dir.path().join("docs.json");
        fs::write(&docs, r#"{"id": 42, "text": "cat in the city"}"#).unwrap();
        let config = dir.path().join("config.json");
        fs::write(&config, r#"{"max_results": 1}"#).unwrap();

        let args = IndexArgs { docs, stop_words: "in the".into(), config: Some(config) };
        let idx = load_index(&args).unwrap();
        assert_eq!(idx.config().max_results, 1);
        assert!(idx.find_top_documents("in").unwrap().is_empty());
        assert_eq!(idx.find_top_documents("city").unwrap()[0].id, 42);
    }

    #[test]
    fn duplicate_ids_fail_loading() {
        let dir = tempdir().unwrap();
        let docs = dir.path().join("docs.jsonl");
        fs::write(&docs, "{\"id\": 1, \"text\": \"a\"}\n{\"id\": 1, \"text\": \"b\"}\n").unwrap();
        let args = IndexArgs { docs, stop_words: String::new(), config: None };
        assert!(load_index(&args).is_err());
    }

    fn sample_index() -> InvertedIndex {
        let mut idx = InvertedIndex::new(StopWords::from_text("in the").unwrap());
        idx.add_document(1, "cat in the city", DocumentStatus::Actual, &[3]).unwrap();
        idx.add_document(2, "cat dog", DocumentStatus::Actual, &[9]).unwrap();
        idx.add_document(3, "dog cat", DocumentStatus::Actual, &[1]).unwrap();
        idx.add_document(4, "city bird", DocumentStatus::Banned, &[5]).unwrap();
        idx
    }

    fn output(f: impl FnOnce(&mut Vec<u8>) -> Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn query_prints_pages() {
        let mut idx = sample_index();
        let text = output(|out| run_query(&mut idx, "cat", DocumentStatus::Actual, None, 2, false, out));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "Page 1");
        assert!(lines[1].starts_with("{ document_id = 2,"));
        assert!(lines[2].starts_with("{ document_id = 1,"));
        assert_eq!(lines[3], "Page 2");
        assert!(lines[4].starts_with("{ document_id = 3,"));
    }

    #[test]
    fn query_top_override_and_status() {
        let mut idx = sample_index();
        let text = output(|out| run_query(&mut idx, "cat", DocumentStatus::Actual, Some(1), 5, false, out));
        assert_eq!(text.lines().count(), 2);
        assert!(text.contains("document_id = 2,"));

        let text = output(|out| run_query(&mut idx, "city", DocumentStatus::Banned, None, 2, false, out));
        assert!(text.contains("document_id = 4,"));
        assert!(!text.contains("document_id = 1,"));
    }

    #[test]
    fn query_with_dedup_and_empty_result() {
        let mut idx = sample_index();
        let text = output(|out| run_query(&mut idx, "dog", DocumentStatus::Actual, None, 2, true, out));
        assert!(text.contains("document_id = 2,"));
        assert!(!text.contains("document_id = 3,"));
        assert!(!idx.contains(3));

        let text = output(|out| run_query(&mut idx, "unicorn", DocumentStatus::Actual, None, 2, false, out));
        assert_eq!(text, "no documents found\n");
    }

    #[test]
    fn match_prints_words_and_status() {
        let idx = sample_index();
        let text = output(|out| run_match(&idx, "city cat the", 1, out));
        assert_eq!(text, "{ document_id = 1, status = actual, words = [cat, city] }\n");
        let text = output(|out| run_match(&idx, "city -bird", 4, out));
        assert_eq!(text, "{ document_id = 4, status = banned, words = [] }\n");
        assert!(run_match(&idx, "cat", 99, &mut Vec::new()).is_err());
    }

    #[test]
    fn dedup_prints_removed_and_remaining() {
        let mut idx = sample_index();
        let text = output(|out| run_dedup(&mut idx, out));
        assert_eq!(text, "Found duplicate document id 3\n3 documents remain\n");
    }

    #[test]
    fn replay_skips_blank_and_malformed_lines() {
        let idx = sample_index();
        let queries = "cat\n\n   \nunicorn\n--cat\n-\nbird\n";
        let text = output(|out| run_replay(&idx, queries.as_bytes(), out));
        // "bird" only matches a banned document.
        assert_eq!(text, "Total empty requests: 2\n");
    }

    #[test]
    fn replay_reads_queries_file() {
        let dir = tempdir().unwrap();
        let docs = dir.path().join("docs.jsonl");
        fs::write(&docs, "{\"id\": 1, \"text\": \"cat city\"}\n{\"id\": 2, \"text\": \"dog\"}\n").unwrap();
        let queries = dir.path().join("queries.txt");
        fs::write(&queries, "cat\nbird\n\nfish -dog\ndog\n").unwrap();

        let args = IndexArgs { docs, stop_words: String::new(), config: None };
        let idx = load_index(&args).unwrap();
        let f = File::open(&queries).unwrap();
        let text = output(|out| run_replay(&idx, BufReader::new(f), out));
        assert_eq!(text, "Total empty requests: 2\n");
    }
}
