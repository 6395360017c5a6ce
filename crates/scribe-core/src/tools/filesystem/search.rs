//! Content search tool
//!
//! Walks a directory tree and reports text files containing a query,
//! showing a few matching lines per file.

use globset::{Glob, GlobMatcher};
use regex::{Regex, RegexBuilder};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use walkdir::WalkDir;

use crate::context::project::is_ignored;
use crate::error::ToolError;
use crate::tools::{BoxFuture, Tool, ToolParams};

use super::{relative_display, resolve_path};

/// Default cap on the number of matching files reported
pub const DEFAULT_MAX_RESULTS: usize = 50;

/// Matching lines shown per file
const MAX_LINES_PER_FILE: usize = 5;

/// Extensions considered searchable text
const TEXT_EXTENSIONS: &[&str] = &[
    "go", "rs", "txt", "md", "json", "yaml", "yml", "toml", "js", "ts", "py", "java", "c",
    "cpp", "h", "hpp", "html", "css", "xml", "sql", "sh", "bat",
];

/// Tool for searching text across files
pub struct Search {
    workspace: PathBuf,
}

impl Search {
    pub fn new(workspace: PathBuf) -> Self {
        Self { workspace }
    }
}

struct SearchRequest {
    root: PathBuf,
    workspace: PathBuf,
    matcher: Regex,
    file_filter: Option<GlobMatcher>,
    show_line_numbers: bool,
    max_results: usize,
}

#[derive(Debug, Default)]
struct SearchOutcome {
    entries: Vec<String>,
    truncated: bool,
}

impl Tool for Search {
    fn name(&self) -> &str {
        "search"
    }

    fn description(&self) -> &str {
        "Search for text in files under a directory. Supports plain text or regex queries, \
         case sensitivity and a file name glob filter. Shows up to 5 matching lines per file."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Text or regular expression to search for"
                },
                "path": {
                    "type": "string",
                    "description": "Directory to search in (defaults to the workspace root)",
                    "default": "."
                },
                "file_pattern": {
                    "type": "string",
                    "description": "Glob matched against file names, e.g. '*.rs'"
                },
                "use_regex": {
                    "type": "boolean",
                    "description": "Treat the query as a regular expression",
                    "default": false
                },
                "case_sensitive": {
                    "type": "boolean",
                    "description": "Match case exactly",
                    "default": false
                },
                "show_line_numbers": {
                    "type": "boolean",
                    "description": "Prefix matching lines with their line number",
                    "default": true
                },
                "max_results": {
                    "type": "integer",
                    "description": "Maximum number of matching files to report",
                    "default": DEFAULT_MAX_RESULTS
                }
            },
            "required": ["query"]
        })
    }

    fn execute(&self, params: ToolParams, cancel: CancellationToken) -> BoxFuture<'_, Result<String, ToolError>> {
        Box::pin(async move {
            let query = params.require_str("query")?.to_string();
            let root = resolve_path(&self.workspace, params.opt_str("path")?.unwrap_or("."));
            let use_regex = params.bool_or("use_regex", false)?;
            let case_sensitive = params.bool_or("case_sensitive", false)?;

            let pattern = if use_regex {
                query.clone()
            } else {
                regex::escape(&query)
            };
            let matcher = RegexBuilder::new(&pattern)
                .case_insensitive(!case_sensitive)
                .build()
                .map_err(|e| ToolError::InvalidParams(format!("Invalid regex: {}", e)))?;

            let file_filter = params
                .opt_str("file_pattern")?
                .filter(|p| !p.is_empty())
                .map(|p| {
                    Glob::new(p)
                        .map(|g| g.compile_matcher())
                        .map_err(|e| ToolError::InvalidParams(format!("Invalid file_pattern: {}", e)))
                })
                .transpose()?;

            if !tokio::fs::metadata(&root).await?.is_dir() {
                return Err(ToolError::InvalidParams(format!(
                    "{} is not a directory",
                    root.display()
                )));
            }

            let request = SearchRequest {
                root,
                workspace: self.workspace.clone(),
                matcher,
                file_filter,
                show_line_numbers: params.bool_or("show_line_numbers", true)?,
                max_results: params
                    .opt_u64("max_results")?
                    .filter(|n| *n > 0)
                    .map_or(DEFAULT_MAX_RESULTS, |n| n as usize),
            };
            let max_results = request.max_results;

            let walk_cancel = cancel.clone();
            let outcome = tokio::task::spawn_blocking(move || run_search(&request, &walk_cancel))
                .await
                .map_err(|e| ToolError::ExecutionFailed(format!("search task failed: {}", e)))?;

            if cancel.is_cancelled() {
                return Err(ToolError::Cancelled);
            }

            Ok(format_outcome(&query, &outcome, max_results))
        })
    }
}

fn is_text_file(path: &Path) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .is_some_and(|ext| TEXT_EXTENSIONS.contains(&ext.as_str()))
}

/// Blocking walk. Stops at the first further candidate once `max_results` files matched.
fn run_search(request: &SearchRequest, cancel: &CancellationToken) -> SearchOutcome {
    let mut outcome = SearchOutcome::default();

    let walker = WalkDir::new(&request.root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_ignored(e));

    for entry in walker.filter_map(|e| e.ok()) {
        if cancel.is_cancelled() {
            break;
        }
        if !entry.file_type().is_file() || !is_text_file(entry.path()) {
            continue;
        }
        if let Some(filter) = &request.file_filter {
            if !filter.is_match(entry.file_name()) {
                continue;
            }
        }

        let Ok(content) = std::fs::read_to_string(entry.path()) else {
            continue;
        };

        let matches: Vec<(usize, &str)> = content
            .lines()
            .enumerate()
            .filter(|(_, line)| request.matcher.is_match(line))
            .collect();
        if matches.is_empty() {
            continue;
        }

        if outcome.entries.len() >= request.max_results {
            outcome.truncated = true;
            break;
        }

        let mut entry_text = format!("{}:\n", relative_display(entry.path(), &request.workspace));
        for (index, line) in matches.iter().take(MAX_LINES_PER_FILE) {
            if request.show_line_numbers {
                entry_text.push_str(&format!("  {}: {}\n", index + 1, line.trim()));
            } else {
                entry_text.push_str(&format!("  {}\n", line.trim()));
            }
        }
        if matches.len() > MAX_LINES_PER_FILE {
            entry_text.push_str(&format!(
                "  ... and {} more matches\n",
                matches.len() - MAX_LINES_PER_FILE
            ));
        }
        outcome.entries.push(entry_text);
    }

    outcome
}

fn format_outcome(query: &str, outcome: &SearchOutcome, max_results: usize) -> String {
    if outcome.entries.is_empty() {
        return format!("No matches found for '{}'", query);
    }

    let mut out = format!(
        "Found matches in {} file(s) for '{}'\n\n",
        outcome.entries.len(),
        query
    );
    for entry in &outcome.entries {
        out.push_str(entry);
        out.push('\n');
    }
    if outcome.truncated {
        out.push_str(&format!("Results limited to {} files\n", max_results));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_extensions() {
        assert!(is_text_file(Path::new("src/main.rs")));
        assert!(is_text_file(Path::new("README.MD")));
        assert!(!is_text_file(Path::new("image.png")));
        assert!(!is_text_file(Path::new("Makefile")));
    }

    #[test]
    fn test_format_no_matches() {
        let outcome = SearchOutcome::default();
        assert_eq!(format_outcome("needle", &outcome, 10), "No matches found for 'needle'");
    }
}
