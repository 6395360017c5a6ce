//! Edit file tool - literal replacement or line-range replacement

use serde_json::{json, Value};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

use crate::error::ToolError;
use crate::tools::{BoxFuture, Tool, ToolParams};

use super::{path_to_display, resolve_path};

/// Tool for editing an existing file in place
pub struct EditFile {
    workspace: PathBuf,
}

impl EditFile {
    pub fn new(workspace: PathBuf) -> Self {
        Self { workspace }
    }
}

impl Tool for EditFile {
    fn name(&self) -> &str {
        "edit_file"
    }

    fn description(&self) -> &str {
        "Edit a file in one of two modes:\n\
         - old_text/new_text: replace every occurrence of old_text with new_text\n\
         - start_line/end_line/new_content: replace the inclusive, 1-based line range with new_content \
           (end_line defaults to start_line; empty new_content deletes the lines)"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "file_path": {
                    "type": "string",
                    "description": "Path of the file to edit"
                },
                "old_text": {
                    "type": "string",
                    "description": "Exact text to replace (all occurrences)"
                },
                "new_text": {
                    "type": "string",
                    "description": "Replacement for old_text"
                },
                "start_line": {
                    "type": "integer",
                    "description": "First line to replace (1-based)"
                },
                "end_line": {
                    "type": "integer",
                    "description": "Last line to replace, inclusive (defaults to start_line)"
                },
                "new_content": {
                    "type": "string",
                    "description": "Replacement text for the line range"
                }
            },
            "required": ["file_path"]
        })
    }

    fn execute(&self, params: ToolParams, _cancel: CancellationToken) -> BoxFuture<'_, Result<String, ToolError>> {
        Box::pin(async move {
            let file_path = params.require_str("file_path")?;
            let path = resolve_path(&self.workspace, file_path);

            let content = tokio::fs::read_to_string(&path).await?;

            let (new_content, summary) = if params.contains("old_text") {
                let old_text = params.require_str("old_text")?;
                let new_text = params.require_str("new_text")?;
                if old_text.is_empty() {
                    return Err(ToolError::InvalidParams("old_text must not be empty".into()));
                }
                let occurrences = content.matches(old_text).count();
                if occurrences == 0 {
                    return Err(ToolError::ExecutionFailed(
                        "old_text not found in file. Match the exact content including whitespace.".into(),
                    ));
                }
                (
                    content.replace(old_text, new_text),
                    format!("{} occurrence(s) replaced", occurrences),
                )
            } else if params.contains("start_line") {
                let start = params.require_u64("start_line")? as usize;
                let end = params.opt_u64("end_line")?.map_or(start, |e| e as usize);
                let replacement = params.require_str("new_content")?;
                (
                    replace_line_range(&content, start, end, replacement)?,
                    format!("lines {}-{} replaced", start, end),
                )
            } else {
                return Err(ToolError::InvalidParams(
                    "either old_text/new_text or start_line/new_content is required".into(),
                ));
            };

            tokio::fs::write(&path, &new_content).await?;

            Ok(format!(
                "File edited successfully: {} ({})",
                path_to_display(&path),
                summary
            ))
        })
    }
}

/// Replace the inclusive 1-based line range `start..=end` with `replacement`.
///
/// A trailing newline on the original content is preserved. An empty
/// replacement removes the lines.
pub fn replace_line_range(
    content: &str,
    start: usize,
    end: usize,
    replacement: &str,
) -> Result<String, ToolError> {
    let trailing_newline = content.ends_with('\n');
    let body = content.strip_suffix('\n').unwrap_or(content);
    let lines: Vec<&str> = if content.is_empty() {
        Vec::new()
    } else {
        body.split('\n').collect()
    };

    if start > end {
        return Err(ToolError::InvalidRange(format!(
            "start_line {} is after end_line {}",
            start, end
        )));
    }
    if start == 0 || end > lines.len() {
        return Err(ToolError::InvalidRange(format!(
            "lines {}-{} are outside the file (1-{})",
            start,
            end,
            lines.len()
        )));
    }

    let replacement = replacement.strip_suffix('\n').unwrap_or(replacement);
    let mut result: Vec<&str> = Vec::with_capacity(lines.len());
    result.extend_from_slice(&lines[..start - 1]);
    if !replacement.is_empty() {
        result.extend(replacement.split('\n'));
    }
    result.extend_from_slice(&lines[end..]);

    let mut out = result.join("\n");
    if trailing_newline && !result.is_empty() {
        out.push('\n');
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_single_line() {
        let out = replace_line_range("a\nb\nc\n", 2, 2, "B").unwrap();
        assert_eq!(out, "a\nB\nc\n");
    }

    #[test]
    fn test_replace_with_more_lines() {
        let out = replace_line_range("a\nb\nc", 1, 2, "x\ny\nz").unwrap();
        assert_eq!(out, "x\ny\nz\nc");
    }

    #[test]
    fn test_delete_lines() {
        let out = replace_line_range("a\nb\nc\n", 2, 3, "").unwrap();
        assert_eq!(out, "a\n");
    }

    #[test]
    fn test_invalid_ranges() {
        assert!(matches!(
            replace_line_range("a\nb\nc\n", 3, 1, "x"),
            Err(ToolError::InvalidRange(_))
        ));
        assert!(matches!(
            replace_line_range("a\nb\nc\n", 0, 1, "x"),
            Err(ToolError::InvalidRange(_))
        ));
        assert!(matches!(
            replace_line_range("a\nb\nc\n", 2, 4, "x"),
            Err(ToolError::InvalidRange(_))
        ));
        assert!(matches!(
            replace_line_range("", 1, 1, "x"),
            Err(ToolError::InvalidRange(_))
        ));
    }
}
