use serde::Serialize;

/// Number of raw output lines captured on each side of a `!` error line.
const CONTEXT_LINES: usize = 2;

/// One error extracted from compiler output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    /// 1-based line number within the raw output.
    pub line_number: usize,
    pub message: String,
    pub context: Vec<String>,
}

/// Parses raw LaTeX output into diagnostics, in order of appearance.
///
/// A line starting with `!` (after trimming) yields a record with up to two
/// raw lines of context either side. Any other line containing `Error:`
/// yields a record without context.
pub fn parse_diagnostics(raw: &str) -> Vec<Diagnostic> {
    let lines: Vec<&str> = raw.split('\n').collect();
    let mut diagnostics = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        let trimmed = line.trim();

        if let Some(message) = trimmed.strip_prefix('!') {
            let start = i.saturating_sub(CONTEXT_LINES);
            let end = (i + CONTEXT_LINES + 1).min(lines.len());
            let context = (start..end)
                .filter(|&j| j != i)
                .map(|j| lines[j].to_string())
                .collect();

            diagnostics.push(Diagnostic {
                line_number: i + 1,
                message: message.trim().to_string(),
                context,
            });
        } else if trimmed.contains("Error:") {
            diagnostics.push(Diagnostic {
                line_number: i + 1,
                message: trimmed.to_string(),
                context: Vec::new(),
            });
        }
    }

    diagnostics
}
