use std::path::Path;

const MAX_VISIBLE_CHARS: usize = 100;

const SENSITIVE_PATTERNS: [(&str, &str); 6] = [
    ("Bearer ", "Bearer [REDACTED]"),
    ("secret=", "secret=[REDACTED]"),
    ("api_key=", "api_key=[REDACTED]"),
    ("api-key=", "api-key=[REDACTED]"),
    ("password=", "password=[REDACTED]"),
    ("token=", "token=[REDACTED]"),
];

/// Shortens transcript or translation text for log output and masks
/// anything that looks like a credential. Truncation counts characters,
/// so multi-byte scripts are never split mid-character.
pub fn sanitize_for_log(text: &str) -> String {
    let trimmed = text.trim();

    if trimmed.is_empty() {
        return String::from("[EMPTY]");
    }

    let total_chars = trimmed.chars().count();
    let visible = if total_chars > MAX_VISIBLE_CHARS {
        let head: String = trimmed.chars().take(MAX_VISIBLE_CHARS).collect();
        format!("{}... ({} chars total)", head, total_chars)
    } else {
        trimmed.to_string()
    };

    redact(&visible)
}

/// Rewrites every occurrence of `paths` in tool output to the bare file
/// name, and any leftover mention of their absolute directories to `<dir>`.
pub fn strip_paths(text: &str, paths: &[&Path]) -> String {
    let mut result = text.to_string();
    for path in paths {
        let full = path.to_string_lossy();
        if full.is_empty() {
            continue;
        }
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or_default();
        result = result.replace(full.as_ref(), name.as_ref());
    }
    for path in paths {
        let Some(parent) = path.parent().filter(|parent| parent.is_absolute() && parent.parent().is_some()) else {
            continue;
        };
        result = result.replace(parent.to_string_lossy().as_ref(), "<dir>");
    }
    result
}

fn redact(text: &str) -> String {
    let mut result = text.to_string();
    for (pattern, replacement) in SENSITIVE_PATTERNS {
        let mut search_from = 0;
        while let Some(found) = result[search_from..].find(pattern) {
            let start = search_from + found;
            let value_start = start + pattern.len();
            let end = result[value_start..]
                .find(|c: char| c.is_whitespace() || c == '&' || c == '"' || c == '\'')
                .map(|i| value_start + i)
                .unwrap_or(result.len());
            result.replace_range(start..end, replacement);
            search_from = start + replacement.len();
        }
    }
    result
}
