//! "Related Agents" section parsing.
//!
//! Agent bodies often end with a hand-maintained table or list pointing at
//! other agents. The section starts at any heading containing "related agents"
//! and ends at the next heading of the same or a higher level.
//!
//! Tables and lists are routinely truncated or half-edited, so anything that
//! does not look like an entry is skipped rather than reported.

use super::RelatedAgent;
use regex::Regex;
use std::sync::LazyLock;

static HEADING_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(.*?)\s*#*\s*$").expect("Invalid heading regex"));

static NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.-]*$").expect("Invalid name regex"));

/// Extract related-agent entries from a Markdown body.
pub fn parse_related_section(body: &str) -> Vec<RelatedAgent> {
    let mut entries: Vec<RelatedAgent> = Vec::new();
    let mut section_level: Option<usize> = None;
    let mut in_fence = false;
    // Whether the previous line was a table row that produced an entry.
    let mut prev_row_pushed = false;

    for raw in body.lines() {
        let line = raw.trim();

        if line.starts_with("```") || line.starts_with("~~~") {
            in_fence = !in_fence;
            prev_row_pushed = false;
            continue;
        }
        if in_fence {
            continue;
        }

        if let Some(caps) = HEADING_REGEX.captures(line) {
            let level = caps[1].len();
            if caps[2].to_lowercase().contains("related agents") {
                section_level = Some(level);
            } else if let Some(current) = section_level
                && level <= current
            {
                section_level = None;
            }
            prev_row_pushed = false;
            continue;
        }

        if section_level.is_none() {
            continue;
        }

        if let Some(cells) = table_cells(line) {
            if is_separator_row(&cells) {
                // The row above a separator is the table header.
                if prev_row_pushed {
                    entries.pop();
                }
                prev_row_pushed = false;
                continue;
            }
            prev_row_pushed = match parse_table_row(&cells) {
                Some(entry) => {
                    entries.push(entry);
                    true
                }
                None => false,
            };
            continue;
        }

        prev_row_pushed = false;
        if let Some(entry) = parse_bullet(line) {
            entries.push(entry);
        }
    }

    entries
}

/// Split a table row into trimmed cells. Rows missing the trailing pipe
/// (truncated) are still accepted.
fn table_cells(line: &str) -> Option<Vec<&str>> {
    let inner = line.strip_prefix('|')?;
    let inner = inner.strip_suffix('|').unwrap_or(inner);
    Some(inner.split('|').map(str::trim).collect())
}

fn is_separator_row(cells: &[&str]) -> bool {
    cells.iter().any(|c| !c.is_empty())
        && cells
            .iter()
            .all(|c| c.chars().all(|ch| ch == '-' || ch == ':' || ch == ' '))
}

fn parse_table_row(cells: &[&str]) -> Option<RelatedAgent> {
    let (name, _, _) = split_leading_name(cells.first()?)?;
    let reason = cells[1..]
        .iter()
        .filter(|c| !c.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" | ");
    Some(RelatedAgent::new(name, reason))
}

fn parse_bullet(line: &str) -> Option<RelatedAgent> {
    let rest = ["- ", "* ", "+ "]
        .iter()
        .find_map(|marker| line.strip_prefix(marker))?;
    let (name, rest, wrapped) = split_leading_name(rest.trim_start())?;
    // Plain prose bullets ("- Use this when...", "- Step-by-step guide") are
    // not entries: a bare name must stand alone or be followed by a separator.
    let after = rest.trim_start();
    let separated = after.starts_with([':', '-', '—', '–'])
        || (after.is_empty() && (name.contains('-') || name.contains('_')));
    if !wrapped && !separated {
        return None;
    }
    let reason = rest
        .trim_start_matches(|c: char| c.is_whitespace() || matches!(c, ':' | '-' | '—' | '–'))
        .trim();
    Some(RelatedAgent::new(name, reason))
}

/// Take the agent name off the front of `text`, unwrapping backticks, bold
/// markers, or a Markdown link. Returns the name, whatever follows it, and
/// whether the name was wrapped.
fn split_leading_name(text: &str) -> Option<(String, &str, bool)> {
    let wrapped = text.starts_with("**") || text.starts_with('`') || text.starts_with('[');
    let (candidate, rest) = if let Some(inner) = text.strip_prefix("**") {
        let end = inner.find("**")?;
        (&inner[..end], &inner[end + 2..])
    } else if let Some(inner) = text.strip_prefix('`') {
        let end = inner.find('`')?;
        (&inner[..end], &inner[end + 1..])
    } else if let Some(inner) = text.strip_prefix('[') {
        let end = inner.find("](")?;
        let after = &inner[end + 2..];
        let close = after.find(')').map(|i| i + 1).unwrap_or(after.len());
        (&inner[..end], &after[close..])
    } else {
        let end = text
            .find(|c: char| c.is_whitespace() || c == ':' || c == ',')
            .unwrap_or(text.len());
        (&text[..end], &text[end..])
    };

    // `**`ctm-expert`**` and friends
    let candidate = candidate.trim().trim_matches('`').trim_matches('*').trim();
    let candidate = candidate.strip_suffix(".md").unwrap_or(candidate);

    if NAME_REGEX.is_match(candidate) {
        Some((candidate.to_string(), rest, wrapped))
    } else {
        None
    }
}
