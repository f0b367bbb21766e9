use regex::{Regex, RegexBuilder};

use super::error::FilterError;
use super::model::{FrequencyRow, FrequencyTable};

/// Default size limit for a compiled pattern.
pub const DEFAULT_SIZE_LIMIT: usize = 1024 * 1024;

// ---------------------------------------------------------------------------
// Wildcard pattern
// ---------------------------------------------------------------------------

/// A compiled wildcard pattern.
///
/// `*` matches exactly one arbitrary character; every other character matches
/// itself. The whole label must match, so a pattern only selects labels of the
/// same length: `"1*0"` keeps `"100"` and `"110"` but not `"10"` or `"1000"`.
#[derive(Debug, Clone)]
pub struct FilterPattern {
    source: String,
    regex: Regex,
}

impl FilterPattern {
    /// Compile with an explicit cap (in bytes) on the compiled automaton.
    pub fn compile_with_limit(pattern: &str, size_limit: usize) -> Result<Self, FilterError> {
        let regex = RegexBuilder::new(&wildcard_to_regex(pattern))
            .dot_matches_new_line(true)
            .size_limit(size_limit)
            .build()
            .map_err(|source| FilterError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?;
        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    pub fn is_match(&self, label: &str) -> bool {
        self.regex.is_match(label)
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

fn wildcard_to_regex(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 8);
    out.push_str(r"\A(?:");
    for ch in pattern.chars() {
        if ch == '*' {
            out.push('.');
        } else {
            let mut buf = [0u8; 4];
            out.push_str(&regex::escape(ch.encode_utf8(&mut buf)));
        }
    }
    out.push_str(r")\z");
    out
}

// ---------------------------------------------------------------------------
// Filter stage
// ---------------------------------------------------------------------------

/// Result of the filter stage.
///
/// When the pattern fails to compile, `rows` holds the unfiltered table and
/// `error` says why, so later stages still have something to work with.
#[derive(Debug)]
pub struct FilterOutcome {
    pub rows: Vec<FrequencyRow>,
    pub error: Option<FilterError>,
}

/// Keep the rows whose label matches `pattern`. An empty pattern keeps every
/// row without compiling anything.
pub fn apply_filter(table: &FrequencyTable, pattern: &str, size_limit: usize) -> FilterOutcome {
    if pattern.is_empty() {
        return FilterOutcome {
            rows: table.rows.clone(),
            error: None,
        };
    }

    match FilterPattern::compile_with_limit(pattern, size_limit) {
        Ok(compiled) => {
            let rows = filter_rows(&table.rows, &compiled);
            log::debug!(
                "pattern {:?} kept {} of {} states",
                compiled.as_str(),
                rows.len(),
                table.len()
            );
            FilterOutcome { rows, error: None }
        }
        Err(e) => {
            log::warn!("{e}");
            FilterOutcome {
                rows: table.rows.clone(),
                error: Some(e),
            }
        }
    }
}

/// Rows matching an already compiled pattern, in input order.
pub fn filter_rows(rows: &[FrequencyRow], pattern: &FilterPattern) -> Vec<FrequencyRow> {
    rows.iter()
        .filter(|row| pattern.is_match(&row.state_label))
        .cloned()
        .collect()
}
