//! Turns free-form model output into a [`Department`].

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info};

use crate::classify::Department;

/// Leftmost match wins; at the same position the earlier alternative wins.
static DEPARTMENT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"billing|sales|support|marketing").unwrap());

/// Strip markdown emphasis/link characters and lowercase.
pub fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, '*' | '[' | ']' | '(' | ')'))
        .collect::<String>()
        .to_lowercase()
}

/// Pick the department mentioned first in `text`, or `Support` if none is.
pub fn department_from_text(text: &str) -> Department {
    let normalized = normalize(text);

    let Some(found) = DEPARTMENT_PATTERN.find(&normalized) else {
        info!("No department in model output, defaulting to support");
        return Department::Support;
    };

    debug!(token = found.as_str(), "Matched department token");
    found.as_str().parse().unwrap_or_default()
}
