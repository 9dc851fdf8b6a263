//! Feature-pair tokenizer: scrape `'name': number` pairs out of free text.
//!
//! The grammar has exactly one production:
//!
//! ```text
//! pair    := "'" name "'" ":" ws* number
//! name    := any run of characters except "'"   (may span lines)
//! number  := digit+ ( "." digit+ )?
//! digit   := "0" ..= "9"
//! ```
//!
//! The scan is flat over the whole text. It knows nothing about pages,
//! tables or prose, so any occurrence of the pattern is consumed, including
//! incidental ones (a quoted word followed by a count in a free-text note
//! becomes a feature). Negative numbers and exponents never match, nor do
//! non-ASCII digits such as full-width `１２`. When a name appears more than
//! once the **last** value wins.

use crate::features::{FeatureMap, FeatureValue};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};

static RE_FEATURE_PAIR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"'([^']+)':\s*([0-9]+(?:\.[0-9]+)?)").unwrap());

/// Parse every feature pair in `text`. Returns an empty map when none match.
pub fn parse_features(text: &str) -> FeatureMap {
    let mut features = FeatureMap::new();

    for caps in RE_FEATURE_PAIR.captures_iter(text) {
        let name = &caps[1];
        let Some(value) = coerce(&caps[2]) else {
            debug!("Feature '{}' skipped: unparseable value {:?}", name, &caps[2]);
            continue;
        };
        if let Some(previous) = features.insert(name, value) {
            debug!("Feature '{}' repeated: {} replaced by {}", name, previous, value);
        }
    }

    info!("Extracted {} features from text", features.len());
    features
}

/// Decimal point → float, otherwise integer. Integers too wide for `i64`
/// fall back to float. `None` when the literal is not a finite number.
fn coerce(literal: &str) -> Option<FeatureValue> {
    if !literal.contains('.') {
        if let Ok(v) = literal.parse::<i64>() {
            return Some(FeatureValue::Int(v));
        }
    }
    literal
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(FeatureValue::Float)
}
