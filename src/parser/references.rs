// Whole-word reference counting over a single file's text.
//
// This is a textual stand-in for call-graph resolution: it does not know about
// scopes, so shadowed or reused names are overcounted.

use super::common::ReferenceSite;
use regex::Regex;

/// Every whole-word occurrence of `name` in `content`, except the first
///
/// The first occurrence is taken to be the declaration itself.
pub fn find_references(name: &str, content: &str) -> Vec<ReferenceSite> {
    if name.is_empty() {
        return Vec::new();
    }

    let pattern = match Regex::new(&format!(r"\b{}\b", regex::escape(name))) {
        Ok(pattern) => pattern,
        Err(_) => return Vec::new(),
    };

    content
        .lines()
        .enumerate()
        .flat_map(|(index, line)| {
            pattern.find_iter(line).map(move |m| ReferenceSite {
                line: index + 1,
                column: m.start() + 1,
            })
        })
        .skip(1)
        .collect()
}
