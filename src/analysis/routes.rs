//! Route normalization for joining code routes with observed traffic
//!
//! Observed resources carry concrete identifiers (`/users/123`), while code
//! declares placeholders in framework-specific syntax (`/users/:id`,
//! `/users/{id}`, `/users/<int:id>`). Both sides are reduced to one canonical
//! form, so a join is a plain string comparison:
//!
//! ```text
//! /users/123?expand=1      -> /users/:param
//! /users/:id               -> /users/:param
//! /users/{id}/posts        -> /users/:param/posts
//! /static/*filepath        -> /static/*
//! ```
//!
//! Every function here is idempotent.

/// Drop the query string and any trailing slash
fn strip_path(path: &str) -> &str {
    let path = path.split(|c: char| c == '?' || c == '#').next().unwrap_or(path);
    if path.len() > 1 {
        path.trim_end_matches('/')
    } else {
        path
    }
}

/// Replace identifier-shaped segments of an observed resource
///
/// Numeric segments become `:id`, UUIDs `:uuid`, 24-digit hex object ids
/// `:objectId`. Placeholders already present are left alone.
pub fn normalize_resource(resource: &str) -> String {
    map_segments(strip_path(resource), |segment, _| {
        if is_numeric(segment) {
            ":id".to_string()
        } else if is_uuid(segment) {
            ":uuid".to_string()
        } else if is_object_id(segment) {
            ":objectId".to_string()
        } else {
            segment.to_string()
        }
    })
}

/// Replace declared placeholders of a code route with canonical markers
///
/// `:name`, `{name}`, `<name>` and `<type:name>` become `:param`; a trailing
/// wildcard segment (`*`, `**`, `*rest`) becomes `*`.
pub fn normalize_route(route: &str) -> String {
    map_segments(strip_path(route), |segment, is_last| {
        if is_last && segment.starts_with('*') {
            return "*".to_string();
        }
        if let Some(rest) = segment.strip_prefix(':') {
            let name_len = rest
                .find(|c: char| !(c.is_alphanumeric() || c == '_'))
                .unwrap_or(rest.len());
            if name_len > 0 {
                return format!(":param{}", &rest[name_len..]);
            }
        }
        if is_wrapped(segment, '{', '}') || is_wrapped(segment, '<', '>') {
            return ":param".to_string();
        }
        segment.to_string()
    })
}

/// Canonical form used for joining; identical for code and telemetry input
pub fn canonical_route(path: &str) -> String {
    normalize_route(&normalize_resource(path))
}

fn map_segments(path: &str, f: impl Fn(&str, bool) -> String) -> String {
    let segments: Vec<&str> = path.split('/').collect();
    let last = segments.len().saturating_sub(1);

    segments
        .iter()
        .enumerate()
        .map(|(i, segment)| {
            if segment.is_empty() {
                String::new()
            } else {
                f(segment, i == last)
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn is_numeric(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}

fn is_uuid(segment: &str) -> bool {
    const GROUPS: [usize; 5] = [8, 4, 4, 4, 12];

    segment.len() == 36 && {
        let parts: Vec<&str> = segment.split('-').collect();
        parts.len() == GROUPS.len()
            && parts
                .iter()
                .zip(GROUPS)
                .all(|(part, len)| part.len() == len && part.bytes().all(|b| b.is_ascii_hexdigit()))
    }
}

fn is_object_id(segment: &str) -> bool {
    segment.len() == 24 && segment.bytes().all(|b| b.is_ascii_hexdigit())
}

fn is_wrapped(segment: &str, open: char, close: char) -> bool {
    segment.len() > 2 && segment.starts_with(open) && segment.ends_with(close)
}
