//! Library identity derivation.
//!
//! A module's library identity is its request with every absolute path made
//! relative to a context directory. Hashing the relative form keeps IDs
//! stable when the project is checked out at a different location.
//!
//! ## Rules
//!
//! ```text
//! contextify("/project", "/project/src/a.js")              = "./src/a.js"
//! contextify("/project", "/project/node_modules/x/y.js?q") = "./node_modules/x/y.js?q"
//! contextify("/project", "/loaders/l.js!/project/a.css")   = "../loaders/l.js!./a.css"
//! contextify("C:\\project", "C:\\project\\src\\a.js")       = "./src/a.js"
//! ```
//!
//! - Requests are split on `!` (loader chains) and each part is handled alone
//! - Only the resource before `?` is rewritten; the query is kept verbatim
//! - A posix path ending in `/` is a generated regexp, not a path, and is kept
//! - Non-absolute parts are kept verbatim

use regex_lite::Regex;
use std::sync::OnceLock;

/// Matches `C:\` or `C:/` at the start of a string.
fn windows_abs_path_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-zA-Z]:[\\/]").expect("valid windows path regex"))
}

/// Whether a path is an absolute Windows path (`C:\...` or `C:/...`).
pub fn is_windows_absolute(path: &str) -> bool {
    windows_abs_path_regex().is_match(path)
}

/// Whether a path is absolute on either posix or Windows.
pub fn is_absolute_path(path: &str) -> bool {
    path.starts_with('/') || is_windows_absolute(path)
}

/// Make every absolute path in a request relative to `context`.
pub fn contextify(context: &str, request: &str) -> String {
    request
        .split('!')
        .map(|part| absolute_to_request(context, part))
        .collect::<Vec<_>>()
        .join("!")
}

/// Turn a relative path into a request string that starts with `./` or `../`.
pub fn relative_path_to_request(relative: &str) -> String {
    match relative {
        "" => "./.".to_string(),
        ".." => "../.".to_string(),
        r if r.starts_with("../") => r.to_string(),
        r => format!("./{r}"),
    }
}

fn absolute_to_request(context: &str, maybe_absolute: &str) -> String {
    if maybe_absolute.starts_with('/') {
        if maybe_absolute.len() > 1 && maybe_absolute.ends_with('/') {
            return maybe_absolute.to_string();
        }
        let (resource, query) = split_query(maybe_absolute);
        let relative = relative_path_to_request(&posix_relative(context, resource));
        return format!("{relative}{query}");
    }

    if is_windows_absolute(maybe_absolute) {
        let (resource, query) = split_query(maybe_absolute);
        let mut relative = win32_relative(context, resource);
        if !is_windows_absolute(&relative) {
            relative = relative_path_to_request(&relative.replace('\\', "/"));
        }
        return format!("{relative}{query}");
    }

    maybe_absolute.to_string()
}

fn split_query(path: &str) -> (&str, &str) {
    match path.find('?') {
        Some(pos) => path.split_at(pos),
        None => (path, ""),
    }
}

/// Resolve `.` and `..` segments of a path split on `separators`.
fn normalize_segments<'a>(path: &'a str, separators: &[char]) -> Vec<&'a str> {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split(|c| separators.contains(&c)) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    segments
}

/// Relative path from `from` to `to`, both treated as rooted posix paths.
fn posix_relative(from: &str, to: &str) -> String {
    let from = normalize_segments(from, &['/']);
    let to = normalize_segments(to, &['/']);

    let common = from.iter().zip(&to).take_while(|(a, b)| a == b).count();

    let mut parts: Vec<&str> = vec![".."; from.len() - common];
    parts.extend(&to[common..]);
    parts.join("/")
}

/// Relative path from `from` to `to` with Windows semantics.
///
/// Segments compare case-insensitively. When the paths live on different
/// drives the normalized absolute `to` path is returned.
fn win32_relative(from: &str, to: &str) -> String {
    let from = normalize_segments(from, &['\\', '/']);
    let to = normalize_segments(to, &['\\', '/']);

    let same_drive = match (from.first(), to.first()) {
        (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
        _ => false,
    };
    if !same_drive {
        let mut absolute = to.join("\\");
        if to.len() == 1 {
            absolute.push('\\');
        }
        return absolute;
    }

    let common = from
        .iter()
        .zip(&to)
        .take_while(|(a, b)| a.eq_ignore_ascii_case(b))
        .count();

    let mut parts: Vec<&str> = vec![".."; from.len() - common];
    parts.extend(&to[common..]);
    parts.join("\\")
}
