pub mod button;
pub mod field;
pub mod navigation;
pub mod routes;

/// Case-insensitive containment over optional attribute text.
pub(crate) fn contains_ci(haystack: Option<&str>, needle: &str) -> bool {
    match haystack {
        Some(h) => h.to_lowercase().contains(needle),
        None => false,
    }
}

/// Case-insensitive equality over optional attribute text.
pub(crate) fn eq_ci(value: Option<&str>, other: &str) -> bool {
    match value {
        Some(v) => v.eq_ignore_ascii_case(other),
        None => false,
    }
}
