//! Path construction for planned pages: slugs, joined base paths, and the
//! paths of paginated listing pages.

/// Returns the path for page `index` (1-based) of a listing rooted at
/// `base_path`. The first page lives at `base_path` itself; later pages live
/// at `{base_path}/page/{index}`.
pub fn paginated_path(index: usize, base_path: &str) -> String {
    if index <= 1 {
        return base_path.to_owned();
    }
    match base_path {
        "/" => format!("{}page/{}", base_path, index),
        _ => format!("{}/page/{}", base_path, index),
    }
}

/// Slugifies `text` (lowercase, ASCII-transliterated, non-alphanumeric runs
/// replaced by `-`, no leading or trailing `-`) and prefixes it with `base`.
pub fn slugify(text: &str, base: &str) -> String {
    collapse_slashes(&format!("{}/{}", base, slug::slugify(text)))
}

/// Joins `parts` into an absolute path, collapsing repeated slashes.
pub fn join(parts: &[&str]) -> String {
    collapse_slashes(&format!("/{}", parts.join("/")))
}

fn collapse_slashes(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for c in path.chars() {
        if c == '/' && out.ends_with('/') {
            continue;
        }
        out.push(c);
    }
    out
}
