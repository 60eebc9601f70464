/// Page served for the site root.
pub const DEFAULT_PAGE: &str = "index.html";
/// Extension shared by every page document of the site.
pub const PAGE_EXTENSION: &str = ".html";

/// Normalizes a pathname into a document-relative route: the leading slash is
/// dropped and the root (or an empty path) maps to [`DEFAULT_PAGE`].
pub fn normalize_path(pathname: &str) -> String {
    normalize_path_with(pathname, DEFAULT_PAGE)
}

/// Same as [`normalize_path`] with an explicit default page.
pub fn normalize_path_with(pathname: &str, default_page: &str) -> String {
    if pathname.is_empty() || pathname == "/" {
        return default_page.to_string();
    }
    pathname
        .strip_prefix('/')
        .unwrap_or(pathname)
        .to_string()
}

/// Drops everything from the first `?` on.
pub fn strip_query(path: &str) -> &str {
    match path.split_once('?') {
        Some((clean, _)) => clean,
        None => path,
    }
}

pub fn is_page_path(path: &str, extension: &str) -> bool {
    path.ends_with(extension)
}
