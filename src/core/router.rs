use std::path::{Component, Path, PathBuf};

/// Literal body returned for unresolved paths
pub const NOT_FOUND_BODY: &str = "404 - File not found";

const TEST_PREFIX: &str = "/tests/";
const INDEX_FILE: &str = "index.html";

/// Outcome of resolving a request path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteTarget {
    /// Serve this file
    File(PathBuf),
    /// Respond 404 with [`NOT_FOUND_BODY`]
    NotFound,
}

/// Maps request paths onto files under two fixed directory roots
///
/// Paths under the reserved `/tests/` prefix are looked up in the test root
/// first; everything else maps onto the public root, with `/` resolving to
/// the entry file. No patterns, no parameters, a single ordered chain.
pub struct PathRouter {
    public_dir: PathBuf,
    tests_dir: PathBuf,
}

impl PathRouter {
    pub fn new(public_dir: impl Into<PathBuf>, tests_dir: impl Into<PathBuf>) -> Self {
        Self {
            public_dir: public_dir.into(),
            tests_dir: tests_dir.into(),
        }
    }

    /// Resolve a request path to a file, or 404
    pub fn resolve(&self, path: &str) -> RouteTarget {
        if let Some(rest) = path.strip_prefix(TEST_PREFIX) {
            if let Some(candidate) = safe_join(&self.tests_dir, rest) {
                if candidate.is_file() {
                    return RouteTarget::File(candidate);
                }
            }
        }

        let relative = if path == "/" {
            INDEX_FILE
        } else {
            path.trim_start_matches('/')
        };

        if let Some(candidate) = safe_join(&self.public_dir, relative) {
            if candidate.is_file() {
                return RouteTarget::File(candidate);
            }
        }

        RouteTarget::NotFound
    }
}

/// Join a request path onto a root, refusing components that would escape it
fn safe_join(root: &Path, relative: &str) -> Option<PathBuf> {
    let mut out = root.to_path_buf();
    for component in Path::new(relative).components() {
        match component {
            Component::Normal(part) => out.push(part),
            Component::CurDir => {}
            _ => return None,
        }
    }
    Some(out)
}

/// Content type derived from the file extension
pub fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()).unwrap_or("") {
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css",
        "js" => "application/javascript",
        "json" => "application/json",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "txt" => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}
