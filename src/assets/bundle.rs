//! In-memory asset bundle with SPA fallback.
//!
//! # Responsibilities
//! - Read the UI bundle from disk once at startup
//! - Map request paths onto bundle entries
//! - Serve the top-level index document for anything unmatched
//!
//! # Design Decisions
//! - Files are read eagerly so per-request serving never touches the disk
//! - Lookups are keyed by normalized relative paths, so `..` can never
//!   escape the bundle
//! - A miss is never a 404: the SPA router in the browser owns those paths
//! - A directory named without its trailing slash redirects to `dir/`, so
//!   relative links inside its index document resolve against the directory

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use axum::body::Body;
use axum::http::{header, HeaderMap, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use thiserror::Error;

/// Entry document of the single-page application.
pub const INDEX_DOCUMENT: &str = "index.html";

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset root {} is not a readable directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("failed to read asset {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("asset bundle has no top-level {INDEX_DOCUMENT}")]
    MissingIndex,
}

/// A single file of the bundle.
#[derive(Debug, Clone)]
pub struct Asset {
    pub body: Bytes,
    pub content_type: HeaderValue,
}

impl Asset {
    fn new(key: &str, body: Bytes) -> Self {
        Self {
            body,
            content_type: content_type_for(key),
        }
    }
}

/// Result of resolving a request path.
#[derive(Debug, Clone, Copy)]
pub enum Resolved<'a> {
    /// The path named a file in the bundle.
    Exact(&'a Asset),
    /// Nothing matched; this is the index document.
    Fallback(&'a Asset),
}

impl<'a> Resolved<'a> {
    pub fn asset(&self) -> &'a Asset {
        match self {
            Resolved::Exact(asset) | Resolved::Fallback(asset) => asset,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Resolved::Fallback(_))
    }
}

/// Read-only file tree of the admin UI.
#[derive(Debug, Clone)]
pub struct AssetBundle {
    files: HashMap<String, Asset>,
    index: Asset,
}

impl AssetBundle {
    /// Load every file under `root` into memory.
    pub fn load(root: &Path) -> Result<Self, AssetError> {
        if !root.is_dir() {
            return Err(AssetError::NotADirectory(root.to_path_buf()));
        }

        let mut files = Vec::new();
        collect(root, root, &mut files)?;

        let bundle = Self::from_files(files)?;
        tracing::debug!(
            root = %root.display(),
            files = bundle.len(),
            "Asset bundle loaded"
        );
        Ok(bundle)
    }

    /// Build a bundle from `(relative path, contents)` pairs.
    pub fn from_files<I, K, V>(entries: I) -> Result<Self, AssetError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Bytes>,
    {
        let files: HashMap<String, Asset> = entries
            .into_iter()
            .map(|(key, body)| {
                let key = key.into().trim_start_matches('/').to_string();
                let asset = Asset::new(&key, body.into());
                (key, asset)
            })
            .collect();

        let index = files
            .get(INDEX_DOCUMENT)
            .cloned()
            .ok_or(AssetError::MissingIndex)?;

        Ok(Self { files, index })
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Map a request path onto the bundle.
    pub fn resolve(&self, path: &str) -> Resolved<'_> {
        asset_key(path)
            .and_then(|key| self.files.get(&key))
            .map(Resolved::Exact)
            .unwrap_or(Resolved::Fallback(&self.index))
    }

    /// `path/` when `path` names a bundle directory with an index document.
    pub fn directory_redirect(&self, path: &str) -> Option<String> {
        if path.ends_with('/') {
            return None;
        }
        let key = asset_key(path)?;
        if self.files.contains_key(&key) {
            return None;
        }
        let index = format!("{key}/{INDEX_DOCUMENT}");
        self.files.contains_key(&index).then(|| format!("{path}/"))
    }

    /// Build the response for a GET or HEAD request.
    pub fn respond(&self, method: &Method, path: &str) -> Response {
        if let Some(location) = self.directory_redirect(path) {
            if let Ok(value) = HeaderValue::from_str(&location) {
                tracing::debug!(path = %path, location = %location, "Redirecting to directory");
                return (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, value)]).into_response();
            }
        }

        let resolved = self.resolve(path);
        let asset = resolved.asset();

        if resolved.is_fallback() {
            tracing::debug!(path = %path, "No asset matched, serving index document");
        }

        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, asset.content_type.clone());
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(asset.body.len()));
        if resolved.is_fallback() {
            headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        }

        let body = if *method == Method::HEAD {
            Body::empty()
        } else {
            Body::from(asset.body.clone())
        };

        (StatusCode::OK, headers, body).into_response()
    }
}

/// Normalize a request path into a bundle key.
///
/// Segments are percent-decoded before normalization. Directory-style paths
/// map to their `index.html`. Returns `None` for paths that try to climb out
/// of the root or smuggle a separator inside an encoded segment.
fn asset_key(path: &str) -> Option<String> {
    let mut segments = Vec::new();
    for raw in path.split('/') {
        let segment = urlencoding::decode(raw).ok()?.into_owned();
        match segment.as_str() {
            "" | "." => continue,
            ".." => return None,
            s if s.contains(['/', '\\']) => return None,
            _ => {}
        }
        segments.push(segment);
    }
    if segments.is_empty() || path.ends_with('/') {
        segments.push(INDEX_DOCUMENT.to_string());
    }
    Some(segments.join("/"))
}

fn content_type_for(key: &str) -> HeaderValue {
    let mime = mime_guess::from_path(key).first_or_octet_stream();
    let textual = mime.type_() == mime_guess::mime::TEXT
        || mime.subtype() == mime_guess::mime::JAVASCRIPT
        || mime.subtype() == mime_guess::mime::JSON;
    let value = if textual {
        format!("{}; charset=utf-8", mime.essence_str())
    } else {
        mime.essence_str().to_string()
    };
    HeaderValue::from_str(&value)
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"))
}

fn collect(root: &Path, dir: &Path, out: &mut Vec<(String, Vec<u8>)>) -> Result<(), AssetError> {
    for entry in fs::read_dir(dir).map_err(read_error(dir))? {
        let entry = entry.map_err(read_error(dir))?;
        let path = entry.path();
        let metadata = fs::metadata(&path).map_err(read_error(&path))?;

        if metadata.is_dir() {
            collect(root, &path, out)?;
            continue;
        }

        let Some(key) = relative_key(root, &path) else {
            tracing::warn!(path = %path.display(), "Skipping asset with non UTF-8 name");
            continue;
        };
        let contents = fs::read(&path).map_err(read_error(&path))?;
        out.push((key, contents));
    }
    Ok(())
}

fn read_error(path: &Path) -> impl FnOnce(io::Error) -> AssetError {
    let path = path.to_path_buf();
    move |source| AssetError::Read { path, source }
}

fn relative_key(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Option<Vec<&str>> = relative.components().map(|c| c.as_os_str().to_str()).collect();
    Some(parts?.join("/"))
}
