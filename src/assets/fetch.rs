use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use base64::Engine as _;

use crate::{
    config::OgConfig,
    foundation::error::{OgError, OgResult},
    request::AvatarSource,
};

/// Limits applied to every avatar load.
#[derive(Clone, Debug, PartialEq)]
pub struct FetchPolicy {
    pub timeout: Duration,
    pub max_bytes: usize,
    pub assets_root: PathBuf,
}

impl FetchPolicy {
    pub fn from_config(cfg: &OgConfig) -> Self {
        Self {
            timeout: Duration::from_millis(cfg.avatar.fetch_timeout_ms),
            max_bytes: cfg.avatar.max_bytes,
            assets_root: cfg.assets_root.clone(),
        }
    }
}

/// How a URL-ish avatar string is loaded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SourceKind {
    Remote,
    Data,
    File(PathBuf),
    Unsupported(String),
}

pub fn classify(source: &str) -> SourceKind {
    let s = source.trim();
    if s.starts_with("data:") {
        return SourceKind::Data;
    }
    match url::Url::parse(s) {
        Ok(u) => match u.scheme() {
            "http" | "https" => SourceKind::Remote,
            "file" => match u.to_file_path() {
                Ok(p) => SourceKind::File(p),
                Err(()) => SourceKind::Unsupported(format!("bad file url '{s}'")),
            },
            // Windows drive letters parse as one-letter schemes.
            scheme if scheme.len() == 1 => SourceKind::File(PathBuf::from(s)),
            scheme => SourceKind::Unsupported(format!("unsupported scheme '{scheme}'")),
        },
        Err(_) => SourceKind::File(PathBuf::from(s)),
    }
}

/// Raw bytes of `source`, bounded by `policy`.
pub fn load_source(source: &AvatarSource, policy: &FetchPolicy) -> OgResult<Vec<u8>> {
    let bytes = match source {
        AvatarSource::Bytes(b) => b.clone(),
        AvatarSource::Url(u) => match classify(u) {
            SourceKind::Remote => fetch_remote(u.trim(), policy)?,
            SourceKind::Data => decode_data_uri(u.trim())?,
            SourceKind::File(p) => read_file(&resolve(&policy.assets_root, &p), policy.max_bytes)?,
            SourceKind::Unsupported(why) => return Err(OgError::asset(why)),
        },
    };
    check_size(bytes.len(), policy.max_bytes)?;
    Ok(bytes)
}

fn resolve(root: &Path, p: &Path) -> PathBuf {
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        root.join(p)
    }
}

fn check_size(len: usize, max: usize) -> OgResult<()> {
    if len > max {
        return Err(OgError::asset(format!(
            "avatar payload is {len} bytes (max {max})"
        )));
    }
    Ok(())
}

fn read_file(path: &Path, max_bytes: usize) -> OgResult<Vec<u8>> {
    let meta =
        std::fs::metadata(path).with_context(|| format!("stat avatar '{}'", path.display()))?;
    check_size(usize::try_from(meta.len()).unwrap_or(usize::MAX), max_bytes)?;
    let bytes =
        std::fs::read(path).with_context(|| format!("read avatar '{}'", path.display()))?;
    Ok(bytes)
}

/// Decode an RFC 2397 `data:` URI (base64 or percent-encoded payload).
pub fn decode_data_uri(uri: &str) -> OgResult<Vec<u8>> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| OgError::asset("not a data: uri"))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| OgError::asset("data: uri has no ',' separator"))?;

    if meta
        .rsplit(';')
        .next()
        .is_some_and(|p| p.eq_ignore_ascii_case("base64"))
    {
        let cleaned: String = percent_decode(payload)
            .into_iter()
            .filter(|b| !b.is_ascii_whitespace())
            .map(char::from)
            .collect();
        let engine = base64::engine::general_purpose::STANDARD;
        engine
            .decode(cleaned.as_bytes())
            .or_else(|_| {
                base64::engine::general_purpose::STANDARD_NO_PAD
                    .decode(cleaned.trim_end_matches('='))
            })
            .map_err(|e| OgError::asset(format!("invalid base64 in data: uri: {e}")))
    } else {
        Ok(percent_decode(payload))
    }
}

fn percent_decode(s: &str) -> Vec<u8> {
    percent_encoding::percent_decode_str(s).collect()
}

#[cfg(feature = "remote")]
fn fetch_remote(url: &str, policy: &FetchPolicy) -> OgResult<Vec<u8>> {
    use std::io::Read;

    let client = reqwest::blocking::Client::builder()
        .timeout(policy.timeout)
        .build()
        .map_err(|e| OgError::asset(format!("failed to build HTTP client: {e}")))?;

    let res = client
        .get(url)
        .send()
        .and_then(|r| r.error_for_status())
        .map_err(|e| {
            if e.is_timeout() {
                OgError::asset(format!("avatar fetch timed out after {:?}", policy.timeout))
            } else {
                OgError::asset(format!("avatar fetch failed: {e}"))
            }
        })?;

    if let Some(len) = res.content_length() {
        check_size(usize::try_from(len).unwrap_or(usize::MAX), policy.max_bytes)?;
    }

    let limit = u64::try_from(policy.max_bytes).unwrap_or(u64::MAX).saturating_add(1);
    let mut body = Vec::new();
    res.take(limit)
        .read_to_end(&mut body)
        .map_err(|e| OgError::asset(format!("failed to read avatar body: {e}")))?;
    check_size(body.len(), policy.max_bytes)?;

    tracing::debug!(bytes = body.len(), "avatar fetched");
    Ok(body)
}

#[cfg(not(feature = "remote"))]
fn fetch_remote(url: &str, _policy: &FetchPolicy) -> OgResult<Vec<u8>> {
    Err(OgError::asset(format!(
        "remote avatar '{url}' requires the `remote` feature"
    )))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fetch.rs"]
mod tests;
