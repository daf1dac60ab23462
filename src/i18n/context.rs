use std::convert::Infallible;

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::{header, request::Parts},
};
use serde::Deserialize;

use super::{Language, Translated};
use crate::config::AppConfig;

/// Per-request values every resolution call needs. Built by the extractor
/// and passed down explicitly; nothing here is process-wide.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub lang: Language,
    /// `scheme://host` of the inbound request, when it carried a host
    pub origin: Option<String>,
    /// `scheme://host` announced by a reverse proxy through
    /// `X-Forwarded-Host`/`X-Forwarded-Proto`
    pub forwarded_origin: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LangParam {
    lang: Option<String>,
}

impl RequestContext {
    pub fn new(lang: Language) -> Self {
        Self {
            lang,
            ..Self::default()
        }
    }

    pub fn from_parts(parts: &Parts) -> Self {
        let lang = Query::<LangParam>::try_from_uri(&parts.uri)
            .ok()
            .and_then(|Query(p)| p.lang);
        Self {
            lang: Language::from_param(lang.as_deref()),
            origin: request_origin(parts),
            forwarded_origin: forwarded_origin(parts),
        }
    }

    pub fn localizer(&self, config: &AppConfig) -> Localizer {
        // a configured base URL wins; proxy headers only count when trusted
        let forwarded = self
            .forwarded_origin
            .clone()
            .filter(|_| config.trust_forwarded_headers);
        let origin = config
            .public_base_url
            .clone()
            .or(forwarded)
            .or_else(|| self.origin.clone());
        Localizer {
            lang: self.lang,
            media: MediaUrls::new(&config.media_url, origin),
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_parts(parts))
    }
}

fn header_str(parts: &Parts, name: &str) -> Option<String> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(',').next().unwrap_or(v).trim().to_string())
        .filter(|v| !v.is_empty())
}

fn request_origin(parts: &Parts) -> Option<String> {
    let host = header_str(parts, header::HOST.as_str())
        .or_else(|| parts.uri.authority().map(|a| a.to_string()))?;
    let scheme = parts.uri.scheme_str().unwrap_or("http");
    Some(format!("{}://{}", scheme, host.trim_end_matches('/')))
}

fn forwarded_origin(parts: &Parts) -> Option<String> {
    let host = header_str(parts, "x-forwarded-host")?;
    let scheme = header_str(parts, "x-forwarded-proto").unwrap_or_else(|| "https".to_string());
    Some(format!("{}://{}", scheme, host.trim_end_matches('/')))
}

/// Turns stored media paths into URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaUrls {
    prefix: String,
    origin: Option<String>,
}

impl MediaUrls {
    pub fn new(prefix: &str, origin: Option<String>) -> Self {
        Self {
            prefix: prefix.to_string(),
            origin: origin.map(|o| o.trim_end_matches('/').to_string()),
        }
    }

    /// Absolute when an origin is known, otherwise relative to the site root.
    pub fn resolve(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        let relative = format!(
            "{}/{}",
            self.prefix.trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        match &self.origin {
            Some(origin) => format!("{}{}", origin, relative),
            None => relative,
        }
    }
}

/// Serializer-side helper: resolves bilingual text and media for one request.
#[derive(Debug, Clone)]
pub struct Localizer {
    pub lang: Language,
    pub media: MediaUrls,
}

impl Localizer {
    pub fn text(&self, tr: &Option<String>, en: &Option<String>) -> Option<String> {
        Translated::of(tr, en).resolve(self.lang).map(str::to_string)
    }

    pub fn file(&self, path: &Option<String>) -> Option<String> {
        path.as_deref()
            .filter(|p| !p.trim().is_empty())
            .map(|p| self.media.resolve(p))
    }

    /// Per-language file slots resolve like text, then become URLs
    pub fn file_slots(&self, tr: &Option<String>, en: &Option<String>) -> Option<String> {
        Translated::of(tr, en)
            .resolve(self.lang)
            .map(|p| self.media.resolve(p))
    }
}
