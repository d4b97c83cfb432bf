//! Image upload through the platform's own paste-to-upload handling.
//!
//! Platforms that have no documented upload API still accept pasted images
//! in their editors and rewrite them to hosted URLs. For each image:
//!
//! 1. decode the fetched data into a file
//! 2. snapshot the URLs already in the editor, plus every URL resolved so far
//! 3. focus the editor and dispatch `paste` on its content root
//! 4. poll the editor text for a new URL on an allow-listed host
//! 5. record `original -> hosted`
//!
//! A failed image is logged and skipped. Rewriting the markdown happens once,
//! after every image has been attempted.

use std::collections::HashSet;
use std::future::Future;
use std::sync::LazyLock;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use regex_lite::Regex;
use serde::Serialize;
use url::Url;

use crate::error::AutomationError;
use crate::page::{Clock, ImageFile, Page};
use crate::types::DownloadedImage;
use crate::wait::{WaitOptions, wait_for};

static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"https?://[^\s"'<>()\[\]{}]+"#).expect("static URL pattern is valid")
});

/// Produces image bytes for an original URL.
pub trait ImageSource {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<DownloadedImage, AutomationError>>;
}

/// Where pasted images land on a platform and how to recognise the result.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagePolicy {
    /// Element whose text is diffed for new URLs.
    pub editor_selector: &'static str,
    /// Inner content root the `paste` event is dispatched on. Falls back to
    /// the editor element when absent.
    pub paste_selector: Option<&'static str>,
    /// Host substrings a hosted image URL must contain. Lowercase.
    pub allowed_hosts: &'static [&'static str],
}

impl ImagePolicy {
    pub fn accepts(&self, url: &str) -> bool {
        host_of(url)
            .is_some_and(|host| self.allowed_hosts.iter().any(|token| host.contains(token)))
    }
}

/// Timing for one upload attempt.
#[derive(Debug, Clone, Copy)]
pub struct UploadTiming {
    pub wait: WaitOptions,
    /// Pause after focusing, before the paste is dispatched.
    pub settle: Duration,
}

/// Original URL to platform-hosted URL, in upload order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImageUrlMap {
    entries: Vec<(String, String)>,
}

impl ImageUrlMap {
    pub fn insert(&mut self, original: impl Into<String>, hosted: impl Into<String>) {
        let original = original.into();
        let hosted = hosted.into();
        match self.entries.iter_mut().find(|(o, _)| *o == original) {
            Some(entry) => entry.1 = hosted,
            None => self.entries.push((original, hosted)),
        }
    }

    pub fn get(&self, original: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(o, _)| o == original)
            .map(|(_, h)| h.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hosted_urls(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(_, h)| h.as_str())
    }

    /// Substitute every recorded mapping into `text`.
    ///
    /// Only whole URLs are replaced, so an unmapped URL that merely starts
    /// with a mapped one is left alone. Applying the map to its own output
    /// changes nothing.
    pub fn apply(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        for m in URL_PATTERN.find_iter(text) {
            let url = trim_url(m.as_str());
            if let Some(hosted) = self.get(url) {
                out.push_str(&text[last..m.start()]);
                out.push_str(hosted);
                last = m.start() + url.len();
            }
        }
        out.push_str(&text[last..]);
        out
    }
}

/// Every http(s) URL in `text`, trailing sentence punctuation trimmed.
pub fn extract_urls(text: &str) -> HashSet<String> {
    URL_PATTERN
        .find_iter(text)
        .map(|m| trim_url(m.as_str()).to_string())
        .collect()
}

fn trim_url(raw: &str) -> &str {
    raw.trim_end_matches(['.', ',', ';', ':', '!', '?'])
}

/// Normalised host of a URL, if it parses and has one.
pub fn host_of(url: &str) -> Option<String> {
    Url::parse(url).ok()?.host_str().map(str::to_ascii_lowercase)
}

/// Decode a fetched image into a pasteable file.
pub fn decode_image(image: &DownloadedImage, index: usize) -> Result<ImageFile, AutomationError> {
    let (data_mime, payload) = match image.base64.strip_prefix("data:") {
        Some(rest) => {
            let (header, data) = rest
                .split_once(',')
                .ok_or_else(|| AutomationError::image(&image.url, "malformed data URL"))?;
            let mime = header.split(';').next().filter(|m| !m.is_empty());
            (mime, data)
        }
        None => (None, image.base64.as_str()),
    };
    let bytes = BASE64
        .decode(payload.trim())
        .map_err(|e| AutomationError::image(&image.url, e))?;

    let mime_type = if image.mime_type.is_empty() {
        data_mime.unwrap_or("image/png").to_string()
    } else {
        image.mime_type.clone()
    };

    Ok(ImageFile {
        name: file_name_for(&image.url, &mime_type, index),
        mime_type,
        bytes,
    })
}

fn file_name_for(url: &str, mime_type: &str, index: usize) -> String {
    let last = Url::parse(url)
        .ok()
        .and_then(|u| u.path_segments()?.next_back().map(str::to_string))
        .filter(|name| name.contains('.'));
    if let Some(name) = last {
        return name;
    }
    let ext = mime_type.strip_prefix("image/").unwrap_or("png");
    format!("image-{index}.{ext}")
}

/// Upload every image in `originals` through paste, skipping failures.
///
/// The returned map has one entry per image that produced a hosted URL.
pub async fn upload_images<P, S>(
    page: &P,
    source: &S,
    originals: &[String],
    policy: &ImagePolicy,
    timing: UploadTiming,
) -> ImageUrlMap
where
    P: Page,
    S: ImageSource,
{
    let mut map = ImageUrlMap::default();
    for (index, original) in originals.iter().enumerate() {
        if policy.accepts(original) {
            tracing::debug!(url = %original, "image already hosted on platform");
            continue;
        }
        match upload_one(page, source, original, index, &map, policy, timing).await {
            Ok(hosted) => {
                tracing::info!(original = %original, hosted = %hosted, "image uploaded");
                map.insert(original.clone(), hosted);
            }
            Err(e) => {
                tracing::warn!(url = %original, error = %e, "image upload skipped");
            }
        }
    }
    map
}

async fn upload_one<P, S>(
    page: &P,
    source: &S,
    original: &str,
    index: usize,
    resolved: &ImageUrlMap,
    policy: &ImagePolicy,
    timing: UploadTiming,
) -> Result<String, AutomationError>
where
    P: Page,
    S: ImageSource,
{
    let downloaded = source.fetch(original).await?;
    let file = decode_image(&downloaded, index)?;

    let editor = page
        .find(policy.editor_selector)
        .ok_or_else(|| AutomationError::missing("image upload target"))?;
    let mut before = extract_urls(&page.text_of(&editor));
    before.extend(resolved.hosted_urls().map(str::to_string));

    let target = policy
        .paste_selector
        .and_then(|selector| page.find(selector))
        .unwrap_or_else(|| editor.clone());

    page.focus(&editor);
    page.clock().sleep(timing.settle).await;
    page.paste_file(&target, &file)?;

    wait_for(
        page.clock(),
        &format!("hosted URL for {original}"),
        timing.wait,
        || {
            let text = page.text_of(&editor);
            extract_urls(&text)
                .into_iter()
                .filter(|url| !before.contains(url) && policy.accepts(url))
                .min()
        },
    )
    .await
}
