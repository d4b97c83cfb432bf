//! Post to payload projection. Pure: no page access, callable anywhere.

use pulldown_cmark::{Event, Options, Parser, Tag, html};

use super::Adapter;
use crate::types::{Asset, AssetKind, CanonicalPost, PayloadMeta, PlatformPayload};

fn markdown_options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS
}

/// Image URLs referenced by `markdown`, in order, without repeats.
///
/// Only absolute http(s) URLs are returned; relative and data URLs cannot
/// be fetched from an arbitrary page.
pub fn collect_markdown_images(markdown: &str) -> Vec<String> {
    let mut urls: Vec<String> = Vec::new();
    for event in Parser::new_ext(markdown, markdown_options()) {
        if let Event::Start(Tag::Image { dest_url, .. }) = event {
            let url = dest_url.trim();
            let absolute = url.starts_with("https://") || url.starts_with("http://");
            if absolute && !urls.iter().any(|u| u == url) {
                urls.push(url.to_string());
            }
        }
    }
    urls
}

fn render_html(markdown: &str) -> String {
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, Parser::new_ext(markdown, markdown_options()));
    out
}

impl Adapter {
    /// Shape `post` for this platform.
    pub fn transform(&self, post: &CanonicalPost) -> PlatformPayload {
        let caps = &self.capabilities;

        let has_image_assets = post.assets.iter().any(|a| a.kind == AssetKind::Image);
        let assets = if has_image_assets {
            post.assets.clone()
        } else {
            let mut assets = post.assets.clone();
            assets.extend(collect_markdown_images(&post.body_md).into_iter().map(Asset::image));
            assets
        };

        PlatformPayload {
            title: post.title.trim().to_string(),
            content_markdown: Some(post.body_md.clone()),
            content_html: caps.supports_html.then(|| render_html(&post.body_md)),
            tags: if caps.supports_tags {
                post.tags.clone()
            } else {
                Vec::new()
            },
            categories: if caps.supports_categories {
                post.categories.clone()
            } else {
                Vec::new()
            },
            summary: post.summary.clone(),
            cover: post.cover.clone().filter(|_| caps.supports_cover),
            meta: PayloadMeta { assets },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::AdapterRegistry;

    #[test]
    fn collects_absolute_images_once() {
        let md = "![a](https://x.test/a.png)\n\n![b](./local.png) ![a again](https://x.test/a.png)\n\n![c](http://y.test/c.jpg \"title\")";
        assert_eq!(
            collect_markdown_images(md),
            vec!["https://x.test/a.png", "http://y.test/c.jpg"]
        );
    }

    #[test]
    fn html_rendered_only_for_html_platforms() {
        let registry = AdapterRegistry::builtin().unwrap();
        let post = CanonicalPost {
            title: "  Spaced  ".into(),
            body_md: "Some *text*".into(),
            tags: vec!["rust".into()],
            ..CanonicalPost::default()
        };

        let zhihu = registry.get("zhihu").unwrap().transform(&post);
        assert_eq!(zhihu.title, "Spaced");
        assert_eq!(zhihu.content_html.as_deref(), Some("<p>Some <em>text</em></p>\n"));

        let juejin = registry.get("juejin").unwrap().transform(&post);
        assert!(juejin.content_html.is_none());
        assert_eq!(juejin.tags, vec!["rust"]);
    }

    #[test]
    fn declared_image_assets_win_over_markdown_scan() {
        let registry = AdapterRegistry::builtin().unwrap();
        let adapter = registry.get("juejin").unwrap();

        let mut post = CanonicalPost {
            title: "t".into(),
            body_md: "![x](https://x.test/1.png)".into(),
            ..CanonicalPost::default()
        };
        assert_eq!(adapter.transform(&post).image_urls(), vec!["https://x.test/1.png"]);

        post.assets = vec![Asset::image("https://x.test/declared.png")];
        assert_eq!(
            adapter.transform(&post).image_urls(),
            vec!["https://x.test/declared.png"]
        );
    }
}
