//! Bundled platform adapters.
//!
//! Selectors and hosts reflect each platform's authoring page as last
//! observed. When a page changes shape the adapter degrades to a structural
//! mismatch in the fill result rather than failing the driver.

use std::time::Duration;

use super::{
    Adapter, AdapterKind, Capabilities, DomAutomation, DraftEndpoint, ImageUpload, RateLimit,
    SubmitPolicy,
};
use crate::editor::EditorStrategy;
use crate::error::AdapterError;
use crate::images::ImagePolicy;
use crate::matcher::UrlMatchers;

pub(super) fn all() -> Result<Vec<Adapter>, AdapterError> {
    Ok(vec![
        juejin()?,
        csdn()?,
        zhihu()?,
        segmentfault()?,
        cnblogs()?,
        jianshu()?,
    ])
}

/// Markdown-first DOM platform with paste-to-upload images.
fn markdown_caps(rate_limit: RateLimit) -> Capabilities {
    Capabilities {
        dom_automation: true,
        supports_markdown: true,
        supports_html: false,
        supports_tags: false,
        supports_categories: false,
        supports_cover: false,
        supports_schedule: false,
        image_upload: ImageUpload::Dom,
        rate_limit,
    }
}

fn juejin() -> Result<Adapter, AdapterError> {
    Ok(Adapter {
        id: "juejin",
        name: "Juejin",
        kind: AdapterKind::Dom,
        icon: "https://lf-web-assets.juejin.cn/obj/juejin-web/xitu_juejin_web/static/favicons/favicon-32x32.png",
        capabilities: Capabilities {
            supports_tags: true,
            supports_categories: true,
            supports_cover: true,
            ..markdown_caps(RateLimit { rpm: 2, concurrent: 1 })
        },
        session_cookie: Some("sessionid"),
        dom: Some(DomAutomation {
            matchers: UrlMatchers::new(&["https://juejin.cn/editor/*"])?,
            editor_url: Some("https://juejin.cn/editor/drafts/new?v=2"),
            draft: None,
            title_selector: "input.title-input",
            editor: vec![
                EditorStrategy::ComponentMethod {
                    selector: ".bytemd",
                    instance_key: "__bytemd__",
                    method: "setValue",
                },
                EditorStrategy::CodeEditor {
                    selector: ".bytemd .CodeMirror",
                },
            ],
            images: Some(ImagePolicy {
                editor_selector: ".bytemd-editor",
                paste_selector: Some(".bytemd-editor .CodeMirror-scroll"),
                allowed_hosts: &["byteimg.com"],
            }),
            wait_timeout: Duration::from_secs(30),
            submit: SubmitPolicy::Withhold(
                "Juejin asks for a category, tags and a summary on publish; review them and submit manually",
            ),
        }),
    })
}

fn csdn() -> Result<Adapter, AdapterError> {
    Ok(Adapter {
        id: "csdn",
        name: "CSDN",
        kind: AdapterKind::Dom,
        icon: "https://g.csdnimg.cn/static/logo/favicon32.ico",
        capabilities: Capabilities {
            supports_tags: true,
            supports_categories: true,
            supports_cover: true,
            supports_schedule: true,
            ..markdown_caps(RateLimit { rpm: 2, concurrent: 1 })
        },
        session_cookie: Some("UserName"),
        dom: Some(DomAutomation {
            matchers: UrlMatchers::new(&[
                "https://editor.csdn.net/md*",
                "https://mp.csdn.net/mp_blog/creation/editor*",
            ])?,
            editor_url: Some("https://editor.csdn.net/md/"),
            draft: None,
            title_selector: ".article-bar__title input, input.article-bar__title",
            editor: vec![
                EditorStrategy::ComponentMethod {
                    selector: ".editor",
                    instance_key: "__vue__",
                    method: "$refs.editor.setValue",
                },
                EditorStrategy::Editable {
                    selector: ".editor__inner[contenteditable=true]",
                    html: false,
                },
            ],
            images: Some(ImagePolicy {
                editor_selector: ".editor__inner",
                paste_selector: None,
                allowed_hosts: &["csdnimg.cn"],
            }),
            wait_timeout: Duration::from_secs(30),
            submit: SubmitPolicy::Withhold(
                "CSDN needs article type, category and visibility chosen before publishing; submit manually",
            ),
        }),
    })
}

fn zhihu() -> Result<Adapter, AdapterError> {
    Ok(Adapter {
        id: "zhihu",
        name: "Zhihu",
        kind: AdapterKind::Dom,
        icon: "https://static.zhihu.com/heifetz/favicon.ico",
        capabilities: Capabilities {
            supports_markdown: false,
            supports_html: true,
            supports_cover: true,
            ..markdown_caps(RateLimit { rpm: 1, concurrent: 1 })
        },
        session_cookie: Some("z_c0"),
        dom: Some(DomAutomation {
            matchers: UrlMatchers::new(&[
                "https://zhuanlan.zhihu.com/write*",
                "https://zhuanlan.zhihu.com/p/*/edit*",
            ])?,
            editor_url: Some("https://zhuanlan.zhihu.com/write"),
            draft: Some(DraftEndpoint {
                url: "https://zhuanlan.zhihu.com/api/articles/drafts",
                body: || serde_json::json!({ "title": "", "delta_time": 0 }),
                id_field: "id",
                edit_url: "https://zhuanlan.zhihu.com/p/{id}/edit",
            }),
            title_selector: "textarea.WriteIndex-titleInput, .WriteIndex-titleInput textarea",
            editor: vec![EditorStrategy::Editable {
                selector: ".public-DraftEditor-content[contenteditable=true]",
                html: true,
            }],
            images: Some(ImagePolicy {
                editor_selector: ".public-DraftEditor-content",
                paste_selector: None,
                allowed_hosts: &["zhimg.com"],
            }),
            wait_timeout: Duration::from_secs(45),
            submit: SubmitPolicy::Withhold(
                "Zhihu asks for topics and a column on publish; submit manually",
            ),
        }),
    })
}

fn segmentfault() -> Result<Adapter, AdapterError> {
    Ok(Adapter {
        id: "segmentfault",
        name: "SegmentFault",
        kind: AdapterKind::Dom,
        icon: "https://static.segmentfault.com/main_site_next/prod/favicon.ico",
        capabilities: Capabilities {
            supports_tags: true,
            ..markdown_caps(RateLimit { rpm: 2, concurrent: 1 })
        },
        session_cookie: Some("PHPSESSID"),
        dom: Some(DomAutomation {
            matchers: UrlMatchers::new(&["https://segmentfault.com/write*"])?,
            editor_url: Some("https://segmentfault.com/write"),
            draft: None,
            title_selector: "input#title, input[name=title]",
            editor: vec![EditorStrategy::CodeEditor {
                selector: ".CodeMirror",
            }],
            images: Some(ImagePolicy {
                editor_selector: ".CodeMirror",
                paste_selector: Some(".CodeMirror-scroll"),
                allowed_hosts: &["segmentfault.com"],
            }),
            wait_timeout: Duration::from_secs(20),
            submit: SubmitPolicy::Withhold(
                "SegmentFault requires at least one tag before publishing; submit manually",
            ),
        }),
    })
}

fn cnblogs() -> Result<Adapter, AdapterError> {
    Ok(Adapter {
        id: "cnblogs",
        name: "Cnblogs",
        kind: AdapterKind::Dom,
        icon: "https://common.cnblogs.com/favicon.svg",
        capabilities: Capabilities {
            supports_tags: true,
            supports_categories: true,
            ..markdown_caps(RateLimit { rpm: 4, concurrent: 1 })
        },
        session_cookie: Some(".Cnblogs.AspNetCore.Cookies"),
        dom: Some(DomAutomation {
            matchers: UrlMatchers::new(&[
                "https://i.cnblogs.com/posts/edit*",
                "https://i.cnblogs.com/articles/edit*",
            ])?,
            editor_url: Some("https://i.cnblogs.com/posts/edit"),
            draft: None,
            title_selector: "#post-title, input[name=title]",
            editor: vec![EditorStrategy::Field {
                selector: "#md-editor, textarea#postBodyEditor",
            }],
            images: Some(ImagePolicy {
                editor_selector: "#md-editor, textarea#postBodyEditor",
                paste_selector: None,
                allowed_hosts: &["cnblogs.com"],
            }),
            wait_timeout: Duration::from_secs(15),
            submit: SubmitPolicy::DriverMay,
        }),
    })
}

fn jianshu() -> Result<Adapter, AdapterError> {
    Ok(Adapter {
        id: "jianshu",
        name: "Jianshu",
        kind: AdapterKind::Dom,
        icon: "https://www.jianshu.com/favicon.ico",
        capabilities: markdown_caps(RateLimit { rpm: 1, concurrent: 1 }),
        session_cookie: Some("remember_user_token"),
        dom: Some(DomAutomation {
            matchers: UrlMatchers::new(&["https://www.jianshu.com/writer*"])?,
            editor_url: Some("https://www.jianshu.com/writer#/"),
            draft: None,
            title_selector: "input[class*=title], ._24i7u",
            editor: vec![
                EditorStrategy::CodeEditor {
                    selector: ".CodeMirror",
                },
                EditorStrategy::Editable {
                    selector: "#arthur-editor[contenteditable=true]",
                    html: false,
                },
            ],
            images: Some(ImagePolicy {
                editor_selector: ".CodeMirror, #arthur-editor",
                paste_selector: None,
                allowed_hosts: &["upload-images.jianshu.io"],
            }),
            wait_timeout: Duration::from_secs(30),
            submit: SubmitPolicy::Withhold(
                "Jianshu publishes immediately on submit; review the article and submit manually",
            ),
        }),
    })
}
