//! Automation entry points run inside the target page.
//!
//! Both entry points resolve for every input. Internal steps raise
//! [`AutomationError`]; the conversion to a result record happens here and
//! nowhere else. Partial progress (a filled title, some uploaded images) is
//! left in the page.

use crate::adapter::{Adapter, DomAutomation};
use crate::config::AutomationConfig;
use crate::editor::{fill_editor, locate_editor};
use crate::error::AutomationError;
use crate::images::{ImageSource, upload_images};
use crate::page::{Clock, Page};
use crate::types::{DraftResult, FillResult, PlatformPayload};
use crate::wait::wait_for;

/// How a successful run ended.
struct Filled {
    edit_url: Option<String>,
    note: Option<String>,
}

impl Adapter {
    /// Populate the platform's authoring page with `payload`.
    ///
    /// Steps run strictly in order: title, body, images, final body rewrite.
    /// The run stops once content is filled; submitting is left to the
    /// driver, and to a human when the adapter withholds submission.
    pub async fn fill_and_publish<P, S>(
        &self,
        page: &P,
        images: &S,
        payload: &PlatformPayload,
        config: &AutomationConfig,
    ) -> FillResult
    where
        P: Page,
        S: ImageSource,
    {
        let outcome = match &self.dom {
            Some(dom) => run_fill(dom, page, images, payload, config).await,
            None => Err(AutomationError::missing(format!(
                "{} has no page automation",
                self.name
            ))),
        };
        match outcome {
            Ok(filled) => FillResult::filled(page.location(), filled.edit_url, filled.note),
            Err(e) => {
                tracing::error!(adapter = self.id, error = %e, "fill failed");
                FillResult::failed(page.location(), &e)
            }
        }
    }

    /// Ask the platform for a server-side draft to edit.
    pub async fn create_draft<P: Page>(&self, page: &P) -> DraftResult {
        let Some(endpoint) = self.dom.as_ref().and_then(|d| d.draft.as_ref()) else {
            return DraftResult::failed(format!("{} does not use server drafts", self.name));
        };
        match endpoint.request(page).await {
            Ok(draft_url) => {
                tracing::info!(adapter = self.id, %draft_url, "draft created");
                DraftResult::created(draft_url)
            }
            Err(e) => {
                tracing::warn!(adapter = self.id, error = %e, "draft creation failed");
                DraftResult::failed(e.to_string())
            }
        }
    }
}

async fn run_fill<P, S>(
    dom: &DomAutomation,
    page: &P,
    images: &S,
    payload: &PlatformPayload,
    config: &AutomationConfig,
) -> Result<Filled, AutomationError>
where
    P: Page,
    S: ImageSource,
{
    let title = payload.title.trim();
    if title.is_empty() {
        return Err(AutomationError::InvalidPayload("payload has no title".into()));
    }
    let markdown = payload.content_markdown.as_deref().unwrap_or_default();
    let html = payload.content_html.as_deref();
    let wait = config.element_wait(dom.wait_timeout);
    let clock = page.clock();

    let title_field = wait_for(clock, "title field", wait, || page.find(dom.title_selector)).await?;
    page.set_field_value(&title_field, title)?;
    clock.sleep(config.settle_delay()).await;

    wait_for(clock, "editor", wait, || locate_editor(page, &dom.editor)).await?;
    fill_editor(page, &dom.editor, markdown, html)?;
    clock.sleep(config.settle_delay()).await;

    let originals = payload.image_urls();
    if let Some(policy) = dom.images.as_ref().filter(|_| !originals.is_empty()) {
        let map = upload_images(page, images, &originals, policy, config.upload_timing()).await;
        tracing::info!(
            uploaded = map.len(),
            total = originals.len(),
            "image uploads finished"
        );

        // Pasting leaves the platform's own image markup behind; start over
        // from the payload with every resolved URL substituted.
        let final_markdown = map.apply(markdown);
        let final_html = html.map(|h| map.apply(h));
        fill_editor(page, &dom.editor, "", Some(""))?;
        clock.sleep(config.settle_delay()).await;
        fill_editor(page, &dom.editor, &final_markdown, final_html.as_deref())?;
        clock.sleep(config.settle_delay()).await;
    }

    let edit_url = dom.draft.as_ref().map(|_| page.location());
    Ok(Filled {
        edit_url,
        note: dom.submit.note(),
    })
}
