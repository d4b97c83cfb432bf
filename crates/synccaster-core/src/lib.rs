//! synccaster-core: platform adapters and page automation, independent of
//! any browser binding.
//!
//! This crate provides:
//! - `Adapter` / `AdapterRegistry` - declarative descriptions of each
//!   publishing platform and the bundled set
//! - `Page` / `Clock` - the primitives automation needs from a host page
//! - `wait_for` - bounded polling for asynchronous page readiness
//! - `EditorStrategy` - ordered editor fill chains
//! - `upload_images` - paste-to-upload with diff-based URL detection
//! - `FillResult` / `DraftResult` - the non-throwing result records
//!
//! All automation is generic over `Page`, so it runs natively in tests and
//! in the browser through `synccaster-browser`.

pub mod adapter;
pub mod automation;
pub mod config;
pub mod editor;
pub mod error;
pub mod handoff;
pub mod images;
pub mod matcher;
pub mod message;
pub mod page;
pub mod types;
pub mod wait;

#[cfg(test)]
mod testing;

pub use adapter::{
    Adapter, AdapterDescriptor, AdapterKind, AdapterRegistry, ApiTransport, Capabilities,
    SubmitPolicy,
};
pub use config::AutomationConfig;
pub use editor::{EditorStrategy, fill_editor, locate_editor};
pub use error::{AdapterError, AutomationError};
pub use handoff::{HANDOFF_STORAGE_KEY, HandoffError, HandoffRecord, HandoffStore};
pub use images::{ImagePolicy, ImageSource, ImageUrlMap, upload_images};
pub use matcher::{UrlMatcher, UrlMatchers};
pub use message::{MessageRequest, MessageResponse};
pub use page::{Clock, EditorContent, HttpReply, ImageFile, Page};
pub use types::*;
pub use wait::{WaitOptions, wait_for};
