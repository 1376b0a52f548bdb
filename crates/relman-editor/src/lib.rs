//! Relman Editor - Session layer for deployment-manifest editing.
//!
//! Builds an interactive [`EditorSession`] on top of `relman-core`:
//! load/replace a manifest, edit module values, move modules between
//! source kinds, import pull-request artifacts, refresh available
//! version tags, and render the canonical output and change summary.
//!
//! # Example
//!
//! ```rust,ignore
//! use relman_editor::EditorSession;
//! use relman_core::SourceKind;
//!
//! #[tokio::main]
//! async fn main() -> relman_core::Result<()> {
//!     let session = EditorSession::load(&manifest_json)?;
//!     session.edit_value("Foo", SourceKind::ReleaseFeed, "1.2.4").await?;
//!     println!("{}", session.serialized().await?);
//!     for entry in session.diff().await {
//!         println!("{entry}");
//!     }
//!     Ok(())
//! }
//! ```

pub mod clipboard;
mod import;
mod refresh;
mod session;

pub use clipboard::{ClipboardSink, MemoryClipboard};
pub use refresh::TagService;
pub use session::{EditorSession, PlatformField};
