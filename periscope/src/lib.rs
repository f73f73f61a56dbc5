//! Scroll-aware desktop UI automation core.
//!
//! Reads an application's accessibility element tree, brings off-screen
//! targets into view with a bounded scroll loop, and condenses before/after
//! tree captures into de-noised change reports. The platform accessibility
//! and input layer stays behind the [`UiBackend`] trait; this crate supplies
//! the algorithms on top of it.
//!
//! The two entry points most callers want live on [`Driver`]:
//! `resolve_click_point` for scroll-aware pointer targeting and
//! `enrich_diff`/`observe` for compact change reporting.

pub mod backend;
pub mod driver;
pub mod enrich;
pub mod errors;
pub mod formatter;
pub mod geometry;
pub mod locate;
pub mod noise;
pub mod reveal;
pub mod text;
pub mod tree;
pub mod viewport;

pub use backend::{CursorGuard, UiBackend};
pub use driver::{ClickOutcome, Driver, DriverConfig};
pub use enrich::{enrich_diff, enrich_traversal, EnrichedDiff, EnrichedElement, EnrichedModification};
pub use errors::AutomationError;
pub use formatter::format_elements;
pub use geometry::{Frame, Point};
pub use reveal::{resolve_click_point, RevealConfig};
pub use text::{resolve_text, ResolverConfig};
pub use tree::{AttributeChange, ElementNode, ModifiedNode, RawDiff, TraversalSnapshot};
pub use viewport::resolve_viewport;
