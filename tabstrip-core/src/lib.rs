//! Tabstrip Core Library
//!
//! Ordering, selection and grouping engine behind a browser tab strip. The
//! crate keeps an ordered strip of tabs with a pinned prefix, contiguous tab
//! groups and side-by-side splits, a multi-selection with an active tab, and
//! the opener relationships used to pick the next active tab on close.
//!
//! # Crate Structure
//!
//! - [`model`] - [`TabStripModel`], the orchestrator every command goes through
//! - [`collection`] - The ordered tree of tabs, groups and splits
//! - [`move_engine`] - Pure index arithmetic for moves and placement
//! - [`selection`] - Multi-selection with active and anchor indices
//! - [`group`] / [`split`] - Group and split registries with their visual data
//! - [`observer`] / [`delegate`] - The outward notification and policy seams
//! - [`config`] - Settings and their TOML persistence
//! - [`tracing`] - Subscriber setup and span names
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use tabstrip_core::{DefaultDelegate, TabContents, TabStripModel};
//!
//! let model = TabStripModel::new(Rc::new(DefaultDelegate));
//! model.append_tab(TabContents::new("https://a.example"), true);
//! model.append_tab(TabContents::new("https://b.example"), false);
//! let group = model.add_to_new_group(&[1]);
//! assert_eq!(model.group_range(group), Some(1..2));
//! ```

// Enable missing_docs warning for public API documentation
#![warn(missing_docs)]

pub mod collection;
pub mod config;
pub mod delegate;
pub mod error;
pub mod group;
pub mod model;
pub mod move_engine;
pub mod observer;
pub mod selection;
pub mod split;
pub mod tab;
pub mod tracing;
pub mod types;

// =============================================================================
// Convenience re-exports
//
// Integration tests and the CLI import through the flat namespace; the
// modular paths stay available for everything else.
// =============================================================================

pub use collection::{CollectionNode, TabCollection};
pub use config::{ConfigManager, LastTabClosePolicy, SETTINGS_FILE_NAME, TabStripSettings};
pub use delegate::{
    CloseProposal, DefaultDelegate, DeferredAction, DeferredCommand, TabStripModelDelegate,
};
pub use error::{ConfigError, ConfigResult, TabStripError, TabStripResult};
pub use group::{ColorPool, GroupRegistry, TabGroup, TabGroupColorId, TabGroupVisualData};
pub use model::{
    AddTypes, CloseTypes, ContextMenuCommand, DetachedTab, PageTransition, TabStripModel,
};
pub use observer::{
    CloseAllStoppedReason, InsertedTab, MovedTab, RemovedTab, ReplacedTab, SelectionChangeReason,
    SplitChange, SplitChangeKind, TabChangeType, TabGroupChange, TabGroupChangeKind,
    TabRemovedReason, TabStripModelChange, TabStripModelObserver, TabStripSelectionChange,
};
pub use selection::ListSelectionModel;
pub use split::{SplitData, SplitLayout, SplitRegistry, SplitVisualData};
pub use tab::{NEW_TAB_URL, Tab, TabContents};
pub use types::{ContentsId, GroupId, SplitId, TabHandle};
