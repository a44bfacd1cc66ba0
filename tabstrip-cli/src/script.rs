//! Replay script format
//!
//! A script is a JSON document with the tabs to start from and the steps to
//! apply, in order:
//!
//! ```json
//! {
//!   "tabs": ["https://a.example", "https://b.example"],
//!   "steps": [
//!     { "op": "activate", "index": 1 },
//!     { "op": "group", "indices": [0, 1], "title": "docs" },
//!     { "op": "menu", "index": 0, "command": "close_tab" }
//!   ]
//! }
//! ```
//!
//! Groups are addressed through one of their tabs (`group_of`), since their
//! ids are only known at run time.

use serde::{Deserialize, Serialize};
use tabstrip_core::{ContextMenuCommand, PageTransition};

use crate::error::CliError;

/// A parsed script.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Script {
    /// Initial tabs, the first one active
    #[serde(default)]
    pub tabs: Vec<String>,
    /// Commands to replay
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Script {
    /// Parses a script from JSON text.
    pub fn parse(text: &str) -> Result<Self, CliError> {
        serde_json::from_str(text).map_err(|e| CliError::Script(e.to_string()))
    }
}

/// How an opened tab came about.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    /// Followed a link in the active tab
    Link,
    /// Typed into the address bar
    #[default]
    Typed,
    /// Picked a bookmark
    Bookmark,
    /// Reloaded
    Reload,
    /// Anything else
    Other,
}

impl From<Transition> for PageTransition {
    fn from(transition: Transition) -> Self {
        match transition {
            Transition::Link => Self::Link,
            Transition::Typed => Self::Typed,
            Transition::Bookmark => Self::AutoBookmark,
            Transition::Reload => Self::Reload,
            Transition::Other => Self::Other,
        }
    }
}

const fn yes() -> bool {
    true
}

/// One scripted command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    /// Open a tab; without `index` the strip picks the position
    Open {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        index: Option<usize>,
        #[serde(default)]
        transition: Transition,
        #[serde(default)]
        foreground: bool,
        #[serde(default)]
        pinned: bool,
    },
    Close {
        index: usize,
    },
    CloseSelected,
    CloseAll,
    /// Swap a tab's contents for a new page
    Replace {
        index: usize,
        url: String,
    },
    Activate {
        index: usize,
        #[serde(default)]
        gesture: bool,
    },
    Toggle {
        index: usize,
    },
    Extend {
        index: usize,
    },
    SelectNext,
    SelectPrevious,
    Move {
        index: usize,
        to: usize,
    },
    MoveSelected {
        to: usize,
    },
    MoveNext,
    MovePrevious,
    Pin {
        index: usize,
        #[serde(default = "yes")]
        pinned: bool,
    },
    Block {
        index: usize,
        #[serde(default = "yes")]
        blocked: bool,
    },
    Group {
        indices: Vec<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
    },
    /// Add tabs to the group of tab `group_of`
    Join {
        indices: Vec<usize>,
        group_of: usize,
    },
    Ungroup {
        indices: Vec<usize>,
    },
    Collapse {
        group_of: usize,
        #[serde(default = "yes")]
        collapsed: bool,
    },
    MoveGroup {
        group_of: usize,
        to: usize,
    },
    /// Split the tabs, or one tab with the active tab
    Split {
        indices: Vec<usize>,
    },
    /// Dissolve the split containing tab `index`
    Unsplit {
        index: usize,
    },
    /// Run a context menu command on tab `index`
    Menu {
        index: usize,
        command: ContextMenuCommand,
    },
}
