//! Tab groups: visual data, colours and the group registry

mod color;
mod model;

pub use color::{ColorPool, GROUP_COLORS, TabGroupColorId};
pub use model::{GroupRegistry, TabGroup, TabGroupVisualData};
