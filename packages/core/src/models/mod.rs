//! Data Models
//!
//! Types shared by the rendering pipeline, the reconciler and the stores.

mod block;
mod path;

pub use block::{
    BlockKind, BlockSpec, ListKind, LogicalUnit, RemoteBlock, RenderableBlock, StyledRun,
    MAX_HEADING_DEPTH, SECTION_BLOCK_TYPE,
};
pub use path::{ContainerKind, ContainerPath};
