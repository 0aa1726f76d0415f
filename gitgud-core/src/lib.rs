//! In-memory commit graph engine: commits, branches, merges, checkout and
//! single-step undo over an explicit DAG, plus text layout for display.

pub mod core;
pub mod layout;
pub mod render;
pub mod snapshot;

pub use crate::core::{
    BranchId, Commit, CommitId, Edge, EdgeType, ErrorKind, GitTree, GraphError, IdSequence, Link,
    Result, TreeStats,
};
pub use layout::{Lane, LaneIdx, Row, RowBuilder};
pub use render::{Charset, Color, TuiRenderer};
pub use snapshot::{CommitRecord, TreeSnapshot};
