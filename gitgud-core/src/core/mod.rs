pub mod commit;
pub mod edge;
pub mod error;
pub mod tree;

pub use commit::{BranchId, Commit, CommitId, IdSequence, Link};
pub use edge::{Edge, EdgeType};
pub use error::{ErrorKind, GraphError, Result};
pub use tree::{GitTree, TreeStats};
