//! Output artifacts of a run: deterministic naming, purging of stale files from
//! earlier runs with the same tag, and the background event reduction pass.

pub mod guard;
pub mod reduce;
pub mod tag;
pub mod tree;

pub use guard::purge_stale;
pub use reduce::{
    copy_non_empty, hit_branches, reduce_background, ReductionReport, BRANCH_LIST, POINT_MARKER,
};
pub use tag::{OutputPaths, OutputTag, CONICAL_TANK_THRESHOLD};
pub use tree::{
    write_tree, BranchDescriptor, BranchKind, Event, JsonlTreeReader, JsonlTreeWriter,
    TreeHeader, TreeReader, TreeWriter, TREE_NAME,
};
