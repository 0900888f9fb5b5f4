//! Editor panels drawn through the canvas [`Renderer`](canvas::Renderer).

pub mod tree_view;

pub use tree_view::{TreeRow, TreeView, TreeViewColors, TreeViewLayout};
