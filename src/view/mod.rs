pub mod text;
pub mod theme;
pub mod tree_view;
pub mod widget;
