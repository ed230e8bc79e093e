pub mod categories;
pub mod filter;
pub mod group;
pub mod matcher;
pub mod ordering;
pub mod reorder;
pub mod sort;
pub mod view;
