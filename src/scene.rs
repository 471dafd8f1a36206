pub mod svg;
pub mod tree;
