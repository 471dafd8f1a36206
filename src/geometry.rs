pub mod mask;
pub mod spokes;
