pub mod color;
pub mod grid;
