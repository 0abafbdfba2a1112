pub mod check;
pub mod generate;
pub mod preview;
pub mod summary;
