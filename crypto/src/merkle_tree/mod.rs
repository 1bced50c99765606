pub mod merkle;
pub mod proof;
pub mod utils;
