pub mod options;
pub mod serialization;
pub mod stark;
