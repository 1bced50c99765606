pub mod constant;
pub mod counter;
pub mod fibonacci;
pub mod masked_counter;
pub mod mimc;
