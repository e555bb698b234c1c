pub mod budget;
pub mod monitor;
