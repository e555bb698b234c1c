pub mod controller;
pub mod mode;
pub mod sink;
