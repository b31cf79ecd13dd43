pub mod add;
pub mod log;
