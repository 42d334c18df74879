pub mod client;
pub mod generic;
