pub mod modal;
pub mod pagination;
