pub mod masking;
pub mod metadata;
pub mod orders;
pub mod query;
pub mod rules;
