pub mod api;
pub mod components;
pub mod date_utils;
pub mod debounce;
pub mod icons;
