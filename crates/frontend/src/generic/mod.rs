pub mod form;
pub mod inputs;
pub mod list;
pub mod programacao;

/// Model slug of the record being edited, provided by the form so nested
/// inputs can call model-scoped endpoints.
#[derive(Clone, Copy)]
pub struct ActiveModel(pub leptos::prelude::RwSignal<String>);
