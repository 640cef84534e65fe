pub mod graph_provider;
pub mod pages;
pub mod providers;
pub mod token;

// Re-export from providers.rs so we can do "use crate::providers::*;"
pub use pages::application_pages;
pub use providers::*;
