pub mod application;
pub mod credential;
pub mod graph;
pub mod tags;

pub use application::{ApplicationCredential, ApplicationRecord};
pub use credential::CredentialRecord;
pub use graph::{RawApplication, RawKeyCredential, RawPasswordCredential};
pub use tags::Tags;
