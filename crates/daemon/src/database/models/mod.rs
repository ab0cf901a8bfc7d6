mod account;
mod document;

pub use account::Account;
pub use document::{Document, DocumentSummary};
