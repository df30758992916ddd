//! Listing routes - Entries of one month and delete

pub mod api;
pub mod page;

pub use api::{api_entries, do_delete};
pub use page::page_list;
