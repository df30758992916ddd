//! Summary routes - Yearly balance by month and payer

pub mod api;
pub mod page;

pub use api::api_summary;
pub use page::page_summary;
