//! Input routes - Income and expense forms
//!
//! Structure:
//! - api.rs: Form submissions and the payer registry endpoint
//! - page.rs: Form rendering

pub mod api;
pub mod page;

pub use api::{api_payers, do_expense, do_income};
pub use page::{page_expense, page_income};
