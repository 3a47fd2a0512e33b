//! Shared REST plumbing for Stockroom services
//!
//! Every service module maps its domain errors onto the [`Problem`] response
//! type and shapes its list endpoints with [`Page`]/[`PageQuery`]. The report
//! endpoints share [`DateRangeQuery`].

pub mod pagination;
pub mod problem;
pub mod query;

pub use pagination::{Page, PageQuery};
pub use problem::Problem;
pub use query::DateRangeQuery;
