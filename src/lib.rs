//! Scrapes the most starred GitHub repositories and counts the commits of their authors
//! over the last 24 hours, within a local rate limit and concurrency cap.

mod infrastructure;
mod interface;
mod model;

pub use infrastructure::*;
pub use interface::*;
pub use model::*;
