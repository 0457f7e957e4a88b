mod concurrency_gate;
mod crawler_scrape;
mod fetcher_github;
mod observer_log;
mod permit_pool;
mod persister_log;
mod persister_postgresql;
mod rate_limiter;
mod requester_http;

pub use concurrency_gate::*;
pub use crawler_scrape::*;
pub use fetcher_github::*;
pub use observer_log::*;
pub use permit_pool::*;
pub use persister_log::*;
pub use persister_postgresql::*;
pub use rate_limiter::*;
pub use requester_http::*;
