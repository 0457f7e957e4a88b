mod crawler;
mod fetcher;
mod observer;
mod persister;
mod requester;
mod ticker;

pub use crawler::*;
pub use fetcher::*;
pub use observer::*;
pub use persister::*;
pub use requester::*;
pub use ticker::*;
