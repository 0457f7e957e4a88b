use crate::StdResult;

/// A trait pacing the periodic refill of a rate limiter.
#[async_trait::async_trait]
pub trait RefillTicker: Send {
    /// Waits until the next refill is due.
    async fn tick(&mut self) -> StdResult<()>;
}
