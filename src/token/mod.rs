//! Media Token Cache
//!
//! In-memory store of opaque tokens bound to resolved media files.
//!
//! Expiry is lazy: records are swept only when a caller asks (before every
//! mint request and every status query). There is no background timer, so
//! without traffic a stale record can stay in memory indefinitely.
//! Redemption re-checks age and file existence itself, which bounds what a
//! client can observe regardless of sweep timing.

mod cache;
mod clock;
mod error;
#[cfg(test)]
mod tests;

pub use cache::{Redemption, TokenCache, TokenRecord, DEFAULT_TOKEN_TTL_SECS};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::RedeemError;
