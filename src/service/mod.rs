//! Service Module
//!
//! The caching discipline in front of the repositories: cache-aside reads,
//! write-through/invalidating writes, warm-up, and operation timing.

mod cached;
pub mod instrument;
mod warmer;

#[cfg(test)]
pub(crate) mod test_support;

pub use cached::CachedRepository;
pub use instrument::timed;
pub use warmer::warm_all;
