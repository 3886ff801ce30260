pub mod dedup;
pub mod discovery;
pub mod health;
pub mod pipeline;
pub mod portfolio;
pub mod report;
pub mod search;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod verification;
