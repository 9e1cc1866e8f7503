//! 동기화 작업 모듈.

pub mod price_sync;

pub use price_sync::{sync_once, HttpPriceSync, PriceSync};
