//! 동기화 파이프라인의 도메인 모델.

mod entity;
mod outcome;

pub use entity::*;
pub use outcome::*;
