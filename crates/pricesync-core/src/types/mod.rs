//! 파이프라인 전반에서 사용되는 공통 타입과 파싱 함수.

mod price;
mod ticker;

pub use price::*;
pub use ticker::*;
