//! 단위 정의 및 변환 모듈 모음.

pub mod volume;

pub use volume::{from_base, to_base, VolumeUnit};
