//! 랜딩 페이지의 문자 그리드 애니메이션과 스플래시 화면.

pub mod grid;
pub mod splash;
pub mod ticker;

pub use grid::{classify, CellClass, Grid, GridFrame, Row};
pub use splash::Splash;
pub use ticker::{CancellationToken, RowTickers};

/// 위쪽 막대 제목.
pub const SITE_TITLE: &str = "tristo.dev";
