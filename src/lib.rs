//! 핵심 계산 로직을 라이브러리로 분리하여 CLI와 GUI가 같은 코드를 쓰게 한다.

pub mod app;
pub mod calculator;
pub mod config;
pub mod conversion;
pub mod display;
pub mod logging;
pub mod notify;
pub mod quantity;
pub mod record;
pub mod session;
pub mod store;
pub mod ui_cli;
pub mod units;
