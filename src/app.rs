use std::path::PathBuf;

use thiserror::Error;

use crate::config::{Config, ConfigError};
use crate::conversion::ConversionError;
use crate::session::RatioSession;
use crate::store::{FileRecordStore, StoreError};
use crate::ui_cli::{self, MenuChoice};

/// 애플리케이션 실행 중 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 터미널 입출력 오류
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// 설정 저장/로드 오류
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// 단위/체적 해석 오류
    #[error(transparent)]
    Conversion(#[from] ConversionError),
    /// 레코드 저장소 오류
    #[error(transparent)]
    Store(#[from] StoreError),
    /// 존재하지 않는 레코드
    #[error("no record with id {0}")]
    RecordNotFound(String),
}

/// CLI 세션 하나가 쓰는 상태.
pub struct CliContext {
    pub config: Config,
    pub config_path: PathBuf,
    pub session: RatioSession<FileRecordStore>,
}

impl CliContext {
    /// 설정의 데이터 디렉터리로 레코드 저장소를 열어 세션을 만든다.
    pub fn open(config: Config, config_path: PathBuf) -> Result<Self, AppError> {
        let data_dir = config.resolve_data_dir();
        tracing::info!(data_dir = %data_dir.display(), "opening record store");
        let store = FileRecordStore::open_dir(&data_dir)?;
        let session = RatioSession::new(store, config.default_unit);
        Ok(Self {
            config,
            config_path,
            session,
        })
    }
}

/// CLI 애플리케이션의 메인 루프를 실행한다.
pub fn run(ctx: &mut CliContext) -> Result<(), AppError> {
    loop {
        match ui_cli::main_menu()? {
            MenuChoice::RatioCalculator => ui_cli::handle_ratio_calculator(&mut ctx.session)?,
            MenuChoice::Records => ui_cli::handle_records(&mut ctx.session)?,
            MenuChoice::Landing => ui_cli::handle_landing_preview(&ctx.config)?,
            MenuChoice::Splash => ui_cli::handle_splash_preview(&ctx.config)?,
            MenuChoice::Settings => {
                ui_cli::handle_settings(&mut ctx.config)?;
                ctx.config.save(&ctx.config_path)?;
            }
            MenuChoice::Exit => {
                ctx.config.save(&ctx.config_path)?;
                println!("Bye.");
                break;
            }
        }
    }
    Ok(())
}
