use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::units::VolumeUnit;

/// 기본 설정 파일 경로.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// 랜딩 페이지 그리드 설정.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub cols: usize,
    pub lines: usize,
    /// 이 개수 이상의 목표 칸이 모이면 테마가 바뀐다.
    pub target_count: usize,
    pub tick_min_ms: u64,
    pub tick_max_ms: u64,
    /// 한 번의 틱이 장식 문자를 놓을 확률
    pub lottery: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cols: 40,
            lines: 10,
            target_count: 10,
            tick_min_ms: 250,
            tick_max_ms: 350,
            lottery: 0.2,
        }
    }
}

impl GridConfig {
    /// 행 타이머 주기 범위. 뒤집혀 있으면 바로잡고 0ms는 1ms로 올린다.
    pub fn tick_range_ms(&self) -> (u64, u64) {
        let lo = self.tick_min_ms.min(self.tick_max_ms).max(1);
        let hi = self.tick_min_ms.max(self.tick_max_ms).max(lo);
        (lo, hi)
    }
}

/// 스플래시 화면 설정.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplashConfig {
    pub text: String,
    pub blink_ms: u64,
}

impl Default for SplashConfig {
    fn default() -> Self {
        Self {
            text: "> tristo.dev ".into(),
            blink_ms: 1000,
        }
    }
}

/// 애플리케이션 설정을 표현한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 레코드 저장 디렉터리. 없으면 OS 데이터 디렉터리를 쓴다.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    /// 새 계산의 결과 단위 기본값. 없으면 처음 고른 물질 단위를 따른다.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_unit: Option<VolumeUnit>,
    pub window_alpha: f32,
    pub grid: GridConfig,
    pub splash: SplashConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            default_unit: None,
            window_alpha: 1.0,
            grid: GridConfig::default(),
            splash: SplashConfig::default(),
        }
    }
}

/// 설정 로드/저장 시 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 파일 입출력 오류
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML 역직렬화 오류
    #[error("config parse error: {0}")]
    Serde(#[from] toml::de::Error),
    /// TOML 직렬화 오류
    #[error("config serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// config.toml을 로드하거나 없으면 기본 설정을 생성한다.
pub fn load_or_default() -> Result<Config, ConfigError> {
    load_or_default_at(Path::new(DEFAULT_CONFIG_PATH))
}

/// 지정한 경로의 설정을 로드하거나 없으면 기본 설정을 그 경로에 쓴다.
pub fn load_or_default_at(path: &Path) -> Result<Config, ConfigError> {
    if path.exists() {
        let content = fs::read_to_string(path)?;
        let cfg: Config = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(cfg)
    } else {
        let cfg = Config::default();
        save_config(&cfg, path)?;
        tracing::info!(path = %path.display(), "wrote default config");
        Ok(cfg)
    }
}

fn save_config(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    let content = toml::to_string_pretty(cfg)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

impl Config {
    /// 설정을 지정한 경로에 저장한다.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        save_config(self, path)
    }

    /// 레코드 저장 디렉터리를 결정한다.
    pub fn resolve_data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .or_else(|| dirs::data_dir().map(|d| d.join("tristo_toolbox")))
            .unwrap_or_else(|| PathBuf::from("data"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub/config.toml");
        let cfg = load_or_default_at(&path).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(path.exists());
        assert_eq!(load_or_default_at(&path).unwrap(), cfg);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "default_unit = \"l\"\ndata_dir = \"/tmp/records\"\n\n[grid]\ncols = 20\n",
        )
        .unwrap();
        let cfg = load_or_default_at(&path).unwrap();
        assert_eq!(cfg.default_unit, Some(VolumeUnit::Liter));
        assert_eq!(cfg.resolve_data_dir(), PathBuf::from("/tmp/records"));
        assert_eq!(cfg.grid.cols, 20);
        assert_eq!(cfg.grid.lines, 10);
        assert_eq!(cfg.splash, SplashConfig::default());
    }

    #[test]
    fn bad_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "grid = [").unwrap();
        assert!(matches!(load_or_default_at(&path), Err(ConfigError::Serde(_))));
    }

    #[test]
    fn tick_range_is_normalised() {
        let cfg = GridConfig {
            tick_min_ms: 400,
            tick_max_ms: 0,
            ..GridConfig::default()
        };
        assert_eq!(cfg.tick_range_ms(), (1, 400));
        assert_eq!(GridConfig::default().tick_range_ms(), (250, 350));
    }
}
