//! 설정 파일 로드.
//!
//! YAML 설정 파일과 `HOSTWATCH__` 접두사 환경변수를 병합해 [`AppConfig`]를 만든다.
//! 파일 탐색 순서: 명시 경로 → `./config/config.yaml` → 플랫폼 설정 디렉토리.
//! 어느 파일도 없으면 기본값과 환경변수만 사용한다.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use directories::ProjectDirs;
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::error::CoreError;

/// 설정 파일 이름
const CONFIG_FILE_NAME: &str = "config.yaml";

/// 작업 디렉토리 기준 기본 설정 경로
const LOCAL_CONFIG_PATH: &str = "config/config.yaml";

/// 환경변수 오버라이드 접두사 (예: `HOSTWATCH__ALERTS__COOLDOWN=60`)
pub const ENV_PREFIX: &str = "HOSTWATCH";

/// 환경변수 키 구분자
const ENV_SEPARATOR: &str = "__";

/// 설정 로드 (프로세스 환경변수 사용)
///
/// `explicit`이 주어지면 해당 파일이 반드시 존재해야 한다.
pub fn load(explicit: Option<&Path>) -> Result<AppConfig, CoreError> {
    load_with_env(explicit, None)
}

/// 설정 로드 (환경변수 소스 지정 가능, 테스트용)
pub fn load_with_env(
    explicit: Option<&Path>,
    env: Option<HashMap<String, String>>,
) -> Result<AppConfig, CoreError> {
    let mut builder = Config::builder();

    match resolve_path(explicit)? {
        Some(path) => {
            info!("설정 파일 로드: {}", path.display());
            builder = builder.add_source(File::from(path).format(FileFormat::Yaml).required(true));
        }
        None => debug!("설정 파일 없음, 기본값 사용"),
    }

    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator(ENV_SEPARATOR)
            .separator(ENV_SEPARATOR)
            .try_parsing(true)
            .source(env),
    );

    let config: AppConfig = builder
        .build()
        .and_then(|c| c.try_deserialize())
        .map_err(|e| CoreError::Config(format!("설정 로드 실패: {e}")))?;

    config.validate()?;
    Ok(config)
}

/// 설정 파일 경로 결정
fn resolve_path(explicit: Option<&Path>) -> Result<Option<PathBuf>, CoreError> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(CoreError::Config(format!(
                "설정 파일을 찾을 수 없습니다: {}",
                path.display()
            )));
        }
        return Ok(Some(path.to_path_buf()));
    }

    let local = PathBuf::from(LOCAL_CONFIG_PATH);
    if local.exists() {
        return Ok(Some(local));
    }

    Ok(platform_config_path().filter(|p| p.exists()))
}

/// 플랫폼별 설정 파일 경로 (예: Linux `~/.config/hostwatch/config.yaml`)
pub fn platform_config_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "hostwatch", "hostwatch")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}
