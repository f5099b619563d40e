//! Error types for Catalog
//!
//! 모든 에러를 중앙에서 관리

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Catalog 에러 타입
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // 등록 관련
    // ========================================================================
    /// 이름을 유도할 수 없거나 사용할 수 없는 이름
    #[error("Naming error: {0}")]
    Naming(String),

    /// 같은 레지스트리에 이미 등록된 이름
    #[error("Factory with name '{name}' is already present in registry '{registry}'")]
    DuplicateName { registry: String, name: String },

    // ========================================================================
    // 조회 / 생성 관련
    // ========================================================================
    #[error("No factory with name '{name}' was registered in '{registry}'")]
    NotFound { registry: String, name: String },

    /// 팩토리 호출 실패 (원인은 source로 연결)
    #[error("Factory '{factory}' call failed: {args}")]
    Construction {
        factory: String,
        args: String,
        #[source]
        source: anyhow::Error,
    },

    // ========================================================================
    // 설정 관련
    // ========================================================================
    #[error("Configuration error: {0}")]
    Config(String),

    // ========================================================================
    // 외부 에러 변환
    // ========================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// 등록 시점 에러인지 확인 (재시도 의미 없음)
    pub fn is_registration_error(&self) -> bool {
        matches!(self, Error::Naming(_) | Error::DuplicateName { .. })
    }

    /// 조회 실패인지 확인 (호출자가 기본값으로 대체할 수 있음)
    pub fn is_lookup_error(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    /// Naming 에러 생성 헬퍼
    pub fn naming(message: impl Into<String>) -> Self {
        Error::Naming(message.into())
    }

    /// DuplicateName 에러 생성 헬퍼
    pub fn duplicate(registry: impl Into<String>, name: impl Into<String>) -> Self {
        Error::DuplicateName {
            registry: registry.into(),
            name: name.into(),
        }
    }

    /// NotFound 에러 생성 헬퍼
    pub fn not_found(registry: impl Into<String>, name: impl Into<String>) -> Self {
        Error::NotFound {
            registry: registry.into(),
            name: name.into(),
        }
    }

    /// Construction 에러 생성 헬퍼
    pub fn construction(
        factory: impl Into<String>,
        args: impl Into<String>,
        source: anyhow::Error,
    ) -> Self {
        Error::Construction {
            factory: factory.into(),
            args: args.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_error_classification() {
        assert!(Error::naming("no name").is_registration_error());
        assert!(Error::duplicate("model", "foo").is_registration_error());
        assert!(Error::not_found("model", "foo").is_lookup_error());
        assert!(!Error::Config("bad".into()).is_lookup_error());
    }

    #[test]
    fn test_construction_error_chains_cause() {
        let err = Error::construction(
            "foo",
            "args=[] kwargs={\"c\":1}",
            anyhow::anyhow!("unexpected keyword argument 'c'"),
        );

        assert!(err.to_string().contains("'foo'"));
        let cause = err.source().expect("cause should be chained");
        assert!(cause.to_string().contains("unexpected keyword"));
    }

    #[test]
    fn test_duplicate_message() {
        let err = Error::duplicate("optimizer", "Adam");
        assert_eq!(
            err.to_string(),
            "Factory with name 'Adam' is already present in registry 'optimizer'"
        );
    }
}
