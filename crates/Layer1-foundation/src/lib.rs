//! # catalog-foundation
//!
//! Foundation layer for Catalog:
//! - Error: 중앙 에러 타입 (Naming, DuplicateName, NotFound, Construction)
//! - Config: 설정 트리 (`ConfigNode`), 파라미터 병합, 설정 파일 로더
//!
//! ## 아키텍처
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Config files (JSON / YAML / TOML)                      │
//! │                     │                                   │
//! │                     ▼                                   │
//! │          ConfigLoader ── deep_merge ──▶ ConfigNode      │
//! │                                          │              │
//! │                                          ▼              │
//! │                        catalog-core Registry<T>         │
//! │                  (build_from_config / instantiate)      │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;

// ============================================================================
// Error
// ============================================================================
pub use error::{Error, Result};

// ============================================================================
// Config (설정)
// ============================================================================
pub use config::{
    as_node, deep_merge, load_config_from_file, merge_params, strip_json_comments, ConfigFormat,
    ConfigLoader, ConfigNode,
};
