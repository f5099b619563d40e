//! Configuration Loader
//!
//! 실험 설정 파일 로더 (JSON / YAML / TOML)
//!
//! ## 병합 규칙
//!
//! 여러 파일을 우선순위 순으로 읽어 `deep_merge`로 겹쳐 올립니다.
//! 나중에 추가된(우선순위가 높은) 파일이 이전 파일을 오버라이드합니다.

use super::{deep_merge, ConfigNode};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

// ============================================================================
// ConfigFormat - 파일 형식
// ============================================================================

/// 지원하는 설정 파일 형식
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigFormat {
    /// JSON (`//`, `/* */` 주석 허용)
    Json,
    Yaml,
    Toml,
}

impl ConfigFormat {
    /// 확장자로 형식 추론
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" | "jsonc" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }

    /// 문자열을 설정 트리로 파싱
    pub fn parse(self, content: &str) -> Result<Value> {
        let value: Value = match self {
            Self::Json => serde_json::from_str(&strip_json_comments(content))?,
            Self::Yaml => serde_yaml::from_str(content)?,
            Self::Toml => toml::from_str(content)?,
        };
        Ok(value)
    }
}

// ============================================================================
// ConfigLoader - 설정 로더
// ============================================================================

/// 설정 로더
pub struct ConfigLoader {
    /// 검색 경로
    search_paths: Vec<ConfigPath>,
}

/// 설정 파일 경로 정보
#[derive(Debug, Clone)]
struct ConfigPath {
    /// 경로
    path: PathBuf,
    /// 우선순위 (높을수록 우선)
    priority: u8,
}

impl ConfigLoader {
    /// 빈 로더 생성
    pub fn new() -> Self {
        Self {
            search_paths: Vec::new(),
        }
    }

    /// 경로 목록으로 생성 (뒤쪽일수록 우선)
    pub fn with_paths(paths: Vec<PathBuf>) -> Self {
        let search_paths = paths
            .into_iter()
            .enumerate()
            .map(|(i, path)| ConfigPath {
                path,
                priority: i.min(u8::MAX as usize) as u8,
            })
            .collect();

        Self { search_paths }
    }

    /// 검색 경로 추가
    pub fn add_path(&mut self, path: PathBuf, priority: u8) {
        self.search_paths.push(ConfigPath { path, priority });
        // stable sort: 같은 우선순위는 추가 순서 유지
        self.search_paths.sort_by_key(|p| p.priority);
    }

    /// 모든 경로에서 설정 로드하여 병합
    pub fn load_all(&self) -> Result<ConfigNode> {
        let mut merged = ConfigNode::new();

        for config_path in &self.search_paths {
            if !config_path.path.exists() {
                warn!(
                    "Config file not found, skipping: {}",
                    config_path.path.display()
                );
                continue;
            }

            let node = load_config_from_file(&config_path.path)?;
            info!(
                "Loaded config (priority {}) from: {}",
                config_path.priority,
                config_path.path.display()
            );
            merged = deep_merge(merged, node);
        }

        Ok(merged)
    }

    /// 존재하는 설정 파일 목록
    pub fn existing_files(&self) -> Vec<PathBuf> {
        self.search_paths
            .iter()
            .filter(|p| p.path.exists())
            .map(|p| p.path.clone())
            .collect()
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// 유틸리티 함수
// ============================================================================

/// 파일에서 설정 로드 (최상위는 mapping이어야 함)
pub fn load_config_from_file(path: &Path) -> Result<ConfigNode> {
    let format = ConfigFormat::from_path(path).ok_or_else(|| {
        Error::Config(format!(
            "Unsupported config format: {} (expected .json, .yaml, .yml or .toml)",
            path.display()
        ))
    })?;

    let content = std::fs::read_to_string(path)?;
    let value = format
        .parse(&content)
        .map_err(|e| Error::Config(format!("Invalid config at {}: {}", path.display(), e)))?;

    let node = match value {
        Value::Object(map) => map,
        // 빈 YAML 문서
        Value::Null => ConfigNode::new(),
        other => {
            return Err(Error::Config(format!(
                "Config root at {} must be a mapping, got {}",
                path.display(),
                type_label(&other)
            )))
        }
    };

    debug!(
        "Loaded config from {}: {} top-level keys",
        path.display(),
        node.len()
    );

    Ok(node)
}

fn type_label(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}

/// JSON 주석 제거 (// 및 /* */)
pub fn strip_json_comments(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;
    let mut escape_next = false;

    while let Some(c) = chars.next() {
        if escape_next {
            output.push(c);
            escape_next = false;
            continue;
        }

        if c == '\\' && in_string {
            output.push(c);
            escape_next = true;
            continue;
        }

        if c == '"' {
            in_string = !in_string;
            output.push(c);
            continue;
        }

        if !in_string && c == '/' {
            match chars.peek().copied() {
                Some('/') => {
                    // 라인 주석 스킵
                    for c in chars.by_ref() {
                        if c == '\n' {
                            output.push(c);
                            break;
                        }
                    }
                    continue;
                }
                Some('*') => {
                    // 블록 주석 스킵
                    chars.next();
                    while let Some(c) = chars.next() {
                        if c == '*' && chars.peek() == Some(&'/') {
                            chars.next();
                            break;
                        }
                    }
                    continue;
                }
                _ => {}
            }
        }

        output.push(c);
    }

    output
}

// ============================================================================
// 테스트
// ============================================================================
