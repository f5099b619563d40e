//! Registry Entry - 레지스트리 항목 정의

use super::factory::{Construction, FactoryRef};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// ============================================================================
// RegistrationOrigin - 등록 경로
// ============================================================================

/// 항목이 어떤 경로로 등록되었는지
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistrationOrigin {
    /// `register` / `register_as`
    Direct,
    /// `register_batch`
    Batch,
    /// `register_from_collection`
    Collection,
    /// deferred callback 안에서 등록됨
    Deferred,
}

impl std::fmt::Display for RegistrationOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Direct => write!(f, "direct"),
            Self::Batch => write!(f, "batch"),
            Self::Collection => write!(f, "collection"),
            Self::Deferred => write!(f, "deferred"),
        }
    }
}

// ============================================================================
// EntryMetadata - 항목 메타데이터
// ============================================================================

/// 레지스트리 항목의 메타데이터
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryMetadata {
    /// 등록 이름
    pub name: String,

    /// 팩토리 자체 identity (등록 이름과 다를 수 있음)
    pub identity: Option<String>,

    /// 생성 방식
    pub construction: Construction,

    /// 등록 경로
    pub origin: RegistrationOrigin,

    /// 등록 시간
    pub registered_at: DateTime<Utc>,
}

impl EntryMetadata {
    pub fn new(
        name: impl Into<String>,
        identity: Option<String>,
        construction: Construction,
        origin: RegistrationOrigin,
    ) -> Self {
        Self {
            name: name.into(),
            identity,
            construction,
            origin,
            registered_at: Utc::now(),
        }
    }

    /// 등록 이름이 identity와 다른지 (명시적 이름으로 등록됨)
    pub fn is_renamed(&self) -> bool {
        self.identity.as_deref() != Some(self.name.as_str())
    }
}

// ============================================================================
// RegistryEntry - 레지스트리 항목
// ============================================================================

/// 레지스트리 항목 - 팩토리와 메타데이터를 함께 보관
pub struct RegistryEntry<T: 'static> {
    pub factory: FactoryRef<T>,
    pub metadata: EntryMetadata,
}

impl<T: 'static> RegistryEntry<T> {
    pub fn new(factory: FactoryRef<T>, name: impl Into<String>, origin: RegistrationOrigin) -> Self {
        let metadata = EntryMetadata::new(
            name,
            factory.identity(),
            factory.construction(),
            origin,
        );
        Self { factory, metadata }
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }
}

impl<T: 'static> Clone for RegistryEntry<T> {
    fn clone(&self) -> Self {
        Self {
            factory: Arc::clone(&self.factory),
            metadata: self.metadata.clone(),
        }
    }
}
