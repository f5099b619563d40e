//! Registry - 이름 → 팩토리 레지스트리
//!
//! 도메인(model, optimizer, agent, ...)마다 하나씩 명시적으로 생성해서
//! 소유하는 레지스트리입니다. 전역 상태는 없습니다.

use super::args::Args;
use super::collection::FactoryCollection;
use super::deferred::DeferredQueue;
use super::entry::{EntryMetadata, RegistrationOrigin, RegistryEntry};
use super::factory::{Factory, FactoryRef, FnFactory};
use super::instantiate;
use super::naming::resolve_name;
use crate::domain::Domain;
use catalog_foundation::{Error, Result};
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

// ============================================================================
// Registry<T>
// ============================================================================

/// 팩토리 레지스트리
///
/// 이름은 레지스트리 안에서 유일하며, 한 번 등록된 이름은 덮어쓸 수
/// 없습니다. 조회(`resolve`, `instantiate`, `build_from_config`)는 먼저
/// 대기 중인 deferred callback을 flush합니다.
pub struct Registry<T: 'static> {
    /// 레지스트리 이름 (로그/에러용)
    label: String,

    /// config에서 팩토리 이름을 담는 기본 키
    default_name_key: Option<String>,

    /// 등록된 항목
    entries: RwLock<HashMap<String, RegistryEntry<T>>>,

    /// 지연 등록 큐
    deferred: DeferredQueue<T>,
}

impl<T: 'static> Registry<T> {
    /// 기본 키 없는 레지스트리
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            default_name_key: None,
            entries: RwLock::new(HashMap::new()),
            deferred: DeferredQueue::new(),
        }
    }

    /// 기본 키를 가진 레지스트리 (빈 문자열은 기본 키 없음)
    pub fn with_default_key(label: impl Into<String>, key: impl Into<String>) -> Self {
        let key = key.into();
        let mut registry = Self::new(label);
        registry.default_name_key = Some(key).filter(|k| !k.is_empty());
        registry
    }

    /// 잘 알려진 도메인용 레지스트리
    pub fn for_domain(domain: &Domain) -> Self {
        match domain.default_key {
            Some(key) => Self::with_default_key(domain.label, key),
            None => Self::new(domain.label),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn default_name_key(&self) -> Option<&str> {
        self.default_name_key.as_deref()
    }

    // ========================================================================
    // 등록
    // ========================================================================

    /// 팩토리 identity로 등록
    ///
    /// 등록된 팩토리 참조를 그대로 돌려줍니다.
    pub fn register<F>(&self, factory: F) -> Result<FactoryRef<T>>
    where
        F: Factory<T> + 'static,
    {
        self.register_ref(Arc::new(factory), None)
    }

    /// 명시적 이름으로 등록
    pub fn register_as<F>(&self, name: &str, factory: F) -> Result<FactoryRef<T>>
    where
        F: Factory<T> + 'static,
    {
        self.register_ref(Arc::new(factory), Some(name))
    }

    /// 함수 등록 (`fn foo` → "foo")
    pub fn register_fn<F>(&self, func: F) -> Result<FactoryRef<T>>
    where
        F: Fn(Args) -> anyhow::Result<T> + Send + Sync + 'static,
    {
        self.register(FnFactory::new(func))
    }

    /// 이미 공유 중인 팩토리 참조 등록
    pub fn register_ref(&self, factory: FactoryRef<T>, name: Option<&str>) -> Result<FactoryRef<T>> {
        let name = resolve_name(factory.identity().as_deref(), name)?;
        let origin = self.origin(RegistrationOrigin::Direct);

        let mut entries = self.entries.write();
        if entries.contains_key(&name) {
            warn!("[{}] Duplicate registration rejected: {}", self.label, name);
            return Err(Error::duplicate(&self.label, name));
        }
        entries.insert(
            name.clone(),
            RegistryEntry::new(Arc::clone(&factory), name.clone(), origin),
        );
        drop(entries);

        debug!("[{}] Registered: {} ({})", self.label, name, origin);
        Ok(factory)
    }

    /// 여러 팩토리를 한 번에 등록 (all-or-nothing)
    ///
    /// 모든 이름을 검증하고 기존 항목 및 batch 내부 충돌을 검사한 뒤에만
    /// 삽입합니다. 빈 batch는 경고만 남깁니다.
    pub fn register_batch(&self, batch: FactoryBatch<T>) -> Result<Vec<String>> {
        if batch.is_empty() {
            warn!("[{}] No factories provided for batch registration", self.label);
            return Ok(Vec::new());
        }

        let mut resolved = Vec::with_capacity(batch.len());
        for (explicit, factory) in batch.items {
            let name = resolve_name(factory.identity().as_deref(), explicit.as_deref())?;
            resolved.push((name, factory));
        }

        self.insert_all(resolved, self.origin(RegistrationOrigin::Batch))
    }

    /// 컬렉션에서 팩토리 가져오기
    ///
    /// `export`가 없으면 컬렉션이 선언한 export 목록을, 그것도 없으면
    /// 컬렉션의 모든 이름을 사용합니다. 각 팩토리는 컬렉션 안의 이름으로
    /// 등록됩니다.
    pub fn register_from_collection(
        &self,
        collection: &FactoryCollection<T>,
        export: Option<&[&str]>,
    ) -> Result<Vec<String>> {
        let selected = collection.select(export)?;
        if selected.is_empty() {
            warn!(
                "[{}] Collection '{}' exports no factories",
                self.label,
                collection.name()
            );
            return Ok(Vec::new());
        }

        let mut resolved = Vec::with_capacity(selected.len());
        for (name, factory) in selected {
            let name = resolve_name(factory.identity().as_deref(), Some(&name))?;
            resolved.push((name, factory));
        }

        let names = self.insert_all(resolved, self.origin(RegistrationOrigin::Collection))?;
        info!(
            "[{}] Imported {} factories from '{}'",
            self.label,
            names.len(),
            collection.name()
        );
        Ok(names)
    }

    /// 검증이 끝난 (이름, 팩토리) 목록을 원자적으로 삽입
    fn insert_all(
        &self,
        items: Vec<(String, FactoryRef<T>)>,
        origin: RegistrationOrigin,
    ) -> Result<Vec<String>> {
        let mut seen = HashSet::with_capacity(items.len());
        for (name, _) in &items {
            if !seen.insert(name.as_str()) {
                return Err(Error::duplicate(&self.label, name.as_str()));
            }
        }

        let mut entries = self.entries.write();
        if let Some((name, _)) = items.iter().find(|(name, _)| entries.contains_key(name)) {
            warn!("[{}] Duplicate registration rejected: {}", self.label, name);
            return Err(Error::duplicate(&self.label, name.as_str()));
        }

        let mut names = Vec::with_capacity(items.len());
        for (name, factory) in items {
            debug!("[{}] Registered: {} ({})", self.label, name, origin);
            entries.insert(name.clone(), RegistryEntry::new(factory, name.clone(), origin));
            names.push(name);
        }
        Ok(names)
    }

    /// deferred flush 중의 등록은 Deferred로 기록
    fn origin(&self, requested: RegistrationOrigin) -> RegistrationOrigin {
        if self.deferred.is_flushing_here() {
            RegistrationOrigin::Deferred
        } else {
            requested
        }
    }

    // ========================================================================
    // 지연 등록
    // ========================================================================

    /// 첫 조회 때 실행될 등록 callback 추가 (지금은 실행하지 않음)
    pub fn defer<F>(&self, callback: F)
    where
        F: FnOnce(&Registry<T>) -> Result<()> + Send + 'static,
    {
        self.deferred.push(Box::new(callback));
        debug!(
            "[{}] Deferred registration queued ({} pending)",
            self.label,
            self.deferred.len()
        );
    }

    /// 대기 중인 deferred callback 실행
    ///
    /// 조회 메서드가 자동으로 호출하므로 직접 부를 필요는 없습니다.
    pub fn flush_deferred(&self) -> Result<()> {
        match self.deferred.flush(self) {
            Ok(0) => Ok(()),
            Ok(ran) => {
                info!(
                    "[{}] Flushed {} deferred registrations ({} factories)",
                    self.label,
                    ran,
                    self.len()
                );
                Ok(())
            }
            Err(e) => {
                warn!("[{}] Deferred registration failed: {}", self.label, e);
                Err(e)
            }
        }
    }

    // ========================================================================
    // 조회 / 생성
    // ========================================================================

    /// 이름으로 팩토리 조회
    pub fn resolve(&self, name: &str) -> Result<FactoryRef<T>> {
        self.flush_deferred()?;
        self.entries
            .read()
            .get(name)
            .map(|entry| Arc::clone(&entry.factory))
            .ok_or_else(|| Error::not_found(&self.label, name))
    }

    /// 이름으로 조회 후 인스턴스 생성
    pub fn instantiate(&self, name: &str, args: Args) -> Result<T> {
        let factory = self.resolve(name)?;
        instantiate::call(name, factory.as_ref(), args)
    }

    // ========================================================================
    // 검사 (flush하지 않음)
    // ========================================================================

    /// 이미 등록된 이름인지 (deferred callback은 실행하지 않음)
    pub fn contains(&self, name: &str) -> bool {
        self.entries.read().contains_key(name)
    }

    /// 등록된 이름 (정렬됨)
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// 대기 중인 deferred callback 수
    pub fn pending_deferred(&self) -> usize {
        self.deferred.len()
    }

    pub fn metadata(&self, name: &str) -> Option<EntryMetadata> {
        self.entries.read().get(name).map(|e| e.metadata.clone())
    }

    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            label: self.label.clone(),
            registered: self.len(),
            pending_deferred: self.pending_deferred(),
            settled: self.deferred.is_settled(),
        }
    }
}

impl<T: 'static> fmt::Debug for Registry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("label", &self.label)
            .field("default_name_key", &self.default_name_key)
            .field("names", &self.names())
            .field("pending_deferred", &self.pending_deferred())
            .finish()
    }
}

/// 레지스트리 통계
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryStats {
    pub label: String,
    pub registered: usize,
    pub pending_deferred: usize,
    /// 대기 중인 callback이 없음
    pub settled: bool,
}

// ============================================================================
// FactoryBatch - 일괄 등록
// ============================================================================

/// `register_batch`에 넘기는 팩토리 묶음
pub struct FactoryBatch<T: 'static> {
    items: Vec<(Option<String>, FactoryRef<T>)>,
}

impl<T: 'static> FactoryBatch<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// identity로 등록될 팩토리
    pub fn add<F: Factory<T> + 'static>(mut self, factory: F) -> Self {
        self.items.push((None, Arc::new(factory)));
        self
    }

    /// 명시적 이름으로 등록될 팩토리
    pub fn named<F: Factory<T> + 'static>(mut self, name: impl Into<String>, factory: F) -> Self {
        self.items.push((Some(name.into()), Arc::new(factory)));
        self
    }

    pub fn add_ref(mut self, factory: FactoryRef<T>, name: Option<&str>) -> Self {
        self.items.push((name.map(str::to_string), factory));
        self
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: 'static> Default for FactoryBatch<T> {
    fn default() -> Self {
        Self::new()
    }
}
