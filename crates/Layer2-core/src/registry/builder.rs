//! Config-Driven Builder - 설정 트리에서 인스턴스 생성
//!
//! ```text
//! { "model": "SimpleNet", "hidden": 64 }
//!        │                    │
//!        ▼                    ▼
//!   resolve("SimpleNet")   Args (+ overrides, overrides 우선)
//!        │                    │
//!        └──── instantiate ───┴──▶ Built::Instance
//!        └──── partial ───────────▶ Built::Partial (factory + params)
//! ```
//!
//! 호출자의 config는 변경되지 않습니다 (내부 복사본 사용).

use super::args::Args;
use super::factory::FactoryRef;
use super::instantiate;
use super::registry::Registry;
use catalog_foundation::{ConfigNode, Error, Result};
use serde_json::Value;
use std::any::Any;
use std::fmt;
use tracing::debug;

// ============================================================================
// BuildRequest
// ============================================================================

/// `build_from_config` 옵션
#[derive(Debug)]
pub struct BuildRequest {
    /// 팩토리 이름을 담는 키 (없으면 레지스트리 기본 키)
    pub name_key: Option<String>,

    /// false면 생성하지 않고 팩토리 + 파라미터 반환
    pub instantiate: bool,

    /// config 값보다 우선하는 인자
    pub overrides: Args,
}

impl Default for BuildRequest {
    fn default() -> Self {
        Self {
            name_key: None,
            instantiate: true,
            overrides: Args::new(),
        }
    }
}

impl BuildRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name_key(mut self, key: impl Into<String>) -> Self {
        self.name_key = Some(key.into());
        self
    }

    pub fn instantiate(mut self, instantiate: bool) -> Self {
        self.instantiate = instantiate;
        self
    }

    /// `instantiate(false)`
    pub fn partial(self) -> Self {
        self.instantiate(false)
    }

    pub fn override_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.overrides.set_kwarg(key, value);
        self
    }

    pub fn override_object<O: Any + Send>(mut self, key: impl Into<String>, object: O) -> Self {
        self.overrides.insert_object(key, object);
        self
    }

    /// overrides 전체 교체
    pub fn overrides(mut self, overrides: Args) -> Self {
        self.overrides = overrides;
        self
    }
}

// ============================================================================
// Built / Partial
// ============================================================================

/// `build_from_config` 결과
pub enum Built<T: 'static> {
    /// 이름이 없음 (선택적 컴포넌트가 설정되지 않음)
    Empty,
    /// 생성된 인스턴스
    Instance(T),
    /// 생성하지 않은 팩토리 + 병합된 파라미터
    Partial(Partial<T>),
}

impl<T: 'static> Built<T> {
    pub fn is_empty(&self) -> bool {
        matches!(self, Built::Empty)
    }

    /// 인스턴스 (Empty → None, Partial → 이 시점에 생성)
    pub fn into_instance(self) -> Result<Option<T>> {
        match self {
            Built::Empty => Ok(None),
            Built::Instance(instance) => Ok(Some(instance)),
            Built::Partial(partial) => partial.build(),
        }
    }

    /// Partial 결과 (Instance → None)
    pub fn into_partial(self) -> Option<Partial<T>> {
        match self {
            Built::Partial(partial) => Some(partial),
            _ => None,
        }
    }
}

impl<T: 'static> fmt::Debug for Built<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Built::Empty => write!(f, "Empty"),
            Built::Instance(_) => write!(f, "Instance(..)"),
            Built::Partial(partial) => f.debug_tuple("Partial").field(partial).finish(),
        }
    }
}

/// 부분 적용된 팩토리
///
/// `factory`가 `None`이면 config에 이름이 없었던 경우이며, `params`에는
/// 이름 키를 제외한 나머지 config가 들어 있습니다.
pub struct Partial<T: 'static> {
    name: Option<String>,
    factory: Option<FactoryRef<T>>,
    params: Args,
}

impl<T: 'static> Partial<T> {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn factory(&self) -> Option<&FactoryRef<T>> {
        self.factory.as_ref()
    }

    pub fn params(&self) -> &Args {
        &self.params
    }

    /// 생성 전에 파라미터 수정
    pub fn params_mut(&mut self) -> &mut Args {
        &mut self.params
    }

    pub fn is_resolved(&self) -> bool {
        self.factory.is_some()
    }

    pub fn into_parts(self) -> (Option<FactoryRef<T>>, Args) {
        (self.factory, self.params)
    }

    /// 현재 파라미터로 생성 (팩토리가 없으면 None)
    pub fn build(self) -> Result<Option<T>> {
        self.build_with(Args::new())
    }

    /// 추가 인자를 덮어써서 생성 (추가 인자 우선)
    pub fn build_with(self, extra: Args) -> Result<Option<T>> {
        let (Some(name), Some(factory)) = (self.name, self.factory) else {
            return Ok(None);
        };
        let args = self.params.merge(extra);
        instantiate::call(&name, factory.as_ref(), args).map(Some)
    }
}

impl<T: 'static> fmt::Debug for Partial<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Partial")
            .field("name", &self.name)
            .field("resolved", &self.is_resolved())
            .field("params", &self.params)
            .finish()
    }
}

// ============================================================================
// Registry 확장
// ============================================================================

impl<T: 'static> Registry<T> {
    /// 설정 노드에서 팩토리를 찾아 생성하거나 부분 적용 결과를 반환
    ///
    /// - 이름 값이 `null` / `""` 이거나 빠졌으면 → `Empty` (partial 모드면
    ///   나머지 config를 담은 미해결 `Partial`)
    /// - 쓸 키가 전혀 없으면 `Naming` (단, 빈 config는 `Empty`)
    /// - 이름이 있으면 partial 모드에서도 조회하므로 미등록 이름은 `NotFound`
    /// - overrides는 같은 키의 config 값보다 우선
    pub fn build_from_config(&self, config: &ConfigNode, request: BuildRequest) -> Result<Built<T>> {
        let BuildRequest {
            name_key,
            instantiate: build_now,
            overrides,
        } = request;

        let key = name_key
            .filter(|k| !k.is_empty())
            .or_else(|| self.default_name_key().map(str::to_string));

        let mut remaining = config.clone();
        let name = match &key {
            Some(key) => take_name(&mut remaining, key)?,
            // 빈 config는 키 없이도 아무것도 만들지 않음
            None if config.is_empty() => None,
            None => {
                return Err(Error::naming(format!(
                    "registry '{}' has no default name key and none was given",
                    self.label()
                )))
            }
        };
        let params = Args::from_kwargs(remaining);

        let Some(name) = name else {
            debug!(
                "[{}] No '{}' in config, nothing to build",
                self.label(),
                key.as_deref().unwrap_or_default()
            );
            return Ok(if build_now {
                Built::Empty
            } else {
                Built::Partial(Partial {
                    name: None,
                    factory: None,
                    params,
                })
            });
        };

        let factory = self.resolve(&name)?;
        let params = params.merge(overrides);

        if build_now {
            instantiate::call(&name, factory.as_ref(), params).map(Built::Instance)
        } else {
            debug!("[{}] Resolved '{}' without instantiating", self.label(), name);
            Ok(Built::Partial(Partial {
                name: Some(name),
                factory: Some(factory),
                params,
            }))
        }
    }

    /// 설정 노드에서 인스턴스 생성 (이름이 없으면 `None`)
    pub fn get_from_config(&self, config: &ConfigNode, name_key: Option<&str>) -> Result<Option<T>> {
        let mut request = BuildRequest::new();
        if let Some(key) = name_key {
            request = request.name_key(key);
        }
        self.build_from_config(config, request)?.into_instance()
    }

    /// 설정 노드에서 팩토리와 병합된 파라미터를 가져옴
    pub fn partial_from_config(
        &self,
        config: &ConfigNode,
        name_key: Option<&str>,
        overrides: Args,
    ) -> Result<Partial<T>> {
        let mut request = BuildRequest::new().partial().overrides(overrides);
        if let Some(key) = name_key {
            request = request.name_key(key);
        }
        match self.build_from_config(config, request)? {
            Built::Partial(partial) => Ok(partial),
            // partial 모드는 항상 Partial을 반환
            _ => Err(Error::Config(format!(
                "[{}] expected a partial build result",
                self.label()
            ))),
        }
    }
}

/// 이름 키 제거 (null / "" / 누락은 None)
fn take_name(config: &mut ConfigNode, key: &str) -> Result<Option<String>> {
    match config.shift_remove(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(name)) if name.is_empty() => Ok(None),
        Some(Value::String(name)) => Ok(Some(name)),
        Some(other) => Err(Error::naming(format!(
            "value of '{}' must be a factory name string, got {}",
            key, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::super::factory::FnFactory;
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    fn foo(args: Args) -> anyhow::Result<Value> {
        Ok(Value::Object(args.bind(&["a", "b"])?))
    }

    fn node(value: Value) -> ConfigNode {
        catalog_foundation::as_node(value).unwrap()
    }

    fn registry() -> Registry<Value> {
        let registry = Registry::with_default_key("test", "kind");
        registry.register_fn(foo).unwrap();
        registry
    }

    #[test]
    fn test_build_leaves_config_unchanged() {
        let config = node(json!({"name_key": "foo", "a": 1, "b": 2}));
        let built = registry()
            .build_from_config(&config, BuildRequest::new().name_key("name_key"))
            .unwrap();

        match built {
            Built::Instance(value) => assert_eq!(value, json!({"a": 1, "b": 2})),
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(config.get("name_key"), Some(&json!("foo")));
        assert_eq!(config.len(), 3);
    }

    #[test]
    fn test_default_name_key() {
        let config = node(json!({"kind": "foo", "a": 1, "b": 2}));
        let value = registry().get_from_config(&config, None).unwrap();
        assert_eq!(value, Some(json!({"a": 1, "b": 2})));
    }

    #[test]
    fn test_empty_config_is_noop() {
        let registry = registry();
        let built = registry
            .build_from_config(&ConfigNode::new(), BuildRequest::new().name_key("name_key"))
            .unwrap();
        assert!(built.is_empty());

        for absent in [json!(null), json!("")] {
            let config = node(json!({"kind": absent, "a": 1}));
            assert_eq!(registry.get_from_config(&config, None).unwrap(), None);
        }
    }

    #[test]
    fn test_empty_config_partial_keeps_remaining() {
        let partial = registry()
            .partial_from_config(&node(json!({"a": 1})), None, Args::new().kwarg("b", 2))
            .unwrap();

        assert!(!partial.is_resolved());
        assert_eq!(partial.name(), None);
        assert_eq!(partial.params().get("a"), Some(&json!(1)));
        assert_eq!(partial.params().get("b"), None);
        assert_eq!(partial.build().unwrap(), None);
    }

    #[test]
    fn test_partial_with_missing_name_fails() {
        let config = node(json!({"name_key": "missing"}));
        let err = registry()
            .build_from_config(&config, BuildRequest::new().name_key("name_key").partial())
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[test]
    fn test_overrides_win() {
        let config = node(json!({"kind": "foo", "a": 1, "b": 2}));
        let built = registry()
            .build_from_config(&config, BuildRequest::new().override_value("b", 20))
            .unwrap();

        assert_eq!(built.into_instance().unwrap(), Some(json!({"a": 1, "b": 20})));
    }

    #[test]
    fn test_partial_returns_factory_and_merged_params() {
        let registry = registry();
        let config = node(json!({"kind": "foo", "a": 1}));
        let mut partial = registry
            .partial_from_config(&config, None, Args::new().kwarg("b", 2))
            .unwrap();

        assert_eq!(partial.name(), Some("foo"));
        assert!(Arc::ptr_eq(partial.factory().unwrap(), &registry.resolve("foo").unwrap()));
        assert_eq!(partial.params().keyword().len(), 2);

        partial.params_mut().set_kwarg("a", 10);
        let value = partial.build_with(Args::new().kwarg("b", 3)).unwrap();
        assert_eq!(value, Some(json!({"a": 10, "b": 3})));
    }

    #[test]
    fn test_non_string_name_is_naming_error() {
        let config = node(json!({"kind": 42}));
        let err = registry().get_from_config(&config, None).unwrap_err();
        assert!(matches!(err, Error::Naming(_)));
    }

    #[test]
    fn test_no_key_available() {
        let registry: Registry<Value> = Registry::new("bare");
        let err = registry
            .get_from_config(&node(json!({"kind": "foo"})), None)
            .unwrap_err();
        assert!(matches!(err, Error::Naming(_)));
    }

    #[test]
    fn test_empty_config_without_key_is_noop() {
        let registry: Registry<Value> = Registry::new("bare");
        let built = registry
            .build_from_config(&ConfigNode::new(), BuildRequest::new())
            .unwrap();
        assert!(matches!(built, Built::Empty));

        let partial = registry
            .partial_from_config(&ConfigNode::new(), None, Args::new())
            .unwrap();
        assert!(!partial.is_resolved());
        assert!(partial.params().keyword().is_empty());
        assert!(partial.build().unwrap().is_none());
    }

    #[test]
    fn test_construction_failure_from_config() {
        let config = node(json!({"kind": "foo", "a": 1, "c": 3}));
        let err = registry().get_from_config(&config, None).unwrap_err();
        assert!(matches!(err, Error::Construction { ref factory, .. } if factory == "foo"));
    }

    #[test]
    fn test_build_flushes_deferred() {
        let registry: Registry<Value> = Registry::with_default_key("late", "kind");
        registry.defer(|r| {
            r.register_fn(foo)?;
            Ok(())
        });

        let config = node(json!({"kind": "foo", "a": 1, "b": 2}));
        assert!(registry.get_from_config(&config, None).unwrap().is_some());
    }
}
