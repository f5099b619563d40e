//! Call Arguments - 팩토리 호출 인자
//!
//! 위치 인자, 키워드 인자(`ConfigNode`), 그리고 이미 생성된 객체(object)를
//! 함께 전달합니다. 객체 슬롯은 복합 객체를 마지막에 조립할 때
//! (예: runner에 model/optimizer 인스턴스 전달) 사용됩니다.

use catalog_foundation::{merge_params, ConfigNode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

// ============================================================================
// ArgsError - 인자 바인딩 에러
// ============================================================================

/// 인자 바인딩 / 변환 에러
///
/// 팩토리는 이 에러를 `anyhow::Error`로 반환하고, Instantiator가
/// `Error::Construction`의 원인으로 연결합니다.
#[derive(Error, Debug)]
pub enum ArgsError {
    #[error("takes {expected} positional arguments but {given} were given")]
    TooManyPositional { expected: usize, given: usize },

    #[error("got multiple values for argument '{0}'")]
    MultipleValues(String),

    #[error("got an unexpected keyword argument '{0}'")]
    UnexpectedKeyword(String),

    #[error("missing required argument '{0}'")]
    Missing(String),

    #[error("missing object argument '{0}'")]
    MissingObject(String),

    #[error("object argument '{name}' is not a {expected}")]
    ObjectType { name: String, expected: &'static str },

    #[error("invalid parameters: {0}")]
    Deserialize(#[from] serde_json::Error),
}

// ============================================================================
// Args - 호출 인자
// ============================================================================

/// 팩토리 호출 인자
#[derive(Default)]
pub struct Args {
    positional: Vec<Value>,
    keyword: ConfigNode,
    objects: BTreeMap<String, Box<dyn Any + Send>>,
}

impl Args {
    /// 빈 인자
    pub fn new() -> Self {
        Self::default()
    }

    /// 키워드 인자만으로 생성
    pub fn from_kwargs(keyword: ConfigNode) -> Self {
        Self {
            keyword,
            ..Self::default()
        }
    }

    /// 위치 인자 추가
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// 키워드 인자 추가 (같은 키가 있으면 교체, 같은 이름의 객체는 제거)
    pub fn kwarg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_kwarg(key, value);
        self
    }

    /// 키워드 인자 설정
    pub fn set_kwarg(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        self.objects.remove(&key);
        self.keyword.insert(key, value.into());
    }

    /// 객체 인자 추가 (같은 이름의 키워드 값은 제거)
    pub fn object<O: Any + Send>(mut self, key: impl Into<String>, object: O) -> Self {
        self.insert_object(key, object);
        self
    }

    /// 객체 인자 설정
    pub fn insert_object<O: Any + Send>(&mut self, key: impl Into<String>, object: O) {
        let key = key.into();
        self.keyword.shift_remove(&key);
        self.objects.insert(key, Box::new(object));
    }

    // ========================================================================
    // 조회
    // ========================================================================

    pub fn positional(&self) -> &[Value] {
        &self.positional
    }

    pub fn keyword(&self) -> &ConfigNode {
        &self.keyword
    }

    /// 키워드 값 조회
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.keyword.get(key)
    }

    /// 키워드 값 제거 후 반환
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.keyword.shift_remove(key)
    }

    /// 객체 이름 목록
    pub fn object_names(&self) -> Vec<&str> {
        self.objects.keys().map(|k| k.as_str()).collect()
    }

    pub fn has_object(&self, key: &str) -> bool {
        self.objects.contains_key(key)
    }

    /// 객체 인자 꺼내기 (타입이 다르면 그대로 되돌려 놓고 에러)
    pub fn take_object<O: Any + Send>(&mut self, key: &str) -> Result<O, ArgsError> {
        let boxed = self
            .objects
            .remove(key)
            .ok_or_else(|| ArgsError::MissingObject(key.to_string()))?;

        match boxed.downcast::<O>() {
            Ok(object) => Ok(*object),
            Err(original) => {
                self.objects.insert(key.to_string(), original);
                Err(ArgsError::ObjectType {
                    name: key.to_string(),
                    expected: std::any::type_name::<O>(),
                })
            }
        }
    }

    /// 전체 인자 개수
    pub fn len(&self) -> usize {
        self.positional.len() + self.keyword.len() + self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // ========================================================================
    // 병합 / 변환
    // ========================================================================

    /// 다른 인자를 위에 덮어쓰기 (overrides 우선)
    ///
    /// 키워드와 객체는 같은 이름 공간을 공유하므로, 덮어쓰는 쪽이
    /// 값이든 객체든 기존 항목을 대체합니다. 위치 인자는 뒤에 이어 붙습니다.
    pub fn merge(mut self, overrides: Args) -> Args {
        self.positional.extend(overrides.positional);
        for key in overrides.keyword.keys() {
            self.objects.remove(key);
        }
        self.keyword = merge_params(std::mem::take(&mut self.keyword), overrides.keyword);
        for (key, object) in overrides.objects {
            self.keyword.shift_remove(&key);
            self.objects.insert(key, object);
        }
        self
    }

    /// 파라미터 이름 목록에 인자 바인딩
    ///
    /// 위치 인자를 순서대로 이름에 배정한 뒤 키워드 인자와 합칩니다.
    /// 객체 인자는 이름만 검사되며 결과 맵에는 포함되지 않습니다.
    pub fn bind(&self, params: &[&str]) -> Result<ConfigNode, ArgsError> {
        if self.positional.len() > params.len() {
            return Err(ArgsError::TooManyPositional {
                expected: params.len(),
                given: self.positional.len(),
            });
        }

        let mut bound = ConfigNode::new();
        for (name, value) in params.iter().zip(&self.positional) {
            bound.insert((*name).to_string(), value.clone());
        }

        for (key, value) in &self.keyword {
            if !params.contains(&key.as_str()) {
                return Err(ArgsError::UnexpectedKeyword(key.clone()));
            }
            if bound.contains_key(key) {
                return Err(ArgsError::MultipleValues(key.clone()));
            }
            bound.insert(key.clone(), value.clone());
        }

        for key in self.objects.keys() {
            if !params.contains(&key.as_str()) {
                return Err(ArgsError::UnexpectedKeyword(key.clone()));
            }
            if bound.contains_key(key) {
                return Err(ArgsError::MultipleValues(key.clone()));
            }
        }

        for name in params {
            if !bound.contains_key(*name) && !self.objects.contains_key(*name) {
                return Err(ArgsError::Missing((*name).to_string()));
            }
        }

        Ok(bound)
    }

    /// 키워드 인자를 타입이 있는 파라미터 구조체로 변환
    pub fn deserialize<P: DeserializeOwned>(&self) -> Result<P, ArgsError> {
        if !self.positional.is_empty() {
            return Err(ArgsError::TooManyPositional {
                expected: 0,
                given: self.positional.len(),
            });
        }
        Ok(serde_json::from_value(Value::Object(self.keyword.clone()))?)
    }

    /// 에러 메시지용 요약
    pub fn describe(&self) -> String {
        let positional = Value::Array(self.positional.clone());
        let keyword = Value::Object(self.keyword.clone());
        if self.objects.is_empty() {
            format!("args={} kwargs={}", positional, keyword)
        } else {
            format!(
                "args={} kwargs={} objects=[{}]",
                positional,
                keyword,
                self.object_names().join(", ")
            )
        }
    }
}

impl fmt::Debug for Args {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Args")
            .field("positional", &self.positional)
            .field("keyword", &self.keyword)
            .field("objects", &self.object_names())
            .finish()
    }
}

impl From<ConfigNode> for Args {
    fn from(keyword: ConfigNode) -> Self {
        Self::from_kwargs(keyword)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[test]
    fn test_bind_positional_and_keyword() {
        let bound = Args::new().arg(1).kwarg("b", 2).bind(&["a", "b"]).unwrap();
        assert_eq!(Value::Object(bound), json!({"a": 1, "b": 2}));
    }

    #[test]
    fn test_bind_errors() {
        assert!(matches!(
            Args::new().kwarg("c", 1).bind(&["a", "b"]),
            Err(ArgsError::UnexpectedKeyword(k)) if k == "c"
        ));
        assert!(matches!(
            Args::new().arg(1).kwarg("a", 2).kwarg("b", 3).bind(&["a", "b"]),
            Err(ArgsError::MultipleValues(k)) if k == "a"
        ));
        assert!(matches!(
            Args::new().arg(1).arg(2).arg(3).bind(&["a", "b"]),
            Err(ArgsError::TooManyPositional { expected: 2, given: 3 })
        ));
        assert!(matches!(
            Args::new().arg(1).bind(&["a", "b"]),
            Err(ArgsError::Missing(k)) if k == "b"
        ));
    }

    #[test]
    fn test_bind_counts_objects_as_provided() {
        let args = Args::new().kwarg("lr", 0.1).object("model", vec![1u8, 2, 3]);
        let bound = args.bind(&["model", "lr"]).unwrap();
        assert_eq!(Value::Object(bound), json!({"lr": 0.1}));
    }

    #[test]
    fn test_merge_override_wins() {
        let base = Args::from_kwargs(json!({"a": 1, "b": 2}).as_object().unwrap().clone());
        let merged = base.merge(Args::new().kwarg("b", 20).kwarg("c", 3));

        assert_eq!(Value::Object(merged.keyword().clone()), json!({"a": 1, "b": 20, "c": 3}));
        let keys: Vec<&str> = merged.keyword().keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_merge_value_replaces_object() {
        let base = Args::new().object("model", 1u8);
        let merged = base.merge(Args::new().kwarg("model", "SimpleNet"));

        assert!(!merged.has_object("model"));
        assert_eq!(merged.get("model"), Some(&json!("SimpleNet")));
    }

    #[test]
    fn test_merge_object_replaces_value() {
        let base = Args::new().kwarg("model", json!({"model": "SimpleNet"}));
        let mut merged = base.merge(Args::new().object("model", String::from("built")));

        assert!(merged.get("model").is_none());
        assert_eq!(merged.take_object::<String>("model").unwrap(), "built");
    }

    #[test]
    fn test_take_object_wrong_type_keeps_object() {
        let mut args = Args::new().object("model", 42u32);

        assert!(matches!(
            args.take_object::<String>("model"),
            Err(ArgsError::ObjectType { .. })
        ));
        assert_eq!(args.take_object::<u32>("model").unwrap(), 42);
        assert!(matches!(
            args.take_object::<u32>("model"),
            Err(ArgsError::MissingObject(_))
        ));
    }

    #[test]
    fn test_deserialize_typed_params() {
        #[derive(Deserialize)]
        struct AdamParams {
            lr: f64,
            #[serde(default)]
            weight_decay: f64,
        }

        let params: AdamParams = Args::new().kwarg("lr", 0.001).deserialize().unwrap();
        assert_eq!(params.lr, 0.001);
        assert_eq!(params.weight_decay, 0.0);

        assert!(Args::new().arg(1).deserialize::<AdamParams>().is_err());
    }

    #[test]
    fn test_describe() {
        let args = Args::new().arg(1).kwarg("c", 1).object("model", 0u8);
        assert_eq!(args.describe(), r#"args=[1] kwargs={"c":1} objects=[model]"#);
        assert_eq!(args.len(), 3);
    }
}
