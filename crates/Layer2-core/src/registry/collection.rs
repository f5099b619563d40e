//! Factory Collection - 모듈 단위 팩토리 묶음
//!
//! 프레임워크나 서드파티 라이브러리가 노출하는 팩토리들을 하나의 이름 공간으로
//! 묶습니다. 선언된 export 목록이 있으면 기본 import 대상은 그 목록입니다.

use super::factory::{Factory, FactoryRef};
use catalog_foundation::{Error, Result};
use std::collections::HashSet;
use std::sync::Arc;

/// 이름 → 팩토리 컬렉션 (삽입 순서 유지)
pub struct FactoryCollection<T: 'static> {
    name: String,
    factories: Vec<(String, FactoryRef<T>)>,
    exports: Option<Vec<String>>,
}

impl<T: 'static> FactoryCollection<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            factories: Vec::new(),
            exports: None,
        }
    }

    /// 팩토리 추가 (같은 이름은 교체)
    pub fn with<F: Factory<T> + 'static>(self, name: impl Into<String>, factory: F) -> Self {
        self.with_ref(name, Arc::new(factory))
    }

    pub fn with_ref(mut self, name: impl Into<String>, factory: FactoryRef<T>) -> Self {
        let name = name.into();
        match self.factories.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = factory,
            None => self.factories.push((name, factory)),
        }
        self
    }

    /// 기본 export 목록 선언
    pub fn exports<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exports = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, name: &str) -> Option<FactoryRef<T>> {
        self.factories
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, f)| Arc::clone(f))
    }

    /// 컬렉션의 모든 이름 (삽입 순서)
    pub fn names(&self) -> Vec<&str> {
        self.factories.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn declared_exports(&self) -> Option<&[String]> {
        self.exports.as_deref()
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// import 대상 선택
    ///
    /// `export` → 선언된 export 목록 → 전체 순으로 사용합니다.
    /// 중복된 이름은 한 번만 선택되며, 컬렉션에 없는 이름이 하나라도
    /// 있으면 `NotFound`.
    pub fn select(&self, export: Option<&[&str]>) -> Result<Vec<(String, FactoryRef<T>)>> {
        let wanted: Vec<&str> = match (export, &self.exports) {
            (Some(names), _) => names.to_vec(),
            (None, Some(declared)) => declared.iter().map(String::as_str).collect(),
            (None, None) => return Ok(self.factories.clone()),
        };

        // 같은 이름이 여러 번 나오면 처음 한 번만
        let mut seen = HashSet::with_capacity(wanted.len());
        wanted
            .into_iter()
            .filter(|name| seen.insert(*name))
            .map(|name| {
                self.get(name)
                    .map(|factory| (name.to_string(), factory))
                    .ok_or_else(|| Error::not_found(&self.name, name))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::super::args::Args;
    use super::super::factory::FnFactory;
    use super::*;
    use serde_json::{json, Value};

    fn relu(_args: Args) -> anyhow::Result<Value> {
        Ok(json!("relu"))
    }

    fn tanh(_args: Args) -> anyhow::Result<Value> {
        Ok(json!("tanh"))
    }

    fn private_helper(_args: Args) -> anyhow::Result<Value> {
        Ok(Value::Null)
    }

    fn activations() -> FactoryCollection<Value> {
        FactoryCollection::new("activations")
            .with("relu", FnFactory::new(relu))
            .with("tanh", FnFactory::new(tanh))
            .with("private_helper", FnFactory::new(private_helper))
    }

    fn selected_names(selected: &[(String, FactoryRef<Value>)]) -> Vec<&str> {
        selected.iter().map(|(n, _)| n.as_str()).collect()
    }

    #[test]
    fn test_select_all_in_order() {
        let collection = activations();
        let selected = collection.select(None).unwrap();
        assert_eq!(selected_names(&selected), vec!["relu", "tanh", "private_helper"]);
    }

    #[test]
    fn test_declared_exports_are_default() {
        let collection = activations().exports(["tanh", "relu"]);
        let selected = collection.select(None).unwrap();
        assert_eq!(selected_names(&selected), vec!["tanh", "relu"]);

        // 명시적 목록이 선언보다 우선
        let selected = collection.select(Some(&["private_helper"])).unwrap();
        assert_eq!(selected_names(&selected), vec!["private_helper"]);
    }

    #[test]
    fn test_repeated_export_selected_once() {
        let collection = activations().exports(["relu", "tanh", "relu"]);
        let selected = collection.select(None).unwrap();
        assert_eq!(selected_names(&selected), vec!["relu", "tanh"]);

        let selected = collection.select(Some(&["tanh", "tanh"])).unwrap();
        assert_eq!(selected_names(&selected), vec!["tanh"]);
    }

    #[test]
    fn test_unknown_export() {
        let err = activations().select(Some(&["gelu"])).unwrap_err();
        assert!(matches!(err, Error::NotFound { ref name, .. } if name == "gelu"));
    }

    #[test]
    fn test_with_replaces_same_name() {
        let collection = activations().with("relu", FnFactory::new(tanh));
        assert_eq!(collection.len(), 3);

        let factory = collection.get("relu").unwrap();
        assert_eq!(factory.call(Args::new()).unwrap(), json!("tanh"));
    }
}
