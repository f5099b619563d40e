//! Config - 설정 트리
//!
//! - `ConfigNode` - 순서를 보존하는 중첩 설정 노드
//! - `loader.rs` - JSON / YAML / TOML 설정 파일 로더

mod loader;

pub use loader::{load_config_from_file, strip_json_comments, ConfigFormat, ConfigLoader};

use serde_json::{Map, Value};

/// 설정 노드 (순서 보존, deep clone 가능)
///
/// 외부 로더가 만든 중첩 설정 트리의 한 노드입니다. 빌더는 항상 복사본을
/// 사용하므로 호출자의 원본은 변경되지 않습니다.
pub type ConfigNode = Map<String, Value>;

/// 두 파라미터 맵 병합 (overrides가 base를 오버라이드)
///
/// 키가 겹치면 나중 값이 이깁니다 (last-writer-wins).
pub fn merge_params(mut base: ConfigNode, overrides: ConfigNode) -> ConfigNode {
    for (key, value) in overrides {
        base.insert(key, value);
    }
    base
}

/// 재귀 병합 - 양쪽 모두 mapping인 키는 안쪽까지 병합
///
/// 기존 키는 제자리를 유지하고, 새 키는 뒤에 추가됩니다.
pub fn deep_merge(mut base: ConfigNode, overlay: ConfigNode) -> ConfigNode {
    for (key, value) in overlay {
        let value = match (base.get_mut(&key), value) {
            (Some(Value::Object(inner)), Value::Object(overlay_inner)) => {
                *inner = deep_merge(std::mem::take(inner), overlay_inner);
                continue;
            }
            (_, value) => value,
        };
        base.insert(key, value);
    }
    base
}

/// Value를 ConfigNode로 변환 (mapping이 아니면 None)
pub fn as_node(value: Value) -> Option<ConfigNode> {
    match value {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(value: Value) -> ConfigNode {
        as_node(value).unwrap()
    }

    #[test]
    fn test_merge_params_override_wins() {
        let base = node(json!({"lr": 0.1, "momentum": 0.9}));
        let overrides = node(json!({"lr": 0.01}));

        let merged = merge_params(base, overrides);
        assert_eq!(merged["lr"], json!(0.01));
        assert_eq!(merged["momentum"], json!(0.9));
    }

    #[test]
    fn test_merge_params_preserves_order() {
        let base = node(json!({"b": 1, "a": 2}));
        let merged = merge_params(base, node(json!({"c": 3})));

        let keys: Vec<&str> = merged.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_deep_merge_nested() {
        let base = node(json!({
            "model": {"model": "resnet", "depth": 18},
            "stages": 2
        }));
        let overlay = node(json!({
            "model": {"depth": 50},
            "stages": 3
        }));

        let merged = deep_merge(base, overlay);
        assert_eq!(merged["model"]["model"], json!("resnet"));
        assert_eq!(merged["model"]["depth"], json!(50));
        assert_eq!(merged["stages"], json!(3));
    }

    #[test]
    fn test_deep_merge_keeps_key_order() {
        let base = node(json!({"model": {"m": 1, "depth": 18}, "epochs": 1, "seed": 0}));
        let overlay = node(json!({"model": {"m": 2}, "seed": 7, "extra": true}));

        let merged = deep_merge(base, overlay);
        let keys: Vec<&str> = merged.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["model", "epochs", "seed", "extra"]);

        let inner: Vec<&str> = merged["model"]
            .as_object()
            .unwrap()
            .keys()
            .map(|k| k.as_str())
            .collect();
        assert_eq!(inner, vec!["m", "depth"]);
    }

    #[test]
    fn test_deep_merge_replaces_non_mapping() {
        let base = node(json!({"callbacks": ["a", "b"]}));
        let merged = deep_merge(base, node(json!({"callbacks": {"c": 1}})));
        assert_eq!(merged["callbacks"], json!({"c": 1}));
    }

    #[test]
    fn test_as_node() {
        assert!(as_node(json!({"a": 1})).is_some());
        assert!(as_node(json!([1, 2])).is_none());
    }
}
