//! Instantiator - 팩토리 호출
//!
//! 팩토리가 파라미터 기반 진입점(`FromParams`)을 노출하면 그쪽을, 아니면
//! 직접 호출을 사용합니다. 선택은 capability 조회로 한 번만 결정되며,
//! 한쪽 경로의 실패가 다른 경로로 넘어가지 않습니다.

use super::args::Args;
use super::factory::{Construction, Factory};
use catalog_foundation::{Error, Result};
use std::time::Instant;
use tracing::debug;

/// 팩토리를 호출하여 인스턴스 생성
///
/// 실패는 `Error::Construction`으로 감싸지며, 팩토리 이름과 시도한 인자를
/// 기록하고 원래 에러를 `source`로 연결합니다.
pub fn call<T>(name: &str, factory: &dyn Factory<T>, args: Args) -> Result<T> {
    let attempted = args.describe();
    let start = Instant::now();

    let (construction, result) = match factory.params_builder() {
        Some(builder) => (Construction::FromParams, builder.create_from_params(args)),
        None => (Construction::Direct, factory.call(args)),
    };

    match result {
        Ok(instance) => {
            debug!(
                "Factory '{}' ({}) built in {}us",
                name,
                construction,
                start.elapsed().as_micros()
            );
            Ok(instance)
        }
        Err(source) => {
            debug!("Factory '{}' ({}) failed: {:#}", name, construction, source);
            Err(Error::construction(name, attempted, source))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::factory::{FnFactory, ParamsFactory};
    use super::*;
    use serde_json::{json, Value};
    use std::error::Error as _;

    fn foo(args: Args) -> anyhow::Result<Value> {
        Ok(Value::Object(args.bind(&["a", "b"])?))
    }

    #[test]
    fn test_direct_call() {
        let factory = FnFactory::new(foo);
        let value = call::<Value>("foo", &factory, Args::new().kwarg("a", 1).kwarg("b", 2)).unwrap();
        assert_eq!(value, json!({"a": 1, "b": 2}));
    }

    #[test]
    fn test_prefers_from_params() {
        let factory = ParamsFactory::new(
            |_args: Args| -> anyhow::Result<Value> { Ok(json!("direct")) },
            |_args: Args| -> anyhow::Result<Value> { Ok(json!("from_params")) },
        );
        assert_eq!(call::<Value>("builder", &factory, Args::new()).unwrap(), json!("from_params"));
    }

    #[test]
    fn test_from_params_failure_does_not_fall_through() {
        let factory = ParamsFactory::new(
            |_args: Args| -> anyhow::Result<Value> { Ok(json!("direct")) },
            |_args: Args| -> anyhow::Result<Value> { anyhow::bail!("invalid sub-config") },
        );

        let err = call::<Value>("builder", &factory, Args::new()).unwrap_err();
        assert!(matches!(err, Error::Construction { .. }));
    }

    #[test]
    fn test_failure_wraps_cause_and_context() {
        let factory = FnFactory::new(foo);
        let err = call::<Value>("foo", &factory, Args::new().kwarg("c", 1)).unwrap_err();

        match &err {
            Error::Construction { factory, args, .. } => {
                assert_eq!(factory, "foo");
                assert!(args.contains(r#""c":1"#));
            }
            other => panic!("unexpected error: {:?}", other),
        }

        let cause = err.source().expect("cause should be chained");
        assert!(cause.to_string().contains("unexpected keyword argument 'c'"));
    }
}
