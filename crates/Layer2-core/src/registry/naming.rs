//! Name Resolver - 팩토리 이름 결정
//!
//! 명시적 이름이 있으면 그것을, 없으면 팩토리의 identity에서 유도한 이름을
//! 사용합니다. 익명 closure는 이름을 유도할 수 없으므로 명시적 이름이 필요합니다.

use catalog_foundation::{Error, Result};

/// 익명 callable 표식 (`std::any::type_name`이 closure에 부여하는 마지막 경로 조각)
pub const ANONYMOUS_MARKER: &str = "{{closure}}";

/// 타입 경로에서 짧은 이름 추출
///
/// `my_crate::models::SimpleNet<f32>` → `SimpleNet`,
/// `my_crate::tests::foo` → `foo`, closure → `{{closure}}`.
pub fn short_type_name(full: &str) -> String {
    // 제네릭 인자(<...>)는 중첩까지 제거
    let mut depth = 0usize;
    let mut stripped = String::with_capacity(full.len());
    for c in full.chars() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            _ if depth == 0 => stripped.push(c),
            _ => {}
        }
    }

    match stripped.rsplit("::").next() {
        Some(last) => last.to_string(),
        None => stripped,
    }
}

/// 타입 경로에서 identity 이름 유도
///
/// fn pointer, tuple 등 식별자가 아닌 타입은 `None`.
pub fn derive_identity(full: &str) -> Option<String> {
    let short = short_type_name(full);
    if is_anonymous(&short) {
        return Some(short);
    }

    let valid = !short.is_empty()
        && short.chars().all(|c| c.is_alphanumeric() || c == '_')
        && !short.starts_with(|c: char| c.is_ascii_digit());
    valid.then_some(short)
}

/// 등록에 사용할 이름 결정
///
/// - `explicit`가 주어지면 우선 사용
/// - 아니면 `derived` (팩토리 identity) 사용
/// - 둘 다 없거나, 결과가 익명 표식이면 `Error::Naming`
pub fn resolve_name(derived: Option<&str>, explicit: Option<&str>) -> Result<String> {
    let name = match explicit.filter(|n| !n.is_empty()) {
        Some(name) => name,
        None => match derived.filter(|n| !n.is_empty()) {
            Some(name) => name,
            None => {
                return Err(Error::naming(
                    "factory has no derivable name and no name was provided",
                ))
            }
        },
    };

    if is_anonymous(name) {
        return Err(Error::naming(format!(
            "name for anonymous factories must be provided (got '{}')",
            name
        )));
    }

    Ok(name.to_string())
}

/// 익명 callable 이름인지 확인
pub fn is_anonymous(name: &str) -> bool {
    name == ANONYMOUS_MARKER || name.ends_with(ANONYMOUS_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn foo() {}

    fn type_name_of<F>(_: &F) -> &'static str {
        std::any::type_name::<F>()
    }

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name("a::b::SimpleNet"), "SimpleNet");
        assert_eq!(short_type_name("a::b::Wrapper<a::c::Inner>"), "Wrapper");
        assert_eq!(short_type_name("plain"), "plain");
    }

    #[test]
    fn test_generic_closure_path() {
        assert_eq!(short_type_name("a::build<i32>::{{closure}}"), "{{closure}}");
    }

    #[test]
    fn test_fn_item_name_is_derivable() {
        let name = derive_identity(type_name_of(&foo));
        assert_eq!(name.as_deref(), Some("foo"));
    }

    #[test]
    fn test_closure_name_is_anonymous() {
        let f = |x: i32| x;
        let name = derive_identity(type_name_of(&f)).unwrap();
        assert!(is_anonymous(&name));
        assert!(resolve_name(Some(&name), None).is_err());
    }

    #[test]
    fn test_fn_pointer_has_no_identity() {
        let f: fn(i32) -> i32 = |x| x;
        assert_eq!(derive_identity(type_name_of(&f)), None);
    }

    #[test]
    fn test_explicit_name_wins() {
        assert_eq!(resolve_name(Some("foo"), Some("bar")).unwrap(), "bar");
        assert_eq!(resolve_name(Some("{{closure}}"), Some("bar")).unwrap(), "bar");
    }

    #[test]
    fn test_missing_name_fails() {
        let err = resolve_name(None, None).unwrap_err();
        assert!(err.is_registration_error());

        assert!(resolve_name(Some(""), None).is_err());
        assert!(resolve_name(None, Some("")).is_err());
    }

    #[test]
    fn test_explicit_marker_rejected() {
        assert!(resolve_name(None, Some("{{closure}}")).is_err());
    }
}
