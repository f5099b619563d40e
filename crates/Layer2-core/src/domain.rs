//! Domain - 잘 알려진 레지스트리 도메인
//!
//! 각 도메인은 레지스트리 이름과, 설정 트리에서 팩토리 이름을 담는 기본 키를
//! 가집니다. 기본 키가 없는 도메인은 `build_from_config`에 키를 직접 넘겨야
//! 합니다.

use serde::Serialize;

/// 레지스트리 도메인 descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Domain {
    /// 레지스트리 이름
    pub label: &'static str,
    /// config에서 팩토리 이름을 담는 기본 키
    pub default_key: Option<&'static str>,
}

impl Domain {
    pub const fn new(label: &'static str, default_key: Option<&'static str>) -> Self {
        Self { label, default_key }
    }
}

pub const MODEL: Domain = Domain::new("model", Some("model"));
pub const MODULE: Domain = Domain::new("module", Some("module"));
pub const CRITERION: Domain = Domain::new("criterion", Some("criterion"));
pub const OPTIMIZER: Domain = Domain::new("optimizer", Some("optimizer"));
pub const SCHEDULER: Domain = Domain::new("scheduler", Some("scheduler"));
pub const CALLBACK: Domain = Domain::new("callback", Some("callback"));
/// gradient clipping 함수
pub const GRAD_CLIPPER: Domain = Domain::new("grad_clipper", Some("func"));
pub const AGENT: Domain = Domain::new("agent", Some("agent"));
pub const ALGORITHM: Domain = Domain::new("algorithm", None);
pub const ENVIRONMENT: Domain = Domain::new("environment", None);

/// 모든 도메인
pub const ALL: &[Domain] = &[
    MODEL,
    MODULE,
    CRITERION,
    OPTIMIZER,
    SCHEDULER,
    CALLBACK,
    GRAD_CLIPPER,
    AGENT,
    ALGORITHM,
    ENVIRONMENT,
];

/// 이름으로 도메인 찾기
pub fn by_label(label: &str) -> Option<Domain> {
    ALL.iter().copied().find(|d| d.label == label)
}
