//! # Factory Registry
//!
//! 이름으로 팩토리를 등록하고, 설정 트리에서 이름을 읽어 인스턴스를
//! 생성하는 레지스트리 시스템
//!
//! ## 설계 원칙
//!
//! 1. **명시적 소유**: 도메인마다 `Registry<T>`를 직접 생성해서 들고 다님 (전역 없음)
//! 2. **덮어쓰기 금지**: 같은 이름의 재등록은 `DuplicateName` 에러
//! 3. **지연 등록**: 서로 참조하는 도메인은 `defer`로 등록하고 첫 조회 때 실행
//! 4. **Capability 기반 생성**: `FromParams`를 노출하는 팩토리는 그 진입점으로 생성
//!
//! ## 아키텍처
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       Registry<T>                            │
//! │  ┌─────────────────────────────────────────────────────────┐│
//! │  │  RwLock<HashMap<String, RegistryEntry<T>>>              ││
//! │  │  ┌──────────┬──────────┬──────────┬──────────┐         ││
//! │  │  │ foo      │ SimpleNet│ adam     │ ...      │         ││
//! │  │  │ (direct) │ (params) │ (batch)  │          │         ││
//! │  │  └──────────┴──────────┴──────────┴──────────┘         ││
//! │  └─────────────────────────────────────────────────────────┘│
//! │                          ▲                                   │
//! │  ┌───────────────────────┴───────────────────────────────┐  │
//! │  │  DeferredQueue (첫 조회 시 한 번 flush)                │  │
//! │  └───────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//!            │ resolve                     │ build_from_config
//!            ▼                             ▼
//!      Instantiator ◀──────────── Config-Driven Builder
//! ```
//!
//! ## 사용 예시
//!
//! ```ignore
//! use catalog_core::registry::{Args, BuildRequest, Registry};
//!
//! let models: Registry<Box<dyn Model>> = Registry::for_domain(&domain::MODEL);
//! models.register(TypeFactory::with_params(|net: SimpleNet| Box::new(net) as Box<dyn Model>))?;
//!
//! // { "model": "SimpleNet", "hidden": 64 }
//! let model = models.get_from_config(&config, None)?;
//!
//! // 생성은 나중에
//! let partial = models.partial_from_config(&config, None, Args::new())?;
//! let model = partial.build_with(Args::new().kwarg("hidden", 128))?;
//! ```

mod args;
mod builder;
mod collection;
mod deferred;
mod entry;
mod factory;
mod instantiate;
mod naming;
#[allow(clippy::module_inception)]
mod registry;

pub use args::{Args, ArgsError};
pub use builder::{BuildRequest, Built, Partial};
pub use collection::FactoryCollection;
pub use deferred::DeferredFn;
pub use entry::{EntryMetadata, RegistrationOrigin, RegistryEntry};
pub use factory::{
    Component, Construction, Factory, FactoryRef, FnFactory, FromParams, ParamsComponent,
    ParamsFactory, TypeFactory,
};
pub use instantiate::call;
pub use naming::{is_anonymous, resolve_name, short_type_name, ANONYMOUS_MARKER};
pub use registry::{FactoryBatch, Registry, RegistryStats};
