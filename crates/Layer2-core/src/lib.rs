//! catalog-core: Factory Registry Engine
//!
//! Layer2 - 이름 기반 팩토리 레지스트리와 설정 기반 객체 조립
//!
//! # 주요 모듈
//!
//! - `registry`: Registry, Instantiator, Config-Driven Builder, 지연 등록
//! - `domain`: 잘 알려진 도메인 (model, optimizer, agent, ...)
//!
//! # 사용 예시
//!
//! ```ignore
//! use catalog_core::{domain, Args, BuildRequest, Registry};
//!
//! let runners: Registry<Runner> = Registry::new("runner");
//! let models: Registry<Model> = Registry::for_domain(&domain::MODEL);
//!
//! // 실험 config에서 runner는 나중에 생성
//! let runner = runners.partial_from_config(&config, Some("runner"), Args::new())?;
//!
//! // 하위 트리로 model을 먼저 생성
//! let model = models.get_from_config(&model_config, None)?;
//!
//! let runner = runner.build_with(Args::new().object("model", model))?;
//! ```

pub mod domain;
pub mod registry;

// Re-exports: Registry
pub use registry::{
    Args, ArgsError, BuildRequest, Built, Component, Construction, EntryMetadata, Factory,
    FactoryBatch, FactoryCollection, FactoryRef, FnFactory, FromParams, ParamsComponent,
    ParamsFactory, Partial, RegistrationOrigin, Registry, RegistryStats, TypeFactory,
};

// Re-exports: Domain
pub use domain::Domain;

// Re-exports: Foundation
pub use catalog_foundation::{ConfigLoader, ConfigNode, Error, Result};
