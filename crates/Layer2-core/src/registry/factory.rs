//! Factory Reference - 레지스트리에 등록되는 생성 단위
//!
//! 레지스트리는 팩토리의 이름(identity)과 호출 방식만 알고 있습니다.
//! 호출 방식은 두 가지입니다:
//!
//! - **Direct**: 인자를 받아 바로 생성하는 일반 생성자
//! - **FromParams**: 파라미터를 검증/변환한 뒤 생성하는 별도 진입점을 가진 builder
//!
//! 어느 쪽인지는 `Factory::params_builder()` capability 조회로 한 번 결정됩니다.

use super::args::Args;
use super::naming::derive_identity;
use serde::{Deserialize, Serialize};
use std::any::type_name;
use std::marker::PhantomData;
use std::sync::Arc;

/// 공유 팩토리 참조
pub type FactoryRef<T> = Arc<dyn Factory<T>>;

// ============================================================================
// Construction - 생성 방식
// ============================================================================

/// 팩토리 생성 방식
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Construction {
    /// 직접 호출
    Direct,
    /// 파라미터 기반 builder 진입점
    FromParams,
}

impl std::fmt::Display for Construction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Direct => write!(f, "direct"),
            Self::FromParams => write!(f, "from_params"),
        }
    }
}

// ============================================================================
// Factory / FromParams traits
// ============================================================================

/// 레지스트리에 등록 가능한 팩토리
pub trait Factory<T>: Send + Sync {
    /// 팩토리 자체에서 유도되는 이름 (없으면 등록 시 명시적 이름 필요)
    fn identity(&self) -> Option<String>;

    /// 직접 호출
    fn call(&self, args: Args) -> anyhow::Result<T>;

    /// 파라미터 기반 생성 진입점 (capability 조회)
    fn params_builder(&self) -> Option<&dyn FromParams<T>> {
        None
    }

    /// 생성 방식
    fn construction(&self) -> Construction {
        if self.params_builder().is_some() {
            Construction::FromParams
        } else {
            Construction::Direct
        }
    }
}

impl<T> std::fmt::Debug for dyn Factory<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Factory")
            .field("identity", &self.identity())
            .field("construction", &self.construction())
            .finish()
    }
}

/// 파라미터 기반 생성 진입점
pub trait FromParams<T>: Send + Sync {
    fn create_from_params(&self, args: Args) -> anyhow::Result<T>;
}

// ============================================================================
// FnFactory - 함수 / closure 팩토리
// ============================================================================

/// 함수 또는 closure를 감싼 Direct 팩토리
///
/// identity는 함수 타입 경로에서 유도됩니다. `fn foo`는 `foo`가 되고,
/// closure는 익명 표식이 되어 명시적 이름 없이는 등록할 수 없습니다.
pub struct FnFactory<F> {
    func: F,
    identity: Option<String>,
}

impl<F> FnFactory<F> {
    pub fn new(func: F) -> Self {
        Self {
            identity: derive_identity(type_name::<F>()),
            func,
        }
    }

    /// identity가 없는 팩토리
    pub fn unnamed(func: F) -> Self {
        Self {
            func,
            identity: None,
        }
    }

    /// identity 직접 지정
    pub fn named(mut self, identity: impl Into<String>) -> Self {
        self.identity = Some(identity.into());
        self
    }
}

impl<T, F> Factory<T> for FnFactory<F>
where
    F: Fn(Args) -> anyhow::Result<T> + Send + Sync,
{
    fn identity(&self) -> Option<String> {
        self.identity.clone()
    }

    fn call(&self, args: Args) -> anyhow::Result<T> {
        (self.func)(args)
    }
}

// ============================================================================
// ParamsFactory - builder 팩토리
// ============================================================================

/// 일반 생성자와 별도의 파라미터 기반 진입점을 함께 가진 팩토리
///
/// Instantiator는 항상 `create_from_params` 쪽을 사용합니다.
pub struct ParamsFactory<C, P> {
    construct: C,
    from_params: P,
    identity: Option<String>,
}

impl<C, P> ParamsFactory<C, P> {
    /// identity는 `construct` 함수 타입에서 유도
    pub fn new(construct: C, from_params: P) -> Self {
        Self {
            identity: derive_identity(type_name::<C>()),
            construct,
            from_params,
        }
    }

    pub fn named(mut self, identity: impl Into<String>) -> Self {
        self.identity = Some(identity.into());
        self
    }
}

impl<T, C, P> Factory<T> for ParamsFactory<C, P>
where
    C: Fn(Args) -> anyhow::Result<T> + Send + Sync,
    P: Fn(Args) -> anyhow::Result<T> + Send + Sync,
{
    fn identity(&self) -> Option<String> {
        self.identity.clone()
    }

    fn call(&self, args: Args) -> anyhow::Result<T> {
        (self.construct)(args)
    }

    fn params_builder(&self) -> Option<&dyn FromParams<T>> {
        Some(self)
    }
}

impl<T, C, P> FromParams<T> for ParamsFactory<C, P>
where
    C: Send + Sync,
    P: Fn(Args) -> anyhow::Result<T> + Send + Sync,
{
    fn create_from_params(&self, args: Args) -> anyhow::Result<T> {
        (self.from_params)(args)
    }
}

// ============================================================================
// TypeFactory - 구체 타입 팩토리
// ============================================================================

/// 인자로부터 자신을 생성할 수 있는 구체 타입
pub trait Component: Sized + 'static {
    fn construct(args: Args) -> anyhow::Result<Self>;
}

/// 별도의 파라미터 기반 생성자를 가진 구체 타입
pub trait ParamsComponent: Component {
    fn create_from_params(args: Args) -> anyhow::Result<Self>;
}

/// 구체 타입 `C`를 레지스트리 제품 타입 `T`로 생성하는 팩토리
///
/// identity는 타입 이름(`SimpleNet`)에서 유도됩니다.
///
/// ```ignore
/// let models: Registry<Box<dyn Model>> = Registry::for_domain(&domain::MODEL);
/// models.register(TypeFactory::new(|net: SimpleNet| Box::new(net) as Box<dyn Model>))?;
/// ```
pub struct TypeFactory<C, T> {
    convert: fn(C) -> T,
    from_params: Option<fn(Args) -> anyhow::Result<C>>,
    _marker: PhantomData<fn() -> C>,
}

impl<C: Component, T> TypeFactory<C, T> {
    /// Direct 생성 (`Component::construct`)
    pub fn new(convert: fn(C) -> T) -> Self {
        Self {
            convert,
            from_params: None,
            _marker: PhantomData,
        }
    }
}

impl<C: ParamsComponent, T> TypeFactory<C, T> {
    /// FromParams 생성 (`ParamsComponent::create_from_params`)
    pub fn with_params(convert: fn(C) -> T) -> Self {
        Self {
            convert,
            from_params: Some(C::create_from_params),
            _marker: PhantomData,
        }
    }
}

impl<C: Component, T> Factory<T> for TypeFactory<C, T> {
    fn identity(&self) -> Option<String> {
        derive_identity(type_name::<C>())
    }

    fn call(&self, args: Args) -> anyhow::Result<T> {
        C::construct(args).map(self.convert)
    }

    fn params_builder(&self) -> Option<&dyn FromParams<T>> {
        if self.from_params.is_some() {
            Some(self)
        } else {
            None
        }
    }
}

impl<C: Component, T> FromParams<T> for TypeFactory<C, T> {
    fn create_from_params(&self, args: Args) -> anyhow::Result<T> {
        match self.from_params {
            Some(from_params) => from_params(args).map(self.convert),
            None => C::construct(args).map(self.convert),
        }
    }
}
