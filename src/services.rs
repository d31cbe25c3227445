//! Typed service registry with per-call, per-request and singleton lifetimes.
//!
//! Services are registered against a [`Capability`]: a zero-sized tag type
//! that names an abstract capability and fixes the type handed out for it,
//! usually a trait object. Lookups are keyed by the tag type, so a handler
//! asks for `req.resolve::<Greeting>()` and receives `Arc<dyn GreetingService>`
//! with no string keys and no downcasting at the call site.
//!
//! ```rust
//! use std::sync::Arc;
//! use weir::services::{Capability, ServiceCollection};
//!
//! trait Clock: Send + Sync {
//!     fn now(&self) -> u64;
//! }
//!
//! struct Fixed;
//! impl Clock for Fixed {
//!     fn now(&self) -> u64 { 42 }
//! }
//!
//! struct SystemClock;
//! impl Capability for SystemClock {
//!     type Service = dyn Clock;
//!     const NAME: &'static str = "clock";
//! }
//!
//! let provider = ServiceCollection::new()
//!     .singleton::<SystemClock, _>(|_| Ok(Arc::new(Fixed)))
//!     .build();
//!
//! let scope = provider.create_scope();
//! assert_eq!(scope.resolve::<SystemClock>().unwrap().now(), 42);
//! ```
//!
//! # Lifetimes
//!
//! | Lifetime | Instance reuse |
//! |---|---|
//! | [`Lifetime::Transient`] | none, the factory runs on every resolution |
//! | [`Lifetime::Scoped`] | one instance per [`Scope`] (one scope per request) |
//! | [`Lifetime::Singleton`] | one instance per [`ServiceProvider`], created lazily |

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::error::Error;

/// A typed tag naming an abstract capability.
pub trait Capability: 'static {
    /// What resolving this capability hands out, behind an `Arc`.
    type Service: ?Sized + Send + Sync + 'static;

    /// Human-readable name used in errors and logs.
    const NAME: &'static str;
}

/// How long a resolved instance is reused.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Lifetime {
    /// A fresh instance on every resolution.
    Transient,
    /// One instance per request scope.
    Scoped,
    /// One instance for the whole provider, created on first use.
    Singleton,
}

// `Arc<C::Service>` boxed behind `Any` so every capability shares one map.
type Instance = Arc<dyn Any + Send + Sync>;
type Factory = Box<dyn Fn(&Scope) -> Result<Instance, Error> + Send + Sync>;

struct Registration {
    name: &'static str,
    lifetime: Lifetime,
    factory: Factory,
    // Held for the whole factory call so two first resolutions cannot both build.
    singleton: Mutex<Option<Instance>>,
}

// ── ServiceCollection ────────────────────────────────────────────────────────

/// Mutable set of registrations, frozen into a [`ServiceProvider`] by
/// [`build`](ServiceCollection::build).
#[derive(Default)]
pub struct ServiceCollection {
    registrations: HashMap<TypeId, Registration>,
}

impl ServiceCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `factory` for capability `C`. A second registration for the
    /// same capability replaces the first.
    ///
    /// The factory receives the resolving [`Scope`] so it can pull in its
    /// own dependencies.
    pub fn register<C, F>(mut self, lifetime: Lifetime, factory: F) -> Self
    where
        C: Capability,
        F: Fn(&Scope) -> Result<Arc<C::Service>, Error> + Send + Sync + 'static,
    {
        let factory: Factory = Box::new(move |scope| {
            let service = factory(scope)?;
            Ok(Arc::new(service) as Instance)
        });
        let previous = self.registrations.insert(
            TypeId::of::<C>(),
            Registration { name: C::NAME, lifetime, factory, singleton: Mutex::new(None) },
        );
        if previous.is_some() {
            debug!(capability = C::NAME, ?lifetime, "replacing service registration");
        } else {
            debug!(capability = C::NAME, ?lifetime, "service registered");
        }
        self
    }

    pub fn transient<C, F>(self, factory: F) -> Self
    where
        C: Capability,
        F: Fn(&Scope) -> Result<Arc<C::Service>, Error> + Send + Sync + 'static,
    {
        self.register::<C, F>(Lifetime::Transient, factory)
    }

    pub fn scoped<C, F>(self, factory: F) -> Self
    where
        C: Capability,
        F: Fn(&Scope) -> Result<Arc<C::Service>, Error> + Send + Sync + 'static,
    {
        self.register::<C, F>(Lifetime::Scoped, factory)
    }

    pub fn singleton<C, F>(self, factory: F) -> Self
    where
        C: Capability,
        F: Fn(&Scope) -> Result<Arc<C::Service>, Error> + Send + Sync + 'static,
    {
        self.register::<C, F>(Lifetime::Singleton, factory)
    }

    /// Freezes the registrations. No further changes are possible.
    pub fn build(self) -> ServiceProvider {
        ServiceProvider { registrations: Arc::new(self.registrations) }
    }
}

// ── ServiceProvider ──────────────────────────────────────────────────────────

/// Immutable registry shared by every request. Cloning is one atomic increment.
#[derive(Clone, Default)]
pub struct ServiceProvider {
    registrations: Arc<HashMap<TypeId, Registration>>,
}

impl ServiceProvider {
    /// Opens a new request scope. Scoped instances live as long as it does.
    pub fn create_scope(&self) -> Scope {
        Scope { provider: self.clone(), scoped: Mutex::new(HashMap::new()) }
    }

    pub fn contains<C: Capability>(&self) -> bool {
        self.registrations.contains_key(&TypeId::of::<C>())
    }

    pub fn lifetime_of<C: Capability>(&self) -> Option<Lifetime> {
        self.registrations.get(&TypeId::of::<C>()).map(|r| r.lifetime)
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }
}

impl fmt::Debug for ServiceProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.registrations.values().map(|r| (r.name, r.lifetime)))
            .finish()
    }
}

// ── Scope ────────────────────────────────────────────────────────────────────

/// A resolution scope, one per request.
pub struct Scope {
    provider: ServiceProvider,
    scoped: Mutex<HashMap<TypeId, Instance>>,
}

impl Scope {
    /// Resolves capability `C` according to its registered lifetime.
    ///
    /// # Errors
    ///
    /// [`Error::MissingService`] if nothing is registered for `C`, or whatever
    /// the factory returns.
    pub fn resolve<C: Capability>(&self) -> Result<Arc<C::Service>, Error> {
        let key = TypeId::of::<C>();
        let registration = self
            .provider
            .registrations
            .get(&key)
            .ok_or(Error::MissingService(C::NAME))?;

        let instance = match registration.lifetime {
            Lifetime::Transient => (registration.factory)(self)?,
            Lifetime::Singleton => {
                let mut slot = lock(&registration.singleton);
                match slot.as_ref() {
                    Some(instance) => Arc::clone(instance),
                    None => {
                        let instance = (registration.factory)(self)?;
                        *slot = Some(Arc::clone(&instance));
                        instance
                    }
                }
            }
            Lifetime::Scoped => {
                let cached = lock(&self.scoped).get(&key).cloned();
                match cached {
                    Some(instance) => instance,
                    None => {
                        // The cache is not held across the factory call, so
                        // scoped factories may resolve other scoped services.
                        let created = (registration.factory)(self)?;
                        Arc::clone(lock(&self.scoped).entry(key).or_insert(created))
                    }
                }
            }
        };

        instance
            .downcast_ref::<Arc<C::Service>>()
            .cloned()
            .ok_or(Error::MissingService(C::NAME))
    }

    pub fn provider(&self) -> &ServiceProvider {
        &self.provider
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("provider", &self.provider)
            .field("scoped", &lock(&self.scoped).len())
            .finish()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    trait Counter: std::fmt::Debug + Send + Sync {
        fn id(&self) -> usize;
    }

    #[derive(Debug)]
    struct Numbered(usize);

    impl Counter for Numbered {
        fn id(&self) -> usize { self.0 }
    }

    struct Tag;
    impl Capability for Tag {
        type Service = dyn Counter;
        const NAME: &'static str = "counter";
    }

    struct Other;
    impl Capability for Other {
        type Service = String;
        const NAME: &'static str = "other";
    }

    fn provider(lifetime: Lifetime) -> (ServiceProvider, Arc<AtomicUsize>) {
        let built = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&built);
        let provider = ServiceCollection::new()
            .register::<Tag, _>(lifetime, move |_| {
                Ok(Arc::new(Numbered(counter.fetch_add(1, Ordering::SeqCst))))
            })
            .build();
        (provider, built)
    }

    #[test]
    fn transient_builds_every_time() {
        let (provider, built) = provider(Lifetime::Transient);
        let scope = provider.create_scope();
        let a = scope.resolve::<Tag>().unwrap();
        let b = scope.resolve::<Tag>().unwrap();
        assert_ne!(a.id(), b.id());
        assert_eq!(built.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn scoped_is_shared_within_a_scope_only() {
        let (provider, built) = provider(Lifetime::Scoped);
        let first = provider.create_scope();
        let a = first.resolve::<Tag>().unwrap();
        let b = first.resolve::<Tag>().unwrap();
        assert!(Arc::ptr_eq(&a, &b));

        let second = provider.create_scope();
        let c = second.resolve::<Tag>().unwrap();
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(built.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn singleton_is_lazy_and_shared_across_scopes() {
        let (provider, built) = provider(Lifetime::Singleton);
        assert_eq!(built.load(Ordering::SeqCst), 0);

        let a = provider.create_scope().resolve::<Tag>().unwrap();
        let b = provider.create_scope().resolve::<Tag>().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(built.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn singleton_is_built_once_under_contention() {
        let (provider, built) = provider(Lifetime::Singleton);
        std::thread::scope(|s| {
            for _ in 0..8 {
                let provider = provider.clone();
                s.spawn(move || provider.create_scope().resolve::<Tag>().unwrap());
            }
        });
        assert_eq!(built.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn missing_capability_is_an_error() {
        let provider = ServiceCollection::new().build();
        let err = provider.create_scope().resolve::<Tag>().unwrap_err();
        assert!(matches!(err, Error::MissingService("counter")));
    }

    #[test]
    fn last_registration_wins() {
        let provider = ServiceCollection::new()
            .transient::<Tag, _>(|_| Ok(Arc::new(Numbered(1))))
            .singleton::<Tag, _>(|_| Ok(Arc::new(Numbered(2))))
            .build();
        assert_eq!(provider.len(), 1);
        assert_eq!(provider.lifetime_of::<Tag>(), Some(Lifetime::Singleton));
        assert_eq!(provider.create_scope().resolve::<Tag>().unwrap().id(), 2);
    }

    #[test]
    fn factories_resolve_their_dependencies() {
        let provider = ServiceCollection::new()
            .singleton::<Other, _>(|_| Ok(Arc::new("base".to_owned())))
            .scoped::<Tag, _>(|scope| {
                let base = scope.resolve::<Other>()?;
                Ok(Arc::new(Numbered(base.len())))
            })
            .build();
        assert_eq!(provider.create_scope().resolve::<Tag>().unwrap().id(), 4);
    }

    #[test]
    fn factory_errors_propagate() {
        let provider = ServiceCollection::new()
            .scoped::<Tag, _>(|scope| {
                scope.resolve::<Other>()?;
                Ok(Arc::new(Numbered(0)))
            })
            .build();
        let err = provider.create_scope().resolve::<Tag>().unwrap_err();
        assert!(matches!(err, Error::MissingService("other")));
    }
}
