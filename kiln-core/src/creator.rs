use std::rc::Rc;
use std::sync::Arc;

/// A stored constructor: given the registry's fixed argument tuple, produces
/// a new owned instance behind the registry's handle type.
pub type Creator<H, A = ()> = Box<dyn Fn(A) -> H + Send + Sync>;

/// How a concrete type is built from a registry's argument tuple.
///
/// A type may implement `Construct` for several argument tuples; each
/// implementation makes it registrable in registries with that signature.
pub trait Construct<A = ()>: Sized {
    fn construct(args: A) -> Self;
}

/// Ownership policy: how a freshly constructed concrete value is wrapped and
/// upcast into a registry's handle type.
///
/// [`impl_handles!`](crate::impl_handles) generates the `Box<dyn Base>` impl
/// for a base trait; the `Arc` and `Rc` impls below bridge from the boxed
/// form, so one invocation per base trait covers all three handle types.
pub trait HandleFrom<C>: Sized {
    fn handle_from(concrete: C) -> Self;
}

// Shared handles take over the freshly boxed allocation via std's
// `From<Box<T>>` impls. Coherence allows downstream crates to implement
// `HandleFrom` only for `Box<dyn Base>` (`Box` is fundamental, `Arc`/`Rc`
// are not), so the shared forms must live here as blankets.
impl<C, B: ?Sized> HandleFrom<C> for Arc<B>
where
    Box<B>: HandleFrom<C>,
{
    fn handle_from(concrete: C) -> Self {
        Arc::from(<Box<B> as HandleFrom<C>>::handle_from(concrete))
    }
}

impl<C, B: ?Sized> HandleFrom<C> for Rc<B>
where
    Box<B>: HandleFrom<C>,
{
    fn handle_from(concrete: C) -> Self {
        Rc::from(<Box<B> as HandleFrom<C>>::handle_from(concrete))
    }
}

/// Generates the [`HandleFrom`] impl that lets implementors of a base trait
/// be wrapped as `Box<dyn Base>` (exclusive ownership). `Arc<dyn Base>` and
/// `Rc<dyn Base>` (shared ownership) follow automatically through the boxed
/// form.
///
/// Invoke once per base trait, in the crate that defines it:
///
/// ```ignore
/// trait Shape { fn area(&self) -> f64; }
/// kiln_core::impl_handles!(Shape);
/// ```
#[macro_export]
macro_rules! impl_handles {
    ($base:path) => {
        impl<C> $crate::HandleFrom<C> for ::std::boxed::Box<dyn $base>
        where
            C: $base + 'static,
        {
            fn handle_from(concrete: C) -> Self {
                ::std::boxed::Box::new(concrete)
            }
        }
    };
}
