//! Process-wide registries and link-time registration.
//!
//! The original pattern here is a table that outlives every call site,
//! populated as a side effect of program startup. [`define_registry!`]
//! declares the table (a lazily-initialized static behind an `RwLock`,
//! keyed by `String`), and the `submit_*` macros record registrations
//! through [`inventory`]. Nothing is applied until the program calls the
//! module's `install()`, so the registration pass is explicit and
//! deterministic rather than dependent on initialization order.

/// Contract implemented by every generated submission record type: the
/// argument tuple and handle type of the registry it belongs to.
///
/// Each `define_registry!` invocation generates one implementing type
/// (`Entry`). Its two constructors, `typed` and `custom`, are inherent
/// `const fn`s rather than trait methods — `inventory::submit!` evaluates
/// its expression in a static, so submissions must be const-constructible.
pub trait Submission {
    type Args;
    type Handle;
}

/// Declares which registry a type belongs to, so [`submit_self!`] can submit
/// it without naming the registry at the submission site.
pub trait Registered {
    type Entry: Submission;
}

/// Declares a process-wide registry as a module of free functions.
///
/// The generated module wraps a [`Registry`](crate::Registry) keyed by
/// `String` in a lazily-initialized `RwLock` static and re-exposes the table
/// operations, plus an `Entry` submission type and an `install()` that
/// applies every entry submitted anywhere in the binary. A poisoned lock is
/// recovered by taking the inner value; every table operation leaves the map
/// consistent.
///
/// ```ignore
/// kiln_core::define_registry! {
///     /// Catalog of shape constructors.
///     pub mod catalog {
///         handle: Box<dyn Shape>,
///         args: serde_json::Value,
///     }
/// }
///
/// fn main() {
///     catalog::install();
///     let shape = catalog::create("Circle", serde_json::json!({ "radius": 2.0 }));
/// }
/// ```
#[macro_export]
macro_rules! define_registry {
    (
        $(#[$meta:meta])*
        $vis:vis mod $name:ident {
            handle: $handle:ty,
            args: $args:ty $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis mod $name {
            // Generated surface; downstream crates rarely use all of it.
            #![allow(dead_code, unused_imports)]
            use super::*;

            /// Handle type produced by creators in this registry.
            pub type Handle = $handle;
            /// Argument tuple consumed by creators in this registry.
            pub type Args = $args;

            static TABLE: $crate::__private::Lazy<
                ::std::sync::RwLock<$crate::Registry<Handle, Args>>,
            > = $crate::__private::Lazy::new(|| {
                ::std::sync::RwLock::new($crate::Registry::new())
            });

            fn read_table(
            ) -> ::std::sync::RwLockReadGuard<'static, $crate::Registry<Handle, Args>> {
                TABLE
                    .read()
                    .unwrap_or_else(::std::sync::PoisonError::into_inner)
            }

            fn write_table(
            ) -> ::std::sync::RwLockWriteGuard<'static, $crate::Registry<Handle, Args>> {
                TABLE
                    .write()
                    .unwrap_or_else(::std::sync::PoisonError::into_inner)
            }

            /// Link-time registration record for this registry.
            pub struct Entry {
                key: &'static str,
                ctor: fn(Args) -> Handle,
            }

            impl Entry {
                fn build<C>(args: Args) -> Handle
                where
                    C: $crate::Construct<Args>,
                    Handle: $crate::HandleFrom<C>,
                {
                    <Handle as $crate::HandleFrom<C>>::handle_from(
                        <C as $crate::Construct<Args>>::construct(args),
                    )
                }

                /// Entry whose creator constructs `C` from the registry's
                /// argument tuple and wraps it in the handle type.
                pub const fn typed<C>(key: &'static str) -> Self
                where
                    C: $crate::Construct<Args> + 'static,
                    Handle: $crate::HandleFrom<C>,
                {
                    Self {
                        key,
                        ctor: Self::build::<C>,
                    }
                }

                /// Entry with a caller-supplied constructor function.
                pub const fn custom(key: &'static str, ctor: fn(Args) -> Handle) -> Self {
                    Self { key, ctor }
                }
            }

            impl $crate::Submission for Entry {
                type Args = Args;
                type Handle = Handle;
            }

            $crate::__private::inventory::collect!(Entry);

            /// Applies every [`Entry`] submitted in the binary, returning how
            /// many were installed. First registration wins; a rejected
            /// duplicate is logged at `warn` level and skipped.
            pub fn install() -> usize {
                let mut table = write_table();
                let mut applied = 0;
                for entry in $crate::__private::inventory::iter::<Entry> {
                    let ctor = entry.ctor;
                    if table.register(entry.key, move |args| ctor(args)) {
                        applied += 1;
                    } else {
                        $crate::__private::log::warn!(
                            "duplicate registration for key `{}` ignored",
                            entry.key
                        );
                    }
                }
                applied
            }

            pub fn register<F>(key: impl ::std::convert::Into<::std::string::String>, creator: F) -> bool
            where
                F: Fn(Args) -> Handle + Send + Sync + 'static,
            {
                write_table().register(key, creator)
            }

            pub fn register_type<C>(key: impl ::std::convert::Into<::std::string::String>) -> bool
            where
                C: $crate::Construct<Args> + 'static,
                Handle: $crate::HandleFrom<C>,
            {
                write_table().register_type::<C>(key)
            }

            pub fn create(key: &str, args: Args) -> ::std::option::Option<Handle> {
                read_table().create(key, args)
            }

            pub fn try_create(
                key: &str,
                args: Args,
            ) -> ::std::result::Result<Handle, $crate::RegistryError> {
                read_table().try_create(key, args)
            }

            pub fn unregister(key: &str) -> bool {
                write_table().unregister(key)
            }

            pub fn contains(key: &str) -> bool {
                read_table().contains(key)
            }

            pub fn keys() -> ::std::vec::Vec<::std::string::String> {
                read_table().keys().cloned().collect()
            }

            pub fn len() -> usize {
                read_table().len()
            }

            pub fn is_empty() -> bool {
                read_table().is_empty()
            }

            /// Clears the table. Mainly for isolating tests; submissions can
            /// be re-applied with `install()`.
            pub fn reset() {
                write_table().clear();
            }
        }
    };
}

/// Submits a concrete type to a registry, keyed by its literal type name
/// (or by an explicit third argument).
///
/// ```ignore
/// kiln_core::submit_type!(catalog::Entry, Circle);
/// kiln_core::submit_type!(catalog::Entry, Circle, "circle");
/// ```
#[macro_export]
macro_rules! submit_type {
    ($entry:ty, $derived:ty) => {
        $crate::__private::inventory::submit! {
            <$entry>::typed::<$derived>(::core::stringify!($derived))
        }
    };
    ($entry:ty, $derived:ty, $key:expr) => {
        $crate::__private::inventory::submit! {
            <$entry>::typed::<$derived>($key)
        }
    };
}

/// Submits a concrete type to the registry it declared through
/// [`Registered`], keyed by its literal type name.
#[macro_export]
macro_rules! submit_self {
    ($derived:ty) => {
        $crate::__private::inventory::submit! {
            <<$derived as $crate::Registered>::Entry>::typed::<$derived>(
                ::core::stringify!($derived),
            )
        }
    };
}

/// Submits a caller-supplied constructor function under an explicit key.
///
/// ```ignore
/// fn make_unit_circle(_: serde_json::Value) -> Box<dyn Shape> {
///     Box::new(Circle { radius: 1.0 })
/// }
/// kiln_core::submit_creator!(catalog::Entry, "UnitCircle", make_unit_circle);
/// ```
#[macro_export]
macro_rules! submit_creator {
    ($entry:ty, $key:expr, $ctor:expr) => {
        $crate::__private::inventory::submit! {
            <$entry>::custom($key, $ctor)
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::{Construct, Registered};

    pub trait Greeter {
        fn greet(&self) -> &'static str;
    }
    crate::impl_handles!(Greeter);

    struct English;
    impl Greeter for English {
        fn greet(&self) -> &'static str {
            "hello"
        }
    }
    impl Construct<()> for English {
        fn construct(_: ()) -> Self {
            English
        }
    }

    struct French;
    impl Greeter for French {
        fn greet(&self) -> &'static str {
            "bonjour"
        }
    }
    impl Construct<()> for French {
        fn construct(_: ()) -> Self {
            French
        }
    }

    struct Spanish;
    impl Greeter for Spanish {
        fn greet(&self) -> &'static str {
            "hola"
        }
    }

    fn make_spanish(_: ()) -> Box<dyn Greeter> {
        Box::new(Spanish)
    }

    // Exercised by `install_applies_submissions` only; tests run in parallel,
    // so each test owns its registry module outright.
    crate::define_registry! {
        mod greeters {
            handle: Box<dyn Greeter>,
            args: (),
        }
    }

    crate::submit_type!(greeters::Entry, English);
    crate::submit_type!(greeters::Entry, French, "Gaulish");
    crate::submit_creator!(greeters::Entry, "Spanish", make_spanish);
    // Duplicate of the first submission; install must keep the original.
    crate::submit_type!(greeters::Entry, English);

    #[test]
    fn install_applies_submissions() {
        let applied = greeters::install();
        assert_eq!(applied, 3);
        assert_eq!(greeters::len(), 3);
        assert_eq!(greeters::create("English", ()).unwrap().greet(), "hello");
        assert_eq!(greeters::create("Gaulish", ()).unwrap().greet(), "bonjour");
        assert_eq!(
            greeters::try_create("Spanish", ()).unwrap().greet(),
            "hola"
        );
        assert!(greeters::create("German", ()).is_none());

        // A second pass finds every key taken and applies nothing.
        assert_eq!(greeters::install(), 0);
    }

    crate::define_registry! {
        mod farewells {
            handle: Box<dyn Greeter>,
            args: (),
        }
    }

    #[test]
    fn imperative_global_registration() {
        assert!(farewells::register("Goodbye", |()| {
            Box::new(English) as Box<dyn Greeter>
        }));
        assert!(!farewells::register("Goodbye", |()| {
            Box::new(French) as Box<dyn Greeter>
        }));
        assert!(farewells::register_type::<French>("Adieu"));
        assert!(farewells::contains("Adieu"));

        let mut keys = farewells::keys();
        keys.sort();
        assert_eq!(keys, vec!["Adieu".to_string(), "Goodbye".to_string()]);

        assert!(farewells::unregister("Goodbye"));
        assert!(!farewells::unregister("Goodbye"));

        farewells::reset();
        assert!(farewells::is_empty());
    }

    crate::define_registry! {
        mod partings {
            handle: Box<dyn Greeter>,
            args: (),
        }
    }

    struct Morning;
    impl Greeter for Morning {
        fn greet(&self) -> &'static str {
            "good morning"
        }
    }
    impl Construct<()> for Morning {
        fn construct(_: ()) -> Self {
            Morning
        }
    }
    impl Registered for Morning {
        type Entry = partings::Entry;
    }
    crate::submit_self!(Morning);

    #[test]
    fn submit_self_uses_declared_registry() {
        partings::install();
        assert_eq!(
            partings::create("Morning", ()).unwrap().greet(),
            "good morning"
        );
    }
}
