//! Registration-based object factories.
//!
//! A [`Registry`] maps identifiers to constructors for implementors of a
//! common base trait, so callers can instantiate a concrete type by name
//! without depending on its declaration:
//!
//! ```
//! use kiln_core::{BoxRegistry, Construct};
//!
//! trait Shape {
//!     fn area(&self) -> f64;
//! }
//! kiln_core::impl_handles!(Shape);
//!
//! struct Circle {
//!     radius: f64,
//! }
//! impl Shape for Circle {
//!     fn area(&self) -> f64 {
//!         std::f64::consts::PI * self.radius * self.radius
//!     }
//! }
//! impl Construct<(f64,)> for Circle {
//!     fn construct((radius,): (f64,)) -> Self {
//!         Circle { radius }
//!     }
//! }
//!
//! let mut shapes: BoxRegistry<dyn Shape, (f64,)> = BoxRegistry::new();
//! assert!(shapes.register_type::<Circle>("Circle"));
//!
//! let circle = shapes.create("Circle", (2.0,)).expect("registered above");
//! assert!((circle.area() - 12.566).abs() < 0.01);
//! assert!(shapes.create("Square", (2.0,)).is_none());
//! ```
//!
//! The registry is parameterized by handle type (ownership wrapper + base
//! trait), argument tuple, and key type; registries with different
//! parameters are distinct types and share nothing. With the default
//! `global` feature, `define_registry!` declares process-wide registries
//! populated by an explicit `install()` pass over link-time submissions.

mod creator;
mod error;
#[cfg(feature = "global")]
mod global;
mod registry;

pub use creator::{Construct, Creator, HandleFrom};
pub use error::RegistryError;
#[cfg(feature = "global")]
pub use global::{Registered, Submission};
pub use registry::{ArcRegistry, BoxRegistry, Registry};

// Macro support; not part of the public API.
#[cfg(feature = "global")]
#[doc(hidden)]
pub mod __private {
    pub use inventory;
    pub use log;
    pub use once_cell::sync::Lazy;
}
