//! The shape catalog: a base trait, a few registered implementors, and the
//! process-wide registry serving them.
//!
//! Constructor parameters arrive as raw JSON from the manifest. A shape that
//! cannot parse its parameters falls back to its defaults with a warning
//! rather than failing the whole run.

use kiln_core::{Construct, Registered};
use log::warn;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

pub trait Shape {
    fn name(&self) -> &'static str;
    fn area(&self) -> f64;

    fn describe(&self) -> String {
        format!("{} with area {:.2}", self.name(), self.area())
    }
}

kiln_core::impl_handles!(Shape);

kiln_core::define_registry! {
    /// Process-wide catalog of shape constructors, installed from
    /// submissions at program start.
    pub mod catalog {
        handle: Box<dyn Shape>,
        args: serde_json::Value,
    }
}

fn parse_params<P: DeserializeOwned + Default>(shape: &str, params: Value) -> P {
    if params.is_null() {
        return P::default();
    }
    match serde_json::from_value(params) {
        Ok(parsed) => parsed,
        Err(err) => {
            warn!("bad parameters for `{shape}`, using defaults: {err}");
            P::default()
        }
    }
}

// --- Circle ---

#[derive(Deserialize)]
#[serde(default)]
struct CircleParams {
    radius: f64,
}

impl Default for CircleParams {
    fn default() -> Self {
        Self { radius: 1.0 }
    }
}

pub struct Circle {
    radius: f64,
}

impl Shape for Circle {
    fn name(&self) -> &'static str {
        "circle"
    }
    fn area(&self) -> f64 {
        std::f64::consts::PI * self.radius * self.radius
    }
}

impl Construct<Value> for Circle {
    fn construct(params: Value) -> Self {
        let params: CircleParams = parse_params("circle", params);
        Self {
            radius: params.radius,
        }
    }
}

kiln_core::submit_type!(catalog::Entry, Circle);

// --- Square ---

#[derive(Deserialize)]
#[serde(default)]
struct SquareParams {
    side: f64,
}

impl Default for SquareParams {
    fn default() -> Self {
        Self { side: 1.0 }
    }
}

pub struct Square {
    side: f64,
}

impl Shape for Square {
    fn name(&self) -> &'static str {
        "square"
    }
    fn area(&self) -> f64 {
        self.side * self.side
    }
}

impl Construct<Value> for Square {
    fn construct(params: Value) -> Self {
        let params: SquareParams = parse_params("square", params);
        Self { side: params.side }
    }
}

impl Registered for Square {
    type Entry = catalog::Entry;
}

kiln_core::submit_self!(Square);

// --- Triangle ---

#[derive(Deserialize)]
#[serde(default)]
struct TriangleParams {
    base: f64,
    height: f64,
}

impl Default for TriangleParams {
    fn default() -> Self {
        Self {
            base: 1.0,
            height: 1.0,
        }
    }
}

pub struct Triangle {
    base: f64,
    height: f64,
}

impl Shape for Triangle {
    fn name(&self) -> &'static str {
        "triangle"
    }
    fn area(&self) -> f64 {
        self.base * self.height / 2.0
    }
}

// Custom creator: degenerate dimensions are clamped to the unit triangle
// instead of producing a zero-area shape.
fn make_triangle(params: Value) -> Box<dyn Shape> {
    let params: TriangleParams = parse_params("triangle", params);
    if params.base <= 0.0 || params.height <= 0.0 {
        warn!("degenerate triangle dimensions, using unit triangle");
        return Box::new(Triangle {
            base: 1.0,
            height: 1.0,
        });
    }
    Box::new(Triangle {
        base: params.base,
        height: params.height,
    })
}

kiln_core::submit_creator!(catalog::Entry, "Triangle", make_triangle);
