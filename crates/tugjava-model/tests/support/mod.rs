//! Shared test support for the model integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Once};

use tugjava_model::{JavaEnvironment, SourceSet};

pub const WIDGET: &str = include_str!("../fixtures/Widget.java");
pub const SHAPE: &str = include_str!("../fixtures/shapes/Shape.java");
pub const ABSTRACT_SHAPE: &str = include_str!("../fixtures/shapes/AbstractShape.java");
pub const CIRCLE: &str = include_str!("../fixtures/shapes/Circle.java");

pub const WIDGET_PATH: &str = "com/acme/widgets/Widget.java";
pub const CIRCLE_PATH: &str = "shapes/Circle.java";

static TRACING: Once = Once::new();

/// Install a test subscriber honoring `RUST_LOG`. Safe to call repeatedly.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Environment over the widget fixture.
pub fn widget_env() -> (Arc<SourceSet>, JavaEnvironment) {
    init_tracing();
    let set = SourceSet::with_sources([(WIDGET_PATH, WIDGET)]);
    let env = JavaEnvironment::new(set.clone()).expect("widget fixture loads");
    (set, env)
}

/// Environment over the shapes hierarchy.
pub fn shapes_env() -> (Arc<SourceSet>, JavaEnvironment) {
    init_tracing();
    let set = SourceSet::with_sources([
        ("shapes/Shape.java", SHAPE),
        ("shapes/AbstractShape.java", ABSTRACT_SHAPE),
        (CIRCLE_PATH, CIRCLE),
    ]);
    let env = JavaEnvironment::new(set.clone()).expect("shapes fixture loads");
    (set, env)
}
