//! Shared test support for the generator integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Once};

use tugjava_model::{CompilationUnit, JavaEnvironment, SourceSet};

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

/// Environment over `sources`.
pub fn env_with(sources: &[(&str, &str)]) -> (Arc<SourceSet>, JavaEnvironment) {
    init_tracing();
    let set = SourceSet::with_sources(sources.iter().copied());
    let env = JavaEnvironment::new(set.clone()).expect("fixture loads");
    (set, env)
}

/// Environment over the widget fixture and its unit.
pub fn widget_unit() -> (JavaEnvironment, CompilationUnit) {
    let (_set, env) = env_with(&[(WIDGET_PATH, WIDGET)]);
    let unit = env.compilation_unit(WIDGET_PATH).expect("widget unit");
    (env, unit)
}

/// Environment over the shapes hierarchy and the circle unit.
pub fn circle_unit() -> (JavaEnvironment, CompilationUnit) {
    let (_set, env) = env_with(&[
        ("shapes/Shape.java", SHAPE),
        ("shapes/AbstractShape.java", ABSTRACT_SHAPE),
        (CIRCLE_PATH, CIRCLE),
    ]);
    let unit = env.compilation_unit(CIRCLE_PATH).expect("circle unit");
    (env, unit)
}

/// Remove all whitespace, for layout-insensitive comparisons.
pub fn squash(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}
