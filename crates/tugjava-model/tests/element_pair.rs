//! Element pair tests: wrap/unwrap identity, the weak façade cache, and
//! re-resolution after reload.

mod support;


use tugjava_model::{
    unwrap, wrap, ApiElement, ElementCache, ElementKind, JavaElement, JavaEnvironment, Method,
    Modifiers, SourceSet, Type, TypeKind,
};

use support::{shapes_env, widget_env, CIRCLE, CIRCLE_PATH, WIDGET_PATH};

mod wrap_identity {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_wrap_is_idempotent_while_held() {
        let (_set, env) = shapes_env();
        let first = env.find_type("shapes.Circle").unwrap();
        let second = env.find_type("shapes.Circle").unwrap();
        assert_eq!(first, second);
        assert_eq!(wrap(first.spi()), JavaElement::Type(first.clone()));
    }

    #[test]
    fn test_unwrap_is_inverse_of_wrap() {
        let (_set, env) = widget_env();
        let unit = env.compilation_unit(WIDGET_PATH).unwrap();
        let mut stack = vec![unit.element()];
        let mut seen = 0;
        while let Some(element) = stack.pop() {
            let spi = unwrap(&element).clone();
            assert_eq!(unwrap(&wrap(&spi)), &spi);
            assert_eq!(wrap(&spi), element);
            stack.extend(element.children());
            seen += 1;
        }
        assert_eq!(seen, 25);
    }

    #[test]
    fn test_dropped_facade_is_recreated() {
        let (_set, env) = shapes_env();
        let spi = env.find_type("shapes.Circle").unwrap().spi().clone();
        // The façade above is gone; its cache entry is dead.
        assert!(env.cache().get(&spi).is_none());
        let again = Type::wrap(&spi);
        assert_eq!(again.spi(), &spi);
        assert!(env.cache().get(&spi).is_some());
    }

    #[test]
    fn test_purge_removes_dead_entries() {
        let (_set, env) = shapes_env();
        let held = env.find_type("shapes.Circle").unwrap();
        let _ = held.methods();
        assert!(env.cache().len() > 1);
        let purged = env.cache().purge();
        assert!(purged >= 1);
        assert_eq!(env.cache().len(), 1);
        assert!(env.cache().get(held.spi()).is_some());
    }

    #[test]
    fn test_internal_set_api_replaces_cached_facade() {
        let (_set, env) = shapes_env();
        let original = env.find_type("shapes.Circle").unwrap();
        let replacement = Type::from_cell(ElementCache::detached(original.spi()));
        assert_ne!(original, replacement);

        let previous = replacement.internal_set_api();
        assert_eq!(previous, Some(original.clone()));
        assert_eq!(Type::wrap(original.spi()), replacement);
    }

    #[test]
    fn test_concurrent_wraps_share_one_facade() {
        let (_set, env) = shapes_env();
        let spi = env.find_type("shapes.Circle").unwrap().spi().clone();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let spi = spi.clone();
                std::thread::spawn(move || Type::wrap(&spi))
            })
            .collect();
        let held = Type::wrap(&spi);
        for handle in handles {
            assert_eq!(handle.join().unwrap(), held);
        }
    }
}

mod navigation {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_unit_structure() {
        let (_set, env) = widget_env();
        let unit = env.compilation_unit(WIDGET_PATH).unwrap();
        assert_eq!(unit.package_name(), "com.acme.widgets");
        assert_eq!(unit.imports().len(), 6);
        assert!(unit.imports()[5].is_static());
        let widget = unit.find_type("Widget").unwrap();
        assert_eq!(widget.fully_qualified_name(), "com.acme.widgets.Widget");
        assert_eq!(widget.type_kind(), TypeKind::Class);
        assert_eq!(widget.super_interfaces(), ["Serializable".to_string()]);
        assert_eq!(widget.type_parameters()[0].name(), "T");
    }

    #[test]
    fn test_members_in_declaration_order() {
        let (_set, env) = widget_env();
        let widget = env.find_type("com.acme.widgets.Widget").unwrap();
        let names: Vec<(ElementKind, String)> = widget
            .members()
            .iter()
            .map(|m| (m.kind(), m.name().to_string()))
            .collect();
        assert_eq!(
            names,
            vec![
                (ElementKind::Field, "items".to_string()),
                (ElementKind::Field, "counts".to_string()),
                (ElementKind::Method, "Widget".to_string()),
                (ElementKind::Method, "add".to_string()),
            ]
        );
    }

    #[test]
    fn test_method_details() {
        let (_set, env) = widget_env();
        let widget = env.find_type("com.acme.widgets.Widget").unwrap();
        let add = widget.find_method("add", &["Object"]).unwrap();
        assert_eq!(add.return_type(), Some("int"));
        assert_eq!(add.erased_signature(), "add(Object)");
        assert!(add.modifiers().contains(Modifiers::PUBLIC));
        let body = add.body_source().unwrap();
        assert!(body.contains("items.add(item);"));
        assert_eq!(add.parameters()[0].data_type(), "T");

        let ctor = widget.find_method("Widget", &["Map"]).unwrap();
        assert!(ctor.is_constructor());
        assert_eq!(ctor.return_type(), None);
        assert_eq!(ctor.declaring_type(), Some(widget.clone()));
    }

    #[test]
    fn test_field_details() {
        let (_set, env) = widget_env();
        let widget = env.find_type("com.acme.widgets.Widget").unwrap();
        let items = widget.find_field("items").unwrap();
        assert_eq!(items.data_type(), "List<T>");
        assert_eq!(items.initializer_source(), Some("new ArrayList<>()"));
        assert!(items.modifiers().contains(Modifiers::PRIVATE));
        let counts = widget.find_field("counts").unwrap();
        assert_eq!(counts.initializer_source(), None);
    }

    #[test]
    fn test_annotation_resolution() {
        let (_set, env) = widget_env();
        let widget = env.find_type("com.acme.widgets.Widget").unwrap();
        let generated = &widget.annotations()[0];
        assert_eq!(generated.fully_qualified_name(), "javax.annotation.Generated");
        assert_eq!(generated.elements().len(), 3);
        assert_eq!(
            generated.element("date").unwrap().value_source(),
            Some("\"2024-01-01\"")
        );

        let deprecated = &widget.find_field("items").unwrap().annotations()[0];
        assert!(deprecated.is("java.lang.Deprecated"));
        assert_eq!(
            deprecated.element("forRemoval").unwrap().value().to_string(),
            "true"
        );
    }

    #[test]
    fn test_package_annotations() {
        let path = "com/acme/package-info.java";
        let set = SourceSet::with_sources([(
            path,
            "@Deprecated\n@javax.annotation.ParametersAreNonnullByDefault\npackage com.acme;\n",
        )]);
        let env = JavaEnvironment::new(set.clone()).unwrap();
        let package = env.compilation_unit(path).unwrap().package().unwrap();
        assert_eq!(package.name(), "com.acme");
        let annotations = package.annotations();
        let names: Vec<String> = annotations.iter().map(|a| a.fully_qualified_name()).collect();
        assert_eq!(
            names,
            vec!["java.lang.Deprecated", "javax.annotation.ParametersAreNonnullByDefault"]
        );
        assert!(annotations[0].is("java.lang.Deprecated"));
        assert!(annotations[1].elements().is_empty());
    }

    #[test]
    fn test_javadoc_and_member_types() {
        let (_set, env) = shapes_env();
        let circle = env.find_type("shapes.Circle").unwrap();
        assert_eq!(circle.javadoc(), Some("/** A circle with a fixed radius. */"));
        let builder = env.find_type("shapes.Circle$Builder").unwrap();
        assert_eq!(builder.declaring_type(), Some(circle.clone()));
        assert_eq!(builder.binary_name(), "shapes.Circle$Builder");
        assert_eq!(circle.member_types(), vec![builder]);
    }

    #[test]
    fn test_super_types_breadth_first() {
        let (_set, env) = shapes_env();
        let circle = env.find_type("shapes.Circle").unwrap();
        let names: Vec<String> = circle
            .super_types()
            .iter()
            .map(|t| t.fully_qualified_name())
            .collect();
        assert_eq!(names, vec!["shapes.AbstractShape", "shapes.Shape"]);
        assert_eq!(
            circle.find_super_class().map(|t| t.name().to_string()),
            Some("AbstractShape".to_string())
        );
    }

    #[test]
    fn test_super_types_tolerate_cycles() {
        let set = SourceSet::with_sources([
            ("c/A.java", "package c; class A extends B {}"),
            ("c/B.java", "package c; class B extends A {}"),
        ]);
        let env = tugjava_model::JavaEnvironment::new(set).unwrap();
        let a = env.find_type("c.A").unwrap();
        let supers = a.super_types();
        let names: Vec<&str> = supers.iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["B"]);
    }

    #[test]
    fn test_varargs_signature() {
        let (_set, env) = shapes_env();
        let circle = env.find_type("shapes.Circle").unwrap();
        let validate = circle.find_method("validate", &["int[]"]).unwrap();
        assert!(validate.is_varargs());
        assert!(validate.parameters()[0].is_varargs());
        assert_eq!(validate.body_source(), Some("\n    "));
    }
}

mod reload {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_reload_marks_elements_stale() {
        let (_set, env) = shapes_env();
        let circle = env.find_type("shapes.Circle").unwrap();
        assert!(!circle.is_stale());
        env.reload().unwrap();
        assert_eq!(env.generation(), 1);
        assert!(circle.is_stale());
    }

    #[test]
    fn test_resolve_replacement_finds_updated_element() {
        let (set, env) = shapes_env();
        let circle = env.find_type("shapes.Circle").unwrap();
        let area = circle.find_method("area", &[]).unwrap();

        let edited = CIRCLE.replace("Math.PI * radius * radius", "radius * radius * Math.PI");
        set.update(CIRCLE_PATH, edited);
        env.reload().unwrap();

        let current = area.resolve_replacement(|m: Method| m).unwrap();
        assert_ne!(current, area);
        assert!(!current.is_stale());
        assert!(current.body_source().unwrap().contains("radius * radius * Math.PI"));
        // The stale façade still reads its own snapshot.
        assert!(area.body_source().unwrap().contains("Math.PI * radius * radius"));
    }

    #[test]
    fn test_deleted_element_resolves_to_none() {
        let (set, env) = shapes_env();
        let circle = env.find_type("shapes.Circle").unwrap();
        let shape = env.find_type("shapes.Shape").unwrap();
        set.remove(CIRCLE_PATH);
        env.reload().unwrap();

        assert!(circle.resolve_replacement(|t| t.name().to_string()).is_none());
        let refreshed = env.refresh(&[circle, shape]);
        assert_eq!(refreshed.len(), 1);
        assert_eq!(refreshed[0].name(), "Shape");
    }

    #[test]
    fn test_current_element_resolves_to_itself() {
        let (_set, env) = shapes_env();
        let circle = env.find_type("shapes.Circle").unwrap();
        assert_eq!(circle.resolve_replacement(|t| t), Some(circle.clone()));
    }

    #[test]
    fn test_closed_environment_cannot_resolve() {
        let (_set, env) = shapes_env();
        let circle = env.find_type("shapes.Circle").unwrap();
        drop(env);
        assert!(circle.environment().is_none());
        assert!(circle.is_stale());
        assert!(circle.resolve_replacement(|t| t).is_none());
        // Navigation keeps working on the pinned snapshot.
        assert_eq!(circle.methods().len(), 4);
    }
}

mod collaborator {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_compile_errors_by_path_and_type() {
        let (set, env) = shapes_env();
        set.add_source("bad/Broken.java", "package bad; class Broken { void f( }");
        env.reload().unwrap();
        let errors = env.compile_errors("bad/Broken.java");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("bad/Broken.java:1:"));
        assert!(env.compile_errors("shapes.Circle").is_empty());
        assert_eq!(env.all_compile_errors().len(), 1);
    }

    #[test]
    fn test_library_types_are_binary() {
        let set = SourceSet::new();
        set.add_library("lib/Base.java", "package lib; public class Base { public void run() {} }");
        set.add_source("app/App.java", "package app; import lib.Base; class App extends Base {}");
        let env = tugjava_model::JavaEnvironment::new(std::sync::Arc::new(set)).unwrap();
        let base = env.find_type("lib.Base").unwrap();
        assert!(base.is_binary());
        assert_eq!(base.methods()[0].body_source(), None);
        let app = env.find_type("app.App").unwrap();
        assert_eq!(app.find_super_class(), Some(base));
    }

    #[test]
    fn test_line_delimiter() {
        let (_set, env) = shapes_env();
        assert_eq!(env.line_delimiter(), "\n");
        let set = SourceSet::with_sources([("A.java", "class A {\r\n}\r\n")]);
        let env = tugjava_model::JavaEnvironment::new(set).unwrap();
        assert_eq!(env.line_delimiter(), "\r\n");
    }
}
