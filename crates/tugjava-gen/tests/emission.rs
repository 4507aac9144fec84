//! Integration tests for source emission from working copies.

mod support;


use tugjava_gen::{
    AnnotationGenerator, BuilderContext, CodegenOptions, ComposedTransformer, GenError, Generate,
    MethodGenerator, ToWorkingCopy, Transform, TypeRef,
};
use tugjava_model::{read_unit, ApiElement, ElementKind};

use support::*;

mod identity {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_widget_round_trip() {
        let (env, unit) = widget_unit();
        let text = unit.to_working_copy().unwrap().to_source(&env).unwrap();
        assert_eq!(squash(&text), squash(WIDGET));
        assert!(text.starts_with("package com.acme.widgets;\n\nimport java.util.List;\n"));
        assert!(text.contains(
            "    public Widget(Map<String, Integer> counts) {\n        this.counts = requireNonNull(counts);\n    }\n"
        ));
    }

    #[test]
    fn test_emission_is_idempotent() {
        let (env, unit) = widget_unit();
        let first = unit.to_working_copy().unwrap().to_source(&env).unwrap();

        let (_set, reread_env) = env_with(&[(WIDGET_PATH, first.as_str())]);
        let reread = reread_env.compilation_unit(WIDGET_PATH).unwrap();
        let second = reread.to_working_copy().unwrap().to_source(&reread_env).unwrap();
        assert_eq!(first, second);
    }

    const MODE: &str = "package a;

public enum Mode {
    FAST {
        @Override
        int weight() { return 1; }
    },
    SLOW;

    abstract int weight();

    int twice() { return weight() * 2;
    }
}
";

    fn emit(path: &str, source: &str) -> String {
        let (_set, env) = env_with(&[(path, source)]);
        let unit = env.compilation_unit(path).unwrap();
        unit.to_working_copy().unwrap().to_source(&env).unwrap()
    }

    #[test]
    fn test_multi_line_enum_settles() {
        let first = emit("a/Mode.java", MODE);
        assert_eq!(
            first,
            "package a;

public enum Mode {
    FAST {
        @Override
        int weight() { return 1; }
    },
    SLOW;

    abstract int weight();

    int twice() {
        return weight() * 2;
    }
}
"
        );
        let second = emit("a/Mode.java", &first);
        let third = emit("a/Mode.java", &second);
        assert_eq!(first, second);
        assert_eq!(first, third);
    }

    #[test]
    fn test_circle_round_trip() {
        let (env, unit) = circle_unit();
        let copy = unit.to_working_copy().unwrap();
        let text = copy.to_source(&env).unwrap();
        assert_eq!(squash(&text), squash(CIRCLE));
        assert!(text.contains(
            "/** A circle with a fixed radius. */\npublic class Circle extends AbstractShape {\n"
        ));
        assert!(text.contains("    protected void validate(int... limits) {\n    }\n"));
    }

    #[test]
    fn test_crlf_environment() {
        let source = WIDGET.replace('\n', "\r\n");
        let (_set, env) = env_with(&[(WIDGET_PATH, source.as_str())]);
        let unit = env.compilation_unit(WIDGET_PATH).unwrap();
        let text = unit.to_working_copy().unwrap().to_source(&env).unwrap();
        assert!(text.contains("package com.acme.widgets;\r\n\r\nimport"));
        assert!(!text.replace("\r\n", "").contains('\n'));
    }

    #[test]
    fn test_member_type_alone() {
        let (env, unit) = circle_unit();
        let builder = unit.find_type("Circle").unwrap().member_types()[0].clone();
        let text = builder.to_working_copy().unwrap().to_source(&env).unwrap();
        assert_eq!(text, "static class Builder {\n    double radius;\n}\n");
    }
}

mod overrides {
    use super::*;
    use pretty_assertions::assert_eq;

    fn with_override_detection() -> ComposedTransformer {
        ComposedTransformer::builder()
            .on_method(|input| {
                let method = input.into_default_working_copy()?;
                Ok(Transform::Keep(method.with_override_if_necessary(true)))
            })
            .build()
    }

    #[test]
    fn test_override_added_where_needed() {
        let (env, unit) = circle_unit();
        let copy = unit.transform_with(&with_override_detection()).unwrap().unwrap();
        let text = copy.to_source(&env).unwrap();
        assert!(text.contains("    @Override\n    public double area() {\n"));
        assert!(text.contains("    @Override\n    protected void validate(int... limits) {\n"));
        assert!(text.contains("\n    public static List<Circle> of(double... radii) {\n"));
        assert!(text.contains("\n    public Circle(double radius) {\n"));
        assert_eq!(text.matches("@Override").count(), 2);
    }

    #[test]
    fn test_existing_override_not_duplicated() {
        let (env, _unit) = circle_unit();
        let unit = env.compilation_unit("shapes/AbstractShape.java").unwrap();
        let copy = unit.transform_with(&with_override_detection()).unwrap().unwrap();
        let text = copy.to_source(&env).unwrap();
        assert_eq!(text.matches("@Override").count(), 1);
        assert!(text.contains("    @Override\n    public String name() {\n"));
    }

    #[test]
    fn test_global_switch_disables_detection() {
        let (env, unit) = circle_unit();
        let copy = unit.transform_with(&with_override_detection()).unwrap().unwrap();
        let mut ctx = BuilderContext::for_environment(&env).with_options(CodegenOptions {
            add_override_annotations: false,
            ..CodegenOptions::default()
        });
        let text = copy.to_source_with(&mut ctx).unwrap();
        assert!(!text.contains("@Override"));
    }

    #[test]
    fn test_no_environment_no_override() {
        let (_env, unit) = circle_unit();
        let copy = unit.transform_with(&with_override_detection()).unwrap().unwrap();
        let text = copy
            .to_source_with(&mut BuilderContext::new(CodegenOptions::default()))
            .unwrap();
        assert!(!text.contains("@Override"));
    }

    const SINK: &str = "package g;

public interface Sink<E> {
    void put(E element);
}
";

    const BASE: &str = "package g;

public abstract class Base<T> implements Sink<T> {
    public abstract void take(T item);

    public <U> void convert(U value, T item) {
    }
}
";

    const IMPL: &str = "package g;

public class Impl extends Base<String> {
    public void take(String item) {
    }

    public void take(Integer item) {
    }

    public void put(String element) {
    }

    public <V> void convert(V value, String item) {
    }
}
";

    fn generic_env() -> tugjava_model::JavaEnvironment {
        let (_set, env) = env_with(&[
            ("g/Sink.java", SINK),
            ("g/Base.java", BASE),
            ("g/Impl.java", IMPL),
        ]);
        env
    }

    #[test]
    fn test_override_through_type_arguments() {
        let env = generic_env();
        let unit = env.compilation_unit("g/Impl.java").unwrap();
        let copy = unit.transform_with(&with_override_detection()).unwrap().unwrap();
        let text = copy.to_source(&env).unwrap();
        assert!(text.contains("    @Override\n    public void take(String item) {\n"));
        assert!(text.contains("\n\n    public void take(Integer item) {\n"));
        assert!(text.contains("    @Override\n    public void put(String element) {\n"));
        assert!(text.contains(
            "    @Override\n    public <V> void convert(V value, String item) {\n"
        ));
        assert_eq!(text.matches("@Override").count(), 3);
    }

    #[test]
    fn test_override_through_type_arguments_in_pushed_frame() {
        let env = generic_env();
        let impl_type = env.find_type("g.Impl").unwrap();
        let method = MethodGenerator::new("void", "put")
            .with_parameter(tugjava_gen::MethodParameterGenerator::new("String", "element"))
            .with_override_if_necessary(true)
            .with_body("");

        let mut ctx = BuilderContext::for_environment(&env);
        ctx.push_type(&impl_type);
        let text = method.to_source_with(&mut ctx).unwrap();
        assert_eq!(text, "@Override\nvoid put(String element) {\n}\n");
    }

    #[test]
    fn test_standalone_method_in_pushed_frame() {
        let (env, _unit) = circle_unit();
        let circle = env.find_type("shapes.Circle").unwrap();
        let method = MethodGenerator::new("double", "area")
            .with_modifiers(tugjava_model::Modifiers::PUBLIC)
            .with_override_if_necessary(true)
            .with_body("return 0;");

        let mut ctx = BuilderContext::for_environment(&env);
        ctx.push_type(&circle);
        let text = method.to_source_with(&mut ctx).unwrap();
        assert_eq!(text, "@Override\npublic double area() {\n    return 0;\n}\n");

        let text = method.to_source(&env).unwrap();
        assert!(!text.contains("@Override"));
    }

    #[test]
    fn test_new_method_in_frame_of_existing_type() {
        let (env, unit) = circle_unit();
        let transformer = ComposedTransformer::builder()
            .on_type(|mut input| {
                if input.model().name() == "Circle" {
                    let copy = input.request_default_working_copy()?;
                    copy.members_mut().push(
                        MethodGenerator::new("String", "name")
                            .with_modifiers(tugjava_model::Modifiers::PUBLIC)
                            .with_override_if_necessary(true)
                            .with_body("return \"circle\";")
                            .into(),
                    );
                }
                input.keep()
            })
            .build();
        let copy = unit.transform_with(&transformer).unwrap().unwrap();
        let text = copy.to_source(&env).unwrap();
        assert!(text.contains(
            "    @Override\n    public String name() {\n        return \"circle\";\n    }\n"
        ));
    }
}

mod normalization {
    use super::*;
    use pretty_assertions::assert_eq;

    const LEGACY: &str = r#"package a;

@SuppressWarnings({"unchecked", "rawtypes"})
public class Legacy {
    @SuppressWarnings({"deprecation"})
    void old() {
    }
}
"#;

    #[test]
    fn test_annotation_array_value_removal() {
        let (_set, env) = env_with(&[("a/Legacy.java", LEGACY)]);
        let unit = env.compilation_unit("a/Legacy.java").unwrap();
        let transformer = ComposedTransformer::builder()
            .on_annotation_element(|input| {
                let element = input.into_default_working_copy()?;
                Ok(Transform::Keep(element.without_array_value(0)))
            })
            .build();
        let copy = unit.transform_with(&transformer).unwrap().unwrap();
        let text = copy.to_source(&env).unwrap();
        assert!(text.contains("@SuppressWarnings({\"rawtypes\"})\npublic class Legacy {\n"));
        assert!(text.contains("    @SuppressWarnings({})\n    void old() {\n"));
    }

    #[test]
    fn test_qualified_types_add_sorted_imports() {
        let (env, unit) = widget_unit();
        let transformer = ComposedTransformer::builder()
            .on_field(|input| {
                let field = input.into_default_working_copy()?;
                if field.name() != Some("counts") {
                    return Ok(Transform::Keep(field));
                }
                Ok(Transform::Keep(field.with_type(TypeRef::qualified(
                    "java.util.concurrent.ConcurrentMap<java.lang.String, java.lang.Integer>",
                ))))
            })
            .on_method(|input| {
                let method = input.into_default_working_copy()?;
                if method.name() == Some("add") {
                    return Ok(Transform::Keep(
                        method.with_return_type(Some(TypeRef::qualified("java.math.BigInteger"))),
                    ));
                }
                Ok(Transform::Keep(method))
            })
            .build();
        let copy = unit.transform_with(&transformer).unwrap().unwrap();
        let text = copy.to_source(&env).unwrap();
        assert!(text.contains(
            "import static java.util.Objects.requireNonNull;\nimport java.math.BigInteger;\nimport java.util.concurrent.ConcurrentMap;\n\n@Generated"
        ));
        assert!(text.contains("    private final ConcurrentMap<String, Integer> counts;\n"));
        assert!(text.contains("    public BigInteger add(T item) {\n"));
    }

    #[test]
    fn test_existing_import_not_repeated() {
        let (env, unit) = widget_unit();
        let transformer = ComposedTransformer::builder()
            .on_field(|input| {
                let field = input.into_default_working_copy()?;
                Ok(Transform::Keep(field.with_type(TypeRef::qualified("java.util.List<T>"))))
            })
            .build();
        let text = unit
            .transform_with(&transformer)
            .unwrap()
            .unwrap()
            .to_source(&env)
            .unwrap();
        assert_eq!(text.matches("import java.util.List;").count(), 1);
        assert!(text.contains("    private final List<T> counts;\n"));
    }

    #[test]
    fn test_throws_deduplicated() {
        let (env, unit) = widget_unit();
        let transformer = ComposedTransformer::builder()
            .on_method(|input| {
                let method = input.into_default_working_copy()?;
                if method.is_constructor() {
                    return Ok(Transform::Keep(method));
                }
                Ok(Transform::Keep(
                    method
                        .with_exception(TypeRef::qualified("java.io.IOException"))
                        .with_exception("IllegalStateException")
                        .with_exception("IOException")
                        .with_exception(TypeRef::qualified("java.io.IOException")),
                ))
            })
            .build();
        let copy = unit.transform_with(&transformer).unwrap().unwrap();
        let text = copy.to_source(&env).unwrap();
        assert!(text.contains(
            "    public int add(T item) throws IOException, IllegalStateException {\n"
        ));
        assert!(text.contains("import java.io.IOException;\n"));
    }

    #[test]
    fn test_package_rename_reads_back() {
        let (env, unit) = widget_unit();
        let transformer = ComposedTransformer::builder()
            .on_package(|_input| Ok(Transform::Keep("other.moved".to_string())))
            .build();
        let copy = unit.transform_with(&transformer).unwrap().unwrap();
        let text = copy.to_source(&env).unwrap();
        let decl = read_unit("other/moved/Widget.java", &text).unwrap();
        assert_eq!(decl.package_name(), "other.moved");
        assert_eq!(decl.types.len(), 1);
        assert_eq!(decl.types[0].name, "Widget");
        assert_eq!(decl.imports.len(), 6);
    }

    #[test]
    fn test_removed_parameter_leaves_empty_list() {
        let (env, unit) = widget_unit();
        let transformer = ComposedTransformer::builder()
            .on_method_parameter(|input| input.remove())
            .build();
        let text = unit
            .transform_with(&transformer)
            .unwrap()
            .unwrap()
            .to_source(&env)
            .unwrap();
        assert!(text.contains("    public Widget() {\n"));
        assert!(text.contains("    public int add() {\n"));
    }
}

mod structural_errors {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_nameless_method_fails_emission() {
        let (env, unit) = widget_unit();
        let transformer = ComposedTransformer::builder()
            .on_method(|_input| {
                Ok(Transform::Keep(
                    MethodGenerator::default().with_return_type(Some("void".into())),
                ))
            })
            .build();
        let copy = unit.transform_with(&transformer).unwrap().unwrap();
        assert!(matches!(
            copy.to_source(&env),
            Err(GenError::MissingName { kind: ElementKind::Method })
        ));
    }

    #[test]
    fn test_computed_type_without_value() {
        let (env, unit) = widget_unit();
        let transformer = ComposedTransformer::builder()
            .on_field(|input| {
                let field = input.into_default_working_copy()?;
                Ok(Transform::Keep(field.with_type(TypeRef::computed(|_| None))))
            })
            .build();
        let copy = unit.transform_with(&transformer).unwrap().unwrap();
        let err = copy.to_source(&env).unwrap_err();
        assert_eq!(err.to_string(), "field 'items' has no type");
    }

    #[test]
    fn test_annotation_added_by_transformer() {
        let (env, unit) = widget_unit();
        let transformer = ComposedTransformer::builder()
            .on_field(|input| {
                let mut field = input.into_default_working_copy()?;
                field
                    .annotations_mut()
                    .push(AnnotationGenerator::new(TypeRef::qualified(
                        "javax.annotation.Nullable",
                    )));
                Ok(Transform::Keep(field))
            })
            .build();
        let text = unit
            .transform_with(&transformer)
            .unwrap()
            .unwrap()
            .to_source(&env)
            .unwrap();
        assert!(text.contains(
            "    @Deprecated(since = \"2.0\", forRemoval = true)\n    @Nullable\n    private List<T> items"
        ));
        assert!(text.contains("import javax.annotation.Nullable;\n"));
    }
}
