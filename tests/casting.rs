mod common;

use common::{circle, definition, square, Circle, Drawing};
use jsoncast::{CastingLevel, ClassDef, Definition, ErrorKind, Obj, Reflector, Value};
use rstest::rstest;

fn drawing(text: &str) -> jsoncast::Result<Drawing> {
    let definition = definition(CastingLevel::Never);
    jsoncast::from_str::<Obj<Drawing>>(text, &definition, Some("Drawing")).map(Obj::into_inner)
}

#[rstest]
fn unknown_cast_is_parse_fault_with_name_and_line() {
    let definition = definition(CastingLevel::Never);
    let err = jsoncast::parse_str("{\n  \"main\": (Bogus){}\n}", &definition, Some("Drawing"))
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Parse);
    assert_eq!(err.line, Some(2));
    assert_eq!(err.message, "Class 'Bogus' not found. (:2)");
}

#[rstest]
fn cast_outside_interface_is_rejected() {
    let err = drawing("{\"main\": (Drawing){}}").unwrap_err();
    assert_eq!(err.message, "Class 'Drawing' not allowed in 'Shape'. (:1)");
}

#[rstest]
fn root_cast_must_fit_root_type() {
    let definition = definition(CastingLevel::Never);
    let err = jsoncast::parse_str("(Circle){}", &definition, Some("Square")).unwrap_err();
    assert_eq!(err.message, "Class 'Circle' not allowed in 'Square'. (:1)");
}

#[rstest]
fn root_cast_without_root_type_selects_class() {
    let definition = definition(CastingLevel::Never);
    let value = jsoncast::build_str("(Circle){\"radius\": 2}", &definition, None).unwrap();
    assert_eq!(value, circle(2));
}

#[rstest]
fn root_cast_to_interface_member() {
    let definition = definition(CastingLevel::Never);
    let value = jsoncast::build_str("(Square){\"side\": 9}", &definition, Some("Shape")).unwrap();
    assert_eq!(value, square(9));
}

#[rstest]
fn interface_value_without_cast_builds_null() {
    let built = drawing("{\"main\": {\"radius\": 1}, \"shapes\": [{\"side\": 2}]}").unwrap();
    assert!(built.main.is_null());
    assert_eq!(built.shapes, vec![Value::Null]);
}

#[rstest]
fn list_cast_applies_to_following_elements() {
    let built = drawing(concat!(
        "{\"shapes\": [(Circle){\"radius\": 1}, {\"radius\": 2},",
        " (Square){\"side\": 3}, {\"side\": 4}]}"
    ))
    .unwrap();
    assert_eq!(built.shapes, vec![circle(1), circle(2), square(3), square(4)]);
}

#[rstest]
fn cast_token_is_trimmed() {
    let built = drawing("{\"main\": ( Circle ) {\"radius\": 5}}").unwrap();
    assert_eq!(built.main, circle(5));
}

#[rstest]
fn cast_before_bare_token_types_the_value() {
    let definition = definition(CastingLevel::Never);
    let value = jsoncast::build_str("(long) 12", &definition, None).unwrap();
    assert_eq!(value, Value::Long(12));
    let value = jsoncast::build_str("(Integer)\"7\"", &definition, None).unwrap();
    assert_eq!(value, Value::Int(7));
}

#[rstest]
fn suffix_match_uses_registration_order() {
    let mut model = common::model();
    for name in ["geo.Circle", "art.Circle"] {
        let mut class = ClassDef::new(
            name,
            Reflector::<Circle>::new()
                .default_constructor()
                .setter("setRadius", |c: &mut Circle, radius: i32| c.radius = radius)
                .finish(),
        );
        class.add_field("radius", model.get("int").unwrap());
        model.add(class);
    }
    let definition = Definition::new(model, CastingLevel::Never).unwrap();

    let exact = jsoncast::parse_str("(Circle){}", &definition, None).unwrap();
    assert_eq!(exact.print_class_name(), "Circle");
    let suffix = jsoncast::parse_str("(.Circle){}", &definition, None).unwrap();
    assert_eq!(suffix.print_class_name(), "geo.Circle");
}

#[rstest]
#[case(CastingLevel::Never, false)]
#[case(CastingLevel::Necessary, true)]
#[case(CastingLevel::Always, true)]
fn interface_field_marker_follows_casting_level(
    #[case] level: CastingLevel,
    #[case] marked: bool,
) {
    let definition = definition(level);
    let value = Value::object(Drawing {
        main: circle(1),
        ..Drawing::default()
    });
    let text = jsoncast::to_string(&value, &definition, Some("Drawing")).unwrap();
    assert_eq!(text.contains("\"main\": (Circle){"), marked);
}

#[rstest]
fn class_field_is_marked_only_when_always() {
    let necessary = definition(CastingLevel::Necessary);
    let always = necessary.with_casting_level(CastingLevel::Always);
    let root_list = Value::List(vec![circle(1)]);
    let plain = jsoncast::to_string(&root_list, &necessary, Some("Circle")).unwrap();
    let marked = jsoncast::to_string(&root_list, &always, Some("Circle")).unwrap();
    assert!(!plain.contains("(Circle)"));
    assert!(marked.contains("(Circle){"));
}
