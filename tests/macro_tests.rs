use zon::{zon, Number, Value, ZonMap};

#[test]
fn zon_macro_null() {
    let value = zon!(null);
    assert_eq!(value, Value::Null);
}

#[test]
fn zon_macro_booleans() {
    assert_eq!(zon!(true), Value::Bool(true));
    assert_eq!(zon!(false), Value::Bool(false));
    // ZON's own spellings work as literals too.
    assert_eq!(zon!(T), Value::Bool(true));
    assert_eq!(zon!(F), Value::Bool(false));
    assert_eq!(zon!({ "sunny": T }), zon!({ "sunny": true }));
}

#[test]
fn zon_macro_numbers() {
    assert_eq!(zon!(42), Value::Number(Number::Int(42)));
    assert_eq!(zon!(3.5), Value::Number(Number::Float(3.5)));
    assert_eq!(zon!(-123), Value::Number(Number::Int(-123)));
    // Integral floats canonicalize on the way in.
    assert_eq!(zon!(2.0), Value::Number(Number::Int(2)));
}

#[test]
fn zon_macro_strings() {
    assert_eq!(zon!("hello world"), Value::String("hello world".to_string()));
    assert_eq!(zon!(""), Value::String(String::new()));
}

#[test]
fn zon_macro_arrays() {
    assert_eq!(zon!([]), Value::Array(vec![]));

    let numbers = zon!([1, 2, 3]);
    assert_eq!(
        numbers,
        Value::Array(vec![Value::from(1), Value::from(2), Value::from(3)])
    );

    let mixed = zon!([1, "hello", true, null]);
    assert_eq!(
        mixed,
        Value::Array(vec![
            Value::from(1),
            Value::from("hello"),
            Value::Bool(true),
            Value::Null,
        ])
    );
}

#[test]
fn zon_macro_objects() {
    assert_eq!(zon!({}), Value::Object(ZonMap::new()));

    let simple = zon!({
        "name": "Alice",
        "age": 30
    });

    match simple {
        Value::Object(ref obj) => {
            assert_eq!(obj.len(), 2);
            assert_eq!(obj.get("name"), Some(&Value::from("Alice")));
            assert_eq!(obj.get("age"), Some(&Value::from(30)));
        }
        _ => panic!("Expected object"),
    }
}

#[test]
fn zon_macro_nested() {
    let nested = zon!({
        "user": {
            "id": 123,
            "name": "Bob",
            "active": true
        },
        "tags": ["admin", "developer"],
        "count": 42
    });

    match nested {
        Value::Object(ref obj) => {
            assert_eq!(obj.len(), 3);

            if let Some(Value::Object(user)) = obj.get("user") {
                assert_eq!(user.get("id"), Some(&Value::from(123)));
                assert_eq!(user.get("name"), Some(&Value::from("Bob")));
                assert_eq!(user.get("active"), Some(&Value::Bool(true)));
            } else {
                panic!("Expected user to be an object");
            }

            if let Some(Value::Array(tags)) = obj.get("tags") {
                assert_eq!(tags.len(), 2);
                assert_eq!(tags[0], Value::from("admin"));
                assert_eq!(tags[1], Value::from("developer"));
            } else {
                panic!("Expected tags to be an array");
            }

            assert_eq!(obj.get("count"), Some(&Value::from(42)));
        }
        _ => panic!("Expected object"),
    }
}

#[test]
fn value_accessors() {
    let null_val = zon!(null);
    assert!(null_val.is_null());
    assert!(!null_val.is_bool());
    assert!(!null_val.is_number());
    assert!(!null_val.is_string());
    assert!(!null_val.is_array());
    assert!(!null_val.is_object());
    assert!(null_val.is_scalar());

    let bool_val = zon!(true);
    assert!(bool_val.is_bool());
    assert_eq!(bool_val.as_bool(), Some(true));

    let str_val = zon!("hello");
    assert!(str_val.is_string());
    assert_eq!(str_val.as_str(), Some("hello"));

    let array_val = zon!([1, 2, 3]);
    assert!(array_val.is_array());
    assert_eq!(array_val.as_array().unwrap().len(), 3);
    assert!(!array_val.is_scalar());

    let obj_val = zon!({"key": "value"});
    assert!(obj_val.is_object());
    assert_eq!(obj_val.as_object().unwrap().len(), 1);
}

#[test]
fn macro_values_encode() {
    let value = zon!({
        "tags": ["a", "b"],
        "n": 5
    });
    assert_eq!(zon::encode(&value).unwrap(), "n:5\ntags:\"[a,b]\"");
}
