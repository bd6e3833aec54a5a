/// Builds a [`Value`](crate::Value) from a ZON-flavored literal.
///
/// Alongside JSON-style nesting, the macro understands ZON's own scalar
/// spellings: `T` and `F` are the booleans, exactly as they appear in
/// encoded text (`true`/`false` are accepted too).
///
/// ```rust
/// use zon::zon;
///
/// let data = zon!({
///     "name": "Alice",
///     "scores": [95, 87, 92],
///     "active": T,
///     "note": null
/// });
/// assert_eq!(
///     zon::encode(&data).unwrap(),
///     "active:T\nname:Alice\nnote:null\nscores:\"[95,87,92]\""
/// );
/// ```
///
/// Leaves outside the literal forms go through `Value::from`, so any type
/// with a `From` conversion works; non-finite floats land as `null` the
/// same way they do on encode.
#[macro_export]
macro_rules! zon {
    (null) => {
        $crate::Value::Null
    };

    (T) => {
        $crate::Value::Bool(true)
    };

    (F) => {
        $crate::Value::Bool(false)
    };

    (true) => {
        $crate::Value::Bool(true)
    };

    (false) => {
        $crate::Value::Bool(false)
    };

    ([ $($element:tt),* $(,)? ]) => {
        $crate::Value::Array(vec![$($crate::zon!($element)),*])
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {
        $crate::Value::Object(
            [$( (($key).to_string(), $crate::zon!($value)) ),*]
                .into_iter()
                .collect::<$crate::ZonMap>(),
        )
    };

    ($scalar:expr) => {
        $crate::Value::from($scalar)
    };
}

#[cfg(test)]
mod tests {
    use crate::{Number, Value, ZonMap};

    #[test]
    fn macro_primitives() {
        assert_eq!(zon!(null), Value::Null);
        assert_eq!(zon!(true), Value::Bool(true));
        assert_eq!(zon!(false), Value::Bool(false));
        assert_eq!(zon!(42), Value::Number(Number::Int(42)));
        assert_eq!(zon!(3.5), Value::Number(Number::Float(3.5)));
        assert_eq!(zon!("hello"), Value::String("hello".to_string()));
    }

    #[test]
    fn macro_zon_boolean_spellings() {
        assert_eq!(zon!(T), Value::Bool(true));
        assert_eq!(zon!(F), Value::Bool(false));
        assert_eq!(zon!([T, F, null]), zon!([true, false, null]));
    }

    #[test]
    fn macro_arrays() {
        assert_eq!(zon!([]), Value::Array(vec![]));

        let arr = zon!([1, 2, 3]);
        assert_eq!(
            arr,
            Value::Array(vec![Value::from(1), Value::from(2), Value::from(3)])
        );
    }

    #[test]
    fn macro_objects() {
        assert_eq!(zon!({}), Value::Object(ZonMap::new()));

        let obj = zon!({
            "name": "Alice",
            "age": 30
        });

        match obj {
            Value::Object(map) => {
                assert_eq!(map.len(), 2);
                assert_eq!(map.get("name"), Some(&Value::from("Alice")));
                assert_eq!(map.get("age"), Some(&Value::from(30)));
            }
            _ => panic!("Expected object"),
        }
    }

    #[test]
    fn macro_nests() {
        let v = zon!({
            "rows": [{ "id": 1 }, { "id": 2 }],
            "meta": { "empty": {} }
        });
        let rows = v.as_object().unwrap().get("rows").unwrap();
        assert_eq!(rows.as_array().unwrap().len(), 2);
    }
}
