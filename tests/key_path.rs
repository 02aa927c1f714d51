use std::collections::BTreeMap;

use ods::{Error, KeyPath, Registry, Tag, Value, find, get, get_all, to_vec, to_vec_all};

fn car() -> Tag {
    Tag::object(
        "Car",
        vec![
            Tag::string("type", "Jeep"),
            Tag::new("gas", 30),
            Tag::object(
                "Owner",
                vec![
                    Tag::string("firstName", "Jeff"),
                    Tag::string("lastName", "Bob"),
                    Tag::new("age", 30),
                ],
            ),
        ],
    )
}

#[test]
fn test_get_nested_value() {
    let registry = Registry::default();
    let data = to_vec(&car(), &registry).unwrap();

    assert_eq!(
        get(&data, "Car.Owner.firstName", &registry).unwrap(),
        Some(Tag::string("firstName", "Jeff"))
    );
    assert_eq!(
        get(&data, "Car.gas", &registry).unwrap(),
        Some(Tag::new("gas", 30))
    );
    assert_eq!(get(&data, "Car", &registry).unwrap(), Some(car()));
}

#[test]
fn test_missing_keys_are_none() {
    let registry = Registry::default();
    let data = to_vec(&car(), &registry).unwrap();

    assert_eq!(get(&data, "Boat", &registry).unwrap(), None);
    assert_eq!(get(&data, "Car.Owner.middleName", &registry).unwrap(), None);
    assert_eq!(get(&data, "Car.Engine.size", &registry).unwrap(), None);
    assert!(!find(&data, "Car.Owner.middleName").unwrap());
    assert!(find(&data, "Car.Owner.age").unwrap());
}

#[test]
fn test_descent_through_leaf_is_none() {
    let registry = Registry::default();
    let data = to_vec(&car(), &registry).unwrap();
    assert_eq!(get(&data, "Car.type.length", &registry).unwrap(), None);
    assert!(!find(&data, "Car.gas.x").unwrap());
}

#[test]
fn test_first_match_wins() {
    let registry = Registry::default();
    let data = to_vec_all(&[Tag::new("dup", 1), Tag::new("dup", 2)], &registry).unwrap();
    assert_eq!(
        get(&data, "dup", &registry).unwrap(),
        Some(Tag::new("dup", 1))
    );
}

#[test]
fn test_name_prefix_does_not_match() {
    let registry = Registry::default();
    let data = to_vec_all(&[Tag::new("carpet", 1), Tag::new("car", 2)], &registry).unwrap();
    assert_eq!(
        get(&data, "car", &registry).unwrap(),
        Some(Tag::new("car", 2))
    );
}

#[test]
fn test_invalid_keys() {
    let registry = Registry::default();
    let data = to_vec(&car(), &registry).unwrap();
    for key in ["", "Car.", ".Car", "Car..Owner"] {
        assert!(matches!(get(&data, key, &registry), Err(Error::InvalidKey(_))));
        assert!(matches!(find(&data, key), Err(Error::InvalidKey(_))));
    }
}

#[test]
fn test_parsed_key_path() {
    let registry = Registry::default();
    let data = to_vec(&car(), &registry).unwrap();
    let path = KeyPath::parse("Car.Owner.age").unwrap();
    assert_eq!(
        get(&data, &path, &registry).unwrap(),
        Some(Tag::new("age", 30))
    );
    assert!(find(&data, path).unwrap());

    let owned = String::from("Car.type");
    assert!(find(&data, &owned).unwrap());
}

#[test]
fn test_dictionary_is_descendable() {
    let registry = Registry::default();
    let mut entries = BTreeMap::new();
    entries.insert("width".to_owned(), Value::Int(4));
    let data = to_vec(&Tag::dictionary("Size", entries), &registry).unwrap();
    assert_eq!(
        get(&data, "Size.width", &registry).unwrap(),
        Some(Tag::new("width", 4))
    );
}

#[test]
fn test_list_children_never_match() {
    let registry = Registry::default();
    let data = to_vec(&Tag::list("l", vec![Value::Int(1)]), &registry).unwrap();
    assert_eq!(get(&data, "l.x", &registry).unwrap(), None);
}

#[test]
fn test_compressed_object_is_opaque() {
    let registry = Registry::default();
    let tag = Tag::compressed_object("Packed", "NONE", vec![Tag::new("inner", 1)]);
    let data = to_vec(&tag, &registry).unwrap();

    assert_eq!(get(&data, "Packed", &registry).unwrap(), Some(tag));
    assert!(matches!(
        get(&data, "Packed.inner", &registry),
        Err(Error::CompressedObjectTraversal(key)) if key == "Packed"
    ));
    assert!(matches!(
        find(&data, "Packed.inner"),
        Err(Error::CompressedObjectTraversal(_))
    ));
}

#[test]
fn test_get_all_decodes_top_level() {
    let registry = Registry::default();
    let tags = vec![
        car(),
        Tag::string("ExampleKey", "This is an example string!"),
    ];
    let data = to_vec_all(&tags, &registry).unwrap();
    assert_eq!(get_all(&data, &registry).unwrap(), tags);
}

#[test]
fn test_truncated_sibling_is_error() {
    let registry = Registry::default();
    let mut data = to_vec_all(&[Tag::new("a", 1), Tag::new("b", 2)], &registry).unwrap();
    data.truncate(data.len() - 2);
    assert!(matches!(get(&data, "b", &registry), Err(Error::TruncatedData)));
    assert_eq!(get(&data, "a", &registry).unwrap(), Some(Tag::new("a", 1)));
}
