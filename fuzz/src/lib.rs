use ods::{Registry, Tag, delete, find, get, read_tags, replace, scout, set, to_vec_all};

fn registry() -> Registry {
    Registry::default().with_permissive(true)
}

/// Decodes arbitrary bytes and re-encodes whatever came out.
pub fn test_codec(data: &[u8]) {
    let registry = registry();
    if let Ok(tags) = read_tags(data, &registry) {
        if let Ok(encoded) = to_vec_all(&tags, &registry) {
            let _ = read_tags(&encoded, &registry);
        }
    }
}

/// Key paths built from the input's own record names, so the resolver
/// actually descends instead of bailing at the first level.
fn keys(data: &[u8], registry: &Registry) -> Vec<String> {
    let Ok(tags) = read_tags(data, registry) else {
        return vec!["a".to_owned(), "a.b".to_owned()];
    };
    let mut keys = Vec::new();
    for tag in tags.iter().take(8) {
        if tag.name.is_empty() || tag.name.contains('.') {
            continue;
        }
        keys.push(tag.name.clone());
        for child in tag.value.as_object().unwrap_or_default().iter().take(4) {
            if !child.name.is_empty() && !child.name.contains('.') {
                keys.push(format!("{}.{}", tag.name, child.name));
            }
        }
        keys.push(format!("{}.missing.leaf", tag.name));
    }
    keys
}

/// Runs every key-path operation on arbitrary bytes. None may panic.
pub fn test_keypath(data: &[u8]) {
    let registry = registry();
    for key in keys(data, &registry) {
        let _ = get(data, key.as_str(), &registry);
        let _ = find(data, key.as_str());
        let _ = scout(data, key.as_str());

        let mut buf = data.to_vec();
        let _ = delete(&mut buf, key.as_str());

        let mut buf = data.to_vec();
        let _ = replace(&mut buf, key.as_str(), &Tag::new("x", 1), &registry);

        let mut buf = data.to_vec();
        let _ = set(&mut buf, key.as_str(), &Tag::string("y", "z"), &registry);
    }
}

pub fn test(data: &[u8]) {
    test_codec(data);
    test_keypath(data);
}
