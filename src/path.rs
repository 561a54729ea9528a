// Dotted-path parsing plus nested get/set over Value trees

use crate::value::Value;

/// The wildcard marker usable as one segment of a formula path pattern.
pub const WILDCARD: &str = "*";

/// One step of a dotted path: an object key, an array index, or the
/// wildcard marker. A segment that parses as a non-negative integer is
/// an index; everything else (except `*`) is a key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    Key(String),
    Index(usize),
    Wildcard,
}

/// Parse a dotted path (`"a.b.2.c"`) into segments.
pub fn parse(path: &str) -> Vec<Segment> {
    path.split('.')
        .map(|seg| {
            if seg == WILDCARD {
                Segment::Wildcard
            } else if let Ok(i) = seg.parse::<usize>() {
                Segment::Index(i)
            } else {
                Segment::Key(seg.to_string())
            }
        })
        .collect()
}

/// Nested read of `path` against `item`.
///
/// Any absent key, out-of-range index, or segment/container type mismatch
/// yields `Value::Undefined`. Wildcard segments never match anything here;
/// they are only meaningful in formula patterns.
pub fn get_path(item: &Value, path: &str) -> Value {
    let mut current = item;
    for segment in parse(path) {
        let next = match &segment {
            Segment::Key(key) => current.get(key),
            Segment::Index(i) => current.get_index(*i),
            Segment::Wildcard => None,
        };
        match next {
            Some(value) => current = value,
            None => return Value::Undefined,
        }
    }
    current.clone()
}

/// Nested write of `value` into `root` at `path`, creating intermediate
/// containers on demand: key segments create Objects, index segments create
/// Arrays padded with Null up to the target index. An existing node of the
/// wrong shape is replaced.
pub fn set_path(root: &mut Value, path: &str, value: Value) {
    set_segments(root, &parse(path), value);
}

fn set_segments(node: &mut Value, segments: &[Segment], value: Value) {
    let Some((first, rest)) = segments.split_first() else {
        *node = value;
        return;
    };
    match first {
        Segment::Key(key) => {
            if !node.is_object() {
                *node = Value::empty_object();
            }
            if let Some(map) = node.as_object_mut() {
                let child = map.entry(key.clone()).or_insert(Value::Undefined);
                set_segments(child, rest, value);
            }
        }
        Segment::Index(i) => {
            if !node.is_array() {
                *node = Value::array(Vec::new());
            }
            if let Some(arr) = node.as_array_mut() {
                if arr.len() <= *i {
                    arr.resize(*i + 1, Value::Null);
                }
                set_segments(&mut arr[*i], rest, value);
            }
        }
        // Wildcards only appear in unexpanded patterns, which are never
        // written back.
        Segment::Wildcard => {}
    }
}
