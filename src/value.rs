//! Dynamically-typed values held by a [`State`](crate::State)
//!
//! `StateValue` enumerates the kinds a test run actually stores. Anything else
//! goes into `Object`, an `Arc`-shared opaque value that keeps its Rust type
//! name for diagnostics.

use std::any::{type_name, Any};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

/// Opaque value stored behind [`StateValue::Object`]
///
/// Implemented for every `Display + Debug + Send + Sync + 'static` type, so
/// callers never implement it by hand.
pub trait StateObject: Any + fmt::Display + fmt::Debug + Send + Sync {
    /// Fully-qualified Rust type name of the concrete value
    fn type_name(&self) -> &'static str;

    fn as_any(&self) -> &dyn Any;
}

impl<T> StateObject for T
where
    T: Any + fmt::Display + fmt::Debug + Send + Sync,
{
    fn type_name(&self) -> &'static str {
        type_name::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A single value in a state bag
///
/// Cloning is shallow for `Object`: both clones point at the same `Arc`.
#[derive(Debug, Clone)]
pub enum StateValue {
    /// Explicitly stored null (distinct from a missing key)
    Null,
    Str(String),
    Int(i32),
    Long(i64),
    Float(f64),
    Bool(bool),
    /// Raw bytes, rendered as UTF-8 text
    Bytes(Vec<u8>),
    List(Vec<StateValue>),
    /// Nested mapping (not a collection for rendering purposes)
    Map(BTreeMap<String, StateValue>),
    /// Opaque value shared by reference
    Object(Arc<dyn StateObject>),
}

impl StateValue {
    /// Wrap any displayable value as an opaque object
    ///
    /// Strings, `i32`/`i64`/`f64`, `bool` and `StateValue` itself land in their
    /// own variants instead.
    pub fn object<T: StateObject>(value: T) -> Self {
        normalize(&value).unwrap_or_else(|| StateValue::Object(Arc::new(value)))
    }

    /// The dedicated variant for an `Object` that holds a known kind
    pub fn normalized(&self) -> Option<StateValue> {
        match self {
            StateValue::Object(obj) => normalize(inner(obj).as_any()),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, StateValue::Null)
    }

    /// Short kind label used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            StateValue::Null => "null",
            StateValue::Str(_) => "string",
            StateValue::Int(_) => "int",
            StateValue::Long(_) => "long",
            StateValue::Float(_) => "float",
            StateValue::Bool(_) => "bool",
            StateValue::Bytes(_) => "bytes",
            StateValue::List(_) => "list",
            StateValue::Map(_) => "map",
            StateValue::Object(obj) => inner(obj).type_name(),
        }
    }

    /// Rust type name of the held value
    ///
    /// `Object` reports the concrete type it was created from, not `Arc<..>`.
    pub fn type_name(&self) -> &'static str {
        match self {
            StateValue::Null => "null",
            StateValue::Str(_) => type_name::<String>(),
            StateValue::Int(_) => type_name::<i32>(),
            StateValue::Long(_) => type_name::<i64>(),
            StateValue::Float(_) => type_name::<f64>(),
            StateValue::Bool(_) => type_name::<bool>(),
            StateValue::Bytes(_) => type_name::<Vec<u8>>(),
            StateValue::List(_) => type_name::<Vec<StateValue>>(),
            StateValue::Map(_) => type_name::<BTreeMap<String, StateValue>>(),
            StateValue::Object(obj) => inner(obj).type_name(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            StateValue::Str(s) => Some(s),
            StateValue::Object(obj) => {
                let any = inner(obj).as_any();
                any.downcast_ref::<String>()
                    .map(String::as_str)
                    .or_else(|| any.downcast_ref::<&'static str>().copied())
            }
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            StateValue::Int(i) => Some(*i),
            StateValue::Object(obj) => inner(obj).as_any().downcast_ref::<i32>().copied(),
            _ => None,
        }
    }

    pub fn as_long(&self) -> Option<i64> {
        match self {
            StateValue::Long(l) => Some(*l),
            StateValue::Object(obj) => inner(obj).as_any().downcast_ref::<i64>().copied(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            StateValue::Bool(b) => Some(*b),
            StateValue::Object(obj) => inner(obj).as_any().downcast_ref::<bool>().copied(),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            StateValue::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Downcast an `Object` to its concrete type
    pub fn downcast_ref<T: StateObject>(&self) -> Option<&T> {
        match self {
            StateValue::Object(obj) => inner(obj).as_any().downcast_ref::<T>(),
            _ => None,
        }
    }
}

// `Arc<dyn StateObject>` is itself a `StateObject` through the blanket impl,
// so method calls must go through the pointee.
fn inner(obj: &Arc<dyn StateObject>) -> &dyn StateObject {
    &**obj
}

fn normalize(any: &dyn Any) -> Option<StateValue> {
    if let Some(value) = any.downcast_ref::<StateValue>() {
        Some(value.clone())
    } else if let Some(s) = any.downcast_ref::<String>() {
        Some(StateValue::Str(s.clone()))
    } else if let Some(s) = any.downcast_ref::<&'static str>() {
        Some(StateValue::Str((*s).to_string()))
    } else if let Some(i) = any.downcast_ref::<i32>() {
        Some(StateValue::Int(*i))
    } else if let Some(l) = any.downcast_ref::<i64>() {
        Some(StateValue::Long(*l))
    } else if let Some(x) = any.downcast_ref::<f64>() {
        Some(StateValue::Float(*x))
    } else {
        any.downcast_ref::<bool>().map(|b| StateValue::Bool(*b))
    }
}

/// Natural string form: strings unquoted, bytes decoded, lists as `[a, b]`,
/// maps as `{k=v, ...}`.
impl fmt::Display for StateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateValue::Null => f.write_str("null"),
            StateValue::Str(s) => f.write_str(s),
            StateValue::Int(i) => write!(f, "{}", i),
            StateValue::Long(l) => write!(f, "{}", l),
            // `{:?}` keeps the trailing `.0`
            StateValue::Float(x) => write!(f, "{:?}", x),
            StateValue::Bool(b) => write!(f, "{}", b),
            StateValue::Bytes(bytes) => f.write_str(&String::from_utf8_lossy(bytes)),
            StateValue::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            StateValue::Map(map) => {
                f.write_str("{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}={}", key, value)?;
                }
                f.write_str("}")
            }
            StateValue::Object(obj) => write!(f, "{}", inner(obj)),
        }
    }
}

/// Objects compare by identity, everything else by value.
impl PartialEq for StateValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (StateValue::Null, StateValue::Null) => true,
            (StateValue::Str(a), StateValue::Str(b)) => a == b,
            (StateValue::Int(a), StateValue::Int(b)) => a == b,
            (StateValue::Long(a), StateValue::Long(b)) => a == b,
            (StateValue::Float(a), StateValue::Float(b)) => a == b,
            (StateValue::Bool(a), StateValue::Bool(b)) => a == b,
            (StateValue::Bytes(a), StateValue::Bytes(b)) => a == b,
            (StateValue::List(a), StateValue::List(b)) => a == b,
            (StateValue::Map(a), StateValue::Map(b)) => a == b,
            (StateValue::Object(a), StateValue::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

// ─────────────────────────────────────────────────────────────
// Conversions
// ─────────────────────────────────────────────────────────────

impl From<&str> for StateValue {
    fn from(value: &str) -> Self {
        StateValue::Str(value.to_string())
    }
}

impl From<String> for StateValue {
    fn from(value: String) -> Self {
        StateValue::Str(value)
    }
}

impl From<i32> for StateValue {
    fn from(value: i32) -> Self {
        StateValue::Int(value)
    }
}

impl From<i64> for StateValue {
    fn from(value: i64) -> Self {
        StateValue::Long(value)
    }
}

impl From<f64> for StateValue {
    fn from(value: f64) -> Self {
        StateValue::Float(value)
    }
}

impl From<bool> for StateValue {
    fn from(value: bool) -> Self {
        StateValue::Bool(value)
    }
}

impl From<Vec<u8>> for StateValue {
    fn from(value: Vec<u8>) -> Self {
        StateValue::Bytes(value)
    }
}

impl From<&[u8]> for StateValue {
    fn from(value: &[u8]) -> Self {
        StateValue::Bytes(value.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for StateValue {
    fn from(value: &[u8; N]) -> Self {
        StateValue::Bytes(value.to_vec())
    }
}

impl From<Vec<StateValue>> for StateValue {
    fn from(value: Vec<StateValue>) -> Self {
        StateValue::List(value)
    }
}

impl From<BTreeMap<String, StateValue>> for StateValue {
    fn from(value: BTreeMap<String, StateValue>) -> Self {
        StateValue::Map(value)
    }
}

impl From<Arc<dyn StateObject>> for StateValue {
    fn from(value: Arc<dyn StateObject>) -> Self {
        match normalize(inner(&value).as_any()) {
            Some(known) => known,
            None => StateValue::Object(value),
        }
    }
}

impl<T: Into<StateValue>> From<Option<T>> for StateValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(StateValue::Null, Into::into)
    }
}

/// Integers land in the narrowest of `Int`/`Long` that fits; anything else
/// numeric (including `u64` above `i64::MAX`) becomes `Float`.
impl From<Value> for StateValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => StateValue::Null,
            Value::Bool(b) => StateValue::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(l) => i32::try_from(l).map_or(StateValue::Long(l), StateValue::Int),
                None => n.as_f64().map_or(StateValue::Null, StateValue::Float),
            },
            Value::String(s) => StateValue::Str(s),
            Value::Array(items) => {
                StateValue::List(items.into_iter().map(StateValue::from).collect())
            }
            Value::Object(map) => StateValue::Map(
                map.into_iter()
                    .map(|(k, v)| (k, StateValue::from(v)))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug)]
    struct Marker(u8);

    impl fmt::Display for Marker {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "marker-{}", self.0)
        }
    }

    #[test]
    fn display_uses_natural_form() {
        assert_eq!(StateValue::from("plain").to_string(), "plain");
        assert_eq!(StateValue::from(5).to_string(), "5");
        assert_eq!(StateValue::from(5_000_000_000_i64).to_string(), "5000000000");
        assert_eq!(StateValue::from(b"hi").to_string(), "hi");
        assert_eq!(StateValue::Null.to_string(), "null");
    }

    #[test]
    fn list_display_renders_elements() {
        let list = StateValue::List(vec![1.into(), "two".into(), StateValue::Null]);
        assert_eq!(list.to_string(), "[1, two, null]");
    }

    #[test]
    fn map_display_is_key_ordered() {
        let mut map = BTreeMap::new();
        map.insert("b".to_string(), StateValue::from(2));
        map.insert("a".to_string(), StateValue::from("x"));
        assert_eq!(StateValue::Map(map).to_string(), "{a=x, b=2}");
    }

    #[test]
    fn object_reports_concrete_type() {
        let value = StateValue::object(Marker(3));
        assert!(value.type_name().ends_with("Marker"));
        assert_eq!(value.kind(), value.type_name());
        assert_eq!(value.to_string(), "marker-3");
        assert_eq!(value.downcast_ref::<Marker>().map(|m| m.0), Some(3));
        assert!(value.downcast_ref::<String>().is_none());
    }

    #[test]
    fn object_of_known_kind_uses_its_variant() {
        assert_eq!(StateValue::object(String::from("x")), StateValue::Str("x".to_string()));
        assert_eq!(StateValue::object("y"), StateValue::Str("y".to_string()));
        assert_eq!(StateValue::object(5_i32), StateValue::Int(5));
        assert_eq!(StateValue::object(5_i64), StateValue::Long(5));
        assert_eq!(StateValue::object(0.5_f64), StateValue::Float(0.5));
        assert_eq!(StateValue::object(true), StateValue::Bool(true));
        assert_eq!(StateValue::object(StateValue::Null), StateValue::Null);
    }

    #[test]
    fn shared_object_of_known_kind_uses_its_variant() {
        let shared: Arc<dyn StateObject> = Arc::new(String::from("x"));
        assert_eq!(StateValue::from(shared), StateValue::Str("x".to_string()));

        let marker: Arc<dyn StateObject> = Arc::new(Marker(2));
        assert!(matches!(StateValue::from(marker), StateValue::Object(_)));
    }

    #[test]
    fn raw_object_variant_still_reads_as_its_kind() {
        let text = StateValue::Object(Arc::new(String::from("x")));
        assert_eq!(text.as_str(), Some("x"));
        assert_eq!(text.normalized(), Some(StateValue::Str("x".to_string())));

        let number = StateValue::Object(Arc::new(7_i64));
        assert_eq!(number.as_long(), Some(7));
        assert_eq!(number.as_int(), None);
        assert_eq!(StateValue::object(Marker(1)).normalized(), None);
    }

    #[test]
    fn float_keeps_fraction() {
        assert_eq!(StateValue::Float(1.0).to_string(), "1.0");
        assert_eq!(StateValue::Float(2.5).to_string(), "2.5");
        assert_ne!(StateValue::Float(1.0).to_string(), StateValue::Int(1).to_string());
    }

    #[test]
    fn is_null_only_for_null() {
        assert!(StateValue::Null.is_null());
        assert!(StateValue::from(None::<&str>).is_null());
        assert!(!StateValue::from("null").is_null());
        assert!(!StateValue::from(0).is_null());
    }

    #[test]
    fn objects_compare_by_identity() {
        let a = StateValue::object(Marker(1));
        let b = StateValue::object(Marker(1));
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn option_maps_none_to_null() {
        assert_eq!(StateValue::from(None::<i32>), StateValue::Null);
        assert_eq!(StateValue::from(Some("x")), StateValue::from("x"));
    }

    #[test]
    fn json_numbers_pick_narrowest_integer() {
        assert_eq!(StateValue::from(json!(7)), StateValue::Int(7));
        assert_eq!(
            StateValue::from(json!(3_000_000_000_i64)),
            StateValue::Long(3_000_000_000)
        );
        assert_eq!(StateValue::from(json!(1.5)), StateValue::Float(1.5));
    }

    #[test]
    fn json_containers_convert_recursively() {
        let value = StateValue::from(json!({"tags": ["a", 1], "meta": {"ok": true}}));
        let StateValue::Map(map) = value else {
            panic!("expected map");
        };
        assert_eq!(
            map["tags"],
            StateValue::List(vec!["a".into(), StateValue::Int(1)])
        );
        assert_eq!(map["meta"].to_string(), "{ok=true}");
    }
}
