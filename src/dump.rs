//! Debug rendering of state mappings
//!
//! Format: `{k1 = |v1|,k2 = |v2|}`. Entries come out in the mapping's own
//! iteration order. This is a diagnostic format; nothing parses it back.

use crate::value::StateValue;

/// Render any string-keyed mapping of state values
///
/// Accepts `&HashMap<String, StateValue>`, `&BTreeMap<..>`, `&State`, or any
/// iterator of `(key, &value)` pairs.
pub fn dump<'a, I, K>(entries: I) -> String
where
    I: IntoIterator<Item = (K, &'a StateValue)>,
    K: AsRef<str>,
{
    let mut out = String::from("{");
    for (i, (key, value)) in entries.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(key.as_ref());
        out.push_str(" = |");
        out.push_str(&render(value));
        out.push('|');
    }
    out.push('}');
    out
}

/// Render a single value, first matching rule wins:
/// null, then strings/lists/numbers as-is, then bytes as UTF-8,
/// then `<type-name> -> <string form>`.
pub fn render(value: &StateValue) -> String {
    match value {
        StateValue::Null => "null".to_string(),
        StateValue::Str(_)
        | StateValue::List(_)
        | StateValue::Int(_)
        | StateValue::Long(_)
        | StateValue::Float(_) => value.to_string(),
        StateValue::Bytes(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        StateValue::Object(_) => match value.normalized() {
            Some(known) => render(&known),
            None => format!("{} -> {}", value.type_name(), value),
        },
        StateValue::Bool(_) | StateValue::Map(_) => {
            format!("{} -> {}", value.type_name(), value)
        }
    }
}
