use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::MonitorError;

/// Raw attribute map of a managed object as reported by the fabric.
pub type Attributes = Map<String, Value>;

/// A single entry of a class query, reduced to its identity and attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct ManagedObject {
    pub dn: String,
    pub attributes: Attributes,
}

#[derive(Deserialize)]
struct ClassQueryResponse {
    imdata: Vec<Value>,
}

/// Parses the body of a class query.
///
/// The outer `Result` fails when the body itself is unusable. Each entry is parsed on its own
/// so one malformed object only costs that object.
pub fn parse_class_response(
    class: &str,
    body: &str,
) -> Result<Vec<Result<ManagedObject, MonitorError>>, MonitorError> {
    let response: ClassQueryResponse =
        serde_json::from_str(body).map_err(|e| MonitorError::Parse {
            class: class.to_string(),
            reason: e.to_string(),
        })?;

    Ok(response
        .imdata
        .into_iter()
        .map(|entry| managed_object_from_entry(class, entry))
        .collect())
}

// Entries look like {"<class>": {"attributes": {...}}}.
fn managed_object_from_entry(class: &str, mut entry: Value) -> Result<ManagedObject, MonitorError> {
    let attributes = match entry
        .get_mut(class)
        .and_then(|mo| mo.get_mut("attributes"))
        .map(Value::take)
    {
        Some(Value::Object(attributes)) => attributes,
        _ => return Err(MonitorError::missing(&format!("{class}.attributes"))),
    };

    let dn = attributes
        .get("dn")
        .and_then(Value::as_str)
        .ok_or_else(|| MonitorError::missing("dn"))?
        .to_string();

    Ok(ManagedObject { dn, attributes })
}

/// Reads an attribute as text, accepting numbers as well as strings.
pub fn attribute_text(attributes: &Attributes, field: &str) -> Result<String, MonitorError> {
    match attributes.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        _ => Err(MonitorError::missing(field)),
    }
}
