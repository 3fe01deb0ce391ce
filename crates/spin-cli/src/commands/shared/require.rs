use anyhow::bail;
use serde_json::Value;

/// A field counts as present only when it is a non-empty string.
pub fn string_field<'a>(document: &'a Value, field: &str) -> Option<&'a str> {
    document
        .get(field)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
}

/// Fail with `Required <entity> parameter '<field>' missing` for the first
/// absent field.
pub fn require_fields(document: &Value, entity: &str, fields: &[&str]) -> anyhow::Result<()> {
    for field in fields {
        if string_field(document, field).is_none() {
            bail!("Required {entity} parameter '{field}' missing");
        }
    }
    Ok(())
}
