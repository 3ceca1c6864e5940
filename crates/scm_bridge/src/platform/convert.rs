/// Strip null members from a JSON value, recursively.
///
/// Vendors send `null` for absent strings and optional objects alike. Removing
/// them before deserialization lets `#[serde(default)]` fields fall back to
/// their defaults and lets optional objects decode as `None`.
///
/// # Example
///
/// ```
/// use scm_bridge::platform::strip_null_values;
///
/// let json = serde_json::json!({
///     "RequestId": "abc123",
///     "Error": null,
///     "User": {"Email": null, "Name": "alice"},
/// });
/// let stripped = strip_null_values(json);
/// assert_eq!(
///     stripped,
///     serde_json::json!({"RequestId": "abc123", "User": {"Name": "alice"}})
/// );
/// ```
pub fn strip_null_values(value: serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(map) => {
            let filtered: serde_json::Map<String, serde_json::Value> = map
                .into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k, strip_null_values(v)))
                .collect();
            serde_json::Value::Object(filtered)
        }
        serde_json::Value::Array(arr) => {
            serde_json::Value::Array(arr.into_iter().map(strip_null_values).collect())
        }
        other => other,
    }
}
