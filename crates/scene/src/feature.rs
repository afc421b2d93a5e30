use serde_json::{Map, Value, json};

use crate::SceneError;

/// Parameters of one enabled feature.
pub type FeatureConfig = Map<String, Value>;

pub const DIRECTIONAL_LIGHT: &str = "directional_light";

/// Makes other scenes follow this scene's rotation.
pub const LINK_ROTATION: &str = "link_rotation";

/// The lights every scene starts with: three directions whose lengths are
/// their intensities.
pub fn default_directional_lights() -> Value {
    json!([
        [0.4, -0.4, -0.4],
        [-0.25, -0.0625, -0.25],
        [0.0, 0.125, -0.125]
    ])
}

/// Merge `auto_value` into `parameters` under `"value"`. A null
/// `auto_value` counts as absent.
pub(crate) fn parameters(
    name: &str,
    auto_value: Option<Value>,
    mut parameters: FeatureConfig,
) -> Result<FeatureConfig, SceneError> {
    if parameters.contains_key("name") {
        return Err(SceneError::InvalidFeature {
            name: name.to_string(),
            reason: "parameters can't be named \"name\"".to_string(),
        });
    }
    if let Some(value) = auto_value.filter(|v| !v.is_null()) {
        parameters.insert("value".to_string(), value);
    }
    Ok(parameters)
}

/// Interpret a constructor feature entry: objects are parameter maps,
/// anything else is a single value.
pub(crate) fn from_value(name: &str, value: Value) -> Result<FeatureConfig, SceneError> {
    match value {
        Value::Object(map) => parameters(name, None, map),
        other => parameters(name, Some(other), Map::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_value_overrides_value_parameter() {
        let mut given = Map::new();
        given.insert("value".into(), json!("discard"));
        given.insert("another_value".into(), Value::Null);
        let config = parameters("test3", Some(json!("auto_value")), given).unwrap();
        assert_eq!(
            Value::Object(config),
            json!({"value": "auto_value", "another_value": null})
        );
    }

    #[test]
    fn scalars_become_value_entries() {
        assert_eq!(
            Value::Object(from_value("foo", json!(7)).unwrap()),
            json!({"value": 7})
        );
        assert_eq!(
            Value::Object(from_value("foo", json!({"bar": "baz"})).unwrap()),
            json!({"bar": "baz"})
        );
        assert!(from_value("foo", Value::Null).unwrap().is_empty());
    }

    #[test]
    fn name_parameter_rejected() {
        let err = from_value("foo", json!({"name": "x"})).unwrap_err();
        assert!(matches!(err, SceneError::InvalidFeature { .. }));
    }
}
