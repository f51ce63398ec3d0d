use errors::JenkinsError;
use model::{Job, ParameterDefinition, ParameterType};
use std::collections::BTreeMap;

/// Resolves the value of every parameter of `job` from `inputs`, falling back to defaults.
///
/// Only the renderable parameter types can be collected. Any other type, known
/// or not, fails the whole collection with `UnsupportedParameterType`.
pub fn collect_parameter_values(
    job: &Job,
    inputs: &BTreeMap<String, String>,
) -> Result<BTreeMap<String, String>, JenkinsError> {
    let mut values = BTreeMap::new();
    for definition in &job.parameters {
        let parameter_type = supported_type(definition)?;
        let raw_value = inputs
            .get(&definition.name)
            .or_else(|| definition.default_value.as_ref());
        let raw_value = match raw_value {
            Some(value) => value,
            None => {
                return Err(JenkinsError::configuration(format!(
                    "Missing value for required job parameter '{}' of {}",
                    definition.name,
                    job.display()
                )))
            }
        };
        let value = match parameter_type {
            ParameterType::Boolean => normalize_boolean(&definition.name, raw_value)?,
            ParameterType::Choice => ensure_choice(definition, raw_value)?,
            _ => raw_value.clone(),
        };
        values.insert(definition.name.clone(), value);
    }
    Ok(values)
}

fn supported_type(definition: &ParameterDefinition) -> Result<ParameterType, JenkinsError> {
    match definition.parameter_type {
        Some(parameter_type) if parameter_type.is_renderable() => Ok(parameter_type),
        _ => Err(JenkinsError::UnsupportedParameterType {
            name: definition.name.clone(),
            parameter_type: definition
                .raw_type
                .clone()
                .unwrap_or_else(|| "unknown".to_string()),
        }),
    }
}

fn normalize_boolean(name: &str, value: &str) -> Result<String, JenkinsError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok("true".to_string()),
        "false" | "no" | "off" | "0" | "" => Ok("false".to_string()),
        other => Err(JenkinsError::configuration(format!(
            "Parameter '{}' expects a boolean, got '{}'",
            name, other
        ))),
    }
}

fn ensure_choice(definition: &ParameterDefinition, value: &str) -> Result<String, JenkinsError> {
    if definition.choices.iter().any(|choice| choice == value) {
        Ok(value.to_string())
    } else {
        Err(JenkinsError::configuration(format!(
            "'{}' is not a valid choice for parameter '{}' (expected one of: {})",
            value,
            definition.name,
            definition.choices.join(", ")
        )))
    }
}
