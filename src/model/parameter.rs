use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterType {
    Choice,
    Boolean,
    String,
    Password,
    File,
    Text,
    Run,
    ListSubversionTags,
}

const ALL_PARAMETER_TYPES: [ParameterType; 8] = [
    ParameterType::Choice,
    ParameterType::Boolean,
    ParameterType::String,
    ParameterType::Password,
    ParameterType::File,
    ParameterType::Text,
    ParameterType::Run,
    ParameterType::ListSubversionTags,
];

impl ParameterType {
    pub fn type_name(&self) -> &'static str {
        match *self {
            ParameterType::Choice => "ChoiceParameterDefinition",
            ParameterType::Boolean => "BooleanParameterDefinition",
            ParameterType::String => "StringParameterDefinition",
            ParameterType::Password => "PasswordParameterDefinition",
            ParameterType::File => "FileParameterDefinition",
            ParameterType::Text => "TextParameterDefinition",
            ParameterType::Run => "RunParameterDefinition",
            ParameterType::ListSubversionTags => "ListSubversionTagsParameterDefinition",
        }
    }

    pub fn from_type_name(name: &str) -> Option<ParameterType> {
        ALL_PARAMETER_TYPES
            .iter()
            .find(|candidate| candidate.type_name() == name)
            .cloned()
    }

    /// Whether a front end can collect a value for this type.
    pub fn is_renderable(&self) -> bool {
        match *self {
            ParameterType::Choice
            | ParameterType::Boolean
            | ParameterType::String
            | ParameterType::Password => true,
            _ => false,
        }
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterDefinition {
    pub name: String,
    pub description: Option<String>,
    /// Raw type tag as sent by the server; kept so unknown types can be reported.
    pub raw_type: Option<String>,
    pub parameter_type: Option<ParameterType>,
    pub default_value: Option<String>,
    pub choices: Vec<String>,
}

impl ParameterDefinition {
    pub fn new(name: &str, raw_type: Option<&str>, default_value: Option<&str>, choices: &[&str]) -> ParameterDefinition {
        ParameterDefinition {
            name: name.to_string(),
            description: None,
            raw_type: raw_type.map(|t| t.to_string()),
            parameter_type: raw_type.and_then(ParameterType::from_type_name),
            default_value: default_value.map(|v| v.to_string()),
            choices: choices.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn is_supported(&self) -> bool {
        self.parameter_type.map(|t| t.is_renderable()).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_first_four_types_are_renderable() {
        let renderable: Vec<ParameterType> = ALL_PARAMETER_TYPES
            .iter()
            .cloned()
            .filter(|t| t.is_renderable())
            .collect();
        assert_eq!(
            renderable,
            vec![
                ParameterType::Choice,
                ParameterType::Boolean,
                ParameterType::String,
                ParameterType::Password
            ]
        );
    }

    #[test]
    fn unknown_type_names_are_kept_raw() {
        let definition = ParameterDefinition::new("run", Some("GitParameterDefinition"), Some("blah"), &[]);
        assert_eq!(definition.parameter_type, None);
        assert_eq!(definition.raw_type.as_ref().map(|t| t.as_str()), Some("GitParameterDefinition"));
        assert!(!definition.is_supported());
    }

    #[test]
    fn run_parameters_are_recognized_but_unsupported() {
        let definition = ParameterDefinition::new("run", Some("RunParameterDefinition"), None, &[]);
        assert_eq!(definition.parameter_type, Some(ParameterType::Run));
        assert!(!definition.is_supported());
    }
}
