const IMAGE_SUFFIXES: [&str; 2] = [".png", ".gif"];

/// Stability score reported by Jenkins, e.g. level `health-80plus`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Health {
    pub level: String,
    pub description: Option<String>,
}

impl Health {
    /// Builds a health from a raw icon identifier. An empty level after stripping means no health.
    pub fn from_icon(icon: Option<&str>, description: Option<String>) -> Option<Health> {
        let level = strip_health_suffix(icon.unwrap_or(""));
        if level.is_empty() {
            return None;
        }
        Some(Health {
            level: level.to_string(),
            description: description,
        })
    }

    pub fn icon_name(health: Option<&Health>) -> &str {
        match health {
            Some(health) => health.level.as_str(),
            None => "null",
        }
    }
}

pub fn strip_health_suffix(icon: &str) -> &str {
    IMAGE_SUFFIXES
        .iter()
        .find(|suffix| icon.ends_with(*suffix))
        .map(|suffix| &icon[..icon.len() - suffix.len()])
        .unwrap_or(icon)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_image_suffixes() {
        assert_eq!(strip_health_suffix("health-80plus.png"), "health-80plus");
        assert_eq!(strip_health_suffix("health-00to19.gif"), "health-00to19");
        assert_eq!(strip_health_suffix("health-40to59"), "health-40to59");
        assert_eq!(strip_health_suffix(""), "");
    }

    #[test]
    fn empty_level_is_absent_health() {
        assert_eq!(Health::from_icon(Some(""), Some("nothing".to_string())), None);
        assert_eq!(Health::from_icon(Some(".png"), None), None);
        assert_eq!(Health::from_icon(None, None), None);
    }

    #[test]
    fn icon_name_defaults_to_null() {
        let health = Health::from_icon(Some("health-60to79.png"), None);
        assert_eq!(Health::icon_name(health.as_ref()), "health-60to79");
        assert_eq!(Health::icon_name(None), "null");
    }
}
