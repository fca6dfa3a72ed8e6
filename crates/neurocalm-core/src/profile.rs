//! Account profile and assistant preferences.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssistantPersonality {
    Calm,
    #[default]
    Friendly,
    Humorous,
    Professional,
}

impl AssistantPersonality {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssistantPersonality::Calm => "calm",
            AssistantPersonality::Friendly => "friendly",
            AssistantPersonality::Humorous => "humorous",
            AssistantPersonality::Professional => "professional",
        }
    }
}

impl std::fmt::Display for AssistantPersonality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AssistantPersonality {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "calm" => Ok(AssistantPersonality::Calm),
            "friendly" => Ok(AssistantPersonality::Friendly),
            "humorous" => Ok(AssistantPersonality::Humorous),
            "professional" => Ok(AssistantPersonality::Professional),
            other => Err(ValidationError::InvalidValue {
                field: "assistantPersonality".into(),
                message: format!("unknown personality '{other}'"),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Gender {
    Male,
    Female,
    Other,
    PreferNotToSay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyType {
    Ectomorph,
    Mesomorph,
    Endomorph,
}

/// User profile kept in the `[profile]` config section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub assistant_personality: AssistantPersonality,
    #[serde(default)]
    pub weight_kg: Option<f64>,
    #[serde(default)]
    pub height_cm: Option<f64>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub body_type: Option<BodyType>,
    #[serde(default)]
    pub language: Option<String>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: "Jamie Appleseed".into(),
            email: "jamie@neurocalm.ai".into(),
            phone: Some("123-456-7890".into()),
            assistant_personality: AssistantPersonality::Friendly,
            weight_kg: Some(70.0),
            height_cm: Some(175.0),
            age: Some(30),
            gender: Some(Gender::PreferNotToSay),
            region: Some("us-west".into()),
            body_type: Some(BodyType::Mesomorph),
            language: Some("en".into()),
        }
    }
}

const NAME_MIN_CHARS: usize = 2;

fn looks_like_email(s: &str) -> bool {
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !s.chars().any(char::is_whitespace)
}

fn positive(field: &str, value: Option<f64>) -> Result<(), ValidationError> {
    match value {
        Some(v) if !(v > 0.0) => Err(ValidationError::NotPositive {
            field: field.into(),
        }),
        _ => Ok(()),
    }
}

impl Profile {
    /// Check every field, reporting the first violation.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().chars().count() < NAME_MIN_CHARS {
            return Err(ValidationError::TooShort {
                field: "name".into(),
                min: NAME_MIN_CHARS,
            });
        }
        if !looks_like_email(&self.email) {
            return Err(ValidationError::InvalidValue {
                field: "email".into(),
                message: format!("'{}' is not an email address", self.email),
            });
        }
        positive("weightKg", self.weight_kg)?;
        positive("heightCm", self.height_cm)?;
        if self.age == Some(0) {
            return Err(ValidationError::NotPositive {
                field: "age".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_profile_is_valid() {
        assert_eq!(Profile::default().validate(), Ok(()));
    }

    #[test]
    fn short_name_rejected() {
        let p = Profile {
            name: "J".into(),
            ..Profile::default()
        };
        assert_eq!(
            p.validate(),
            Err(ValidationError::TooShort {
                field: "name".into(),
                min: 2
            })
        );
    }

    #[test]
    fn bad_email_rejected() {
        for email in ["jamie", "@neurocalm.ai", "jamie@localhost", "ja mie@x.io", "a@b@c.io"] {
            let p = Profile {
                email: email.into(),
                ..Profile::default()
            };
            assert!(p.validate().is_err(), "{email} should be rejected");
        }
    }

    #[test]
    fn non_positive_measurements_rejected() {
        let p = Profile {
            weight_kg: Some(0.0),
            ..Profile::default()
        };
        assert!(matches!(p.validate(), Err(ValidationError::NotPositive { .. })));
        let p = Profile {
            age: Some(0),
            ..Profile::default()
        };
        assert!(matches!(p.validate(), Err(ValidationError::NotPositive { .. })));
        let p = Profile {
            height_cm: Some(f64::NAN),
            ..Profile::default()
        };
        assert!(p.validate().is_err());
    }

    #[test]
    fn personality_parses_case_insensitively() {
        assert_eq!("Calm".parse::<AssistantPersonality>(), Ok(AssistantPersonality::Calm));
        assert!("grumpy".parse::<AssistantPersonality>().is_err());
    }

    #[test]
    fn gender_serializes_kebab_case() {
        let json = serde_json::to_value(Gender::PreferNotToSay).unwrap();
        assert_eq!(json, "prefer-not-to-say");
    }
}
