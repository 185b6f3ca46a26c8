use crate::error::ConvertError;
use crate::profile::{compile, Profile};

const FIRE_DETECTION_JSON: &str = include_str!("../../../../profiles/fire-detection.json");

/// Available predefined profiles.
pub const PRESETS: &[&str] = &["fire-detection"];

/// Name of the profile used when none is given.
pub const DEFAULT_PRESET: &str = "fire-detection";

/// Raw JSON of a predefined profile.
pub fn preset_json(name: &str) -> Result<&'static str, ConvertError> {
    match name {
        "fire-detection" => Ok(FIRE_DETECTION_JSON),
        _ => Err(ConvertError::ProfileInvalid(format!(
            "unknown preset '{}'. Available: {}",
            name,
            PRESETS.join(", ")
        ))),
    }
}

/// Load and compile a predefined profile by name.
pub fn load_preset(name: &str) -> Result<Profile, ConvertError> {
    let def = serde_json::from_str(preset_json(name)?)?;
    compile(def)
}

/// The default fire detection profile.
pub fn default_profile() -> Result<Profile, ConvertError> {
    load_preset(DEFAULT_PRESET)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_default_preset() {
        let profile = default_profile().unwrap();
        assert_eq!(profile.categories.len(), 8);
        assert_eq!(profile.categories[0].name, "Smoke Detectors");
        assert_eq!(profile.categories[7].name, "System Components");
        assert_eq!(profile.units[0], "nos");
        assert_eq!(profile.units[1], "no");
        assert_eq!(profile.technical_specs.len(), 8);
        assert_eq!(profile.features.len(), 15);
    }

    #[test]
    fn test_unknown_preset() {
        assert!(load_preset("sprinklers").is_err());
    }
}
