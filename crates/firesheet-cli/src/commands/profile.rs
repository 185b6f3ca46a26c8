use firesheet_core::error::ConvertError;
use firesheet_core::profile::{builtin, load_profile, Profile};
use std::path::Path;

use super::resolve_profile;

pub fn show(file: Option<&Path>) -> Result<(), ConvertError> {
    let profile = resolve_profile(file)?;
    if file.is_none() {
        println!("Builtin presets: {}\n", builtin::PRESETS.join(", "));
    }
    print_profile(&profile);
    Ok(())
}

pub fn validate(file: &Path) -> Result<(), ConvertError> {
    let profile = load_profile(file)?;
    println!(
        "Valid profile: {} (v{}), {} categories, {} units, {} technical fields",
        profile.name,
        profile.version,
        profile.categories.len(),
        profile.units.len(),
        profile.technical_specs.len()
    );
    Ok(())
}

fn print_profile(profile: &Profile) {
    println!("{} (version {})\n", profile.name, profile.version);

    println!("Categories (first match wins):");
    let width = profile
        .categories
        .iter()
        .map(|c| c.name.len())
        .max()
        .unwrap_or(10);
    for (i, category) in profile.categories.iter().enumerate() {
        println!(
            "  {:>2}. {:<width$}  {}",
            i + 1,
            category.name,
            category.keywords.join(", "),
            width = width
        );
    }

    println!("\nUnits (scan order): {}", profile.units.join(", "));

    println!("\nModel number patterns:");
    for re in &profile.model_patterns {
        println!("  {}", re.as_str());
    }

    println!("\nProduct types: {}", profile.product_types.join(", "));

    println!("\nTechnical specifications:");
    for spec in &profile.technical_specs {
        println!("  {:<20} {}", spec.field, spec.pattern.as_str());
    }

    println!("\nCompliance patterns:");
    for re in &profile.standards {
        println!("  {}", re.as_str());
    }

    println!("\nFeatures: {}", profile.features.join(", "));
}
