use firesheet_core::error::ConvertError;
use serde::Serialize;

pub fn print<T: Serialize>(value: &T) -> Result<(), ConvertError> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}
