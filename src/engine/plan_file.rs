//! Plan file management.
//!
//! Writes the recorded [`Plan`] as JSON so a run can be inspected or diffed
//! later, and reads it back.

use super::Plan;
use chrono_tz::Tz;
use std::error::Error;
use std::path::Path;

/// Default plan file name for today's date in the given time zone.
pub fn plan_file_name(timezone: &str) -> Result<String, Box<dyn Error>> {
    let tz: Tz = timezone
        .parse()
        .map_err(|e| format!("Invalid timezone {timezone}: {e}"))?;
    let now = chrono::Utc::now().with_timezone(&tz);
    Ok(format!("topology_plan_{}.json", now.format("%Y-%m-%d")))
}

/// Write `plan` to `plan_file`, or to the dated default name.
///
/// # Returns
/// * `Ok(String)` - The path that was written
pub fn write_plan(
    plan: &Plan,
    plan_file: Option<&str>,
    timezone: &str,
) -> Result<String, Box<dyn Error>> {
    let plan_file = match plan_file {
        Some(file) => file.to_string(),
        None => plan_file_name(timezone)?,
    };

    if Path::new(&plan_file).exists() {
        log::warn!("Overwriting plan file: {plan_file}");
    }
    let json =
        serde_json::to_string_pretty(plan).map_err(|e| format!("Error serializing plan: {e}"))?;
    std::fs::write(&plan_file, json)
        .map_err(|e| format!("Error writing plan file {plan_file}: {e}"))?;
    log::info!(
        "Wrote {} resources and {} outputs to {plan_file}",
        plan.resources.len(),
        plan.outputs.len()
    );
    Ok(plan_file)
}

/// Read a plan written by [`write_plan`].
pub fn read_plan(plan_file: &str) -> Result<Plan, Box<dyn Error>> {
    if !Path::new(plan_file).exists() {
        return Err(format!("Plan file does not exist: {plan_file}").into());
    }
    let json = std::fs::read_to_string(plan_file)?;
    let mut deserializer = serde_json::Deserializer::from_str(&json);
    let plan: Plan = serde_path_to_error::deserialize(&mut deserializer)
        .map_err(|e| format!("Error parsing plan {plan_file}: path={} error={e}", e.path()))?;
    Ok(plan)
}
