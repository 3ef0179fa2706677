//! Terraform state validation
//!
//! A backup is only restored if it still looks like a Terraform state
//! document. Restoring garbage over the live state would turn a failed
//! apply into a lost stack.

use serde_json::Value;
use sha2::{Digest, Sha256};

/// Facts extracted from a valid state document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSummary {
    pub version: u64,
    pub terraform_version: String,
    pub serial: u64,
    pub lineage: Option<String>,
    pub resource_count: usize,
    pub sha256: String,
    pub warnings: Vec<String>,
}

/// Validate raw state bytes, returning a summary or the reason they are
/// not a usable state.
pub fn validate_state(content: &[u8]) -> Result<StateSummary, String> {
    let doc: Value =
        serde_json::from_slice(content).map_err(|e| format!("not valid JSON: {}", e))?;
    let obj = doc
        .as_object()
        .ok_or_else(|| "top-level value is not an object".to_string())?;

    let missing: Vec<&str> = ["version", "terraform_version", "serial"]
        .into_iter()
        .filter(|field| !obj.contains_key(*field))
        .collect();
    if !missing.is_empty() {
        return Err(format!("missing required fields: {}", missing.join(", ")));
    }

    let version = obj["version"]
        .as_u64()
        .ok_or_else(|| "'version' is not a non-negative integer".to_string())?;
    let serial = obj["serial"]
        .as_u64()
        .ok_or_else(|| "'serial' is not a non-negative integer".to_string())?;
    let terraform_version = obj["terraform_version"]
        .as_str()
        .ok_or_else(|| "'terraform_version' is not a string".to_string())?
        .to_string();

    let mut warnings = Vec::new();
    if version < 3 {
        warnings.push(format!("legacy state format (version {})", version));
    }

    let lineage = obj.get("lineage").and_then(Value::as_str).map(str::to_string);
    if lineage.is_none() {
        warnings.push("missing lineage".to_string());
    }

    let resource_count = match obj.get("resources") {
        None => 0,
        Some(Value::Array(items)) => items.len(),
        Some(_) => return Err("'resources' is not an array".to_string()),
    };

    Ok(StateSummary {
        version,
        terraform_version,
        serial,
        lineage,
        resource_count,
        sha256: format!("{:x}", Sha256::digest(content)),
        warnings,
    })
}
