use serde_json::Value;

use crate::error::MonitorError;
use crate::kernel::managed_object::Attributes;

pub const TX_PACKETS: &str = "totTxP";
pub const RX_PACKETS: &str = "totRxP";

/// Fixed reporting policy: any transmitted or received packet on a known counter is
/// reportable. The policy is the same for every object class.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThresholdEvaluator;

impl ThresholdEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// Both counters must be present and numeric before either is compared.
    pub fn exceeds(&self, _object_class: &str, attributes: &Attributes) -> Result<bool, MonitorError> {
        let tx = numeric_field(attributes, TX_PACKETS)?;
        let rx = numeric_field(attributes, RX_PACKETS)?;
        Ok(tx > 0.0 || rx > 0.0)
    }
}

/// Counters arrive as strings ("5") from the controller but plain numbers are accepted too.
pub fn numeric_field(attributes: &Attributes, field: &str) -> Result<f64, MonitorError> {
    let value = match attributes.get(field) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(other) => {
            return Err(MonitorError::NonNumeric {
                field: field.to_string(),
                value: other.to_string(),
            })
        }
        None => return Err(MonitorError::missing(field)),
    };

    match value {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(MonitorError::NonNumeric {
            field: field.to_string(),
            value: attributes.get(field).map(Value::to_string).unwrap_or_default(),
        }),
    }
}
