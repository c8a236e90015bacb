//! The boundary to the workflow engine that owns the batch.

mod expr;

use std::collections::BTreeMap;

use adc_core::{AdcError, BinaryData, InputItem};
use async_trait::async_trait;
use serde_json::{Map, Value as JsonValue};

pub use expr::resolve_value;

#[async_trait]
pub trait Host: Send + Sync {
    fn items(&self) -> &[InputItem];

    /// Value of parameter `name` for item `item_index`, already resolved by the host.
    fn parameter(&self, name: &str, item_index: usize) -> Option<JsonValue>;

    fn continue_on_fail(&self) -> bool;

    async fn binary_data_buffer(&self, item_index: usize, slot: &str) -> Result<Vec<u8>, AdcError> {
        self.items()
            .get(item_index)
            .and_then(|item| item.binary.as_ref())
            .and_then(|b| b.get(slot))
            .map(|b| b.data.clone())
            .ok_or_else(|| {
                AdcError::MissingBinaryData(format!(
                    "No binary data property \"{slot}\" exists on item!"
                ))
            })
    }

    fn prepare_binary_data(&self, data: Vec<u8>, file_name: Option<String>) -> BinaryData {
        BinaryData::from_bytes(data, file_name)
    }
}

/// In-memory host: a fixed batch plus parameters shared by every item, with
/// optional per-item overrides. String parameters may reference the current
/// item's attributes as `{$json.<path>}`.
#[derive(Debug, Clone, Default)]
pub struct StaticHost {
    items: Vec<InputItem>,
    parameters: Map<String, JsonValue>,
    item_parameters: BTreeMap<usize, Map<String, JsonValue>>,
    continue_on_fail: bool,
}

impl StaticHost {
    pub fn new(items: Vec<InputItem>) -> Self {
        Self {
            items,
            ..Default::default()
        }
    }

    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    pub fn with_parameters(mut self, parameters: Map<String, JsonValue>) -> Self {
        self.parameters.extend(parameters);
        self
    }

    pub fn with_item_parameter(
        mut self,
        item_index: usize,
        name: impl Into<String>,
        value: impl Into<JsonValue>,
    ) -> Self {
        self.item_parameters
            .entry(item_index)
            .or_default()
            .insert(name.into(), value.into());
        self
    }

    pub fn with_continue_on_fail(mut self, enabled: bool) -> Self {
        self.continue_on_fail = enabled;
        self
    }
}

#[async_trait]
impl Host for StaticHost {
    fn items(&self) -> &[InputItem] {
        &self.items
    }

    fn parameter(&self, name: &str, item_index: usize) -> Option<JsonValue> {
        let raw = self
            .item_parameters
            .get(&item_index)
            .and_then(|m| m.get(name))
            .or_else(|| self.parameters.get(name))?;
        match self.items.get(item_index) {
            Some(item) => Some(resolve_value(raw, &item.json)),
            None => Some(raw.clone()),
        }
    }

    fn continue_on_fail(&self) -> bool {
        self.continue_on_fail
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn items() -> Vec<InputItem> {
        vec![
            InputItem::from_json(json!({"name": "a.pem"}).as_object().cloned().unwrap()),
            InputItem::from_json(json!({"name": "b.pem"}).as_object().cloned().unwrap())
                .with_binary("data", BinaryData::from_bytes(b"xyz".to_vec(), Some("b.pem".into()))),
        ]
    }

    #[test]
    fn item_override_wins_over_shared_parameter() {
        let host = StaticHost::new(items())
            .with_parameter("fileLocation", "/nsconfig/ssl/")
            .with_item_parameter(1, "fileLocation", "/var/tmp/");
        assert_eq!(host.parameter("fileLocation", 0), Some(json!("/nsconfig/ssl/")));
        assert_eq!(host.parameter("fileLocation", 1), Some(json!("/var/tmp/")));
        assert_eq!(host.parameter("missing", 0), None);
    }

    #[test]
    fn parameters_reference_the_current_item() {
        let host = StaticHost::new(items()).with_parameter("fileName", "{$json.name}");
        assert_eq!(host.parameter("fileName", 0), Some(json!("a.pem")));
        assert_eq!(host.parameter("fileName", 1), Some(json!("b.pem")));
    }

    #[tokio::test]
    async fn binary_buffer_reads_named_slot() {
        let host = StaticHost::new(items());
        assert_eq!(host.binary_data_buffer(1, "data").await.unwrap(), b"xyz");
        let err = host.binary_data_buffer(0, "data").await.unwrap_err();
        assert!(matches!(err, AdcError::MissingBinaryData(_)));
    }
}
