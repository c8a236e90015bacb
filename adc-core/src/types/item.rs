use std::collections::BTreeMap;

use serde_json::{Map, Value as JsonValue};

/// A binary attachment carried next to an item's JSON attributes.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinaryData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,

    #[serde(default = "default_mime_type")]
    pub mime_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_extension: Option<String>,

    /// Raw bytes; base64 on the wire.
    #[serde(with = "crate::binary::serde_base64")]
    pub data: Vec<u8>,
}

fn default_mime_type() -> String {
    crate::binary::OCTET_STREAM.to_string()
}

impl BinaryData {
    /// Builds an attachment, inferring mime type and extension from the file name.
    pub fn from_bytes(data: Vec<u8>, file_name: Option<String>) -> Self {
        let (mime_type, file_extension) = match file_name.as_deref() {
            Some(name) => (
                crate::binary::guess_mime_type(name).to_string(),
                crate::binary::file_extension(name),
            ),
            None => (default_mime_type(), None),
        };
        Self {
            file_name,
            mime_type,
            file_extension,
            data,
        }
    }
}

/// One record of the input batch.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct InputItem {
    #[serde(default)]
    pub json: Map<String, JsonValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binary: Option<BTreeMap<String, BinaryData>>,
}

impl InputItem {
    pub fn from_json(json: Map<String, JsonValue>) -> Self {
        Self { json, binary: None }
    }

    pub fn with_binary(mut self, slot: impl Into<String>, data: BinaryData) -> Self {
        self.binary
            .get_or_insert_with(BTreeMap::new)
            .insert(slot.into(), data);
        self
    }
}

/// One record of the output batch, tagged with the index of the input item it came from.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputItem {
    pub json: JsonValue,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binary: Option<BTreeMap<String, BinaryData>>,

    pub paired_item: usize,
}

impl OutputItem {
    pub fn success(paired_item: usize) -> Self {
        Self {
            json: serde_json::json!({ "success": true }),
            binary: None,
            paired_item,
        }
    }

    pub fn error(paired_item: usize, message: impl Into<String>) -> Self {
        Self {
            json: serde_json::json!({ "error": message.into() }),
            binary: None,
            paired_item,
        }
    }

    pub fn with_binary(
        json: JsonValue,
        slot: impl Into<String>,
        data: BinaryData,
        paired_item: usize,
    ) -> Self {
        let mut binary = BTreeMap::new();
        binary.insert(slot.into(), data);
        Self {
            json,
            binary: Some(binary),
            paired_item,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        self.json.get("error").and_then(JsonValue::as_str)
    }

    pub fn is_error(&self) -> bool {
        self.error_message().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_data_serializes_bytes_as_base64() {
        let b = BinaryData::from_bytes(b"hello".to_vec(), Some("a.txt".into()));
        let v = serde_json::to_value(&b).unwrap();
        assert_eq!(v["data"], "aGVsbG8=");
        assert_eq!(v["fileName"], "a.txt");
        assert_eq!(v["mimeType"], "text/plain");
        assert_eq!(v["fileExtension"], "txt");

        let back: BinaryData = serde_json::from_value(v).unwrap();
        assert_eq!(back, b);
    }

    #[test]
    fn extension_is_lower_cased() {
        let b = BinaryData::from_bytes(b"-----BEGIN".to_vec(), Some("ns.PEM".into()));
        assert_eq!(b.file_extension.as_deref(), Some("pem"));
        assert_eq!(b.mime_type, "application/x-x509-ca-cert");
    }

    #[test]
    fn input_item_deserializes_without_binary() {
        let item: InputItem = serde_json::from_str(r#"{"json":{"a":1}}"#).unwrap();
        assert_eq!(item.json["a"], 1);
        assert!(item.binary.is_none());
    }

    #[test]
    fn error_output_exposes_message() {
        let out = OutputItem::error(3, "boom");
        assert!(out.is_error());
        assert_eq!(out.error_message(), Some("boom"));
        assert_eq!(out.paired_item, 3);
        assert!(!OutputItem::success(0).is_error());
    }
}
