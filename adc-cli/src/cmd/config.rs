use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use adc_core::{binary, BinaryData, InputItem};
use adc_exec::{AdcCredentials, StaticHost, TransportConfig};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value as JsonValue};

use crate::{ApplianceArgs, OperationArgs};

#[derive(Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct BatchItem {
    #[serde(default)]
    json: Map<String, JsonValue>,
    #[serde(default)]
    binary: BTreeMap<String, BinarySource>,
}

/// A binary slot in a batch file: inline base64 `data`, or a `path` relative to the batch file.
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct BinarySource {
    file_name: Option<String>,
    mime_type: Option<String>,
    data: Option<String>,
    path: Option<PathBuf>,
}

fn load_document<T: DeserializeOwned>(path: &Path) -> Result<T, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    if let Ok(v) = serde_json::from_str(&content) {
        return Ok(v);
    }
    serde_yaml::from_str(&content)
        .map_err(|e| format!("{} is neither valid JSON nor YAML: {e}", path.display()))
}

pub fn load_batch(path: &Path) -> Result<Vec<InputItem>, String> {
    let raw: Vec<BatchItem> = load_document(path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));

    raw.into_iter()
        .enumerate()
        .map(|(i, item)| {
            let mut input = InputItem::from_json(item.json);
            for (slot, src) in item.binary {
                let data = read_binary_source(base_dir, &src)
                    .map_err(|e| format!("item {i}, binary \"{slot}\": {e}"))?;
                input = input.with_binary(slot, data);
            }
            Ok(input)
        })
        .collect()
}

fn read_binary_source(base_dir: &Path, src: &BinarySource) -> Result<BinaryData, String> {
    let (bytes, default_name) = match (&src.data, &src.path) {
        (Some(data), None) => (binary::decode(data).map_err(|e| e.to_string())?, None),
        (None, Some(p)) => {
            let full = base_dir.join(p);
            let bytes = std::fs::read(&full)
                .map_err(|e| format!("failed to read {}: {e}", full.display()))?;
            let name = p.file_name().map(|n| n.to_string_lossy().into_owned());
            (bytes, name)
        }
        _ => return Err("exactly one of `data` or `path` is required".to_string()),
    };

    let mut data = BinaryData::from_bytes(bytes, src.file_name.clone().or(default_name));
    if let Some(m) = &src.mime_type {
        data.mime_type = m.clone();
    }
    Ok(data)
}

/// Parses `KEY=VALUE` pairs; VALUE is taken as JSON when it parses, otherwise as a string.
pub fn parse_set_params(set_params: &[String]) -> Result<Map<String, JsonValue>, String> {
    let mut out = Map::new();
    for s in set_params {
        let (k, v) = s
            .split_once('=')
            .ok_or_else(|| format!("expected KEY=VALUE, got \"{s}\""))?;
        let value = serde_json::from_str(v).unwrap_or_else(|_| JsonValue::String(v.to_string()));
        out.insert(k.to_string(), value);
    }
    Ok(out)
}

pub fn build_host(
    items: Vec<InputItem>,
    op: &OperationArgs,
    continue_on_fail: bool,
) -> Result<StaticHost, String> {
    let mut params = match &op.params {
        Some(p) => load_document::<Map<String, JsonValue>>(p)?,
        None => Map::new(),
    };
    params.extend(parse_set_params(&op.set_params)?);
    params.insert("resource".to_string(), op.resource.clone().into());
    if let Some(o) = &op.operation {
        params.insert("operation".to_string(), o.clone().into());
    }

    Ok(StaticHost::new(items)
        .with_parameters(params)
        .with_continue_on_fail(continue_on_fail))
}

pub fn build_transport_config(appliance: &ApplianceArgs) -> Result<TransportConfig, String> {
    let password = std::env::var(&appliance.password_env).map_err(|_| {
        format!(
            "missing password. Set the {} environment variable",
            appliance.password_env
        )
    })?;
    let mut credentials = AdcCredentials::new(&appliance.url, &appliance.username, password);
    credentials.allow_unauthorized_certs = appliance.allow_unauthorized_certs;

    let mut config = TransportConfig::new(credentials);
    config.timeout = Duration::from_millis(appliance.timeout);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn set_params_parse_json_values() {
        let m = parse_set_params(&[
            "fileName=ns.cert".to_string(),
            "additionalFields={\"days\":30}".to_string(),
            "caSerialFileNumber=42".to_string(),
        ])
        .unwrap();
        assert_eq!(m["fileName"], json!("ns.cert"));
        assert_eq!(m["additionalFields"], json!({"days": 30}));
        assert_eq!(m["caSerialFileNumber"], json!(42));
        assert!(parse_set_params(&["novalue".to_string()]).is_err());
    }

    #[test]
    fn batch_reads_inline_and_on_disk_binaries() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ns.pem"), b"PEM").unwrap();
        let batch = dir.path().join("batch.yaml");
        std::fs::write(
            &batch,
            r#"
- json: { name: first }
  binary:
    data: { path: ns.pem }
- json: { name: second }
  binary:
    data: { data: aGVsbG8=, fileName: hello.txt }
- json: { name: third }
"#,
        )
        .unwrap();

        let items = load_batch(&batch).unwrap();
        assert_eq!(items.len(), 3);
        let first = &items[0].binary.as_ref().unwrap()["data"];
        assert_eq!(first.data, b"PEM");
        assert_eq!(first.file_name.as_deref(), Some("ns.pem"));
        let second = &items[1].binary.as_ref().unwrap()["data"];
        assert_eq!(second.data, b"hello");
        assert_eq!(second.mime_type, "text/plain");
        assert!(items[2].binary.is_none());
        assert_eq!(items[2].json["name"], "third");
    }

    #[test]
    fn batch_of_plain_objects_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let batch = dir.path().join("batch.json");
        std::fs::write(&batch, r#"[{"name": "a.pem"}]"#).unwrap();

        let err = load_batch(&batch).unwrap_err();
        assert!(err.contains("unknown field"), "{err}");
    }

    #[test]
    fn binary_source_needs_exactly_one_origin() {
        let src = BinarySource {
            file_name: None,
            mime_type: None,
            data: None,
            path: None,
        };
        assert!(read_binary_source(Path::new("."), &src).is_err());
    }
}
