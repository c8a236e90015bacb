//! Base64 codec for NITRO `filecontent` fields.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::error::AdcError;

/// Encoding marker NITRO expects alongside base64 file content.
pub const FILE_ENCODING: &str = "BASE64";

pub const OCTET_STREAM: &str = "application/octet-stream";

pub fn encode(bytes: &[u8]) -> String {
    BASE64.encode(bytes)
}

pub fn decode(encoded: &str) -> Result<Vec<u8>, AdcError> {
    BASE64
        .decode(encoded.trim())
        .map_err(|e| AdcError::MalformedBinaryData(e.to_string()))
}

/// Lower-cased extension of `file_name`, if it has one.
pub fn file_extension(file_name: &str) -> Option<String> {
    let base = file_name.rsplit('/').next().unwrap_or(file_name);
    match base.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => Some(ext.to_ascii_lowercase()),
        _ => None,
    }
}

pub fn guess_mime_type(file_name: &str) -> &'static str {
    let Some(ext) = file_extension(file_name) else {
        return OCTET_STREAM;
    };
    match ext.as_str() {
        "pem" | "crt" | "cer" => "application/x-x509-ca-cert",
        "der" => "application/x-x509-ca-cert",
        "key" => "application/x-pem-file",
        "csr" | "req" => "application/pkcs10",
        "p12" | "pfx" => "application/x-pkcs12",
        "txt" | "log" | "conf" | "cfg" => "text/plain",
        "json" => "application/json",
        "xml" => "application/xml",
        "html" | "htm" => "text/html",
        "zip" => "application/zip",
        "gz" | "tgz" => "application/gzip",
        "tar" => "application/x-tar",
        _ => OCTET_STREAM,
    }
}

/// `serde(with = ...)` adapter storing bytes as a base64 string.
pub mod serde_base64 {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        super::decode(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_rejects_invalid_base64() {
        let err = decode("not base64!!").unwrap_err();
        assert!(matches!(err, AdcError::MalformedBinaryData(_)));
    }

    #[test]
    fn extension_ignores_dotfiles_and_directories() {
        assert_eq!(file_extension("cert.PEM").as_deref(), Some("pem"));
        assert_eq!(file_extension("/nsconfig/ssl.d/readme"), None);
        assert_eq!(file_extension(".profile"), None);
        assert_eq!(file_extension("archive.tar.gz").as_deref(), Some("gz"));
    }

    #[test]
    fn mime_type_falls_back_to_octet_stream() {
        assert_eq!(guess_mime_type("ns-root.cert.pem"), "application/x-x509-ca-cert");
        assert_eq!(guess_mime_type("a.TXT"), "text/plain");
        assert_eq!(guess_mime_type("blob"), OCTET_STREAM);
        assert_eq!(guess_mime_type("x.unknownext"), OCTET_STREAM);
    }
}
