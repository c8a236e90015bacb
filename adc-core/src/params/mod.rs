//! Typed per-operation parameters, resolved from a host's parameter lookup.

use serde_json::{Map, Value as JsonValue};

use crate::error::AdcError;
use crate::types::{CertificateFormat, CertificateSigning, CertificateType};

pub const DEFAULT_FILE_LOCATION: &str = "/nsconfig/ssl/";
pub const DEFAULT_BINARY_PROPERTY: &str = "data";

/// Read access to the parameters of one item.
pub struct ParamReader<'a> {
    lookup: &'a dyn Fn(&str) -> Option<JsonValue>,
}

impl<'a> ParamReader<'a> {
    pub fn new(lookup: &'a dyn Fn(&str) -> Option<JsonValue>) -> Self {
        Self { lookup }
    }

    pub fn raw(&self, name: &str) -> Option<JsonValue> {
        (self.lookup)(name).filter(|v| !v.is_null())
    }

    pub fn required_str(&self, name: &str) -> Result<String, AdcError> {
        match self.raw(name) {
            None => Err(AdcError::invalid_parameter(name, "is required")),
            Some(v) => {
                let s = scalar_to_string(name, &v)?;
                if s.is_empty() {
                    return Err(AdcError::invalid_parameter(name, "must not be empty"));
                }
                Ok(s)
            }
        }
    }

    /// `default` applies only when the host has no value for `name`. A value that
    /// resolved to null or to an empty string is rejected.
    pub fn str_or(&self, name: &str, default: &str) -> Result<String, AdcError> {
        match (self.lookup)(name) {
            None => Ok(default.to_string()),
            Some(JsonValue::Null) => Err(AdcError::invalid_parameter(name, "resolved to null")),
            Some(v) => {
                let s = scalar_to_string(name, &v)?;
                if s.is_empty() {
                    return Err(AdcError::invalid_parameter(name, "must not be empty"));
                }
                Ok(s)
            }
        }
    }

    pub fn object_or_empty(&self, name: &str) -> Result<Map<String, JsonValue>, AdcError> {
        match self.raw(name) {
            None => Ok(Map::new()),
            Some(JsonValue::Object(m)) => Ok(m),
            Some(_) => Err(AdcError::invalid_parameter(name, "must be an object")),
        }
    }

    fn format_or_pem(&self, name: &str) -> Result<CertificateFormat, AdcError> {
        let s = self.str_or(name, CertificateFormat::Pem.as_str())?;
        s.parse::<CertificateFormat>()
            .map_err(|_| AdcError::invalid_parameter(name, format!("unknown format \"{s}\"")))
    }
}

fn scalar_to_string(name: &str, v: &JsonValue) -> Result<String, AdcError> {
    match v {
        JsonValue::String(s) => Ok(s.clone()),
        JsonValue::Number(n) => Ok(n.to_string()),
        JsonValue::Bool(b) => Ok(b.to_string()),
        _ => Err(AdcError::invalid_parameter(name, "must be a string")),
    }
}

/// A file on the appliance, addressed by name and directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRef {
    pub file_name: String,
    pub file_location: String,
}

impl FileRef {
    pub fn resolve(p: &ParamReader<'_>) -> Result<Self, AdcError> {
        Ok(Self {
            file_name: p.required_str("fileName")?,
            file_location: p.str_or("fileLocation", DEFAULT_FILE_LOCATION)?,
        })
    }
}

/// Upload settings as configured on the item, before the attachment is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUploadParams {
    pub file_location: String,
    pub binary_property: String,
    /// `options.fileName`; replaces the attachment's own file name when set.
    pub file_name_override: Option<String>,
}

impl FileUploadParams {
    pub fn resolve(p: &ParamReader<'_>) -> Result<Self, AdcError> {
        let options = p.object_or_empty("options")?;
        let file_name_override = match options.get("fileName") {
            None | Some(JsonValue::Null) => None,
            Some(v) => Some(scalar_to_string("options.fileName", v)?).filter(|s| !s.is_empty()),
        };
        Ok(Self {
            file_location: p.str_or("fileLocation", DEFAULT_FILE_LOCATION)?,
            binary_property: p.str_or("binaryProperty", DEFAULT_BINARY_PROPERTY)?,
            file_name_override,
        })
    }
}

/// Everything the request builder needs for an upload, attachment bytes included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub file_location: String,
    pub attachment_file_name: Option<String>,
    pub file_name_override: Option<String>,
    pub content: Vec<u8>,
}

impl FileUpload {
    pub fn effective_file_name(&self) -> Option<&str> {
        self.file_name_override
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(self.attachment_file_name.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDownloadParams {
    pub file: FileRef,
    pub binary_property: String,
}

impl FileDownloadParams {
    pub fn resolve(p: &ParamReader<'_>) -> Result<Self, AdcError> {
        Ok(Self {
            file: FileRef::resolve(p)?,
            binary_property: p.str_or("binaryProperty", DEFAULT_BINARY_PROPERTY)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CertificateCreateParams {
    pub certificate_file_name: String,
    pub certificate_format: CertificateFormat,
    pub certificate_type: CertificateType,
    pub certificate_request_file_name: String,
    pub signing: CertificateSigning,
    /// Optional `sslcert` fields (`days`, `subjectaltname`, `pempassphrase`, ...), forwarded as-is.
    pub additional_fields: Map<String, JsonValue>,
}

impl CertificateCreateParams {
    pub fn resolve(p: &ParamReader<'_>) -> Result<Self, AdcError> {
        let certificate_type: CertificateType = p
            .str_or("certificateType", CertificateType::RootCert.as_str())?
            .parse()?;

        // Only the parameters of the selected shape are read.
        let signing = if certificate_type.is_root() {
            CertificateSigning::Root {
                private_key_file_name: p.required_str("privateKeyFileName")?,
            }
        } else {
            CertificateSigning::CaSigned {
                ca_certificate_file_name: p.required_str("caCertificateFileName")?,
                ca_certificate_format: p.format_or_pem("caCertificateFileFormat")?,
                ca_private_key_file_name: p.required_str("caPrivateKeyFileName")?,
                ca_private_key_format: p.format_or_pem("caPrivateKeyFileFormat")?,
                ca_serial_file_number: p.required_str("caSerialFileNumber")?,
            }
        };

        Ok(Self {
            certificate_file_name: p.required_str("certificateFileName")?,
            certificate_format: p.format_or_pem("certificateFormat")?,
            certificate_type,
            certificate_request_file_name: p.required_str("certificateRequestFileName")?,
            signing,
            additional_fields: p.object_or_empty("additionalFields")?,
        })
    }
}

/// Fully resolved parameters of one item, tagged by operation.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationParams {
    FileUpload(FileUpload),
    FileDelete(FileRef),
    FileDownload(FileRef),
    CertificateCreate(CertificateCreateParams),
}
