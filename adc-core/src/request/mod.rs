//! NITRO request construction. Pure: no I/O, same input gives the same request.

use std::fmt;

use serde_json::{json, Map, Value as JsonValue};

use crate::binary;
use crate::error::AdcError;
use crate::params::{CertificateCreateParams, FileRef, FileUpload, OperationParams};
use crate::types::ResourceOperation;

pub const SYSTEMFILE_ENDPOINT: &str = "/config/systemfile";
pub const SSLCERT_CREATE_ENDPOINT: &str = "/config/sslcert?action=create";

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One outbound NITRO call. `path` is relative to `/nitro/v1`.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct RequestSpec {
    pub method: HttpMethod,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<JsonValue>,
}

pub fn build_request(
    op: ResourceOperation,
    params: &OperationParams,
) -> Result<RequestSpec, AdcError> {
    match (op, params) {
        (ResourceOperation::FileUpload, OperationParams::FileUpload(u)) => Ok(file_upload(u)),
        (ResourceOperation::FileDelete, OperationParams::FileDelete(f)) => Ok(RequestSpec {
            method: HttpMethod::Delete,
            path: systemfile_path(f),
            body: None,
        }),
        (ResourceOperation::FileDownload, OperationParams::FileDownload(f)) => Ok(RequestSpec {
            method: HttpMethod::Get,
            path: systemfile_path(f),
            body: None,
        }),
        (ResourceOperation::CertificateCreate, OperationParams::CertificateCreate(c)) => {
            Ok(certificate_create(c))
        }
        (op, _) => Err(AdcError::unsupported(
            op.resource().as_str(),
            op.operation().as_str(),
        )),
    }
}

/// `/config/systemfile?args=filename:<name>,filelocation:<escaped location>`.
///
/// Only the location is escaped; the file name goes in verbatim.
pub fn systemfile_path(f: &FileRef) -> String {
    format!(
        "{SYSTEMFILE_ENDPOINT}?args=filename:{},filelocation:{}",
        f.file_name,
        urlencoding::encode(&f.file_location)
    )
}

fn file_upload(u: &FileUpload) -> RequestSpec {
    let mut systemfile = Map::new();
    if let Some(name) = u.effective_file_name() {
        systemfile.insert("filename".into(), name.into());
    }
    systemfile.insert("filecontent".into(), binary::encode(&u.content).into());
    systemfile.insert("filelocation".into(), u.file_location.clone().into());
    systemfile.insert("fileencoding".into(), binary::FILE_ENCODING.into());

    RequestSpec {
        method: HttpMethod::Post,
        path: SYSTEMFILE_ENDPOINT.to_string(),
        body: Some(json!({ "systemfile": systemfile })),
    }
}

fn certificate_create(c: &CertificateCreateParams) -> RequestSpec {
    let mut sslcert = Map::new();
    sslcert.insert("reqfile".into(), c.certificate_request_file_name.clone().into());
    sslcert.insert("certfile".into(), c.certificate_file_name.clone().into());
    sslcert.insert("certform".into(), c.certificate_format.as_str().into());
    sslcert.insert("certType".into(), c.certificate_type.as_str().into());
    // Additional fields may overwrite the base fields, never the signing shape.
    let excluded = c.signing.excluded_fields();
    for (k, v) in &c.additional_fields {
        if !excluded.contains(&k.as_str()) {
            sslcert.insert(k.clone(), v.clone());
        }
    }
    sslcert.extend(c.signing.body_fields());

    RequestSpec {
        method: HttpMethod::Post,
        path: SSLCERT_CREATE_ENDPOINT.to_string(),
        body: Some(json!({ "sslcert": sslcert })),
    }
}
