#![forbid(unsafe_code)]

//! Core model for the Citrix ADC connector: the closed set of resource
//! operations, their typed parameters, NITRO request construction and the
//! base64 codec used for file contents.

pub mod binary;
pub mod error;
pub mod params;
pub mod request;
pub mod types;

pub use crate::error::AdcError;
pub use crate::params::{
    CertificateCreateParams, FileDownloadParams, FileRef, FileUpload, FileUploadParams,
    OperationParams, ParamReader,
};
pub use crate::request::{build_request, HttpMethod, RequestSpec};
pub use crate::types::{
    BinaryData, CertificateFormat, CertificateSigning, CertificateType, InputItem, Operation,
    OutputItem, Resource, ResourceOperation,
};
