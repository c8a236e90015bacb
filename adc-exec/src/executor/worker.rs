use adc_core::binary;
use adc_core::params::{
    CertificateCreateParams, FileDownloadParams, FileRef, FileUpload, FileUploadParams,
    OperationParams, ParamReader,
};
use adc_core::{build_request, AdcError, OutputItem, RequestSpec, ResourceOperation};
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::executor::http::AdcTransport;
use crate::host::Host;

pub type ItemResult = Result<OutputItem, AdcError>;

pub(crate) struct Worker<'a> {
    pub(crate) host: &'a dyn Host,
    pub(crate) transport: &'a dyn AdcTransport,
}

/// Parameters of one item, before any attachment is read.
enum ItemParams {
    Upload(FileUploadParams),
    Delete(FileRef),
    Download(FileDownloadParams),
    Create(CertificateCreateParams),
}

fn resolve_params(
    host: &dyn Host,
    op: ResourceOperation,
    index: usize,
) -> Result<ItemParams, AdcError> {
    let lookup = |name: &str| host.parameter(name, index);
    let p = ParamReader::new(&lookup);
    Ok(match op {
        ResourceOperation::FileUpload => ItemParams::Upload(FileUploadParams::resolve(&p)?),
        ResourceOperation::FileDelete => ItemParams::Delete(FileRef::resolve(&p)?),
        ResourceOperation::FileDownload => ItemParams::Download(FileDownloadParams::resolve(&p)?),
        ResourceOperation::CertificateCreate => {
            ItemParams::Create(CertificateCreateParams::resolve(&p)?)
        }
    })
}

/// A built request, plus what is needed to shape a download response.
pub(crate) struct PreparedItem {
    pub(crate) request: RequestSpec,
    download: Option<FileDownloadParams>,
}

/// Resolves parameters, reads attachments and builds the request. No I/O against the appliance.
pub(crate) async fn prepare_item(
    host: &dyn Host,
    op: ResourceOperation,
    index: usize,
) -> Result<PreparedItem, AdcError> {
    let (params, download) = match resolve_params(host, op, index)? {
        ItemParams::Upload(p) => {
            let upload = read_upload(host, index, p).await?;
            (OperationParams::FileUpload(upload), None)
        }
        ItemParams::Delete(f) => (OperationParams::FileDelete(f), None),
        ItemParams::Download(p) => (OperationParams::FileDownload(p.file.clone()), Some(p)),
        ItemParams::Create(c) => (OperationParams::CertificateCreate(c), None),
    };
    let request = build_request(op, &params)?;
    debug!(%op, index, method = %request.method, path = %request.path, "built request");
    Ok(PreparedItem { request, download })
}

pub(crate) async fn execute_item(
    worker: &Worker<'_>,
    op: ResourceOperation,
    index: usize,
) -> ItemResult {
    let PreparedItem { request, download } = prepare_item(worker.host, op, index).await?;
    let resp = worker
        .transport
        .call(request.method, &request.path, request.body.as_ref())
        .await?;
    match download {
        Some(p) => unpack_download(worker.host, index, &p, resp),
        None => Ok(OutputItem::success(index)),
    }
}

async fn read_upload(
    host: &dyn Host,
    index: usize,
    p: FileUploadParams,
) -> Result<FileUpload, AdcError> {
    let item = host
        .items()
        .get(index)
        .ok_or_else(|| AdcError::MissingBinaryData(format!("No item at index {index}!")))?;
    let slots = item
        .binary
        .as_ref()
        .ok_or_else(|| AdcError::MissingBinaryData("No binary data exists on item!".to_string()))?;
    let attachment = slots.get(&p.binary_property).ok_or_else(|| {
        AdcError::MissingBinaryData(format!(
            "No binary data property \"{}\" exists on item!",
            p.binary_property
        ))
    })?;
    let attachment_file_name = attachment.file_name.clone();
    let content = host.binary_data_buffer(index, &p.binary_property).await?;

    Ok(FileUpload {
        file_location: p.file_location,
        attachment_file_name,
        file_name_override: p.file_name_override,
        content,
    })
}

fn unpack_download(
    host: &dyn Host,
    index: usize,
    p: &FileDownloadParams,
    resp: JsonValue,
) -> ItemResult {
    let file = resp
        .get("systemfile")
        .and_then(JsonValue::as_array)
        .and_then(|files| files.first())
        .cloned()
        .ok_or_else(|| {
            AdcError::UnexpectedResponse("response contains no systemfile record".to_string())
        })?;
    let content = file
        .get("filecontent")
        .and_then(JsonValue::as_str)
        .ok_or_else(|| {
            AdcError::UnexpectedResponse("systemfile record has no filecontent".to_string())
        })?;
    let bytes = binary::decode(content)?;
    let file_name = file
        .get("filename")
        .and_then(JsonValue::as_str)
        .unwrap_or(p.file.file_name.as_str())
        .to_string();

    let data = host.prepare_binary_data(bytes, Some(file_name));
    Ok(OutputItem::with_binary(file, p.binary_property.clone(), data, index))
}
