use std::fmt;
use std::str::FromStr;

use crate::error::AdcError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    File,
    Certificate,
}

impl Resource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Certificate => "certificate",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resource {
    type Err = AdcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "file" => Ok(Self::File),
            "certificate" => Ok(Self::Certificate),
            other => Err(AdcError::unsupported(other, "")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Upload,
    Delete,
    Download,
    Create,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upload => "upload",
            Self::Delete => "delete",
            Self::Download => "download",
            Self::Create => "create",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = AdcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upload" => Ok(Self::Upload),
            "delete" => Ok(Self::Delete),
            "download" => Ok(Self::Download),
            "create" => Ok(Self::Create),
            other => Err(AdcError::unsupported("", other)),
        }
    }
}

/// The closed set of supported (resource, operation) pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceOperation {
    FileUpload,
    FileDelete,
    FileDownload,
    CertificateCreate,
}

impl ResourceOperation {
    pub const ALL: [ResourceOperation; 4] = [
        Self::FileUpload,
        Self::FileDelete,
        Self::FileDownload,
        Self::CertificateCreate,
    ];

    pub fn new(resource: Resource, operation: Operation) -> Result<Self, AdcError> {
        match (resource, operation) {
            (Resource::File, Operation::Upload) => Ok(Self::FileUpload),
            (Resource::File, Operation::Delete) => Ok(Self::FileDelete),
            (Resource::File, Operation::Download) => Ok(Self::FileDownload),
            (Resource::Certificate, Operation::Create) => Ok(Self::CertificateCreate),
            (r, o) => Err(AdcError::unsupported(r.as_str(), o.as_str())),
        }
    }

    /// Parses the selector values a host passes for `resource` and `operation`.
    pub fn parse(resource: &str, operation: &str) -> Result<Self, AdcError> {
        let unsupported = || AdcError::unsupported(resource, operation);
        let r = resource.parse::<Resource>().map_err(|_| unsupported())?;
        let o = operation.parse::<Operation>().map_err(|_| unsupported())?;
        Self::new(r, o)
    }

    pub fn resource(&self) -> Resource {
        match self {
            Self::FileUpload | Self::FileDelete | Self::FileDownload => Resource::File,
            Self::CertificateCreate => Resource::Certificate,
        }
    }

    pub fn operation(&self) -> Operation {
        match self {
            Self::FileUpload => Operation::Upload,
            Self::FileDelete => Operation::Delete,
            Self::FileDownload => Operation::Download,
            Self::CertificateCreate => Operation::Create,
        }
    }
}

impl fmt::Display for ResourceOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.operation(), self.resource())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_every_supported_pair() {
        for ro in ResourceOperation::ALL {
            let parsed =
                ResourceOperation::parse(ro.resource().as_str(), ro.operation().as_str()).unwrap();
            assert_eq!(parsed, ro);
        }
    }

    #[test]
    fn parse_rejects_pairs_outside_the_enumeration() {
        let err = ResourceOperation::parse("certificate", "upload").unwrap_err();
        assert_eq!(
            err,
            AdcError::UnsupportedOperation {
                resource: "certificate".into(),
                operation: "upload".into()
            }
        );
        assert!(ResourceOperation::parse("file", "create").is_err());
        assert!(ResourceOperation::parse("vserver", "create").is_err());
        assert!(ResourceOperation::parse("file", "rename").is_err());
    }

    #[test]
    fn display_is_operation_then_resource() {
        assert_eq!(ResourceOperation::FileDownload.to_string(), "download: file");
    }
}
