use std::fmt;
use std::str::FromStr;

use crate::error::AdcError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum CertificateFormat {
    #[serde(rename = "PEM")]
    Pem,
    #[serde(rename = "DER")]
    Der,
}

impl CertificateFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pem => "PEM",
            Self::Der => "DER",
        }
    }
}

impl fmt::Display for CertificateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CertificateFormat {
    type Err = AdcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PEM" => Ok(Self::Pem),
            "DER" => Ok(Self::Der),
            other => Err(AdcError::invalid_parameter(
                "certificateFormat",
                format!("unknown format \"{other}\" (expected PEM or DER)"),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CertificateType {
    RootCert,
    IntmCert,
    ClntCert,
    SrvrCert,
}

impl CertificateType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RootCert => "ROOT_CERT",
            Self::IntmCert => "INTM_CERT",
            Self::ClntCert => "CLNT_CERT",
            Self::SrvrCert => "SRVR_CERT",
        }
    }

    pub fn is_root(&self) -> bool {
        matches!(self, Self::RootCert)
    }
}

impl fmt::Display for CertificateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CertificateType {
    type Err = AdcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ROOT_CERT" => Ok(Self::RootCert),
            "INTM_CERT" => Ok(Self::IntmCert),
            "CLNT_CERT" => Ok(Self::ClntCert),
            "SRVR_CERT" => Ok(Self::SrvrCert),
            other => Err(AdcError::invalid_parameter(
                "certificateType",
                format!("unknown certificate type \"{other}\""),
            )),
        }
    }
}

/// How a new certificate gets signed. A root certificate is self-signed with
/// its own key; every other type is signed by an issuing CA.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CertificateSigning {
    Root {
        private_key_file_name: String,
    },
    CaSigned {
        ca_certificate_file_name: String,
        ca_certificate_format: CertificateFormat,
        ca_private_key_file_name: String,
        ca_private_key_format: CertificateFormat,
        ca_serial_file_number: String,
    },
}

const ROOT_FIELDS: &[&str] = &["keyfile"];
const CA_FIELDS: &[&str] = &["cacert", "cacertform", "cakey", "cakeyform", "caserial"];

impl CertificateSigning {
    /// Fields belonging to the other shape, which must never appear in the body.
    pub fn excluded_fields(&self) -> &'static [&'static str] {
        match self {
            Self::Root { .. } => CA_FIELDS,
            Self::CaSigned { .. } => ROOT_FIELDS,
        }
    }

    /// NITRO `sslcert` fields contributed by this signing shape.
    pub fn body_fields(&self) -> serde_json::Map<String, serde_json::Value> {
        let mut m = serde_json::Map::new();
        match self {
            Self::Root {
                private_key_file_name,
            } => {
                m.insert("keyfile".into(), private_key_file_name.clone().into());
            }
            Self::CaSigned {
                ca_certificate_file_name,
                ca_certificate_format,
                ca_private_key_file_name,
                ca_private_key_format,
                ca_serial_file_number,
            } => {
                m.insert("cacert".into(), ca_certificate_file_name.clone().into());
                m.insert("cacertform".into(), ca_certificate_format.as_str().into());
                m.insert("cakey".into(), ca_private_key_file_name.clone().into());
                m.insert("cakeyform".into(), ca_private_key_format.as_str().into());
                m.insert("caserial".into(), ca_serial_file_number.clone().into());
            }
        }
        m
    }
}
