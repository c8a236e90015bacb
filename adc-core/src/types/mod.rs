mod certificate;
mod item;
mod operation;

pub use certificate::{CertificateFormat, CertificateSigning, CertificateType};
pub use item::{BinaryData, InputItem, OutputItem};
pub use operation::{Operation, Resource, ResourceOperation};
