// Licensed under the MIT License.

mod certificate;
mod claims;
mod dates;
mod partial_date;
mod subject;

pub use certificate::{HealthCertificate, Holder};
pub use dates::parse_date_text;
pub use partial_date::PartialDate;
pub use subject::{
    CertificateType, Recovery, Subject, Test, TestKind, Vaccination, TEST_RESULT_NEGATIVE, TEST_RESULT_POSITIVE,
    TEST_TYPE_NAAT, TEST_TYPE_RAPID,
};
