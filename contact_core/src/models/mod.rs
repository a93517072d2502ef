pub mod records;
pub mod request;

pub use records::{AppointmentRequest, ContactMessage, Record};
pub use request::{ApiResponse, AppointmentPayload, ContactPayload, SubmissionView};
