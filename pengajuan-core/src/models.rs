mod datetime;
mod envelope;
mod file;
mod history;
mod ids;
mod requirement;
mod session;
mod status;
mod submission;

pub use datetime::DateTime;
pub use envelope::Envelope;
pub use file::{
    FileAttachment, FileCategory, FileContent, NewFile, VerificationStatus, VerificationUpdate,
};
pub use history::{EventQuery, Page, SubmissionEvent};
pub use ids::{FileId, OfficeId, SubmissionId, UserId};
pub use requirement::RequiredFiles;
pub use session::{Role, Session};
pub use status::{BadgeStyle, ParseStatusError, StatusDisplay, SubmissionStatus, status_display};
pub use submission::{ActorStamp, Employee, Stamps, SubmissionData, SubmissionRecord};
