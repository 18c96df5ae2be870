use crate::models::RequiredFiles;
use std::future::Future;

/// Repository interface for the required-file configuration.
pub trait RequirementRepository: super::Repository {
    /// The required keys for a job type. Unknown job types require nothing.
    fn get_required_files(
        &self,
        job_type: &str,
    ) -> impl Future<Output = Result<RequiredFiles, Self::Error>> + Send;

    /// Replace both required lists for a job type.
    fn set_required_files(
        &self,
        job_type: &str,
        required: RequiredFiles,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;
}
