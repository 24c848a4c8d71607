//! Course and enrollment API methods for [`ProviderClient`].

use crate::client::ProviderClient;
use crate::endpoints;
use crate::error::Result;
use crate::models::{Course, EnrollmentResponse, Page, SearchQuery};

impl ProviderClient {
    /// Search courses, one page at a time.
    pub async fn search_courses(&self, query: &SearchQuery) -> Result<Page<Course>> {
        endpoints::search_courses(
            &self.http,
            &self.api_root,
            &self.auth,
            query,
            self.max_retries,
            self.metrics.as_ref(),
        )
        .await
    }

    /// Enroll a user into a course.
    pub async fn enroll_user(&self, user_id: u64, course_id: u64) -> Result<EnrollmentResponse> {
        endpoints::enroll_user(
            &self.http,
            &self.api_root,
            &self.auth,
            user_id,
            course_id,
            self.max_retries,
            self.metrics.as_ref(),
        )
        .await
    }
}
