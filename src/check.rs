use serde::Serialize;

pub const STATUS_IS_200: &str = "status is 200";

/// Outcome of one named assertion for one iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    pub name: &'static str,
    pub passed: bool,
}

impl CheckResult {
    /// `status` is `None` when the request never produced a response.
    pub fn status_is_200(status: Option<u16>) -> Self {
        Self {
            name: STATUS_IS_200,
            passed: status == Some(200),
        }
    }
}
