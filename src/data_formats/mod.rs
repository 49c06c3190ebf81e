mod request;
mod response;
mod wrapper;

pub use request::*;
pub use response::*;
pub use wrapper::*;

use serde::{Deserialize, Serialize};

use crate::errors::RequestError;

/// `?page=N`, kept raw so a malformed number reads as a missing page.
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct PageQueryParams {
    #[serde(default)]
    pub page: Option<String>,
}

impl PageQueryParams {
    /// The requested 1-based page, defaulting to the first.
    pub fn number(&self) -> Result<usize, RequestError> {
        match self.page.as_deref() {
            None => Ok(1),
            Some(page) => page
                .trim()
                .parse()
                .map_err(|_| RequestError::NotFound("Page not found")),
        }
    }
}
