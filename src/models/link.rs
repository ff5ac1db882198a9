use serde::Serialize;
use url::Url;
use uuid::Uuid;

use crate::{error::AppError, models::require_text};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Link {
    pub id: Uuid,
    #[serde(skip)]
    pub trip_id: Uuid,
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct NewLink {
    pub title: String,
    pub url: Url,
}

impl NewLink {
    pub fn new(title: &str, url: &str) -> Result<Self, AppError> {
        let title = require_text("title", title)?;
        let url = Url::parse(url.trim())
            .map_err(|err| AppError::validation(format!("invalid url: {err}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(AppError::validation("url must use http or https"));
        }
        Ok(Self { title, url })
    }

    pub fn into_link(self, trip_id: Uuid) -> Link {
        Link {
            id: Uuid::new_v4(),
            trip_id,
            title: self.title,
            url: self.url.into(),
        }
    }
}
