use serde::Deserialize;

/// Form body of `POST /check`. A missing `url` field is treated as empty.
#[derive(Debug, Deserialize)]
pub struct CheckRequest {
    #[serde(default)]
    pub url: String,
}
