use serde::Serialize;

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub(crate) struct InfoResponse {
    pub version: String,
}

impl InfoResponse {
    pub(crate) fn new(version: &str) -> Self {
        Self {
            version: version.to_string(),
        }
    }
}
