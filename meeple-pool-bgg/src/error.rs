/// Errors that can occur while talking to the catalog service.
#[derive(Debug, thiserror::Error)]
pub enum BggError {
    #[error("Network error on {endpoint}: {message}")]
    Network { endpoint: String, message: String },

    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: String, status: u16 },

    #[error("Request to {endpoint} failed after {attempts} attempts: {reason}")]
    RetriesExhausted {
        endpoint: String,
        attempts: u32,
        reason: String,
    },

    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("XML attribute error: {0}")]
    XmlAttribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("Malformed response: {0}")]
    MalformedXml(String),

    #[error("Failed to fetch collection for \"{username}\": {source}")]
    Collection {
        username: String,
        #[source]
        source: Box<BggError>,
    },

    #[error("Failed to fetch details for ids [{ids}]: {source}")]
    Details {
        ids: String,
        #[source]
        source: Box<BggError>,
    },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BggError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedXml(msg.into())
    }

    /// Whether this is a plain HTTP 404 from the service.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }

    pub(crate) fn for_collection(self, username: &str) -> Self {
        Self::Collection {
            username: username.to_string(),
            source: Box::new(self),
        }
    }

    pub(crate) fn for_details(self, ids: &[String]) -> Self {
        Self::Details {
            ids: ids.join(","),
            source: Box::new(self),
        }
    }
}
