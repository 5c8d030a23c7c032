use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A `{name, link}` pair found under a publication entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkPair {
    /// Visible label of the anchor
    pub name: String,

    /// Absolute URL of the anchor
    pub link: String,
}

impl LinkPair {
    pub fn new(name: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            link: link.into(),
        }
    }
}

/// Auxiliary data attached to every record of an entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtherData {
    pub links: Vec<LinkPair>,
}

/// Represents one document file discovered on the listing page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Identifier assigned by the platform once persisted
    pub id: Option<i64>,

    /// Title of the publication, without its abstract line
    pub title: String,

    /// Short abstract line shown under the title (if available)
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,

    /// Text extracted from the linked PDF
    pub text: Option<String>,

    /// URL of the linked file
    pub web_link: String,

    /// Storage location assigned by the platform
    pub local_link: Option<String>,

    /// All links of the publication entry
    pub other_data: OtherData,

    /// Publication date shown on the listing page
    pub pub_date: NaiveDateTime,

    /// Retrieval date assigned by the platform
    pub load_date: Option<NaiveDateTime>,
}

impl DocumentRecord {
    /// Create a record as it leaves the listing page: no text, nothing assigned by the platform
    pub fn new(
        title: String,
        abstract_text: Option<String>,
        web_link: String,
        links: Vec<LinkPair>,
        pub_date: NaiveDateTime,
    ) -> Self {
        Self {
            id: None,
            title,
            abstract_text,
            text: None,
            web_link,
            local_link: None,
            other_data: OtherData { links },
            pub_date,
            load_date: None,
        }
    }

    /// Identity value used to recognise a document seen in an earlier run.
    ///
    /// Only the fields read from the listing page take part, so a record
    /// that went through the platform (id, dates, text filled in) still
    /// matches the freshly scraped one.
    pub fn hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.title.as_bytes());
        hasher.update(b"\n");
        hasher.update(self.web_link.as_bytes());
        hasher.update(b"\n");
        hasher.update(self.pub_date.format("%Y-%m-%dT%H:%M:%S").to_string().as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// One-line summary used when a document is accepted
    pub fn summary(&self) -> String {
        format!(
            "Find document | name: {} | link to web: {} | publication date: {}",
            self.title, self.web_link, self.pub_date
        )
    }
}
