use crate::document::{DocumentRecord, LinkPair};
use crate::error::{CollectError, SessionError};
use crate::filter::DocumentLinkFilter;
use crate::logging::SourceLogger;
use crate::parsers::text::non_empty;
use crate::parsers::{parse_publication_date, strip_abstract};
use crate::session::{BrowserSession, Locator};
use chrono::NaiveDateTime;
use url::Url;

/// Container holding the links of an entry
const LINK_CONTAINER_CLASS: &str = "media-body";
const HEADING_TAG: &str = "h3";
const ABSTRACT_SELECTOR: &str = "h3 small";
const DATE_TAG: &str = "h6";

/// Fields read from one publication entry
#[derive(Debug, Clone)]
pub struct EntryFields {
    pub title: String,
    pub abstract_text: Option<String>,
    pub published: NaiveDateTime,
    pub links: Vec<LinkPair>,
}

impl EntryFields {
    /// Links of the entry that point at document files, in page order
    pub fn document_links(&self, filter: &DocumentLinkFilter) -> Vec<String> {
        self.links
            .iter()
            .filter(|pair| {
                Url::parse(&pair.link)
                    .map(|url| filter.is_document(&url))
                    .unwrap_or(false)
            })
            .map(|pair| pair.link.clone())
            .collect()
    }

    /// Record for one document file of this entry
    pub fn to_record(&self, web_link: String) -> DocumentRecord {
        DocumentRecord::new(
            self.title.clone(),
            self.abstract_text.clone(),
            web_link,
            self.links.clone(),
            self.published,
        )
    }
}

/// Reads title, abstract, date and links of a publication entry.
///
/// The link container, heading and date are required; any of them missing
/// or an unparseable date is an error for the whole entry.
pub async fn read_entry<S: BrowserSession>(
    session: &S,
    entry: &S::Element,
    index: usize,
    filter: &DocumentLinkFilter,
    logger: &SourceLogger,
) -> Result<EntryFields, CollectError> {
    let container = required(
        index,
        LINK_CONTAINER_CLASS,
        session
            .find_in(entry, &Locator::class(LINK_CONTAINER_CLASS))
            .await,
    )?;
    let anchors = session.find_all_in(&container, &Locator::tag("a")).await?;

    let abstract_text = match session.find_in(entry, &Locator::css(ABSTRACT_SELECTOR)).await {
        Ok(element) => session.text(&element).await?.trim().to_string(),
        Err(e) if e.is_missing() => String::new(),
        Err(e) => return Err(e.into()),
    };

    let heading = required(
        index,
        HEADING_TAG,
        session.find_in(entry, &Locator::tag(HEADING_TAG)).await,
    )?;
    let title = strip_abstract(&session.text(&heading).await?, &abstract_text);

    let date = required(
        index,
        DATE_TAG,
        session.find_in(entry, &Locator::tag(DATE_TAG)).await,
    )?;
    let raw_date = session.text(&date).await?;
    let published = parse_publication_date(&raw_date).ok_or(CollectError::InvalidDate {
        index,
        raw: raw_date,
    })?;

    let mut links = Vec::with_capacity(anchors.len());
    for anchor in &anchors {
        let Some(href) = session.attribute(anchor, "href").await? else {
            continue;
        };
        let Some(url) = filter.resolve(&href) else {
            logger.debug(format_args!(
                "Skipping unresolvable link {:?} in publication #{}",
                href, index
            ));
            continue;
        };
        let name = session.text(anchor).await?;
        links.push(LinkPair::new(name, url.to_string()));
    }

    Ok(EntryFields {
        title,
        abstract_text: non_empty(abstract_text),
        published,
        links,
    })
}

/// Turns a missing element into a missing-field error for the entry
fn required<E>(
    index: usize,
    field: &'static str,
    result: Result<E, SessionError>,
) -> Result<E, CollectError> {
    result.map_err(|source| {
        if source.is_missing() {
            CollectError::MissingField {
                index,
                field,
                source,
            }
        } else {
            CollectError::Session(source)
        }
    })
}
