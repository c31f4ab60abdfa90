use std::sync::Arc;

use scraper::Html;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::HarvestConfig;
use crate::degree::extract_degree;
use crate::error::{HarvestError, Result};
use crate::extract::pdf_link::NO_BITSTREAM_GRID;
use crate::extract::{FieldExtractor, extract_metrics, item, locate_pdf_link, search};
use crate::http::{CrawlDelay, Fetched, HttpClient, Pacer, resolve_url};
use crate::pdf::first_page_text;
use crate::types::{
    Absence, DOWNLOADS_KEY, PDF_LINK_KEY, PageOutcome, Rejection, ResourceId, VIEWS_KEY,
};

/// Tally of a [`Harvester::collect_metadata`] run.
#[derive(Debug, Default, Serialize)]
pub struct BatchSummary {
    pub records: usize,
    pub sentinels: usize,
    pub failed: Vec<FailedItem>,
}

#[derive(Debug, Serialize)]
pub struct FailedItem {
    pub id: ResourceId,
    pub error: String,
}

/// Fetches repositum pages one at a time and turns them into records.
pub struct Harvester {
    config: HarvestConfig,
    client: HttpClient,
    pacer: Arc<dyn Pacer>,
    fields: FieldExtractor,
}

impl Harvester {
    pub fn new(config: HarvestConfig) -> Result<Self> {
        let pacer = Arc::new(CrawlDelay::new(config.crawl_delay()));
        Self::with_pacer(config, pacer)
    }

    pub fn with_pacer(config: HarvestConfig, pacer: Arc<dyn Pacer>) -> Result<Self> {
        Ok(Self {
            client: HttpClient::new(&config.user_agent, config.timeout())?,
            fields: FieldExtractor::new()?,
            config,
            pacer,
        })
    }

    pub fn config(&self) -> &HarvestConfig {
        &self.config
    }

    pub fn item_url(&self, id: ResourceId) -> String {
        id.full_mode_url(
            &self.config.domain,
            &self.config.handle_path,
            &self.config.doi_prefix,
        )
    }

    // ─── Publication pages ────────────────────────────────────────────────

    /// Scrapes the full-mode page of item `id`.
    ///
    /// Fails with [`HarvestError::InvalidArgument`] before any request when
    /// `id` is negative or outside the id space.
    pub async fn publication(&self, id: i64) -> Result<PageOutcome> {
        let id = ResourceId::new(id)?;
        self.publication_by_id(id).await
    }

    pub async fn publication_by_id(&self, id: ResourceId) -> Result<PageOutcome> {
        let page = self.fetch_paced(&self.item_url(id)).await?;
        if !page.is_ok() {
            return Ok(PageOutcome::Invalid(Rejection::Status(page.status)));
        }
        self.parse_item_page(&page.body)
    }

    /// Extracts every metadata row plus metrics and the PDF link.
    pub fn parse_item_page(&self, html: &str) -> Result<PageOutcome> {
        let document = Html::parse_document(html);

        if item::is_invalid_identifier(&document)? {
            return Ok(PageOutcome::Invalid(Rejection::InvalidIdentifier));
        }
        let Some(wrapper) = item::display_wrapper(&document)? else {
            return Ok(PageOutcome::NotFound(Absence::WrapperMissing));
        };
        let Some(container) = item::row_container(wrapper)? else {
            return Ok(PageOutcome::NotFound(Absence::RowContainerMissing));
        };
        let rows = item::metadata_rows(container)?;
        if rows.is_empty() {
            return Ok(PageOutcome::NotFound(Absence::NoMetadataRows));
        }

        let mut record = self.fields.extract_all(rows);
        let metrics = extract_metrics(document.root_element())?;
        record.set(VIEWS_KEY, metrics.views);
        record.set(DOWNLOADS_KEY, metrics.downloads);
        let pdf_link = locate_pdf_link(wrapper)?.unwrap_or_else(|| NO_BITSTREAM_GRID.to_string());
        record.set(PDF_LINK_KEY, pdf_link);

        Ok(PageOutcome::Record(record))
    }

    // ─── Thesis pages ─────────────────────────────────────────────────────

    /// Follows the item page's full-item-record button and keeps only the
    /// configured interesting fields.
    pub async fn thesis(&self, link: &str) -> Result<PageOutcome> {
        let page = self.fetch_paced(&self.absolute(link)?).await?;
        if !page.is_ok() {
            return Ok(PageOutcome::Invalid(Rejection::Status(page.status)));
        }
        let href = full_record_href(&page.body)?.ok_or_else(|| {
            HarvestError::MissingElement(format!("full item record button on {link}"))
        })?;
        debug!(link, %href, "following full item record");

        let record_page = self.fetch_paced(&self.absolute(&href)?).await?;
        if !record_page.is_ok() {
            return Ok(PageOutcome::Invalid(Rejection::Status(record_page.status)));
        }
        self.parse_full_record(&record_page.body)
    }

    pub fn parse_full_record(&self, html: &str) -> Result<PageOutcome> {
        let document = Html::parse_document(html);
        let Some(wrapper) = item::display_wrapper(&document)? else {
            return Ok(PageOutcome::NotFound(Absence::WrapperMissing));
        };
        let rows = item::metadata_rows(wrapper)?;
        let record = self
            .fields
            .extract(rows, |label| self.config.is_interesting(label));
        Ok(PageOutcome::Record(record))
    }

    /// Downloads the thesis PDF. `None` when the page has no bitstream grid.
    pub async fn thesis_pdf(&self, link: &str) -> Result<Option<Vec<u8>>> {
        let url = self.absolute(link)?;
        let page = self.fetch_paced(&url).await?;
        if !page.is_ok() {
            return Err(HarvestError::UnexpectedStatus {
                url,
                status: page.status,
            });
        }
        let Some(href) = pdf_href(&page.body)? else {
            info!(link, "{NO_BITSTREAM_GRID}");
            return Ok(None);
        };

        let pdf_url = self.absolute(&href)?;
        self.pacer.wait().await;
        let bytes = self.client.get_bytes(&pdf_url).await?;
        debug!(%pdf_url, size = bytes.len(), "downloaded PDF");
        Ok(Some(bytes))
    }

    /// Degree name from the first page of the thesis PDF.
    pub async fn thesis_degree(&self, link: &str) -> Result<Option<String>> {
        let Some(pdf) = self.thesis_pdf(link).await? else {
            return Ok(None);
        };
        let text = first_page_text(&pdf)?;
        Ok(extract_degree(&text))
    }

    // ─── Search results ───────────────────────────────────────────────────

    /// Walks the search result pages from `start_url` until no "Next"
    /// control remains (or `max_pages` pages have been read).
    pub async fn collect_links(&self, start_url: &str) -> Result<Vec<String>> {
        let mut links = Vec::new();
        let mut url = start_url.to_string();
        let mut page = self.fetch_paced(&url).await?;
        let mut pages = 0usize;

        loop {
            if !page.is_ok() {
                return Err(HarvestError::UnexpectedStatus {
                    url,
                    status: page.status,
                });
            }
            let (found, next) = results_page(&page.body, &self.config.link_prefix)?;
            links.extend(found);
            pages += 1;
            info!(pages, links = links.len(), "thesis links found");

            let Some(next) = next else {
                break;
            };
            if let Some(max) = self.config.max_pages
                && pages >= max
            {
                warn!(max, %next, "page limit reached, stopping before next page");
                break;
            }

            url = resolve_url(&url, &next)?;
            page = self.fetch_paced(&url).await?;
        }

        Ok(links)
    }

    // ─── Batch ────────────────────────────────────────────────────────────

    /// Scrapes every id in order and hands each outcome to `sink`.
    ///
    /// All ids are validated first. An error on a single item is logged and
    /// recorded in the summary; errors from `sink` abort the run.
    pub async fn collect_metadata<I, F>(&self, ids: I, mut sink: F) -> Result<BatchSummary>
    where
        I: IntoIterator<Item = i64>,
        F: FnMut(ResourceId, &PageOutcome) -> Result<()>,
    {
        let ids = ids
            .into_iter()
            .map(ResourceId::new)
            .collect::<Result<Vec<_>>>()?;

        let mut summary = BatchSummary::default();
        for id in ids {
            match self.publication_by_id(id).await {
                Ok(outcome) => {
                    sink(id, &outcome)?;
                    match outcome.sentinel() {
                        None => summary.records += 1,
                        Some(sentinel) => {
                            debug!(%id, %sentinel, "no record");
                            summary.sentinels += 1;
                        }
                    }
                }
                Err(err) => {
                    warn!(%id, error = %err, "item failed, continuing");
                    summary.failed.push(FailedItem {
                        id,
                        error: err.to_string(),
                    });
                }
            }
        }

        info!(
            records = summary.records,
            sentinels = summary.sentinels,
            failed = summary.failed.len(),
            "batch finished"
        );
        Ok(summary)
    }

    // ─── Helpers ──────────────────────────────────────────────────────────

    fn absolute(&self, link: &str) -> Result<String> {
        resolve_url(&self.config.domain, link)
    }

    async fn fetch_paced(&self, url: &str) -> Result<Fetched> {
        self.pacer.wait().await;
        self.client.get(url).await
    }
}

fn full_record_href(html: &str) -> Result<Option<String>> {
    item::full_record_href(&Html::parse_document(html))
}

fn pdf_href(html: &str) -> Result<Option<String>> {
    let document = Html::parse_document(html);
    locate_pdf_link(document.root_element())
}

fn results_page(html: &str, prefix: &str) -> Result<(Vec<String>, Option<String>)> {
    let document = Html::parse_document(html);
    Ok((
        search::result_links(&document, prefix)?,
        search::next_page_href(&document)?,
    ))
}
