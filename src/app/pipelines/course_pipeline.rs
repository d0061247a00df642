use crate::adapters::http::PageFetcher;
use crate::core::{ConfigProvider, Pipeline, Storage};
use crate::domain::model::{
    BlockDiagnostic, PageResult, ScrapeTarget, Section, SourcePage, TransformResult,
};
use crate::domain::services::parse_html;
use crate::utils::error::{EtlError, Result};
use serde::Serialize;
use std::collections::BTreeSet;
use std::io::Write;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use zip::write::{SimpleFileOptions, ZipWriter};

/// Name of the zip archive written when compression is on.
pub const BUNDLE_ARCHIVE: &str = "course_sections.zip";
pub const SECTIONS_JSON: &str = "sections.json";
pub const SECTIONS_CSV: &str = "sections.csv";
pub const MEETINGS_CSV: &str = "meetings.csv";
pub const RUN_MANIFEST: &str = "run.json";

/// Scrapes listing pages, parses them and stores the sections.
pub struct CoursePipeline<S: Storage, C: ConfigProvider> {
    pub(crate) storage: S,
    pub(crate) config: C,
    pub(crate) fetcher: PageFetcher,
}

impl<S: Storage, C: ConfigProvider> CoursePipeline<S, C> {
    pub fn new(storage: S, config: C) -> Result<Self> {
        let fetcher = PageFetcher::new(config.base_url(), config.request_timeout_secs())?;
        Ok(Self {
            storage,
            config,
            fetcher,
        })
    }

    async fn read_local_page(&self, path: &str) -> Result<Vec<SourcePage>> {
        let mut targets = self.config.targets().into_iter();
        let (Some(target), None) = (targets.next(), targets.next()) else {
            return Err(EtlError::ConfigValidationError {
                field: "html_file".to_string(),
                message: "a local page needs exactly one campus, term and subject".to_string(),
            });
        };

        tracing::debug!("Reading listing page from file: {}", path);
        let html = tokio::fs::read_to_string(path).await?;

        Ok(vec![SourcePage {
            target,
            origin: path.to_string(),
            html,
        }])
    }

    async fn fetch_pages(&self) -> Result<Vec<SourcePage>> {
        let targets = self.config.targets();
        let semaphore = Arc::new(Semaphore::new(self.config.concurrent_requests().max(1)));
        let mut tasks = JoinSet::new();

        for (index, target) in targets.into_iter().enumerate() {
            let fetcher = self.fetcher.clone();
            let semaphore = Arc::clone(&semaphore);

            tasks.spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|e| EtlError::ProcessingError {
                        message: format!("fetch limiter closed: {}", e),
                    })?;
                let (origin, html) = fetcher.fetch(&target).await?;
                Ok::<_, EtlError>((
                    index,
                    SourcePage {
                        target,
                        origin,
                        html,
                    },
                ))
            });
        }

        let mut pages = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            let page = joined.map_err(|e| EtlError::ProcessingError {
                message: format!("fetch task failed: {}", e),
            })??;
            pages.push(page);
        }

        // 回到設定順序，輸出才會穩定
        pages.sort_by_key(|(index, _)| *index);
        Ok(pages.into_iter().map(|(_, page)| page).collect())
    }

    /// One document per section plus a marker per term, the layout the
    /// downstream readers address by natural key.
    async fn write_documents(&self, pages: &[PageResult]) -> Result<usize> {
        let mut terms = BTreeSet::new();
        let mut written = 0;

        for page in pages {
            let term = &page.target.term;
            if terms.insert(term.clone()) {
                let marker = serde_json::to_vec_pretty(&serde_json::json!({ "term": term }))?;
                self.storage
                    .write_file(&format!("terms/{}/term.json", term), &marker)
                    .await?;
            }

            for section in &page.sections {
                let path = document_path(term, section);
                let data = serde_json::to_vec_pretty(section)?;
                self.storage.write_file(&path, &data).await?;
                written += 1;
            }
        }

        Ok(written)
    }

    fn bundle_files(&self, result: &TransformResult) -> Result<Vec<(&'static str, Vec<u8>)>> {
        let formats = self.config.output_formats();
        let mut files = Vec::new();

        if formats.iter().any(|f| f == "json") {
            files.push((SECTIONS_JSON, result.json_output.clone().into_bytes()));
        }
        if formats.iter().any(|f| f == "csv") {
            files.push((SECTIONS_CSV, result.sections_csv.clone().into_bytes()));
            files.push((MEETINGS_CSV, result.meetings_csv.clone().into_bytes()));
        }

        let manifest = RunManifest {
            scraped_at: chrono::Utc::now().to_rfc3339(),
            sections: result.section_count(),
            rows_skipped: result.skipped_count(),
            warnings: result.warning_count(),
            pages: result.pages.iter().map(PageManifest::from).collect(),
        };
        files.push((RUN_MANIFEST, serde_json::to_vec_pretty(&manifest)?));

        Ok(files)
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for CoursePipeline<S, C> {
    async fn extract(&self) -> Result<Vec<SourcePage>> {
        match self.config.html_file() {
            Some(path) => self.read_local_page(path).await,
            None => self.fetch_pages().await,
        }
    }

    async fn transform(&self, pages: Vec<SourcePage>) -> Result<TransformResult> {
        let mut results = Vec::with_capacity(pages.len());

        for page in pages {
            let outcome = parse_html(&page.html);
            tracing::info!(
                "📄 {}: {} sections, {} blocks skipped, {} warnings",
                page.target,
                outcome.sections.len(),
                outcome.skipped.len(),
                outcome.warnings.len()
            );

            results.push(PageResult {
                target: page.target,
                origin: page.origin,
                sections: outcome.sections,
                skipped: outcome.skipped,
                warnings: outcome.warnings,
            });
        }

        let json_output = {
            let listing: Vec<PageSections> = results.iter().map(PageSections::from).collect();
            serde_json::to_string_pretty(&listing)?
        };

        Ok(TransformResult {
            json_output,
            sections_csv: render_sections_csv(&results)?,
            meetings_csv: render_meetings_csv(&results)?,
            pages: results,
        })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        if self.config.write_documents() {
            let written = self.write_documents(&result.pages).await?;
            tracing::debug!("Wrote {} section documents", written);
        }

        let files = self.bundle_files(&result)?;

        if self.config.compress() {
            tracing::debug!("Creating ZIP file with {} files", files.len());

            let zip_data = {
                let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
                for (name, data) in &files {
                    zip.start_file(*name, SimpleFileOptions::default())?;
                    zip.write_all(data)?;
                }
                zip.finish()?.into_inner()
            };

            tracing::debug!("Writing ZIP file ({} bytes) to storage", zip_data.len());
            self.storage.write_file(BUNDLE_ARCHIVE, &zip_data).await?;
            return Ok(format!("{}/{}", self.config.output_path(), BUNDLE_ARCHIVE));
        }

        for (name, data) in &files {
            self.storage.write_file(name, data).await?;
        }
        Ok(self.config.output_path().to_string())
    }
}

/// `terms/{term}/sections/{DEPT-NUM-SEC}.json`
pub fn document_path(term: &str, section: &Section) -> String {
    let id = section.key().document_id().replace(['/', '\\'], "_");
    format!("terms/{}/sections/{}.json", term, id)
}

#[derive(Serialize)]
struct PageSections<'a> {
    #[serde(flatten)]
    target: &'a ScrapeTarget,
    sections: &'a [Section],
}

impl<'a> From<&'a PageResult> for PageSections<'a> {
    fn from(page: &'a PageResult) -> Self {
        Self {
            target: &page.target,
            sections: &page.sections,
        }
    }
}

#[derive(Serialize)]
struct RunManifest<'a> {
    scraped_at: String,
    sections: usize,
    rows_skipped: usize,
    warnings: usize,
    pages: Vec<PageManifest<'a>>,
}

#[derive(Serialize)]
struct PageManifest<'a> {
    #[serde(flatten)]
    target: &'a ScrapeTarget,
    origin: &'a str,
    sections: usize,
    skipped: &'a [BlockDiagnostic],
    warnings: &'a [BlockDiagnostic],
}

impl<'a> From<&'a PageResult> for PageManifest<'a> {
    fn from(page: &'a PageResult) -> Self {
        Self {
            target: &page.target,
            origin: &page.origin,
            sections: page.sections.len(),
            skipped: &page.skipped,
            warnings: &page.warnings,
        }
    }
}

fn render_sections_csv(pages: &[PageResult]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "term",
        "campus",
        "crn",
        "department",
        "courseID",
        "section",
        "name",
        "credit",
        "instructors",
        "meetings",
        "startDate",
        "endDate",
    ])?;

    for page in pages {
        for section in &page.sections {
            let crn = section.crn.to_string();
            let course_id = course_id_text(section);
            let instructors = section.instructors.join("; ");
            let meetings = section.schedule.len().to_string();
            let record: [&str; 12] = [
                &page.target.term,
                &page.target.campus,
                &crn,
                &section.department,
                &course_id,
                &section.section,
                &section.name,
                &section.credit,
                &instructors,
                &meetings,
                &section.start_date,
                &section.end_date,
            ];
            writer.write_record(record)?;
        }
    }

    finish_csv(writer)
}

fn render_meetings_csv(pages: &[PageResult]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "term",
        "crn",
        "department",
        "courseID",
        "section",
        "day",
        "startTime",
        "endTime",
        "location",
    ])?;

    for page in pages {
        for section in &page.sections {
            let crn = section.crn.to_string();
            let course_id = course_id_text(section);
            for meeting in &section.schedule {
                let record: [&str; 9] = [
                    &page.target.term,
                    &crn,
                    &section.department,
                    &course_id,
                    &section.section,
                    &meeting.day,
                    &meeting.start_time,
                    &meeting.end_time,
                    &meeting.location,
                ];
                writer.write_record(record)?;
            }
        }
    }

    finish_csv(writer)
}

fn course_id_text(section: &Section) -> String {
    section.course_id.map(|id| id.to_string()).unwrap_or_default()
}

fn finish_csv(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer.into_inner().map_err(|e| EtlError::ProcessingError {
        message: format!("CSV flush failed: {}", e),
    })?;
    String::from_utf8(bytes).map_err(|e| EtlError::ProcessingError {
        message: format!("CSV output is not UTF-8: {}", e),
    })
}
