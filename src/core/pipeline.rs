pub use crate::app::pipelines::course_pipeline::{
    document_path, CoursePipeline, BUNDLE_ARCHIVE, MEETINGS_CSV, RUN_MANIFEST, SECTIONS_CSV,
    SECTIONS_JSON,
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ConfigProvider, Pipeline, Storage};
    use crate::domain::model::{ScrapeTarget, SourcePage};
    use crate::utils::error::{EtlError, Result};
    use httpmock::prelude::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }

        async fn paths(&self) -> Vec<String> {
            let files = self.files.lock().await;
            let mut paths: Vec<String> = files.keys().cloned().collect();
            paths.sort();
            paths
        }
    }

    impl Storage for MockStorage {
        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockConfig {
        base_url: String,
        targets: Vec<ScrapeTarget>,
        html_file: Option<String>,
        output_formats: Vec<String>,
        compress: bool,
        documents: bool,
    }

    impl MockConfig {
        fn new(base_url: String) -> Self {
            Self {
                base_url,
                targets: vec![ScrapeTarget::new("1", "202101", "CSCI")],
                html_file: None,
                output_formats: vec!["json".to_string(), "csv".to_string()],
                compress: false,
                documents: true,
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn base_url(&self) -> &str {
            &self.base_url
        }

        fn targets(&self) -> Vec<ScrapeTarget> {
            self.targets.clone()
        }

        fn html_file(&self) -> Option<&str> {
            self.html_file.as_deref()
        }

        fn output_path(&self) -> &str {
            "test_output"
        }

        fn output_formats(&self) -> &[String] {
            &self.output_formats
        }

        fn compress(&self) -> bool {
            self.compress
        }

        fn write_documents(&self) -> bool {
            self.documents
        }

        fn concurrent_requests(&self) -> usize {
            2
        }

        fn request_timeout_secs(&self) -> u64 {
            5
        }
    }

    fn row(status: &str, crn: &str, subject: &str, section: &str, day_time: &str) -> String {
        format!(
            "<table><tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>Course</td>\
             <td>3.00</td><td>Doe, J</td><td>SEH 1300</td><td>{}</td>\
             <td>08/24/2020 - 12/11/2020</td></tr></table>",
            status, crn, subject, section, day_time
        )
    }

    fn page(rows: &[String]) -> String {
        format!("<html><body>{}</body></html>", rows.join("\n"))
    }

    fn source_page(html: String) -> SourcePage {
        SourcePage {
            target: ScrapeTarget::new("1", "202101", "CSCI"),
            origin: "memory".to_string(),
            html,
        }
    }

    #[tokio::test]
    async fn test_extract_fetches_every_target_in_order() {
        let server = MockServer::start();
        let csci = server.mock(|when, then| {
            when.method(GET).path("/print.cfm").query_param("subjId", "CSCI");
            then.status(200).body("<p>csci</p>");
        });
        let ece = server.mock(|when, then| {
            when.method(GET).path("/print.cfm").query_param("subjId", "ECE");
            then.status(200).body("<p>ece</p>");
        });

        let mut config = MockConfig::new(server.url("/print.cfm"));
        config.targets = vec![
            ScrapeTarget::new("1", "202101", "CSCI"),
            ScrapeTarget::new("1", "202101", "ECE"),
        ];
        let pipeline = CoursePipeline::new(MockStorage::new(), config).unwrap();

        let pages = pipeline.extract().await.unwrap();

        csci.assert();
        ece.assert();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].target.subject, "CSCI");
        assert_eq!(pages[0].html, "<p>csci</p>");
        assert_eq!(pages[1].target.subject, "ECE");
    }

    #[tokio::test]
    async fn test_extract_failure_is_fatal() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/print.cfm");
            then.status(404);
        });

        let pipeline =
            CoursePipeline::new(MockStorage::new(), MockConfig::new(server.url("/print.cfm")))
                .unwrap();

        let err = pipeline.extract().await.unwrap_err();
        assert!(matches!(err, EtlError::FetchError { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_extract_reads_local_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("csci.html");
        std::fs::write(&path, page(&[row("OPEN", "1", "CSCI 1010", "10", "M 09:00AM")])).unwrap();

        let mut config = MockConfig::new("http://unused.invalid/print.cfm".to_string());
        config.html_file = Some(path.to_str().unwrap().to_string());
        let pipeline = CoursePipeline::new(MockStorage::new(), config).unwrap();

        let pages = pipeline.extract().await.unwrap();
        assert_eq!(pages.len(), 1);
        assert!(pages[0].html.contains("CSCI 1010"));
        assert_eq!(pages[0].target.term, "202101");
    }

    #[tokio::test]
    async fn test_local_file_needs_single_target() {
        let mut config = MockConfig::new("http://unused.invalid/print.cfm".to_string());
        config.html_file = Some("csci.html".to_string());
        config.targets.push(ScrapeTarget::new("7", "202101", "CSCI"));
        let pipeline = CoursePipeline::new(MockStorage::new(), config).unwrap();

        assert!(matches!(
            pipeline.extract().await,
            Err(EtlError::ConfigValidationError { .. })
        ));
    }

    #[tokio::test]
    async fn test_transform_parses_sections_and_renders_outputs() {
        let html = page(&[
            row("OPEN", "100", "CSCI 1010", "10", "MW 10:00AM - 11:15AM"),
            row("WAITLIST", "101", "CSCI 1010", "11", "MW 10:00AM - 11:15AM"),
            row("CLOSED", "102", "CSCI 2113", "O10", "TR 02:00PM03:15PM"),
        ]);

        let pipeline = CoursePipeline::new(
            MockStorage::new(),
            MockConfig::new("http://test.com".to_string()),
        )
        .unwrap();

        let result = pipeline.transform(vec![source_page(html)]).await.unwrap();

        assert_eq!(result.section_count(), 2);
        assert_eq!(result.skipped_count(), 1);
        assert_eq!(result.warning_count(), 0);

        let csv_lines: Vec<&str> = result.sections_csv.lines().collect();
        assert_eq!(csv_lines.len(), 3);
        assert!(csv_lines[0].starts_with("term,campus,crn,department,courseID,section"));
        assert!(csv_lines[1].starts_with("202101,1,100,CSCI,1010,10,Course"));
        assert!(csv_lines[2].starts_with("202101,1,102,CSCI,2113,O10"));

        let meeting_lines: Vec<&str> = result.meetings_csv.lines().collect();
        assert_eq!(meeting_lines.len(), 5); // header + M, W, T, R
        assert_eq!(
            meeting_lines[3],
            "202101,102,CSCI,2113,O10,T,02:00PM,03:15PM,SEH 1300"
        );

        let json: serde_json::Value = serde_json::from_str(&result.json_output).unwrap();
        assert_eq!(json[0]["subject"], "CSCI");
        assert_eq!(json[0]["sections"][1]["section"], "O10");
    }

    #[tokio::test]
    async fn test_transform_empty_page() {
        let pipeline = CoursePipeline::new(
            MockStorage::new(),
            MockConfig::new("http://test.com".to_string()),
        )
        .unwrap();

        let result = pipeline
            .transform(vec![source_page("<html></html>".to_string())])
            .await
            .unwrap();

        assert_eq!(result.section_count(), 0);
        assert_eq!(result.meetings_csv.lines().count(), 1);
    }

    #[tokio::test]
    async fn test_load_writes_documents_and_bundle() {
        let storage = MockStorage::new();
        let pipeline = CoursePipeline::new(
            storage.clone(),
            MockConfig::new("http://test.com".to_string()),
        )
        .unwrap();

        let html = page(&[
            row("OPEN", "100", "CSCI 1010", "10", "MW 10:00AM - 11:15AM"),
            row("OPEN", "103", "CSCI TBA", "80", "F 01:00PM"),
        ]);
        let result = pipeline.transform(vec![source_page(html)]).await.unwrap();
        let output_path = pipeline.load(result).await.unwrap();

        assert_eq!(output_path, "test_output");
        assert_eq!(
            storage.paths().await,
            vec![
                "meetings.csv",
                "run.json",
                "sections.csv",
                "sections.json",
                "terms/202101/sections/CSCI-1010-10.json",
                "terms/202101/sections/CSCI-NaN-80.json",
                "terms/202101/term.json",
            ]
        );

        let doc = storage
            .get_file("terms/202101/sections/CSCI-1010-10.json")
            .await
            .unwrap();
        let doc: serde_json::Value = serde_json::from_slice(&doc).unwrap();
        assert_eq!(doc["crn"], 100);
        assert_eq!(doc["courseID"], 1010);
        assert_eq!(doc["schedule"].as_array().unwrap().len(), 2);

        let manifest = storage.get_file("run.json").await.unwrap();
        let manifest: serde_json::Value = serde_json::from_slice(&manifest).unwrap();
        assert_eq!(manifest["sections"], 2);
        assert_eq!(manifest["pages"][0]["term"], "202101");
    }

    #[tokio::test]
    async fn test_load_same_key_overwrites_document() {
        let storage = MockStorage::new();
        let pipeline = CoursePipeline::new(
            storage.clone(),
            MockConfig::new("http://test.com".to_string()),
        )
        .unwrap();

        let html = page(&[
            row("OPEN", "100", "CSCI 1010", "10", "M 10:00AM"),
            row("CLOSED", "200", "CSCI 1010", "10", "W 10:00AM"),
        ]);
        let result = pipeline.transform(vec![source_page(html)]).await.unwrap();
        assert_eq!(result.section_count(), 2);
        pipeline.load(result).await.unwrap();

        let doc = storage
            .get_file("terms/202101/sections/CSCI-1010-10.json")
            .await
            .unwrap();
        let doc: serde_json::Value = serde_json::from_slice(&doc).unwrap();
        assert_eq!(doc["crn"], 200);
    }

    #[tokio::test]
    async fn test_load_compressed_bundle() {
        let storage = MockStorage::new();
        let mut config = MockConfig::new("http://test.com".to_string());
        config.compress = true;
        config.documents = false;
        config.output_formats = vec!["csv".to_string()];
        let pipeline = CoursePipeline::new(storage.clone(), config).unwrap();

        let result = pipeline
            .transform(vec![source_page(page(&[row(
                "OPEN",
                "100",
                "CSCI 1010",
                "10",
                "M 10:00AM",
            )]))])
            .await
            .unwrap();
        let output_path = pipeline.load(result).await.unwrap();

        assert_eq!(output_path, format!("test_output/{}", BUNDLE_ARCHIVE));
        assert_eq!(storage.paths().await, vec![BUNDLE_ARCHIVE.to_string()]);

        let zip_bytes = storage.get_file(BUNDLE_ARCHIVE).await.unwrap();
        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(zip_bytes)).unwrap();
        let mut file_names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        file_names.sort();
        assert_eq!(file_names, vec![MEETINGS_CSV, RUN_MANIFEST, SECTIONS_CSV]);

        let mut csv_file = archive.by_name(SECTIONS_CSV).unwrap();
        let mut content = String::new();
        std::io::Read::read_to_string(&mut csv_file, &mut content).unwrap();
        assert!(content.contains("202101,1,100,CSCI,1010,10"));
    }
}
