use crate::domain::diagnostic::Diagnostic;
use serde::{Deserialize, Serialize};

/// One (day, time range, location) triple of a section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledMeeting {
    pub location: String,
    /// Single day code: M, T, W, R (Thursday) or F.
    pub day: String,
    pub start_time: String,
    pub end_time: String,
}

/// One enrollable course section as listed on the schedule page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub crn: u32,
    pub department: String,
    /// `None` when the listing's course number is not numeric.
    #[serde(rename = "courseID")]
    pub course_id: Option<u32>,
    pub section: String,
    pub name: String,
    pub credit: String,
    pub instructors: Vec<String>,
    pub schedule: Vec<ScheduledMeeting>,
    pub start_date: String,
    pub end_date: String,
}

impl Section {
    pub fn key(&self) -> SectionKey {
        SectionKey {
            department: self.department.clone(),
            course_id: self.course_id,
            section: self.section.clone(),
        }
    }
}

/// (department, course number, section): how persistence addresses a section
/// within a term.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SectionKey {
    pub department: String,
    pub course_id: Option<u32>,
    pub section: String,
}

impl SectionKey {
    /// `CSCI-1010-10`. A missing course number renders as `NaN`, which is what
    /// existing document stores already contain for those listings.
    pub fn document_id(&self) -> String {
        let course_id = self
            .course_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "NaN".to_string());
        format!("{}-{}-{}", self.department, course_id, self.section)
    }
}

/// One listing page to scrape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScrapeTarget {
    /// 1 = main campus, 3 = off campus, 7 = online, ...
    pub campus: String,
    /// Year followed by a two-digit term (01 spring, 02 summer, 03 fall).
    pub term: String,
    pub subject: String,
}

impl ScrapeTarget {
    pub fn new(
        campus: impl Into<String>,
        term: impl Into<String>,
        subject: impl Into<String>,
    ) -> Self {
        Self {
            campus: campus.into(),
            term: term.into(),
            subject: subject.into(),
        }
    }

    /// Every campus × term × subject combination, in that nesting order.
    pub fn expand(campuses: &[String], terms: &[String], subjects: &[String]) -> Vec<Self> {
        let mut targets = Vec::new();
        for term in terms {
            for campus in campuses {
                for subject in subjects {
                    targets.push(Self::new(campus, term, subject));
                }
            }
        }
        targets
    }
}

impl std::fmt::Display for ScrapeTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "campus {} / term {} / {}",
            self.campus, self.term, self.subject
        )
    }
}

/// Raw page handed from extract to transform.
#[derive(Debug, Clone)]
pub struct SourcePage {
    pub target: ScrapeTarget,
    /// URL or file path the HTML came from.
    pub origin: String,
    pub html: String,
}

/// A diagnostic tied to the table block (0-based, document order) it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockDiagnostic {
    pub block: usize,
    pub diagnostic: Diagnostic,
}

#[derive(Debug, Clone, Serialize)]
pub struct PageResult {
    pub target: ScrapeTarget,
    pub origin: String,
    pub sections: Vec<Section>,
    pub skipped: Vec<BlockDiagnostic>,
    pub warnings: Vec<BlockDiagnostic>,
}

#[derive(Debug, Clone, Default)]
pub struct TransformResult {
    pub pages: Vec<PageResult>,
    pub json_output: String,
    pub sections_csv: String,
    pub meetings_csv: String,
}

impl TransformResult {
    pub fn section_count(&self) -> usize {
        self.pages.iter().map(|p| p.sections.len()).sum()
    }

    pub fn skipped_count(&self) -> usize {
        self.pages.iter().map(|p| p.skipped.len()).sum()
    }

    pub fn warning_count(&self) -> usize {
        self.pages.iter().map(|p| p.warnings.len()).sum()
    }
}

/// What a finished run reports back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub output_path: String,
    pub pages: usize,
    pub sections_loaded: usize,
    pub rows_skipped: usize,
    pub warnings: usize,
}
