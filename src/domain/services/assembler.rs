use crate::domain::diagnostic::Diagnostic;
use crate::domain::model::{BlockDiagnostic, Section};
use crate::domain::services::date_range::split_date_range;
use crate::domain::services::schedule::decode_meetings;
use crate::domain::services::subject::{leading_int, normalize_subject};
use crate::domain::services::tokenizer::{tokenize, Cell, CourseBlock};
use scraper::Html;

/// What became of one table block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockOutcome {
    Assembled {
        section: Section,
        /// Data-quality problems that were defaulted over.
        warnings: Vec<Diagnostic>,
    },
    Skipped(Diagnostic),
}

/// Sections of one document plus what was skipped or defaulted along the way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOutcome {
    pub sections: Vec<Section>,
    pub skipped: Vec<BlockDiagnostic>,
    pub warnings: Vec<BlockDiagnostic>,
}

/// Builds a section from a block's summary row, or says why the block is not one.
pub fn assemble(block: &CourseBlock) -> BlockOutcome {
    if !block.is_course_row() {
        return BlockOutcome::Skipped(Diagnostic::NotACourseRow {
            status: block.status().to_string(),
        });
    }

    let Some(crn_raw) = block.cell(Cell::Crn) else {
        return BlockOutcome::Skipped(Diagnostic::MissingCrn);
    };
    let Some(crn) = leading_int(crn_raw) else {
        return BlockOutcome::Skipped(Diagnostic::InvalidCrn {
            raw: crn_raw.to_string(),
        });
    };

    let mut warnings = Vec::new();
    let mut note = |reason: Option<Diagnostic>| {
        if let Some(reason) = reason {
            if reason.is_data_quality() {
                warnings.push(reason);
            } else {
                tracing::debug!(crn, "{}", reason);
            }
        }
    };

    let (subject, reason) = normalize_subject(block.text(Cell::Subject)).into_parts();
    note(reason);

    let (schedule, reason) =
        decode_meetings(block.text(Cell::DayTime), block.text(Cell::Location)).into_parts();
    note(reason);

    let (dates, reason) = split_date_range(block.text(Cell::DateRange)).into_parts();
    note(reason);

    let instructors = block
        .text(Cell::Instructors)
        .split(';')
        .map(|name| name.trim().to_string())
        .collect();

    let section = Section {
        crn,
        department: subject.department,
        course_id: subject.course_id,
        section: block.text(Cell::Section).to_string(),
        name: block.text(Cell::Name).to_string(),
        credit: block.text(Cell::Credit).trim().to_string(),
        instructors,
        schedule,
        start_date: dates.start_date,
        end_date: dates.end_date,
    };

    BlockOutcome::Assembled { section, warnings }
}

/// Every course section in the document, in document order.
pub fn parse_document(document: &Html) -> ParseOutcome {
    let mut outcome = ParseOutcome::default();

    for block in tokenize(document) {
        match assemble(&block) {
            BlockOutcome::Assembled { section, warnings } => {
                for diagnostic in warnings {
                    tracing::warn!(block = block.index, crn = section.crn, "{}", diagnostic);
                    outcome.warnings.push(BlockDiagnostic {
                        block: block.index,
                        diagnostic,
                    });
                }
                outcome.sections.push(section);
            }
            BlockOutcome::Skipped(diagnostic) => {
                if diagnostic.is_data_quality() {
                    tracing::warn!(block = block.index, "{}, skipping block", diagnostic);
                } else {
                    tracing::debug!(block = block.index, "{}, skipping block", diagnostic);
                }
                outcome.skipped.push(BlockDiagnostic {
                    block: block.index,
                    diagnostic,
                });
            }
        }
    }

    outcome
}

pub fn parse_html(html: &str) -> ParseOutcome {
    parse_document(&Html::parse_document(html))
}

pub fn parse_sections(html: &str) -> Vec<Section> {
    parse_html(html).sections
}
