use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

static TABLE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("table").unwrap());
static ROW_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").unwrap());
static CELL_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").unwrap());

/// Data cells read from a block's summary row.
pub const CELL_COUNT: usize = 10;

/// Statuses that mark a block as a course listing.
pub const COURSE_STATUSES: [&str; 2] = ["OPEN", "CLOSED"];

/// Column positions in the summary row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Status = 0,
    Crn,
    Subject,
    Section,
    Name,
    Credit,
    Instructors,
    Location,
    DayTime,
    DateRange,
}

/// Summary-row text of one `<table>` on the listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseBlock {
    /// Position among all tables in the document.
    pub index: usize,
    cells: Vec<String>,
}

impl CourseBlock {
    pub fn new(index: usize, cells: Vec<String>) -> Self {
        Self { index, cells }
    }

    /// Raw status cell text. Padding is kept, so `" OPEN "` is not a course row.
    pub fn status(&self) -> &str {
        self.text(Cell::Status)
    }

    pub fn is_course_row(&self) -> bool {
        COURSE_STATUSES.contains(&self.status())
    }

    /// `None` when the row has no such cell.
    pub fn cell(&self, cell: Cell) -> Option<&str> {
        self.cells.get(cell as usize).map(String::as_str)
    }

    /// Cell text, empty when the cell is missing.
    pub fn text(&self, cell: Cell) -> &str {
        self.cell(cell).unwrap_or("")
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }
}

/// Every table in document order with the text of its first row's cells.
/// Tables without rows come back with no cells and an empty status.
pub fn tokenize(document: &Html) -> Vec<CourseBlock> {
    document
        .select(&TABLE_SELECTOR)
        .enumerate()
        .map(|(index, table)| CourseBlock::new(index, summary_cells(table)))
        .collect()
}

fn summary_cells(table: ElementRef) -> Vec<String> {
    let Some(row) = table.select(&ROW_SELECTOR).next() else {
        return Vec::new();
    };

    row.select(&CELL_SELECTOR)
        .take(CELL_COUNT)
        .map(|cell| cell.text().collect::<String>())
        .collect()
}
