use course_etl::domain::diagnostic::Diagnostic;
use course_etl::domain::model::SectionKey;
use course_etl::{parse_html, parse_sections, ScheduledMeeting};

const LISTING: &str = include_str!("fixtures/csci_202101.html");

fn meeting(day: &str, start: &str, end: &str, location: &str) -> ScheduledMeeting {
    ScheduledMeeting {
        location: location.to_string(),
        day: day.to_string(),
        start_time: start.to_string(),
        end_time: end.to_string(),
    }
}

#[test]
fn test_listing_page_yields_open_and_closed_sections() {
    let sections = parse_sections(LISTING);

    let crns: Vec<u32> = sections.iter().map(|s| s.crn).collect();
    assert_eq!(crns, vec![41238, 40519, 43300]);

    let key = |department: &str, course_id: u32, section: &str| SectionKey {
        department: department.to_string(),
        course_id: Some(course_id),
        section: section.to_string(),
    };
    let keys: Vec<SectionKey> = sections.iter().map(|s| s.key()).collect();
    assert_eq!(
        keys,
        vec![
            key("CSCI", 1010, "10"),
            key("CSCI", 1111, "30"),
            key("CSCI", 6907, "80"),
        ]
    );

    let ids: Vec<String> = sections.iter().map(|s| s.key().document_id()).collect();
    assert_eq!(ids, vec!["CSCI-1010-10", "CSCI-1111-30", "CSCI-6907-80"]);
}

#[test]
fn test_padded_status_cell_is_skipped() {
    let html = "<table><tr><td> OPEN\n</td><td>100</td><td>CSCI 1010</td><td>10</td>\
                <td>Intro</td><td>3.00</td><td>Doe, J</td><td>SEH 1300</td>\
                <td>M 10:00AM - 10:50AM</td><td>01/11/21 - 04/26/21</td></tr></table>";
    let outcome = parse_html(html);

    assert!(outcome.sections.is_empty());
    assert!(matches!(
        &outcome.skipped[0].diagnostic,
        Diagnostic::NotACourseRow { status } if status == " OPEN\n"
    ));
}

#[test]
fn test_single_meeting_section() {
    let sections = parse_sections(LISTING);
    let orientation = &sections[0];

    assert_eq!(orientation.department, "CSCI");
    assert_eq!(orientation.course_id, Some(1010));
    assert_eq!(orientation.section, "10");
    assert_eq!(orientation.name, "Computer Science Orientation");
    assert_eq!(orientation.credit, "1.00");
    assert_eq!(orientation.instructors, vec!["Heller, R"]);
    assert_eq!(
        orientation.schedule,
        vec![meeting("W", "03:30PM", "04:20PM", "ONLINE")]
    );
    assert_eq!(orientation.start_date, "01/11/21");
    assert_eq!(orientation.end_date, "04/26/21");
}

#[test]
fn test_lecture_and_recitation_groups() {
    let sections = parse_sections(LISTING);
    let intro = &sections[1];

    assert_eq!(intro.instructors, vec!["Taylor, K", "Aviv, A"]);
    assert_eq!(
        intro.schedule,
        vec![
            meeting("M", "12:45PM", "02:00PM", "SEH 1300"),
            meeting("W", "12:45PM", "02:00PM", "SEH 1300"),
            meeting("F", "11:10AM", "12:00PM", "SEH 1400"),
        ]
    );
}

#[test]
fn test_arranged_section_degrades_quietly() {
    let sections = parse_sections(LISTING);
    let topics = &sections[2];

    assert_eq!(topics.credit, "ARR");
    // 空白的教師欄位仍保留一個空字串
    assert_eq!(topics.instructors, vec![""]);
    assert!(topics.schedule.is_empty());
    assert_eq!(topics.start_date, "");
    assert_eq!(topics.end_date, "");
}

#[test]
fn test_outcome_reports_skips_and_warnings() {
    let outcome = parse_html(LISTING);

    // 表頭、WAITLIST、頁尾
    assert_eq!(outcome.skipped.len(), 3);
    assert!(outcome.skipped.iter().any(|s| matches!(
        &s.diagnostic,
        Diagnostic::NotACourseRow { status } if status == "WAITLIST"
    )));

    assert_eq!(outcome.warnings.len(), 1);
    assert!(matches!(
        &outcome.warnings[0].diagnostic,
        Diagnostic::MalformedDateRange { raw, parts: 1 } if raw == "TBA"
    ));
}

#[test]
fn test_sections_serialize_with_document_field_names() {
    let sections = parse_sections(LISTING);
    let value = serde_json::to_value(&sections[0]).unwrap();

    assert_eq!(value["crn"], 41238);
    assert_eq!(value["courseID"], 1010);
    assert_eq!(value["startDate"], "01/11/21");
    assert_eq!(value["schedule"][0]["startTime"], "03:30PM");
}

#[test]
fn test_page_without_tables_is_empty() {
    let outcome = parse_html("<html><body><p>No classes found.</p></body></html>");
    assert!(outcome.sections.is_empty());
    assert!(outcome.skipped.is_empty());
    assert!(outcome.warnings.is_empty());
}
