mod common;

use common::fixtures::*;
use common::{CRFF, CRLF, TestResult, fill_json, init, init_logger, stream};
use platen_escp as escp;
use serde_json::json;

#[test]
fn test_single_list_repeats_header_and_footer() -> TestResult {
    init_logger();

    let result = fill_json(&single_list_template(), persons_data())?;
    assert_eq!(
        result,
        stream(&[
            init(),
            escp::page_length(5),
            format!("This is detail 1.{CRLF}"),
            format!("This is header of list.{CRLF}"),
            format!("Page 1: David None as None{CRLF}"),
            format!("Page 1: Solid Snake as David{CRLF}"),
            format!("This is footer of list.{CRLF}{CRFF}"),
            format!("This is header of list.{CRLF}"),
            format!("Page 2: Jocki Hendry as Snake{CRLF}"),
            format!("This is footer of list.{CRLF}"),
            format!("This is detail 2.{CRLF}{CRFF}"),
            init(),
        ])
    );
    Ok(())
}

#[test]
fn test_list_line_with_script_placeholders() -> TestResult {
    init_logger();

    let template = detail_template(
        json!({ "pageLength": 10 }),
        json!([
            "Crew of ${ship}:",
            { "list": "persons", "line": "{{row}}. {{upper(nickname)}} ({{ship}})" }
        ]),
    );
    let result = fill_json(&template, json!({ "ship": "Outer Heaven", "persons": persons() }))?;
    assert_eq!(
        result,
        stream(&[
            init(),
            escp::page_length(10),
            format!("Crew of Outer Heaven:{CRLF}"),
            format!("1. NONE (Outer Heaven){CRLF}"),
            format!("2. DAVID (Outer Heaven){CRLF}"),
            format!("3. SNAKE (Outer Heaven){CRLF}{CRFF}"),
            init(),
        ])
    );
    Ok(())
}

#[test]
fn test_list_element_shadows_document_member() -> TestResult {
    init_logger();

    let template = detail_template(
        json!({ "pageLength": 10 }),
        json!([{ "list": "items", "line": "${name} / ${title}" }]),
    );
    let data = json!({ "name": "document", "title": "Inventory", "items": [{ "name": "bolt" }, {}] });
    let result = fill_json(&template, data)?;
    assert_eq!(
        result,
        stream(&[
            init(),
            escp::page_length(10),
            format!("bolt / Inventory{CRLF}"),
            format!("document / Inventory{CRLF}{CRFF}"),
            init(),
        ])
    );
    Ok(())
}

#[test]
fn test_null_list_and_table_expand_to_nothing() -> TestResult {
    init_logger();

    let template = detail_template(
        json!({ "pageLength": 4 }),
        json!([
            "First Line",
            { "table": "tables", "columns": [{ "source": "test", "width": 10 }] },
            { "list": "lists", "line": "This is ${line}", "header": ["This is header"] },
            "Second Line"
        ]),
    );
    let result = fill_json(&template, json!({ "tables": null, "lists": null }))?;
    assert_eq!(
        result,
        stream(&[
            init(),
            escp::page_length(4),
            format!("First Line{CRLF}Second Line{CRLF}{CRFF}"),
            init(),
        ])
    );
    Ok(())
}

#[test]
fn test_list_after_table_follows_expanded_rows() -> TestResult {
    init_logger();

    let template = detail_template(
        json!({ "pageLength": 4 }),
        json!([
            { "table": "persons", "columns": [{ "source": "firstName", "width": 6 }] },
            { "list": "persons", "line": "- ${nickname}" }
        ]),
    );
    let result = fill_json(&template, persons_data())?;
    assert_eq!(
        result,
        stream(&[
            init(),
            escp::page_length(4),
            format!("firstN{CRLF}David {CRLF}Solid {CRLF}Jocki {CRLF}{CRFF}"),
            format!("- None{CRLF}- David{CRLF}- Snake{CRLF}{CRFF}"),
            init(),
        ])
    );
    Ok(())
}
