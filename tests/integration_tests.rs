mod common;

use common::fixtures::*;
use common::{CRFF, CRLF, TestResult, init, init_logger, stream};
use platen::{
    DataSource, Line, MapDataSource, PageFormat, PipelineBuilder, PipelineError, RecordDataSource, Report,
    TableLine,
};
use platen_escp as escp;
use serde_json::json;
use std::fs;
use std::process::Command;

#[test]
fn test_build_requires_template() {
    init_logger();

    let err = PipelineBuilder::new().build().err();
    assert!(matches!(err, Some(PipelineError::Config(_))));
}

#[test]
fn test_unsupported_template_extension() {
    init_logger();

    let err = PipelineBuilder::new().with_template_source("{}", "xsl").err();
    assert!(matches!(err, Some(PipelineError::Config(ref m)) if m.contains(".xsl")));
}

#[test]
fn test_template_file_and_output_file() -> TestResult {
    init_logger();

    let dir = tempfile::tempdir()?;
    let template_path = dir.path().join("report.json");
    fs::write(&template_path, single_table_template().to_string())?;

    let pipeline = PipelineBuilder::new().with_template_file(&template_path)?.build()?;
    assert!(pipeline.flags().has_table_lines);
    assert!(!pipeline.flags().has_list_lines);

    let output_path = dir.path().join("out").join("report.prn");
    let written = pipeline.generate_to_file(persons_data(), &output_path)?;
    let bytes = fs::read(&output_path)?;
    assert_eq!(bytes.len(), written);
    assert_eq!(bytes, escp::encode(&pipeline.fill(persons_data())?));
    assert!(bytes.starts_with(&[0x1B, b'@', 0x1B, b'C', 3]));
    assert!(bytes.ends_with(&[b'\r', 0x0C, 0x1B, b'@']));
    Ok(())
}

#[test]
fn test_missing_template_file() {
    init_logger();

    let err = PipelineBuilder::new().with_template_file("does/not/exist.json").err();
    assert!(matches!(err, Some(PipelineError::Io(ref e)) if e.to_string().contains("does/not/exist.json")));
}

#[test]
fn test_border_characters_encode_to_cp437() -> TestResult {
    init_logger();

    let template = json!({
        "pageFormat": { "pageLength": 10 },
        "template": [{ "table": "rows", "border": true, "columns": [{ "source": "v", "width": 3 }] }]
    });
    let pipeline = PipelineBuilder::new().with_template_source(&template.to_string(), "json")?.build()?;
    let bytes = pipeline.fill_bytes(json!({ "rows": [{ "v": "a" }] }))?;
    let text: Vec<u8> = bytes.iter().copied().filter(|b| *b >= 0x80).collect();
    // top rule, caption row, separator, data row, bottom rule
    assert_eq!(
        text,
        vec![0xDA, 0xC4, 0xC4, 0xBF, 0xB3, 0xB3, 0xC3, 0xC4, 0xC4, 0xB4, 0xB3, 0xB3, 0xC0, 0xC4, 0xC4, 0xD9]
    );
    Ok(())
}

#[test]
fn test_programmatic_report() -> TestResult {
    init_logger();

    let mut report = Report::with_format(PageFormat::with_page_length(5))?;
    report.append(Line::text("Scores"), false)?;
    let mut table = TableLine::new("scores");
    table.add_column("name", 6).set_caption("Who");
    table.add_column("score::right", 5).set_caption("Pts");
    report.append(Line::Table(table), false)?;

    let pipeline = PipelineBuilder::new().with_report(report).build()?;
    let result = pipeline.fill(json!({ "scores": [{ "name": "Ada", "score": 80 }] }))?;
    assert_eq!(
        result,
        stream(&[
            init(),
            escp::page_length(5),
            format!("Scores{CRLF}"),
            format!("{:<6}{:>5}{CRLF}", "Who", "Pts"),
            format!("{:<6}{:>5}{CRLF}{CRFF}", "Ada", "80"),
            init(),
        ])
    );
    Ok(())
}

#[test]
fn test_fill_with_several_sources() -> TestResult {
    init_logger();

    #[derive(serde::Serialize)]
    struct Agent {
        name: &'static str,
        code: &'static str,
    }

    let template = detail_template(json!({}), json!(["${name} ${code} ${@badge} {{record.badge()}} {{map.code}}"]));
    let pipeline = PipelineBuilder::new().with_template_source(&template.to_string(), "json")?.build()?;
    let record = RecordDataSource::new(&Agent { name: "Snake", code: "FOX" })?
        .with_accessor("badge", |r| json!(format!("[{}]", r["code"].as_str().unwrap_or_default())));
    let map = MapDataSource::new().with("code", "007").with("name", "James");
    let sources: Vec<Box<dyn DataSource>> = vec![Box::new(record), Box::new(map)];

    let result = pipeline.fill_sources(sources)?;
    assert_eq!(result, stream(&[init(), format!("Snake FOX [FOX] [FOX] 007{CRLF}{CRFF}"), init()]));
    Ok(())
}

#[test]
fn test_fills_are_independent() -> TestResult {
    init_logger();

    let template = detail_template(json!({ "pageLength": 4 }), json!(["%{INC n} %{BOLD}${name}%{BOLD}"]));
    let pipeline = PipelineBuilder::new().with_template_source(&template.to_string(), "json")?.build()?;

    let results: Vec<String> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let pipeline = &pipeline;
                scope.spawn(move || pipeline.fill(json!({ "name": format!("n{}", i) })))
            })
            .collect();
        handles.into_iter().map(|h| h.join().expect("fill thread panicked")).collect::<Vec<_>>()
    })
    .into_iter()
    .collect::<Result<_, _>>()?;

    for (i, result) in results.iter().enumerate() {
        let expected = format!(
            "{}{}1 {}n{}{}{CRLF}{CRFF}{}",
            init(),
            escp::page_length(4),
            escp::select_bold(),
            i,
            escp::cancel_bold(),
            init()
        );
        assert_eq!(result, &expected);
    }
    // the template itself is untouched by fills
    assert!(!pipeline.report().has_dynamic_line());
    assert_eq!(pipeline.report().flat_lines()[0].as_text(), Some("%{INC n} %{BOLD}${name}%{BOLD}"));
    Ok(())
}

#[test]
fn test_cli_writes_printer_file() -> TestResult {
    init_logger();

    let dir = tempfile::tempdir()?;
    let template_path = dir.path().join("list.json");
    let data_path = dir.path().join("data.json");
    let output_path = dir.path().join("list.prn");
    fs::write(&template_path, single_list_template().to_string())?;
    fs::write(&data_path, persons_data().to_string())?;

    let status = Command::new(env!("CARGO_BIN_EXE_platen"))
        .arg(&template_path)
        .arg(&data_path)
        .arg(&output_path)
        .status()?;
    assert!(status.success());

    let expected = PipelineBuilder::new()
        .with_template_file(&template_path)?
        .build()?
        .fill_bytes(persons_data())?;
    assert_eq!(fs::read(&output_path)?, expected);
    Ok(())
}

#[test]
fn test_cli_usage_error() -> TestResult {
    let output = Command::new(env!("CARGO_BIN_EXE_platen")).arg("only-one").output()?;
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Usage:"));
    Ok(())
}
