use serde_json::{Value, json};

/// A template with the given page format and detail lines
pub fn detail_template(page_format: Value, detail: Value) -> Value {
    json!({ "pageFormat": page_format, "template": detail })
}

/// Detail lines around a three-column person table, three lines per page
pub fn single_table_template() -> Value {
    detail_template(
        json!({ "pageLength": 3 }),
        json!([
            "This is detail 1.",
            {
                "table": "persons",
                "columns": [
                    { "source": "firstName", "width": 10 },
                    { "source": "lastName", "width": 20 },
                    { "source": "nickname", "width": 10 }
                ]
            },
            "This is detail 2."
        ]),
    )
}

/// Detail lines around a person list with header and footer, five lines per page
pub fn single_list_template() -> Value {
    detail_template(
        json!({ "pageLength": 5 }),
        json!([
            "This is detail 1.",
            {
                "list": "persons",
                "line": "Page %{PAGE_NO}: ${firstName} ${lastName} as ${nickname}",
                "header": ["This is header of list."],
                "footer": ["This is footer of list."]
            },
            "This is detail 2."
        ]),
    )
}

pub fn persons() -> Value {
    json!([
        { "nickname": "None", "firstName": "David", "lastName": "None" },
        { "nickname": "David", "firstName": "Solid", "lastName": "Snake" },
        { "nickname": "Snake", "firstName": "Jocki", "lastName": "Hendry" }
    ])
}

pub fn persons_data() -> Value {
    json!({ "persons": persons() })
}

/// `count` generated rows for growing-table scenarios
pub fn generated_rows(count: usize) -> Value {
    let rows: Vec<Value> = (1..=count)
        .map(|i| json!({ "id": i, "name": format!("Item {}", i), "price": i as f64 * 1.5 }))
        .collect();
    json!({ "items": rows })
}
