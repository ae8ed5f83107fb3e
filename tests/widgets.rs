//! Widget behavior through the public dispatch surface: keys mutate the
//! model through the adapter, renders reflect the model, and no element type
//! — known or not — panics the catalog.

mod common;

use crossterm::event::KeyCode;
use serde_json::json;

use surveyui::widget::{handle_key, render_element};
use surveyui::QuestionNumbers;

use common::{FakePanel, FakeQuestion, Harness, element, key, press, rendered_text};

#[test]
fn text_typing_commits_and_delete_clears() {
    let q = FakeQuestion::new("text", "q1").build();
    let el = element(&q);
    let mut h = Harness::focused_on(&q);

    assert!(handle_key(&el, &press('h'), &mut h.ctx()));
    assert!(handle_key(&el, &press('i'), &mut h.ctx()));
    assert_eq!(*q.value.borrow(), Some(json!("hi")));

    assert!(handle_key(&el, &key(KeyCode::Delete), &mut h.ctx()));
    assert_eq!(*q.value.borrow(), None);
}

#[test]
fn unknown_type_edits_like_text() {
    let q = FakeQuestion::new("holographic", "q1").build();
    let el = element(&q);
    let mut h = Harness::focused_on(&q);

    assert!(handle_key(&el, &press('x'), &mut h.ctx()));
    assert_eq!(*q.value.borrow(), Some(json!("x")));
}

#[test]
fn radiogroup_commits_the_cursor_choice() {
    let q = FakeQuestion::new("radiogroup", "color")
        .with_choices(&["red", "green", "blue"])
        .build();
    let el = element(&q);
    let mut h = Harness::focused_on(&q);

    handle_key(&el, &key(KeyCode::Right), &mut h.ctx());
    handle_key(&el, &press(' '), &mut h.ctx());
    assert_eq!(*q.value.borrow(), Some(json!("green")));

    let lines = rendered_text(&render_element(&el, &mut h.ctx()));
    assert!(lines.iter().any(|l| l.contains("(•) green")));
    assert!(lines.iter().any(|l| l.contains("( ) red")));
}

#[test]
fn checkbox_toggles_set_membership() {
    let q = FakeQuestion::new("checkbox", "features")
        .with_choices(&["a", "b", "c"])
        .build();
    let el = element(&q);
    let mut h = Harness::focused_on(&q);

    handle_key(&el, &press(' '), &mut h.ctx());
    handle_key(&el, &key(KeyCode::Right), &mut h.ctx());
    handle_key(&el, &press(' '), &mut h.ctx());
    assert_eq!(*q.value.borrow(), Some(json!(["a", "b"])));

    handle_key(&el, &press(' '), &mut h.ctx());
    assert_eq!(*q.value.borrow(), Some(json!(["a"])));
}

#[test]
fn boolean_commits_custom_values_regardless_of_layout() {
    let q = FakeQuestion::new("boolean", "subscribed")
        .with_prop("valueTrue", json!("Y"))
        .with_prop("valueFalse", json!("N"))
        .with_prop("swapOrder", json!(true))
        .build();
    let el = element(&q);
    let mut h = Harness::focused_on(&q);

    // Swapped layout puts the true option on the left.
    handle_key(&el, &key(KeyCode::Left), &mut h.ctx());
    assert_eq!(*q.value.borrow(), Some(json!("Y")));

    handle_key(&el, &key(KeyCode::Enter), &mut h.ctx());
    assert_eq!(*q.value.borrow(), Some(json!("N")));
}

#[test]
fn comment_clamps_on_input_not_on_blur() {
    let q = FakeQuestion::new("comment", "notes")
        .with_prop("maxWordCount", json!(3))
        .build();
    let el = element(&q);
    let mut h = Harness::focused_on(&q);

    for c in "a b c d".chars() {
        handle_key(&el, &press(c), &mut h.ctx());
    }
    assert_eq!(*q.value.borrow(), Some(json!("a b c ")));

    // Further typing can never push past the limit.
    handle_key(&el, &press('e'), &mut h.ctx());
    assert_eq!(*q.value.borrow(), Some(json!("a b c ")));
}

#[test]
fn ranking_reorder_is_a_permutation_of_the_choices() {
    let q = FakeQuestion::new("ranking", "priorities")
        .with_choices(&["x", "y", "z"])
        .build();
    let el = element(&q);
    let mut h = Harness::focused_on(&q);

    handle_key(&el, &press(' '), &mut h.ctx()); // grab
    handle_key(&el, &key(KeyCode::Right), &mut h.ctx());
    assert_eq!(*q.value.borrow(), Some(json!(["y", "x", "z"])));

    handle_key(&el, &key(KeyCode::Right), &mut h.ctx());
    let value = q.value.borrow().clone().unwrap();
    let mut sorted: Vec<String> = value
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect();
    sorted.sort();
    assert_eq!(sorted, vec!["x", "y", "z"]);
}

#[test]
fn select_to_rank_writes_only_the_ranked_list() {
    let q = FakeQuestion::new("ranking", "priorities")
        .with_choices(&["x", "y", "z"])
        .with_prop("selectToRankEnabled", json!(true))
        .build();
    let el = element(&q);
    let mut h = Harness::focused_on(&q);

    handle_key(&el, &press(' '), &mut h.ctx());
    assert_eq!(*q.value.borrow(), Some(json!(["x"])));

    handle_key(&el, &press(' '), &mut h.ctx());
    assert_eq!(*q.value.borrow(), Some(json!(["x", "y"])));
}

#[test]
fn matrix_builds_an_object_keyed_by_row() {
    let q = FakeQuestion::new("matrix", "satisfaction")
        .with_rows(&["quality", "speed"])
        .with_columns(&["low", "high"])
        .build();
    let el = element(&q);
    let mut h = Harness::focused_on(&q);

    handle_key(&el, &key(KeyCode::Right), &mut h.ctx());
    handle_key(&el, &press(' '), &mut h.ctx());
    assert_eq!(*q.value.borrow(), Some(json!({"quality": "high"})));

    handle_key(&el, &key(KeyCode::Down), &mut h.ctx());
    handle_key(&el, &key(KeyCode::Left), &mut h.ctx());
    handle_key(&el, &key(KeyCode::Enter), &mut h.ctx());
    assert_eq!(
        *q.value.borrow(),
        Some(json!({"quality": "high", "speed": "low"}))
    );

    let lines = rendered_text(&render_element(&el, &mut h.ctx()));
    assert!(lines.iter().any(|l| l.contains("quality") && l.contains("(•) high")));
    assert!(lines.iter().any(|l| l.contains("speed") && l.contains("(•) low")));
}

#[test]
fn single_file_commits_one_record_not_an_array() {
    let path = std::env::temp_dir().join(format!("surveyui-upload-{}.txt", std::process::id()));
    std::fs::write(&path, b"hello").unwrap();

    let q = FakeQuestion::new("file", "resume").build();
    let el = element(&q);
    let mut h = Harness::focused_on(&q);

    for c in path.to_string_lossy().chars() {
        handle_key(&el, &press(c), &mut h.ctx());
    }
    handle_key(&el, &key(KeyCode::Enter), &mut h.ctx());

    let value = q.value.borrow().clone().unwrap();
    assert!(value.is_object(), "allowMultiple off commits a bare record");
    assert_eq!(
        value.get("name").and_then(|n| n.as_str()),
        path.file_name().map(|n| n.to_str().unwrap())
    );

    let _ = std::fs::remove_file(&path);
}

#[test]
fn dynamic_panel_renumbers_after_removal() {
    let panel = FakePanel::new("contacts", 2);
    let el: surveyui::model::ElementRef = panel.clone();
    let mut h = Harness::unfocused();
    h.focused = Some("contacts".to_string());

    let lines = rendered_text(&render_element(&el, &mut h.ctx()));
    assert!(lines.iter().any(|l| l.contains("Item 1")));
    assert!(lines.iter().any(|l| l.contains("Item 2")));

    // Cursor sits on the first instance; removing it leaves one instance
    // that renders as Item 1 again.
    handle_key(&el, &press('x'), &mut h.ctx());
    let lines = rendered_text(&render_element(&el, &mut h.ctx()));
    assert!(lines.iter().any(|l| l.contains("Item 1")));
    assert!(!lines.iter().any(|l| l.contains("Item 2")));
}

#[test]
fn dropdown_selects_and_placeholder_row_clears() {
    let q = FakeQuestion::new("dropdown", "role")
        .with_choices(&["dev", "ops"])
        .build();
    let el = element(&q);
    let mut h = Harness::focused_on(&q);

    handle_key(&el, &key(KeyCode::Enter), &mut h.ctx()); // open, cursor on placeholder
    handle_key(&el, &key(KeyCode::Down), &mut h.ctx());
    handle_key(&el, &key(KeyCode::Enter), &mut h.ctx());
    assert_eq!(*q.value.borrow(), Some(json!("dev")));

    // Reopening puts the cursor on the current choice; Up reaches the
    // placeholder row, which clears the answer.
    handle_key(&el, &key(KeyCode::Enter), &mut h.ctx());
    handle_key(&el, &key(KeyCode::Up), &mut h.ctx());
    handle_key(&el, &key(KeyCode::Enter), &mut h.ctx());
    assert_eq!(*q.value.borrow(), None);
}

#[test]
fn rating_uses_the_derived_numeric_scale() {
    let q = FakeQuestion::new("rating", "score")
        .with_prop("rateMin", json!(2))
        .with_prop("rateMax", json!(8))
        .with_prop("rateStep", json!(3))
        .build();
    let el = element(&q);
    let mut h = Harness::focused_on(&q);

    handle_key(&el, &key(KeyCode::Right), &mut h.ctx());
    handle_key(&el, &press(' '), &mut h.ctx());
    assert_eq!(*q.value.borrow(), Some(json!(5)));
}

#[test]
fn multipletext_builds_an_object_keyed_by_item() {
    let q = FakeQuestion::new("multipletext", "contact")
        .with_items(&["first", "last"])
        .build();
    let el = element(&q);
    let mut h = Harness::focused_on(&q);

    handle_key(&el, &press('a'), &mut h.ctx());
    handle_key(&el, &key(KeyCode::Right), &mut h.ctx());
    handle_key(&el, &press('b'), &mut h.ctx());
    assert_eq!(
        *q.value.borrow(),
        Some(json!({"first": "a", "last": "b"}))
    );

    handle_key(&el, &key(KeyCode::Delete), &mut h.ctx());
    assert_eq!(*q.value.borrow(), Some(json!({"first": "a"})));
}

#[test]
fn numbering_policy_shapes_the_title() {
    let q = FakeQuestion::new("text", "age")
        .with_title("Your age")
        .required()
        .build();
    let el = element(&q);

    let mut h = Harness::unfocused();
    h.indices.insert("age".to_string(), (2, 5));

    let lines = rendered_text(&render_element(&el, &mut h.ctx()));
    assert_eq!(lines[0], "3. Your age *");

    h.base.numbering = QuestionNumbers::On;
    let lines = rendered_text(&render_element(&el, &mut h.ctx()));
    assert_eq!(lines[0], "6. Your age *");

    h.base.numbering = QuestionNumbers::Off;
    let lines = rendered_text(&render_element(&el, &mut h.ctx()));
    assert_eq!(lines[0], "Your age *");
}

#[test]
fn errors_stay_hidden_until_a_validation_attempt() {
    let q = FakeQuestion::new("text", "q1")
        .with_errors(&["Response required."])
        .build();
    let el = element(&q);
    let mut h = Harness::unfocused();

    let lines = rendered_text(&render_element(&el, &mut h.ctx()));
    assert!(!lines.iter().any(|l| l.contains("✖")));

    h.base = h.base.clone().with_validation_seq(1);
    let lines = rendered_text(&render_element(&el, &mut h.ctx()));
    assert!(lines.iter().any(|l| l.contains("✖ Response required.")));
}

#[test]
fn every_known_tag_renders_without_panicking() {
    let tags = [
        "text",
        "comment",
        "boolean",
        "radiogroup",
        "checkbox",
        "dropdown",
        "tagbox",
        "buttongroup",
        "rating",
        "imagepicker",
        "ranking",
        "matrix",
        "file",
        "signaturepad",
        "multipletext",
        "html",
        "image",
        "expression",
        "panel",
        "paneldynamic",
        "definitely-not-a-type",
    ];
    for tag in tags {
        let q = FakeQuestion::new(tag, "q").with_title("t").build();
        let el = element(&q);
        let mut h = Harness::focused_on(&q);
        let lines = render_element(&el, &mut h.ctx());
        assert!(!lines.is_empty(), "no output for {tag}");
        handle_key(&el, &press('x'), &mut h.ctx());
    }
}
