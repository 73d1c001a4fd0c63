//! Integration tests for the folio editing pipeline.
//!
//! These tests drive a `TemplateEditor` the way the builder UI does, from
//! catalog definitions and gestures through commands to the template document.
//! They verify:
//! - Row packing follows placement, resize and deletion
//! - Undo/redo restore exact template snapshots
//! - Cross-section moves and duplicates are single undo steps
//! - The activity feed is independent of the history
//! - The JSON document survives a save/load round trip

use pretty_assertions::assert_eq;

use folio::activity::ActionType;
use folio::catalog::{FieldCatalog, FieldDefinition, StaticCatalog};
use folio::command::Operation;
use folio::config::BuilderConfig;
use folio::error::{BuilderError, TargetError};
use folio::history::replay;
use folio::keymap::KeyChord;
use folio::layout::{Row, TemplateLayout};
use folio::model::{FieldId, PlacedField, SectionKind, Template};
use folio::placement::{DropPoint, PlacementController, RowGridStrategy, Viewport};
use folio::store::{MemoryStore, TemplateStore};
use folio::style::{self, QuickPreset, WidthPreset};
use folio::TemplateEditor;

// ─── Helpers ────────────────────────────────────────────────────

fn field(id: &str, width: f64) -> PlacedField {
    let definition = FieldDefinition::new("text", id.to_uppercase(), format!("student.{id}"))
        .with_width(width)
        .with_style("fontSize", serde_json::json!(12));
    let mut field = PlacedField::from_definition(&definition);
    field.id = FieldId::new(id);
    field
}

fn add(section: SectionKind, id: &str, width: f64) -> Operation {
    Operation::Add {
        section,
        index: None,
        field: field(id, width),
    }
}

fn row_ids(rows: &[Row]) -> Vec<Vec<&str>> {
    rows.iter()
        .map(|row| row.cells.iter().map(|c| c.field_id.as_str()).collect())
        .collect()
}

fn section_ids(template: &Template, kind: SectionKind) -> Vec<&str> {
    template
        .section(kind)
        .fields()
        .iter()
        .map(|f| f.id.as_str())
        .collect()
}

fn editor() -> TemplateEditor {
    TemplateEditor::blank("diploma", "Diploma")
}

// ─── Row Packing Scenarios ──────────────────────────────────────

#[test]
fn test_three_halves_wrap_then_undo_and_redo() {
    let mut editor = editor();
    editor.execute(add(SectionKind::Body, "a", 0.5)).unwrap();
    assert_eq!(row_ids(editor.rows(SectionKind::Body)), vec![vec!["a"]]);

    editor.execute(add(SectionKind::Body, "b", 0.5)).unwrap();
    assert_eq!(row_ids(editor.rows(SectionKind::Body)), vec![vec!["a", "b"]]);

    editor.execute(add(SectionKind::Body, "c", 0.5)).unwrap();
    assert_eq!(
        row_ids(editor.rows(SectionKind::Body)),
        vec![vec!["a", "b"], vec!["c"]]
    );

    for _ in 0..3 {
        editor.undo().unwrap().unwrap();
    }
    assert!(editor.template().section(SectionKind::Body).is_empty());
    assert!(editor.rows(SectionKind::Body).is_empty());
    assert!(editor.undo().is_none());

    for _ in 0..3 {
        editor.redo().unwrap().unwrap();
    }
    assert_eq!(
        row_ids(editor.rows(SectionKind::Body)),
        vec![vec!["a", "b"], vec!["c"]]
    );
    assert!(editor.redo().is_none());
}

#[test]
fn test_resize_repacks_rows() {
    let mut editor = editor();
    for id in ["a", "b", "c"] {
        editor.execute(add(SectionKind::Body, id, 0.5)).unwrap();
    }
    let a = editor.template().field(&FieldId::new("a")).unwrap().clone();
    editor.execute(style::resize(&a, WidthPreset::Quarter)).unwrap();
    let b = editor.template().field(&FieldId::new("b")).unwrap().clone();
    editor.execute(style::resize(&b, WidthPreset::Quarter)).unwrap();

    assert_eq!(
        row_ids(editor.rows(SectionKind::Body)),
        vec![vec!["a", "b", "c"]]
    );
    assert_eq!(
        editor.activity().latest().unwrap().message,
        "Resized \"B\" to 25%"
    );
}

#[test]
fn test_delete_prunes_empty_rows() {
    let mut editor = editor();
    editor.execute(add(SectionKind::Footer, "wide", 1.0)).unwrap();
    editor.execute(add(SectionKind::Footer, "small", 0.25)).unwrap();
    editor
        .execute(Operation::Delete {
            field: FieldId::new("wide"),
        })
        .unwrap();
    assert_eq!(row_ids(editor.rows(SectionKind::Footer)), vec![vec!["small"]]);
    assert!(editor.rows(SectionKind::Footer).iter().all(|r| !r.is_empty()));
}

#[test]
fn test_oversized_import_is_clamped_alone() {
    let json = r#"{
        "id": "imported",
        "name": "Imported",
        "sections": {
            "body": [
                { "id": "a", "fieldType": "text", "label": "A", "dataBindingKey": "a", "width": 0.5, "position": 0 },
                { "id": "huge", "fieldType": "text", "label": "Huge", "dataBindingKey": "h", "width": 1.8, "position": 1 },
                { "id": "b", "fieldType": "text", "label": "B", "dataBindingKey": "b", "width": 0.5, "position": 2 }
            ]
        }
    }"#;
    let mut editor = editor();
    editor.hydrate_json(json).unwrap();
    let rows = editor.rows(SectionKind::Body);
    assert_eq!(row_ids(rows), vec![vec!["a"], vec!["huge"], vec!["b"]]);
    assert!(rows[1].cells[0].clamped);
    assert_eq!(rows[1].cells[0].width, 1.0);
    assert_eq!(
        editor.layout().clamped_fields(),
        vec![(SectionKind::Body, FieldId::new("huge"))]
    );
}

#[test]
fn test_preset_applies_to_oversized_import() {
    let json = r#"{
        "id": "imported",
        "name": "Imported",
        "sections": {
            "body": [
                { "id": "huge", "fieldType": "text", "label": "Huge", "dataBindingKey": "h", "width": 1.8, "position": 0 }
            ]
        }
    }"#;
    let mut editor = editor();
    editor.hydrate_json(json).unwrap();
    let before = editor.template().clone();
    let huge = editor.template().field(&FieldId::new("huge")).unwrap().clone();

    editor
        .execute(style::restyle(&huge, Some(QuickPreset::Title), None))
        .unwrap();
    let styled = editor.template().field(&FieldId::new("huge")).unwrap();
    assert_eq!(styled.style["fontWeight"], serde_json::json!(700));
    assert_eq!(styled.width, 1.8);
    assert!(editor.rows(SectionKind::Body)[0].cells[0].clamped);
    let latest = editor.activity().latest().unwrap();
    assert_eq!(latest.action, ActionType::Style);
    assert_eq!(latest.message, "Styled \"Huge\"");

    editor.undo().unwrap().unwrap();
    assert_eq!(editor.template(), &before);

    let err = editor.execute(style::resize(&huge, 1.5)).unwrap_err();
    assert!(matches!(err, BuilderError::InvalidWidth(_)));
    assert_eq!(editor.template(), &before);
}

// ─── Move and Duplicate ─────────────────────────────────────────

#[test]
fn test_move_header_to_footer_then_undo() {
    let mut editor = editor();
    editor.execute(add(SectionKind::Header, "logo", 0.25)).unwrap();
    editor.execute(add(SectionKind::Header, "a", 0.5)).unwrap();
    editor.execute(add(SectionKind::Header, "title", 0.25)).unwrap();
    editor.execute(add(SectionKind::Footer, "page", 0.25)).unwrap();
    editor.execute(add(SectionKind::Footer, "date", 0.5)).unwrap();
    let before = editor.serialize();

    editor
        .execute(Operation::Move {
            field: FieldId::new("a"),
            to: SectionKind::Footer,
            index: 0,
        })
        .unwrap();
    assert_eq!(section_ids(editor.template(), SectionKind::Header), vec!["logo", "title"]);
    assert_eq!(
        section_ids(editor.template(), SectionKind::Footer),
        vec!["a", "page", "date"]
    );
    assert_eq!(editor.history().undo_depth(), 6);

    editor.undo().unwrap().unwrap();
    assert_eq!(editor.template(), &before);
    assert_eq!(editor.template().field(&FieldId::new("a")).unwrap().position, 1);
    assert_eq!(editor.layout(), &TemplateLayout::of(&before));
}

#[test]
fn test_duplicate_then_undo_removes_only_the_copy() {
    let mut editor = editor();
    editor.execute(add(SectionKind::Body, "a", 0.25)).unwrap();
    editor.execute(add(SectionKind::Body, "b", 0.25)).unwrap();
    editor.execute(add(SectionKind::Body, "c", 0.25)).unwrap();
    let before = editor.serialize();

    editor
        .execute(Operation::Duplicate {
            field: FieldId::new("b"),
        })
        .unwrap();
    let body = editor.template().section(SectionKind::Body).fields();
    assert_eq!(body.len(), 4);
    let copy = &body[2];
    assert_ne!(copy.id.as_str(), "b");
    assert_eq!(copy.style, body[1].style);
    assert_eq!(copy.width, body[1].width);
    assert_eq!(body[3].id.as_str(), "c");
    let copy_id = copy.id.clone();

    editor.undo().unwrap().unwrap();
    assert_eq!(editor.template(), &before);
    assert!(!editor.template().contains(&copy_id));

    // redo restores the same identifier, not a fresh one
    editor.redo().unwrap().unwrap();
    assert!(editor.template().contains(&copy_id));
}

// ─── History Rules ──────────────────────────────────────────────

#[test]
fn test_new_command_discards_redo_branch() {
    let mut editor = editor();
    editor.execute(add(SectionKind::Body, "a", 0.5)).unwrap();
    editor.execute(add(SectionKind::Body, "b", 0.5)).unwrap();
    editor.undo().unwrap().unwrap();
    assert!(editor.can_redo());

    editor.execute(add(SectionKind::Body, "c", 0.5)).unwrap();
    assert!(!editor.can_redo());
    assert!(editor.redo().is_none());
    assert_eq!(section_ids(editor.template(), SectionKind::Body), vec!["a", "c"]);
}

#[test]
fn test_rejected_command_is_atomic() {
    let mut editor = editor();
    editor.execute(add(SectionKind::Body, "a", 0.5)).unwrap();
    editor.undo().unwrap().unwrap();
    editor.execute(add(SectionKind::Body, "b", 0.5)).unwrap();
    editor.execute(add(SectionKind::Body, "a", 0.5)).unwrap();
    editor.undo().unwrap().unwrap();
    let template = editor.serialize();
    let undo_depth = editor.history().undo_depth();
    let redo_depth = editor.history().redo_depth();
    let activity = editor.activity().len();

    let err = editor
        .execute(Operation::Move {
            field: FieldId::new("b"),
            to: SectionKind::SignatureArea,
            index: 5,
        })
        .unwrap_err();
    assert!(matches!(
        err,
        BuilderError::InvalidTarget(TargetError::PositionOutOfBounds { .. })
    ));
    let err = editor.execute(add(SectionKind::Body, "b", 0.5)).unwrap_err();
    assert!(matches!(
        err,
        BuilderError::InvalidTarget(TargetError::DuplicateField { .. })
    ));
    let b = editor.template().field(&FieldId::new("b")).unwrap().clone();
    let err = editor.execute(style::resize(&b, 1.5)).unwrap_err();
    assert!(matches!(err, BuilderError::InvalidWidth(_)));

    assert_eq!(editor.template(), &template);
    assert_eq!(editor.history().undo_depth(), undo_depth);
    assert_eq!(editor.history().redo_depth(), redo_depth);
    assert_eq!(editor.activity().len(), activity);
}

#[test]
fn test_replay_reproduces_session() {
    let mut editor = editor();
    editor.execute(add(SectionKind::Header, "a", 0.5)).unwrap();
    editor.execute(add(SectionKind::Body, "b", 0.5)).unwrap();
    editor
        .execute(Operation::Move {
            field: FieldId::new("a"),
            to: SectionKind::Body,
            index: 0,
        })
        .unwrap();
    editor
        .execute(Operation::Duplicate {
            field: FieldId::new("b"),
        })
        .unwrap();
    let b = editor.template().field(&FieldId::new("b")).unwrap().clone();
    editor
        .execute(style::restyle(&b, Some(QuickPreset::Emphasis), None))
        .unwrap();

    let replayed = replay(&Template::new("diploma", "Diploma"), editor.history().applied()).unwrap();
    assert_eq!(&replayed, editor.template());
}

#[test]
fn test_depth_cap_keeps_current_state() {
    let config = BuilderConfig {
        history_depth: 3,
        activity_capacity: 4,
        ..BuilderConfig::default()
    };
    let mut editor = TemplateEditor::with_config(Template::new("t", "T"), &config);
    for i in 0..6 {
        editor
            .execute(add(SectionKind::Body, &format!("f{i}"), 0.25))
            .unwrap();
    }
    assert_eq!(editor.template().field_count(), 6);
    assert_eq!(editor.history().undo_depth(), 3);
    assert_eq!(editor.activity().len(), 4);
    let replayed = replay(editor.baseline(), editor.history().applied()).unwrap();
    assert_eq!(&replayed, editor.template());
}

#[test]
fn test_history_cap_keeps_older_activity_entries() {
    let config = BuilderConfig {
        history_depth: 2,
        activity_capacity: 10,
        ..BuilderConfig::default()
    };
    let mut editor = TemplateEditor::with_config(Template::new("t", "T"), &config);
    for i in 0..5 {
        editor
            .execute(add(SectionKind::Body, &format!("f{i}"), 0.25))
            .unwrap();
    }
    assert_eq!(editor.history().undo_depth(), 2);
    assert_eq!(editor.activity().len(), 5);

    let oldest = editor.activity().entries().last().unwrap();
    assert_eq!(oldest.action, ActionType::Add);
    assert_eq!(oldest.message, "Added \"F0\" to Body");

    editor.undo().unwrap().unwrap();
    editor.undo().unwrap().unwrap();
    assert!(editor.undo().is_none());
    assert_eq!(editor.activity().len(), 7);
    assert_eq!(
        editor.activity().entries().last().unwrap().message,
        "Added \"F0\" to Body"
    );
}

// ─── Activity Log ───────────────────────────────────────────────

#[test]
fn test_clearing_activity_does_not_affect_undo() {
    let mut with_log = editor();
    let mut cleared = editor();
    for editor in [&mut with_log, &mut cleared] {
        editor.execute(add(SectionKind::Body, "a", 0.5)).unwrap();
        editor.execute(add(SectionKind::Body, "b", 0.5)).unwrap();
    }
    cleared.clear_activity();
    assert!(cleared.activity().is_empty());

    with_log.undo().unwrap().unwrap();
    cleared.undo().unwrap().unwrap();
    assert_eq!(with_log.template(), cleared.template());
    with_log.redo().unwrap().unwrap();
    cleared.redo().unwrap().unwrap();
    assert_eq!(with_log.template(), cleared.template());
    assert_eq!(cleared.activity().len(), 2);
}

#[test]
fn test_activity_feed_messages() {
    let mut editor = editor();
    editor.execute(add(SectionKind::Body, "a", 0.5)).unwrap();
    editor
        .execute(Operation::Move {
            field: FieldId::new("a"),
            to: SectionKind::SignatureArea,
            index: 0,
        })
        .unwrap();
    editor.undo().unwrap().unwrap();
    editor.mark_saved();

    let feed: Vec<(ActionType, &str)> = editor
        .activity()
        .entries()
        .map(|e| (e.action, e.message.as_str()))
        .collect();
    assert_eq!(
        feed,
        vec![
            (ActionType::Save, "Saved template \"Diploma\""),
            (ActionType::Undo, "Undid: Moved \"A\" from Body to Signature area"),
            (ActionType::Move, "Moved \"A\" from Body to Signature area"),
            (ActionType::Add, "Added \"A\" to Body"),
        ]
    );
}

// ─── Placement and Style ────────────────────────────────────────

#[test]
fn test_drop_between_cells_then_undo() {
    let catalog = StaticCatalog::certificate();
    let controller = PlacementController::new(Viewport::Pointer, RowGridStrategy::new(600.0, 40.0));
    let mut editor = editor();
    editor.execute(add(SectionKind::Body, "a", 0.5)).unwrap();
    editor.execute(add(SectionKind::Body, "b", 0.5)).unwrap();

    let course = catalog.find("course.name").unwrap();
    let mut unused = |_: &FieldDefinition| -> Option<SectionKind> { None };
    let op = controller
        .drop_at(
            &course,
            SectionKind::Body,
            DropPoint::new(320.0, 10.0),
            editor.rows(SectionKind::Body),
            &mut unused,
        )
        .unwrap();
    editor.execute(op).unwrap();

    let body = editor.template().section(SectionKind::Body);
    assert_eq!(body.get(1).unwrap().label, "Course");
    assert_eq!(editor.rows(SectionKind::Body).len(), 2);
    editor.handle_key(KeyChord::ctrl('z')).unwrap().unwrap();
    assert_eq!(section_ids(editor.template(), SectionKind::Body), vec!["a", "b"]);
}

#[test]
fn test_cancelled_section_prompt_leaves_no_trace() {
    let catalog = StaticCatalog::certificate();
    let controller = PlacementController::new(Viewport::for_width(375.0), RowGridStrategy::new(375.0, 40.0));
    let editor = editor();
    let director = catalog.find("signatures.director").unwrap();
    let mut cancel = |_: &FieldDefinition| -> Option<SectionKind> { None };
    let op = controller.drop_at(
        &director,
        SectionKind::Body,
        DropPoint::new(10.0, 10.0),
        editor.rows(SectionKind::Body),
        &mut cancel,
    );
    assert!(op.is_none());
    assert!(!editor.can_undo());
    assert!(editor.activity().is_empty());
}

#[test]
fn test_preset_and_override_go_through_history() {
    let mut editor = editor();
    editor.execute(add(SectionKind::Body, "a", 0.5)).unwrap();
    let before = editor.serialize();

    let a = editor.template().field(&FieldId::new("a")).unwrap().clone();
    let mut overrides = folio::model::StyleMap::new();
    overrides.insert("fontSize".to_string(), serde_json::json!(30));
    editor
        .execute(style::restyle(&a, Some(QuickPreset::Title), Some(&overrides)))
        .unwrap();
    let styled = editor.template().field(&FieldId::new("a")).unwrap();
    assert_eq!(styled.style["fontSize"], serde_json::json!(30));
    assert_eq!(styled.style["fontWeight"], serde_json::json!(700));
    assert_eq!(editor.activity().latest().unwrap().action, ActionType::Style);

    let a = styled.clone();
    editor
        .execute(style::configure(&a, Some("Full name"), None, &Default::default()))
        .unwrap();
    assert_eq!(editor.activity().latest().unwrap().action, ActionType::Config);

    editor.undo().unwrap().unwrap();
    editor.undo().unwrap().unwrap();
    assert_eq!(editor.template(), &before);
}

// ─── Persistence ────────────────────────────────────────────────

#[test]
fn test_save_and_hydrate_round_trip() {
    let mut editor = editor();
    editor.execute(add(SectionKind::Header, "a", 0.5)).unwrap();
    editor.execute(add(SectionKind::SignatureArea, "s", 0.5)).unwrap();
    let mut store = MemoryStore::new();
    editor.save_to(&mut store).unwrap();

    let loaded = store.load("diploma").unwrap();
    let mut other = TemplateEditor::blank("scratch", "Scratch");
    other.hydrate(loaded).unwrap();
    assert_eq!(other.template(), editor.template());
    assert_eq!(other.layout(), editor.layout());
    assert!(!other.can_undo());
}

#[test]
fn test_document_json_shape() {
    let mut editor = editor();
    editor.execute(add(SectionKind::SignatureArea, "sig", 0.5)).unwrap();
    let value: serde_json::Value = serde_json::from_str(&editor.template().to_json().unwrap()).unwrap();
    let sig = &value["sections"]["signature_area"][0];
    assert_eq!(sig["id"], "sig");
    assert_eq!(sig["fieldType"], "text");
    assert_eq!(sig["dataBindingKey"], "student.sig");
    assert_eq!(sig["position"], 0);
    assert!(value.get("rows").is_none());
    assert!(value["dataSourceId"].is_null());
}

#[test]
fn test_hydrate_rejects_duplicate_identifiers() {
    let json = r#"{
        "id": "bad",
        "name": "Bad",
        "sections": {
            "header": [{ "id": "x", "fieldType": "text", "label": "X", "dataBindingKey": "x", "width": 0.5 }],
            "footer": [{ "id": "x", "fieldType": "text", "label": "X", "dataBindingKey": "x", "width": 0.5 }]
        }
    }"#;
    let mut editor = editor();
    editor.execute(add(SectionKind::Body, "keep", 0.5)).unwrap();
    let err = editor.hydrate_json(json).unwrap_err();
    assert!(matches!(
        err,
        BuilderError::InvalidTarget(TargetError::DuplicateField { .. })
    ));
    assert!(editor.template().contains(&FieldId::new("keep")));
    assert!(editor.can_undo());
}
