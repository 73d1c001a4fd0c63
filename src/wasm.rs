//! Browser bindings. Operations go in as JS objects or JSON; templates,
//! layouts and the activity feed come back as plain JS values.

use wasm_bindgen::prelude::*;

use crate::activity::ActivityEntry;
use crate::catalog::{FieldCatalog, StaticCatalog};
use crate::command::Operation;
use crate::editor::TemplateEditor;
use crate::error::BuilderError;
use crate::keymap::KeyChord;
use crate::model::Template;

fn to_js(e: BuilderError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn to_value<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[wasm_bindgen]
pub struct WasmTemplateEditor {
    inner: TemplateEditor,
}

#[wasm_bindgen]
impl WasmTemplateEditor {
    #[wasm_bindgen(constructor)]
    pub fn new(id: &str, name: &str) -> WasmTemplateEditor {
        WasmTemplateEditor {
            inner: TemplateEditor::blank(id, name),
        }
    }

    /// Load a template document. Clears history and activity.
    pub fn hydrate(&mut self, json: &str) -> Result<JsValue, JsValue> {
        let template = self.inner.hydrate_json(json).map_err(to_js)?;
        to_value(template)
    }

    pub fn serialize(&self) -> Result<String, JsValue> {
        self.inner.template().to_json().map_err(to_js)
    }

    /// Execute an operation given as a JS object, e.g.
    /// `{ type: "delete", field: "abc" }`.
    pub fn execute(&mut self, operation: JsValue) -> Result<JsValue, JsValue> {
        let operation: Operation = serde_wasm_bindgen::from_value(operation)
            .map_err(|e| JsValue::from_str(&format!("invalid operation: {e}")))?;
        let template = self.inner.execute(operation).map_err(to_js)?;
        to_value(template)
    }

    /// Returns the template, or `null` when there is nothing to undo.
    pub fn undo(&mut self) -> Result<JsValue, JsValue> {
        match self.inner.undo() {
            Some(result) => to_value(result.map_err(to_js)?),
            None => Ok(JsValue::NULL),
        }
    }

    pub fn redo(&mut self) -> Result<JsValue, JsValue> {
        match self.inner.redo() {
            Some(result) => to_value(result.map_err(to_js)?),
            None => Ok(JsValue::NULL),
        }
    }

    /// Route a keydown event. Returns `null` if the chord is unbound or the
    /// history has nothing to act on.
    #[wasm_bindgen(js_name = handleKey)]
    pub fn handle_key(&mut self, key: &str, ctrl: bool, shift: bool, meta: bool) -> Result<JsValue, JsValue> {
        let Some(key) = key.chars().next() else {
            return Ok(JsValue::NULL);
        };
        let chord = KeyChord {
            key,
            ctrl,
            shift,
            meta,
        };
        match self.inner.handle_key(chord) {
            Some(result) => to_value(result.map_err(to_js)?),
            None => Ok(JsValue::NULL),
        }
    }

    #[wasm_bindgen(js_name = canUndo)]
    pub fn can_undo(&self) -> bool {
        self.inner.can_undo()
    }

    #[wasm_bindgen(js_name = canRedo)]
    pub fn can_redo(&self) -> bool {
        self.inner.can_redo()
    }

    pub fn layout(&self) -> Result<JsValue, JsValue> {
        to_value(self.inner.layout())
    }

    pub fn activity(&self) -> Result<JsValue, JsValue> {
        let entries: Vec<&ActivityEntry> = self.inner.activity().entries().collect();
        to_value(&entries)
    }

    #[wasm_bindgen(js_name = clearActivity)]
    pub fn clear_activity(&mut self) {
        self.inner.clear_activity();
    }

    /// Record a save point after the host has persisted `serialize()`.
    #[wasm_bindgen(js_name = markSaved)]
    pub fn mark_saved(&mut self) {
        self.inner.mark_saved();
    }
}

/// The built-in certificate catalog.
#[wasm_bindgen(js_name = certificateCatalog)]
pub fn certificate_catalog() -> Result<JsValue, JsValue> {
    to_value(&StaticCatalog::certificate().list_available_fields())
}

/// Parse a template document and return its packed rows.
#[wasm_bindgen(js_name = layoutTemplate)]
pub fn layout_template(json: &str) -> Result<JsValue, JsValue> {
    let template = Template::from_json(json).map_err(to_js)?;
    to_value(&crate::layout::TemplateLayout::of(&template))
}
