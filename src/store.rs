//! Persistence backends for templates.
//!
//! The editor only needs "put this template somewhere" and "get it back".
//! Failures surface as [`BuilderError::PersistenceFailure`] and never touch
//! the editing session.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::BuilderError;
use crate::model::Template;

pub trait TemplateStore {
    fn save(&mut self, template: &Template) -> Result<(), BuilderError>;

    fn load(&self, id: &str) -> Result<Template, BuilderError>;
}

/// One template per JSON file, written pretty-printed.
#[derive(Debug, Clone)]
pub struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TemplateStore for JsonFile {
    fn save(&mut self, template: &Template) -> Result<(), BuilderError> {
        let json = template.to_json_pretty()?;
        fs::write(&self.path, json).map_err(|e| {
            BuilderError::PersistenceFailure(format!("{}: {e}", self.path.display()))
        })
    }

    fn load(&self, id: &str) -> Result<Template, BuilderError> {
        let json = fs::read_to_string(&self.path).map_err(|e| {
            BuilderError::PersistenceFailure(format!("{}: {e}", self.path.display()))
        })?;
        let template = Template::from_json(&json)?;
        if template.id != id {
            return Err(BuilderError::PersistenceFailure(format!(
                "{} holds template {}, not {id}",
                self.path.display(),
                template.id
            )));
        }
        Ok(template)
    }
}

/// Serialized templates keyed by id.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    documents: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl TemplateStore for MemoryStore {
    fn save(&mut self, template: &Template) -> Result<(), BuilderError> {
        self.documents
            .insert(template.id.clone(), template.to_json()?);
        Ok(())
    }

    fn load(&self, id: &str) -> Result<Template, BuilderError> {
        let json = self
            .documents
            .get(id)
            .ok_or_else(|| BuilderError::PersistenceFailure(format!("no template {id}")))?;
        Template::from_json(json)
    }
}
