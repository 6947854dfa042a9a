//! Document export.
//!
//! A [`Document`] is rebuilt from the builder's elements on every call, so
//! exporting twice without changes yields identical output.

use std::{
    collections::HashMap,
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
};

use log::{info, warn};
use serde::Serialize;
use serde_json::{Serializer, Value, ser::PrettyFormatter};

use exsketch_core::{
    element::{BoundElement, Primitive},
    identifier::ElementId,
};

use crate::{SketchBuilder, SketchError};

/// Extension the editor expects on saved documents, without the dot.
pub const FILE_EXTENSION: &str = "excalidraw";

const DOCUMENT_TYPE: &str = "excalidraw";
const DOCUMENT_VERSION: u32 = 1;

/// A complete Excalidraw document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(rename = "type")]
    kind: &'static str,
    version: u32,
    source: String,
    elements: Vec<Value>,
    app_state: AppState,
}

impl Document {
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the serialized elements in creation order.
    pub fn elements(&self) -> &[Value] {
        &self.elements
    }

    pub fn app_state(&self) -> &AppState {
        &self.app_state
    }
}

/// Editor state stored alongside the elements.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    view_background_color: String,
    grid_size: Option<u32>,
}

impl AppState {
    pub fn view_background_color(&self) -> &str {
        &self.view_background_color
    }

    pub fn grid_size(&self) -> Option<u32> {
        self.grid_size
    }
}

impl SketchBuilder {
    /// Builds the document for the current elements.
    ///
    /// Every element bound by a line lists that line in its
    /// `boundElements`. Bindings to elements that are not part of this
    /// sketch are left on the line but otherwise ignored.
    pub fn document(&self) -> Document {
        let bound = self.bound_elements();
        let elements = self
            .elements
            .iter()
            .map(|(id, element)| {
                let bound = bound.get(id).map(Vec::as_slice).unwrap_or_default();
                element.to_json(bound)
            })
            .collect();

        Document {
            kind: DOCUMENT_TYPE,
            version: DOCUMENT_VERSION,
            source: self.config.source().to_string(),
            elements,
            app_state: AppState {
                view_background_color: self.config.background_color().to_string(),
                grid_size: self.config.grid_size(),
            },
        }
    }

    /// Serializes the document as JSON indented by four spaces.
    ///
    /// # Errors
    ///
    /// Returns [`SketchError::Serialize`] if serialization fails.
    pub fn to_json(&self) -> Result<String, SketchError> {
        let document = self.document();

        let mut buffer = Vec::new();
        let mut serializer =
            Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"    "));
        document.serialize(&mut serializer)?;

        info!(elements = document.elements.len(); "Document serialized");
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    /// Writes the document to `path` and returns the path written.
    ///
    /// `.excalidraw` is appended when `path` does not already end with it,
    /// so `diagram` and `diagram.json` become `diagram.excalidraw` and
    /// `diagram.json.excalidraw`.
    ///
    /// # Errors
    ///
    /// Returns [`SketchError::Io`] if the file cannot be written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<PathBuf, SketchError> {
        let path = with_file_extension(path.as_ref());
        let json = self.to_json()?;
        fs::write(&path, json)?;

        info!(path = path.display().to_string(); "Document saved");
        Ok(path)
    }

    /// Collects, per bound element, the lines attached to it.
    fn bound_elements(&self) -> HashMap<&ElementId, Vec<BoundElement>> {
        let mut bound: HashMap<&ElementId, Vec<BoundElement>> = HashMap::new();

        for line in self.elements.values().filter_map(|e| e.as_line()) {
            for target in line.bound_targets() {
                if !self.elements.contains_key(target) {
                    warn!(
                        line = line.id().as_str(),
                        target = target.as_str();
                        "Skipping binding to unknown element"
                    );
                    continue;
                }

                let entries = bound.entry(target).or_default();
                if !entries.iter().any(|entry| entry.id() == line.id()) {
                    entries.push(BoundElement::new(line.id().clone(), line.kind()));
                }
            }
        }

        bound
    }
}

/// Appends the document extension unless `path` already has it.
fn with_file_extension(path: &Path) -> PathBuf {
    if path.extension().is_some_and(|ext| ext == FILE_EXTENSION) {
        return path.to_path_buf();
    }

    let mut name = OsString::from(path.as_os_str());
    name.push(".");
    name.push(FILE_EXTENSION);
    PathBuf::from(name)
}
