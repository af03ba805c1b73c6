use std::path::Path;

use crate::error::TemplateError;
use crate::template::model::MasterTemplate;

impl MasterTemplate {
    pub fn to_json_pretty(&self) -> Result<String, TemplateError> {
        serde_json::to_string_pretty(self).map_err(TemplateError::Serialize)
    }

    pub fn from_json_str(content: &str) -> Result<Self, TemplateError> {
        serde_json::from_str(content).map_err(TemplateError::Deserialize)
    }
}

/// Writes the template as pretty JSON, creating missing parent directories.
pub fn write_template<P: AsRef<Path>>(
    template: &MasterTemplate,
    path: P,
) -> Result<(), TemplateError> {
    let path = path.as_ref();
    let write_error = |e| TemplateError::WriteFile {
        path: path.to_path_buf(),
        source: e,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_error)?;
    }

    let json = template.to_json_pretty()?;
    std::fs::write(path, json).map_err(write_error)?;
    Ok(())
}

pub fn read_template<P: AsRef<Path>>(path: P) -> Result<MasterTemplate, TemplateError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| TemplateError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;
    MasterTemplate::from_json_str(&content)
}
