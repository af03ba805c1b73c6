//! Catalog fixture shared across tests.

#![allow(dead_code)]

use std::path::PathBuf;

use assert_fs::prelude::*;
use assert_fs::TempDir;
use stencil::CatalogRegistry;

pub const CATALOG_JSON: &str = r#"{
  "template_id": "company_profile_catalog",
  "name": "Company Profile Catalog",
  "version": "2.1",
  "created_date": "2025-01-15",
  "sections": {
    "document_identity_and_metadata": {
      "title": {
        "field_id": "title",
        "label": "Document Title",
        "data_type": "string",
        "required": true,
        "pii_type": "ORG_NAME"
      },
      "organization": {
        "name": { "field_id": "company_name", "label": "Company Name", "pii_type": "ORG_NAME" }
      }
    },
    "front_matter": {
      "summary": {
        "field_id": "executive_summary_text",
        "label": "Executive Summary",
        "data_type": "rich_text"
      }
    },
    "end_matter": {
      "contact": {
        "email": { "field_id": "contact_email", "label": "Contact Email", "pii_type": "EMAIL" },
        "phone": { "field_id": "contact_phone", "label": "Contact Phone", "pii_type": "PHONE" }
      }
    }
  }
}"#;

pub fn catalog() -> CatalogRegistry {
    CatalogRegistry::from_json_str(CATALOG_JSON).expect("fixture catalog parses")
}

/// Writes `content` as `catalog.json` in a fresh temp dir. Keep the
/// returned dir alive for as long as the path is used.
pub fn catalog_file(content: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("temp dir");
    let file = dir.child("catalog.json");
    file.write_str(content).expect("write catalog");
    let path = file.path().to_path_buf();
    (dir, path)
}
