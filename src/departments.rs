// src/departments.rs
//! License type → issuing department lookup
//!
//! Documents whose license type has no department are still stored and
//! pinned, they just never get anchored on chain.

use std::collections::BTreeMap;

/// Built-in table; config rows are layered on top
const BUILTIN: &[(&str, &str)] = &[
    ("fssai-license", "Food Safety and Standards Authority"),
    ("trade-license", "Municipal Corporation"),
    ("shop-establishment", "Labour Department"),
    ("fire-noc", "Fire and Emergency Services"),
    ("pollution-noc", "State Pollution Control Board"),
    ("drug-license", "Drugs Control Department"),
    ("factory-license", "Department of Factories and Boilers"),
    ("building-permit", "Town and Country Planning"),
];

#[derive(Debug, Clone)]
pub struct DepartmentDirectory {
    table: BTreeMap<String, String>,
}

impl DepartmentDirectory {
    pub fn builtin() -> Self {
        Self::with_overrides(&BTreeMap::new())
    }

    pub fn with_overrides(overrides: &BTreeMap<String, String>) -> Self {
        let mut table: BTreeMap<String, String> = BUILTIN
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        for (license_type, department) in overrides {
            table.insert(normalize(license_type), department.clone());
        }
        Self { table }
    }

    /// Case- and whitespace-insensitive lookup
    pub fn department_for(&self, license_type: &str) -> Option<&str> {
        self.table.get(&normalize(license_type)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl Default for DepartmentDirectory {
    fn default() -> Self {
        Self::builtin()
    }
}

fn normalize(license_type: &str) -> String {
    license_type.trim().to_ascii_lowercase()
}
