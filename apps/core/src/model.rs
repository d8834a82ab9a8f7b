use serde::{Deserialize, Serialize};

/// Opaque icon handle handed through to the shell untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IconRef(String);

impl IconRef {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppEntry {
    pub name: String,
    pub path: String,
    pub icon: IconRef,
    folded_name: String,
    folded_path: String,
}

impl AppEntry {
    pub fn new(name: &str, path: &str) -> Self {
        Self::from_owned(name.to_string(), path.to_string(), IconRef::new(path))
    }

    pub fn from_owned(name: String, path: String, icon: IconRef) -> Self {
        let folded_name = fold_case(&name);
        let folded_path = fold_case(&path);
        Self {
            name,
            path,
            icon,
            folded_name,
            folded_path,
        }
    }

    pub fn folded_name(&self) -> &str {
        &self.folded_name
    }

    pub fn folded_path(&self) -> &str {
        &self.folded_path
    }

    pub fn display_label(&self, show_full_path: bool) -> String {
        if show_full_path {
            format!("{}  ({})", self.name, self.path)
        } else {
            self.name.clone()
        }
    }
}

/// Lowercases one character at a time so a folded substring of a name is
/// always a substring of the folded name.
pub fn fold_case(input: &str) -> String {
    input.chars().flat_map(char::to_lowercase).collect()
}
