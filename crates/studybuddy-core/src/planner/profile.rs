use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: Option<String>,
    pub dob: Option<String>,
    pub email: Option<String>,
}

impl Profile {
    /// Overwrite the fields present in `update`, keep the rest.
    pub fn merge(&mut self, update: Profile) {
        if update.name.is_some() {
            self.name = update.name;
        }
        if update.dob.is_some() {
            self.dob = update.dob;
        }
        if update.email.is_some() {
            self.email = update.email;
        }
    }

    /// Trimmed name, if one is set and not blank.
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().map(str::trim).filter(|n| !n.is_empty())
    }
}
