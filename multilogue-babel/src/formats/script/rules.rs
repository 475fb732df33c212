use crate::dialogue::Role;
use serde::{Deserialize, Serialize};

/// Knobs for reading scripts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptRules {
    /// Role given to a `Name:` header that carries no `(role)`
    pub default_role: Role,
}

impl Default for ScriptRules {
    fn default() -> Self {
        Self {
            default_role: Role::User,
        }
    }
}
