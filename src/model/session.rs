// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::{Deserialize, Serialize};

pub const SESSION_COLORS: [&str; 16] = [
    "#E53E3E", "#D53F8C", "#9F7AEA", "#667EEA", "#4299E1", "#0BC5EA", "#00B5D8", "#00A3C4",
    "#38B2AC", "#48BB78", "#68D391", "#9AE6B4", "#F6E05E", "#ED8936", "#FF6B35", "#D583F0",
];

/// Who is driving this session. Generated once and passed explicitly to the queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionIdentity {
    pub id: String,
    pub name: String,
    pub color: String,
}

impl SessionIdentity {
    /// A fresh `user-<9 chars>` identity; the name defaults to `User <last 3 chars>`.
    pub fn generate(name: Option<String>) -> Self {
        let uuid = uuid::Uuid::new_v4();
        let simple = uuid.simple().to_string();
        let suffix = &simple[..9];
        let id = format!("user-{suffix}");
        let color = SESSION_COLORS[usize::from(uuid.as_bytes()[0]) % SESSION_COLORS.len()];
        let name = name
            .map(|name| name.trim().to_owned())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| format!("User {}", suffix[6..].to_uppercase()));
        Self { id, name, color: color.to_owned() }
    }
}

#[cfg(test)]
mod tests {
    use super::{SessionIdentity, SESSION_COLORS};

    #[test]
    fn generated_identity_has_expected_shape() {
        let identity = SessionIdentity::generate(None);
        assert!(identity.id.starts_with("user-"));
        assert_eq!(identity.id.len(), "user-".len() + 9);
        let tail = identity.id[identity.id.len() - 3..].to_uppercase();
        assert_eq!(identity.name, format!("User {tail}"));
        assert!(SESSION_COLORS.contains(&identity.color.as_str()));
    }

    #[test]
    fn explicit_name_wins_unless_blank() {
        assert_eq!(SessionIdentity::generate(Some("Ana".into())).name, "Ana");
        assert!(SessionIdentity::generate(Some("  ".into())).name.starts_with("User "));
    }
}
