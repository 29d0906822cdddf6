//! Name component for editor display

/// Human-readable entity name shown in hierarchy and inspector panels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name {
    /// Display name
    pub name: String,
}

impl Default for Name {
    fn default() -> Self {
        Self {
            name: String::from("Unnamed"),
        }
    }
}

impl Name {
    /// Create a name component
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_name() {
        assert_eq!(Name::default().name, "Unnamed");
        assert_eq!(Name::new("Crate").name, "Crate");
    }
}
