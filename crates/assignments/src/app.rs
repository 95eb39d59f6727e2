use config::AppRecord;

/// An application as the registry knows it.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct AppRef {
    /// Stable opaque identifier, unique per application.
    pub bundle_id: String,
    /// Display name. Not unique; used for suggestions and listings.
    pub name: String,
}

impl AppRef {
    /// Convenience constructor.
    pub fn new(bundle_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            bundle_id: bundle_id.into(),
            name: name.into(),
        }
    }

    /// The first ASCII letter of the display name, lowercased.
    ///
    /// Only ASCII letters are considered because only those have a key on
    /// the layout the codec understands.
    pub fn initial(&self) -> Option<char> {
        self.name
            .chars()
            .find(char::is_ascii_alphabetic)
            .map(|c| c.to_ascii_lowercase())
    }
}

impl From<AppRecord> for AppRef {
    fn from(r: AppRecord) -> Self {
        Self {
            bundle_id: r.bundle_identifier,
            name: r.app_name,
        }
    }
}

impl From<&AppRef> for AppRecord {
    fn from(a: &AppRef) -> Self {
        Self::new(a.bundle_id.clone(), a.name.clone())
    }
}
