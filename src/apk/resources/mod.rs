//! Resource table and density-specific launcher icons.

pub mod icons;
pub mod table;

use crate::apk::{
    container::ContainerEntry,
    error::Result,
    settings::ResourceSettings,
};
use icons::IconSet;

/// Fixed container path of the resource table.
pub const RESOURCE_TABLE_PATH: &str = "resources.arsc";

/// Produces `resources.arsc` and one icon entry per density bucket.
#[derive(Debug, Clone, Copy)]
pub struct ResourceTableBuilder<'a> {
    settings: &'a ResourceSettings,
}

impl<'a> ResourceTableBuilder<'a> {
    /// Builder using the given bucket table.
    pub fn new(settings: &'a ResourceSettings) -> Self {
        Self { settings }
    }

    /// Container path of the icon for `bucket`.
    pub fn icon_path(&self, bucket: &str) -> String {
        format!("res/{}/{}", bucket, self.settings.icon_file_name)
    }

    /// Produce the table entry followed by the icon entries.
    ///
    /// The table is stored; icons are deflated.
    ///
    /// # Errors
    ///
    /// [`crate::apk::Error::IconDecode`] if `icon` is not a decodable image.
    pub fn build(&self, icon: &[u8]) -> Result<Vec<ContainerEntry>> {
        let icon_set = IconSet::decode(icon, &self.settings.buckets)?;
        let rendered = icon_set.render()?;

        let paths: Vec<String> = rendered.iter().map(|r| self.icon_path(&r.bucket)).collect();

        let mut entries = Vec::with_capacity(rendered.len() + 1);
        entries.push(ContainerEntry::stored(RESOURCE_TABLE_PATH, table::encode(&paths)));
        entries.extend(
            rendered
                .into_iter()
                .zip(paths)
                .map(|(icon, path)| ContainerEntry::deflated(path, icon.png)),
        );
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apk::container::StorageMode;
    use crate::apk::error::Error;

    #[test]
    fn test_build_entries() {
        let settings = ResourceSettings::default();
        let entries = ResourceTableBuilder::new(&settings)
            .build(&icons::test_support::png(64))
            .unwrap();

        assert_eq!(entries.len(), 7);
        assert_eq!(entries[0].path, "resources.arsc");
        assert_eq!(entries[0].storage, StorageMode::Stored);
        assert!(entries[0].bytes.starts_with(&table::RES_TABLE_MAGIC));

        let icon_paths: Vec<_> = entries[1..].iter().map(|e| e.path.as_str()).collect();
        assert_eq!(
            icon_paths,
            [
                "res/drawable-ldpi/icon.png",
                "res/drawable-mdpi/icon.png",
                "res/drawable-hdpi/icon.png",
                "res/drawable-xhdpi/icon.png",
                "res/drawable-xxhdpi/icon.png",
                "res/drawable-xxxhdpi/icon.png",
            ]
        );
        assert!(entries[1..].iter().all(|e| e.storage == StorageMode::Deflated));
    }

    #[test]
    fn test_bad_icon_fails() {
        let settings = ResourceSettings::default();
        let err = ResourceTableBuilder::new(&settings).build(&[0u8; 16]).unwrap_err();
        assert!(matches!(err, Error::IconDecode(_)));
    }
}
