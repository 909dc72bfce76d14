//! `AndroidManifest.xml` generation.
//!
//! The descriptor is plain UTF-8 XML written through `quick-xml`, so every
//! user-supplied value (label, version name) is escaped and the document is
//! always well-formed. It is stored uncompressed.

use crate::apk::{
    container::ContainerEntry,
    error::{AssemblyCause, Error, Result},
    metadata::AppIdentity,
    settings::ManifestSettings,
};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use std::fmt::Display;

/// Fixed container path of the descriptor.
pub const MANIFEST_PATH: &str = "AndroidManifest.xml";

const ANDROID_NAMESPACE_URI: &str = "http://schemas.android.com/apk/res/android";

type RenderResult<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Writes the application descriptor from an [`AppIdentity`].
#[derive(Debug, Clone, Copy)]
pub struct ManifestEncoder<'a> {
    settings: &'a ManifestSettings,
}

impl<'a> ManifestEncoder<'a> {
    /// Encoder using the given manifest table.
    pub fn new(settings: &'a ManifestSettings) -> Self {
        Self { settings }
    }

    /// Produce the descriptor entry.
    ///
    /// `entry_point` is the asset path the launcher activity loads, relative
    /// to the `assets/` directory (e.g. `www/index.html`).
    pub fn encode(&self, identity: &AppIdentity, entry_point: &str) -> Result<ContainerEntry> {
        let bytes = self.render(identity, entry_point).map_err(encoding_error)?;
        Ok(ContainerEntry::stored(MANIFEST_PATH, bytes))
    }

    fn render(&self, identity: &AppIdentity, entry_point: &str) -> RenderResult<Vec<u8>> {
        let s = self.settings;
        let version_code = identity.version_code().to_string();
        let min_sdk = s.min_sdk.to_string();
        let target_sdk = s.target_sdk.to_string();

        let mut w = Writer::new_with_indent(Vec::new(), b' ', 4);
        w.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

        w.write_event(Event::Start(BytesStart::new("manifest").with_attributes([
            ("xmlns:android", ANDROID_NAMESPACE_URI),
            ("package", identity.package_id()),
            ("android:versionCode", version_code.as_str()),
            ("android:versionName", identity.version()),
        ])))?;

        w.write_event(Event::Empty(BytesStart::new("uses-sdk").with_attributes([
            ("android:minSdkVersion", min_sdk.as_str()),
            ("android:targetSdkVersion", target_sdk.as_str()),
        ])))?;

        for permission in &s.permissions {
            w.write_event(Event::Empty(
                BytesStart::new("uses-permission")
                    .with_attributes([("android:name", permission.as_str())]),
            ))?;
        }

        w.write_event(Event::Start(BytesStart::new("application").with_attributes([
            ("android:label", identity.display_name()),
            ("android:icon", s.icon_ref.as_str()),
            ("android:allowBackup", "true"),
            ("android:hardwareAccelerated", "true"),
            ("android:usesCleartextTraffic", "true"),
        ])))?;

        w.write_event(Event::Empty(BytesStart::new("meta-data").with_attributes([
            ("android:name", s.entry_point_key.as_str()),
            ("android:value", entry_point),
        ])))?;

        w.write_event(Event::Start(BytesStart::new("activity").with_attributes([
            ("android:name", s.activity.as_str()),
            ("android:label", identity.display_name()),
            ("android:configChanges", "orientation|keyboardHidden|screenSize"),
            ("android:exported", "true"),
        ])))?;
        w.write_event(Event::Start(BytesStart::new("intent-filter")))?;
        w.write_event(Event::Empty(
            BytesStart::new("action").with_attributes([("android:name", "android.intent.action.MAIN")]),
        ))?;
        w.write_event(Event::Empty(
            BytesStart::new("category")
                .with_attributes([("android:name", "android.intent.category.LAUNCHER")]),
        ))?;
        w.write_event(Event::End(BytesEnd::new("intent-filter")))?;
        w.write_event(Event::End(BytesEnd::new("activity")))?;
        w.write_event(Event::End(BytesEnd::new("application")))?;
        w.write_event(Event::End(BytesEnd::new("manifest")))?;

        let mut bytes = w.into_inner();
        bytes.push(b'\n');
        Ok(bytes)
    }
}

fn encoding_error(error: impl Display) -> Error {
    Error::Assembly {
        stage: "encoding manifest",
        cause: AssemblyCause::Encoding(error.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apk::container::StorageMode;
    use crate::apk::settings::IdentitySettings;
    use quick_xml::Reader;
    use std::collections::HashMap;

    /// Parse the document into (element name, attributes) pairs.
    fn parse(bytes: &[u8]) -> Vec<Element> {
        let text = std::str::from_utf8(bytes).unwrap();
        let mut reader = Reader::from_str(text);
        let mut elements = Vec::new();
        loop {
            match reader.read_event().unwrap() {
                Event::Eof => break,
                Event::Start(e) | Event::Empty(e) => {
                    let name = String::from_utf8(e.name().as_ref().to_vec()).unwrap();
                    let attrs = e
                        .attributes()
                        .map(|a| {
                            let a = a.unwrap();
                            (
                                String::from_utf8(a.key.as_ref().to_vec()).unwrap(),
                                a.unescape_value().unwrap().into_owned(),
                            )
                        })
                        .collect();
                    elements.push((name, attrs));
                }
                _ => {}
            }
        }
        elements
    }

    fn encode(name: &str) -> ContainerEntry {
        let identity = AppIdentity::new(name, "1.0", &IdentitySettings::default()).unwrap();
        ManifestEncoder::new(&ManifestSettings::default())
            .encode(&identity, "www/index.html")
            .unwrap()
    }

    #[test]
    fn test_entry_path_and_storage() {
        let entry = encode("My App");
        assert_eq!(entry.path, "AndroidManifest.xml");
        assert_eq!(entry.storage, StorageMode::Stored);
        assert!(entry.bytes.starts_with(b"<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
    }

    type Element = (String, HashMap<String, String>);

    fn attrs_of<'a>(elements: &'a [Element], name: &str) -> Vec<&'a HashMap<String, String>> {
        elements
            .iter()
            .filter(|(n, _)| n == name)
            .map(|(_, attrs)| attrs)
            .collect()
    }

    #[test]
    fn test_declares_identity_permissions_and_launcher() {
        let elements = parse(&encode("My App").bytes);

        let manifest = attrs_of(&elements, "manifest")[0];
        assert_eq!(manifest["package"], "com.htmltoapp.myapp");
        assert_eq!(manifest["android:versionName"], "1.0");
        assert_eq!(manifest["android:versionCode"], "10000");

        let sdk = attrs_of(&elements, "uses-sdk")[0];
        assert_eq!(sdk["android:minSdkVersion"], "19");
        assert_eq!(sdk["android:targetSdkVersion"], "30");

        let permissions: Vec<_> = attrs_of(&elements, "uses-permission")
            .into_iter()
            .map(|a| a["android:name"].as_str())
            .collect();
        assert_eq!(
            permissions,
            ["android.permission.INTERNET", "android.permission.ACCESS_NETWORK_STATE"]
        );

        let app = attrs_of(&elements, "application")[0];
        assert_eq!(app["android:label"], "My App");
        assert_eq!(app["android:icon"], "@drawable/icon");

        let meta = attrs_of(&elements, "meta-data")[0];
        assert_eq!(meta["android:value"], "www/index.html");

        assert_eq!(attrs_of(&elements, "activity").len(), 1);
        let category = attrs_of(&elements, "category")[0];
        assert_eq!(category["android:name"], "android.intent.category.LAUNCHER");
    }

    #[test]
    fn test_label_escaped_and_roundtrips() {
        let entry = encode("Tom & \"Jerry\" <3");
        let text = String::from_utf8(entry.bytes.clone()).unwrap();
        assert!(!text.contains("Tom & "));

        let elements = parse(&entry.bytes);
        let app = attrs_of(&elements, "application")[0];
        assert_eq!(app["android:label"], "Tom & \"Jerry\" <3");
    }
}
