//! `META-INF/container.xml`: which rootfile is the package descriptor.

use crate::xml::{XmlDocument, XmlNodeData};

/// Media type that marks the content descriptor rootfile.
pub const PACKAGE_MEDIA_TYPE: &str = "application/hwpml-package+xml";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RootFile {
    pub full_path: String,
    pub media_type: Option<String>,
}

impl RootFile {
    pub fn is_package(&self) -> bool {
        self.media_type.as_deref() == Some(PACKAGE_MEDIA_TYPE)
    }
}

/// Every `rootfile` element in document order, regardless of namespace.
pub fn root_files(doc: &XmlDocument) -> Vec<RootFile> {
    doc.elements()
        .filter_map(|id| doc.get(id))
        .filter(|data| is_rootfile(data))
        .filter_map(|data| {
            let full_path = data.attribute("full-path")?;
            Some(RootFile {
                full_path: full_path.to_string(),
                media_type: data.attribute("media-type").map(str::to_string),
            })
        })
        .collect()
}

fn is_rootfile(data: &XmlNodeData) -> bool {
    data.name().is_some_and(|n| n.local_name == "rootfile")
}

/// Path of the content descriptor, if the container names one.
pub fn package_path(root_files: &[RootFile]) -> Option<&str> {
    root_files
        .iter()
        .find(|r| r.is_package())
        .map(|r| r.full_path.as_str())
}

/// Rootfiles other than the descriptor; these are loaded as binary attachments.
pub fn attachments(root_files: &[RootFile]) -> impl Iterator<Item = &RootFile> {
    root_files.iter().filter(|r| !r.is_package())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parser;

    const CONTAINER: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes" ?>
<ocf:container xmlns:ocf="urn:oasis:names:tc:opendocument:xmlns:container" xmlns:hpf="http://www.hancom.co.kr/schema/2011/hpf">
  <ocf:rootfiles>
    <ocf:rootfile full-path="Contents/content.hpf" media-type="application/hwpml-package+xml"/>
    <ocf:rootfile full-path="Preview/PrvText.txt" media-type="text/plain"/>
  </ocf:rootfiles>
</ocf:container>"#;

    #[test]
    fn finds_descriptor_and_attachments() {
        let doc = parser::parse(CONTAINER).unwrap();
        let roots = root_files(&doc);
        assert_eq!(roots.len(), 2);
        assert_eq!(package_path(&roots), Some("Contents/content.hpf"));

        let extra: Vec<_> = attachments(&roots).map(|r| r.full_path.as_str()).collect();
        assert_eq!(extra, vec!["Preview/PrvText.txt"]);
    }

    #[test]
    fn container_without_descriptor() {
        let doc = parser::parse(r#"<container><rootfiles/></container>"#).unwrap();
        assert_eq!(package_path(&root_files(&doc)), None);
    }
}
