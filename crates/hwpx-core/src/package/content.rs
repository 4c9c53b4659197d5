//! Manifest items of the package descriptor (`Contents/content.hpf`).

use crate::xml::XmlDocument;

/// An `opf:item` entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ManifestItem {
    pub id: Option<String>,
    pub href: String,
    pub media_type: Option<String>,
}

impl ManifestItem {
    /// Items with an XML media type are parsed as content parts.
    pub fn is_xml(&self) -> bool {
        matches!(self.media_type.as_deref(), Some("application/xml" | "text/xml"))
    }
}

/// `item` children of every `manifest` element, in document order.
///
/// Matching is by local name so descriptors that bind the package vocabulary
/// to a different URI still resolve. Items without `href` are skipped.
pub fn manifest_items(doc: &XmlDocument) -> Vec<ManifestItem> {
    let mut items = Vec::new();
    for manifest in doc.elements().filter(|&id| has_local_name(doc, id, "manifest")) {
        for child in doc.children(manifest) {
            if !has_local_name(doc, child, "item") {
                continue;
            }
            let Some(data) = doc.get(child) else { continue };
            let Some(href) = data.attribute("href") else {
                tracing::debug!("manifest item without href skipped");
                continue;
            };
            items.push(ManifestItem {
                id: data.attribute("id").map(str::to_string),
                href: href.to_string(),
                media_type: data.attribute("media-type").map(str::to_string),
            });
        }
    }
    items
}

fn has_local_name(doc: &XmlDocument, id: indextree::NodeId, local_name: &str) -> bool {
    doc.get(id)
        .and_then(|data| data.name())
        .is_some_and(|name| name.local_name == local_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parser;

    #[test]
    fn reads_items_in_order() {
        let doc = parser::parse(
            r#"<opf:package xmlns:opf="http://www.idpf.org/2007/opf/">
                 <opf:metadata><opf:title/></opf:metadata>
                 <opf:manifest>
                   <opf:item id="header" href="Contents/header.xml" media-type="application/xml"/>
                   <opf:item id="image1" href="BinData/image1.png" media-type="image/png"/>
                   <opf:item id="broken" media-type="application/xml"/>
                   <opf:item id="section0" href="Contents/section0.xml" media-type="application/xml"/>
                 </opf:manifest>
                 <opf:spine><opf:itemref idref="section0"/></opf:spine>
               </opf:package>"#,
        )
        .unwrap();

        let items = manifest_items(&doc);
        let hrefs: Vec<_> = items.iter().map(|i| i.href.as_str()).collect();
        assert_eq!(
            hrefs,
            vec!["Contents/header.xml", "BinData/image1.png", "Contents/section0.xml"]
        );
        assert!(items[0].is_xml());
        assert!(!items[1].is_xml());
        assert_eq!(items[2].id.as_deref(), Some("section0"));
    }

    #[test]
    fn items_outside_manifest_are_ignored() {
        let doc = parser::parse(r#"<package><item href="stray.xml"/></package>"#).unwrap();
        assert!(manifest_items(&doc).is_empty());
    }
}
