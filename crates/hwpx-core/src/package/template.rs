//! Minimal valid HWPX document, used as a starting point and as a test fixture.

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use quick_xml::escape::partial_escape;
use zip::CompressionMethod;

use super::archive::{
    Archive, CONTAINER_PATH, CONTENT_PATH, MANIFEST_PATH, MIMETYPE, MIMETYPE_PATH, VERSION_PATH,
};
use crate::error::Result;

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes" ?>"#;

const VERSION_XML: &str = concat!(
    r#"<hv:HCFVersion xmlns:hv="http://www.hancom.co.kr/hwpml/2011/version" "#,
    r#"targetApplication="WORDPROCESSOR" major="5" minor="0" micro="5" "#,
    r#"buildNumber="0" xmlVersion="1.4" application="hwpx-core" appVersion="unknown"/>"#,
);

const MANIFEST_XML: &str =
    r#"<odf:manifest xmlns:odf="urn:oasis:names:tc:opendocument:xmlns:manifest:1.0"/>"#;

const CONTAINER_XML: &str = concat!(
    r#"<ocf:container xmlns:ocf="urn:oasis:names:tc:opendocument:xmlns:container" "#,
    r#"xmlns:hpf="http://www.hancom.co.kr/schema/2011/hpf">"#,
    r#"<ocf:rootfiles><ocf:rootfile full-path="Contents/content.hpf" "#,
    r#"media-type="application/hwpml-package+xml"/></ocf:rootfiles></ocf:container>"#,
);

const HEADER_XML: &str = concat!(
    r#"<hh:head xmlns:ha="http://www.hancom.co.kr/hwpml/2011/app" "#,
    r#"xmlns:hp="http://www.hancom.co.kr/hwpml/2011/paragraph" "#,
    r#"xmlns:hh="http://www.hancom.co.kr/hwpml/2011/head" version="1.4" secCnt="1">"#,
    r#"<hh:beginNum page="1" footnote="1" endnote="1" pic="1" tbl="1" equation="1"/>"#,
    r#"</hh:head>"#,
);

const SETTINGS_XML: &str = concat!(
    r#"<ha:HWPApplicationSetting xmlns:ha="http://www.hancom.co.kr/hwpml/2011/app" "#,
    r#"xmlns:config="urn:oasis:names:tc:opendocument:xmlns:config:1.0">"#,
    r#"<ha:CaretPosition listIDRef="0" paraIDRef="0" pos="0"/></ha:HWPApplicationSetting>"#,
);

pub const HEADER_PATH: &str = "Contents/header.xml";
pub const SECTION_PATH: &str = "Contents/section0.xml";
pub const SETTINGS_PATH: &str = "settings.xml";

/// Builder for a one-section, one-paragraph document.
#[derive(Clone, Debug)]
pub struct BlankTemplate {
    paragraph: Option<String>,
    created: DateTime<Utc>,
}

impl Default for BlankTemplate {
    fn default() -> Self {
        Self::new()
    }
}

impl BlankTemplate {
    pub fn new() -> Self {
        Self {
            paragraph: None,
            created: Utc::now(),
        }
    }

    /// Text of the single paragraph; empty by default.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.paragraph = Some(text.into());
        self
    }

    /// Timestamp recorded as the created and modified date.
    pub fn created_at(mut self, created: DateTime<Utc>) -> Self {
        self.created = created;
        self
    }

    pub fn build(&self) -> Archive {
        let mut archive = Archive::new();
        archive.push(MIMETYPE_PATH, MIMETYPE.as_bytes().to_vec(), CompressionMethod::Stored);
        for (path, body) in [
            (VERSION_PATH, VERSION_XML.to_string()),
            (MANIFEST_PATH, MANIFEST_XML.to_string()),
            (CONTAINER_PATH, CONTAINER_XML.to_string()),
            (CONTENT_PATH, self.content_hpf()),
            (HEADER_PATH, HEADER_XML.to_string()),
            (SECTION_PATH, self.section()),
            (SETTINGS_PATH, SETTINGS_XML.to_string()),
        ] {
            archive.push(path, format!("{XML_DECL}{body}").into_bytes(), CompressionMethod::Deflated);
        }
        archive
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let archive = self.build();
        archive.to_bytes(&archive.compression_info())
    }

    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let archive = self.build();
        Archive::create(path, &archive, &archive.compression_info())
    }

    fn section(&self) -> String {
        let run = match self.paragraph.as_deref() {
            Some(text) if !text.is_empty() => format!("<hp:t>{}</hp:t>", partial_escape(text)),
            _ => "<hp:t/>".to_string(),
        };
        format!(
            concat!(
                r#"<hs:sec xmlns:hp="http://www.hancom.co.kr/hwpml/2011/paragraph" "#,
                r#"xmlns:hs="http://www.hancom.co.kr/hwpml/2011/section">"#,
                r#"<hp:p id="0" paraPrIDRef="0" styleIDRef="0"><hp:run charPrIDRef="0">{}</hp:run></hp:p>"#,
                r#"</hs:sec>"#,
            ),
            run
        )
    }

    fn content_hpf(&self) -> String {
        let now = self.created.to_rfc3339_opts(SecondsFormat::Secs, true);
        format!(
            concat!(
                r#"<opf:package xmlns:ha="http://www.hancom.co.kr/hwpml/2011/app" "#,
                r#"xmlns:hp="http://www.hancom.co.kr/hwpml/2011/paragraph" "#,
                r#"xmlns:hs="http://www.hancom.co.kr/hwpml/2011/section" "#,
                r#"xmlns:opf="http://www.idpf.org/2007/opf/" version="" unique-identifier="">"#,
                r#"<opf:metadata><opf:title/><opf:language>ko</opf:language>"#,
                r#"<opf:meta name="CreatedDate" content="{now}"/>"#,
                r#"<opf:meta name="ModifiedDate" content="{now}"/></opf:metadata>"#,
                r#"<opf:manifest>"#,
                r#"<opf:item id="header" href="Contents/header.xml" media-type="application/xml"/>"#,
                r#"<opf:item id="section0" href="Contents/section0.xml" media-type="application/xml"/>"#,
                r#"<opf:item id="settings" href="settings.xml" media-type="application/xml"/>"#,
                r#"</opf:manifest>"#,
                r#"<opf:spine><opf:itemref idref="header"/><opf:itemref idref="section0"/></opf:spine>"#,
                r#"</opf:package>"#,
            ),
            now = now
        )
    }
}
