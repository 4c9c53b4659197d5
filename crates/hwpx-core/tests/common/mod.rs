//! Shared fixtures: a hand-assembled HWPX archive with the irregularities real
//! producers leave behind (single-quoted attributes, CRLF line endings, stored
//! and deflated entries, items that are not in the archive, entries the
//! descriptor never mentions).

#![allow(dead_code)]

use std::io::{Cursor, Read, Write};

use zip::write::{SimpleFileOptions, ZipWriter};
use zip::{CompressionMethod, ZipArchive};

pub const SECTION0: &str = "Contents/section0.xml";
pub const SECTION1: &str = "Contents/section1.xml";
pub const HEADER: &str = "Contents/header.xml";
pub const IMAGE: &str = "BinData/image1.png";
pub const CHART: &str = "Chart/chart1.xml";
pub const PREVIEW: &str = "Preview/PrvText.txt";
pub const STRAY: &str = "customdata/extra.bin";
pub const SCRIPTS_DIR: &str = "Scripts/";

const VERSION_XML: &str = "<?xml version='1.0' encoding='UTF-8' standalone='yes'?>\r\n<hv:HCFVersion xmlns:hv='http://www.hancom.co.kr/hwpml/2011/version' tagetApplication='WORDPROCESSOR' major='5' minor='1' micro='0' buildNumber='1' os='1' xmlVersion='1.2' application='Hancom Office Hangul' appVersion='11, 0, 0, 2129 WIN32LEWindows_10'/>\r\n";

const CONTAINER_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes" ?><ocf:container xmlns:ocf="urn:oasis:names:tc:opendocument:xmlns:container" xmlns:hpf="http://www.hancom.co.kr/schema/2011/hpf"><ocf:rootfiles><ocf:rootfile full-path="Contents/content.hpf" media-type="application/hwpml-package+xml"/><ocf:rootfile full-path="Preview/PrvText.txt" media-type="text/plain"/></ocf:rootfiles></ocf:container>"#;

const MANIFEST_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes" ?><odf:manifest xmlns:odf="urn:oasis:names:tc:opendocument:xmlns:manifest:1.0"/>"#;

const CONTENT_HPF: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes" ?><opf:package xmlns:ha="http://www.hancom.co.kr/hwpml/2011/app" xmlns:hp="http://www.hancom.co.kr/hwpml/2011/paragraph" xmlns:opf="http://www.idpf.org/2007/opf/" version="" unique-identifier="" id=""><opf:metadata><opf:title>Quarterly report</opf:title><opf:language>ko</opf:language></opf:metadata><opf:manifest><opf:item id="header" href="Contents/header.xml" media-type="application/xml"/><opf:item id="image1" href="BinData/image1.png" media-type="image/png" isEmbeded="1"/><opf:item id="section0" href="Contents/section0.xml" media-type="application/xml"/><opf:item id="section1" href="Contents/section1.xml" media-type="application/xml"/><opf:item id="gone" href="BinData/missing.bmp" media-type="image/bmp" isEmbeded="1"/><opf:item id="settings" href="settings.xml" media-type="application/xml"/></opf:manifest><opf:spine><opf:itemref idref="header" linear="yes"/><opf:itemref idref="section0" linear="yes"/><opf:itemref idref="section1" linear="yes"/></opf:spine></opf:package>"#;

const HEADER_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes" ?><hh:head xmlns:hh="http://www.hancom.co.kr/hwpml/2011/head" xmlns:hc="http://www.hancom.co.kr/hwpml/2011/core" version="1.2" secCnt="2"><hh:beginNum page="1" footnote="1" endnote="1" pic="1" tbl="1" equation="1"/><hh:refList><hh:fontfaces itemCnt="1"><hh:fontface lang="HANGUL" fontCnt="1"><hh:font id="0" face="함초롬돋움" type="TTF" isEmbedded="0"/></hh:fontface></hh:fontfaces></hh:refList></hh:head>"#;

/// Two paragraphs; the first splits its text across runs and leaves tail
/// text after an inline element, the second refers to a chart.
pub const SECTION0_XML: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\" ?>\r\n<hs:sec xmlns:hp=\"http://www.hancom.co.kr/hwpml/2011/paragraph\" xmlns:hs=\"http://www.hancom.co.kr/hwpml/2011/section\" xmlns:hc='http://www.hancom.co.kr/hwpml/2011/core'>\r\n  <hp:p id='3121190098' paraPrIDRef=\"0\" styleIDRef=\"0\" pageBreak=\"0\" columnBreak=\"0\" merged=\"0\"><hp:run charPrIDRef=\"0\"><hp:t>Hello, </hp:t></hp:run><hp:run charPrIDRef=\"7\"><hp:t>world<hp:lineBreak/>second line</hp:t></hp:run></hp:p>\r\n  <hp:p id='2' paraPrIDRef=\"1\" styleIDRef=\"0\"><hp:run charPrIDRef=\"0\"><hp:chart id=\"1\" chartIDRef=\"Chart/chart1.xml\"/><hp:chart id=\"2\" chartIDRef=\"Chart/chart9.xml\"/><hp:t>Sales &amp; revenue</hp:t></hp:run></hp:p>\r\n</hs:sec>\r\n";

pub const SECTION1_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes" ?><!-- exported --><hs:sec xmlns:hp="http://www.hancom.co.kr/hwpml/2011/paragraph" xmlns:hs="http://www.hancom.co.kr/hwpml/2011/section"><hp:p id="9" paraPrIDRef="0" styleIDRef="0"><hp:run charPrIDRef="0"><hp:t>안녕하세요 세계</hp:t></hp:run></hp:p><hp:p id="10" paraPrIDRef="0" styleIDRef="0"><hp:run charPrIDRef="0"><hp:t/></hp:run></hp:p></hs:sec>"#;

const SETTINGS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes" ?><ha:HWPApplicationSetting xmlns:ha="http://www.hancom.co.kr/hwpml/2011/app" xmlns:config="urn:oasis:names:tc:opendocument:xmlns:config:1.0"><ha:CaretPosition listIDRef="0" paraIDRef="0" pos="5"/></ha:HWPApplicationSetting>"#;

const CHART_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><c:chartSpace xmlns:c="http://schemas.openxmlformats.org/drawingml/2006/chart"><c:chart><c:autoTitleDeleted val="0"/></c:chart></c:chartSpace>"#;

pub const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0, 0, 0, 0x0d];

/// Ordered list of archive entries that is turned into ZIP bytes as-is.
#[derive(Clone, Debug)]
pub struct Fixture {
    entries: Vec<(String, Vec<u8>, CompressionMethod)>,
}

impl Fixture {
    pub fn standard() -> Self {
        let stored = CompressionMethod::Stored;
        let deflated = CompressionMethod::Deflated;
        let mut fixture = Self { entries: Vec::new() };
        fixture
            .entries
            .push(("mimetype".into(), b"application/hwp+zip".to_vec(), stored));
        for (name, body, method) in [
            ("version.xml", VERSION_XML, deflated),
            ("Contents/header.xml", HEADER_XML, deflated),
            ("Contents/section0.xml", SECTION0_XML, deflated),
            ("Contents/section1.xml", SECTION1_XML, deflated),
            ("settings.xml", SETTINGS_XML, deflated),
            ("Chart/chart1.xml", CHART_XML, deflated),
            ("Preview/PrvText.txt", "Hello, world", stored),
            ("META-INF/container.xml", CONTAINER_XML, deflated),
            ("Contents/content.hpf", CONTENT_HPF, deflated),
            ("META-INF/manifest.xml", MANIFEST_XML, deflated),
        ] {
            fixture.entries.push((name.into(), body.as_bytes().to_vec(), method));
        }
        fixture.entries.push((IMAGE.into(), PNG_BYTES.to_vec(), stored));
        fixture.entries.push((SCRIPTS_DIR.into(), Vec::new(), stored));
        fixture
            .entries
            .push((STRAY.into(), vec![1, 2, 3, 4, 5], deflated));
        fixture
    }

    pub fn with(mut self, name: &str, data: &[u8], method: CompressionMethod) -> Self {
        match self.entries.iter_mut().find(|(n, _, _)| n == name) {
            Some(entry) => {
                entry.1 = data.to_vec();
                entry.2 = method;
            }
            None => self.entries.push((name.to_string(), data.to_vec(), method)),
        }
        self
    }

    pub fn without(mut self, name: &str) -> Self {
        self.entries.retain(|(n, _, _)| n != name);
        self
    }

    /// Move `name` to the end of the archive.
    pub fn moved_last(mut self, name: &str) -> Self {
        if let Some(pos) = self.entries.iter().position(|(n, _, _)| n == name) {
            let entry = self.entries.remove(pos);
            self.entries.push(entry);
        }
        self
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, data, method) in &self.entries {
            let options = SimpleFileOptions::default().compression_method(*method);
            if name.ends_with('/') {
                zip.add_directory(name.as_str(), options).unwrap();
            } else {
                zip.start_file(name.as_str(), options).unwrap();
                zip.write_all(data).unwrap();
            }
        }
        zip.finish().unwrap().into_inner()
    }
}

/// An entry as read back from ZIP bytes.
#[derive(Clone, Debug, PartialEq)]
pub struct RawEntry {
    pub name: String,
    pub data: Vec<u8>,
    pub compression: CompressionMethod,
}

pub fn read_entries(bytes: &[u8]) -> Vec<RawEntry> {
    let mut zip = ZipArchive::new(Cursor::new(bytes)).unwrap();
    (0..zip.len())
        .map(|i| {
            let mut file = zip.by_index(i).unwrap();
            let mut data = Vec::new();
            file.read_to_end(&mut data).unwrap();
            RawEntry {
                name: file.name().to_string(),
                data,
                compression: file.compression(),
            }
        })
        .collect()
}

pub fn entry<'a>(entries: &'a [RawEntry], name: &str) -> &'a RawEntry {
    entries
        .iter()
        .find(|e| e.name == name)
        .unwrap_or_else(|| panic!("entry {name} missing"))
}
