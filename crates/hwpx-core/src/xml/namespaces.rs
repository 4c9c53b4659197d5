#![allow(non_snake_case)]

use super::xname::XName;

/// Paragraph vocabulary (`hp:`).
pub mod HP {
    use super::XName;
    pub const NS: &str = "http://www.hancom.co.kr/hwpml/2011/paragraph";

    pub fn p() -> XName { XName::new(NS, "p") }
    pub fn run() -> XName { XName::new(NS, "run") }
    pub fn t() -> XName { XName::new(NS, "t") }
}

/// 2016 paragraph extensions (`hp10:`).
pub mod HP10 {
    pub const NS: &str = "http://www.hancom.co.kr/hwpml/2016/paragraph";
}

/// Section root (`hs:`).
pub mod HS {
    pub const NS: &str = "http://www.hancom.co.kr/hwpml/2011/section";
}

/// Document header (`hh:`).
pub mod HH {
    pub const NS: &str = "http://www.hancom.co.kr/hwpml/2011/head";
}

/// Core shared types (`hc:`).
pub mod HC {
    pub const NS: &str = "http://www.hancom.co.kr/hwpml/2011/core";
}

/// Application settings (`ha:`).
pub mod HA {
    pub const NS: &str = "http://www.hancom.co.kr/hwpml/2011/app";
}

/// Version descriptor (`hv:`).
pub mod HV {
    pub const NS: &str = "http://www.hancom.co.kr/hwpml/2011/version";
}

/// Revision history (`hhs:`).
pub mod HHS {
    pub const NS: &str = "http://www.hancom.co.kr/hwpml/2011/history";
}

/// Master pages (`hm:`).
pub mod HM {
    pub const NS: &str = "http://www.hancom.co.kr/hwpml/2011/master-page";
}

/// Package schema (`hpf:`).
pub mod HPF {
    pub const NS: &str = "http://www.hancom.co.kr/schema/2011/hpf";
}

/// Content package descriptor (`opf:`). HWPX uses the URI with a trailing slash.
pub mod OPF {
    pub const NS: &str = "http://www.idpf.org/2007/opf/";
}

/// Container (`ocf:`).
pub mod OCF {
    pub const NS: &str = "urn:oasis:names:tc:opendocument:xmlns:container";
}

/// Package manifest (`odf:`).
pub mod ODF {
    pub const NS: &str = "urn:oasis:names:tc:opendocument:xmlns:manifest:1.0";
}

/// Prefix bindings that HWPX producers use for their vocabularies.
pub const WELL_KNOWN: &[(&str, &str)] = &[
    ("ha", HA::NS),
    ("hp", HP::NS),
    ("hp10", HP10::NS),
    ("hs", HS::NS),
    ("hc", HC::NS),
    ("hh", HH::NS),
    ("hhs", HHS::NS),
    ("hm", HM::NS),
    ("hpf", HPF::NS),
    ("hv", HV::NS),
    ("hwpunitchar", "http://www.hancom.co.kr/hwpml/2016/HwpUnitChar"),
    ("ooxmlchart", "http://www.hancom.co.kr/hwpml/2016/ooxmlchart"),
    ("dc", "http://purl.org/dc/elements/1.1/"),
    ("config", "urn:oasis:names:tc:opendocument:xmlns:config:1.0"),
    ("epub", "http://www.idpf.org/2007/ops"),
    ("opf", OPF::NS),
    ("ocf", OCF::NS),
    ("odf", ODF::NS),
];
