//! Positional pairing of harvested text fragments into advisory records.
//!
//! The advisories page renders each listing as a title node followed by a
//! date node, with a page heading first and agency/copyright boilerplate
//! last. Pairing by position is a structural assumption about that one
//! page; the filters below drop the boilerplate that slips through the
//! harvesting XPath.

use vigil_common::AdvisoryRecord;

/// XPath union harvested from the advisories page: headings, paragraphs,
/// long `strong` runs, and anything carrying a title-ish class.
pub const FRAGMENT_XPATH: &str =
    "//h3 | //h4 | //p | //strong[string-length(text()) > 15] | //div[contains(@class, 'title')]";

/// Link text that marks the page as fully rendered.
pub const READY_LINK_TEXT: &str = "View";

/// Titles must be strictly longer than this after trimming.
const MIN_TITLE_LEN: usize = 10;

const AGENCY_FOOTER_MARKER: &str = "lead agency";
const COPYRIGHT_MARKER: &str = "Copyright";

/// Pair harvested text fragments into advisory records.
///
/// Fragment 0 is the page heading and is skipped. Fragments that carry
/// nothing but the "View" action link are discarded so they cannot shift
/// the title/date alternation. The remainder is walked two at a time: a
/// title fragment followed by its date fragment; a trailing fragment with
/// no date partner is dropped.
pub fn pair_fragments(fragments: &[String], source: &str) -> Vec<AdvisoryRecord> {
    let listing: Vec<&str> = fragments
        .iter()
        .skip(1)
        .map(|s| s.as_str())
        .filter(|s| !is_view_link_only(s))
        .collect();

    let mut records = Vec::new();
    for pair in listing.chunks_exact(2) {
        let title = pair[0].replace(READY_LINK_TEXT, "").trim().to_string();
        let date = pair[1].trim().to_string();

        if title.contains(AGENCY_FOOTER_MARKER)
            || title.contains(COPYRIGHT_MARKER)
            || date.contains(COPYRIGHT_MARKER)
        {
            continue;
        }
        if title.len() <= MIN_TITLE_LEN {
            continue;
        }

        records.push(AdvisoryRecord {
            title,
            date,
            source: source.to_string(),
        });
    }
    records
}

/// True when a fragment is nothing but the "View" action link.
fn is_view_link_only(fragment: &str) -> bool {
    fragment.replace(READY_LINK_TEXT, "").trim().is_empty()
}
