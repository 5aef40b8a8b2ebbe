//! Field extraction from TSDR case-status XML (WIPO ST.96).
//!
//! The document is flattened once into an ordered node sequence; every
//! field lookup runs over that sequence. Two lookups are positional: the
//! class/description pairing and the owner-name search both depend on
//! document order, not on parent/child structure.

use crate::domain::model::StatusRecord;
use crate::utils::error::Result;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;

pub const NS_TRADEMARK: &str = "http://www.wipo.int/standards/XMLSchema/ST96/Trademark";
pub const NS_COMMON: &str = "http://www.wipo.int/standards/XMLSchema/ST96/Common";

/// How far back from a goods/services description to look for its class
/// number, and how far forward from an owner comment to look for the
/// organization name. Both windows match the producing schema's layout.
const CLASS_NUMBER_LOOKBACK: usize = 4;
const OWNER_NAME_LOOKAHEAD: usize = 5;

/// One element from the depth-first traversal of the document.
#[derive(Debug, Clone)]
pub struct FlatNode {
    pub namespace: String,
    pub local: String,
    /// Local names from the root down to this element, '/'-joined.
    pub path: String,
    pub text: String,
}

fn resolved_name(reader: &NsReader<&[u8]>, start: &BytesStart) -> (String, String) {
    let (ns, local) = reader.resolve_element(start.name());
    let namespace = match ns {
        ResolveResult::Bound(Namespace(uri)) => String::from_utf8_lossy(uri).into_owned(),
        _ => String::new(),
    };
    (namespace, String::from_utf8_lossy(local.as_ref()).into_owned())
}

/// Flatten an XML document into pre-order element sequence. Text content
/// is attached to the innermost open element.
pub fn flatten(xml: &str) -> Result<Vec<FlatNode>> {
    let mut reader = NsReader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut nodes: Vec<FlatNode> = Vec::new();
    let mut open: Vec<usize> = Vec::new();
    let mut path: Vec<String> = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let (namespace, local) = resolved_name(&reader, &e);
                path.push(local.clone());
                nodes.push(FlatNode {
                    namespace,
                    local,
                    path: path.join("/"),
                    text: String::new(),
                });
                open.push(nodes.len() - 1);
            }
            Ok(Event::Empty(e)) => {
                let (namespace, local) = resolved_name(&reader, &e);
                let mut full_path = path.join("/");
                if !full_path.is_empty() {
                    full_path.push('/');
                }
                full_path.push_str(&local);
                nodes.push(FlatNode {
                    namespace,
                    local,
                    path: full_path,
                    text: String::new(),
                });
            }
            Ok(Event::Text(e)) => {
                if let Some(&idx) = open.last() {
                    let text = e.unescape().unwrap_or_default();
                    append_text(&mut nodes[idx], text.trim());
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(&idx) = open.last() {
                    let bytes = e.into_inner();
                    let text = String::from_utf8_lossy(&bytes);
                    append_text(&mut nodes[idx], text.trim());
                }
            }
            Ok(Event::End(_)) => {
                open.pop();
                path.pop();
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
        buf.clear();
    }

    Ok(nodes)
}

fn append_text(node: &mut FlatNode, text: &str) {
    if text.is_empty() {
        return;
    }
    if !node.text.is_empty() {
        node.text.push(' ');
    }
    node.text.push_str(text);
}

fn first_text<'a>(nodes: &'a [FlatNode], namespace: &str, local: &str) -> Option<&'a str> {
    nodes
        .iter()
        .find(|n| n.namespace == namespace && n.local == local && !n.text.is_empty())
        .map(|n| n.text.as_str())
}

/// Date values arrive as date-time strings; only the date portion (the
/// first 10 characters) is kept.
fn date_part(text: &str) -> String {
    text.chars().take(10).collect()
}

fn joined_dates(nodes: &[FlatNode], local: &str) -> Option<String> {
    let values: Vec<String> = nodes
        .iter()
        .filter(|n| n.namespace == NS_TRADEMARK && n.local == local && !n.text.is_empty())
        .map(|n| date_part(&n.text))
        .collect();
    if values.is_empty() {
        None
    } else {
        Some(values.join(", "))
    }
}

/// Extract the status fields for one serial number from a raw response
/// body. Field lookups are independent; a field the document does not
/// carry keeps its sentinel default. Only a document the parser cannot
/// read at all fails the extraction.
pub fn extract_record(application_number: &str, xml: &str) -> Result<StatusRecord> {
    let nodes = flatten(xml)?;
    let mut record = StatusRecord::with_defaults(application_number);

    if let Some(text) = first_text(&nodes, NS_TRADEMARK, "ApplicationDate") {
        record.application_date = date_part(text);
    }

    if let Some(text) = first_text(&nodes, NS_TRADEMARK, "MarkCurrentStatusExternalDescriptionText")
    {
        record.status = text.to_string();
    }

    // Publication date sits in the Common namespace under
    // PublicationBag/Publication; other PublicationDate elements do not count.
    if let Some(node) = nodes.iter().find(|n| {
        n.namespace == NS_COMMON
            && n.path.ends_with("PublicationBag/Publication/PublicationDate")
            && !n.text.is_empty()
    }) {
        record.publication_date = date_part(&node.text);
    }

    if let Some(joined) = joined_dates(&nodes, "FirstUsedDate") {
        record.first_use_dates = joined;
    }

    if let Some(joined) = joined_dates(&nodes, "FirstUsedCommerceDate") {
        record.use_in_commerce_dates = joined;
    }

    if let Some(text) = first_text(&nodes, NS_TRADEMARK, "AllowanceNoticeDate") {
        record.noa_date = date_part(text);
    }

    if let Some(text) = first_text(&nodes, NS_COMMON, "RegistrationNumber") {
        record.registration_number = text.to_string();
    }

    if let Some(text) = first_text(&nodes, NS_COMMON, "RegistrationDate") {
        record.registration_date = date_part(text);
    }

    // First event description naming either register wins; the scan stops
    // at that event no matter which register it names.
    for node in nodes
        .iter()
        .filter(|n| n.namespace == NS_TRADEMARK && n.local == "MarkEventDescriptionText")
    {
        let upper = node.text.to_uppercase();
        if upper.contains("PRINCIPAL") {
            record.register_type = "Principal".to_string();
            break;
        }
        if upper.contains("SUPPLEMENTAL") {
            record.register_type = "Supplemental".to_string();
            break;
        }
    }

    let mark_name = first_text(&nodes, NS_TRADEMARK, "MarkVerbalElementText")
        .or_else(|| first_text(&nodes, NS_TRADEMARK, "MarkSignificantVerbalElementText"));
    if let Some(text) = mark_name {
        record.mark_name = text.to_string();
    }

    if let Some(text) = first_text(&nodes, NS_TRADEMARK, "MarkCategory") {
        record.mark_category = text.to_string();
    }

    // Pair each goods/services description with the nearest preceding
    // class number, scanning backward through the bounded window.
    let mut class_entries = Vec::new();
    for (idx, node) in nodes.iter().enumerate() {
        if node.namespace != NS_TRADEMARK
            || node.local != "GoodsServicesDescriptionText"
            || node.text.is_empty()
        {
            continue;
        }
        let window_start = idx.saturating_sub(CLASS_NUMBER_LOOKBACK);
        for back in (window_start..idx).rev() {
            let candidate = &nodes[back];
            if candidate.namespace == NS_TRADEMARK && candidate.local == "ClassNumber" {
                class_entries.push(format!("{} - {}", candidate.text.trim(), node.text.trim()));
                break;
            }
        }
    }
    if !class_entries.is_empty() {
        record.international_classes = class_entries.join("\n\n");
    }

    // The first owner-at-publication comment ends the search, whether or
    // not an organization name turns up in its window.
    for (idx, node) in nodes.iter().enumerate() {
        if !node.local.ends_with("CommentText")
            || node.text.is_empty()
            || !node.text.to_uppercase().contains("OWNER AT PUBLICATION")
        {
            continue;
        }
        let window_end = (idx + 1 + OWNER_NAME_LOOKAHEAD).min(nodes.len());
        for follower in &nodes[idx + 1..window_end] {
            if follower.local.ends_with("OrganizationStandardName") && !follower.text.is_empty() {
                record.current_owner_name = follower.text.trim().to_string();
                break;
            }
        }
        break;
    }

    if nodes
        .iter()
        .any(|n| n.namespace == NS_TRADEMARK && n.local == "MarkEventCode" && n.text == "AITUA")
    {
        record.filed_as_itu = "Yes".to_string();
    }

    Ok(record)
}
