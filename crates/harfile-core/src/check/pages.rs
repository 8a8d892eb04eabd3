use super::{Check, Finding, Severity};
use crate::har::Har;

/// Page ids and the entry references pointing at them
pub struct PageCheck;

impl Check for PageCheck {
    fn check(&self, har: &Har, findings: &mut Vec<Finding>) {
        let index = har.log.page_index();

        for id in index.duplicate_ids() {
            findings.push(Finding::new(
                Severity::Warning,
                "log.pages",
                format!("page id {:?} is used by more than one page", id),
            ));
        }

        for (idx, entry) in har.log.entries.iter().enumerate() {
            if let Some(page_ref) = &entry.page_ref
                && index.get(page_ref).is_none()
            {
                findings.push(Finding::new(
                    Severity::Warning,
                    format!("log.entries[{}].pageref", idx),
                    format!("no page with id {:?}", page_ref),
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::har::{Creator, Entry, Page};

    #[test]
    fn test_unresolved_pageref_and_duplicates() {
        let mut har = Har::new(Creator::new("test", "1.0"));
        har.log.pages = vec![
            Page {
                id: "page_1".to_string(),
                ..Default::default()
            },
            Page {
                id: "page_1".to_string(),
                ..Default::default()
            },
        ];
        har.log.entries = vec![
            Entry {
                page_ref: Some("page_1".to_string()),
                ..Default::default()
            },
            Entry {
                page_ref: Some("page_9".to_string()),
                ..Default::default()
            },
        ];

        let mut findings = Vec::new();
        PageCheck.check(&har, &mut findings);

        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].path, "log.pages");
        assert_eq!(findings[1].path, "log.entries[1].pageref");
    }
}
