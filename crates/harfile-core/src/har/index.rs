use super::types::{Entry, Log, Page};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Lookup from page id to page, built on demand from a [`Log`].
///
/// Entries refer to pages by id only; the index resolves those references
/// without tying the two together in the model.
pub struct PageIndex<'a> {
    pages: HashMap<&'a str, &'a Page>,
    duplicates: Vec<&'a str>,
    entries: &'a [Entry],
}

impl<'a> PageIndex<'a> {
    pub fn new(log: &'a Log) -> Self {
        let mut pages = HashMap::with_capacity(log.pages.len());
        let mut duplicates = Vec::new();

        // First page with a given id wins
        for page in &log.pages {
            if pages.contains_key(page.id.as_str()) {
                duplicates.push(page.id.as_str());
            } else {
                pages.insert(page.id.as_str(), page);
            }
        }

        Self {
            pages,
            duplicates,
            entries: &log.entries,
        }
    }

    pub fn get(&self, id: &str) -> Option<&'a Page> {
        self.pages.get(id).copied()
    }

    /// The page an entry refers to, if it names one that exists
    pub fn page_for(&self, entry: &Entry) -> Option<&'a Page> {
        entry.page_ref.as_deref().and_then(|id| self.get(id))
    }

    /// Entries referring to `page_id`, in log order
    pub fn entries_for<'s>(&'s self, page_id: &'s str) -> impl Iterator<Item = &'a Entry> + 's {
        let entries: &'a [Entry] = self.entries;
        entries
            .iter()
            .filter(move |entry| entry.page_ref.as_deref() == Some(page_id))
    }

    /// Ids that appear on more than one page
    pub fn duplicate_ids(&self) -> &[&'a str] {
        &self.duplicates
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

impl Log {
    pub fn page_index(&self) -> PageIndex<'_> {
        PageIndex::new(self)
    }

    /// Entries sorted by start time.
    ///
    /// HAR does not require entries to be sorted. The sort is stable, and
    /// entries whose start time could not be parsed come last in log order.
    pub fn entries_chronological(&self) -> Vec<&Entry> {
        let mut entries: Vec<&Entry> = self.entries.iter().collect();
        entries.sort_by(|a, b| {
            match (a.started_date_time.datetime(), b.started_date_time.datetime()) {
                (Some(a), Some(b)) => a.cmp(&b),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
        });
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::har::{Creator, Har, Timestamp};

    fn entry(page_ref: Option<&str>, started: &str, url: &str) -> Entry {
        let mut entry = Entry {
            page_ref: page_ref.map(str::to_string),
            started_date_time: Timestamp::parse(started),
            ..Default::default()
        };
        entry.request.url = url.to_string();
        entry
    }

    fn page(id: &str, title: &str) -> Page {
        Page {
            id: id.to_string(),
            title: title.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_page_lookup() {
        let mut har = Har::new(Creator::new("test", "1.0"));
        har.log.pages = vec![
            page("page_1", "Home"),
            page("page_2", "About"),
            page("page_1", "Dup"),
        ];
        har.log.entries = vec![
            entry(Some("page_1"), "2020-01-01T00:00:00Z", "https://a/1"),
            entry(Some("page_2"), "2020-01-01T00:00:01Z", "https://a/2"),
            entry(Some("page_1"), "2020-01-01T00:00:02Z", "https://a/3"),
            entry(Some("missing"), "2020-01-01T00:00:03Z", "https://a/4"),
            entry(None, "2020-01-01T00:00:04Z", "https://a/5"),
        ];

        let index = har.log.page_index();
        assert_eq!(index.len(), 2);
        assert_eq!(index.duplicate_ids(), &["page_1"]);
        assert_eq!(index.get("page_1").unwrap().title, "Home");
        assert_eq!(index.page_for(&har.log.entries[1]).unwrap().title, "About");
        assert!(index.page_for(&har.log.entries[3]).is_none());
        assert!(index.page_for(&har.log.entries[4]).is_none());

        let urls: Vec<&str> = index
            .entries_for("page_1")
            .map(|e| e.request.url.as_str())
            .collect();
        assert_eq!(urls, vec!["https://a/1", "https://a/3"]);
    }

    #[test]
    fn test_entries_chronological() {
        let mut har = Har::new(Creator::new("test", "1.0"));
        har.log.entries = vec![
            entry(None, "2020-01-01T00:00:05Z", "https://a/late"),
            entry(None, "garbage", "https://a/invalid"),
            entry(None, "2020-01-01T01:00:00+02:00", "https://a/early"),
        ];

        let urls: Vec<&str> = har
            .log
            .entries_chronological()
            .iter()
            .map(|e| e.request.url.as_str())
            .collect();
        assert_eq!(
            urls,
            vec!["https://a/early", "https://a/late", "https://a/invalid"]
        );
    }
}
