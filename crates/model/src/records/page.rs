use crate::records::record::Record;

/// Half-open window `[offset, offset + limit)` over the filtered result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub offset: usize,
    pub limit: usize,
}

impl PageWindow {
    pub fn first(limit: usize) -> Self {
        PageWindow { offset: 0, limit }
    }

    /// The window immediately after this one.
    pub fn next(&self) -> PageWindow {
        PageWindow {
            offset: self.offset + self.limit,
            limit: self.limit,
        }
    }
}

/// Records returned for one window, in response order.
#[derive(Debug, Clone)]
pub struct Page {
    pub window: PageWindow,
    pub records: Vec<Record>,
    pub took_ms: u128,
}

impl Page {
    pub fn new(window: PageWindow, records: Vec<Record>) -> Self {
        Page {
            window,
            records,
            took_ms: 0,
        }
    }

    pub fn offset(&self) -> usize {
        self.window.offset
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Header columns: the key order of the first record.
    pub fn header(&self) -> Vec<String> {
        self.records
            .first()
            .map(|r| r.keys().map(str::to_string).collect())
            .unwrap_or_default()
    }

    pub fn size_bytes(&self) -> usize {
        self.records.iter().map(|r| r.size_bytes()).sum()
    }
}
