/// An immutable resource served under `/static/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticResource {
    pub path: &'static str,
    pub content: &'static [u8],
}

impl StaticResource {
    pub const fn new(path: &'static str, content: &'static [u8]) -> Self {
        Self { path, content }
    }
}

const BUILTIN: &[StaticResource] = &[
    StaticResource::new("/static/foo", b"Foo"),
    StaticResource::new("/static/bar", b"Bar"),
    StaticResource::new("/static/baz", b"Baz"),
];

/// Read-only table of static resources, fixed at startup.
#[derive(Debug, Clone, Copy)]
pub struct StaticTable {
    resources: &'static [StaticResource],
}

impl StaticTable {
    pub const fn new(resources: &'static [StaticResource]) -> Self {
        Self { resources }
    }

    /// The three resources every server starts with.
    pub const fn builtin() -> Self {
        Self::new(BUILTIN)
    }

    /// Exact path match.
    pub fn get(&self, path: &str) -> Option<&'static StaticResource> {
        self.resources.iter().find(|r| r.path == path)
    }
}

impl Default for StaticTable {
    fn default() -> Self {
        Self::builtin()
    }
}
