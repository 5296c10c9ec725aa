//! Build matrix expansion.
//!
//! Turns the two selectors (`--target_arch`, `--target`) into an ordered
//! build queue. Values are never validated here: anything that is not the
//! `all` sentinel is handed to the packaging tool as-is.

/// Architectures queued for `--target_arch=all`, in build order.
pub const ARCHS: &[&str] = &["ia32", "x64"];

/// Node.js versions queued for `--target=all`, in build order.
pub const AUTO_VERSIONS: &[&str] = &["4.0.0", "5.0.0", "6.0.0", "7.0.0", "8.0.0", "9.0.0"];

/// Sentinel value that expands to every entry of an axis.
pub const ALL: &str = "all";

/// One axis selector as given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Flag omitted or given an empty value.
    Unset,
    /// The `all` sentinel.
    All,
    /// A single explicit value, passed through unchecked.
    One(String),
}

impl Selector {
    /// Interpret a raw flag value. Empty strings count as unset.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            None | Some("") => Selector::Unset,
            Some(ALL) => Selector::All,
            Some(v) => Selector::One(v.to_string()),
        }
    }

    /// Expand against an axis. `Unset` yields a single empty entry so the
    /// queue still gets one slot for it.
    fn expand(&self, axis: &[String]) -> Vec<String> {
        match self {
            Selector::Unset => vec![String::new()],
            Selector::All => axis.to_vec(),
            Selector::One(v) => vec![v.clone()],
        }
    }
}

/// The enumerated values the `all` sentinel expands to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Axes {
    pub archs: Vec<String>,
    pub versions: Vec<String>,
}

impl Default for Axes {
    fn default() -> Self {
        Self {
            archs: ARCHS.iter().map(|s| s.to_string()).collect(),
            versions: AUTO_VERSIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// One architecture and the versions to build for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueEntry {
    pub arch: String,
    pub versions: Vec<String>,
}

/// A single `(arch, version)` work item. Either half may be empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildTarget<'a> {
    pub arch: &'a str,
    pub version: &'a str,
}

impl std::fmt::Display for BuildTarget<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let arch = if self.arch.is_empty() {
            "default arch"
        } else {
            self.arch
        };
        if self.version.is_empty() {
            write!(f, "{arch}, default node")
        } else {
            write!(f, "{arch}, node {}", self.version)
        }
    }
}

/// Ordered mapping from architecture to the versions built for it.
///
/// Entry order is the order of the enumerated axes; it is also the order
/// builds are executed in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildQueue {
    entries: Vec<QueueEntry>,
}

impl BuildQueue {
    pub fn expand(arch: &Selector, version: &Selector, axes: &Axes) -> Self {
        let mut queue = Self::default();
        for a in arch.expand(&axes.archs) {
            queue.push_arch(a);
        }
        for entry in &mut queue.entries {
            entry.versions = version.expand(&axes.versions);
        }
        queue
    }

    // Repeated archs (possible with a custom axis) share one entry, as keys
    // of a map would.
    fn push_arch(&mut self, arch: String) {
        if !self.entries.iter().any(|e| e.arch == arch) {
            self.entries.push(QueueEntry {
                arch,
                versions: Vec::new(),
            });
        }
    }

    pub fn entries(&self) -> &[QueueEntry] {
        &self.entries
    }

    pub fn archs(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.arch.as_str())
    }

    pub fn versions_for(&self, arch: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|e| e.arch == arch)
            .map(|e| e.versions.as_slice())
    }

    /// Every work item, arch-major.
    pub fn targets(&self) -> impl Iterator<Item = BuildTarget<'_>> {
        self.entries.iter().flat_map(|e| {
            e.versions.iter().map(move |v| BuildTarget {
                arch: &e.arch,
                version: v,
            })
        })
    }

    pub fn len(&self) -> usize {
        self.entries.iter().map(|e| e.versions.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
