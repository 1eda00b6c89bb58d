//! Page asset bookkeeping.
//!
//! Each rendered page brings its own stylesheets and scripts on top of the
//! theme-level bundles. The types here decide which references from a
//! freshly fetched document need loading, and remember what was loaded so
//! the next transition can remove it again.

/// The two asset element flavours the router manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Stylesheet,
    Script,
}

impl AssetKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AssetKind::Stylesheet => "stylesheet",
            AssetKind::Script => "script",
        }
    }
}

/// URLs of the page-scoped assets currently in the document, in insertion
/// order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageAssetSet {
    styles: Vec<String>,
    scripts: Vec<String>,
}

impl PageAssetSet {
    pub fn new() -> Self {
        PageAssetSet::default()
    }

    /// Records a loaded asset. Returns `false` when the URL was already
    /// tracked under the same kind.
    pub fn record(&mut self, kind: AssetKind, url: impl Into<String>) -> bool {
        let url = url.into();
        let bucket = self.bucket_mut(kind);
        if bucket.iter().any(|existing| *existing == url) {
            return false;
        }
        bucket.push(url);
        true
    }

    pub fn contains(&self, kind: AssetKind, url: &str) -> bool {
        self.bucket(kind).iter().any(|existing| existing == url)
    }

    /// All tracked assets, stylesheets first, each bucket in insertion
    /// order.
    pub fn iter(&self) -> impl Iterator<Item = (AssetKind, &str)> {
        let styles = self
            .styles
            .iter()
            .map(|url| (AssetKind::Stylesheet, url.as_str()));
        let scripts = self
            .scripts
            .iter()
            .map(|url| (AssetKind::Script, url.as_str()));
        styles.chain(scripts)
    }

    pub fn clear(&mut self) {
        self.styles.clear();
        self.scripts.clear();
    }

    pub fn len(&self) -> usize {
        self.styles.len() + self.scripts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty() && self.scripts.is_empty()
    }

    fn bucket(&self, kind: AssetKind) -> &Vec<String> {
        match kind {
            AssetKind::Stylesheet => &self.styles,
            AssetKind::Script => &self.scripts,
        }
    }

    fn bucket_mut(&mut self, kind: AssetKind) -> &mut Vec<String> {
        match kind {
            AssetKind::Stylesheet => &mut self.styles,
            AssetKind::Script => &mut self.scripts,
        }
    }
}

/// Substring allowlist of theme-level assets.
///
/// Matching is plain substring containment against the raw URL, so a
/// single pattern like `vendors` covers both `vendors.js` and fingerprinted
/// variants like `vendors.3f9a.js`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalAssetPolicy {
    patterns: Vec<String>,
}

impl GlobalAssetPolicy {
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        GlobalAssetPolicy {
            patterns: patterns.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether `url` belongs to the theme-level bundle set.
    pub fn is_global(&self, url: &str) -> bool {
        self.patterns.iter().any(|pattern| url.contains(pattern))
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

/// One asset reference pulled out of a fetched document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedAsset {
    pub kind: AssetKind,
    pub url: String,
}

/// Split of a fetched page's asset references into page-scoped loads and
/// theme-level skips.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetPlan {
    /// Assets to load and track, in document order within each kind.
    pub load: Vec<PlannedAsset>,
    /// Theme-level assets already present in the document.
    pub skip: Vec<PlannedAsset>,
}

impl AssetPlan {
    /// Classifies stylesheet and script URLs against the global allowlist.
    pub fn classify<I, J>(styles: I, scripts: J, policy: &GlobalAssetPolicy) -> Self
    where
        I: IntoIterator<Item = String>,
        J: IntoIterator<Item = String>,
    {
        let mut plan = AssetPlan::default();
        for url in styles {
            plan.push(AssetKind::Stylesheet, url, policy);
        }
        for url in scripts {
            plan.push(AssetKind::Script, url, policy);
        }
        plan
    }

    fn push(&mut self, kind: AssetKind, url: String, policy: &GlobalAssetPolicy) {
        let planned = PlannedAsset { kind, url };
        if policy.is_global(&planned.url) {
            self.skip.push(planned);
        } else {
            self.load.push(planned);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_rejects_duplicates() {
        let mut set = PageAssetSet::new();
        assert!(set.record(AssetKind::Script, "/assets/product.js"));
        assert!(!set.record(AssetKind::Script, "/assets/product.js"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_same_url_tracked_per_kind() {
        let mut set = PageAssetSet::new();
        assert!(set.record(AssetKind::Stylesheet, "/assets/page"));
        assert!(set.record(AssetKind::Script, "/assets/page"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_iter_preserves_insertion_order() {
        let mut set = PageAssetSet::new();
        set.record(AssetKind::Script, "/a.js");
        set.record(AssetKind::Stylesheet, "/a.css");
        set.record(AssetKind::Script, "/b.js");
        let urls: Vec<&str> = set.iter().map(|(_, url)| url).collect();
        assert_eq!(urls, vec!["/a.css", "/a.js", "/b.js"]);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut set = PageAssetSet::new();
        set.record(AssetKind::Stylesheet, "/a.css");
        set.clear();
        assert!(set.is_empty());
        set.clear();
        assert!(set.is_empty());
    }

    #[test]
    fn test_policy_matches_by_substring() {
        let policy = GlobalAssetPolicy::new(["vendors"]);
        assert!(policy.is_global("/assets/vendors.js"));
        assert!(policy.is_global("https://cdn.example/vendors.3f9a.js"));
        assert!(!policy.is_global("/assets/cart.js"));
    }

    #[test]
    fn test_empty_policy_matches_nothing() {
        let policy = GlobalAssetPolicy::default();
        assert!(!policy.is_global("/assets/vendors.js"));
    }

    #[test]
    fn test_classify_splits_on_policy() {
        let policy = GlobalAssetPolicy::new(["vitrine-theme", "vendors"]);
        let plan = AssetPlan::classify(
            vec![
                "/assets/vitrine-theme.css".to_string(),
                "/assets/product.css".to_string(),
            ],
            vec![
                "/assets/vendors.js".to_string(),
                "/assets/product.js".to_string(),
            ],
            &policy,
        );
        let loads: Vec<&str> = plan.load.iter().map(|a| a.url.as_str()).collect();
        let skips: Vec<&str> = plan.skip.iter().map(|a| a.url.as_str()).collect();
        assert_eq!(loads, vec!["/assets/product.css", "/assets/product.js"]);
        assert_eq!(skips, vec!["/assets/vitrine-theme.css", "/assets/vendors.js"]);
    }

    #[test]
    fn test_classify_keeps_document_order() {
        let policy = GlobalAssetPolicy::default();
        let plan = AssetPlan::classify(
            vec!["/one.css".to_string(), "/two.css".to_string()],
            vec!["/one.js".to_string()],
            &policy,
        );
        let urls: Vec<&str> = plan.load.iter().map(|a| a.url.as_str()).collect();
        assert_eq!(urls, vec!["/one.css", "/two.css", "/one.js"]);
    }
}
