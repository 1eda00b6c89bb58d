//! DOM-side tracking of page-scoped stylesheets and scripts.
//!
//! Loads are started synchronously so the tracked set is complete the
//! moment a navigation begins tearing things down, even while the network
//! is still working through the elements appended here.

use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, HtmlElement, HtmlLinkElement, HtmlScriptElement};

use vitrine_core::{AssetKind, GlobalAssetPolicy, NavError, PageAssetSet};

use crate::dom::js_error_string;

/// Owns the set of page-scoped asset elements currently in the document
/// head.
pub struct AssetTracker {
    assets: PageAssetSet,
    policy: GlobalAssetPolicy,
}

/// An asset element that has been appended and recorded. Await [`wait`]
/// for its load or error event.
///
/// [`wait`]: AssetLoad::wait
pub struct AssetLoad {
    kind: AssetKind,
    url: String,
    future: JsFuture,
}

impl AssetLoad {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn kind(&self) -> AssetKind {
        self.kind
    }

    /// Resolves once the element has loaded, or fails with the element's
    /// error event.
    pub async fn wait(self) -> Result<(), NavError> {
        match self.future.await {
            Ok(_) => {
                tracing::trace!(
                    target: "vitrine::assets",
                    kind = self.kind.as_str(),
                    url = %self.url,
                    "asset loaded"
                );
                Ok(())
            }
            Err(_) => Err(NavError::AssetLoad {
                url: self.url,
                message: "load event reported an error".to_string(),
            }),
        }
    }
}

impl AssetTracker {
    pub fn new(policy: GlobalAssetPolicy) -> Self {
        AssetTracker {
            assets: PageAssetSet::new(),
            policy,
        }
    }

    pub fn policy(&self) -> &GlobalAssetPolicy {
        &self.policy
    }

    pub fn tracked(&self) -> &PageAssetSet {
        &self.assets
    }

    /// Creates the element for `url`, appends it to the document head and
    /// records it. The returned [`AssetLoad`] resolves when the browser
    /// finishes fetching it; the URL is tracked regardless of how that
    /// turns out.
    pub fn start_load(
        &mut self,
        document: &Document,
        kind: AssetKind,
        url: &str,
    ) -> Result<AssetLoad, NavError> {
        let head = document
            .head()
            .ok_or_else(|| NavError::Dom("document has no head".to_string()))?;

        let element: HtmlElement = match kind {
            AssetKind::Stylesheet => {
                let link: HtmlLinkElement = create_as(document, "link")?;
                link.set_rel("stylesheet");
                link.set_href(url);
                link.into()
            }
            AssetKind::Script => {
                let script: HtmlScriptElement = create_as(document, "script")?;
                script.set_src(url);
                script.into()
            }
        };

        let promise = js_sys::Promise::new(&mut |resolve, reject| {
            element.set_onload(Some(&resolve));
            element.set_onerror(Some(&reject));
        });

        head.append_child(&element)
            .map_err(|error| NavError::Dom(js_error_string(&error)))?;
        self.assets.record(kind, url);

        Ok(AssetLoad {
            kind,
            url: url.to_string(),
            future: JsFuture::from(promise),
        })
    }

    /// Removes every tracked asset element from the document and forgets
    /// it. Running this twice in a row is a no-op the second time.
    pub fn remove_all(&mut self, document: &Document) {
        let mut removed = 0usize;
        for (kind, url) in self.assets.iter() {
            if let Ok(Some(element)) = document.query_selector(&attribute_selector(kind, url)) {
                element.remove();
                removed += 1;
            }
        }
        let tracked = self.assets.len();
        self.assets.clear();
        if tracked > 0 {
            tracing::debug!(
                target: "vitrine::assets",
                tracked,
                removed,
                "removed page assets"
            );
        }
    }
}

fn create_as<T: JsCast>(document: &Document, tag: &str) -> Result<T, NavError> {
    document
        .create_element(tag)
        .map_err(|error| NavError::Dom(js_error_string(&error)))?
        .dyn_into::<T>()
        .map_err(|_| NavError::Dom(format!("<{tag}> did not cast to its element type")))
}

/// Selector matching the exact element `start_load` created for this URL.
fn attribute_selector(kind: AssetKind, url: &str) -> String {
    let escaped = url.replace('"', "\\\"");
    match kind {
        AssetKind::Stylesheet => format!("link[href=\"{escaped}\"]"),
        AssetKind::Script => format!("script[src=\"{escaped}\"]"),
    }
}
