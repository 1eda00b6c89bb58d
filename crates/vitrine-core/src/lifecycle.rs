//! Re-render hook registry.
//!
//! After a page swap, freshly inserted markup needs its behavior wired
//! back up. Hooks are registered under stable ids and invoked in
//! registration order after every transition. Hooks present when the
//! baseline is sealed (theme-level setup) survive navigations; hooks
//! registered afterwards belong to the current page and are dropped when
//! that page's assets are removed.

use smol_str::SmolStr;

use crate::error::HookError;

/// A re-render callback. Failures are isolated per hook.
pub type Hook = Box<dyn FnMut() -> Result<(), HookError>>;

struct Entry {
    id: SmolStr,
    hook: Hook,
}

/// Ordered registry of re-render hooks with a sealable baseline.
#[derive(Default)]
pub struct LifecycleRegistry {
    entries: Vec<Entry>,
    baseline: Option<usize>,
}

impl LifecycleRegistry {
    pub fn new() -> Self {
        LifecycleRegistry::default()
    }

    /// Registers a hook under `id`. Re-registering an existing id replaces
    /// the hook in place, keeping its position in the invocation order.
    /// Returns `true` when an existing hook was replaced.
    pub fn register(&mut self, id: impl Into<SmolStr>, hook: Hook) -> bool {
        let id = id.into();
        if let Some(entry) = self.entries.iter_mut().find(|entry| entry.id == id) {
            entry.hook = hook;
            return true;
        }
        self.entries.push(Entry { id, hook });
        false
    }

    /// Removes the hook registered under `id`. Returns `false` when no
    /// such hook exists.
    pub fn unregister(&mut self, id: &str) -> bool {
        let Some(index) = self.entries.iter().position(|entry| entry.id == id) else {
            return false;
        };
        self.entries.remove(index);
        if let Some(baseline) = self.baseline.as_mut()
            && index < *baseline
        {
            *baseline -= 1;
        }
        true
    }

    /// Marks everything registered so far as the persistent baseline.
    /// Later calls move the baseline forward.
    pub fn seal_baseline(&mut self) {
        self.baseline = Some(self.entries.len());
    }

    /// Drops every hook registered after the baseline was sealed. Returns
    /// how many were dropped. Without a sealed baseline this is a no-op.
    pub fn reset_to_baseline(&mut self) -> usize {
        let Some(baseline) = self.baseline else {
            return 0;
        };
        let dropped = self.entries.len().saturating_sub(baseline);
        self.entries.truncate(baseline);
        if dropped > 0 {
            tracing::trace!(target: "vitrine::lifecycle", dropped, "dropped page-scoped hooks");
        }
        dropped
    }

    /// Runs every hook in registration order. A failing hook is logged and
    /// skipped; the rest still run. Returns the number of failures.
    pub fn invoke_all(&mut self) -> usize {
        let mut failures = 0;
        for entry in &mut self.entries {
            if let Err(error) = (entry.hook)() {
                failures += 1;
                tracing::warn!(
                    target: "vitrine::lifecycle",
                    id = %entry.id,
                    %error,
                    "re-render hook failed"
                );
            }
        }
        tracing::trace!(
            target: "vitrine::lifecycle",
            hooks = self.entries.len(),
            failures,
            "re-render pass complete"
        );
        failures
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    fn recording_hook(log: &Rc<RefCell<Vec<&'static str>>>, label: &'static str) -> Hook {
        let log = Rc::clone(log);
        Box::new(move || {
            log.borrow_mut().push(label);
            Ok(())
        })
    }

    #[test]
    fn test_invoke_runs_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut registry = LifecycleRegistry::new();
        registry.register("widgets", recording_hook(&log, "widgets"));
        registry.register("analytics", recording_hook(&log, "analytics"));
        let failures = registry.invoke_all();
        assert_eq!(failures, 0);
        assert_eq!(*log.borrow(), vec!["widgets", "analytics"]);
    }

    #[test]
    fn test_register_replaces_in_place() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut registry = LifecycleRegistry::new();
        registry.register("first", recording_hook(&log, "first"));
        registry.register("second", recording_hook(&log, "second"));
        let replaced = registry.register("first", recording_hook(&log, "first-v2"));
        assert!(replaced);
        assert_eq!(registry.len(), 2);
        registry.invoke_all();
        assert_eq!(*log.borrow(), vec!["first-v2", "second"]);
    }

    #[test]
    fn test_failures_are_isolated() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut registry = LifecycleRegistry::new();
        registry.register("ok-before", recording_hook(&log, "before"));
        registry.register("broken", Box::new(|| Err(HookError::from("boom"))));
        registry.register("ok-after", recording_hook(&log, "after"));
        let failures = registry.invoke_all();
        assert_eq!(failures, 1);
        assert_eq!(*log.borrow(), vec!["before", "after"]);
    }

    #[test]
    fn test_reset_drops_hooks_after_baseline() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut registry = LifecycleRegistry::new();
        registry.register("theme", recording_hook(&log, "theme"));
        registry.seal_baseline();
        registry.register("page", recording_hook(&log, "page"));
        assert_eq!(registry.reset_to_baseline(), 1);
        assert!(registry.contains("theme"));
        assert!(!registry.contains("page"));
        assert_eq!(registry.reset_to_baseline(), 0);
    }

    #[test]
    fn test_reset_without_baseline_keeps_everything() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut registry = LifecycleRegistry::new();
        registry.register("theme", recording_hook(&log, "theme"));
        assert_eq!(registry.reset_to_baseline(), 0);
        assert!(registry.contains("theme"));
    }

    #[test]
    fn test_unregister_inside_baseline_adjusts_it() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut registry = LifecycleRegistry::new();
        registry.register("a", recording_hook(&log, "a"));
        registry.register("b", recording_hook(&log, "b"));
        registry.seal_baseline();
        assert!(registry.unregister("a"));
        registry.register("page", recording_hook(&log, "page"));
        registry.reset_to_baseline();
        assert_eq!(registry.len(), 1);
        assert!(registry.contains("b"));
    }

    #[test]
    fn test_unregister_missing_id() {
        let mut registry = LifecycleRegistry::new();
        assert!(!registry.unregister("ghost"));
    }

    #[test]
    fn test_replaced_hooks_keep_state() {
        // FnMut hooks may carry state between invocations.
        let mut registry = LifecycleRegistry::new();
        let counter = Rc::new(RefCell::new(0));
        let seen = Rc::clone(&counter);
        registry.register(
            "counter",
            Box::new(move || {
                *seen.borrow_mut() += 1;
                Ok(())
            }),
        );
        registry.invoke_all();
        registry.invoke_all();
        assert_eq!(*counter.borrow(), 2);
    }
}
