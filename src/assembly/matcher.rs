use std::fmt;

use crate::scene::template::Template;

/// Prefixes understood by [`PrefixedName`] when none are configured.
pub const DEFAULT_SLOT_PREFIXES: &[&str] = &["target-", "slot:"];

/// One heuristic for resolving an opaque wiring handle to a template slot.
pub trait SlotMatcher: fmt::Debug + Send + Sync {
    /// Stable matcher name, reported alongside matches.
    fn name(&self) -> &'static str;

    /// Index of the slot `handle` refers to, if this matcher recognizes it.
    fn find(&self, handle: &str, template: &Template) -> Option<usize>;
}

/// Handle equals the slot's semantic name.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExactName;

impl SlotMatcher for ExactName {
    fn name(&self) -> &'static str {
        "exact_name"
    }

    fn find(&self, handle: &str, template: &Template) -> Option<usize> {
        template.slot_index(handle)
    }
}

/// Handle is a known prefix followed by the slot's semantic name.
#[derive(Clone, Debug)]
pub struct PrefixedName {
    prefixes: Vec<String>,
}

impl PrefixedName {
    /// Matcher for the given prefixes, tried in order.
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }
}

impl Default for PrefixedName {
    fn default() -> Self {
        Self::new(DEFAULT_SLOT_PREFIXES.iter().copied())
    }
}

impl SlotMatcher for PrefixedName {
    fn name(&self) -> &'static str {
        "prefixed_name"
    }

    fn find(&self, handle: &str, template: &Template) -> Option<usize> {
        self.prefixes
            .iter()
            .filter_map(|p| handle.strip_prefix(p.as_str()))
            .find_map(|rest| template.slot_index(rest))
    }
}

/// Handle is a positional proxy: `#<n>` or `slot-<n>`, 0-based.
#[derive(Clone, Copy, Debug, Default)]
pub struct IndexedProxy;

impl SlotMatcher for IndexedProxy {
    fn name(&self) -> &'static str {
        "indexed_proxy"
    }

    fn find(&self, handle: &str, template: &Template) -> Option<usize> {
        let digits = handle
            .strip_prefix('#')
            .or_else(|| handle.strip_prefix("slot-"))?;
        if digits.is_empty() || !digits.bytes().all(|c| c.is_ascii_digit()) {
            return None;
        }
        let idx: usize = digits.parse().ok()?;
        (idx < template.slots.len()).then_some(idx)
    }
}

/// Any handle resolves to the only slot of a single-slot template.
#[derive(Clone, Copy, Debug, Default)]
pub struct SingleSlotFallback;

impl SlotMatcher for SingleSlotFallback {
    fn name(&self) -> &'static str {
        "single_slot_fallback"
    }

    fn find(&self, _handle: &str, template: &Template) -> Option<usize> {
        (template.slots.len() == 1).then_some(0)
    }
}

/// A resolved slot handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlotMatch {
    /// Index into [`Template::slots`].
    pub index: usize,
    /// Name of the matcher that resolved it.
    pub matcher: &'static str,
}

/// Ordered list of matchers; the first one that recognizes a handle wins.
#[derive(Debug)]
pub struct MatcherChain {
    matchers: Vec<Box<dyn SlotMatcher>>,
}

impl MatcherChain {
    /// Chain without any matcher.
    pub fn empty() -> Self {
        Self {
            matchers: Vec::new(),
        }
    }

    /// Built-in chain: exact, prefixed (with `prefixes`), indexed, single-slot fallback.
    pub fn with_prefixes<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut chain = Self::empty();
        chain.push(ExactName);
        chain.push(PrefixedName::new(prefixes));
        chain.push(IndexedProxy);
        chain.push(SingleSlotFallback);
        chain
    }

    /// Append a matcher after the existing ones.
    pub fn push(&mut self, matcher: impl SlotMatcher + 'static) {
        self.matchers.push(Box::new(matcher));
    }

    /// Resolve `handle` against `template`.
    pub fn resolve(&self, handle: &str, template: &Template) -> Option<SlotMatch> {
        self.matchers.iter().find_map(|m| {
            m.find(handle, template).map(|index| SlotMatch {
                index,
                matcher: m.name(),
            })
        })
    }

    /// Matcher names in resolution order.
    pub fn names(&self) -> Vec<&'static str> {
        self.matchers.iter().map(|m| m.name()).collect()
    }
}

impl Default for MatcherChain {
    fn default() -> Self {
        Self::with_prefixes(DEFAULT_SLOT_PREFIXES.iter().copied())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assembly/matcher.rs"]
mod tests;
