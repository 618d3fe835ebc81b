//! Parse cache
//!
//! Parsing is pure, so identical `(kind, text)` input can reuse an earlier
//! result. Entries are found by hash and confirmed against the stored text.
//! A cache is tied to the profiles it is used with: clear it after changing
//! keyword rules.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use tracing::trace;

use super::profile::{PlanKind, PlanProfile};
use super::Plan;
use crate::constants::cache::MAX_ENTRIES;

/// Cache key: (kind, content_hash)
type CacheKey = (PlanKind, u64);

/// Source text is kept so a hash collision never serves another text's plan
struct CachedPlan {
    text: String,
    plan: Arc<Plan>,
}

pub struct ParseCache {
    cache: HashMap<CacheKey, CachedPlan>,
    /// Max cache entries to prevent unbounded growth
    max_entries: usize,
}

impl Default for ParseCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ParseCache {
    pub fn new() -> Self {
        Self::with_capacity(MAX_ENTRIES)
    }

    pub fn with_capacity(max_entries: usize) -> Self {
        Self {
            cache: HashMap::new(),
            max_entries: max_entries.max(1),
        }
    }

    fn content_hash(text: &str) -> u64 {
        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        hasher.finish()
    }

    /// Evict a fifth of the entries once the cache is full
    fn evict_if_full(&mut self) {
        if self.cache.len() >= self.max_entries {
            let remove_count = (self.max_entries / 5).max(1);
            let keys_to_remove: Vec<_> = self.cache.keys().take(remove_count).copied().collect();
            for k in keys_to_remove {
                self.cache.remove(&k);
            }
        }
    }

    /// Parse `text`, or return the cached plan for identical input.
    pub fn get_or_parse(&mut self, text: &str, profile: &PlanProfile) -> Arc<Plan> {
        let key = (profile.kind, Self::content_hash(text));

        match self.cache.get(&key) {
            Some(cached) if cached.text == text => {
                trace!(kind = %profile.kind, "Parse cache hit");
                return Arc::clone(&cached.plan);
            }
            Some(_) => trace!(kind = %profile.kind, "Parse cache collision, replacing entry"),
            None => self.evict_if_full(),
        }

        let plan = Arc::new(Plan::parse(text, profile));
        self.cache.insert(
            key,
            CachedPlan {
                text: text.to_string(),
                plan: Arc::clone(&plan),
            },
        );
        plan
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_on_identical_input() {
        let profile = PlanProfile::builtin(PlanKind::Workout);
        let mut cache = ParseCache::new();
        let first = cache.get_or_parse("## TREINO A\n- Supino: 3x10", &profile);
        let second = cache.get_or_parse("## TREINO A\n- Supino: 3x10", &profile);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_kind_is_part_of_key() {
        let mut cache = ParseCache::new();
        let text = "## Segunda-feira\n- Ponte: 3x15";
        let workout = cache.get_or_parse(text, &PlanProfile::builtin(PlanKind::Workout));
        let rehab = cache.get_or_parse(text, &PlanProfile::builtin(PlanKind::Rehabilitation));
        assert!(!Arc::ptr_eq(&workout, &rehab));
        assert_eq!(rehab.kind, PlanKind::Rehabilitation);
    }

    #[test]
    fn test_same_hash_different_text_is_a_miss() {
        let profile = PlanProfile::builtin(PlanKind::Workout);
        let mut cache = ParseCache::new();
        let stale = cache.get_or_parse("## TREINO B\n- Remada: 3x12", &profile);

        // plant the stale plan under the key of another text
        let text = "## TREINO A\n- Supino: 3x10";
        let key = (PlanKind::Workout, ParseCache::content_hash(text));
        cache.cache.insert(
            key,
            CachedPlan {
                text: "## TREINO B\n- Remada: 3x12".to_string(),
                plan: Arc::clone(&stale),
            },
        );

        let fresh = cache.get_or_parse(text, &profile);
        assert!(!Arc::ptr_eq(&fresh, &stale));
        assert_eq!(fresh.sections[0].section.title, "TREINO A");
        assert!(Arc::ptr_eq(&fresh, &cache.get_or_parse(text, &profile)));
    }

    #[test]
    fn test_bounded_and_clear() {
        let profile = PlanProfile::builtin(PlanKind::Nutrition);
        let mut cache = ParseCache::with_capacity(5);
        for i in 0..20 {
            cache.get_or_parse(&format!("Almoço {i}"), &profile);
        }
        assert!(cache.len() <= 5);
        cache.clear();
        assert!(cache.is_empty());
    }
}
