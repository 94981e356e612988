//! Bounded in-memory cache of decoded place icons.
//!
//! Eviction is by insertion order: once the number of distinct keys exceeds
//! the capacity, the entry inserted earliest is dropped. Reads do not
//! refresh an entry's position, and overwriting an existing key keeps its
//! original position.
//!
//! All mutation happens under one mutex, so insert-and-evict is atomic with
//! respect to concurrent readers and the map never holds more than
//! `capacity` entries outside the lock.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

use image::DynamicImage;

pub const DEFAULT_ICON_CACHE_CAPACITY: usize = 8;

#[derive(Debug, Default)]
struct Entries {
    images: HashMap<String, DynamicImage>,
    order: VecDeque<String>,
}

#[derive(Debug)]
pub struct IconCache {
    capacity: usize,
    entries: Mutex<Entries>,
}

impl IconCache {
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "icon cache capacity must be at least 1");
        Self {
            capacity,
            entries: Mutex::new(Entries::default()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns an owned copy of the cached image; mutating it never touches
    /// the cache.
    pub fn get(&self, url: &str) -> Option<DynamicImage> {
        self.lock().images.get(url).cloned()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.lock().images.contains_key(url)
    }

    /// Inserts `image` under `url`, evicting the oldest entry if the cache
    /// grows past capacity. Returns the evicted key, if any.
    pub fn put(&self, url: &str, image: DynamicImage) -> Option<String> {
        let mut entries = self.lock();
        if entries.images.insert(url.to_owned(), image).is_none() {
            entries.order.push_back(url.to_owned());
        }
        if entries.images.len() <= self.capacity {
            return None;
        }
        let evicted = entries.order.pop_front()?;
        entries.images.remove(&evicted);
        tracing::debug!(url = %evicted, capacity = self.capacity, "evicted icon from cache");
        Some(evicted)
    }

    pub fn len(&self) -> usize {
        self.lock().images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().images.is_empty()
    }

    /// Keys in eviction order, oldest first.
    pub fn keys(&self) -> Vec<String> {
        self.lock().order.iter().cloned().collect()
    }

    fn lock(&self) -> MutexGuard<'_, Entries> {
        // No code path panics between the insert and the eviction.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for IconCache {
    fn default() -> Self {
        Self::new(DEFAULT_ICON_CACHE_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use image::{Rgba, RgbaImage};

    use super::*;

    fn icon(shade: u8) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(2, 2, Rgba([shade, 0, 0, 255])))
    }

    fn url(n: usize) -> String {
        format!("https://maps.example.com/icons/{n}.png")
    }

    #[test]
    fn ninth_insert_evicts_the_first() {
        let cache = IconCache::new(8);
        for n in 0..9 {
            cache.put(&url(n), icon(0));
        }
        assert_eq!(cache.len(), 8);
        assert!(cache.get(&url(0)).is_none());
        for n in 1..9 {
            assert!(cache.contains(&url(n)), "{} should be cached", url(n));
        }
    }

    #[test]
    fn put_reports_evicted_key() {
        let cache = IconCache::new(2);
        assert_eq!(cache.put("a", icon(0)), None);
        assert_eq!(cache.put("b", icon(0)), None);
        assert_eq!(cache.put("c", icon(0)), Some("a".to_owned()));
        assert_eq!(cache.keys(), vec!["b".to_owned(), "c".to_owned()]);
    }

    #[test]
    fn reads_do_not_refresh_position() {
        let cache = IconCache::new(2);
        cache.put("a", icon(0));
        cache.put("b", icon(0));
        assert!(cache.get("a").is_some());
        cache.put("c", icon(0));
        assert!(!cache.contains("a"), "insertion order, not access order");
        assert!(cache.contains("b"));
    }

    #[test]
    fn overwrite_keeps_original_position() {
        let cache = IconCache::new(2);
        cache.put("a", icon(1));
        cache.put("b", icon(0));
        cache.put("a", icon(2));
        assert_eq!(cache.len(), 2);
        cache.put("c", icon(0));
        assert!(!cache.contains("a"));
        assert_eq!(cache.keys(), vec!["b".to_owned(), "c".to_owned()]);
    }

    #[test]
    fn returned_images_are_copies() {
        let cache = IconCache::new(1);
        cache.put("a", icon(10));
        let mut copy = cache.get("a").expect("cached");
        if let Some(rgba) = copy.as_mut_rgba8() {
            rgba.put_pixel(0, 0, Rgba([99, 99, 99, 255]));
        }
        let fresh = cache.get("a").expect("cached");
        assert_eq!(fresh.to_rgba8().get_pixel(0, 0), &Rgba([10, 0, 0, 255]));
    }

    #[test]
    fn concurrent_inserts_respect_capacity() {
        let cache = Arc::new(IconCache::new(8));
        let handles: Vec<_> = (0..16)
            .map(|t| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    for n in 0..50 {
                        cache.put(&url(t * 100 + n), icon(0));
                        assert!(cache.len() <= 8);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("thread should not panic");
        }
        assert_eq!(cache.len(), 8);
        assert_eq!(cache.keys().len(), 8);
    }

    #[test]
    #[should_panic(expected = "capacity must be at least 1")]
    fn zero_capacity_is_rejected() {
        let _ = IconCache::new(0);
    }
}
