//! Image cache for the browser build.
//!
//! Sprite sheets and the terrain tile are fetched by the browser off-thread;
//! startup waits on [`ResourceCache::on_ready`] so the renderer never sees a
//! half-loaded image.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::HtmlImageElement;

/// Shared image cache. Clones are cheap handles onto the same entries.
#[derive(Clone, Default)]
pub struct ResourceCache {
    inner: Rc<CacheInner>,
}

#[derive(Default)]
struct CacheInner {
    images: RefCell<HashMap<String, HtmlImageElement>>,
    pending: Cell<usize>,
    ready: RefCell<Vec<Box<dyn FnOnce()>>>,
}

impl ResourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts fetching every path. Paths already cached are skipped.
    pub fn load(&self, paths: &[&str]) {
        for path in paths {
            if self.inner.images.borrow().contains_key(*path) {
                continue;
            }
            self.fetch(path);
        }
    }

    fn fetch(&self, path: &str) {
        let img = match HtmlImageElement::new() {
            Ok(img) => img,
            Err(e) => {
                log::error!("Failed to create image element: {:?}", e);
                return;
            }
        };
        self.inner.pending.set(self.inner.pending.get() + 1);

        {
            let inner = self.inner.clone();
            let path = path.to_string();
            let handle = img.clone();
            let closure = Closure::once(move || {
                inner.images.borrow_mut().insert(path, handle);
                inner.pending.set(inner.pending.get() - 1);
                if inner.pending.get() == 0 {
                    // Take first: a callback may register more work on the cache
                    let callbacks = inner.ready.take();
                    for callback in callbacks {
                        callback();
                    }
                }
            });
            img.set_onload(Some(closure.as_ref().unchecked_ref()));
            closure.forget();
        }

        {
            let path = path.to_string();
            let closure = Closure::once(move || {
                log::error!("Failed to load {}", path);
            });
            img.set_onerror(Some(closure.as_ref().unchecked_ref()));
            closure.forget();
        }

        img.set_src(path);
    }

    /// Runs `callback` once every requested image has arrived. Fires
    /// immediately when nothing is in flight.
    pub fn on_ready(&self, callback: impl FnOnce() + 'static) {
        if self.is_ready() {
            callback();
        } else {
            self.inner.ready.borrow_mut().push(Box::new(callback));
        }
    }

    /// Handle to a loaded image, `None` while the fetch is still in flight.
    pub fn get(&self, path: &str) -> Option<HtmlImageElement> {
        self.inner.images.borrow().get(path).cloned()
    }

    pub fn is_ready(&self) -> bool {
        self.inner.pending.get() == 0
    }
}
