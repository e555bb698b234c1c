/// Bounded particle pool.
///
/// Pruning happens in place with `retain_mut`; when a push overflows the cap the
/// oldest entries are dropped so the newest survive.
#[derive(Clone, Debug)]
pub struct Pool<T> {
    items: Vec<T>,
    cap: usize,
}

impl<T> Pool<T> {
    pub fn with_cap(cap: usize) -> Self {
        Self {
            items: Vec::with_capacity(cap.min(1024)),
            cap,
        }
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Change the cap, trimming the oldest entries if needed.
    pub fn set_cap(&mut self, cap: usize) {
        self.cap = cap;
        self.trim();
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
        self.trim();
    }

    pub fn extend(&mut self, items: impl IntoIterator<Item = T>) {
        self.items.extend(items);
        self.trim();
    }

    /// Run `step` on every item and keep those for which it returns `true`.
    pub fn update(&mut self, step: impl FnMut(&mut T) -> bool) {
        self.items.retain_mut(step);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.cap
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    fn trim(&mut self) {
        if self.items.len() > self.cap {
            let excess = self.items.len() - self.cap;
            self.items.drain(..excess);
            tracing::trace!(excess, cap = self.cap, "pool trimmed");
        }
    }
}

impl<'a, T> IntoIterator for &'a Pool<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
