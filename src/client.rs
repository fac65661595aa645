//! Registry of managed windows.
//!
//! Clients are keyed by their window handle. Two orders are kept alongside:
//! traversal order (most recently mapped first), which drives cycling and
//! tiling, and stacking order (bottom to top), which mirrors the raise
//! requests sent to the window system.

use std::collections::BTreeMap;

use crate::geometry::Geometry;
use crate::tags::TagMask;

/// Opaque handle of a window-system resource.
pub type WindowId = u32;

#[derive(Debug, Clone, PartialEq)]
pub struct Client {
    window: WindowId,
    pub title: Option<String>,
    pub geometry: Geometry,
    pub tags: TagMask,
}

impl Client {
    pub fn new(window: WindowId, geometry: Geometry, tags: TagMask) -> Self {
        Self {
            window,
            title: None,
            geometry,
            tags,
        }
    }

    pub fn window(&self) -> WindowId {
        self.window
    }

    pub fn is_hidden(&self, hidden: TagMask) -> bool {
        self.tags.intersects(hidden)
    }

    pub fn is_sticky(&self, sticky: TagMask) -> bool {
        self.tags.intersects(sticky)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ClientRegistry {
    clients: BTreeMap<WindowId, Client>,
    order: Vec<WindowId>,
    z_order: Vec<WindowId>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, window: WindowId) -> bool {
        self.clients.contains_key(&window)
    }

    pub fn get(&self, window: WindowId) -> Option<&Client> {
        self.clients.get(&window)
    }

    pub fn get_mut(&mut self, window: WindowId) -> Option<&mut Client> {
        self.clients.get_mut(&window)
    }

    /// Traversal order, head (newest) first.
    pub fn order(&self) -> &[WindowId] {
        &self.order
    }

    /// Stacking order, bottom first.
    pub fn z_order(&self) -> &[WindowId] {
        &self.z_order
    }

    pub fn head(&self) -> Option<WindowId> {
        self.order.first().copied()
    }

    /// Clients in traversal order.
    pub fn iter(&self) -> impl Iterator<Item = &Client> {
        self.order.iter().filter_map(|id| self.clients.get(id))
    }

    pub fn position(&self, window: WindowId) -> Option<usize> {
        self.order.iter().position(|id| *id == window)
    }

    /// Add a client at the head of traversal and the top of the stack.
    /// Returns false, leaving the registry untouched, if the handle is
    /// already tracked.
    pub fn insert_head(&mut self, client: Client) -> bool {
        let window = client.window;
        if self.clients.contains_key(&window) {
            return false;
        }
        self.clients.insert(window, client);
        self.order.insert(0, window);
        self.z_order.push(window);
        true
    }

    /// Remove a client, returning it together with the traversal index it
    /// occupied.
    pub fn remove(&mut self, window: WindowId) -> Option<(Client, usize)> {
        let client = self.clients.remove(&window)?;
        let index = self.position(window).unwrap_or(self.order.len());
        self.order.retain(|id| *id != window);
        self.z_order.retain(|id| *id != window);
        Some((client, index))
    }

    pub fn raise(&mut self, window: WindowId) {
        if let Some(pos) = self.z_order.iter().position(|id| *id == window) {
            let id = self.z_order.remove(pos);
            self.z_order.push(id);
        }
    }

    /// Pan every non-sticky client.
    pub fn translate(&mut self, dx: f64, dy: f64, sticky: TagMask) {
        for client in self.clients.values_mut() {
            if !client.is_sticky(sticky) {
                client.geometry.translate(dx, dy);
            }
        }
    }

    /// Zoom every non-sticky client about `(px, py)`.
    pub fn scale_about(&mut self, factor: f64, px: f64, py: f64, sticky: TagMask, min_size: f64) {
        for client in self.clients.values_mut() {
            if !client.is_sticky(sticky) {
                client.geometry.scale_about(factor, px, py, min_size);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(id: WindowId, x: f64, tags: TagMask) -> Client {
        Client::new(id, Geometry::new(x, 0.0, 100.0, 100.0), tags)
    }

    #[test]
    fn insert_puts_newest_first_and_rejects_duplicates() {
        let mut reg = ClientRegistry::new();
        assert!(reg.insert_head(client(1, 0.0, TagMask::single(0))));
        assert!(reg.insert_head(client(2, 0.0, TagMask::single(0))));
        assert!(!reg.insert_head(client(1, 50.0, TagMask::single(0))));
        assert_eq!(reg.order(), &[2, 1]);
        assert_eq!(reg.z_order(), &[1, 2]);
        assert_eq!(reg.get(1).unwrap().geometry.x, 0.0);
    }

    #[test]
    fn remove_preserves_relative_order() {
        let mut reg = ClientRegistry::new();
        for id in 1..=4 {
            reg.insert_head(client(id, 0.0, TagMask::single(0)));
        }
        let (removed, index) = reg.remove(3).unwrap();
        assert_eq!(removed.window(), 3);
        assert_eq!(index, 1);
        assert_eq!(reg.order(), &[4, 2, 1]);
        assert!(reg.remove(3).is_none());
    }

    #[test]
    fn pan_and_inverse_pan_is_identity_for_non_sticky() {
        let mut reg = ClientRegistry::new();
        reg.insert_head(client(1, 10.0, TagMask::single(0)));
        reg.insert_head(client(2, 20.0, TagMask::single(1)));
        let sticky = TagMask::single(1);
        reg.translate(137.0, -42.0, sticky);
        assert_eq!(reg.get(1).unwrap().geometry.x, 147.0);
        assert_eq!(reg.get(2).unwrap().geometry.x, 20.0);
        reg.translate(-137.0, 42.0, sticky);
        assert_eq!(reg.get(1).unwrap().geometry, Geometry::new(10.0, 0.0, 100.0, 100.0));
    }

    #[test]
    fn sticky_clients_ignore_zoom() {
        let mut reg = ClientRegistry::new();
        reg.insert_head(client(1, 10.0, TagMask::single(2)));
        for _ in 0..10 {
            reg.scale_about(1.1, 300.0, 300.0, TagMask::single(2), 20.0);
        }
        assert_eq!(reg.get(1).unwrap().geometry, Geometry::new(10.0, 0.0, 100.0, 100.0));
    }

    #[test]
    fn raise_moves_to_top_of_stack() {
        let mut reg = ClientRegistry::new();
        for id in 1..=3 {
            reg.insert_head(client(id, 0.0, TagMask::single(0)));
        }
        reg.raise(1);
        assert_eq!(reg.z_order(), &[2, 3, 1]);
    }
}
