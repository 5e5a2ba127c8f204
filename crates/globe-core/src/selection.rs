//! Marker selection: the host's direct click callback, broadcast observers,
//! and the host-provided "currently selected" point.

use crate::geo::GeoPoint;

pub type SelectionCallback = Box<dyn FnMut(Option<GeoPoint>)>;
pub type SelectionObserver = Box<dyn FnMut(&GeoPoint)>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u32);

impl SubscriptionId {
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }
}

#[derive(Default)]
pub struct SelectionHub {
    on_marker_click: Option<SelectionCallback>,
    observers: Vec<(SubscriptionId, SelectionObserver)>,
    next_id: u32,
    selected: Option<GeoPoint>,
}

impl std::fmt::Debug for SelectionHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionHub")
            .field("has_callback", &self.on_marker_click.is_some())
            .field("observers", &self.observers.len())
            .field("selected", &self.selected)
            .finish()
    }
}

impl SelectionHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace (or clear) the direct click callback.
    pub fn set_on_marker_click(&mut self, callback: Option<SelectionCallback>) {
        self.on_marker_click = callback;
    }

    pub fn subscribe(&mut self, observer: SelectionObserver) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.observers.push((id, observer));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sid, _)| *sid != id);
        self.observers.len() != before
    }

    #[inline]
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Deliver a picked point: direct callback first, then every observer.
    pub fn notify(&mut self, point: GeoPoint) {
        if let Some(cb) = self.on_marker_click.as_mut() {
            cb(Some(point));
        }
        for (_, observer) in self.observers.iter_mut() {
            observer(&point);
        }
    }

    pub fn set_selected(&mut self, point: Option<GeoPoint>) -> bool {
        let changed = self.selected != point;
        self.selected = point;
        changed
    }

    #[inline]
    pub fn selected(&self) -> Option<GeoPoint> {
        self.selected
    }

    /// Drop the callback and all observers.
    pub fn clear(&mut self) {
        self.on_marker_click = None;
        self.observers.clear();
    }
}
