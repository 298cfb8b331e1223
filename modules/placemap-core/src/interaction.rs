//! Per-place marker and info-window state.
//!
//! Each attached place has exactly one marker and one info window. A place is
//! `Collapsed` until opened, and can only be opened while its marker is
//! visible. Hiding a marker closes its info window first.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use placemap_common::display::{marker_icon_for, selected_icon, DEFAULT_MARKER_ICON};
use placemap_common::{GeoPoint, Place};

use crate::observer::ViewEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionState {
    Collapsed,
    Expanded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IconVariant {
    Default,
    Selected,
}

/// Why an info window was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// The user clicked the info window's close control or the list entry.
    User,
    /// The query or a category toggle hid the place.
    Filtered,
    /// The neighborhood is being torn down.
    Teardown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Opened,
    Closed,
    /// Already in the requested state.
    Unchanged,
    /// Open refused because the marker is hidden, or the place has no marker.
    Refused,
}

#[derive(Debug, Clone)]
struct PlaceView {
    position: GeoPoint,
    base_icon: String,
    state: InteractionState,
    icon: IconVariant,
    marker_visible: bool,
}

impl PlaceView {
    fn icon_url(&self) -> String {
        match self.icon {
            IconVariant::Default => self.base_icon.clone(),
            IconVariant::Selected => selected_icon(&self.base_icon),
        }
    }
}

#[derive(Default)]
pub struct PlaceInteractionController {
    views: HashMap<String, PlaceView>,
    /// Attachment order, so teardown is deterministic.
    order: Vec<String>,
}

impl PlaceInteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a marker for a categorized place. The marker starts hidden until
    /// the filter decides otherwise. Re-attaching an attached place is a no-op.
    pub fn attach(&mut self, place: &Place, out: &mut Vec<ViewEvent>) {
        if self.views.contains_key(&place.id) {
            return;
        }

        let base_icon = place
            .resolved_categories
            .first()
            .map(|c| marker_icon_for(&c.id))
            .unwrap_or(DEFAULT_MARKER_ICON)
            .to_string();

        out.push(ViewEvent::MarkerAttached {
            place_id: place.id.clone(),
            position: place.location,
            icon: base_icon.clone(),
        });

        self.views.insert(
            place.id.clone(),
            PlaceView {
                position: place.location,
                base_icon,
                state: InteractionState::Collapsed,
                icon: IconVariant::Default,
                marker_visible: false,
            },
        );
        self.order.push(place.id.clone());
    }

    pub fn is_attached(&self, place_id: &str) -> bool {
        self.views.contains_key(place_id)
    }

    pub fn state(&self, place_id: &str) -> Option<InteractionState> {
        self.views.get(place_id).map(|v| v.state)
    }

    pub fn icon_variant(&self, place_id: &str) -> Option<IconVariant> {
        self.views.get(place_id).map(|v| v.icon)
    }

    pub fn is_marker_visible(&self, place_id: &str) -> bool {
        self.views.get(place_id).is_some_and(|v| v.marker_visible)
    }

    pub fn is_expanded(&self, place_id: &str) -> bool {
        self.state(place_id) == Some(InteractionState::Expanded)
    }

    /// `Collapsed -> Expanded`: select the icon, open the info window and pan
    /// to the place.
    pub fn open(&mut self, place_id: &str, out: &mut Vec<ViewEvent>) -> Transition {
        let Some(view) = self.views.get_mut(place_id) else {
            return Transition::Refused;
        };
        if view.state == InteractionState::Expanded {
            return Transition::Unchanged;
        }
        if !view.marker_visible {
            tracing::debug!(place_id, "Refusing to open info window on hidden marker");
            return Transition::Refused;
        }

        view.state = InteractionState::Expanded;
        view.icon = IconVariant::Selected;
        out.push(ViewEvent::InteractionStateChanged {
            place_id: place_id.to_string(),
            state: InteractionState::Expanded,
            icon: view.icon_url(),
        });
        out.push(ViewEvent::PanTo(view.position));
        Transition::Opened
    }

    /// `Expanded -> Collapsed`: restore the default icon and close the window.
    pub fn close(&mut self, place_id: &str, reason: CloseReason, out: &mut Vec<ViewEvent>) -> Transition {
        let Some(view) = self.views.get_mut(place_id) else {
            return Transition::Unchanged;
        };
        if view.state == InteractionState::Collapsed {
            return Transition::Unchanged;
        }

        view.state = InteractionState::Collapsed;
        view.icon = IconVariant::Default;
        if reason != CloseReason::User {
            tracing::debug!(place_id, ?reason, "Info window force-closed");
        }
        out.push(ViewEvent::InteractionStateChanged {
            place_id: place_id.to_string(),
            state: InteractionState::Collapsed,
            icon: view.icon_url(),
        });
        Transition::Closed
    }

    /// Marker click opens a collapsed place and scrolls its list entry into
    /// view. Clicking an expanded place does nothing.
    pub fn marker_clicked(&mut self, place_id: &str, out: &mut Vec<ViewEvent>) -> Transition {
        let transition = self.open(place_id, out);
        if transition == Transition::Opened {
            out.push(ViewEvent::ScrollIntoView {
                place_id: place_id.to_string(),
            });
        }
        transition
    }

    /// List entry click toggles the info window.
    pub fn list_entry_clicked(&mut self, place_id: &str, out: &mut Vec<ViewEvent>) -> Transition {
        if self.is_expanded(place_id) {
            self.close(place_id, CloseReason::User, out)
        } else {
            self.open(place_id, out)
        }
    }

    /// Apply a visibility decision. Hiding closes an open info window first.
    pub fn set_marker_visible(&mut self, place_id: &str, visible: bool, out: &mut Vec<ViewEvent>) {
        if !visible {
            self.close(place_id, CloseReason::Filtered, out);
        }
        let Some(view) = self.views.get_mut(place_id) else {
            return;
        };
        if view.marker_visible != visible {
            view.marker_visible = visible;
            out.push(ViewEvent::MarkerVisibilityChanged {
                place_id: place_id.to_string(),
                visible,
            });
        }
    }

    /// Close every open info window and detach every marker.
    pub fn detach_all(&mut self, out: &mut Vec<ViewEvent>) {
        for place_id in std::mem::take(&mut self.order) {
            self.close(&place_id, CloseReason::Teardown, out);
            out.push(ViewEvent::MarkerDetached { place_id });
        }
        self.views.clear();
    }

    /// Place ids currently expanded, in attachment order.
    pub fn expanded(&self) -> Vec<&str> {
        self.order
            .iter()
            .filter(|id| self.is_expanded(id))
            .map(String::as_str)
            .collect()
    }

    /// No place is expanded while its marker is hidden.
    pub fn is_consistent(&self) -> bool {
        self.views
            .values()
            .all(|v| v.state == InteractionState::Collapsed || v.marker_visible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use placemap_common::{CategoryRef, OpenHours};

    const FOOD: &str = "4d4b7105d754a06374d81259";

    fn place(id: &str) -> Place {
        Place {
            id: id.into(),
            name: id.into(),
            location: GeoPoint::new(37.39, -122.1),
            address_lines: vec![],
            leaf_categories: vec![],
            resolved_categories: vec![CategoryRef {
                id: FOOD.into(),
                name: "Food".into(),
                plural_name: "Food".into(),
            }],
            hours: OpenHours::Unavailable,
            photos: vec![],
        }
    }

    fn attached_visible(id: &str) -> PlaceInteractionController {
        let mut ctl = PlaceInteractionController::new();
        let mut out = vec![];
        ctl.attach(&place(id), &mut out);
        ctl.set_marker_visible(id, true, &mut out);
        ctl
    }

    #[test]
    fn attach_starts_collapsed_and_hidden() {
        let mut ctl = PlaceInteractionController::new();
        let mut out = vec![];
        ctl.attach(&place("a"), &mut out);
        assert_eq!(ctl.state("a"), Some(InteractionState::Collapsed));
        assert_eq!(ctl.icon_variant("a"), Some(IconVariant::Default));
        assert!(!ctl.is_marker_visible("a"));
        assert!(matches!(
            &out[0],
            ViewEvent::MarkerAttached { icon, .. } if icon == "img/food_marker.png"
        ));
    }

    #[test]
    fn open_selects_icon_and_pans() {
        let mut ctl = attached_visible("a");
        let mut out = vec![];
        assert_eq!(ctl.open("a", &mut out), Transition::Opened);
        assert_eq!(ctl.icon_variant("a"), Some(IconVariant::Selected));
        assert_eq!(
            out,
            vec![
                ViewEvent::InteractionStateChanged {
                    place_id: "a".into(),
                    state: InteractionState::Expanded,
                    icon: "img/food_marker_selected.png".into(),
                },
                ViewEvent::PanTo(GeoPoint::new(37.39, -122.1)),
            ]
        );
    }

    #[test]
    fn open_refused_on_hidden_marker() {
        let mut ctl = PlaceInteractionController::new();
        let mut out = vec![];
        ctl.attach(&place("a"), &mut out);
        out.clear();
        assert_eq!(ctl.open("a", &mut out), Transition::Refused);
        assert!(out.is_empty());
        assert_eq!(ctl.state("a"), Some(InteractionState::Collapsed));
    }

    #[test]
    fn unknown_place_cannot_open() {
        let mut ctl = PlaceInteractionController::new();
        assert_eq!(ctl.open("ghost", &mut vec![]), Transition::Refused);
    }

    #[test]
    fn marker_click_does_not_toggle_closed() {
        let mut ctl = attached_visible("a");
        let mut out = vec![];
        assert_eq!(ctl.marker_clicked("a", &mut out), Transition::Opened);
        assert!(out.contains(&ViewEvent::ScrollIntoView { place_id: "a".into() }));

        out.clear();
        assert_eq!(ctl.marker_clicked("a", &mut out), Transition::Unchanged);
        assert!(out.is_empty());
        assert!(ctl.is_expanded("a"));
    }

    #[test]
    fn list_entry_toggles() {
        let mut ctl = attached_visible("a");
        let mut out = vec![];
        assert_eq!(ctl.list_entry_clicked("a", &mut out), Transition::Opened);
        assert_eq!(ctl.list_entry_clicked("a", &mut out), Transition::Closed);
        assert_eq!(ctl.icon_variant("a"), Some(IconVariant::Default));
    }

    #[test]
    fn hiding_marker_closes_info_window_first() {
        let mut ctl = attached_visible("a");
        let mut out = vec![];
        ctl.open("a", &mut out);
        out.clear();

        ctl.set_marker_visible("a", false, &mut out);
        assert_eq!(ctl.state("a"), Some(InteractionState::Collapsed));
        assert!(ctl.is_consistent());
        assert!(matches!(
            out[0],
            ViewEvent::InteractionStateChanged { state: InteractionState::Collapsed, .. }
        ));
        assert_eq!(
            out[1],
            ViewEvent::MarkerVisibilityChanged { place_id: "a".into(), visible: false }
        );
    }

    #[test]
    fn unchanged_visibility_emits_nothing() {
        let mut ctl = attached_visible("a");
        let mut out = vec![];
        ctl.set_marker_visible("a", true, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn detach_all_closes_then_detaches() {
        let mut ctl = attached_visible("a");
        let mut out = vec![];
        ctl.attach(&place("b"), &mut out);
        ctl.open("a", &mut out);
        out.clear();

        ctl.detach_all(&mut out);
        assert!(!ctl.is_attached("a"));
        assert!(!ctl.is_attached("b"));
        assert!(matches!(out[0], ViewEvent::InteractionStateChanged { .. }));
        assert_eq!(out[1], ViewEvent::MarkerDetached { place_id: "a".into() });
        assert_eq!(out[2], ViewEvent::MarkerDetached { place_id: "b".into() });
    }
}
