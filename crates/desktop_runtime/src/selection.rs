//! Icon selection set and the box-selection phase machine.
//!
//! The phases run `Idle → Selecting → JustCompleted → Idle`. `JustCompleted` is a suppression
//! token: the click event the host fires right after the pointer release consumes it instead of
//! clearing the selection.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::model::{PointerPosition, WindowRect};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionRegion {
    pub start_x: i32,
    pub start_y: i32,
    pub end_x: i32,
    pub end_y: i32,
}

impl SelectionRegion {
    pub fn anchored_at(point: PointerPosition) -> Self {
        Self {
            start_x: point.x,
            start_y: point.y,
            end_x: point.x,
            end_y: point.y,
        }
    }

    pub fn rect(&self) -> WindowRect {
        WindowRect::from_corners(
            PointerPosition::new(self.start_x, self.start_y),
            PointerPosition::new(self.end_x, self.end_y),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SelectionPhase {
    #[default]
    Idle,
    Selecting {
        region: SelectionRegion,
        /// Selection to union with while additive, empty otherwise.
        base: BTreeSet<String>,
    },
    JustCompleted,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectionState {
    selected: BTreeSet<String>,
    phase: SelectionPhase,
}

impl SelectionState {
    pub fn selected(&self) -> &BTreeSet<String> {
        &self.selected
    }

    pub fn phase(&self) -> &SelectionPhase {
        &self.phase
    }

    pub fn contains(&self, icon_id: &str) -> bool {
        self.selected.contains(icon_id)
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Region currently being drawn, for the rubber-band overlay.
    pub fn active_region(&self) -> Option<SelectionRegion> {
        match &self.phase {
            SelectionPhase::Selecting { region, .. } => Some(*region),
            _ => None,
        }
    }

    pub fn is_selecting(&self) -> bool {
        matches!(self.phase, SelectionPhase::Selecting { .. })
    }

    pub fn begin_box(&mut self, anchor: PointerPosition, additive: bool) {
        let base = if additive {
            self.selected.clone()
        } else {
            BTreeSet::new()
        };
        self.selected = base.clone();
        self.phase = SelectionPhase::Selecting {
            region: SelectionRegion::anchored_at(anchor),
            base,
        };
    }

    /// Moves the free corner of the box and replaces the live selection with `base ∪ hits`,
    /// where `hits_for` maps the normalized box rectangle to the icon ids it overlaps.
    pub fn update_box<F>(&mut self, pointer: PointerPosition, hits_for: F) -> bool
    where
        F: FnOnce(WindowRect) -> Vec<String>,
    {
        let SelectionPhase::Selecting { region, base } = &mut self.phase else {
            return false;
        };
        region.end_x = pointer.x;
        region.end_y = pointer.y;
        let mut next = base.clone();
        next.extend(hits_for(region.rect()));
        self.selected = next;
        true
    }

    pub fn finish_box(&mut self) -> bool {
        if !self.is_selecting() {
            return false;
        }
        self.phase = SelectionPhase::JustCompleted;
        true
    }

    /// Consumes the post-box-selection token. Returns `true` when the click must be ignored.
    pub fn consume_click_token(&mut self) -> bool {
        if self.phase == SelectionPhase::JustCompleted {
            self.phase = SelectionPhase::Idle;
            return true;
        }
        false
    }

    pub fn select_only(&mut self, icon_id: &str) {
        self.selected.clear();
        self.selected.insert(icon_id.to_string());
    }

    pub fn toggle(&mut self, icon_id: &str) {
        if !self.selected.remove(icon_id) {
            self.selected.insert(icon_id.to_string());
        }
    }

    pub fn select_all<'a>(&mut self, icon_ids: impl IntoIterator<Item = &'a str>) {
        self.selected = icon_ids.into_iter().map(str::to_string).collect();
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Forgets ids that no longer exist on the desktop.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.selected.retain(|id| keep(id.as_str()));
        if let SelectionPhase::Selecting { base, .. } = &mut self.phase {
            base.retain(|id| keep(id.as_str()));
        }
    }
}
