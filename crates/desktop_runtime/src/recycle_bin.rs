//! Recycle-bin ledger of deleted desktop icons.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    icon_layout::ProtectedIconError,
    icons::DESKTOP_LOCATION,
    model::{DesktopIcon, RecycleBinItem},
};

const RECYCLE_BIN_NAME: &str = "Recycle Bin";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecycleBin {
    items: Vec<RecycleBinItem>,
}

impl RecycleBin {
    /// Builds a ledger from loaded items, dropping system icons and repeated ids.
    pub fn from_items(items: Vec<RecycleBinItem>) -> Self {
        let mut seen = HashSet::new();
        let items = items
            .into_iter()
            .filter(|item| {
                if item.icon.is_system() {
                    debug!(icon_id = %item.id(), "dropping system icon from recycle bin");
                    return false;
                }
                seen.insert(item.id().to_string())
            })
            .collect();
        Self { items }
    }

    pub fn items(&self) -> &[RecycleBinItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, item_id: &str) -> bool {
        self.items.iter().any(|item| item.id() == item_id)
    }

    /// Recycle-bin icon label, with the item count once anything is inside.
    pub fn label(&self) -> String {
        if self.items.is_empty() {
            RECYCLE_BIN_NAME.to_string()
        } else {
            format!("{RECYCLE_BIN_NAME} ({})", self.items.len())
        }
    }

    /// Appends a deleted desktop icon stamped with `deleted_at` (unix ms) and returns its item id.
    ///
    /// Existing entries are never replaced: an icon whose id is already filed is re-identified
    /// as `<id>-<n>`.
    ///
    /// # Errors
    ///
    /// Returns [`ProtectedIconError`] for system icons.
    pub fn delete(
        &mut self,
        mut icon: DesktopIcon,
        deleted_at: u64,
    ) -> Result<String, ProtectedIconError> {
        if icon.is_system() {
            return Err(ProtectedIconError { icon_id: icon.id });
        }
        if self.contains(&icon.id) {
            let filed_id = self.unique_id(&icon.id);
            debug!(icon_id = %icon.id, %filed_id, "recycle bin id taken, re-identifying");
            icon.id = filed_id;
        }
        let item_id = icon.id.clone();
        self.items.push(RecycleBinItem {
            icon,
            deleted_at,
            original_location: DESKTOP_LOCATION.to_string(),
        });
        Ok(item_id)
    }

    /// Takes an item out of the ledger and returns the icon it was filed from.
    pub fn restore(&mut self, item_id: &str) -> Option<DesktopIcon> {
        let index = self.items.iter().position(|item| item.id() == item_id)?;
        Some(self.items.remove(index).icon)
    }

    /// Restores every listed item that exists, in ledger order.
    pub fn restore_many(&mut self, item_ids: &[String]) -> Vec<DesktopIcon> {
        let (restored, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.items)
            .into_iter()
            .partition(|item| item_ids.iter().any(|id| id == item.id()));
        self.items = kept;
        restored.into_iter().map(|item| item.icon).collect()
    }

    pub fn purge(&mut self, item_id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id() != item_id);
        self.items.len() != before
    }

    /// Returns how many of `item_ids` were removed.
    pub fn purge_many(&mut self, item_ids: &[String]) -> usize {
        let before = self.items.len();
        self.items
            .retain(|item| !item_ids.iter().any(|id| id == item.id()));
        before - self.items.len()
    }

    pub fn purge_all(&mut self) -> usize {
        let purged = self.items.len();
        self.items.clear();
        purged
    }

    fn unique_id(&self, base: &str) -> String {
        (2..)
            .map(|n| format!("{base}-{n}"))
            .find(|candidate| !self.contains(candidate))
            .unwrap_or_else(|| base.to_string())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        icons::required_system_icons,
        model::{IconKind, IconPayload},
    };

    fn shortcut(id: &str) -> DesktopIcon {
        DesktopIcon {
            id: id.to_string(),
            name: "MyShortcut".to_string(),
            image: "/icons8-github.svg".to_string(),
            kind: IconKind::Shortcut,
            x: 120,
            y: 20,
            payload: IconPayload::default(),
        }
    }

    #[test]
    fn delete_then_restore_returns_the_original_icon() {
        let mut bin = RecycleBin::default();
        bin.delete(shortcut("s-1"), 1_700_000_000_000).expect("delete");

        assert_eq!(bin.len(), 1);
        assert_eq!(bin.items()[0].original_location, "Desktop");
        assert_eq!(bin.items()[0].deleted_at, 1_700_000_000_000);

        assert_eq!(bin.restore("s-1"), Some(shortcut("s-1")));
        assert!(bin.is_empty());
        assert_eq!(bin.restore("s-1"), None);
    }

    #[test]
    fn deleting_a_filed_id_again_appends_instead_of_replacing() {
        let mut bin = RecycleBin::default();
        let mut second = shortcut("s-1");
        second.name = "Second".to_string();

        assert_eq!(bin.delete(shortcut("s-1"), 1).expect("first"), "s-1");
        assert_eq!(bin.delete(second.clone(), 2).expect("second"), "s-1-2");

        assert_eq!(bin.len(), 2);
        assert_eq!(bin.items()[0].icon, shortcut("s-1"));
        assert_eq!(bin.items()[1].icon.name, "Second");
        assert_eq!(bin.restore("s-1-2").map(|icon| icon.name), Some(second.name));
    }

    #[test]
    fn system_icons_are_refused() {
        let mut bin = RecycleBin::default();
        let err = bin
            .delete(required_system_icons().remove(0), 1)
            .unwrap_err();
        assert_eq!(err.icon_id, "recycle-bin");
        assert!(bin.is_empty());
    }

    #[test]
    fn label_counts_items() {
        let mut bin = RecycleBin::default();
        assert_eq!(bin.label(), "Recycle Bin");
        bin.delete(shortcut("a"), 1).unwrap();
        bin.delete(shortcut("b"), 2).unwrap();
        assert_eq!(bin.label(), "Recycle Bin (2)");
    }

    #[test]
    fn batch_restore_and_purge_skip_unknown_ids() {
        let mut bin = RecycleBin::default();
        for id in ["a", "b", "c", "d"] {
            bin.delete(shortcut(id), 1).unwrap();
        }

        let restored = bin.restore_many(&["c".to_string(), "a".to_string(), "zz".to_string()]);
        let ids: Vec<&str> = restored.iter().map(|icon| icon.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);

        assert_eq!(bin.purge_many(&["b".to_string(), "zz".to_string()]), 1);
        assert!(!bin.purge("zz"));
        assert_eq!(bin.purge_all(), 1);
        assert!(bin.is_empty());
    }

    #[test]
    fn loaded_items_lose_system_icons_and_duplicates() {
        let item = |icon: DesktopIcon| RecycleBinItem {
            icon,
            deleted_at: 5,
            original_location: "Desktop".to_string(),
        };
        let bin = RecycleBin::from_items(vec![
            item(required_system_icons().remove(0)),
            item(shortcut("a")),
            item(shortcut("a")),
        ]);
        assert_eq!(bin.len(), 1);
        assert!(bin.contains("a"));
    }

    #[test]
    fn serializes_as_a_flat_item_list() {
        let mut bin = RecycleBin::default();
        bin.delete(shortcut("a"), 9).unwrap();
        let value = serde_json::to_value(&bin).expect("serialize");
        assert_eq!(value[0]["id"], "a");
        assert_eq!(value[0]["deleted_at"], 9);
        assert_eq!(value[0]["original_location"], "Desktop");
    }
}
