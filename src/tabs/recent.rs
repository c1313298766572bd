// Recent items collaborator

use super::types::Tab;

/// Tracker of recently viewed entities.
///
/// Called whenever a tab becomes an actively viewed permanent tab, or a preview
/// tab is promoted to permanent.
pub trait RecentItems {
    fn record_recent(&mut self, workspace_ref: &str, tab: &Tab);
}

/// No recent-items tracking
impl RecentItems for () {
    fn record_recent(&mut self, _workspace_ref: &str, _tab: &Tab) {}
}

impl<R: RecentItems + ?Sized> RecentItems for &mut R {
    fn record_recent(&mut self, workspace_ref: &str, tab: &Tab) {
        (**self).record_recent(workspace_ref, tab)
    }
}
