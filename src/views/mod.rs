//! Dashboard views.
//!
//! A view is a pure consumer of the current dataset, the detected roles
//! and its own local state. It produces a serializable aggregate and a
//! [`Page`] for the renderers.

pub mod clinical;
pub mod columns;
pub mod overview;
pub mod patient;
pub mod policy;

use crate::data::Dataset;
use crate::error::ViewError;
use crate::ir::Page;
use crate::roles::{detect_columns, RoleMapping};
use crate::session::Session;
use serde::Serialize;
use tracing::debug;

pub use clinical::ClinicalView;
pub use columns::ColumnsView;
pub use overview::OverviewView;
pub use patient::PatientView;
pub use policy::PolicyView;

pub trait View {
    /// Local selection or filter state of the view
    type State: Default;
    /// Chart-ready aggregates
    type Output: Serialize;

    const NAME: &'static str;

    fn compute(
        dataset: &Dataset,
        roles: &RoleMapping,
        state: &Self::State,
    ) -> Result<Self::Output, ViewError>;

    fn page(output: &Self::Output) -> Page;
}

/// Result of rendering a view against the session
#[derive(Debug)]
pub enum ViewResult<T> {
    NoData,
    Ready(T),
}

impl<T> ViewResult<T> {
    pub fn ready(self) -> Option<T> {
        match self {
            ViewResult::Ready(t) => Some(t),
            ViewResult::NoData => None,
        }
    }
}

/// Recompute a view from whatever the session currently holds
pub fn render_current<V: View>(
    session: &Session,
    state: &V::State,
) -> Result<ViewResult<V::Output>, ViewError> {
    let Some(dataset) = session.current() else {
        return Ok(ViewResult::NoData);
    };
    let roles = detect_columns(&dataset.columns);
    debug!(
        view = V::NAME,
        detected = roles.iter().filter(|(_, c)| c.is_some()).count(),
        "computing view"
    );
    V::compute(dataset, &roles, state).map(ViewResult::Ready)
}

/// Page for the current session state, falling back to the empty state
pub fn page_for<V: View>(session: &Session, state: &V::State) -> Result<Page, ViewError> {
    Ok(match render_current::<V>(session, state)? {
        ViewResult::Ready(output) => V::page(&output),
        ViewResult::NoData => Page::no_data(),
    })
}

/// `Some(n) -> "n suffix"`, `None -> "N/A"`
pub(crate) fn or_na(value: Option<String>) -> String {
    value.unwrap_or_else(|| "N/A".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_session_yields_no_data() {
        let session = Session::new();
        let result = render_current::<OverviewView>(&session, &()).unwrap();
        assert!(matches!(result, ViewResult::NoData));

        let page = page_for::<PolicyView>(&session, &()).unwrap();
        assert_eq!(page.title, "No Data Loaded");
    }

    #[test]
    fn test_views_follow_session_replacement() {
        let mut session = Session::new();
        session
            .load_str("age,target\n50,1\n60,0\n", "one.csv")
            .unwrap();
        let first = render_current::<OverviewView>(&session, &()).unwrap().ready().unwrap();
        assert_eq!(first.total, 2);

        session.load_str("age,target\n41,0\n", "two.csv").unwrap();
        let second = render_current::<OverviewView>(&session, &()).unwrap().ready().unwrap();
        assert_eq!(second.total, 1);
    }
}
