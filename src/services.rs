pub mod company_list;
pub use company_list::{CompanyListView, ListViewDeps, ListViewOptions, SearchClearPolicy, TrialLimitScope};
pub mod document;
pub mod list_query;
pub mod presentation;
pub mod search_store;
pub mod trial;
pub mod user_list;
pub use user_list::UserListView;
pub mod view_registry;
pub use view_registry::{ListView, RegistryLimits, ViewRegistry};
