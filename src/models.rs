pub mod company;
pub use company::{CompaniesPage, Company, CompanyFilter, CompanyListRequest, OrderBy, SortDirection, SortField};
pub mod settings;
pub mod user;
pub use user::{OwnerOption, User, UserListRequest, UsersPage};
pub mod view;
