//! User aggregate
//!
//! Contains the User entity, DTOs, caller-facing projections, deletion and
//! role-change guards, and the repository interface.

pub mod guards;
pub mod model;
pub mod projection;
pub mod repository;

mod dto_create;
mod dto_list;

pub use model::{DoctorLinks, NewUser, User, UserRole};
pub use projection::{RoleChange, StatusChange, UserDetails, UserProfile, UserSummary};

pub use dto_create::CreateUserDto;
pub use dto_list::ListUsersQuery;

pub use repository::UserRepository;
