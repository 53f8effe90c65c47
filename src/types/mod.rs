mod badge;
mod board;
mod commit;
mod group;
mod hook;
mod repository;

pub use badge::Badge;
pub use board::{Board, Tier};
pub use commit::Commit;
pub use group::{Group, GroupKind};
pub use hook::Hook;
pub use repository::Repository;
