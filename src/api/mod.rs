//! Lambda handlers and the request/response plumbing they share.

pub mod add_score;
pub mod get_leaderboard;
pub mod get_record;
pub mod helpers;
pub mod parsing;
