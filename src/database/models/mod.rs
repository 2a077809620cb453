pub mod account;
pub mod stats;
pub mod wine;

pub use account::AdminAccount;
pub use stats::{DashboardStats, ImageStats, UserStats};
pub use wine::WineDetail;
