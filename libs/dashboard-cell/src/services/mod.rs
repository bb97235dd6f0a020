// libs/dashboard-cell/src/services/mod.rs

pub mod controller;
pub mod features;
pub mod fetcher;

pub use controller::DashboardController;
pub use features::features_page;
pub use fetcher::RemoteDataFetcher;
