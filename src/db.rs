pub mod dashboard_repo;
pub use dashboard_repo::{DashboardRepository, SalesSource};

#[cfg(test)]
pub mod memory_repo;
#[cfg(test)]
pub use memory_repo::InMemorySalesSource;
