pub mod config;
pub mod db;
pub mod error;
pub mod host;
pub mod inventory;
pub mod model;
pub mod output;
pub mod platform;
pub mod publish;
pub mod registry;
pub mod scanner;
pub mod store;

pub use config::Config;
pub use db::PackageDb;
pub use error::ScanError;
pub use host::{HostEnv, SystemHost};
pub use inventory::{tag_host, Inventory};
pub use model::{OsFamily, PackageRecord, ScanResult, Source};
pub use publish::{publish, PublishOptions, Published, StoreTargets};
pub use scanner::Scanner;
pub use store::SnapshotStore;
