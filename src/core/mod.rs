pub mod channel;
pub mod dashboard;
pub mod metrics;
pub mod models;
pub mod report;
pub mod state;
pub mod videos;
pub mod youtube;

pub use channel::*;
pub use dashboard::*;
pub use metrics::*;
pub use models::*;
pub use report::*;
pub use state::*;
pub use videos::*;
pub use youtube::*;
