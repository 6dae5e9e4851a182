pub mod session;
pub mod transport;

pub use session::{CrawlConfig, CrawlReport, CrawlSession, PendingCounter};
pub use transport::{HttpTransport, Transport};
