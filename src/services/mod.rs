pub mod archiver;
pub mod document_merger;
pub mod form_driver;
pub mod navigation;
pub mod order_fetcher;
pub mod order_table;
pub mod receipt_capturer;

pub use archiver::{archive_receipts, create_zip, ArchiveReport};
pub use document_merger::embed_screenshot_to_receipt;
pub use form_driver::{FormDriver, FormState, FormStep};
pub use order_fetcher::OrderFetcher;
pub use order_table::{parse_orders, read_orders};
pub use receipt_capturer::{CaptureOutcome, ReceiptCapturer};
