pub mod chrome_page;
pub mod page_driver;

pub use chrome_page::{ChromePage, ChromePdfRenderer};
pub use page_driver::{HtmlRenderer, PageDriver, Selector};
