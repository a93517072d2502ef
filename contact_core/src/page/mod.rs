//! Server-rendered contact page

pub mod faq;
pub mod render;

pub use faq::{Faq, FAQS};
pub use render::{escape_html, render_contact_page, PageView};
