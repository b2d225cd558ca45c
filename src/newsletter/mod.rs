mod assemble;
mod render;

pub use assemble::{assemble_content, filter_for_subscriber, Link, NewsletterContent};
pub use render::{render_html, render_text, subject_line};
