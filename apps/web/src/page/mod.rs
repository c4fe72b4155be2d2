// Single-page UI: one form post per interaction, full redraw each time.
// Session state travels in the form; the server keeps nothing between requests.

pub mod form;
pub mod handlers;
pub mod session;
pub mod view;
