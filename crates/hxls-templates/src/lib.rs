//! Handler references in Django templates.
//!
//! Recognizes the `hx_requests` template tags that name a handler:
//!
//! ```text
//! {% hx_get 'name' %}  {% hx_post "name" object=item %}  {% hx_request name_var %}
//! {% hx_vals hx_request_name='name' title='Edit' %}
//! ```
//!
//! The scan is a direct pass over `{% ... %}` blocks and cannot fail; text it
//! does not understand simply yields nothing.

mod lookup;
mod quotes;
mod scanner;
mod types;

pub use lookup::name_at_position;
pub use scanner::parse_references;
pub use types::HandlerReference;
pub use types::NameAtPosition;
pub use types::TagKind;
