//! Required-field validation.

use page_core::{Dom, ElementId};

/// Flag every empty `[required]` field inside `form` with the `error` class
/// and clear the flag on filled ones. Returns whether all were filled.
pub fn validate_form(dom: &mut dyn Dom, form: ElementId) -> bool {
    let fields = dom.query_all_in(Some(form), "[required]").unwrap_or_default();
    let mut valid = true;
    for field in fields {
        if dom.value(field).trim().is_empty() {
            dom.add_class(field, "error");
            valid = false;
        } else {
            dom.remove_class(field, "error");
        }
    }
    valid
}
