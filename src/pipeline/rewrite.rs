//! Document rewriting: apply rename mappings to the HTML text buffer.
//!
//! Pure text transformation — no filesystem access. The caller loads the
//! document once, passes the buffer through [`apply_mappings`], and persists
//! the result only when it differs from what was loaded.
//!
//! ## Two passes, exact substring matching
//!
//! 1. **Qualified pass** — every path-qualified occurrence
//!    (`img/product/banner.png`) becomes the qualified new path. Runs first
//!    so that path references are rewritten as whole units.
//! 2. **Bare pass** — every remaining bare occurrence (`banner.png`, as in a
//!    comma-separated `data-images` attribute) becomes the bare new name.
//!
//! Both passes are plain `str::replace` calls: no regex, no attribute
//! awareness. A bare filename that happens to appear in unrelated prose or a
//! comment is rewritten too. That breadth is intentional and long-standing
//! site behaviour; narrowing it would silently change documents that today
//! rely on it.

use crate::pipeline::scan::RenameMapping;
use crate::report::Replacement;
use tracing::info;

/// Apply all mappings to `text`, returning the updated buffer and the list
/// of substitutions actually performed (zero-occurrence mappings are not
/// recorded).
///
/// Mappings are applied in slice order within each pass, so a
/// deterministically ordered slice yields a deterministic result. Within one
/// `str::replace` call, occurrences are replaced left to right across the
/// whole buffer.
pub fn apply_mappings(text: &str, mappings: &[RenameMapping]) -> (String, Vec<Replacement>) {
    let mut content = text.to_string();
    let mut performed = Vec::new();

    // Pass 1: path-qualified references.
    for mapping in mappings {
        if let (Some(old), Some(new)) = (&mapping.qualified_old, &mapping.qualified_new) {
            replace_all(&mut content, old, new, &mut performed);
        }
    }

    // Pass 2: bare filenames, wherever they remain.
    for mapping in mappings {
        replace_all(&mut content, &mapping.bare_old, &mapping.bare_new, &mut performed);
    }

    (content, performed)
}

fn replace_all(content: &mut String, old: &str, new: &str, performed: &mut Vec<Replacement>) {
    if old == new {
        return;
    }
    let occurrences = content.matches(old).count();
    if occurrences == 0 {
        return;
    }
    info!("Updating reference: {old} -> {new} ({occurrences}x)");
    *content = content.replace(old, new);
    performed.push(Replacement {
        old: old.to_string(),
        new: new.to_string(),
        occurrences,
    });
}
