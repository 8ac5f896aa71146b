//! Write a result into an input, and arm the one-shot revert.

use crate::dom::FileInput;
use crate::protocol::{Dimensions, Resized};

/// Swap resized copies into `input`, remember the size on its form and arm a
/// click handler that puts the exact original list back once.
pub(super) fn substitute(input: &dyn FileInput, resized: &Resized) {
    let originals = input.file_names();

    let restore = originals.clone();
    let index = resized.index;
    input.once_on_click(Box::new(move |input: &dyn FileInput| {
        tracing::debug!(index, files = restore.len(), "click: restoring original files");
        input.set_file_names(restore);
    }));

    if let Some(form) = input.form() {
        if let Some(dimensions) = Dimensions::from_parts(Some(resized.max_width), Some(resized.max_height)) {
            form.set_size_cache(dimensions);
        }
    }

    let replaced = resized.replacements.apply(&originals);
    tracing::debug!(
        index,
        replaced = resized.replacements.len(),
        total = replaced.len(),
        "substituted resized files"
    );
    input.set_file_names(replaced);
}
