// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
use lumina_engine::editing::{Editor, EditorSettings};
use lumina_engine::models::NumericField;

/// Editor holding `layers` alternating text and image layers
#[allow(dead_code)]
pub fn populated_editor(layers: usize) -> Editor {
    let mut editor = Editor::new(EditorSettings::default());
    for i in 0..layers {
        if i % 2 == 0 {
            editor.add_text(format!("Layer {i}"));
        } else {
            editor.add_image(format!("image-{i}.png"), None);
        }
    }
    editor
}

/// Commit `edits` numeric field edits on the front-most layer
#[allow(dead_code)]
pub fn make_edits(editor: &mut Editor, edits: usize) {
    let Some(id) = editor.layers().last().map(|layer| layer.id) else {
        return;
    };
    for i in 0..edits {
        editor
            .edit_numeric(id, NumericField::X, &i.to_string())
            .unwrap();
    }
}
