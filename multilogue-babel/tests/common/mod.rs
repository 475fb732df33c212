//! Shared helpers for the integration tests.

use multilogue_babel::{Dialogue, Role, Turn};
use std::path::PathBuf;

/// Read a file from `tests/fixtures`
pub fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()))
}

/// Build a turn from literals
pub fn turn(speaker: &str, role: &str, paragraphs: &[&str]) -> Turn {
    let role = Role::new(role).expect("valid role");
    Turn::new(speaker, role, paragraphs).expect("valid turn")
}

/// The two-turn exchange used throughout the docs
pub fn republic() -> Dialogue {
    Dialogue::new(vec![
        turn("Socrates", "user", &["What is justice?"]),
        turn("Glaucon", "assistant", &["Giving each his due."]),
    ])
}

#[test]
fn test_fixture_loading() {
    assert!(fixture("socrates.plato").contains("Socrates (user):"));
}
