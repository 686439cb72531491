//! Test translator.

use dicedr_core::translate::Translate;

/// Returns every key unchanged, so tests can assert on keys directly.
#[derive(Debug, Default, Clone, Copy)]
pub struct EchoTranslator;

impl Translate for EchoTranslator {
    fn translate(&self, key: &str) -> String {
        key.to_owned()
    }
}
