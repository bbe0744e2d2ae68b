use tracing::warn;

use crate::domain::{HostRecord, ParsedFile};

const BLOCK_START: &str = "define host{";
const BLOCK_END: &str = "}";
const NAME_DIRECTIVE: &str = "host_name";
const ADDRESS_DIRECTIVE: &str = "address";

/// How to treat host names that the sanitizer would alter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamePolicy {
    /// Keep the sanitized name even when characters were stripped
    Lenient,
    /// Drop records whose raw name differs from its sanitized form
    Strict,
}

/// Strip every character that is not alphanumeric, a dot, or a hyphen.
///
/// Legacy files carry stray punctuation and commentary around values; this
/// normalizes them the same way on every pass (idempotent).
pub fn sanitize(token: &str) -> String {
    token
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '.' || *c == '-')
        .collect()
}

/// Extract host records from one Icinga-style config file.
///
/// Only `define host{ ... }` blocks are examined, and inside a block only
/// `host_name` and `address` directives. Each block accumulates its own
/// name/address pair and emits exactly one record at the closing brace, so a
/// block missing one field yields a record with that field empty instead of
/// shifting the pairing of every later block. A block left open at end of
/// file still emits whatever it collected.
pub fn extract(contents: &str, policy: NamePolicy) -> ParsedFile {
    let mut parsed = ParsedFile::new();
    let mut block: Option<HostBlock> = None;

    for line in contents.lines() {
        let trimmed = line.trim();

        if trimmed.starts_with(BLOCK_START) {
            block = Some(HostBlock::default());
        } else if trimmed == BLOCK_END {
            if let Some(block) = block.take() {
                block.emit(&mut parsed, policy);
            }
        } else if let Some(block) = block.as_mut() {
            block.feed(trimmed);
        }
    }

    // Trailing unclosed block
    if let Some(block) = block.take() {
        block.emit(&mut parsed, policy);
    }

    parsed
}

/// Name/address candidates collected inside one `define host{...}` block
#[derive(Debug, Default)]
struct HostBlock {
    raw_name: Option<String>,
    address: Option<String>,
}

impl HostBlock {
    fn feed(&mut self, line: &str) {
        let mut tokens = line.split_whitespace();
        let Some(directive) = tokens.next() else {
            return;
        };
        // Value is the second whitespace token; directives without one
        // contribute an empty value
        let value = tokens.next().unwrap_or("");

        match directive {
            NAME_DIRECTIVE => self.raw_name = Some(value.to_string()),
            ADDRESS_DIRECTIVE => self.address = Some(sanitize(value)),
            _ => {}
        }
    }

    fn emit(self, parsed: &mut ParsedFile, policy: NamePolicy) {
        if self.raw_name.is_none() && self.address.is_none() {
            return;
        }

        let raw_name = self.raw_name.unwrap_or_default();
        let name = sanitize(&raw_name);

        if policy == NamePolicy::Strict && name != raw_name {
            warn!(
                "dropping host '{}': name altered by sanitization to '{}'",
                raw_name, name
            );
            return;
        }

        parsed.push(HostRecord::new(name, self.address.unwrap_or_default()));
    }
}
